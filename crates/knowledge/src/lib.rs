pub mod analyzer;
pub mod model;
pub mod store;
pub mod urls;

pub use analyzer::{
    apply_learnings, KeywordClassifier, LearningOutcome, ResultClassifier, RunAnalysis, Verdict,
};
pub use model::{
    DomainKnowledge, EditorInfo, ElementInfo, KnowledgeSection, PatternKnowledge,
    ResolvedKnowledge, TaskRecord,
};
pub use store::KnowledgeStore;
pub use urls::{extract_domain, extract_path, path_matches};
