//! Heuristic run-outcome analysis and the feedback loop into the store.
//!
//! Classification is keyword-driven over the run's textual output, bilingual
//! (English/Chinese), and deliberately low-confidence. The classifier sits
//! behind a trait so a stronger model can replace it without touching the
//! execution engine.

use serde::Serialize;
use tracing::debug;

use crate::store::KnowledgeStore;
use crate::urls::extract_domain;

const SUCCESS_KEYWORDS: &[&str] = &[
    "success",
    "successfully",
    "completed",
    "complete",
    "done",
    "posted",
    "published",
    "submitted",
    "logged in",
    "signed in",
    "welcome",
    "成功",
    "完成",
    "已发布",
    "已登录",
    "已提交",
];

const FAILURE_KEYWORDS: &[&str] = &[
    "failed",
    "failure",
    "error",
    "unable",
    "cannot",
    "can't",
    "denied",
    "rejected",
    "invalid",
    "timeout",
    "timed out",
    "not found",
    "no element",
    "失败",
    "错误",
    "超时",
    "未找到",
    "无法",
    "被拒",
];

const TIMEOUT_KEYWORDS: &[&str] = &["timeout", "timed out", "超时"];

const NOT_FOUND_KEYWORDS: &[&str] = &["not found", "no element", "未找到", "找不到"];

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Success,
    Failure,
    Unknown,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Success => "success",
            Verdict::Failure => "failure",
            Verdict::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    None,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::None => "none",
        }
    }
}

/// Outcome of analyzing one run's output.
#[derive(Debug, Clone, Serialize)]
pub struct RunAnalysis {
    pub verdict: Verdict,
    pub confidence: Confidence,
    pub learnings: Vec<String>,
    pub suggested_retry: bool,
    /// Task whose success/failure counters should be stamped, if any.
    pub update_task: Option<String>,
}

/// text × context → verdict. Implementations must never fail; when unsure,
/// return Unknown with no learnings.
pub trait ResultClassifier: Send + Sync {
    fn classify(&self, output: &str, url: &str, task: Option<&str>) -> RunAnalysis;
}

/// Case-insensitive substring matcher over fixed keyword lists. Failure
/// keywords take precedence over success keywords, so mixed output like
/// "posted, but an error occurred" is treated as a failure.
#[derive(Debug, Default)]
pub struct KeywordClassifier;

impl ResultClassifier for KeywordClassifier {
    fn classify(&self, output: &str, url: &str, task: Option<&str>) -> RunAnalysis {
        let lowered = output.to_lowercase();
        let failed = FAILURE_KEYWORDS.iter().any(|k| lowered.contains(k));
        let succeeded = SUCCESS_KEYWORDS.iter().any(|k| lowered.contains(k));

        let verdict = if failed {
            Verdict::Failure
        } else if succeeded {
            Verdict::Success
        } else {
            Verdict::Unknown
        };
        let confidence = match verdict {
            Verdict::Unknown => Confidence::None,
            _ => Confidence::Low,
        };

        let site = extract_domain(url).unwrap_or_else(|| url.to_string());
        let mut learnings = Vec::new();
        let mut suggested_retry = false;
        if verdict == Verdict::Failure {
            if TIMEOUT_KEYWORDS.iter().any(|k| lowered.contains(k)) {
                learnings.push(format!(
                    "Actions on {} can exceed the default wait; allow more settle time before verifying",
                    site
                ));
                suggested_retry = true;
            }
            if NOT_FOUND_KEYWORDS.iter().any(|k| lowered.contains(k)) {
                learnings.push(format!(
                    "Element names on {} may have drifted; refresh targets from a new snapshot",
                    site
                ));
            }
        }

        debug!(
            verdict = verdict.as_str(),
            confidence = confidence.as_str(),
            learnings = learnings.len(),
            "Classified run output"
        );

        RunAnalysis {
            verdict,
            confidence,
            learnings,
            suggested_retry,
            update_task: task.map(|t| t.to_string()),
        }
    }
}

/// What `apply_learnings` actually persisted. Duplicates and capped sections
/// show up here as smaller counts, not as errors.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct LearningOutcome {
    pub gotchas_added: usize,
    pub tasks_updated: usize,
}

/// Feed an analysis back into the store: learnings become gotchas, and a
/// known verdict stamps the named task's counters.
pub fn apply_learnings(
    store: &KnowledgeStore,
    url: &str,
    analysis: &RunAnalysis,
) -> LearningOutcome {
    let mut outcome = LearningOutcome::default();
    for learning in &analysis.learnings {
        if store.add_gotcha(url, learning, None) {
            outcome.gotchas_added += 1;
        }
    }
    if let Some(task) = &analysis.update_task {
        if analysis.verdict != Verdict::Unknown
            && store.record_task_result(url, task, analysis.verdict == Verdict::Success)
        {
            outcome.tasks_updated += 1;
        }
    }
    outcome
}
