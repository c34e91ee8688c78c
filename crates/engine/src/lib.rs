//! Sequence execution: declarative interaction scripts, variable
//! interpolation, and the retry-aware runner that drives a browser session.

pub mod executor;
pub mod interpolate;
pub mod loader;
pub mod sequence;

pub use executor::{ExecutionResult, SequenceRunner, StepResult, StepStatus};
pub use interpolate::interpolate;
pub use loader::{find_sequence, list_sequences, load_sequence};
pub use sequence::{
    validate_sequence, AcceptCriterion, ActionKind, Preconditions, Sequence, Step,
    ValidationReport, VariableSpec, Verification, WaitFor,
};
