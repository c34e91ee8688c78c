//! Declarative sequence model and schema validation.
//!
//! Parsing is permissive (unknown or missing fields never panic the loader);
//! `validate_sequence` is where a malformed document turns into readable
//! messages, before anything touches the browser.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use sitepilot_browser::Target;

/// The closed set of step actions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionKind {
    Click,
    Type,
    Fill,
    Scroll,
    Keypress,
    Screenshot,
    Navigate,
    Wait,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Click => "click",
            ActionKind::Type => "type",
            ActionKind::Fill => "fill",
            ActionKind::Scroll => "scroll",
            ActionKind::Keypress => "keypress",
            ActionKind::Screenshot => "screenshot",
            ActionKind::Navigate => "navigate",
            ActionKind::Wait => "wait",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "click" => Some(ActionKind::Click),
            "type" => Some(ActionKind::Type),
            "fill" => Some(ActionKind::Fill),
            "scroll" => Some(ActionKind::Scroll),
            "keypress" => Some(ActionKind::Keypress),
            "screenshot" => Some(ActionKind::Screenshot),
            "navigate" => Some(ActionKind::Navigate),
            "wait" => Some(ActionKind::Wait),
            _ => None,
        }
    }

    /// Actions after which the page must be re-snapshotted before the next
    /// step can resolve elements.
    pub fn mutates_dom(&self) -> bool {
        matches!(
            self,
            ActionKind::Click | ActionKind::Type | ActionKind::Fill | ActionKind::Navigate
        )
    }
}

/// One step of a sequence. Which fields matter depends on the action.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub target: Option<Target>,
    /// Alternate descriptors tried in order when `target` fails to resolve.
    #[serde(default)]
    pub fallback_targets: Vec<Target>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    /// Milliseconds, for `wait` steps.
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Step {
    pub fn kind(&self) -> Option<ActionKind> {
        ActionKind::from_str(&self.action)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct VariableSpec {
    #[serde(rename = "type", default)]
    pub var_type: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// Informational constraints for the decision layer above the engine; runs
/// do not enforce them.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Preconditions {
    #[serde(default, alias = "url_pattern")]
    pub url_pattern: Option<String>,
    #[serde(default, alias = "logged_in")]
    pub logged_in: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Postcondition checked by polling after the last step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verification {
    #[serde(default, alias = "waitFor")]
    pub wait_for: Option<WaitFor>,
    /// Milliseconds; the configured default timeout applies when absent.
    #[serde(default)]
    pub timeout: Option<u64>,
    /// When false, a timed-out verification downgrades to a soft pass.
    #[serde(default = "default_verification_required")]
    pub required: bool,
}

fn default_verification_required() -> bool {
    true
}

/// A single criterion or a list of them; any one being satisfied verifies
/// the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WaitFor {
    One(AcceptCriterion),
    Many(Vec<AcceptCriterion>),
}

impl WaitFor {
    pub fn criteria(&self) -> &[AcceptCriterion] {
        match self {
            WaitFor::One(criterion) => std::slice::from_ref(criterion),
            WaitFor::Many(list) => list,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AcceptCriterion {
    /// Literal substring expected somewhere in the raw snapshot text.
    #[serde(default, alias = "textContains")]
    pub text_contains: Option<String>,
    /// Structural match via the element resolver.
    #[serde(default)]
    pub target: Option<Target>,
}

/// A declarative interaction script.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Sequence {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "actions")]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub variables: BTreeMap<String, VariableSpec>,
    #[serde(default)]
    pub preconditions: Option<Preconditions>,
    #[serde(default)]
    pub verification: Option<Verification>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Schema check producing human-readable messages. Never panics and never
/// partially executes anything; callers decide whether to proceed.
pub fn validate_sequence(sequence: &Sequence) -> ValidationReport {
    let mut errors = Vec::new();

    if sequence.name.trim().is_empty() {
        errors.push("sequence is missing a name".to_string());
    }
    if sequence.steps.is_empty() {
        errors.push("sequence has no steps (expected `steps` or `actions`)".to_string());
    }

    for (index, step) in sequence.steps.iter().enumerate() {
        let kind = match step.kind() {
            Some(kind) => kind,
            None => {
                if step.action.is_empty() {
                    errors.push(format!("step {}: missing action", index));
                } else {
                    errors.push(format!("step {}: unknown action '{}'", index, step.action));
                }
                continue;
            }
        };
        match kind {
            ActionKind::Click | ActionKind::Type | ActionKind::Fill => {
                if step.target.is_none() {
                    errors.push(format!(
                        "step {}: {} requires a target",
                        index,
                        kind.as_str()
                    ));
                }
                if matches!(kind, ActionKind::Type | ActionKind::Fill) && step.value.is_none() {
                    errors.push(format!(
                        "step {}: {} requires a value",
                        index,
                        kind.as_str()
                    ));
                }
            }
            _ => {}
        }
    }

    for (name, spec) in &sequence.variables {
        if spec.var_type.as_deref().map_or(true, |t| t.trim().is_empty()) {
            errors.push(format!("variable '{}': missing type", name));
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}
