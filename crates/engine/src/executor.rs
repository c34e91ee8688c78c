//! Step-by-step sequence execution against a browser driver.
//!
//! One run is strictly sequential: each step's preconditions depend on the
//! DOM state the previous step left behind, so the engine never issues two
//! driver commands concurrently. All waiting is async sleeps.

use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use sitepilot_browser::{
    find_element, find_element_with_fallback, parse_snapshot, BrowserDriver, ParsedElement,
    SnapshotOptions,
};
use sitepilot_core::{AutomationConfig, Error, Result};

use crate::interpolate::interpolate;
use crate::sequence::{validate_sequence, ActionKind, Sequence, Step, Verification};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum StepStatus {
    #[serde(rename = "ok")]
    Ok,
    #[serde(rename = "ok (retry)")]
    OkRetry,
    #[serde(rename = "failed")]
    Failed,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Ok => "ok",
            StepStatus::OkRetry => "ok (retry)",
            StepStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    pub index: usize,
    pub action: String,
    pub status: StepStatus,
    pub description: Option<String>,
    pub error: Option<String>,
    pub duration_ms: u64,
}

/// Final outcome of a run: overall success, the per-step trace, and a
/// top-level error naming the failing step when unsuccessful.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub steps: Vec<StepResult>,
    pub error: Option<String>,
}

impl ExecutionResult {
    fn failed(error: String) -> Self {
        Self {
            success: false,
            steps: Vec::new(),
            error: Some(error),
        }
    }
}

/// Executes sequences against an injected driver. The runner owns no browser
/// state beyond the most recent parsed snapshot.
pub struct SequenceRunner<'a> {
    driver: &'a dyn BrowserDriver,
    config: AutomationConfig,
    screenshot_dir: Option<PathBuf>,
}

impl<'a> SequenceRunner<'a> {
    pub fn new(driver: &'a dyn BrowserDriver, config: AutomationConfig) -> Self {
        Self {
            driver,
            config,
            screenshot_dir: None,
        }
    }

    /// Directory for screenshot steps that do not name a path themselves.
    pub fn with_screenshot_dir(mut self, dir: PathBuf) -> Self {
        self.screenshot_dir = Some(dir);
        self
    }

    pub async fn run(
        &self,
        sequence: &Sequence,
        variables: &BTreeMap<String, String>,
    ) -> ExecutionResult {
        let report = validate_sequence(sequence);
        if !report.valid {
            return ExecutionResult::failed(format!(
                "sequence failed validation: {}",
                report.errors.join("; ")
            ));
        }

        // Required variables are checked before any browser interaction.
        for (name, spec) in &sequence.variables {
            if spec.required && !variables.contains_key(name) {
                let hint = spec
                    .description
                    .as_ref()
                    .map(|d| format!(" ({})", d))
                    .unwrap_or_default();
                return ExecutionResult::failed(format!(
                    "missing required variable '{}'{}",
                    name, hint
                ));
            }
        }

        let mut elements = match self.take_elements().await {
            Ok(elements) => elements,
            Err(e) => {
                return ExecutionResult::failed(format!("initial snapshot failed: {}", e));
            }
        };

        info!(sequence = %sequence.name, steps = sequence.steps.len(), "Running sequence");

        let mut steps = Vec::with_capacity(sequence.steps.len());
        for (index, step) in sequence.steps.iter().enumerate() {
            if index > 0 {
                self.step_pause().await;
            }
            let started = Instant::now();

            let attempt = self.execute_step(step, &elements, variables).await;
            let (status, error) = match attempt {
                Ok(()) => (StepStatus::Ok, None),
                Err(first_err) => {
                    self.retry_step(step, index, &mut elements, variables, first_err)
                        .await
                }
            };
            let duration_ms = started.elapsed().as_millis() as u64;

            let failed = status == StepStatus::Failed;
            steps.push(StepResult {
                index,
                action: step.action.clone(),
                status,
                description: step.description.clone(),
                error: error.clone(),
                duration_ms,
            });

            if failed {
                let message = format!(
                    "step {} ({}) failed: {}",
                    index,
                    step.action,
                    error.unwrap_or_else(|| "unknown error".to_string())
                );
                warn!(sequence = %sequence.name, "{}", message);
                return ExecutionResult {
                    success: false,
                    steps,
                    error: Some(message),
                };
            }

            if step.kind().map(|k| k.mutates_dom()).unwrap_or(false) {
                tokio::time::sleep(Duration::from_millis(self.config.settle_delay_ms)).await;
                match self.take_elements().await {
                    Ok(fresh) => elements = fresh,
                    // Navigation can transiently break snapshotting; stale
                    // elements beat aborting a run that already acted.
                    Err(e) => warn!(error = %e, "Snapshot refresh failed, keeping stale elements"),
                }
            }
        }

        if let Some(verification) = &sequence.verification {
            if !self.verify(verification).await {
                if verification.required {
                    return ExecutionResult {
                        success: false,
                        steps,
                        error: Some(
                            "verification failed: no acceptance criterion appeared within timeout"
                                .to_string(),
                        ),
                    };
                }
                info!(sequence = %sequence.name, "Verification found no match; passing (not required)");
            }
        }

        info!(sequence = %sequence.name, "Sequence completed");
        ExecutionResult {
            success: true,
            steps,
            error: None,
        }
    }

    /// Retry policy for a failed step: re-wait, re-snapshot, re-attempt, up
    /// to the configured count. Every attempt re-runs the full primary-then-
    /// fallback resolution against the fresh element list.
    async fn retry_step(
        &self,
        step: &Step,
        index: usize,
        elements: &mut Vec<ParsedElement>,
        variables: &BTreeMap<String, String>,
        first_err: Error,
    ) -> (StepStatus, Option<String>) {
        // An unbound variable stays unbound no matter how often we re-snapshot.
        let retryable =
            self.config.retry_on_failure && !matches!(first_err, Error::Interpolation(_));
        if !retryable || self.config.max_retries == 0 {
            return (StepStatus::Failed, Some(first_err.to_string()));
        }

        let mut last_err = first_err;
        for attempt in 1..=self.config.max_retries {
            warn!(step = index, attempt, error = %last_err, "Step failed, retrying");
            tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms)).await;
            match self.take_elements().await {
                Ok(fresh) => *elements = fresh,
                Err(e) => warn!(error = %e, "Snapshot refresh before retry failed"),
            }
            let attempt_result = self.execute_step(step, elements, variables).await;
            match attempt_result {
                Ok(()) => return (StepStatus::OkRetry, None),
                Err(e) => last_err = e,
            }
        }
        (StepStatus::Failed, Some(last_err.to_string()))
    }

    async fn execute_step(
        &self,
        step: &Step,
        elements: &[ParsedElement],
        variables: &BTreeMap<String, String>,
    ) -> Result<()> {
        let kind = step
            .kind()
            .ok_or_else(|| Error::Validation(format!("unknown action '{}'", step.action)))?;
        match kind {
            ActionKind::Click => {
                let element = self.resolve(step, elements)?;
                self.driver.click(&element.ref_id).await
            }
            ActionKind::Type => {
                let value = self.step_value(step, variables)?;
                let element = self.resolve(step, elements)?;
                self.driver.type_text(&element.ref_id, &value).await
            }
            ActionKind::Fill => {
                let value = self.step_value(step, variables)?;
                let element = self.resolve(step, elements)?;
                self.driver.fill(&element.ref_id, &value).await
            }
            ActionKind::Scroll => {
                let direction = step
                    .direction
                    .as_deref()
                    .ok_or_else(|| Error::Validation("scroll step missing direction".into()))?;
                self.driver.scroll(direction, step.amount).await
            }
            ActionKind::Keypress => {
                let key = step
                    .key
                    .as_deref()
                    .ok_or_else(|| Error::Validation("keypress step missing key".into()))?;
                self.driver.keypress(key).await
            }
            ActionKind::Screenshot => {
                let path = match &step.path {
                    Some(p) => Some(PathBuf::from(p)),
                    None => self.screenshot_dir.as_ref().map(|dir| {
                        let stamp = std::time::SystemTime::now()
                            .duration_since(std::time::UNIX_EPOCH)
                            .map(|d| d.as_millis())
                            .unwrap_or(0);
                        dir.join(format!("shot-{}.png", stamp))
                    }),
                };
                self.driver.screenshot(path.as_deref()).await
            }
            ActionKind::Navigate => {
                let url = step
                    .url
                    .as_deref()
                    .ok_or_else(|| Error::Validation("navigate step missing url".into()))?;
                let url = interpolate(url, variables)?;
                self.driver.open(&url).await
            }
            ActionKind::Wait => {
                let ms = step.duration.unwrap_or(1000);
                tokio::time::sleep(Duration::from_millis(ms)).await;
                Ok(())
            }
        }
    }

    fn resolve<'b>(
        &self,
        step: &Step,
        elements: &'b [ParsedElement],
    ) -> Result<&'b ParsedElement> {
        let target = step
            .target
            .as_ref()
            .ok_or_else(|| Error::Validation(format!("{} step missing target", step.action)))?;
        find_element_with_fallback(elements, target, &step.fallback_targets).ok_or_else(|| {
            Error::NotFound(format!(
                "no element matched {} ({} fallbacks tried)",
                target.describe(),
                step.fallback_targets.len()
            ))
        })
    }

    fn step_value(&self, step: &Step, variables: &BTreeMap<String, String>) -> Result<String> {
        let raw = step
            .value
            .as_deref()
            .ok_or_else(|| Error::Validation(format!("{} step missing value", step.action)))?;
        interpolate(raw, variables)
    }

    async fn take_elements(&self) -> Result<Vec<ParsedElement>> {
        let text = self
            .driver
            .snapshot(SnapshotOptions {
                interactive_only: true,
                compact: true,
            })
            .await?;
        Ok(parse_snapshot(&text))
    }

    /// Baseline pause plus an equal-sized random jitter, so replayed
    /// sequences do not tick at a machine-perfect cadence.
    async fn step_pause(&self) {
        let base = self.config.step_pause_ms;
        if base == 0 {
            return;
        }
        let jitter = rand::thread_rng().gen_range(0..=base);
        tokio::time::sleep(Duration::from_millis(base + jitter)).await;
    }

    async fn verify(&self, verification: &Verification) -> bool {
        let criteria = verification
            .wait_for
            .as_ref()
            .map(|w| w.criteria())
            .unwrap_or(&[]);
        if criteria.is_empty() {
            return true;
        }

        let timeout = verification.timeout.unwrap_or(self.config.default_timeout_ms);
        let interval = self.config.poll_interval_ms.max(1);
        let attempts = (timeout + interval - 1) / interval;

        tokio::time::sleep(Duration::from_millis(self.config.settle_delay_ms)).await;
        for attempt in 0..attempts {
            if attempt > 0 {
                tokio::time::sleep(Duration::from_millis(interval)).await;
            }
            // Full-text snapshot here: headings and static text count for
            // substring matching, unlike the interactive-only step snapshots.
            let text = match self
                .driver
                .snapshot(SnapshotOptions {
                    interactive_only: false,
                    compact: true,
                })
                .await
            {
                Ok(text) => text,
                Err(e) => {
                    warn!(attempt, error = %e, "Verification snapshot failed");
                    continue;
                }
            };
            let elements = parse_snapshot(&text);
            for criterion in criteria {
                if let Some(needle) = &criterion.text_contains {
                    if text.contains(needle.as_str()) {
                        debug!(needle = %needle, "Verification text matched");
                        return true;
                    }
                }
                if let Some(target) = &criterion.target {
                    if find_element(&elements, target).is_some() {
                        debug!(target = %target.describe(), "Verification target matched");
                        return true;
                    }
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::path::Path;
    use std::sync::Mutex;

    const LOGIN_PAGE: &str = r#"- heading "Sign in to Example" [level=1]
- textbox "Username" [ref=e1]
- textbox "Password" [ref=e2]
- button "Sign in" [ref=e3]
"#;

    const WELCOME_PAGE: &str = r#"- heading "Welcome, alice" [level=1]
- button "Log out" [ref=e1]
"#;

    #[derive(Default)]
    struct MockDriver {
        /// Snapshot texts served in order; the last one repeats.
        snapshots: Mutex<Vec<String>>,
        served: Mutex<usize>,
        calls: Mutex<Vec<String>>,
        fail_prefix: Mutex<Option<(String, usize)>>,
    }

    impl MockDriver {
        fn new(snapshots: &[&str]) -> Self {
            Self {
                snapshots: Mutex::new(snapshots.iter().map(|s| s.to_string()).collect()),
                ..Default::default()
            }
        }

        /// Fail the next `times` calls whose description starts with `prefix`.
        fn failing(self, prefix: &str, times: usize) -> Self {
            *self.fail_prefix.lock().unwrap() = Some((prefix.to_string(), times));
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn snapshots_served(&self) -> usize {
            *self.served.lock().unwrap()
        }

        fn record(&self, call: String) -> Result<()> {
            let mut guard = self.fail_prefix.lock().unwrap();
            if let Some((prefix, remaining)) = guard.as_mut() {
                if *remaining > 0 && call.starts_with(prefix.as_str()) {
                    *remaining -= 1;
                    return Err(Error::Driver(format!("injected failure: {}", call)));
                }
            }
            self.calls.lock().unwrap().push(call);
            Ok(())
        }
    }

    #[async_trait]
    impl BrowserDriver for MockDriver {
        async fn open(&self, url: &str) -> Result<()> {
            self.record(format!("open {}", url))
        }

        async fn click(&self, element_ref: &str) -> Result<()> {
            self.record(format!("click {}", element_ref))
        }

        async fn type_text(&self, element_ref: &str, text: &str) -> Result<()> {
            self.record(format!("type {} {}", element_ref, text))
        }

        async fn fill(&self, element_ref: &str, text: &str) -> Result<()> {
            self.record(format!("fill {} {}", element_ref, text))
        }

        async fn scroll(&self, direction: &str, amount: Option<i64>) -> Result<()> {
            self.record(format!("scroll {} {:?}", direction, amount))
        }

        async fn keypress(&self, key: &str) -> Result<()> {
            self.record(format!("press {}", key))
        }

        async fn screenshot(&self, path: Option<&Path>) -> Result<()> {
            self.record(format!("screenshot {:?}", path))
        }

        async fn snapshot(&self, _options: SnapshotOptions) -> Result<String> {
            let snapshots = self.snapshots.lock().unwrap();
            let mut served = self.served.lock().unwrap();
            let idx = (*served).min(snapshots.len().saturating_sub(1));
            *served += 1;
            snapshots
                .get(idx)
                .cloned()
                .ok_or_else(|| Error::Snapshot("no snapshot scripted".to_string()))
        }
    }

    fn fast_config() -> AutomationConfig {
        AutomationConfig {
            default_timeout_ms: 200,
            retry_on_failure: true,
            max_retries: 2,
            max_gotchas_per_section: 50,
            settle_delay_ms: 1,
            step_pause_ms: 0,
            retry_delay_ms: 1,
            poll_interval_ms: 10,
        }
    }

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn sequence(doc: serde_json::Value) -> Sequence {
        serde_json::from_value(doc).unwrap()
    }

    fn login_sequence() -> Sequence {
        sequence(json!({
            "name": "login",
            "steps": [
                {"action": "fill", "target": {"role": "textbox", "name": "Username"}, "value": "{{user}}"},
                {"action": "fill", "target": {"role": "textbox", "name": "Password"}, "value": "{{pass}}"},
                {"action": "click", "target": {"role": "button", "name": "Sign in"}}
            ],
            "verification": {"wait_for": {"text_contains": "Welcome"}, "timeout": 5000}
        }))
    }

    #[tokio::test]
    async fn test_login_end_to_end() {
        let driver = MockDriver::new(&[LOGIN_PAGE, LOGIN_PAGE, LOGIN_PAGE, WELCOME_PAGE]);
        let runner = SequenceRunner::new(&driver, fast_config());

        let result = runner
            .run(
                &login_sequence(),
                &vars(&[("user", "alice"), ("pass", "secret")]),
            )
            .await;

        assert!(result.success, "unexpected error: {:?}", result.error);
        assert_eq!(result.steps.len(), 3);
        assert!(result.steps.iter().all(|s| s.status == StepStatus::Ok));
        assert_eq!(
            driver.calls(),
            vec!["fill e1 alice", "fill e2 secret", "click e3"]
        );
    }

    #[tokio::test]
    async fn test_fallback_resolves_transparently() {
        let driver = MockDriver::new(&[LOGIN_PAGE]);
        let runner = SequenceRunner::new(&driver, fast_config());
        let seq = sequence(json!({
            "name": "press-login",
            "steps": [{
                "action": "click",
                "target": {"role": "button", "name": "Log in"},
                "fallbackTargets": [
                    {"role": "button", "name": "Submit"},
                    {"role": "button", "nameContains": "sign"}
                ]
            }]
        }));

        let result = runner.run(&seq, &BTreeMap::new()).await;

        assert!(result.success);
        assert_eq!(result.steps[0].status, StepStatus::Ok);
        assert_eq!(driver.calls(), vec!["click e3"]);
    }

    #[tokio::test]
    async fn test_retry_succeeds_after_transient_failure() {
        let driver = MockDriver::new(&[LOGIN_PAGE]).failing("click", 1);
        let runner = SequenceRunner::new(&driver, fast_config());
        let seq = sequence(json!({
            "name": "one-click",
            "steps": [{"action": "click", "target": {"role": "button", "name": "Sign in"}}]
        }));

        let result = runner.run(&seq, &BTreeMap::new()).await;

        assert!(result.success);
        assert_eq!(result.steps[0].status, StepStatus::OkRetry);
        assert_eq!(result.steps[0].status.as_str(), "ok (retry)");
        assert_eq!(driver.calls(), vec!["click e3"]);
    }

    #[tokio::test]
    async fn test_retry_disabled_fails_fast() {
        let driver = MockDriver::new(&[LOGIN_PAGE]).failing("click", 1);
        let mut config = fast_config();
        config.retry_on_failure = false;
        let runner = SequenceRunner::new(&driver, config);
        let seq = sequence(json!({
            "name": "click-then-shot",
            "steps": [
                {"action": "click", "target": {"role": "button", "name": "Sign in"}},
                {"action": "screenshot"}
            ]
        }));

        let result = runner.run(&seq, &BTreeMap::new()).await;

        assert!(!result.success);
        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.steps[0].status, StepStatus::Failed);
        let error = result.error.unwrap();
        assert!(error.contains("step 0"), "error was: {}", error);
        // The screenshot step never ran.
        assert!(driver.calls().is_empty());
    }

    #[tokio::test]
    async fn test_retries_exhausted_surface_step_index() {
        let driver = MockDriver::new(&[LOGIN_PAGE]).failing("click", 10);
        let runner = SequenceRunner::new(&driver, fast_config());
        let seq = sequence(json!({
            "name": "stubborn",
            "steps": [{"action": "click", "target": {"role": "button", "name": "Sign in"}}]
        }));

        let result = runner.run(&seq, &BTreeMap::new()).await;

        assert!(!result.success);
        let error = result.error.unwrap();
        assert!(error.contains("step 0 (click)"), "error was: {}", error);
        // Initial snapshot plus one refresh per retry.
        assert_eq!(driver.snapshots_served(), 3);
    }

    #[tokio::test]
    async fn test_missing_required_variable_fails_before_browser() {
        let driver = MockDriver::new(&[LOGIN_PAGE]);
        let runner = SequenceRunner::new(&driver, fast_config());
        let seq = sequence(json!({
            "name": "login",
            "steps": [{"action": "fill", "target": {"role": "textbox", "name": "Username"}, "value": "{{user}}"}],
            "variables": {"user": {"type": "string", "required": true, "description": "account name"}}
        }));

        let result = runner.run(&seq, &BTreeMap::new()).await;

        assert!(!result.success);
        let error = result.error.unwrap();
        assert!(error.contains("'user'"));
        assert!(error.contains("account name"));
        assert_eq!(driver.snapshots_served(), 0);
        assert!(driver.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unbound_variable_aborts_without_retry() {
        let driver = MockDriver::new(&[LOGIN_PAGE]);
        let runner = SequenceRunner::new(&driver, fast_config());
        let seq = sequence(json!({
            "name": "typo",
            "steps": [{"action": "fill", "target": {"role": "textbox", "name": "Username"}, "value": "{{ghost}}"}]
        }));

        let result = runner.run(&seq, &BTreeMap::new()).await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("ghost"));
        assert!(driver.calls().is_empty());
        // No retry means no extra snapshot beyond the initial one.
        assert_eq!(driver.snapshots_served(), 1);
    }

    #[tokio::test]
    async fn test_verification_polls_until_text_appears() {
        let blank = "- button \"Reload\" [ref=e1]\n";
        let done = "- heading \"Upload Done\" [level=1]\n";
        let driver = MockDriver::new(&[blank, blank, done]);
        let runner = SequenceRunner::new(&driver, fast_config());
        let seq = sequence(json!({
            "name": "watch",
            "steps": [{"action": "wait", "duration": 1}],
            "verification": {"wait_for": {"text_contains": "Done"}, "timeout": 200}
        }));

        let result = runner.run(&seq, &BTreeMap::new()).await;
        assert!(result.success, "unexpected error: {:?}", result.error);
        assert!(driver.snapshots_served() >= 3);
    }

    #[tokio::test]
    async fn test_required_verification_times_out_as_failure() {
        let driver = MockDriver::new(&[LOGIN_PAGE]);
        let mut config = fast_config();
        config.default_timeout_ms = 50;
        let runner = SequenceRunner::new(&driver, config);
        let seq = sequence(json!({
            "name": "watch",
            "steps": [{"action": "wait", "duration": 1}],
            "verification": {"wait_for": {"text_contains": "Never There"}}
        }));

        let result = runner.run(&seq, &BTreeMap::new()).await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("verification failed"));
        // The step trace is still complete.
        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.steps[0].status, StepStatus::Ok);
    }

    #[tokio::test]
    async fn test_optional_verification_soft_passes() {
        let driver = MockDriver::new(&[LOGIN_PAGE]);
        let mut config = fast_config();
        config.default_timeout_ms = 30;
        let runner = SequenceRunner::new(&driver, config);
        let seq = sequence(json!({
            "name": "watch",
            "steps": [{"action": "wait", "duration": 1}],
            "verification": {"wait_for": {"text_contains": "Never There"}, "required": false}
        }));

        let result = runner.run(&seq, &BTreeMap::new()).await;
        assert!(result.success);
    }

    #[tokio::test]
    async fn test_verification_structural_target() {
        let after = "- button \"Close\" [ref=e9]\n";
        let driver = MockDriver::new(&[LOGIN_PAGE, after]);
        let runner = SequenceRunner::new(&driver, fast_config());
        let seq = sequence(json!({
            "name": "watch",
            "steps": [{"action": "wait", "duration": 1}],
            "verification": {"wait_for": {"target": {"role": "button", "name": "Close"}}, "timeout": 100}
        }));

        let result = runner.run(&seq, &BTreeMap::new()).await;
        assert!(result.success, "unexpected error: {:?}", result.error);
    }

    #[tokio::test]
    async fn test_invalid_sequence_never_touches_driver() {
        let driver = MockDriver::new(&[LOGIN_PAGE]);
        let runner = SequenceRunner::new(&driver, fast_config());
        let seq = sequence(json!({"steps": [{"action": "click"}]}));

        let result = runner.run(&seq, &BTreeMap::new()).await;

        assert!(!result.success);
        let error = result.error.unwrap();
        assert!(error.contains("validation"));
        assert!(error.contains("click requires a target"));
        assert_eq!(driver.snapshots_served(), 0);
    }

    #[tokio::test]
    async fn test_simple_action_dispatch() {
        let driver = MockDriver::new(&[LOGIN_PAGE]);
        let runner = SequenceRunner::new(&driver, fast_config());
        let seq = sequence(json!({
            "name": "misc",
            "steps": [
                {"action": "navigate", "url": "https://example.com/{{page}}"},
                {"action": "scroll", "direction": "down", "amount": 500},
                {"action": "keypress", "key": "Enter"},
                {"action": "screenshot", "path": "/tmp/shot.png"},
                {"action": "wait", "duration": 1}
            ]
        }));

        let result = runner.run(&seq, &vars(&[("page", "feed")])).await;

        assert!(result.success, "unexpected error: {:?}", result.error);
        assert_eq!(
            driver.calls(),
            vec![
                "open https://example.com/feed",
                "scroll down Some(500)",
                "press Enter",
                "screenshot Some(\"/tmp/shot.png\")",
            ]
        );
    }

    #[tokio::test]
    async fn test_runtime_field_errors_name_the_field() {
        let driver = MockDriver::new(&[LOGIN_PAGE]);
        let mut config = fast_config();
        config.retry_on_failure = false;
        let runner = SequenceRunner::new(&driver, config);
        let seq = sequence(json!({
            "name": "bad-scroll",
            "steps": [{"action": "scroll"}]
        }));

        let result = runner.run(&seq, &BTreeMap::new()).await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("missing direction"));
    }
}
