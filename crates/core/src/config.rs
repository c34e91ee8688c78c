use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::paths::Paths;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationConfig {
    /// Upper bound for verification polling when a sequence does not set one.
    #[serde(default = "default_timeout_ms")]
    pub default_timeout_ms: u64,
    #[serde(default = "default_retry_on_failure")]
    pub retry_on_failure: bool,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_max_gotchas")]
    pub max_gotchas_per_section: usize,
    /// Pause after navigate/click so the page can settle before the next snapshot.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Base pause between steps; the executor adds a random jitter of the same size.
    #[serde(default = "default_step_pause_ms")]
    pub step_pause_ms: u64,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_timeout_ms() -> u64 {
    30000
}

fn default_retry_on_failure() -> bool {
    true
}

fn default_max_retries() -> u32 {
    2
}

fn default_max_gotchas() -> usize {
    50
}

fn default_settle_delay_ms() -> u64 {
    500
}

fn default_step_pause_ms() -> u64 {
    250
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_poll_interval_ms() -> u64 {
    1000
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: default_timeout_ms(),
            retry_on_failure: default_retry_on_failure(),
            max_retries: default_max_retries(),
            max_gotchas_per_section: default_max_gotchas(),
            settle_delay_ms: default_settle_delay_ms(),
            step_pause_ms: default_step_pause_ms(),
            retry_delay_ms: default_retry_delay_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverConfig {
    /// Browser driver binary, resolved via PATH unless absolute.
    #[serde(default = "default_driver_binary")]
    pub binary: String,
    /// Named driver session to attach to. None = the driver's default session.
    #[serde(default)]
    pub session: Option<String>,
}

fn default_driver_binary() -> String {
    "agent-browser".to_string()
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            binary: default_driver_binary(),
            session: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub automation: AutomationConfig,
    #[serde(default)]
    pub driver: DriverConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn load_or_default(paths: &Paths) -> Result<Self> {
        let config_path = paths.config_file();
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}
