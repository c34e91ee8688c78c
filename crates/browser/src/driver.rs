//! Boundary to the external browser driver process.
//!
//! The execution engine only ever talks to the `BrowserDriver` trait; the
//! bundled `CliDriver` shells out to a driver binary, one subprocess per
//! primitive.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use sitepilot_core::{Error, Result};

/// Flags for the snapshot primitive. Interactive-only trims the dump to
/// elements with refs; compact drops empty structural nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotOptions {
    pub interactive_only: bool,
    pub compact: bool,
}

#[async_trait]
pub trait BrowserDriver: Send + Sync {
    async fn open(&self, url: &str) -> Result<()>;
    async fn click(&self, element_ref: &str) -> Result<()>;
    /// Appends text at the element (keeps existing content).
    async fn type_text(&self, element_ref: &str, text: &str) -> Result<()>;
    /// Replaces the element's content with text.
    async fn fill(&self, element_ref: &str, text: &str) -> Result<()>;
    async fn scroll(&self, direction: &str, amount: Option<i64>) -> Result<()>;
    async fn keypress(&self, key: &str) -> Result<()>;
    async fn screenshot(&self, path: Option<&Path>) -> Result<()>;
    async fn snapshot(&self, options: SnapshotOptions) -> Result<String>;
}

/// Drives the browser through the driver CLI (`agent-browser` by default).
#[derive(Debug)]
pub struct CliDriver {
    binary: PathBuf,
    session: Option<String>,
}

impl CliDriver {
    /// Resolves the driver binary at construction; a missing install
    /// surfaces here, not mid-sequence.
    pub fn new(binary: &str, session: Option<String>) -> Result<Self> {
        let resolved = if Path::new(binary).is_absolute() {
            let path = PathBuf::from(binary);
            if !path.exists() {
                return Err(Error::Driver(format!(
                    "browser driver not found at {}",
                    path.display()
                )));
            }
            path
        } else {
            which::which(binary).map_err(|_| {
                Error::Driver(format!("browser driver '{}' not found on PATH", binary))
            })?
        };
        Ok(Self {
            binary: resolved,
            session,
        })
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    async fn run(&self, args: Vec<String>) -> Result<String> {
        let mut cmd = Command::new(&self.binary);
        if let Some(session) = &self.session {
            cmd.arg("--session").arg(session);
        }
        cmd.args(&args);
        cmd.stdin(Stdio::null());

        debug!(driver = %self.binary.display(), args = ?args, "Invoking browser driver");
        let output = cmd
            .output()
            .await
            .map_err(|e| Error::Driver(format!("failed to spawn driver: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let verb = args.first().map(|s| s.as_str()).unwrap_or("?");
            return Err(Error::Driver(format!(
                "driver {} failed: {}",
                verb,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl BrowserDriver for CliDriver {
    async fn open(&self, url: &str) -> Result<()> {
        self.run(vec!["open".to_string(), url.to_string()])
            .await
            .map(|_| ())
    }

    async fn click(&self, element_ref: &str) -> Result<()> {
        self.run(vec!["click".to_string(), element_ref.to_string()])
            .await
            .map(|_| ())
    }

    async fn type_text(&self, element_ref: &str, text: &str) -> Result<()> {
        self.run(vec![
            "type".to_string(),
            element_ref.to_string(),
            text.to_string(),
        ])
        .await
        .map(|_| ())
    }

    async fn fill(&self, element_ref: &str, text: &str) -> Result<()> {
        self.run(vec![
            "fill".to_string(),
            element_ref.to_string(),
            text.to_string(),
        ])
        .await
        .map(|_| ())
    }

    async fn scroll(&self, direction: &str, amount: Option<i64>) -> Result<()> {
        let mut args = vec!["scroll".to_string(), direction.to_string()];
        if let Some(amount) = amount {
            args.push(amount.to_string());
        }
        self.run(args).await.map(|_| ())
    }

    async fn keypress(&self, key: &str) -> Result<()> {
        self.run(vec!["press".to_string(), key.to_string()])
            .await
            .map(|_| ())
    }

    async fn screenshot(&self, path: Option<&Path>) -> Result<()> {
        let mut args = vec!["screenshot".to_string()];
        if let Some(path) = path {
            args.push(path.display().to_string());
        }
        self.run(args).await.map(|_| ())
    }

    async fn snapshot(&self, options: SnapshotOptions) -> Result<String> {
        let mut args = vec!["snapshot".to_string()];
        if options.interactive_only {
            args.push("--interactive-only".to_string());
        }
        if options.compact {
            args.push("--compact".to_string());
        }
        self.run(args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_fails_fast() {
        let err = CliDriver::new("/definitely/not/here/agent-browser", None).unwrap_err();
        assert!(err.to_string().contains("not found"));

        let err = CliDriver::new("sitepilot-test-no-such-driver", None).unwrap_err();
        assert!(err.to_string().contains("not found on PATH"));
    }

    #[test]
    fn test_absolute_path_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("agent-browser");
        std::fs::write(&bin, "").unwrap();

        let driver = CliDriver::new(bin.to_str().unwrap(), Some("work".to_string())).unwrap();
        assert_eq!(driver.binary(), bin.as_path());
    }
}
