use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Paths {
    pub base: PathBuf,
}

impl Paths {
    pub fn new() -> Self {
        let base = dirs::home_dir()
            .map(|h| h.join(".sitepilot"))
            .unwrap_or_else(|| PathBuf::from(".sitepilot"));
        Self { base }
    }

    pub fn with_base(base: PathBuf) -> Self {
        Self { base }
    }

    pub fn config_file(&self) -> PathBuf {
        self.base.join("config.json")
    }

    pub fn knowledge_dir(&self) -> PathBuf {
        self.base.join("knowledge")
    }

    pub fn sequences_dir(&self) -> PathBuf {
        self.base.join("sequences")
    }

    pub fn screenshots_dir(&self) -> PathBuf {
        self.base.join("screenshots")
    }

    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.base)?;
        std::fs::create_dir_all(self.knowledge_dir())?;
        std::fs::create_dir_all(self.sequences_dir())?;
        std::fs::create_dir_all(self.screenshots_dir())?;
        Ok(())
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}
