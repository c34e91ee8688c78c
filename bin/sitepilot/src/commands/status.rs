use sitepilot_browser::CliDriver;
use sitepilot_core::{Config, Paths};
use sitepilot_engine::list_sequences;
use sitepilot_knowledge::KnowledgeStore;

pub async fn run() -> anyhow::Result<()> {
    let paths = Paths::new();

    println!("sitepilot status");
    println!("================");
    println!();

    // Config
    let config_path = paths.config_file();
    let config_exists = config_path.exists();
    println!(
        "Config:      {} {}",
        config_path.display(),
        if config_exists { "✓" } else { "✗ (not found)" }
    );

    if !config_exists {
        println!();
        println!("Run `sitepilot onboard` to initialize.");
        return Ok(());
    }

    let config = Config::load_or_default(&paths)?;

    // Driver binary
    match CliDriver::new(&config.driver.binary, config.driver.session.clone()) {
        Ok(driver) => {
            println!("Driver:      {} ✓", driver.binary().display());
        }
        Err(e) => {
            println!("Driver:      {} ✗ ({})", config.driver.binary, e);
        }
    }
    if let Some(session) = &config.driver.session {
        println!("Session:     {}", session);
    }

    // Automation knobs
    println!();
    println!("Automation:");
    println!("  {:<22} {} ms", "default timeout", config.automation.default_timeout_ms);
    println!(
        "  {:<22} {}",
        "retry on failure",
        if config.automation.retry_on_failure {
            format!("✓ (max {} retries)", config.automation.max_retries)
        } else {
            "✗".to_string()
        }
    );
    println!("  {:<22} {} ms", "settle delay", config.automation.settle_delay_ms);
    println!("  {:<22} {} ms", "poll interval", config.automation.poll_interval_ms);

    // Stored data
    let store = KnowledgeStore::new(
        paths.knowledge_dir(),
        config.automation.max_gotchas_per_section,
    );
    let domains = store.list_domains();
    let sequences = list_sequences(&paths.sequences_dir());

    println!();
    println!("Knowledge:   {} ({} domains)", paths.knowledge_dir().display(), domains.len());
    println!("Sequences:   {} ({} stored)", paths.sequences_dir().display(), sequences.len());
    println!("Screenshots: {}", paths.screenshots_dir().display());

    Ok(())
}
