use sitepilot_core::Paths;
use sitepilot_engine::{list_sequences, load_sequence, validate_sequence};

pub async fn list() -> anyhow::Result<()> {
    let paths = Paths::new();
    let names = list_sequences(&paths.sequences_dir());

    if names.is_empty() {
        println!("(No sequences. Drop JSON files under {})", paths.sequences_dir().display());
        return Ok(());
    }

    println!();
    println!("Sequences ({})", names.len());
    for name in &names {
        println!("  {}", name);
    }
    Ok(())
}

pub async fn show(name: &str) -> anyhow::Result<()> {
    let paths = Paths::new();
    let sequence = load_sequence(&paths.sequences_dir(), name)?;
    println!("{}", serde_json::to_string_pretty(&sequence)?);
    Ok(())
}

pub async fn validate(name: &str) -> anyhow::Result<()> {
    let paths = Paths::new();
    let sequence = load_sequence(&paths.sequences_dir(), name)?;
    let report = validate_sequence(&sequence);

    if report.valid {
        println!("✓ {} is valid ({} steps)", sequence.name, sequence.steps.len());
        return Ok(());
    }

    println!("✗ {} has problems:", name);
    for error in &report.errors {
        println!("  - {}", error);
    }
    std::process::exit(1);
}
