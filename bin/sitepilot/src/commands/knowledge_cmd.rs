use sitepilot_core::{Config, Paths};
use sitepilot_knowledge::KnowledgeStore;

fn open_store() -> anyhow::Result<KnowledgeStore> {
    let paths = Paths::new();
    let config = Config::load_or_default(&paths)?;
    Ok(KnowledgeStore::new(
        paths.knowledge_dir(),
        config.automation.max_gotchas_per_section,
    ))
}

pub async fn list() -> anyhow::Result<()> {
    let store = open_store()?;
    let domains = store.list_domains();

    if domains.is_empty() {
        println!("(No site knowledge yet. It accumulates from runs and `knowledge gotcha`.)");
        return Ok(());
    }

    println!();
    println!("Domains ({})", domains.len());
    for domain in &domains {
        let sections = store
            .load_domain(domain)
            .map(|record| 1 + record.patterns.len())
            .unwrap_or(0);
        println!("  {:<30} {} sections", domain, sections);
    }
    Ok(())
}

pub async fn show(domain: &str) -> anyhow::Result<()> {
    let store = open_store()?;
    match store.load_domain(domain) {
        Some(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        None => {
            println!("No knowledge stored for '{}'.", domain);
            println!("Use `sitepilot knowledge gotcha <url> <text>` to start a record.");
            Ok(())
        }
    }
}

pub async fn resolve(url: &str) -> anyhow::Result<()> {
    let store = open_store()?;
    let resolved = match store.load_knowledge(url) {
        Some(resolved) => resolved,
        None => {
            println!("No knowledge matches {}", url);
            return Ok(());
        }
    };

    println!();
    println!("🔍 {} (sections: {})", resolved.domain, resolved.matched_patterns.join(", "));
    if let Some(description) = &resolved.description {
        println!("   {}", description);
    }

    if !resolved.elements.is_empty() {
        println!();
        println!("Elements:");
        for (name, info) in &resolved.elements {
            let how = info
                .ref_name
                .as_deref()
                .or(info.selector.as_deref())
                .unwrap_or("-");
            match &info.note {
                Some(note) => println!("  {:<24} {:<28} {}", name, how, note),
                None => println!("  {:<24} {}", name, how),
            }
        }
    }

    if let Some(editor) = &resolved.editor {
        println!();
        println!(
            "Editor: {} via {}",
            editor.kind.as_deref().unwrap_or("unknown"),
            editor.input_method.as_deref().unwrap_or("unspecified input")
        );
    }

    if !resolved.tasks.is_empty() {
        println!();
        println!("Tasks:");
        for (name, task) in &resolved.tasks {
            println!(
                "  {:<24} {}✓ / {}✗ (last success: {})",
                name,
                task.success_count,
                task.failure_count,
                task.last_success.as_deref().unwrap_or("never")
            );
        }
    }

    if !resolved.gotchas.is_empty() {
        println!();
        println!("Gotchas:");
        for gotcha in &resolved.gotchas {
            println!("  ⚠ {}", gotcha);
        }
    }

    Ok(())
}

pub async fn gotcha(url: &str, text: &str, section: Option<String>) -> anyhow::Result<()> {
    let store = open_store()?;
    if store.add_gotcha(url, text, section.as_deref()) {
        println!("✓ Recorded gotcha for {}", url);
    } else {
        println!("Not added (duplicate, section full, or unrecognized URL).");
    }
    Ok(())
}
