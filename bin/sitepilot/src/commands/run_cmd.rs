use std::collections::BTreeMap;
use std::time::Duration;

use sitepilot_browser::{BrowserDriver, CliDriver};
use sitepilot_core::{Config, Paths};
use sitepilot_engine::{load_sequence, SequenceRunner, StepStatus};
use sitepilot_knowledge::{apply_learnings, KeywordClassifier, KnowledgeStore, ResultClassifier};

pub async fn run(
    name: &str,
    vars: Vec<String>,
    url: Option<String>,
    learn: bool,
    json: bool,
) -> anyhow::Result<()> {
    let paths = Paths::new();
    let config = Config::load_or_default(&paths)?;

    let variables = parse_vars(&vars)?;
    let sequence = load_sequence(&paths.sequences_dir(), name)?;

    let driver = CliDriver::new(&config.driver.binary, config.driver.session.clone())?;
    if let Some(url) = &url {
        driver.open(url).await?;
        tokio::time::sleep(Duration::from_millis(config.automation.settle_delay_ms)).await;
    }

    let runner = SequenceRunner::new(&driver, config.automation.clone())
        .with_screenshot_dir(paths.screenshots_dir());
    let result = runner.run(&sequence, &variables).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        for step in &result.steps {
            let mark = match step.status {
                StepStatus::Failed => "✗",
                _ => "✓",
            };
            let label = step.description.as_deref().unwrap_or(step.action.as_str());
            println!(
                "  {} step {:<2} {:<11} {:<40} {} ms",
                mark,
                step.index,
                step.status.as_str(),
                label,
                step.duration_ms
            );
            if let Some(error) = &step.error {
                println!("        {}", error);
            }
        }
        println!();
        if result.success {
            println!("✓ {} completed", sequence.name);
        } else {
            println!(
                "✗ {} failed: {}",
                sequence.name,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    if learn {
        match &url {
            Some(url) => {
                let store = KnowledgeStore::new(
                    paths.knowledge_dir(),
                    config.automation.max_gotchas_per_section,
                );
                let output = match &result.error {
                    Some(error) => error.clone(),
                    None => "completed successfully".to_string(),
                };
                let analysis = KeywordClassifier.classify(&output, url, Some(&sequence.name));
                let outcome = apply_learnings(&store, url, &analysis);
                println!(
                    "📝 Verdict: {} ({} gotchas added, {} tasks updated)",
                    analysis.verdict.as_str(),
                    outcome.gotchas_added,
                    outcome.tasks_updated
                );
            }
            None => {
                println!("⚠ --learn needs --url to know which site to update");
            }
        }
    }

    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}

fn parse_vars(pairs: &[String]) -> anyhow::Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("invalid --var '{}', expected KEY=VALUE", pair))?;
        map.insert(key.trim().to_string(), value.to_string());
    }
    Ok(map)
}
