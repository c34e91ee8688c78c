use sitepilot_core::{Config, Paths};
use std::io::{self, Write};

const EXAMPLE_SEQUENCE: &str = r#"{
  "name": "example-login",
  "description": "Sign in with username and password",
  "steps": [
    { "action": "navigate", "url": "https://example.com/login" },
    {
      "action": "fill",
      "target": { "role": "textbox", "name": "Username" },
      "value": "{{user}}"
    },
    {
      "action": "fill",
      "target": { "role": "textbox", "name": "Password" },
      "value": "{{pass}}"
    },
    {
      "action": "click",
      "target": { "role": "button", "name": "Sign in" },
      "fallbackTargets": [
        { "role": "button", "name": "Log in" },
        { "role": "button", "nameContains": "sign" }
      ]
    }
  ],
  "variables": {
    "user": { "type": "string", "required": true, "description": "account name" },
    "pass": { "type": "string", "required": true, "description": "account password" }
  },
  "verification": {
    "wait_for": { "text_contains": "Welcome" },
    "timeout": 10000
  }
}
"#;

pub async fn run(force: bool) -> anyhow::Result<()> {
    let paths = Paths::new();

    // Check if config exists
    if paths.config_file().exists() && !force {
        print!("Config already exists. Overwrite? [y/N] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    // Create directories
    paths.ensure_dirs()?;

    // Write the default config with every knob spelled out
    Config::default().save(&paths.config_file())?;
    println!("✓ Created config: {}", paths.config_file().display());

    // Seed an example sequence so `run` has something to chew on
    write_if_not_exists(
        &paths.sequences_dir().join("example-login.json"),
        EXAMPLE_SEQUENCE,
    )?;

    println!("✓ Data directories: {}", paths.base.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to point driver.binary at your browser CLI", paths.config_file().display());
    println!("  2. Run `sitepilot status` to verify the setup");
    println!("  3. Run `sitepilot run example-login --var user=alice --var pass=...`");

    Ok(())
}

fn write_if_not_exists(path: &std::path::Path, content: &str) -> io::Result<()> {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        println!("  ✓ Created {}", path.file_name().unwrap().to_string_lossy());
    }
    Ok(())
}
