mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "sitepilot")]
#[command(about = "Deterministic browser sequences backed by per-site knowledge", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize sitepilot configuration and data directories
    Onboard {
        /// Force overwrite existing configuration
        #[arg(long)]
        force: bool,
    },

    /// Show current configuration status
    Status,

    /// Run a stored sequence against the browser
    Run {
        /// Sequence name (looked up under the sequences directory)
        name: String,

        /// Variable binding, repeatable (e.g. --var user=alice)
        #[arg(long = "var", value_name = "KEY=VALUE")]
        vars: Vec<String>,

        /// URL to open before the first step
        #[arg(long)]
        url: Option<String>,

        /// Feed the outcome back into site knowledge (needs --url)
        #[arg(long)]
        learn: bool,

        /// Print the execution report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage stored sequences
    Sequences {
        #[command(subcommand)]
        command: SequencesCommands,
    },

    /// Manage per-site knowledge
    Knowledge {
        #[command(subcommand)]
        command: KnowledgeCommands,
    },
}

#[derive(Subcommand)]
enum SequencesCommands {
    /// List stored sequences
    List,
    /// Print a sequence definition
    Show {
        /// Sequence name
        name: String,
    },
    /// Check a sequence file without running it
    Validate {
        /// Sequence name
        name: String,
    },
}

#[derive(Subcommand)]
enum KnowledgeCommands {
    /// List domains with stored knowledge
    List,
    /// Print the stored record for a domain
    Show {
        /// Domain (e.g. github.com)
        domain: String,
    },
    /// Show the merged knowledge view for a full URL
    Resolve {
        /// Page URL
        url: String,
    },
    /// Record a gotcha for a URL
    Gotcha {
        /// Page URL
        url: String,
        /// Gotcha text
        text: String,
        /// Pattern section to record under (base record when omitted)
        #[arg(long)]
        section: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Onboard { force } => {
            commands::onboard::run(force).await?;
        }
        Commands::Status => {
            commands::status::run().await?;
        }
        Commands::Run {
            name,
            vars,
            url,
            learn,
            json,
        } => {
            commands::run_cmd::run(&name, vars, url, learn, json).await?;
        }
        Commands::Sequences { command } => match command {
            SequencesCommands::List => {
                commands::sequences_cmd::list().await?;
            }
            SequencesCommands::Show { name } => {
                commands::sequences_cmd::show(&name).await?;
            }
            SequencesCommands::Validate { name } => {
                commands::sequences_cmd::validate(&name).await?;
            }
        },
        Commands::Knowledge { command } => match command {
            KnowledgeCommands::List => {
                commands::knowledge_cmd::list().await?;
            }
            KnowledgeCommands::Show { domain } => {
                commands::knowledge_cmd::show(&domain).await?;
            }
            KnowledgeCommands::Resolve { url } => {
                commands::knowledge_cmd::resolve(&url).await?;
            }
            KnowledgeCommands::Gotcha { url, text, section } => {
                commands::knowledge_cmd::gotcha(&url, &text, section).await?;
            }
        },
    }

    Ok(())
}
