mod cmd_auto;
mod cmd_catalog;
mod cmd_config;
mod cmd_play;
mod cmd_validate;
mod load;
mod render;
mod script;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pmsim", version, about = "Project-manager decision simulator")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the decisions of a content catalog
    Catalog {
        /// Catalog file (.json/.yaml); the bundled scenario when omitted
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check a catalog (and optional config) for authoring mistakes
    Validate {
        /// Catalog file (.json/.yaml); the bundled scenario when omitted
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Simulation config (.json/.yaml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Run a scripted playthrough and print its post-mortem
    Play {
        /// Script file (.json/.yaml)
        script: PathBuf,
        #[arg(long)]
        catalog: Option<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Play through by always taking the first available option
    Auto {
        /// Project name
        #[arg(long)]
        name: String,
        /// Team headcount
        #[arg(long, default_value_t = 5)]
        team_size: u32,
        /// Business domain (e.g. fintech)
        #[arg(long, default_value = "saas")]
        domain: String,
        #[arg(long)]
        catalog: Option<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the resolved simulation config
    Config {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.cmd {
        Command::Catalog { catalog, json } => cmd_catalog::execute(catalog.as_deref(), json),
        Command::Validate { catalog, config } => {
            cmd_validate::execute(catalog.as_deref(), config.as_deref())
        }
        Command::Play {
            script,
            catalog,
            config,
            json,
        } => cmd_play::execute(&cmd_play::PlayParams {
            script: &script,
            catalog: catalog.as_deref(),
            config: config.as_deref(),
            json,
        }),
        Command::Auto {
            name,
            team_size,
            domain,
            catalog,
            config,
            json,
        } => cmd_auto::execute(&cmd_auto::AutoParams {
            name: &name,
            team_size,
            domain: &domain,
            catalog: catalog.as_deref(),
            config: config.as_deref(),
            json,
        }),
        Command::Config { config } => cmd_config::execute(config.as_deref()),
    }
}
