mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod logging;
mod services;
mod workflow;

use clap::{ArgAction, Parser, Subcommand};
use tracing::warn;

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::generate::{self, GenerateArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;

#[derive(Parser)]
#[command(
    name = "storygen",
    author,
    version,
    about = "Turn a task or bug description into a Jira-style story or bug ticket"
)]
struct Cli {
    /// Increase log output on stderr (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a ticket from a free-text description.
    Generate(GenerateArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Config(args) => config_cmd::run(args.command),
        Commands::Generate(args) => run_generate(args).await,
    }
}

async fn run_generate(args: GenerateArgs) -> AppResult<()> {
    let config = AppConfig::load()?;

    if config.api_key.is_none() {
        warn!("OpenAI API key not configured; tickets are generated from local templates.");
    }

    let context = AppContext::from_config(config);
    generate::run(&context, args).await
}
