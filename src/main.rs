use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod config;
mod console;
mod directory;
mod enrich;
mod lodestone;
mod models;
mod progress;
mod register;
mod report;
mod resolver;
mod roster;

use config::{Cli, Settings};
use console::Console;
use lodestone::LodestoneClient;
use progress::ConsoleProgress;
use register::RunOutcome;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    println!("FreeCompanyRegister - v{}", env!("CARGO_PKG_VERSION"));

    match run(cli).await {
        Ok(outcome) if outcome.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            println!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<RunOutcome> {
    let working_dir = std::env::current_dir().context("failed to read the working directory")?;
    let (settings, warnings) = Settings::from_cli(cli, working_dir);
    for warning in &warnings {
        println!("{warning}");
    }
    println!("Lodestone language: {}", settings.region);

    let client = LodestoneClient::new(settings.region).context("failed to build the HTTP client")?;
    let mut console = Console::stdio();
    let mut progress = ConsoleProgress::stdout();

    register::run(&client, &settings, &mut console, &mut progress).await
}
