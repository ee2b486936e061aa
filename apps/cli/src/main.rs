//! `mqf`: provision and decommission managed message brokers.
//!
//! ```bash
//! mqf mq-create mq1 --group east --create-container c1,c2
//! mqf container-delete c1
//! mqf --config fabric.toml -vv shell
//! ```

mod cli;
mod commands;
mod output;
mod prompt;
mod shell;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command};
use mqf::Fabric;
use mqf::domain::config::FabricSettings;
use mqf::kernel::config::load_settings;
use mqf_logger::Logger;
use output::Output;
use prompt::ConsolePrompt;
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let settings = load_settings(cli.config.as_deref()).context("Configuration is malformed")?;
    let _logger = init_logger(&settings, cli.verbose)?;

    let prompt = Arc::new(ConsolePrompt::new());
    let fabric = Fabric::builder()
        .settings(settings)
        .prompt(prompt.clone())
        .build()
        .await
        .context("Failed to connect to the fabric")?;

    let mut out = Output::new(cli.json);
    let outcome = match &cli.command {
        Command::Shell => shell::run(&fabric, &prompt, &mut out).await?,
        command => commands::execute(&fabric, command, &mut out).await?,
    };
    Ok(outcome.exit_code())
}

fn init_logger(settings: &FabricSettings, verbosity: u8) -> anyhow::Result<Logger> {
    let log = &settings.log;
    let builder = Logger::builder()
        .name(env!("CARGO_BIN_NAME"))
        .level_name(&log.level)?
        .verbosity(verbosity)
        .json(log.json);

    let logger = match &log.path {
        Some(path) => builder.path(path).init()?,
        None => builder.init()?,
    };
    Ok(logger)
}
