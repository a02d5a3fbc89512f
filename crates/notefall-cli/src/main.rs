mod cli;
mod cli_utils;
mod commands;
mod display;
mod input;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Args, Command};

fn main() -> Result<()> {
    // Logs go to stderr so JSON output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("notefall=warn,notefall_core=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = cli_utils::load_config(args.config.as_deref());

    match args.command {
        Command::Schedule {
            notes,
            offset,
            json,
        } => commands::schedule::run(&config, &notes, offset, json),
        Command::Simulate {
            notes,
            inputs,
            max_ticks,
            json,
        } => commands::simulate::run(config, &notes, inputs.as_deref(), max_ticks, json),
        Command::Play { notes } => commands::play::run(config, &notes),
    }
}
