//! CLI argument definitions for notefall.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "notefall")]
#[command(about = "Falling-note rhythm game simulator", version)]
pub struct Args {
    /// Game config file (TOML); defaults are used when absent
    #[arg(long, global = true, value_name = "FILE", env = "NOTEFALL_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show how a song is split into timed note groups
    Schedule {
        /// Song file (JSON array of note records)
        notes: PathBuf,
        /// Delay before the first group, in milliseconds
        #[arg(long, default_value = "0")]
        offset: u64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replay a song against a scripted key sequence in simulated time
    Simulate {
        /// Song file (JSON array of note records)
        notes: PathBuf,
        /// Key script (JSON array of key events); no input when omitted
        #[arg(short, long, value_name = "FILE")]
        inputs: Option<PathBuf>,
        /// Ticks allowed after the song ends before giving up
        #[arg(long)]
        max_ticks: Option<u64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Play a song live from the keyboard (d f j k, p to pause, q to quit)
    Play {
        /// Song file (JSON array of note records)
        notes: PathBuf,
    },
}
