// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Orbit CLI
//!
//! Developer tooling for constellation levels: classify an edge list, replay
//! a link script through a level session, inspect or install level files.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use orbit_graph::Edge;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod commands;
mod output;
mod script;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config directory for installed levels and prefs (defaults to the platform config dir)
    #[clap(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Command to execute
    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a set of links against a level's constellation
    Check {
        /// Level JSON file, or the name of an installed level
        level: String,
        /// Live links as `a-b`, comma separated (e.g. `1-2,2-3`)
        #[clap(long, value_delimiter = ',')]
        edges: Vec<Edge>,
        /// Emit a JSON report instead of text
        #[clap(long)]
        json: bool,
    },
    /// Replay a link script through a level session
    Play {
        /// Level JSON file, or the name of an installed level
        level: String,
        /// Script file with `link a b`, `unlink a b` and `clear s` lines
        script: PathBuf,
        /// Emit one JSON record per step instead of text
        #[clap(long)]
        json: bool,
        /// Simulated time between steps, in milliseconds (drives notice expiry and coalescing)
        #[clap(long, default_value_t = 1000)]
        step_ms: u64,
    },
    /// Print a level's rule
    Show {
        /// Level JSON file, or the name of an installed level
        level: String,
    },
    /// Validate a level file and store it in the config dir
    Install {
        /// Level JSON file
        file: PathBuf,
    },
}

fn init_tracing(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.verbose)?;
    let config_dir = args.config_dir.as_deref();

    match args.cmd {
        Command::Check { level, edges, json } => {
            commands::check(&level, &edges, json, config_dir)
        }
        Command::Play {
            level,
            script,
            json,
            step_ms,
        } => commands::play(
            &level,
            &script,
            &commands::PlayOptions {
                json,
                step: Duration::from_millis(step_ms),
            },
            config_dir,
        ),
        Command::Show { level } => commands::show(&level, config_dir),
        Command::Install { file } => commands::install(&file, config_dir),
    }
}
