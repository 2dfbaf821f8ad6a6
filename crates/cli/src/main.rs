// NanoLoop - Board Control Core & Simulation Bench
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use nanoloop_cli::scenario::Scenario;
use nanoloop_cli::run_scenario;

const EXIT_PASS: u8 = 0;
const EXIT_EXPECT_FAIL: u8 = 1;
const EXIT_CONFIG_ERROR: u8 = 2;
const EXIT_RUNTIME_ERROR: u8 = 3;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "NanoLoop bench runner",
    long_about = None
)]
struct Cli {
    /// Enable debug-level logging
    #[arg(short, long, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a scripted scenario against the modeled board.
    Run(RunArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Path to the scenario script (YAML)
    #[arg(short, long)]
    scenario: PathBuf,

    /// Override the scenario's max_ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Write a state snapshot (JSON) after the run
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Suppress the terminal transcript on stdout (still checked against
    /// expectations)
    #[arg(long)]
    no_echo: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.trace {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let code = match cli.command {
        Commands::Run(args) => run(args),
    };
    ExitCode::from(code)
}

fn run(args: RunArgs) -> u8 {
    let mut scenario = match Scenario::from_file(&args.scenario) {
        Ok(scenario) => scenario,
        Err(err) => {
            error!("scenario error: {err:#}");
            return EXIT_CONFIG_ERROR;
        }
    };
    if let Some(max_ticks) = args.max_ticks {
        scenario.max_ticks = max_ticks;
        if let Err(err) = scenario.validate() {
            error!("scenario error: {err:#}");
            return EXIT_CONFIG_ERROR;
        }
    }

    let outcome = match run_scenario(&scenario, !args.no_echo) {
        Ok(outcome) => outcome,
        Err(err) => {
            error!("run failed: {err:#}");
            return EXIT_RUNTIME_ERROR;
        }
    };

    if let Some(path) = &args.snapshot {
        let json = serde_json::to_string_pretty(&outcome.snapshot)
            .expect("snapshot serialization is infallible");
        if let Err(err) = std::fs::write(path, json) {
            error!("failed to write snapshot {path:?}: {err}");
            return EXIT_RUNTIME_ERROR;
        }
    }

    info!(
        scenario = scenario.name.as_str(),
        ticks = outcome.ticks,
        transmitted = outcome.transcript.len(),
        "run complete"
    );

    if !outcome.passed() {
        for missing in &outcome.failed_expectations {
            error!("expected transmit substring not found: {missing:?}");
        }
        return EXIT_EXPECT_FAIL;
    }
    EXIT_PASS
}
