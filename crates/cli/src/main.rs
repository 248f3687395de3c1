//! `shopfloor`: lay out machine-activity Gantt charts from JSON exports.
//!
//! ```bash
//! # Print a per-machine summary of the first week of orders
//! shopfloor summary machines.json orders.json status_history.json maintenance.json
//!
//! # Dump the render command stream at the 8h zoom level
//! shopfloor commands data/*.json --interval 8h --width 1440
//!
//! # Browse the chart in the terminal
//! shopfloor view data/*.json
//! ```

mod load;
mod renderer;
mod report;

use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use load::{ChartArgs, Session};

#[derive(Parser)]
#[command(name = "shopfloor")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log layout passes and parsing at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the window, canvas size and bar counts per machine
    Summary(ChartArgs),
    /// Print the chart geometry as JSON
    Layout(ChartArgs),
    /// Print the render command stream as JSON
    Commands(ChartArgs),
    /// Browse the chart interactively in the terminal
    View(ChartArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Summary(args) => {
            let session = Session::open(&args)?;
            let mut out = std::io::stdout().lock();
            report::write_summary(&mut out, &session)?;
        }
        Command::Layout(args) => {
            let session = Session::open(&args)?;
            let layout = session.layout();
            let mut out = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut out, &layout)?;
            writeln!(out)?;
        }
        Command::Commands(args) => {
            let session = Session::open(&args)?;
            let commands = session.render();
            let mut out = std::io::stdout().lock();
            serde_json::to_writer(&mut out, &commands)?;
            writeln!(out)?;
        }
        Command::View(args) => {
            let session = Session::open(&args)?;
            renderer::render_tui(session)?;
        }
    }
    Ok(())
}
