//! p2ds - Demo splits tool
//!
//! Reads the `fullgame_<n>.dem` recordings of a speedrun attempt and writes
//! per-segment times and a LiveSplit splits file. With `--gold`, folds every
//! attempt directory under the given root into a best-segment summary.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use p2ds::runner::{run_gold, run_single, OutputOptions};
use p2ds::AppError;
use p2ds_common::config::{load_config, CONFIG_ENV_VAR};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for p2ds
#[derive(Parser, Debug)]
#[command(name = "p2ds")]
#[command(about = "Speedrun splits from Source-engine demo recordings")]
#[command(version)]
struct Args {
    /// Attempt directory (or root of attempt directories with --gold)
    demos_dir: PathBuf,

    /// Output path prefix
    #[arg(default_value = "splits")]
    out_base: String,

    /// Scan every attempt directory for best segment times
    #[arg(long)]
    gold: bool,

    /// Verbose per-file and per-segment logging
    #[arg(long)]
    debug: bool,

    /// Skip demo files larger than this many megabytes
    #[arg(long = "max-size", value_name = "MB", value_parser = clap::value_parser!(u64).range(1..))]
    max_size: Option<u64>,

    /// Config file (TOML)
    #[arg(long, value_name = "FILE", env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Also write a JSON report
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing
    let default_filter = if args.debug {
        "p2ds=debug,p2ds_common=debug"
    } else {
        "p2ds=info,p2ds_common=info"
    };
    let filter = if args.debug {
        tracing_subscriber::EnvFilter::new(default_filter)
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| default_filter.into())
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            let code = e.downcast_ref::<AppError>().map_or(1, AppError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(mb) = args.max_size {
        config.max_demo_size_mb = mb;
    }

    info!(
        "Using max file size: {}MB ({} bytes)",
        config.max_demo_size_mb,
        config.max_demo_size_bytes()
    );
    info!(
        "Minimum gold time check (raw per-segment total): {}s",
        config.min_duration_secs
    );
    info!(
        "Offset applied to cumulative/display times: {}s",
        config.display_offset_secs
    );

    let output = OutputOptions {
        out_base: args.out_base,
        json: args.json,
    };

    if args.gold {
        info!("Gold mode: scanning runs for best splits");
        run_gold(&args.demos_dir, &output, &config)?;
    } else {
        let run = run_single(&args.demos_dir, &output, &config)?;
        info!(
            "{} of {} segments finished in {}",
            run.result.finished_count(),
            config.segments.len(),
            args.demos_dir.display()
        );
    }

    Ok(())
}
