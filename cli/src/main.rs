//! Forecast CLI binary.
//!
//! Subcommands: `serve` (HTTP server), `predict` (one in-process forecast printed as JSON).

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cli::{apply_device_env, run_predict, write_json_output, PredictOptions};
use forecast::ForecastSettings;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "forecast")]
#[command(about = "Forecast: pretrained time-series models with quantile bands")]
struct Args {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Run the HTTP server (POST /forecast, POST /forecast/timesfm, GET /health)
    Serve(ServeArgs),
    /// Run one forecast locally and print the JSON result
    Predict(PredictArgs),
}

#[derive(clap::Args, Debug, Clone)]
struct ServeArgs {
    /// Listen address (default FORECAST_ADDR or 127.0.0.1:8000)
    #[arg(long, value_name = "ADDR")]
    addr: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
struct PredictArgs {
    /// JSON request body or bare array of numbers; `-` reads stdin
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,
    /// Steps to forecast (overrides the input's `horizon`)
    #[arg(long, value_name = "N")]
    horizon: Option<u64>,
    /// Model size: tiny, small, base or large (overrides the input's `model`)
    #[arg(short, long, value_name = "SIZE")]
    model: Option<String>,
    /// Use the TimesFM endpoint (served by a substitute model)
    #[arg(long)]
    timesfm: bool,
    /// Generate a synthetic price series of N points instead of reading input
    #[arg(long, value_name = "N", conflicts_with = "input")]
    demo: Option<usize>,
    /// Seed for --demo
    #[arg(long, value_name = "SEED", default_value_t = 42)]
    demo_seed: u64,
    /// Write the result to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,
    /// Pretty-print (multi-line). Default: one line
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if let Err(e) = config::load_and_apply("forecast", None) {
        eprintln!("forecast: config: {}", e);
    }
    let _log_guard = config::logging::init()?;

    let args = Args::parse();

    // Device visibility is process-wide; settle it before the runtime spawns threads and
    // before any model is loaded.
    let settings = ForecastSettings::from_env();
    if apply_device_env(&settings) {
        info!("acceleration disabled; accelerators hidden from this process");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match args.cmd {
        Command::Serve(sa) => {
            if let Err(e) = runtime.block_on(serve::run_serve(sa.addr.as_deref())) {
                eprintln!("serve error: {}", e);
                std::process::exit(1);
            }
        }
        Command::Predict(pa) => {
            let opts = PredictOptions {
                input: pa.input,
                horizon: pa.horizon,
                model: pa.model,
                timesfm: pa.timesfm,
                demo: pa.demo,
                demo_seed: pa.demo_seed,
            };
            let result = match runtime.block_on(run_predict(&settings, &opts)) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("forecast: {}", e);
                    std::process::exit(1);
                }
            };
            write_json_output(&result, pa.file.as_deref(), pa.pretty)?;
            if !result.is_success() {
                std::process::exit(2);
            }
        }
    }
    Ok(())
}
