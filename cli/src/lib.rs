//! Helpers behind the `forecast` binary: request assembly for `predict`, synthetic demo
//! series, and process-level device setup.
//!
//! **Public API**: [`PredictOptions`], [`build_payload`], [`read_input`], [`demo_series`],
//! [`run_predict`], [`apply_device_env`], [`write_json_output`].

use std::io::Read;
use std::path::{Path, PathBuf};

use forecast::{ForecastResult, ForecastSettings, ModelFamily};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// Variable consulted by CUDA runtimes for visible devices.
pub const CUDA_VISIBLE_DEVICES: &str = "CUDA_VISIBLE_DEVICES";

#[derive(Error, Debug)]
pub enum CliError {
    #[error("read input {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("input is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("input must be a JSON object or an array of numbers")]
    InputShape,
    #[error("no input: pass --input FILE, --input - or --demo N")]
    NoInput,
    #[error(transparent)]
    Load(#[from] forecast::LoadError),
}

/// Options for one `forecast predict` run.
#[derive(Clone, Debug, Default)]
pub struct PredictOptions {
    /// JSON file with a request body or a bare series; `-` reads stdin.
    pub input: Option<PathBuf>,
    /// Overrides `horizon` in the input.
    pub horizon: Option<u64>,
    /// Overrides `model` in the input.
    pub model: Option<String>,
    /// Use the substituted family endpoint.
    pub timesfm: bool,
    /// Generate a synthetic series of this many points instead of reading input.
    pub demo: Option<usize>,
    /// Seed for `demo`.
    pub demo_seed: u64,
}

/// Upward-drifting price-like series: `100 + i` plus uniform noise in `[-2, 2)`.
pub fn demo_series(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| 100.0 + i as f64 + rng.gen_range(-2.0..2.0))
        .collect()
}

/// Reads the request source. A bare array becomes `{"time_series": [...]}`.
pub fn read_input(path: &Path) -> Result<Value, CliError> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| CliError::Read {
                path: "-".to_string(),
                source,
            })?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.display().to_string(),
            source,
        })?
    };
    normalize_input(serde_json::from_str(&text)?)
}

fn normalize_input(value: Value) -> Result<Value, CliError> {
    match value {
        Value::Object(_) => Ok(value),
        Value::Array(_) => Ok(json!({ "time_series": value })),
        _ => Err(CliError::InputShape),
    }
}

/// Builds the request body from input or demo data plus flag overrides. Values are passed
/// through untouched; validation is the endpoint's job.
pub fn build_payload(opts: &PredictOptions) -> Result<Value, CliError> {
    let mut body: Map<String, Value> = match (&opts.demo, &opts.input) {
        (Some(n), _) => {
            let mut m = Map::new();
            m.insert("time_series".into(), json!(demo_series(*n, opts.demo_seed)));
            m
        }
        (None, Some(path)) => match read_input(path)? {
            Value::Object(m) => m,
            _ => return Err(CliError::InputShape),
        },
        (None, None) => return Err(CliError::NoInput),
    };
    if let Some(h) = opts.horizon {
        body.insert("horizon".into(), json!(h));
    }
    if let Some(m) = &opts.model {
        body.insert("model".into(), json!(m));
    }
    Ok(Value::Object(body))
}

/// Hides accelerators from the process when acceleration is disabled. Must run before any
/// model load and before other threads are started.
pub fn apply_device_env(settings: &ForecastSettings) -> bool {
    if settings.disable_acceleration {
        std::env::set_var(CUDA_VISIBLE_DEVICES, "");
        true
    } else {
        false
    }
}

/// Runs one request through a freshly built endpoint.
pub async fn run_predict(
    settings: &ForecastSettings,
    opts: &PredictOptions,
) -> Result<ForecastResult, CliError> {
    let payload = build_payload(opts)?;
    let endpoint = forecast::build_endpoint(settings)?;
    let family = if opts.timesfm {
        ModelFamily::TimesFm
    } else {
        ModelFamily::Chronos
    };
    Ok(endpoint.handle(family, &payload).await)
}

/// Writes JSON to stdout or to the given file. When pretty is true, multi-line; else one line.
pub fn write_json_output(
    value: &impl serde::Serialize,
    file: Option<&Path>,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let s = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    match file {
        Some(path) => std::fs::write(path, format!("{}\n", s))?,
        None => {
            println!("{}", s);
            std::io::Write::flush(&mut std::io::stdout())?;
        }
    }
    Ok(())
}
