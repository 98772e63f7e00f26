//! Model-side settings read from the process environment.
//!
//! Unset or unparsable variables fall back to [`Default`].

use std::path::PathBuf;
use std::str::FromStr;

use crate::model::DEFAULT_NUM_SAMPLES;
use crate::variant::{Device, ModelSize};

/// Which [`ModelLoader`](crate::model::ModelLoader) backs the cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Backend {
    #[default]
    Bootstrap,
    Onnx,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bootstrap" => Ok(Backend::Bootstrap),
            "onnx" => Ok(Backend::Onnx),
            other => Err(format!("unknown backend: {} (use bootstrap or onnx)", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ForecastSettings {
    /// Forces CPU placement regardless of `device`. Must be decided before any load.
    pub disable_acceleration: bool,
    /// Requested placement when acceleration is allowed.
    pub device: Device,
    pub backend: Backend,
    /// Root of `<model_dir>/<model key>/model.onnx`.
    pub model_dir: PathBuf,
    pub num_samples: usize,
    pub seed: u64,
    /// Sizes loaded at start-up.
    pub preload: Vec<ModelSize>,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            disable_acceleration: true,
            device: Device::Cpu,
            backend: Backend::Bootstrap,
            model_dir: PathBuf::from("models"),
            num_samples: DEFAULT_NUM_SAMPLES,
            seed: 42,
            preload: Vec::new(),
        }
    }
}

impl ForecastSettings {
    /// Device every load will use: CPU when acceleration is disabled.
    pub fn effective_device(&self) -> Device {
        if self.disable_acceleration {
            Device::Cpu
        } else {
            self.device
        }
    }

    /// Builds settings from environment variables:
    ///
    /// - `FORECAST_DISABLE_ACCELERATION` (default true)
    /// - `FORECAST_DEVICE` (default cpu)
    /// - `FORECAST_BACKEND` (default bootstrap)
    /// - `FORECAST_MODEL_DIR` (default models)
    /// - `FORECAST_NUM_SAMPLES` (default 20)
    /// - `FORECAST_SEED` (default 42)
    /// - `FORECAST_PRELOAD` (comma-separated sizes; unknown names skipped)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        Self {
            disable_acceleration: lookup("FORECAST_DISABLE_ACCELERATION")
                .and_then(|s| parse_bool(&s))
                .unwrap_or(default.disable_acceleration),
            device: parsed(&lookup, "FORECAST_DEVICE").unwrap_or(default.device),
            backend: parsed(&lookup, "FORECAST_BACKEND").unwrap_or(default.backend),
            model_dir: lookup("FORECAST_MODEL_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(default.model_dir),
            num_samples: parsed(&lookup, "FORECAST_NUM_SAMPLES")
                .filter(|n: &usize| *n > 0)
                .unwrap_or(default.num_samples),
            seed: parsed(&lookup, "FORECAST_SEED").unwrap_or(default.seed),
            preload: lookup("FORECAST_PRELOAD")
                .map(|s| s.split(',').filter_map(|p| p.trim().parse().ok()).collect())
                .unwrap_or(default.preload),
        }
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|s| s.trim().parse().ok())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
