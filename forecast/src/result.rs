//! Forecast result and its wire format.
//!
//! The result is a sum type tagged by `status`, so both shapes share one JSON object:
//!
//! ```json
//! {"predictions":[..],"confidence_low":[..],"confidence_high":[..],"horizon":24,
//!  "model":"amazon/chronos-t5-base","num_samples":20,"cached":true,"status":"success"}
//! {"error":"Need at least 10 historical data points","status":"failed"}
//! ```

use serde::{Deserialize, Serialize};

/// A successful forecast: median plus an 80% empirical band, one value per future step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub predictions: Vec<f64>,
    pub confidence_low: Vec<f64>,
    pub confidence_high: Vec<f64>,
    pub horizon: usize,
    /// Label of the model that actually served the request.
    pub model: String,
    /// Trajectories the band was computed from.
    pub num_samples: usize,
    /// Whether the model was already resident when the request arrived.
    pub cached: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForecastFailure {
    pub error: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ForecastResult {
    Success(Forecast),
    Failed(ForecastFailure),
}

impl ForecastResult {
    pub fn failed(error: impl ToString) -> Self {
        ForecastResult::Failed(ForecastFailure {
            error: error.to_string(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ForecastResult::Success(_))
    }

    pub fn forecast(&self) -> Option<&Forecast> {
        match self {
            ForecastResult::Success(f) => Some(f),
            ForecastResult::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ForecastResult::Success(_) => None,
            ForecastResult::Failed(f) => Some(&f.error),
        }
    }

    /// Replaces the model label on success; failures are returned untouched.
    pub fn relabeled(self, label: &str) -> Self {
        match self {
            ForecastResult::Success(mut f) => {
                f.model = label.to_string();
                ForecastResult::Success(f)
            }
            failed => failed,
        }
    }
}
