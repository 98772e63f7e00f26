//! Validated forecast request.

use crate::variant::{ModelFamily, ModelKey, ModelSize};

/// Default number of future steps when the payload omits `horizon`.
pub const DEFAULT_HORIZON: usize = 24;

/// Minimum history length accepted by the validator.
pub const MIN_HISTORY: usize = 10;

/// A request that passed validation. Nothing downstream of the validator sees raw JSON.
#[derive(Clone, Debug, PartialEq)]
pub struct ForecastRequest {
    /// Historical values in chronological order.
    pub time_series: Vec<f32>,
    pub horizon: usize,
    pub family: ModelFamily,
    pub size: ModelSize,
}

impl ForecastRequest {
    pub fn model_key(&self) -> ModelKey {
        ModelKey::new(self.family, self.size)
    }
}
