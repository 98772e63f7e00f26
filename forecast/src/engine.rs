//! Forecast engine: runs a model's sampler and reduces trajectories to median and band.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{ModelCache, ModelHandle};
use crate::error::InferenceError;
use crate::model::SampleBatch;
use crate::quantile::{self, Bands};
use crate::request::ForecastRequest;
use crate::result::{Forecast, ForecastResult};

/// Runs inference against handles resolved from an injected [`ModelCache`].
#[derive(Clone)]
pub struct ForecastEngine {
    cache: Arc<ModelCache>,
}

impl ForecastEngine {
    pub fn new(cache: Arc<ModelCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<ModelCache> {
        &self.cache
    }

    /// Resolves the request's model through the cache, then predicts.
    ///
    /// A load failure becomes a `Failed` result; it is not cached, so a later request
    /// retries the load.
    pub async fn forecast(&self, request: &ForecastRequest) -> ForecastResult {
        let key = request.model_key();
        let fetched = match self.cache.fetch(&key).await {
            Ok(f) => f,
            Err(e) => return ForecastResult::failed(e),
        };
        match self
            .run(&fetched.handle, &request.time_series, request.horizon)
            .await
        {
            Ok(mut forecast) => {
                forecast.cached = fetched.from_cache;
                ForecastResult::Success(forecast)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "inference failed");
                ForecastResult::failed(e)
            }
        }
    }

    /// Predicts `horizon` steps after `time_series` with an already-resolved handle.
    ///
    /// Never panics or returns an error: any failure is reported as `Failed` carrying
    /// the error text.
    pub async fn predict(
        &self,
        handle: &ModelHandle,
        time_series: &[f32],
        horizon: usize,
    ) -> ForecastResult {
        match self.run(handle, time_series, horizon).await {
            Ok(forecast) => ForecastResult::Success(forecast),
            Err(e) => {
                warn!(key = %handle.key(), error = %e, "inference failed");
                ForecastResult::failed(e)
            }
        }
    }

    async fn run(
        &self,
        handle: &ModelHandle,
        time_series: &[f32],
        horizon: usize,
    ) -> Result<Forecast, InferenceError> {
        let model = handle.model().clone();
        let context = time_series.to_vec();
        debug!(
            key = %handle.key(),
            points = context.len(),
            horizon,
            "sampling forecast"
        );
        let batch = tokio::task::spawn_blocking(move || model.sample(&context, horizon))
            .await
            .map_err(|e| InferenceError::Join(e.to_string()))??;

        let bands = reduce_checked(&batch, horizon)?;
        Ok(Forecast {
            predictions: bands.median,
            confidence_low: bands.low,
            confidence_high: bands.high,
            horizon,
            model: handle.model().name().to_string(),
            num_samples: batch.nrows(),
            cached: true,
        })
    }
}

fn reduce_checked(batch: &SampleBatch, horizon: usize) -> Result<Bands, InferenceError> {
    if batch.ncols() != horizon {
        return Err(InferenceError::Shape {
            expected: horizon,
            got: batch.ncols(),
        });
    }
    quantile::reduce(batch)
}
