//! Built-in sampler: bootstrap random walk over the history's step-to-step increments.
//!
//! Each trajectory starts at the last observed value and adds increments drawn uniformly
//! (with replacement) from the history. The RNG is seeded from the configured seed and a
//! fingerprint of the input, so identical requests produce identical bands.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use async_trait::async_trait;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{ForecastModel, ModelLoader, SampleBatch};
use crate::error::{InferenceError, LoadError};
use crate::variant::{Device, ModelKey};

/// Trajectories drawn per forecast unless configured otherwise.
pub const DEFAULT_NUM_SAMPLES: usize = 20;

pub struct BootstrapModel {
    name: String,
    num_samples: usize,
    seed: u64,
}

impl BootstrapModel {
    pub fn new(name: impl Into<String>, num_samples: usize, seed: u64) -> Self {
        Self {
            name: name.into(),
            num_samples: num_samples.max(1),
            seed,
        }
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }
}

fn fingerprint(context: &[f32], horizon: usize) -> u64 {
    let mut hasher = DefaultHasher::new();
    horizon.hash(&mut hasher);
    for v in context {
        v.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}

impl ForecastModel for BootstrapModel {
    fn sample(&self, context: &[f32], horizon: usize) -> Result<SampleBatch, InferenceError> {
        if context.len() < 2 {
            return Err(InferenceError::Model(format!(
                "bootstrap sampler needs at least 2 points, got {}",
                context.len()
            )));
        }
        let increments: Vec<f32> = context.windows(2).map(|w| w[1] - w[0]).collect();
        let last = context[context.len() - 1];
        let mut rng = StdRng::seed_from_u64(self.seed ^ fingerprint(context, horizon));

        let mut batch = Array2::<f32>::zeros((self.num_samples, horizon));
        for mut row in batch.rows_mut() {
            let mut level = last;
            for cell in row.iter_mut() {
                level += increments[rng.gen_range(0..increments.len())];
                *cell = level;
            }
        }
        Ok(batch)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Loader for [`BootstrapModel`]. CPU only; loading is instantaneous.
#[derive(Clone, Debug)]
pub struct BootstrapLoader {
    num_samples: usize,
    seed: u64,
}

impl BootstrapLoader {
    pub fn new(num_samples: usize, seed: u64) -> Self {
        Self { num_samples, seed }
    }
}

impl Default for BootstrapLoader {
    fn default() -> Self {
        Self::new(DEFAULT_NUM_SAMPLES, 42)
    }
}

#[async_trait]
impl ModelLoader for BootstrapLoader {
    async fn load(
        &self,
        key: &ModelKey,
        device: Device,
    ) -> Result<Arc<dyn ForecastModel>, LoadError> {
        if device != Device::Cpu {
            return Err(LoadError::Unsupported(format!(
                "bootstrap backend runs on cpu only, requested {}",
                device
            )));
        }
        let name = format!("{} (bootstrap)", key);
        Ok(Arc::new(BootstrapModel::new(name, self.num_samples, self.seed)))
    }
}
