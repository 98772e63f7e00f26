//! Model families, size classes, cache keys and device placement.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Forecasting model family served by an endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFamily {
    /// Primary family with sized variants.
    Chronos,
    /// Alternate family without a production implementation; served by substitution.
    TimesFm,
}

impl ModelFamily {
    /// Closed horizon range `(min, max)` accepted for this family.
    pub fn horizon_range(self) -> (usize, usize) {
        match self {
            ModelFamily::Chronos => (1, 100),
            ModelFamily::TimesFm => (1, 128),
        }
    }

    /// Whether requests carry a `model` size for this family.
    pub fn is_sized(self) -> bool {
        matches!(self, ModelFamily::Chronos)
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelFamily::Chronos => f.write_str("chronos"),
            ModelFamily::TimesFm => f.write_str("timesfm"),
        }
    }
}

/// Size class of a pretrained model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSize {
    Tiny,
    Small,
    #[default]
    Base,
    Large,
}

impl ModelSize {
    pub const ALL: [ModelSize; 4] = [
        ModelSize::Tiny,
        ModelSize::Small,
        ModelSize::Base,
        ModelSize::Large,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ModelSize::Tiny => "tiny",
            ModelSize::Small => "small",
            ModelSize::Base => "base",
            ModelSize::Large => "large",
        }
    }
}

impl fmt::Display for ModelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelSize {
    type Err = String;

    /// Exact, case-sensitive match; the wire contract only knows the lowercase names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tiny" => Ok(ModelSize::Tiny),
            "small" => Ok(ModelSize::Small),
            "base" => Ok(ModelSize::Base),
            "large" => Ok(ModelSize::Large),
            other => Err(format!(
                "unknown model size: {} (use tiny, small, base, or large)",
                other
            )),
        }
    }
}

/// Cache key identifying one loadable model, e.g. `amazon/chronos-t5-base`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelKey(String);

impl ModelKey {
    pub fn new(family: ModelFamily, size: ModelSize) -> Self {
        match family {
            ModelFamily::Chronos => Self(format!("amazon/chronos-t5-{}", size)),
            ModelFamily::TimesFm => Self("google/timesfm-2.0-500m".to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ModelKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a model's weights live once loaded. Fixed per cache at construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Device {
    #[default]
    Cpu,
    /// Accelerator ordinal, e.g. `cuda:0`.
    Accelerator(u32),
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => f.write_str("cpu"),
            Device::Accelerator(n) => write!(f, "cuda:{}", n),
        }
    }
}

impl FromStr for Device {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if s == "cpu" {
            return Ok(Device::Cpu);
        }
        if s == "cuda" {
            return Ok(Device::Accelerator(0));
        }
        match s.strip_prefix("cuda:").map(str::parse::<u32>) {
            Some(Ok(n)) => Ok(Device::Accelerator(n)),
            _ => Err(format!("unknown device: {} (use cpu or cuda:N)", s)),
        }
    }
}
