//! Request validation: untyped JSON payload in, [`ForecastRequest`] or [`ValidationError`] out.
//!
//! Rules run in a fixed order and the first failure wins:
//! 1. `time_series` is present, is an array, and holds only finite numbers.
//! 2. `time_series` has at least `min_history` points.
//! 3. `horizon` (default 24) is an integer in the family's range.
//! 4. `model` (default `base`) is a known size; only checked for sized families.

use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::request::{ForecastRequest, DEFAULT_HORIZON, MIN_HISTORY};
use crate::variant::{ModelFamily, ModelSize};

#[derive(Clone, Debug)]
pub struct RequestValidator {
    min_history: usize,
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self {
            min_history: MIN_HISTORY,
        }
    }
}

impl RequestValidator {
    pub fn new(min_history: usize) -> Self {
        Self { min_history }
    }

    pub fn min_history(&self) -> usize {
        self.min_history
    }

    pub fn validate(
        &self,
        payload: &Value,
        family: ModelFamily,
    ) -> Result<ForecastRequest, ValidationError> {
        let body = payload.as_object().ok_or_else(|| {
            ValidationError::InvalidShape("request body must be a JSON object".to_string())
        })?;

        let time_series = parse_series(body)?;
        if time_series.len() < self.min_history {
            return Err(ValidationError::InsufficientHistory {
                min: self.min_history,
                got: time_series.len(),
            });
        }

        let horizon = parse_horizon(body.get("horizon"), family)?;

        let size = if family.is_sized() {
            parse_size(body.get("model"))?
        } else {
            ModelSize::default()
        };

        Ok(ForecastRequest {
            time_series,
            horizon,
            family,
            size,
        })
    }
}

fn parse_series(body: &Map<String, Value>) -> Result<Vec<f32>, ValidationError> {
    let items = body
        .get("time_series")
        .and_then(Value::as_array)
        .ok_or_else(|| ValidationError::InvalidShape("time_series must be a list".to_string()))?;

    items
        .iter()
        .map(|item| {
            item.as_f64()
                .map(|v| v as f32)
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    ValidationError::InvalidShape(
                        "time_series must contain only finite numbers".to_string(),
                    )
                })
        })
        .collect()
}

fn parse_horizon(value: Option<&Value>, family: ModelFamily) -> Result<usize, ValidationError> {
    let (min, max) = family.horizon_range();
    let out_of_range = ValidationError::HorizonOutOfRange { min, max };
    let Some(value) = value else {
        return Ok(DEFAULT_HORIZON.clamp(min, max));
    };
    let horizon = match value.as_i64() {
        Some(n) => n,
        // Integral floats such as `24.0` are accepted.
        None => match value.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => f as i64,
            _ => return Err(out_of_range),
        },
    };
    if horizon < min as i64 || horizon > max as i64 {
        return Err(out_of_range);
    }
    Ok(horizon as usize)
}

fn parse_size(value: Option<&Value>) -> Result<ModelSize, ValidationError> {
    match value {
        None => Ok(ModelSize::default()),
        Some(Value::String(s)) => s
            .parse()
            .map_err(|_| ValidationError::UnknownModelVariant(s.clone())),
        Some(other) => Err(ValidationError::UnknownModelVariant(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn points(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64).collect()
    }

    fn chronos(payload: Value) -> Result<ForecastRequest, ValidationError> {
        RequestValidator::default().validate(&payload, ModelFamily::Chronos)
    }

    #[test]
    fn accepts_full_payload() {
        let req = chronos(json!({"time_series": points(20), "horizon": 24, "model": "large"}))
            .unwrap();
        assert_eq!(req.time_series.len(), 20);
        assert_eq!(req.time_series[0], 100.0);
        assert_eq!(req.horizon, 24);
        assert_eq!(req.size, ModelSize::Large);
        assert_eq!(req.family, ModelFamily::Chronos);
    }

    #[test]
    fn defaults_horizon_and_model() {
        let req = chronos(json!({"time_series": points(10)})).unwrap();
        assert_eq!(req.horizon, 24);
        assert_eq!(req.size, ModelSize::Base);
    }

    #[test]
    fn non_object_and_missing_series_are_invalid_shape() {
        assert!(matches!(
            chronos(json!([1, 2, 3])),
            Err(ValidationError::InvalidShape(_))
        ));
        assert_eq!(
            chronos(json!({"horizon": 5})).unwrap_err().to_string(),
            "time_series must be a list"
        );
        assert_eq!(
            chronos(json!({"time_series": {"a": 1}})).unwrap_err().to_string(),
            "time_series must be a list"
        );
        assert_eq!(
            chronos(json!({"time_series": 5})).unwrap_err().to_string(),
            "time_series must be a list"
        );
    }

    #[test]
    fn non_numeric_elements_are_invalid_shape() {
        let mut series: Vec<Value> = points(12).into_iter().map(Value::from).collect();
        series[3] = json!("x");
        assert_eq!(
            chronos(json!({"time_series": series})).unwrap_err().to_string(),
            "time_series must contain only finite numbers"
        );
        // Overflows f32.
        let mut big: Vec<Value> = points(12).into_iter().map(Value::from).collect();
        big[0] = json!(1e300);
        assert!(matches!(
            chronos(json!({"time_series": big})),
            Err(ValidationError::InvalidShape(_))
        ));
    }

    #[test]
    fn short_history_rejected() {
        let err = chronos(json!({"time_series": points(9)})).unwrap_err();
        assert_eq!(err, ValidationError::InsufficientHistory { min: 10, got: 9 });
        assert_eq!(err.to_string(), "Need at least 10 historical data points");
    }

    #[test]
    fn shape_checked_before_length_and_length_before_horizon() {
        let err = chronos(json!({"time_series": points(3), "horizon": 0, "model": "x"}))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InsufficientHistory { .. }));

        let err = chronos(json!({"time_series": points(30), "horizon": 0, "model": "x"}))
            .unwrap_err();
        assert!(matches!(err, ValidationError::HorizonOutOfRange { .. }));
    }

    #[test]
    fn horizon_bounds_per_family() {
        for bad in [json!(0), json!(101), json!(-3), json!(2.5), json!("24"), json!(null)] {
            let err = chronos(json!({"time_series": points(20), "horizon": bad})).unwrap_err();
            assert_eq!(err.to_string(), "Horizon must be between 1 and 100");
        }
        assert_eq!(
            chronos(json!({"time_series": points(20), "horizon": 100}))
                .unwrap()
                .horizon,
            100
        );
        assert_eq!(
            chronos(json!({"time_series": points(20), "horizon": 12.0}))
                .unwrap()
                .horizon,
            12
        );

        let v = RequestValidator::default();
        let ok = v
            .validate(&json!({"time_series": points(20), "horizon": 128}), ModelFamily::TimesFm)
            .unwrap();
        assert_eq!(ok.horizon, 128);
        let err = v
            .validate(&json!({"time_series": points(20), "horizon": 129}), ModelFamily::TimesFm)
            .unwrap_err();
        assert_eq!(err.to_string(), "Horizon must be between 1 and 128");
    }

    #[test]
    fn unknown_model_rejected() {
        let err = chronos(json!({"time_series": points(20), "model": "medium"})).unwrap_err();
        assert_eq!(err, ValidationError::UnknownModelVariant("medium".into()));
        assert_eq!(err.to_string(), "Model must be tiny, small, base, or large");

        let err = chronos(json!({"time_series": points(20), "model": 3})).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownModelVariant(_)));
    }

    #[test]
    fn alternate_family_ignores_model() {
        let req = RequestValidator::default()
            .validate(
                &json!({"time_series": points(20), "model": "medium"}),
                ModelFamily::TimesFm,
            )
            .unwrap();
        assert_eq!(req.family, ModelFamily::TimesFm);
        assert_eq!(req.size, ModelSize::Base);
    }

    #[test]
    fn custom_min_history() {
        let v = RequestValidator::new(3);
        assert!(v
            .validate(&json!({"time_series": [1, 2, 3]}), ModelFamily::Chronos)
            .is_ok());
    }
}
