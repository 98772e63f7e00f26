//! Load `$XDG_CONFIG_HOME/<app>/config.toml` into env key-value pairs.
//!
//! Typed `[model]` and `[serve]` tables map onto `FORECAST_*` / `SERVE_*` variables; the raw
//! `[env]` table is applied last and wins over typed entries for the same variable.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::LoadError;

fn config_home() -> Result<PathBuf, LoadError> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME").filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir().ok_or_else(|| LoadError::XdgPath("no config directory".to_string()))
}

fn xdg_config_path(app_name: &str) -> Result<Option<PathBuf>, LoadError> {
    let path = config_home()?.join(app_name).join("config.toml");
    Ok(path.is_file().then_some(path))
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ModelTable {
    backend: Option<String>,
    device: Option<String>,
    disable_acceleration: Option<bool>,
    model_dir: Option<String>,
    num_samples: Option<u64>,
    seed: Option<u64>,
    #[serde(default)]
    preload: Vec<String>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ServeTable {
    addr: Option<String>,
    max_concurrency: Option<u64>,
    request_timeout_secs: Option<u64>,
}

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    env: HashMap<String, String>,
    #[serde(default)]
    model: ModelTable,
    #[serde(default)]
    serve: ServeTable,
}

impl ConfigFile {
    fn into_env_map(self) -> HashMap<String, String> {
        let mut out = HashMap::new();
        let mut put = |key: &str, value: Option<String>| {
            if let Some(v) = value {
                out.insert(key.to_string(), v);
            }
        };

        let m = self.model;
        put("FORECAST_BACKEND", m.backend);
        put("FORECAST_DEVICE", m.device);
        put(
            "FORECAST_DISABLE_ACCELERATION",
            m.disable_acceleration.map(|b| b.to_string()),
        );
        put("FORECAST_MODEL_DIR", m.model_dir);
        put("FORECAST_NUM_SAMPLES", m.num_samples.map(|n| n.to_string()));
        put("FORECAST_SEED", m.seed.map(|n| n.to_string()));
        if !m.preload.is_empty() {
            put("FORECAST_PRELOAD", Some(m.preload.join(",")));
        }

        let s = self.serve;
        put("FORECAST_ADDR", s.addr);
        put("SERVE_MAX_CONCURRENCY", s.max_concurrency.map(|n| n.to_string()));
        put(
            "SERVE_REQUEST_TIMEOUT_SECS",
            s.request_timeout_secs.map(|n| n.to_string()),
        );

        out.extend(self.env);
        out
    }
}

/// Env pairs from the app's `config.toml`. Missing file returns an empty map.
pub fn load_env_map(app_name: &str) -> Result<HashMap<String, String>, LoadError> {
    let Some(path) = xdg_config_path(app_name)? else {
        return Ok(HashMap::new());
    };
    let content = std::fs::read_to_string(&path).map_err(LoadError::XdgRead)?;
    parse_config(&content)
}

fn parse_config(content: &str) -> Result<HashMap<String, String>, LoadError> {
    let config: ConfigFile = toml::from_str(content)?;
    Ok(config.into_env_map())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_tables_map_to_env_keys() {
        let map = parse_config(
            r#"
[model]
backend = "onnx"
device = "cuda:0"
disable_acceleration = false
model_dir = "/srv/models"
num_samples = 64
seed = 9
preload = ["tiny", "base"]

[serve]
addr = "0.0.0.0:9000"
max_concurrency = 4
request_timeout_secs = 30
"#,
        )
        .unwrap();
        assert_eq!(map["FORECAST_BACKEND"], "onnx");
        assert_eq!(map["FORECAST_DEVICE"], "cuda:0");
        assert_eq!(map["FORECAST_DISABLE_ACCELERATION"], "false");
        assert_eq!(map["FORECAST_MODEL_DIR"], "/srv/models");
        assert_eq!(map["FORECAST_NUM_SAMPLES"], "64");
        assert_eq!(map["FORECAST_SEED"], "9");
        assert_eq!(map["FORECAST_PRELOAD"], "tiny,base");
        assert_eq!(map["FORECAST_ADDR"], "0.0.0.0:9000");
        assert_eq!(map["SERVE_MAX_CONCURRENCY"], "4");
        assert_eq!(map["SERVE_REQUEST_TIMEOUT_SECS"], "30");
    }

    #[test]
    fn env_table_wins_over_typed() {
        let map = parse_config(
            "[model]\nseed = 1\n\n[env]\nFORECAST_SEED = \"2\"\nRUST_LOG = \"debug\"\n",
        )
        .unwrap();
        assert_eq!(map["FORECAST_SEED"], "2");
        assert_eq!(map["RUST_LOG"], "debug");
    }

    #[test]
    fn empty_file_is_empty_map() {
        assert!(parse_config("").unwrap().is_empty());
    }

    #[test]
    fn unknown_typed_key_is_parse_error() {
        let result = parse_config("[model]\nsize = \"base\"\n");
        assert!(matches!(result, Err(LoadError::XdgParse(_))));
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        assert!(matches!(
            parse_config("not valid toml [[[\n"),
            Err(LoadError::XdgParse(_))
        ));
    }
}
