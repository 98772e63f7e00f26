//! Load configuration from XDG `config.toml` and project `.env`, then apply to the process
//! environment with priority: **existing env > .env > XDG**.
//!
//! Everything downstream reads plain environment variables (`FORECAST_*`, `SERVE_*`,
//! `RUST_LOG`, `LOG_FILE`), so this crate must run before any settings are built and before
//! any model is loaded.

mod env_file;
#[cfg(feature = "tracing-init")]
pub mod logging;
mod xdg_toml;

use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("xdg config path: {0}")]
    XdgPath(String),
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("read .env: {0}")]
    Dotenv(#[from] dotenv::Error),
}

/// Loads config from XDG `config.toml` and optional project `.env`, then sets environment
/// variables only for keys that are **not** already set.
///
/// * `app_name`: e.g. `"forecast"`; XDG path is `~/.config/<app_name>/config.toml`.
/// * `override_dir`: look for `.env` here instead of the current directory.
///
/// Returns the keys that were set.
pub fn load_and_apply(
    app_name: &str,
    override_dir: Option<&Path>,
) -> Result<Vec<String>, LoadError> {
    let xdg_map = xdg_toml::load_env_map(app_name)?;
    let dotenv_map = env_file::load_env_map(override_dir)?;

    let mut keys: HashSet<&String> = xdg_map.keys().collect();
    keys.extend(dotenv_map.keys());

    let mut applied = Vec::new();
    for key in keys {
        if std::env::var_os(key).is_some() {
            continue;
        }
        if let Some(v) = dotenv_map.get(key).or_else(|| xdg_map.get(key)) {
            std::env::set_var(key, v);
            applied.push(key.clone());
        }
    }
    applied.sort();
    Ok(applied)
}
