//! Read the project `.env` into a key-value map (applied to the environment in lib).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// `.env` in `override_dir` if given, else in the current directory.
fn dotenv_path(override_dir: Option<&Path>) -> Option<PathBuf> {
    let dir = override_dir
        .map(Path::to_path_buf)
        .or_else(|| std::env::current_dir().ok())?;
    let path = dir.join(".env");
    path.is_file().then_some(path)
}

/// Parses `.env` without touching the process environment. Missing file returns an empty map.
pub fn load_env_map(override_dir: Option<&Path>) -> Result<HashMap<String, String>, dotenv::Error> {
    let Some(path) = dotenv_path(override_dir) else {
        return Ok(HashMap::new());
    };
    dotenv::from_path_iter(&path)?.collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_env(content: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), content).unwrap();
        dir
    }

    #[test]
    fn missing_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_env_map(Some(dir.path())).unwrap().is_empty());
    }

    #[test]
    fn reads_pairs_and_skips_comments() {
        let dir = write_env("# model\nFORECAST_BACKEND=bootstrap\n\nFORECAST_SEED=7\n");
        let m = load_env_map(Some(dir.path())).unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m.get("FORECAST_BACKEND").map(String::as_str), Some("bootstrap"));
        assert_eq!(m.get("FORECAST_SEED").map(String::as_str), Some("7"));
    }

    #[test]
    fn quoted_values_are_unquoted() {
        let dir = write_env("FORECAST_MODEL_DIR=\"/srv/my models\"\nRUST_LOG='debug'\n");
        let m = load_env_map(Some(dir.path())).unwrap();
        assert_eq!(
            m.get("FORECAST_MODEL_DIR").map(String::as_str),
            Some("/srv/my models")
        );
        assert_eq!(m.get("RUST_LOG").map(String::as_str), Some("debug"));
    }

    #[test]
    fn malformed_line_is_an_error() {
        let dir = write_env("NOT A PAIR\n");
        assert!(load_env_map(Some(dir.path())).is_err());
    }
}
