mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/climate-readiness/)
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("climate-readiness"))
}

/// Get the default config file path (~/.config/climate-readiness/config.yaml)
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.yaml"))
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    File(PathBuf),
    BuiltIn,
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/climate-readiness/config.yaml) and falls back to built-in
///   defaults when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, ConfigSource)> {
    match path {
        Some(explicit) => {
            if !explicit.exists() {
                anyhow::bail!("Config file not found at {}", explicit.display());
            }
            let config = read_config(&explicit)?;
            Ok((config, ConfigSource::File(explicit)))
        }
        None => match get_config_path() {
            Some(default_path) if default_path.exists() => {
                let config = read_config(&default_path)?;
                Ok((config, ConfigSource::File(default_path)))
            }
            _ => Ok((Config::default(), ConfigSource::BuiltIn)),
        },
    }
}

fn read_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    if content.trim().is_empty() {
        return Ok(Config::default());
    }

    serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::EvaluationMode;
    use std::env;

    #[test]
    fn test_explicit_missing_file_is_error() {
        let path = env::temp_dir().join("climate_readiness_test_missing.yaml");
        let _ = fs::remove_file(&path);
        assert!(load_config(Some(path)).is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let path = env::temp_dir().join("climate_readiness_test_load.yaml");
        fs::write(&path, "evaluation: staged\nchart: false\n").unwrap();

        let (config, source) = load_config(Some(path.clone())).unwrap();
        assert_eq!(config.evaluation_mode(), EvaluationMode::Staged);
        assert!(!config.chart_enabled());
        assert_eq!(source, ConfigSource::File(path.clone()));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_empty_file_is_defaults() {
        let path = env::temp_dir().join("climate_readiness_test_empty.yaml");
        fs::write(&path, "\n").unwrap();

        let (config, _) = load_config(Some(path.clone())).unwrap();
        assert_eq!(config, Config::default());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let path = env::temp_dir().join("climate_readiness_test_invalid.yaml");
        fs::write(&path, "chart: [not, a, bool]\n").unwrap();

        let err = load_config(Some(path.clone())).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid YAML"));

        let _ = fs::remove_file(&path);
    }
}
