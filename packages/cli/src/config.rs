//! CLI configuration file.
//!
//! ```toml
//! model_path = "models/crime_model.json"
//! ```
//!
//! The model path resolves as: `--model` flag, then `model_path` from the
//! config file, then [`DEFAULT_MODEL_PATH`].

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Config file read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_PATH: &str = "arrest_predictor.toml";

/// Model file used when neither flag nor config names one.
pub const DEFAULT_MODEL_PATH: &str = "crime_model.json";

/// Errors raised while loading the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Settings read from the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path to the model JSON file.
    pub model_path: Option<PathBuf>,
}

impl Config {
    /// Parses a config from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or has unknown keys.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(toml_str)?)
    }

    /// Loads the config at `path`, or [`DEFAULT_CONFIG_PATH`] when `path`
    /// is `None`.
    ///
    /// A missing default file yields [`Config::default`]; a missing explicit
    /// file is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = path.map_or_else(
            || (Path::new(DEFAULT_CONFIG_PATH), false),
            |p| (p, true),
        );

        match std::fs::read_to_string(path) {
            Ok(contents) => {
                log::debug!("Read config from {}", path.display());
                Self::from_toml(&contents)
            }
            Err(e) if !explicit && e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Picks the model path: `flag` wins over the config file, which wins
    /// over [`DEFAULT_MODEL_PATH`].
    #[must_use]
    pub fn resolve_model_path(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.model_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_model_path() {
        let config = Config::from_toml("model_path = \"models/forest.json\"").unwrap();
        assert_eq!(config.model_path, Some(PathBuf::from("models/forest.json")));
    }

    #[test]
    fn empty_config_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(matches!(
            Config::from_toml("modle_path = \"x.json\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn flag_wins_over_config_and_default() {
        let config = Config {
            model_path: Some(PathBuf::from("from_config.json")),
        };
        assert_eq!(
            config.resolve_model_path(Some(PathBuf::from("from_flag.json"))),
            PathBuf::from("from_flag.json")
        );
        assert_eq!(
            config.resolve_model_path(None),
            PathBuf::from("from_config.json")
        );
        assert_eq!(
            Config::default().resolve_model_path(None),
            PathBuf::from(DEFAULT_MODEL_PATH)
        );
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/arrest_predictor.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(
            err.to_string()
                .starts_with("Failed to read config /nonexistent/arrest_predictor.toml: ")
        );
    }
}
