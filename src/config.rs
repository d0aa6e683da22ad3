//! TOML configuration stored as `config.toml` in the app directory.
//!
//! Every field has a default, so a missing file or a partial file both load.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs;
use crate::dataset::DEFAULT_SPLIT_RATIO;
use crate::labeling::{
    DEFAULT_CONFIDENCE_SCALE, DEFAULT_MAX_ALTERNATIVES, MAX_ALTERNATIVES, PredictorSettings,
};
use crate::ml::{EvaluateOptions, TieBreak};
use crate::registry::sqlite::DB_FILE_NAME;

/// Default filename used to store the configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors that may occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to create the config directory.
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to read a config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse TOML config.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// A value parsed but lies outside its allowed range.
    #[error("Invalid value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
    /// No usable config directory found.
    #[error("No suitable config directory found")]
    NoConfigDir,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymptraConfig {
    pub evaluation: EvaluationSettings,
    pub predictor: PredictorConfig,
    pub registry: RegistrySettings,
    pub classifier: ClassifierSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationSettings {
    /// Share of the shuffled corpus used for training.
    pub split_ratio: f64,
    /// Fixed shuffle seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            split_ratio: DEFAULT_SPLIT_RATIO,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    pub confidence_scale: f64,
    pub max_alternatives: usize,
    /// Frequency reported when the registry has no mapping for a condition.
    pub fallback_frequency: String,
    pub fallback_description: String,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            confidence_scale: DEFAULT_CONFIDENCE_SCALE,
            max_alternatives: DEFAULT_MAX_ALTERNATIVES,
            fallback_frequency: "432 Hz".to_string(),
            fallback_description: "Natural healing frequency".to_string(),
        }
    }
}

impl PredictorConfig {
    pub fn settings(&self) -> PredictorSettings {
        PredictorSettings {
            confidence_scale: self.confidence_scale,
            max_alternatives: self.max_alternatives,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    /// SQLite file; defaults to `symptra.db` in the app directory.
    pub database_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSettings {
    pub model_name: String,
    pub model_version: String,
    pub tie_break: TieBreak,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            model_name: "SimpleDecisionTree".to_string(),
            model_version: "1.0".to_string(),
            tie_break: TieBreak::default(),
        }
    }
}

impl SymptraConfig {
    pub fn evaluate_options(&self) -> EvaluateOptions {
        EvaluateOptions {
            split_ratio: self.evaluation.split_ratio,
            seed: self.evaluation.seed,
            tie_break: self.classifier.tie_break,
        }
    }

    /// Configured database path, or the default file in the app directory.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.registry.database_path {
            Some(path) => Ok(path.clone()),
            None => Ok(app_dirs::app_root_dir()
                .map_err(map_app_dir_error)?
                .join(DB_FILE_NAME)),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ratio = self.evaluation.split_ratio;
        if !(ratio > 0.0 && ratio < 1.0) {
            return Err(ConfigError::Invalid {
                field: "evaluation.split_ratio",
                message: format!("must lie strictly between 0 and 1, got {ratio}"),
            });
        }
        let scale = self.predictor.confidence_scale;
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ConfigError::Invalid {
                field: "predictor.confidence_scale",
                message: format!("must be a positive number, got {scale}"),
            });
        }
        let alternatives = self.predictor.max_alternatives;
        if alternatives > MAX_ALTERNATIVES {
            return Err(ConfigError::Invalid {
                field: "predictor.max_alternatives",
                message: format!("must be at most {MAX_ALTERNATIVES}, got {alternatives}"),
            });
        }
        if self.classifier.model_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "classifier.model_name",
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Resolve the configuration file path, ensuring the parent directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dir = app_dirs::app_root_dir().map_err(map_app_dir_error)?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Load configuration from the app directory, returning defaults if missing.
pub fn load_or_default() -> Result<SymptraConfig, ConfigError> {
    load_from(&config_path()?)
}

/// Load and validate configuration from `path`; a missing file yields defaults.
pub fn load_from(path: &Path) -> Result<SymptraConfig, ConfigError> {
    if !path.exists() {
        return Ok(SymptraConfig::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: SymptraConfig = toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

fn map_app_dir_error(error: app_dirs::AppDirError) -> ConfigError {
    match error {
        app_dirs::AppDirError::NoBaseDir => ConfigError::NoConfigDir,
        app_dirs::AppDirError::CreateDir { path, source } => {
            ConfigError::CreateDir { path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_dirs::{APP_DIR_NAME, OverrideGuard};
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = load_from(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, SymptraConfig::default());
        assert_eq!(config.evaluation.split_ratio, 0.8);
        assert_eq!(config.predictor.confidence_scale, 1.5);
        assert_eq!(config.predictor.max_alternatives, 3);
        assert_eq!(config.predictor.fallback_frequency, "432 Hz");
        assert_eq!(config.classifier.model_name, "SimpleDecisionTree");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "[evaluation]\nseed = 42\n\n[classifier]\ntie_break = \"last_inserted\"\n",
        )
        .unwrap();
        let config = load_from(&path).unwrap();
        assert_eq!(config.evaluation.seed, Some(42));
        assert_eq!(config.evaluation.split_ratio, 0.8);
        assert_eq!(config.classifier.tie_break, TieBreak::LastInserted);
        assert_eq!(config.classifier.model_version, "1.0");
        let options = config.evaluate_options();
        assert_eq!(options.seed, Some(42));
        assert_eq!(options.tie_break, TieBreak::LastInserted);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[evaluation]\nsplit_ratio = 1.0\n").unwrap();
        assert!(matches!(
            load_from(&path),
            Err(ConfigError::Invalid {
                field: "evaluation.split_ratio",
                ..
            })
        ));
        std::fs::write(&path, "[predictor]\nconfidence_scale = 0.0\n").unwrap();
        assert!(matches!(
            load_from(&path),
            Err(ConfigError::Invalid {
                field: "predictor.confidence_scale",
                ..
            })
        ));
        std::fs::write(&path, "[predictor]\nmax_alternatives = 6\n").unwrap();
        assert!(matches!(
            load_from(&path),
            Err(ConfigError::Invalid {
                field: "predictor.max_alternatives",
                ..
            })
        ));
        std::fs::write(&path, "[predictor]\nmax_alternatives = 0\n").unwrap();
        assert_eq!(load_from(&path).unwrap().predictor.max_alternatives, 0);
    }

    #[test]
    fn malformed_toml_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[evaluation\n").unwrap();
        match load_from(&path) {
            Err(ConfigError::ParseToml { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn database_defaults_to_app_dir() {
        let base = tempdir().unwrap();
        let _guard = OverrideGuard::set(base.path().to_path_buf());
        let config = load_or_default().unwrap();
        assert_eq!(
            config.database_path().unwrap(),
            base.path().join(APP_DIR_NAME).join(DB_FILE_NAME)
        );
    }
}
