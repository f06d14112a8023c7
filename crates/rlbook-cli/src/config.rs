//! Configuration loading for the rlbook CLI

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE: &str = "rlbook.toml";

/// Configuration for the CLI
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub bandit: BanditConfig,
    pub evaluation: EvaluationConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BanditConfig {
    pub epsilon: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub step_delay_ms: u64,
}

impl Default for BanditConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.05,
            steps: None,
            seed: None,
            step_delay_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub theta: f64,
    pub gamma: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_sweeps: Option<usize>,
    pub report_sweeps: Vec<usize>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            theta: 1e-12,
            gamma: 1.0,
            max_sweeps: Some(100_000),
            report_sweeps: rlbook_rl::monitor::DEFAULT_DISPLAY_SWEEPS.to_vec(),
        }
    }
}

impl Config {
    /// Load configuration from the first config file found and environment
    pub fn load() -> Result<Self> {
        Self::load_from(Self::find_config_file().as_deref())
    }

    /// Load configuration from `path` (if any) and environment.
    ///
    /// A `path` that does not exist is an error.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut builder = ConfigBuilder::<config::builder::DefaultState>::default();

        if let Some(path) = path {
            tracing::debug!("Loading config from: {:?}", path);
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }

        // Environment variables with RLBOOK_ prefix, eg. RLBOOK_BANDIT__EPSILON
        builder = builder.add_source(
            Environment::with_prefix("RLBOOK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Find the configuration file
    pub fn find_config_file() -> Option<PathBuf> {
        // Check in order: RLBOOK_CONFIG env, ./rlbook.toml, ~/.config/rlbook/rlbook.toml
        if let Ok(path) = std::env::var("RLBOOK_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".config").join("rlbook").join(CONFIG_FILE);
            if user_config.exists() {
                return Some(user_config);
            }
        }

        None
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.bandit.epsilon, 0.05);
        assert!(config.bandit.steps.is_none());
        assert_eq!(config.evaluation.theta, 1e-12);
        assert_eq!(config.evaluation.gamma, 1.0);
        assert_eq!(config.evaluation.report_sweeps, vec![1, 2, 3, 10, 100, 1000]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[bandit]
epsilon = 0.2
steps = 500
seed = 42

[evaluation]
theta = 0.001
gamma = 0.9
"#
        )
        .unwrap();

        let config = Config::load_from(Some(file.path())).unwrap();

        assert_eq!(config.bandit.epsilon, 0.2);
        assert_eq!(config.bandit.steps, Some(500));
        assert_eq!(config.bandit.seed, Some(42));
        assert_eq!(config.evaluation.theta, 0.001);
        assert_eq!(config.evaluation.gamma, 0.9);
        // Untouched sections keep their defaults
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.evaluation.max_sweeps, Some(100_000));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load_from(Some(&dir.path().join("missing.toml")));

        assert!(result.is_err());
    }

    #[test]
    fn test_no_file_uses_defaults() {
        let config = Config::load_from(None).unwrap();

        assert_eq!(config.bandit.step_delay_ms, 0);
        assert_eq!(config.evaluation.theta, 1e-12);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.bandit.seed = Some(7);

        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("[bandit]"));
        assert!(rendered.contains("seed = 7"));
        assert!(!rendered.contains("steps"));

        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.bandit.seed, Some(7));
        assert_eq!(parsed.evaluation.report_sweeps, config.evaluation.report_sweeps);
    }
}
