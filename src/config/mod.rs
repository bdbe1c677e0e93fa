//! Application configuration.
//!
//! Loaded from YAML files and `INTERPOSE__`-prefixed environment variables.
//! Selects the log filter and the rule table binding logging advice to
//! service methods.

use serde::Deserialize;

use crate::advice::{AdviceKind, Selector};
use crate::logging::{default_rules, Rule, DEFAULT_TYPE_NAME};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "interpose.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "INTERPOSE_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "INTERPOSE";
/// Environment variable for logging configuration.
pub const LOG_ENV_VAR: &str = "INTERPOSE_LOG";

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration.
    pub log: LogConfig,
    /// Advice rule configuration.
    pub advice: AdviceConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive, used when `INTERPOSE_LOG` is unset.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Advice rule configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdviceConfig {
    /// Declaring type the service is advised under. Every rule must target it.
    pub type_name: String,
    /// Explicit rule table. Falls back to the default table when absent.
    pub rules: Option<Vec<RuleConfig>>,
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            type_name: DEFAULT_TYPE_NAME.to_string(),
            rules: None,
        }
    }
}

/// One configured rule.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleConfig {
    /// Target as `Type.method`.
    pub selector: String,
    /// Advice kind to bind.
    pub kind: AdviceKind,
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `interpose.yaml` in current directory (if exists)
    /// 2. File specified by `path` argument (if provided)
    /// 3. File specified by `CONFIG_ENV_VAR` environment variable (if set)
    /// 4. Environment variables with `CONFIG_ENV_PREFIX` prefix
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Parse configuration from a YAML document.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Resolve the rule table.
    ///
    /// Every explicit rule must target `advice.type_name`, the type the
    /// service is wrapped under; any other type could never match.
    pub fn rules(&self) -> Result<Vec<Rule>, ConfigError> {
        let Some(rules) = &self.advice.rules else {
            return Ok(default_rules(&self.advice.type_name));
        };

        rules
            .iter()
            .map(|rule| -> Result<Rule, ConfigError> {
                let selector = Selector::parse(&rule.selector).map_err(|_| ConfigError::Selector {
                    selector: rule.selector.clone(),
                })?;
                if selector.type_name() != self.advice.type_name {
                    return Err(ConfigError::TypeMismatch {
                        selector: rule.selector.clone(),
                        type_name: self.advice.type_name.clone(),
                    });
                }
                Ok(Rule::new(selector, rule.kind))
            })
            .collect()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid rule selector '{selector}': expected Type.method")]
    Selector { selector: String },

    #[error("Rule selector '{selector}' does not target the advised type '{type_name}'")]
    TypeMismatch { selector: String, type_name: String },
}
