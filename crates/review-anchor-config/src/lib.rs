use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Popup placement distances, in the units of the front-end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub padding: f32,
    pub gap: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            padding: 16.0,
            gap: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndentConfig {
    /// Lines examined when detecting the indentation style
    pub sample_lines: usize,
    /// Space width used when the buffer has no indented lines
    pub default_width: usize,
}

impl Default for IndentConfig {
    fn default() -> Self {
        Self {
            sample_lines: 100,
            default_width: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Name recorded on new comments
    pub author: String,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            author: std::env::var("USER").unwrap_or_else(|_| "reviewer".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default `log` filter when `RUST_LOG` is not set
    pub log_level: String,
    pub placement: PlacementConfig,
    pub indent: IndentConfig,
    pub review: ReviewConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            placement: PlacementConfig::default(),
            indent: IndentConfig::default(),
            review: ReviewConfig::default(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables in the author name, e.g. "$USER"
        config.review.author = Self::expand(&config.review.author).unwrap_or(config.review.author);

        config.validate()?;
        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// Load the config file, falling back to defaults when there is none
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Ok(Self::load()?.unwrap_or_default())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/review-anchor");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.placement.padding >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "placement.padding",
                reason: format!("must be zero or more, got {}", self.placement.padding),
            });
        }
        if !(self.placement.gap >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "placement.gap",
                reason: format!("must be zero or more, got {}", self.placement.gap),
            });
        }
        if self.indent.sample_lines == 0 {
            return Err(ConfigError::InvalidValue {
                field: "indent.sample_lines",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(2..=8).contains(&self.indent.default_width) {
            return Err(ConfigError::InvalidValue {
                field: "indent.default_width",
                reason: format!("must be between 2 and 8, got {}", self.indent.default_width),
            });
        }
        Ok(())
    }

    fn expand(value: &str) -> Option<String> {
        match shellexpand::full(value) {
            Ok(expanded) => Some(expanded.into_owned()),
            Err(_) => None,
        }
    }
}
