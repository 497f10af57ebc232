//! TOML Configuration File Support
//!
//! Centralized configuration loading, supporting a TOML configuration file at
//! `~/.config/skycast/skycast.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (applied by the binary)
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # XDG Base Directory Compliance
//!
//! - `$XDG_CONFIG_HOME/skycast/skycast.toml` (typically `~/.config/skycast/skycast.toml`)
//!
//! # Example Configuration
//!
//! ```toml
//! [lookup]
//! api_key = "0123456789abcdef"
//! base_url = "https://api.openweathermap.org"
//! units = "metric"
//! timeout_secs = 10
//!
//! [widget]
//! seed_history = true
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Overrides |
//! |---|---|
//! | `SKYCAST_API_KEY` (or `OPENWEATHER_API_KEY`) | `lookup.api_key` |
//! | `SKYCAST_BASE_URL` | `lookup.base_url` |
//! | `SKYCAST_UNITS` | `lookup.units` |
//! | `SKYCAST_TIMEOUT_SECS` | `lookup.timeout_secs` |

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{State, Units};

/// Default OpenWeather host
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Where the effective API key came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Command-line argument
    Cli,
    /// Environment variable
    Env,
    /// Configuration file
    File,
    /// Built-in default
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[lookup]` section as written in the file
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupToml {
    /// OpenWeather API key
    pub api_key: Option<String>,

    /// Provider base URL
    pub base_url: Option<String>,

    /// `metric`, `imperial` or `standard`
    pub units: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// `[widget]` section as written in the file
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetToml {
    /// Start with the London entry in the history
    pub seed_history: Option<bool>,
}

/// Whole file
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkycastToml {
    /// Lookup settings
    pub lookup: LookupToml,

    /// Widget settings
    pub widget: WidgetToml,
}

// =============================================================================
// Main Configuration Structs
// =============================================================================

/// Effective lookup settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupConfig {
    /// API key, if any
    pub api_key: Option<String>,
    /// Provider base URL
    pub base_url: String,
    /// Unit system requested and rendered
    pub units: Units,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            units: Units::Metric,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl LookupConfig {
    /// Defaults overridden by environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = SkycastConfig::default();
        apply_env_config(&mut config);
        config.lookup
    }
}

/// Effective widget settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Start with the London entry in the history
    pub seed_history: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self { seed_history: true }
    }
}

/// Complete effective configuration
#[derive(Clone, Debug)]
pub struct SkycastConfig {
    /// Lookup settings
    pub lookup: LookupConfig,

    /// Widget settings
    pub widget: WidgetConfig,

    /// File the configuration was read from, if any
    pub config_file_path: Option<PathBuf>,

    /// Where the API key came from
    api_key_source: ConfigSource,
}

impl Default for SkycastConfig {
    fn default() -> Self {
        Self {
            lookup: LookupConfig::default(),
            widget: WidgetConfig::default(),
            config_file_path: None,
            api_key_source: ConfigSource::Default,
        }
    }
}

impl SkycastConfig {
    /// Create with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Where the API key came from
    #[must_use]
    pub fn api_key_source(&self) -> ConfigSource {
        self.api_key_source
    }

    /// Override the API key from the command line
    pub fn set_cli_api_key(&mut self, api_key: impl Into<String>) {
        self.lookup.api_key = Some(api_key.into());
        self.api_key_source = ConfigSource::Cli;
    }

    /// Startup state for the widget
    #[must_use]
    pub fn initial_state(&self) -> State {
        let state = if self.widget.seed_history {
            State::seeded()
        } else {
            State::empty()
        };
        state.with_units(self.lookup.units)
    }

    /// Check values that parse but make no sense
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for a zero timeout or a base URL
    /// that is not http(s).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookup.timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "lookup.timeout_secs must be greater than zero".to_string(),
            ));
        }
        let url = &self.lookup.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "lookup.base_url must start with http:// or https:// (got '{url}')"
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Default config file location
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("skycast").join("skycast.toml"))
}

/// Load configuration from the default location plus environment
///
/// # Errors
///
/// See [`load_config_from_path`].
pub fn load_config() -> Result<SkycastConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from `path` (if it exists) plus environment
///
/// A missing file is not an error; defaults are used instead.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file exists but cannot be read or parsed, or
/// if the resulting values fail validation.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<SkycastConfig, ConfigError> {
    let mut config = SkycastConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: SkycastToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.clone());

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config);
    config.validate()?;

    tracing::debug!(
        api_key_source = %config.api_key_source,
        units = config.lookup.units.as_query(),
        "Configuration resolved"
    );
    Ok(config)
}

fn apply_toml_config(config: &mut SkycastConfig, toml: &SkycastToml) -> Result<(), ConfigError> {
    if let Some(ref key) = toml.lookup.api_key {
        config.lookup.api_key = Some(key.clone());
        config.api_key_source = ConfigSource::File;
    }
    if let Some(ref url) = toml.lookup.base_url {
        config.lookup.base_url.clone_from(url);
    }
    if let Some(ref units) = toml.lookup.units {
        config.lookup.units = units
            .parse()
            .map_err(|e| ConfigError::ValidationError(format!("lookup.units: {e}")))?;
    }
    if let Some(secs) = toml.lookup.timeout_secs {
        config.lookup.timeout = Duration::from_secs(secs);
    }
    if let Some(seed) = toml.widget.seed_history {
        config.widget.seed_history = seed;
    }
    Ok(())
}

fn apply_env_config(config: &mut SkycastConfig) {
    apply_env_from(config, |name| std::env::var(name).ok());
}

/// Apply overrides from any variable source
fn apply_env_from(config: &mut SkycastConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(key) = var("SKYCAST_API_KEY").or_else(|| var("OPENWEATHER_API_KEY")) {
        config.lookup.api_key = Some(key);
        config.api_key_source = ConfigSource::Env;
    }
    if let Some(url) = var("SKYCAST_BASE_URL") {
        config.lookup.base_url = url;
    }
    if let Some(units) = var("SKYCAST_UNITS") {
        match units.parse() {
            Ok(units) => config.lookup.units = units,
            Err(e) => tracing::warn!(error = %e, "Ignoring SKYCAST_UNITS"),
        }
    }
    if let Some(timeout) = var("SKYCAST_TIMEOUT_SECS") {
        match timeout.parse::<u64>() {
            Ok(secs) => config.lookup.timeout = Duration::from_secs(secs),
            Err(e) => tracing::warn!(error = %e, "Ignoring SKYCAST_TIMEOUT_SECS"),
        }
    }
}
