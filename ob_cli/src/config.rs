//! CLI configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::path::PathBuf;

use open_bracket::{GUEST_USER, Settings, UserId};

/// Complete CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Directory holding tournament documents and change logs
    pub data_dir: PathBuf,
    /// Format for new tournaments: `de` or `se`
    pub format: String,
    /// Append a reset match to double elimination brackets
    pub extra_match: bool,
    /// Add a third place match to single elimination brackets
    pub third_place: bool,
    /// Referee recorded on committed edits
    pub referee: UserId,
}

impl CliConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `data_dir_override` - Optional data directory override (from CLI args)
    /// * `format_override` - Optional format override (from CLI args)
    /// * `referee_override` - Optional referee id override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but cannot be parsed
    pub fn from_env(
        data_dir_override: Option<PathBuf>,
        format_override: Option<String>,
        referee_override: Option<UserId>,
    ) -> Result<Self, ConfigError> {
        let data_dir = data_dir_override
            .or_else(|| std::env::var("OB_DATA_DIR").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));

        let format = format_override
            .or_else(|| std::env::var("OB_DEFAULT_FORMAT").ok())
            .unwrap_or_else(|| "de".to_string())
            .to_lowercase();

        let referee = match referee_override {
            Some(referee) => referee,
            None => match std::env::var("OB_REFEREE_ID") {
                Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                    var: "OB_REFEREE_ID".to_string(),
                    reason: format!("Not an integer: {raw}"),
                })?,
                Err(_) => GUEST_USER,
            },
        };

        Ok(CliConfig {
            data_dir,
            format,
            extra_match: parse_env_or("OB_EXTRA_MATCH", true),
            third_place: parse_env_or("OB_THIRD_PLACE", false),
            referee,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                var: "OB_DATA_DIR".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        self.settings().map(|_| ())
    }

    /// Bracket settings for new tournaments
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        match self.format.as_str() {
            "de" => Ok(Settings::DoubleElimination {
                has_extra_match: self.extra_match,
            }),
            "se" => Ok(Settings::SingleElimination {
                has_third_place: self.third_place,
            }),
            other => Err(ConfigError::Invalid {
                var: "OB_DEFAULT_FORMAT".to_string(),
                reason: format!("Unknown format '{other}', expected 'de' or 'se'"),
            }),
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
