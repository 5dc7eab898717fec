//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Monitoring configuration
    #[serde(default)]
    pub monitor: MonitorSection,

    /// Address lookup service configuration
    #[serde(default)]
    pub provider: ProviderSection,

    /// Change log configuration
    #[serde(default)]
    pub log: LogSection,

    /// Change notification configuration
    #[serde(default)]
    pub notify: NotifySection,
}

/// Monitoring configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorSection {
    /// Check interval in seconds
    pub interval: Option<u64>,

    /// Start with monitoring stopped
    #[serde(default)]
    pub paused: bool,
}

/// Address lookup service section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderSection {
    /// Lookup service URL
    pub url: Option<String>,
}

/// Change log section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    /// Path to the CSV change log
    pub file: Option<PathBuf>,
}

/// Change notification section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotifySection {
    /// Ring the terminal bell on change
    pub bell: Option<bool>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# ipwatch Configuration File

[monitor]
# Check interval in seconds, 10 to 3600 (default: 60)
interval = 60

# Start with monitoring stopped; type `start` to begin (default: false)
# paused = false

[provider]
# Lookup service returning the external address as plain text
# url = "https://api.ipify.org"

[log]
# CSV change log; `~` expands to the home directory (default: ip_log.csv)
# file = "ip_log.csv"

[notify]
# Ring the terminal bell when the address changes (default: true)
# --no-bell on the command line always wins
# bell = true
"#
    .to_string()
}
