//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

use crate::monitor::CheckInterval;

use super::cli::Cli;
use super::defaults;
use super::error::ConfigError;
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    /// Time between checks
    pub interval: CheckInterval,

    /// Whether monitoring starts stopped
    pub paused: bool,

    /// Address lookup service
    pub provider_url: Url,

    /// Change log path, with `~` expanded
    pub log_file: PathBuf,

    /// Ring the terminal bell on change
    pub bell: bool,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ provider: {}, interval: {}, paused: {}, log_file: {}, bell: {} }}",
            self.provider_url,
            self.interval,
            self.paused,
            self.log_file.display(),
            self.bell,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The interval is outside 10..=3600 seconds
    /// - The provider URL is invalid or not http(s)
    /// - The log file path is empty
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let interval = Self::resolve_interval(cli, toml)?;
        let provider_url = Self::resolve_provider_url(cli, toml)?;
        let log_file = Self::resolve_log_file(cli, toml)?;

        let paused = cli.paused || toml.is_some_and(|t| t.monitor.paused);

        let bell = !cli.no_bell
            && toml
                .and_then(|t| t.notify.bell)
                .unwrap_or(defaults::BELL);

        Ok(Self {
            interval,
            paused,
            provider_url,
            log_file,
            bell,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_interval(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<CheckInterval, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let seconds = cli
            .interval
            .or_else(|| toml.and_then(|t| t.monitor.interval))
            .unwrap_or(defaults::INTERVAL_SECS);

        Ok(CheckInterval::from_secs(seconds)?)
    }

    fn resolve_provider_url(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        let url_str = cli
            .provider_url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.provider.url.as_deref()))
            .unwrap_or(defaults::PROVIDER_URL);

        let url = Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: url_str.to_string(),
                reason: format!("unsupported scheme '{}', expected http or https", url.scheme()),
            });
        }

        Ok(url)
    }

    fn resolve_log_file(cli: &Cli, toml: Option<&TomlConfig>) -> Result<PathBuf, ConfigError> {
        let path = cli
            .log_file
            .as_deref()
            .or_else(|| toml.and_then(|t| t.log.file.as_deref()))
            .unwrap_or_else(|| Path::new(defaults::LOG_FILE));

        if path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyLogFile);
        }

        Ok(expand_tilde(path))
    }
}

/// Expands a leading `~` to the home directory.
///
/// Paths without a leading `~` component, and all paths when the home
/// directory cannot be determined, are returned unchanged.
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };

    match dirs::home_dir() {
        Some(home) if rest.as_os_str().is_empty() => home,
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
