//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use crate::monitor::CheckInterval;

/// Default address lookup service.
pub const PROVIDER_URL: &str = "https://api.ipify.org";

/// Default change log path, relative to the working directory.
pub const LOG_FILE: &str = crate::changelog::DEFAULT_FILE_NAME;

/// Default check interval in seconds.
pub const INTERVAL_SECS: u64 = CheckInterval::DEFAULT_SECS;

/// Whether the terminal bell rings on change by default.
pub const BELL: bool = true;
