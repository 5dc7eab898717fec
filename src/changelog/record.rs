//! Observation records and their on-disk line format.

use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDateTime, SubsecRound};
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Timestamp format used in the log file and for display.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single observed external address.
///
/// Timestamps are local wall-clock time with second precision, matching
/// what is written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObservationRecord {
    /// When the address was observed.
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
    /// The observed address, as returned by the provider.
    pub address: String,
}

/// Reasons a log line could not be read as a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRecord {
    /// The line has no field separator.
    #[error("missing ',' separator")]
    MissingSeparator,

    /// The line has more than two fields.
    #[error("unexpected extra field")]
    ExtraField,

    /// The timestamp field does not match [`TIMESTAMP_FORMAT`].
    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    /// The address field is empty.
    #[error("empty address")]
    EmptyAddress,

    /// The address holds a separator or line break and would not read back
    /// as the same record.
    #[error("address contains forbidden character {0:?}")]
    ForbiddenCharacter(char),

    /// The address has leading or trailing whitespace, which readers strip.
    #[error("address has surrounding whitespace")]
    SurroundingWhitespace,
}

impl ObservationRecord {
    /// Creates a record from an already truncated local timestamp.
    #[must_use]
    pub fn new(timestamp: NaiveDateTime, address: impl Into<String>) -> Self {
        Self {
            timestamp,
            address: address.into(),
        }
    }

    /// Creates a record for `address` observed at wall-clock `time`.
    ///
    /// The time is converted to local time and truncated to whole seconds.
    #[must_use]
    pub fn observed_at(time: SystemTime, address: impl Into<String>) -> Self {
        Self::new(local_timestamp(time), address)
    }

    /// Returns the timestamp formatted as `YYYY-MM-DD HH:MM:SS`.
    #[must_use]
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Returns the record as a log line, without a trailing newline.
    #[must_use]
    pub fn to_line(&self) -> String {
        format!("{},{}", self.formatted_timestamp(), self.address)
    }
}

impl fmt::Display for ObservationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.address, self.formatted_timestamp())
    }
}

impl FromStr for ObservationRecord {
    type Err = MalformedRecord;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (timestamp, address) = line
            .trim_end_matches(['\r', '\n'])
            .split_once(',')
            .ok_or(MalformedRecord::MissingSeparator)?;

        if address.contains(',') {
            return Err(MalformedRecord::ExtraField);
        }

        let timestamp = NaiveDateTime::parse_from_str(timestamp.trim(), TIMESTAMP_FORMAT)
            .map_err(|_| MalformedRecord::InvalidTimestamp(timestamp.to_string()))?;

        let address = address.trim();
        if address.is_empty() {
            return Err(MalformedRecord::EmptyAddress);
        }

        Ok(Self::new(timestamp, address))
    }
}

/// Checks that `address` fits in the address field of a log line.
///
/// # Errors
///
/// Returns [`MalformedRecord::EmptyAddress`] for a blank address,
/// [`MalformedRecord::ForbiddenCharacter`] for a `,` or line break, and
/// [`MalformedRecord::SurroundingWhitespace`] if trimming would change it.
pub fn check_address(address: &str) -> Result<(), MalformedRecord> {
    if address.trim().is_empty() {
        return Err(MalformedRecord::EmptyAddress);
    }
    if let Some(c) = address.chars().find(|&c| matches!(c, ',' | '\r' | '\n')) {
        return Err(MalformedRecord::ForbiddenCharacter(c));
    }
    if address.trim() != address {
        return Err(MalformedRecord::SurroundingWhitespace);
    }
    Ok(())
}

/// Converts a wall-clock time to a local timestamp with second precision.
#[must_use]
pub fn local_timestamp(time: SystemTime) -> NaiveDateTime {
    DateTime::<Local>::from(time).naive_local().trunc_subsecs(0)
}

pub(super) fn serialize_timestamp<S: Serializer>(
    timestamp: &NaiveDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&timestamp.format(TIMESTAMP_FORMAT))
}
