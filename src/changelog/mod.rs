//! Durable history of observed address changes.
//!
//! This module provides:
//! - The observation record and its line format ([`ObservationRecord`])
//! - The storage abstraction ([`ChangeLog`]) and its CSV file implementation ([`CsvChangeLog`])
//! - Read-back helpers for display ([`aggregate`], [`SeriesTable`], [`newest_first`])

mod aggregate;
mod file;
mod record;


pub use aggregate::{SeriesRow, SeriesTable, aggregate, newest_first};
pub use file::{CsvChangeLog, DEFAULT_FILE_NAME, HEADER};
pub use record::{
    MalformedRecord, ObservationRecord, TIMESTAMP_FORMAT, check_address, local_timestamp,
};

use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur while accessing the change log.
///
/// Malformed lines are not errors; readers skip them.
#[derive(Debug, Error)]
pub enum LogError {
    /// The record would not survive the line format; nothing was written.
    #[error("Refusing to append to change log '{}': {reason}", path.display())]
    InvalidRecord {
        /// Path to the log file
        path: PathBuf,
        /// Why the record was refused
        #[source]
        reason: MalformedRecord,
    },

    /// Failed to append a record.
    #[error("Failed to append to change log '{}': {source}", path.display())]
    Append {
        /// Path to the log file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Failed to read the log.
    #[error("Failed to read change log '{}': {source}", path.display())]
    Read {
        /// Path to the log file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Failed to delete the log.
    #[error("Failed to clear change log '{}': {source}", path.display())]
    Clear {
        /// Path to the log file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Append-only store of address observations.
///
/// Implementations must:
/// - Write a record durably before `append` returns
/// - Refuse a record whose address fails [`check_address`] without writing
/// - Return records from `read_all` in append order
/// - Leave the store empty after `clear`, so the next `append` starts fresh
/// - Serialize their own operations; the store is shared between the
///   monitor and whoever displays the history
pub trait ChangeLog: Send + Sync {
    /// Appends one record to the end of the log.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidRecord`] if the address does not pass
    /// [`check_address`], or [`LogError::Append`] if the record could not be
    /// written.
    fn append(
        &self,
        record: &ObservationRecord,
    ) -> impl Future<Output = Result<(), LogError>> + Send;

    /// Reads every well-formed record in append order.
    ///
    /// A missing store reads as empty.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Read`] if the store exists but cannot be read.
    fn read_all(&self) -> impl Future<Output = Result<Vec<ObservationRecord>, LogError>> + Send;

    /// Removes every record.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Clear`] if the store exists but cannot be removed.
    fn clear(&self) -> impl Future<Output = Result<(), LogError>> + Send;
}

impl<T: ChangeLog> ChangeLog for Arc<T> {
    fn append(
        &self,
        record: &ObservationRecord,
    ) -> impl Future<Output = Result<(), LogError>> + Send {
        (**self).append(record)
    }

    fn read_all(&self) -> impl Future<Output = Result<Vec<ObservationRecord>, LogError>> + Send {
        (**self).read_all()
    }

    fn clear(&self) -> impl Future<Output = Result<(), LogError>> + Send {
        (**self).clear()
    }
}
