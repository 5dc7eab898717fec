//! CSV file implementation of the change log.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use super::{ChangeLog, LogError, ObservationRecord, check_address};

/// First line of every log file.
pub const HEADER: &str = "timestamp,ip";

/// Default log file name, relative to the working directory.
pub const DEFAULT_FILE_NAME: &str = "ip_log.csv";

/// Change log stored as a two-column CSV file.
///
/// # Format
///
/// ```text
/// timestamp,ip
/// 2024-01-01 12:00:00,203.0.113.5
/// 2024-01-01 12:05:00,203.0.113.9
/// ```
///
/// Fields are not quoted. Appends refuse addresses containing a comma or
/// line break, so every record stays on one line with exactly two fields.
/// The header is written whenever an append finds the file missing or empty.
///
/// # Concurrency
///
/// File access runs on tokio's blocking pool under an internal lock, so a
/// display reading the log never observes a half-written append from the
/// monitor. The lock is held until the file operation finishes, even if the
/// calling future is dropped.
#[derive(Debug)]
pub struct CsvChangeLog {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl CsvChangeLog {
    /// Creates a log backed by the file at `path`.
    ///
    /// The file is not touched until the first operation.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the path to the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs `op` on the blocking pool while holding the log lock.
    async fn with_file<T, F>(&self, op: F) -> io::Result<T>
    where
        F: FnOnce(&Path) -> io::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.path.clone();
        let lock = Arc::clone(&self.lock);

        tokio::task::spawn_blocking(move || {
            // The guarded data is `()`, so a poisoned lock carries no broken state.
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            op(&path)
        })
        .await
        .unwrap_or_else(|join_error| Err(io::Error::other(join_error)))
    }

    fn append_blocking(path: &Path, line: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;

        // Header and record go out in one write so a fresh file never
        // holds a header without its first record.
        let mut buf = String::new();
        if file.metadata()?.len() == 0 {
            buf.push_str(HEADER);
            buf.push('\n');
        }
        buf.push_str(line);
        buf.push('\n');

        file.write_all(buf.as_bytes())?;
        file.flush()?;
        file.sync_data()
    }

    fn read_blocking(path: &Path) -> io::Result<Vec<ObservationRecord>> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut records = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            if index == 0 && line.trim_end() == HEADER {
                continue;
            }
            match line.parse::<ObservationRecord>() {
                Ok(record) => records.push(record),
                Err(reason) => {
                    tracing::debug!("Skipping malformed log line {}: {reason}", index + 1);
                }
            }
        }

        Ok(records)
    }

    fn clear_blocking(path: &Path) -> io::Result<()> {
        match std::fs::remove_file(path) {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            result => result,
        }
    }
}

impl ChangeLog for CsvChangeLog {
    async fn append(&self, record: &ObservationRecord) -> Result<(), LogError> {
        check_address(&record.address).map_err(|reason| LogError::InvalidRecord {
            path: self.path.clone(),
            reason,
        })?;

        let line = record.to_line();
        self.with_file(move |path| Self::append_blocking(path, &line))
            .await
            .map_err(|source| LogError::Append {
                path: self.path.clone(),
                source,
            })
    }

    async fn read_all(&self) -> Result<Vec<ObservationRecord>, LogError> {
        self.with_file(Self::read_blocking)
            .await
            .map_err(|source| LogError::Read {
                path: self.path.clone(),
                source,
            })
    }

    async fn clear(&self) -> Result<(), LogError> {
        self.with_file(Self::clear_blocking)
            .await
            .map_err(|source| LogError::Clear {
                path: self.path.clone(),
                source,
            })
    }
}
