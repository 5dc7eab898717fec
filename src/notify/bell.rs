//! Audible terminal bell.

use std::io::{self, Stderr, Write};
use std::sync::{Mutex, PoisonError};

use super::{Notifier, NotifyError};
use crate::changelog::ObservationRecord;

/// ASCII BEL; terminals turn it into a beep or a visual flash.
const BEL: &[u8] = b"\x07";

/// Notifier that rings the terminal bell.
///
/// Writes to stderr by default so it never interleaves with report output
/// on stdout.
#[derive(Debug)]
pub struct TerminalBell<W = Stderr> {
    out: Mutex<W>,
}

impl TerminalBell<Stderr> {
    /// Creates a bell that rings on stderr.
    #[must_use]
    pub fn new() -> Self {
        Self::with_writer(io::stderr())
    }
}

impl Default for TerminalBell<Stderr> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalBell<W> {
    /// Creates a bell that rings on the given writer.
    #[must_use]
    pub const fn with_writer(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Consumes the bell and returns the writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> Notifier for TerminalBell<W> {
    fn notify(
        &self,
        _current: &ObservationRecord,
        _previous: Option<&str>,
    ) -> Result<(), NotifyError> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        out.write_all(BEL)?;
        out.flush()?;
        Ok(())
    }
}
