//! Human-readable game transcript written to an injected sink

use std::fmt::Display;
use std::io::Write;

use log::warn;

use crate::error::TranscriptError;

/// Line-oriented writer owned by a tournament.
///
/// The sink is acquired at construction and released by `finish` (or on
/// drop): flushed first, then closed. A failed write disables the sink and is
/// kept for the final report instead of interrupting play.
pub struct Transcript {
    sink: Option<Box<dyn Write>>,
    verbose: bool,
    error: Option<TranscriptError>,
}

impl Transcript {
    pub fn new(sink: Option<Box<dyn Write>>, verbose: bool) -> Self {
        Self {
            sink,
            verbose,
            error: None,
        }
    }

    /// A transcript that writes nothing
    pub fn discard() -> Self {
        Self::new(None, false)
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Write a line unconditionally
    pub fn line(&mut self, text: impl Display) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        if let Err(err) = writeln!(sink, "{}", text) {
            warn!("transcript write failed, disabling sink: {}", err);
            self.error = Some(err.into());
            self.sink = None;
        }
    }

    /// Write a line only in verbose mode
    pub fn detail(&mut self, text: impl Display) {
        if self.verbose {
            self.line(text);
        }
    }

    /// Flush and close the sink, reporting the first failure seen
    pub fn finish(&mut self) -> Option<TranscriptError> {
        if let Some(mut sink) = self.sink.take() {
            if let Err(err) = sink.flush() {
                warn!("transcript flush failed: {}", err);
                if self.error.is_none() {
                    self.error = Some(err.into());
                }
            }
            drop(sink);
        }
        self.error.take()
    }
}

impl Drop for Transcript {
    fn drop(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            let _ = sink.flush();
        }
    }
}
