//! User-facing message output
//!
//! The quiet flag travels with the reporter instead of living in a global.

use std::io::{self, Write};

/// Writes informational and error messages for the user
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    quiet: bool,
}

impl Reporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Informational message on stdout, suppressed when quiet
    pub fn info(&self, message: impl AsRef<str>) {
        if !self.quiet {
            println!("{}", message.as_ref());
        }
    }

    /// Error message on stderr, always shown
    pub fn error(&self, message: impl AsRef<str>) {
        let mut stderr = io::stderr();
        let _ = writeln!(stderr, "{}", message.as_ref());
    }
}
