//! Severity levels for diagnostics.
//!
//! This module defines the severity of diagnostic messages,
//! distinguishing between fatal errors and recoverable warnings.

use std::fmt;

/// The severity level of a diagnostic.
///
/// Severity determines how the diagnostic should be handled:
/// - [`Severity::Error`] aborts the load
/// - [`Severity::Warning`] is reported while the load or save continues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// A fatal error; the model cannot be loaded.
    Error,

    /// A recoverable problem, such as a dropped reference.
    ///
    /// The affected attribute is skipped and processing continues.
    Warning,
}

impl Severity {
    /// Returns `true` if this is an error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Returns `true` if this is a warning severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}
