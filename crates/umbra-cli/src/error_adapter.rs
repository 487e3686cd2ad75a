//! Error adapter for converting UmbraError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! Load and save failures carry a storage [`Diagnostic`] with a stable code;
//! every other error is rendered as a plain error. Recoverable diagnostics of
//! a [`LoadReport`] are rendered through the same adapter with warning
//! severity.

use std::{borrow::Cow, fmt};

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use umbra::{LoadReport, UmbraError};
use umbra_storage::{Diagnostic, Severity};

/// Adapter for a single storage diagnostic.
pub struct DiagnosticAdapter<'a> {
    diag: Cow<'a, Diagnostic>,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create an adapter borrowing `diag`.
    pub fn new(diag: &'a Diagnostic) -> Self {
        Self {
            diag: Cow::Borrowed(diag),
        }
    }

    /// Create an adapter owning `diag`.
    pub fn owned(diag: Diagnostic) -> Self {
        Self {
            diag: Cow::Owned(diag),
        }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.diag.element() {
            Some(element) => write!(f, "{} (element {element})", self.diag.message()),
            None => write!(f, "{}", self.diag.message()),
        }
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.diag.severity() {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }
}

/// Adapter for [`UmbraError`] variants without a storage diagnostic.
pub struct ErrorAdapter<'a>(pub &'a UmbraError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            UmbraError::Io(_) => "umbra::io",
            UmbraError::Load(_) => "umbra::load",
            UmbraError::Save(_) => "umbra::save",
            UmbraError::Model(_) => "umbra::model",
            UmbraError::Config(_) => "umbra::config",
        };
        Some(Box::new(code))
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A storage diagnostic with a stable code.
    Diagnostic(DiagnosticAdapter<'a>),
    /// A simple error without a diagnostic.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => std::error::Error::source(e),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<miette::Severity> {
        match self {
            Reportable::Diagnostic(d) => d.severity(),
            Reportable::Error(e) => e.severity(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Convert an [`UmbraError`] into reportable errors.
///
/// Load and save failures become a [`Reportable::Diagnostic`]; other
/// variants become a single [`Reportable::Error`].
pub fn to_reportables(err: &UmbraError) -> Vec<Reportable<'_>> {
    match err.diagnostic() {
        Some(diag) => vec![Reportable::Diagnostic(DiagnosticAdapter::owned(diag))],
        None => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

/// One reportable per recoverable diagnostic of a load.
pub fn report_reportables(report: &LoadReport) -> Vec<Reportable<'_>> {
    report
        .diagnostics()
        .iter()
        .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d)))
        .collect()
}
