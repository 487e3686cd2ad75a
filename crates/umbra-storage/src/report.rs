//! Outcome of a load or save.

use crate::error::{Diagnostic, ErrorCode};

/// Diagnostics produced by a save.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub(crate) fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns `true` if nothing was reported.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics carrying `code`.
    pub fn with_code(&self, code: ErrorCode) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |diagnostic| diagnostic.code() == Some(code))
    }
}

/// Diagnostics and counts produced by a load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    report: Report,
    elements: usize,
    items: usize,
    connections: usize,
}

impl LoadReport {
    pub(crate) fn new(
        diagnostics: Vec<Diagnostic>,
        elements: usize,
        items: usize,
        connections: usize,
    ) -> Self {
        Self {
            report: Report::new(diagnostics),
            elements,
            items,
            connections,
        }
    }

    /// Number of loaded model elements, diagrams included.
    pub fn elements(&self) -> usize {
        self.elements
    }

    /// Number of loaded presentation items.
    pub fn items(&self) -> usize {
        self.items
    }

    /// Number of restored handle connections.
    pub fn connections(&self) -> usize {
        self.connections
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.report.diagnostics()
    }

    pub fn is_clean(&self) -> bool {
        self.report.is_clean()
    }
}
