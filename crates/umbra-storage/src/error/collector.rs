//! Accumulates recoverable diagnostics during a load or save.

use log::warn;

use super::Diagnostic;

/// Collects diagnostics and mirrors each one to the log.
#[derive(Debug, Default)]
pub(crate) struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic.
    pub(crate) fn emit(&mut self, diagnostic: Diagnostic) {
        match diagnostic.element() {
            Some(element) => warn!(
                code:? = diagnostic.code(),
                element:%;
                "{}", diagnostic.message()
            ),
            None => warn!(code:? = diagnostic.code(); "{}", diagnostic.message()),
        }
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub(crate) fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
