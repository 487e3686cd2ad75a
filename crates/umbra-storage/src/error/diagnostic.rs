//! The [`Diagnostic`] type: one error or warning with optional context.

use std::fmt;

use umbra_core::identifier::Id;

use super::{ErrorCode, Severity};

/// A single error or warning produced while loading or saving a model.
///
/// # Examples
///
/// ```
/// # use umbra_storage::error::{Diagnostic, ErrorCode};
/// # use umbra_core::identifier::Id;
/// let diag = Diagnostic::warning("Model has unknown reference")
///     .with_code(ErrorCode::W300)
///     .with_element(Id::new("c1"))
///     .with_help("the referenced element was not exported");
///
/// assert!(diag.severity().is_warning());
/// assert_eq!(diag.to_string(), "warning[W300]: Model has unknown reference (element c1)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    element: Option<Id>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            element: None,
            help: None,
        }
    }

    /// Attach an error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach the id of the element the diagnostic is about.
    pub fn with_element(mut self, element: Id) -> Self {
        self.element = Some(element);
        self
    }

    /// Attach help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn element(&self) -> Option<&Id> {
        self.element.as_ref()
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(element) = &self.element {
            write!(f, " (element {element})")?;
        }
        Ok(())
    }
}
