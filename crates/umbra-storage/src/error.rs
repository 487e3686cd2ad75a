//! Error and diagnostic system for Umbra storage.
//!
//! This module provides:
//! - Error codes for documentation and searchability
//! - Severity levels
//! - A diagnostic collector for accumulating recoverable problems
//! - [`StorageError`] for fatal failures
//!
//! # Overview
//!
//! Fatal conditions (malformed document, unsupported version, unknown
//! element type, duplicate ids) abort a load and are returned as
//! [`StorageError`]. Everything else (unknown references, unknown
//! attributes, unparseable values, connections that cannot be restored) is
//! recorded as a warning [`Diagnostic`], logged, and processing continues.
//!
//! # Example
//!
//! ```
//! # use umbra_storage::error::{Diagnostic, ErrorCode};
//! let diag = Diagnostic::warning("Model has unknown reference")
//!     .with_code(ErrorCode::W300)
//!     .with_help("the reference was dropped");
//! assert_eq!(diag.code(), Some(ErrorCode::W300));
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod severity;
mod storage_error;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use severity::Severity;
pub use storage_error::{Result, StorageError};
