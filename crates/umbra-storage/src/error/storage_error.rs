//! The [`StorageError`] type returned by fatal load and save failures.

use thiserror::Error;
use umbra_core::error::ModelError;

use crate::{
    error::{Diagnostic, ErrorCode},
    version::ModelVersion,
};

/// A type alias for `Result<T, StorageError>`.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Fatal errors of the persistence layer.
///
/// Recoverable problems (dangling references and the like) never surface
/// here; they are reported as [`Diagnostic`]s in the load or save report.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed model document: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("model version {found} is not supported, the minimum is {minimum}")]
    UnsupportedVersion {
        found: String,
        minimum: ModelVersion,
    },

    #[error("unknown element type `{type_name}` for element `{id}`")]
    UnknownType { type_name: String, id: String },

    #[error("{0}")]
    Structure(Diagnostic),

    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

impl StorageError {
    /// The diagnostic code of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            StorageError::Io(_) => ErrorCode::E005,
            StorageError::Xml(_) => ErrorCode::E001,
            StorageError::UnsupportedVersion { .. } => ErrorCode::E100,
            StorageError::UnknownType { .. } => ErrorCode::E200,
            StorageError::Structure(diagnostic) => diagnostic.code().unwrap_or(ErrorCode::E001),
            StorageError::Model(ModelError::DuplicateId(_)) => ErrorCode::E004,
            StorageError::Model(_) => ErrorCode::E001,
        }
    }

    /// Converts the error into an error-severity diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            StorageError::Structure(diagnostic) => diagnostic.clone(),
            StorageError::UnsupportedVersion { .. } => Diagnostic::error(self.to_string())
                .with_code(self.code())
                .with_help("files written by older versions cannot be opened"),
            _ => Diagnostic::error(self.to_string()).with_code(self.code()),
        }
    }
}
