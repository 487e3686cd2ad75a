//! Error types for Umbra operations.
//!
//! This module provides the main error type [`UmbraError`] which wraps
//! the error conditions of opening and saving models.

use std::io;

use thiserror::Error;

use umbra_core::error::ModelError;
use umbra_storage::{Diagnostic, StorageError};

/// The main error type for Umbra operations.
#[derive(Debug, Error)]
pub enum UmbraError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Could not load model: {0}")]
    Load(StorageError),

    #[error("Could not save model: {0}")]
    Save(StorageError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl UmbraError {
    /// The storage diagnostic behind a load or save failure.
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        match self {
            UmbraError::Load(err) | UmbraError::Save(err) => Some(err.to_diagnostic()),
            _ => None,
        }
    }
}
