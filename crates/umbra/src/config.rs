//! Configuration types for Umbra model storage.
//!
//! All types implement [`serde::Deserialize`] for loading from external
//! sources. Every field has a default, so an empty document is a valid
//! configuration.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration.
//! - [`StorageConfig`] - Controls how models are written and loaded.
//!
//! # Example
//!
//! ```
//! # use umbra::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.storage().indent(), 2);
//! assert!(config.storage().atomic_save());
//! ```

use serde::Deserialize;

use umbra_storage::{LoadOptions, SaveOptions};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Storage configuration section.
    #[serde(default)]
    storage: StorageConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the given storage configuration.
    pub fn new(storage: StorageConfig) -> Self {
        Self { storage }
    }

    /// Returns the storage configuration.
    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }
}

/// Settings of the model writer and loader.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Spaces per nesting level in written files.
    indent: usize,

    /// Write through a temporary file that replaces the target on success.
    atomic_save: bool,

    /// Create a style sheet when a loaded model has none.
    ensure_style_sheet: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            indent: 2,
            atomic_save: true,
            ensure_style_sheet: true,
        }
    }
}

impl StorageConfig {
    /// Creates a new [`StorageConfig`].
    ///
    /// # Arguments
    ///
    /// * `indent` - Spaces per nesting level in written files.
    /// * `atomic_save` - Whether saves go through a temporary file.
    /// * `ensure_style_sheet` - Whether loading adds a missing style sheet.
    pub fn new(indent: usize, atomic_save: bool, ensure_style_sheet: bool) -> Self {
        Self {
            indent,
            atomic_save,
            ensure_style_sheet,
        }
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn atomic_save(&self) -> bool {
        self.atomic_save
    }

    pub fn ensure_style_sheet(&self) -> bool {
        self.ensure_style_sheet
    }

    /// Writer options matching this configuration.
    pub fn save_options(&self) -> SaveOptions {
        SaveOptions::new().with_indent(self.indent)
    }

    /// Loader options matching this configuration.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions::new().with_ensure_style_sheet(self.ensure_style_sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_options() {
        let config = StorageConfig::new(4, false, false);
        assert_eq!(config.save_options().indent(), 4);
        assert!(!config.load_options().ensure_style_sheet());
        assert!(!config.atomic_save());
    }
}
