//! Umbra - Load and save UML models.
//!
//! Opens model files into an element factory and writes factories back,
//! keeping shared references, presentation items and handle connections
//! intact.

pub mod config;

mod error;

pub use umbra_core::{connections, diagram, element, factory, geometry, identifier, modeling};
pub use umbra_storage::{Diagnostic, ErrorCode, LoadReport, Report, Severity, StorageError};

pub use error::UmbraError;

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use log::{debug, info};
use tempfile::NamedTempFile;

use config::AppConfig;
use factory::ElementFactory;
use modeling::{MergedLanguage, default_language};

/// Opens and saves model files.
///
/// # Examples
///
/// ```rust,no_run
/// use umbra::{ModelStore, config::AppConfig};
///
/// let store = ModelStore::new(AppConfig::default());
/// let (factory, report) = store.open("model.gaphor").expect("Failed to open");
/// println!("{} elements, {} items", report.elements(), report.items());
///
/// store.save("copy.gaphor", &factory).expect("Failed to save");
/// ```
#[derive(Debug)]
pub struct ModelStore {
    config: AppConfig,
    language: MergedLanguage,
}

impl Default for ModelStore {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl ModelStore {
    /// Create a new store using the Core and UML modeling languages.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            language: default_language(),
        }
    }

    /// Replace the modeling language used to resolve element types.
    pub fn with_language(mut self, language: MergedLanguage) -> Self {
        self.language = language;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Open a model file into a new element factory.
    ///
    /// # Errors
    ///
    /// Returns `UmbraError::Io` when the file cannot be read and
    /// `UmbraError::Load` when it is not a loadable model.
    pub fn open(&self, path: impl AsRef<Path>) -> Result<(ElementFactory, LoadReport), UmbraError> {
        let mut factory = ElementFactory::new();
        let report = self.load_into(path, &mut factory)?;
        Ok((factory, report))
    }

    /// Load a model file into `factory`.
    ///
    /// The factory is flushed when loading fails, so it never holds part of
    /// a model.
    pub fn load_into(
        &self,
        path: impl AsRef<Path>,
        factory: &mut ElementFactory,
    ) -> Result<LoadReport, UmbraError> {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Opening model");
        let source = fs::read_to_string(path)?;
        self.load_from_str(&source, factory)
    }

    /// Load a model document into `factory`, flushing it on failure.
    pub fn load_from_str(
        &self,
        source: &str,
        factory: &mut ElementFactory,
    ) -> Result<LoadReport, UmbraError> {
        let options = self.config.storage().load_options();
        umbra_storage::load_with(source, factory, &self.language, &options).map_err(|err| {
            debug!(err:%; "Load failed, flushing factory");
            factory.flush();
            UmbraError::Load(err)
        })
    }

    /// Save `factory` to a model file.
    ///
    /// With atomic saves enabled the model is written to a temporary file
    /// next to `path` that replaces it once complete.
    pub fn save(
        &self,
        path: impl AsRef<Path>,
        factory: &ElementFactory,
    ) -> Result<Report, UmbraError> {
        let path = path.as_ref();
        let atomic = self.config.storage().atomic_save();
        info!(path = path.display().to_string(), atomic; "Saving model");

        if !atomic {
            return self.write(File::create(path)?, factory);
        }

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(dir)?;
        let report = self.write(&mut temp, factory)?;
        temp.persist(path).map_err(|err| err.error)?;
        Ok(report)
    }

    /// Save `factory` to a string.
    pub fn save_to_string(&self, factory: &ElementFactory) -> Result<(String, Report), UmbraError> {
        let mut buffer = Vec::new();
        let report = self.write(&mut buffer, factory)?;
        let text = String::from_utf8(buffer).map_err(|err| {
            UmbraError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
        })?;
        Ok((text, report))
    }

    fn write<W: Write>(&self, sink: W, factory: &ElementFactory) -> Result<Report, UmbraError> {
        let options = self.config.storage().save_options();
        umbra_storage::save_with(BufWriter::new(sink), factory, &options, |_| true)
            .map_err(UmbraError::Save)
    }
}
