//! Umbra Storage
//!
//! Saves element factories as XML model documents and loads them back.
//!
//! # Overview
//!
//! - [`save`] writes every element in creation order, followed by the items
//!   of each diagram; [`save_filtered`] writes a subset.
//! - [`load`] rejects files older than [`version::MIN_SUPPORTED_VERSION`],
//!   then creates every element in a first pass and resolves references in
//!   a second one. Handle connections of line items are restored last.
//!
//! Problems that only affect a single reference or attribute never abort a
//! load or save. They are logged and returned as diagnostics in the
//! [`Report`] or [`LoadReport`].
//!
//! # Example
//!
//! ```
//! use umbra_core::{factory::ElementFactory, modeling::{default_language, uml}};
//!
//! let mut factory = ElementFactory::new();
//! let class = factory.create(&uml::CLASS);
//! factory.set_value(&class, "name", "  Car  ").unwrap();
//!
//! let mut buffer = Vec::new();
//! umbra_storage::save(&mut buffer, &factory).unwrap();
//!
//! let mut loaded = ElementFactory::new();
//! let source = String::from_utf8(buffer).unwrap();
//! let report = umbra_storage::load(&source, &mut loaded, &default_language()).unwrap();
//!
//! assert_eq!(report.elements(), 1);
//! assert_eq!(loaded.get(&class).unwrap().name(), Some("  Car  "));
//! ```

pub mod error;
pub mod loader;
pub mod reader;
mod report;
pub mod value;
pub mod version;
pub mod writer;

pub use error::{Diagnostic, ErrorCode, Severity, StorageError};
pub use loader::{LoadOptions, load, load_from_reader, load_with};
pub use report::{LoadReport, Report};
pub use writer::{SaveOptions, save, save_filtered, save_with};
