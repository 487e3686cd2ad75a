//! Metamodel descriptors.
//!
//! # Overview
//!
//! Element types are described by static [`ElementClass`] values. Each class
//! declares typed attributes ([`AttributeDef`]): scalar values, associations
//! to other classes (with multiplicity, composition and an optional opposite
//! end) and, for line items, persisted handle connections.
//!
//! A [`ModelingLanguage`] maps the type tags found in model files to classes.
//! [`CoreLanguage`] covers diagrams, presentation items, comments and the
//! style sheet; [`UmlLanguage`] adds UML classes. [`MergedLanguage`] chains
//! several languages together.

mod class;
pub mod core;
mod language;
pub mod uml;
mod value;

pub use class::{
    Association, AttributeDef, AttributeKind, ElementClass, ElementKind, HandleEnd, ItemShape,
    Multiplicity,
};
pub use self::core::CoreLanguage;
pub use language::{MergedLanguage, ModelingLanguage, lookup_in};
pub use uml::UmlLanguage;
pub use value::{Value, ValueType};

/// Returns the standard language: core classes followed by UML.
pub fn default_language() -> MergedLanguage {
    MergedLanguage::new()
        .with_language(CoreLanguage)
        .with_language(UmlLanguage)
}
