//! Modeling languages: lookup of element classes by type name.

use log::trace;

use super::ElementClass;

/// A named set of element classes.
///
/// The loader resolves every type tag found in a model file through a
/// modeling language. Abstract classes are never returned.
pub trait ModelingLanguage {
    /// Human readable name of the language.
    fn name(&self) -> &str;

    /// Returns the concrete class persisted under `type_name`.
    fn lookup_element(&self, type_name: &str) -> Option<&'static ElementClass>;
}

/// Looks up a concrete class by name in a class table.
pub fn lookup_in(
    classes: &[&'static ElementClass],
    type_name: &str,
) -> Option<&'static ElementClass> {
    classes
        .iter()
        .copied()
        .find(|class| !class.is_abstract() && class.name() == type_name)
}

/// A language that consults several languages in order.
///
/// # Examples
///
/// ```
/// use umbra_core::modeling::{CoreLanguage, MergedLanguage, ModelingLanguage, UmlLanguage};
///
/// let language = MergedLanguage::new()
///     .with_language(CoreLanguage)
///     .with_language(UmlLanguage);
///
/// assert!(language.lookup_element("Diagram").is_some());
/// assert!(language.lookup_element("Class").is_some());
/// assert!(language.lookup_element("Element").is_none());
/// ```
#[derive(Default)]
pub struct MergedLanguage {
    languages: Vec<Box<dyn ModelingLanguage>>,
}

impl MergedLanguage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a language; earlier languages take precedence.
    pub fn with_language(mut self, language: impl ModelingLanguage + 'static) -> Self {
        self.languages.push(Box::new(language));
        self
    }
}

impl ModelingLanguage for MergedLanguage {
    fn name(&self) -> &str {
        "merged"
    }

    fn lookup_element(&self, type_name: &str) -> Option<&'static ElementClass> {
        let found = self
            .languages
            .iter()
            .find_map(|language| language.lookup_element(type_name));
        trace!(type_name, found = found.is_some(); "Element class lookup");
        found
    }
}

impl std::fmt::Debug for MergedLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.languages.iter().map(|language| language.name()))
            .finish()
    }
}
