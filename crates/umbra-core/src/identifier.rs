//! Element identifiers.
//!
//! This module provides the [`Id`] type used to name every element and
//! presentation item held by an [`ElementFactory`](crate::factory::ElementFactory).
//! Ids are opaque strings: freshly created elements get a UUID, loaded
//! elements keep the id recorded in the model file.

use std::{borrow::Borrow, fmt, rc::Rc};

use uuid::Uuid;

/// Opaque element identifier.
///
/// Cloning an `Id` is cheap: the text is shared behind an [`Rc`].
///
/// # Examples
///
/// ```
/// use umbra_core::identifier::Id;
///
/// let id = Id::new("DCE:1F2E");
/// assert_eq!(id, "DCE:1F2E");
///
/// let fresh = Id::generate();
/// assert_ne!(fresh, id);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(Rc<str>);

impl Id {
    /// Creates an `Id` from its textual form.
    pub fn new(value: &str) -> Self {
        Self(Rc::from(value))
    }

    /// Creates a new, globally unique `Id`.
    pub fn generate() -> Self {
        Self::new(&Uuid::new_v4().to_string())
    }

    /// Returns the textual form of the id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for Id {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self(Rc::from(value))
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}
