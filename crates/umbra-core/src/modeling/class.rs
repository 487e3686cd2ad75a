//! Element class descriptors.
//!
//! An [`ElementClass`] describes one type of model element: the type tag it
//! is persisted under, its parent class and the attributes it declares.
//! Classes are plain `static` values; identity is by address, so two
//! descriptors with the same name are still different classes.

use std::{fmt, ptr};

use super::ValueType;

/// What role elements of a class play in a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A semantic or infrastructural element (Package, Comment, StyleSheet, ...).
    Model,
    /// A diagram; owns presentation items and their connections.
    Diagram,
    /// A presentation item drawn on a diagram.
    Presentation(ItemShape),
}

/// Geometry family of a presentation item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemShape {
    /// Box-like item sized by `width` and `height`.
    Element,
    /// Polyline item whose handles are its `points`.
    Line,
}

/// One end of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleEnd {
    /// The first handle.
    Head,
    /// The last handle.
    Tail,
}

/// Number of targets an association holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Multiplicity {
    /// At most one target.
    One,
    /// An ordered list of distinct targets.
    Many,
}

/// A typed reference between elements.
#[derive(Debug, Clone, Copy)]
pub struct Association {
    target: &'static ElementClass,
    multiplicity: Multiplicity,
    composite: bool,
    opposite: Option<&'static str>,
}

impl Association {
    /// The class every target must be an instance of.
    pub fn target(&self) -> &'static ElementClass {
        self.target
    }

    pub fn multiplicity(&self) -> Multiplicity {
        self.multiplicity
    }

    /// Composite associations own their targets: deleting the owner deletes them.
    pub fn is_composite(&self) -> bool {
        self.composite
    }

    /// Name of the attribute on the target that points back, if any.
    pub fn opposite(&self) -> Option<&'static str> {
        self.opposite
    }
}

/// Kind of a declared attribute.
#[derive(Debug, Clone, Copy)]
pub enum AttributeKind {
    /// A scalar value persisted as text.
    Value(ValueType),
    /// A reference to one or more elements.
    Association(Association),
    /// The item a line handle is connected to.
    ///
    /// Not stored on the element: it is derived from the diagram's connection
    /// table when saving and turned back into a connection when loading.
    Connection(HandleEnd),
}

/// A declared attribute of an [`ElementClass`].
#[derive(Debug, Clone, Copy)]
pub struct AttributeDef {
    name: &'static str,
    kind: AttributeKind,
}

impl AttributeDef {
    /// A scalar attribute.
    pub const fn value(name: &'static str, value_type: ValueType) -> Self {
        Self {
            name,
            kind: AttributeKind::Value(value_type),
        }
    }

    /// A single-valued, non-owning reference.
    pub const fn one(
        name: &'static str,
        target: &'static ElementClass,
        opposite: Option<&'static str>,
    ) -> Self {
        Self::association(name, target, Multiplicity::One, false, opposite)
    }

    /// A multi-valued, non-owning reference.
    pub const fn many(
        name: &'static str,
        target: &'static ElementClass,
        opposite: Option<&'static str>,
    ) -> Self {
        Self::association(name, target, Multiplicity::Many, false, opposite)
    }

    /// A multi-valued, owning reference.
    pub const fn composite(
        name: &'static str,
        target: &'static ElementClass,
        opposite: Option<&'static str>,
    ) -> Self {
        Self::association(name, target, Multiplicity::Many, true, opposite)
    }

    /// A persisted handle connection.
    pub const fn connection(name: &'static str, end: HandleEnd) -> Self {
        Self {
            name,
            kind: AttributeKind::Connection(end),
        }
    }

    const fn association(
        name: &'static str,
        target: &'static ElementClass,
        multiplicity: Multiplicity,
        composite: bool,
        opposite: Option<&'static str>,
    ) -> Self {
        Self {
            name,
            kind: AttributeKind::Association(Association {
                target,
                multiplicity,
                composite,
                opposite,
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> AttributeKind {
        self.kind
    }

    /// Returns the association when this attribute is a reference.
    pub fn association_kind(&self) -> Option<Association> {
        match self.kind {
            AttributeKind::Association(association) => Some(association),
            _ => None,
        }
    }
}

/// Descriptor of an element type.
///
/// # Examples
///
/// ```
/// use umbra_core::modeling::{core, uml};
///
/// assert!(uml::CLASS.is_a(&uml::TYPE));
/// assert!(uml::CLASS.is_a(&core::ELEMENT));
/// assert!(!uml::CLASS.is_a(&uml::PACKAGE));
/// assert!(uml::CLASS.attribute("name").is_some());
/// ```
pub struct ElementClass {
    name: &'static str,
    parent: Option<&'static ElementClass>,
    kind: ElementKind,
    is_abstract: bool,
    attributes: &'static [AttributeDef],
}

impl ElementClass {
    /// Declares a concrete class.
    pub const fn new(
        name: &'static str,
        parent: Option<&'static ElementClass>,
        kind: ElementKind,
        attributes: &'static [AttributeDef],
    ) -> Self {
        Self {
            name,
            parent,
            kind,
            is_abstract: false,
            attributes,
        }
    }

    /// Declares an abstract class; languages never hand these out by name.
    pub const fn new_abstract(
        name: &'static str,
        parent: Option<&'static ElementClass>,
        kind: ElementKind,
        attributes: &'static [AttributeDef],
    ) -> Self {
        Self {
            name,
            parent,
            kind,
            is_abstract: true,
            attributes,
        }
    }

    /// The type tag used in model files.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn parent(&self) -> Option<&'static ElementClass> {
        self.parent
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Returns `true` if this class is `other` or derives from it.
    pub fn is_a(&self, other: &ElementClass) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if ptr::eq(class, other) {
                return true;
            }
            current = class.parent;
        }
        false
    }

    pub fn is_diagram(&self) -> bool {
        self.kind == ElementKind::Diagram
    }

    pub fn is_presentation(&self) -> bool {
        matches!(self.kind, ElementKind::Presentation(_))
    }

    /// The item shape, for presentation classes.
    pub fn item_shape(&self) -> Option<ItemShape> {
        match self.kind {
            ElementKind::Presentation(shape) => Some(shape),
            _ => None,
        }
    }

    /// All attributes, inherited ones first, in declaration order.
    pub fn attributes(&self) -> Vec<&'static AttributeDef> {
        let mut chain = Vec::new();
        let mut current = Some(self);
        while let Some(class) = current {
            chain.push(class.attributes);
            current = class.parent;
        }
        chain.into_iter().rev().flatten().collect()
    }

    /// Looks up an attribute by name, searching parent classes too.
    pub fn attribute(&self, name: &str) -> Option<&'static AttributeDef> {
        let mut current = Some(self);
        while let Some(class) = current {
            if let Some(attribute) = class.attributes.iter().find(|a| a.name == name) {
                return Some(attribute);
            }
            current = class.parent;
        }
        None
    }
}

impl PartialEq for ElementClass {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self, other)
    }
}

impl Eq for ElementClass {}

// Classes reference each other cyclically through associations.
impl fmt::Debug for ElementClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ElementClass").field(&self.name).finish()
    }
}

impl fmt::Display for ElementClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
