//! Model elements.
//!
//! An [`Element`] is a record in the element factory: an id, the class it
//! was created from, its scalar values and its references to other elements.
//! Presentation items are elements too; their geometry lives in scalar
//! values (`matrix`, `width`, `height`, `points`).

use std::collections::HashMap;

use crate::{
    geometry::Matrix,
    identifier::Id,
    modeling::{ElementClass, Value},
};

/// The targets of one reference attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Reference {
    One(Id),
    /// Ordered, without duplicates.
    Many(Vec<Id>),
}

impl Reference {
    /// All targets, in order.
    pub fn targets(&self) -> &[Id] {
        match self {
            Self::One(id) => std::slice::from_ref(id),
            Self::Many(ids) => ids,
        }
    }
}

/// A model element or presentation item.
#[derive(Debug, Clone)]
pub struct Element {
    id: Id,
    class: &'static ElementClass,
    values: HashMap<&'static str, Value>,
    references: HashMap<&'static str, Reference>,
}

impl Element {
    pub(crate) fn new(id: Id, class: &'static ElementClass) -> Self {
        Self {
            id,
            class,
            values: HashMap::new(),
            references: HashMap::new(),
        }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn class(&self) -> &'static ElementClass {
        self.class
    }

    /// Returns `true` if the element is an instance of `class` or a subclass.
    pub fn is_a(&self, class: &ElementClass) -> bool {
        self.class.is_a(class)
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(Value::as_text)
    }

    pub fn real(&self, name: &str) -> Option<f64> {
        self.value(name).and_then(Value::as_real)
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.value(name).and_then(Value::as_bool)
    }

    /// Shorthand for the `name` attribute.
    pub fn name(&self) -> Option<&str> {
        self.text("name")
    }

    /// The item transform; identity when unset.
    pub fn matrix(&self) -> Matrix {
        self.value("matrix")
            .and_then(Value::as_matrix)
            .unwrap_or_default()
    }

    pub fn reference(&self, name: &str) -> Option<&Reference> {
        self.references.get(name)
    }

    /// The target of a single-valued reference.
    pub fn single(&self, name: &str) -> Option<&Id> {
        match self.references.get(name) {
            Some(Reference::One(id)) => Some(id),
            _ => None,
        }
    }

    /// The targets of a reference, or an empty slice when unset.
    pub fn targets(&self, name: &str) -> &[Id] {
        self.references
            .get(name)
            .map(Reference::targets)
            .unwrap_or_default()
    }

    /// Returns `true` if any reference of this element points at `target`.
    pub fn refers_to(&self, target: &Id) -> bool {
        self.references
            .values()
            .any(|reference| reference.targets().contains(target))
    }

    pub(crate) fn insert_value(&mut self, name: &'static str, value: Value) {
        self.values.insert(name, value);
    }

    /// Sets a single-valued reference, returning the target it displaced.
    pub(crate) fn set_single(&mut self, name: &'static str, target: Id) -> Option<Id> {
        match self.references.insert(name, Reference::One(target.clone())) {
            Some(Reference::One(previous)) if previous != target => Some(previous),
            _ => None,
        }
    }

    /// Appends to a multi-valued reference; returns `false` if already present.
    pub(crate) fn push_many(&mut self, name: &'static str, target: Id) -> bool {
        let entry = self
            .references
            .entry(name)
            .or_insert_with(|| Reference::Many(Vec::new()));
        match entry {
            Reference::Many(ids) if ids.contains(&target) => false,
            Reference::Many(ids) => {
                ids.push(target);
                true
            }
            Reference::One(_) => {
                *entry = Reference::Many(vec![target]);
                true
            }
        }
    }

    /// Removes `target` from a reference; returns `true` if it was there.
    pub(crate) fn remove_target(&mut self, name: &str, target: &Id) -> bool {
        let Some(reference) = self.references.get_mut(name) else {
            return false;
        };
        let (removed, empty) = match reference {
            Reference::One(id) => {
                let hit = *id == *target;
                (hit, hit)
            }
            Reference::Many(ids) => {
                let before = ids.len();
                ids.retain(|id| id != target);
                (before != ids.len(), ids.is_empty())
            }
        };
        if empty {
            self.references.remove(name);
        }
        removed
    }

    pub(crate) fn replace_reference(&mut self, name: &'static str, reference: Reference) {
        if reference.targets().is_empty() {
            self.references.remove(name);
        } else {
            self.references.insert(name, reference);
        }
    }

    /// Drops every reference target matching `doomed`.
    pub(crate) fn strip_references(&mut self, doomed: impl Fn(&Id) -> bool) {
        self.references.retain(|_, reference| match reference {
            Reference::One(id) => !doomed(id),
            Reference::Many(ids) => {
                ids.retain(|id| !doomed(id));
                !ids.is_empty()
            }
        });
    }
}
