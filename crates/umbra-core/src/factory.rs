//! The element factory: the container owning every element of a model.
//!
//! # Overview
//!
//! [`ElementFactory`] is an arena keyed by [`Id`]. It keeps elements in
//! creation order, maintains both ends of associations that declare an
//! opposite, and owns the per-diagram state (connection tables and pending
//! update requests). It is passed around explicitly; there is no global
//! model.
//!
//! # Examples
//!
//! ```
//! use umbra_core::{factory::ElementFactory, modeling::uml};
//!
//! let mut factory = ElementFactory::new();
//! let package = factory.create(&uml::PACKAGE);
//! let class = factory.create(&uml::CLASS);
//!
//! factory.link(&class, "package", &package).unwrap();
//!
//! let owned = factory.get(&package).unwrap().targets("ownedType");
//! assert_eq!(owned, &[class.clone()]);
//! ```

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};

use crate::{
    diagram::{Diagram, DiagramMut, DiagramState},
    element::{Element, Reference},
    error::ModelError,
    geometry::{Matrix, Point},
    identifier::Id,
    modeling::{Association, AttributeDef, AttributeKind, ElementClass, Multiplicity, Value, ValueType},
};

/// Owner of all elements of one model.
#[derive(Debug, Default)]
pub struct ElementFactory {
    pub(crate) elements: IndexMap<Id, Element>,
    pub(crate) diagrams: HashMap<Id, DiagramState>,
}

impl ElementFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an element with a freshly generated id.
    pub fn create(&mut self, class: &'static ElementClass) -> Id {
        let id = Id::generate();
        self.insert(id.clone(), class);
        id
    }

    /// Creates an element with a caller supplied id.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateId`] when the id is already in use.
    pub fn create_as(&mut self, class: &'static ElementClass, id: Id) -> Result<Id, ModelError> {
        if self.elements.contains_key(&id) {
            return Err(ModelError::DuplicateId(id));
        }
        self.insert(id.clone(), class);
        Ok(id)
    }

    fn insert(&mut self, id: Id, class: &'static ElementClass) {
        trace!(id:%, class = class.name(); "Creating element");
        if class.is_diagram() {
            self.diagrams.insert(id.clone(), DiagramState::default());
        }
        self.elements.insert(id.clone(), Element::new(id, class));
    }

    pub fn get(&self, id: &Id) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.elements.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// All elements in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// Elements matching a predicate, in creation order.
    pub fn select<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = &'a Element> + 'a
    where
        P: Fn(&Element) -> bool + 'a,
    {
        self.elements.values().filter(move |element| predicate(element))
    }

    /// Like [`select`](Self::select), collected into a `Vec`.
    pub fn lselect<P>(&self, predicate: P) -> Vec<&Element>
    where
        P: Fn(&Element) -> bool,
    {
        self.elements
            .values()
            .filter(|element| predicate(element))
            .collect()
    }

    /// Instances of `class` and its subclasses.
    pub fn kindof<'a>(
        &'a self,
        class: &'static ElementClass,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements
            .values()
            .filter(move |element| element.is_a(class))
    }

    /// Removes every element and all diagram state.
    pub fn flush(&mut self) {
        debug!(count = self.elements.len(); "Flushing element factory");
        self.elements.clear();
        self.diagrams.clear();
    }

    /// Assigns a scalar attribute.
    ///
    /// Integers are accepted for real-valued attributes.
    pub fn set_value(
        &mut self,
        id: &Id,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<(), ModelError> {
        let element = self
            .elements
            .get_mut(id)
            .ok_or_else(|| ModelError::UnknownElement(id.clone()))?;
        let class = element.class();
        let attribute = attribute_of(class, name)?;
        let AttributeKind::Value(expected) = attribute.kind() else {
            return Err(ModelError::NotAValue {
                class: class.name(),
                attribute: attribute.name(),
            });
        };

        let value = match (expected, value.into()) {
            (ValueType::Real, Value::Integer(integer)) => Value::Real(integer as f64),
            (expected, value) if value.value_type() == expected => value,
            (expected, value) => {
                return Err(ModelError::ValueTypeMismatch {
                    class: class.name(),
                    attribute: attribute.name(),
                    expected,
                    found: value.value_type(),
                });
            }
        };
        element.insert_value(attribute.name(), value);
        Ok(())
    }

    /// Adds `target` to the reference `name` of `source`.
    ///
    /// The opposite end, if declared, is updated too. Replacing the target
    /// of a single-valued end detaches the previous target's back reference.
    /// Targets that are not held by this factory are accepted; only their
    /// opposite end is left alone.
    pub fn link(&mut self, source: &Id, name: &str, target: &Id) -> Result<(), ModelError> {
        let (attribute, association) = self.association_of(source, name)?;
        if let Some(element) = self
            .elements
            .get(target)
            .filter(|element| !element.is_a(association.target()))
        {
            return Err(self.target_mismatch(source, attribute, element));
        }

        trace!(source:%, attribute = attribute.name(), target:%; "Linking");
        self.set_end(source, attribute.name(), association, target);

        if let Some((back, back_association)) = self.opposite_end(association, target) {
            self.set_end(target, back, back_association, source);
        }
        Ok(())
    }

    /// Removes `target` from the reference `name` of `source`, and the
    /// opposite end with it. Returns `false` when `target` was not linked.
    pub fn unlink(&mut self, source: &Id, name: &str, target: &Id) -> Result<bool, ModelError> {
        let (attribute, association) = self.association_of(source, name)?;
        let removed = self
            .elements
            .get_mut(source)
            .is_some_and(|element| element.remove_target(attribute.name(), target));

        if let Some((back, _)) = self.opposite_end(association, target) {
            if let Some(element) = self.elements.get_mut(target) {
                element.remove_target(back, source);
            }
        }
        Ok(removed)
    }

    /// Assigns a reference as-is, keeping the given order.
    ///
    /// Opposite ends are not touched; run
    /// [`reconcile_opposites`](Self::reconcile_opposites) once all references
    /// are in place. Duplicates are dropped and a single-valued reference
    /// keeps the first target.
    pub fn set_references(
        &mut self,
        source: &Id,
        name: &str,
        targets: Vec<Id>,
    ) -> Result<(), ModelError> {
        let (attribute, association) = self.association_of(source, name)?;
        if let Some(element) = targets
            .iter()
            .filter_map(|target| self.elements.get(target))
            .find(|element| !element.is_a(association.target()))
        {
            return Err(self.target_mismatch(source, attribute, element));
        }

        let reference = match association.multiplicity() {
            Multiplicity::One => match targets.into_iter().next() {
                Some(target) => Reference::One(target),
                None => Reference::Many(Vec::new()),
            },
            Multiplicity::Many => {
                let unique: IndexSet<Id> = targets.into_iter().collect();
                Reference::Many(unique.into_iter().collect())
            }
        };
        if let Some(element) = self.elements.get_mut(source) {
            element.replace_reference(attribute.name(), reference);
        }
        Ok(())
    }

    /// Adds missing opposite ends for every reference in the factory.
    ///
    /// Single-valued ends that already point elsewhere are left unchanged.
    /// Returns the number of ends that were added.
    pub fn reconcile_opposites(&mut self) -> usize {
        let mut missing = Vec::new();
        for element in self.elements.values() {
            for attribute in element.class().attributes() {
                let Some(association) = attribute.association_kind() else {
                    continue;
                };
                for target in element.targets(attribute.name()) {
                    let Some((back, back_association)) = self.opposite_end(association, target)
                    else {
                        continue;
                    };
                    let Some(other) = self.elements.get(target) else {
                        continue;
                    };
                    if !other.targets(back).contains(element.id()) {
                        missing.push((
                            target.clone(),
                            back,
                            back_association.multiplicity(),
                            element.id().clone(),
                        ));
                    }
                }
            }
        }

        let mut added = 0;
        for (owner, name, multiplicity, target) in missing {
            let Some(element) = self.elements.get_mut(&owner) else {
                continue;
            };
            let applied = match multiplicity {
                Multiplicity::One if element.single(name).is_none() => {
                    element.set_single(name, target);
                    true
                }
                Multiplicity::One => false,
                Multiplicity::Many => element.push_many(name, target),
            };
            if applied {
                added += 1;
            }
        }
        debug!(added; "Reconciled opposite references");
        added
    }

    /// Deletes an element together with everything it owns.
    ///
    /// Composite references are followed recursively. References to deleted
    /// elements are removed from the survivors, connections involving them
    /// are dropped and the disconnect callbacks of surviving items run.
    /// Returns the ids of all deleted elements.
    pub fn delete(&mut self, id: &Id) -> Result<Vec<Id>, ModelError> {
        if !self.contains(id) {
            return Err(ModelError::UnknownElement(id.clone()));
        }
        let doomed = self.cascade(id);

        let mut disconnected = Vec::new();
        for state in self.diagrams.values_mut() {
            disconnected.extend(
                state
                    .connections
                    .drain_involving(|id| doomed.contains(id)),
            );
            state.pending.retain(|id| !doomed.contains(id));
        }
        for element in self.elements.values_mut() {
            if !doomed.contains(element.id()) {
                element.strip_references(|id| doomed.contains(id));
            }
        }
        for id in &doomed {
            self.elements.shift_remove(id);
            self.diagrams.remove(id);
        }

        for info in disconnected {
            let Some(callback) = info.callback().cloned() else {
                continue;
            };
            if self.contains(info.item()) {
                (*callback)(self, &info);
            }
        }

        debug!(id:%, count = doomed.len(); "Deleted element");
        Ok(doomed.into_iter().collect())
    }

    fn cascade(&self, root: &Id) -> IndexSet<Id> {
        let mut doomed = IndexSet::new();
        let mut stack = vec![root.clone()];
        while let Some(next) = stack.pop() {
            if !doomed.insert(next.clone()) {
                continue;
            }
            let Some(element) = self.elements.get(&next) else {
                continue;
            };
            for attribute in element.class().attributes() {
                if attribute
                    .association_kind()
                    .is_some_and(|association| association.is_composite())
                {
                    stack.extend(
                        element
                            .targets(attribute.name())
                            .iter()
                            .filter(|target| self.contains(target))
                            .cloned(),
                    );
                }
            }
        }
        doomed
    }

    /// Read access to a diagram.
    pub fn diagram(&self, id: &Id) -> Result<Diagram<'_>, ModelError> {
        let element = self
            .elements
            .get(id)
            .ok_or_else(|| ModelError::UnknownElement(id.clone()))?;
        let state = self
            .diagrams
            .get(id)
            .ok_or_else(|| ModelError::NotADiagram(id.clone()))?;
        Ok(Diagram::new(self, element, state))
    }

    /// Write access to a diagram.
    pub fn diagram_mut(&mut self, id: &Id) -> Result<DiagramMut<'_>, ModelError> {
        if !self.contains(id) {
            return Err(ModelError::UnknownElement(id.clone()));
        }
        if !self.diagrams.contains_key(id) {
            return Err(ModelError::NotADiagram(id.clone()));
        }
        Ok(DiagramMut::new(self, id.clone()))
    }

    /// All diagrams in creation order.
    pub fn diagrams(&self) -> impl Iterator<Item = Diagram<'_>> {
        self.elements.values().filter_map(|element| {
            self.diagrams
                .get(element.id())
                .map(|state| Diagram::new(self, element, state))
        })
    }

    /// Item to canvas transform: the item matrix followed by the matrices
    /// of its parent items.
    pub fn matrix_i2c(&self, item: &Id) -> Matrix {
        let mut matrix = Matrix::identity();
        let mut current = self.elements.get(item);
        // Bounded by the element count so a parent cycle cannot hang.
        for _ in 0..self.elements.len() {
            let Some(element) = current else {
                break;
            };
            matrix = matrix.multiply(element.matrix());
            current = element
                .single("parent")
                .and_then(|parent| self.elements.get(parent));
        }
        matrix
    }

    pub(crate) fn set_points(&mut self, item: &Id, points: Vec<Point>) {
        if let Some(element) = self.elements.get_mut(item) {
            element.insert_value("points", Value::Points(points));
        }
    }

    fn association_of(
        &self,
        id: &Id,
        name: &str,
    ) -> Result<(&'static AttributeDef, Association), ModelError> {
        let element = self
            .elements
            .get(id)
            .ok_or_else(|| ModelError::UnknownElement(id.clone()))?;
        let class = element.class();
        let attribute = attribute_of(class, name)?;
        let association = attribute
            .association_kind()
            .ok_or(ModelError::NotAReference {
                class: class.name(),
                attribute: attribute.name(),
            })?;
        Ok((attribute, association))
    }

    /// The attribute on `target` that mirrors `association`, if both exist.
    fn opposite_end(
        &self,
        association: Association,
        target: &Id,
    ) -> Option<(&'static str, Association)> {
        let opposite = association.opposite()?;
        let back = self.elements.get(target)?.class().attribute(opposite)?;
        Some((back.name(), back.association_kind()?))
    }

    /// Sets one end of an association. A displaced single-valued target
    /// loses its back reference to `owner`.
    fn set_end(&mut self, owner: &Id, name: &'static str, association: Association, target: &Id) {
        let Some(element) = self.elements.get_mut(owner) else {
            return;
        };
        let displaced = match association.multiplicity() {
            Multiplicity::One => element.set_single(name, target.clone()),
            Multiplicity::Many => {
                element.push_many(name, target.clone());
                None
            }
        };
        let (Some(previous), Some(opposite)) = (displaced, association.opposite()) else {
            return;
        };
        if let Some(element) = self.elements.get_mut(&previous) {
            element.remove_target(opposite, owner);
        }
    }

    fn target_mismatch(
        &self,
        source: &Id,
        attribute: &AttributeDef,
        target: &Element,
    ) -> ModelError {
        ModelError::TargetTypeMismatch {
            class: self
                .elements
                .get(source)
                .map_or("?", |element| element.class().name()),
            attribute: attribute.name(),
            target: target.class().name(),
        }
    }
}

fn attribute_of(
    class: &'static ElementClass,
    name: &str,
) -> Result<&'static AttributeDef, ModelError> {
    class
        .attribute(name)
        .ok_or_else(|| ModelError::UnknownAttribute {
            class: class.name(),
            attribute: name.to_string(),
        })
}
