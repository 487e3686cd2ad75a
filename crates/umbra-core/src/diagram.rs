//! Diagrams and their presentation items.
//!
//! # Overview
//!
//! A diagram is an element of a diagram class. Its presentation items are
//! ordinary elements linked through `ownedPresentation`/`diagram`; the
//! factory additionally keeps, per diagram, a [`Connections`] table and the
//! set of items waiting for an update.
//!
//! - [`Diagram`] - read view: items, connections, pending updates
//! - [`DiagramMut`] - write view: item creation, connecting handles, updates
//!
//! # Examples
//!
//! ```
//! use umbra_core::{
//!     factory::ElementFactory,
//!     modeling::{core, uml},
//! };
//!
//! let mut factory = ElementFactory::new();
//! let diagram = factory.create(&core::DIAGRAM);
//! let class = factory.create(&uml::CLASS);
//!
//! let item = {
//!     let mut view = factory.diagram_mut(&diagram).unwrap();
//!     view.create(&uml::CLASS_ITEM, Some(&class)).unwrap()
//! };
//!
//! let view = factory.diagram(&diagram).unwrap();
//! let items: Vec<_> = view.get_all_items().map(|i| i.id().clone()).collect();
//! assert_eq!(items, vec![item]);
//! ```

mod connector;
mod item;

use indexmap::IndexSet;
use log::{debug, trace};

pub use connector::{Glue, detach_subject};
pub use item::{DEFAULT_HEIGHT, DEFAULT_WIDTH, Handle, Port, default_points};

use crate::{
    connections::{ConnectionInfo, Connections},
    element::Element,
    error::ModelError,
    factory::ElementFactory,
    geometry::Matrix,
    identifier::Id,
    modeling::{ElementClass, ItemShape, Value},
};

/// Per-diagram state held by the factory.
#[derive(Debug, Default)]
pub(crate) struct DiagramState {
    pub(crate) connections: Connections,
    pub(crate) pending: IndexSet<Id>,
}

/// Read access to one diagram.
#[derive(Debug, Clone, Copy)]
pub struct Diagram<'f> {
    factory: &'f ElementFactory,
    element: &'f Element,
    state: &'f DiagramState,
}

impl<'f> Diagram<'f> {
    pub(crate) fn new(
        factory: &'f ElementFactory,
        element: &'f Element,
        state: &'f DiagramState,
    ) -> Self {
        Self {
            factory,
            element,
            state,
        }
    }

    pub fn id(&self) -> &'f Id {
        self.element.id()
    }

    /// The diagram element itself.
    pub fn element(&self) -> &'f Element {
        self.element
    }

    pub fn name(&self) -> Option<&'f str> {
        self.element.name()
    }

    /// Items in `ownedPresentation` order.
    pub fn get_all_items(&self) -> impl Iterator<Item = &'f Element> + use<'f> {
        let factory = self.factory;
        self.element
            .targets("ownedPresentation")
            .iter()
            .filter_map(move |id| factory.get(id))
    }

    /// Items matching a predicate, in `ownedPresentation` order.
    pub fn select<P>(&self, predicate: P) -> impl Iterator<Item = &'f Element> + use<'f, P>
    where
        P: Fn(&Element) -> bool + 'f,
    {
        self.get_all_items().filter(move |item| predicate(item))
    }

    /// Returns `true` if `item` belongs to this diagram.
    pub fn owns(&self, item: &Id) -> bool {
        self.element.targets("ownedPresentation").contains(item)
    }

    pub fn connections(&self) -> &'f Connections {
        &self.state.connections
    }

    /// Items with an outstanding update request, in request order.
    pub fn pending_updates(&self) -> impl Iterator<Item = &'f Id> + use<'f> {
        self.state.pending.iter()
    }
}

/// Write access to one diagram.
#[derive(Debug)]
pub struct DiagramMut<'f> {
    factory: &'f mut ElementFactory,
    id: Id,
}

impl<'f> DiagramMut<'f> {
    pub(crate) fn new(factory: &'f mut ElementFactory, id: Id) -> Self {
        Self { factory, id }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    /// Creates a presentation item on this diagram with default geometry,
    /// optionally showing `subject`.
    pub fn create(
        &mut self,
        class: &'static ElementClass,
        subject: Option<&Id>,
    ) -> Result<Id, ModelError> {
        let shape = class
            .item_shape()
            .ok_or(ModelError::NotAPresentation(class.name()))?;
        let item = self.create_as(class, Id::generate())?;

        self.factory
            .set_value(&item, "matrix", Value::Matrix(Matrix::identity()))?;
        match shape {
            ItemShape::Element => {
                self.factory.set_value(&item, "width", DEFAULT_WIDTH)?;
                self.factory.set_value(&item, "height", DEFAULT_HEIGHT)?;
            }
            ItemShape::Line => {
                self.factory
                    .set_value(&item, "points", default_points())?;
                self.factory.set_value(&item, "orthogonal", false)?;
                self.factory.set_value(&item, "horizontal", false)?;
            }
        }
        if let Some(subject) = subject {
            self.factory.link(&item, "subject", subject)?;
        }
        self.request_update(&item);
        Ok(item)
    }

    /// Creates a bare presentation item with a given id on this diagram.
    ///
    /// No default geometry is assigned.
    pub fn create_as(&mut self, class: &'static ElementClass, id: Id) -> Result<Id, ModelError> {
        if !class.is_presentation() {
            return Err(ModelError::NotAPresentation(class.name()));
        }
        let item = self.factory.create_as(class, id)?;
        self.factory.link(&item, "diagram", &self.id)?;
        trace!(item:%, diagram:% = self.id; "Created item");
        Ok(item)
    }

    /// Schedules `item` for an update.
    pub fn request_update(&mut self, item: &Id) {
        self.state().pending.insert(item.clone());
    }

    /// Re-glues the connected handles of `items` and of the lines attached
    /// to them, then clears their update requests.
    pub fn update_now(&mut self, items: &[Id]) -> Result<(), ModelError> {
        let infos: Vec<ConnectionInfo> = self
            .state()
            .connections
            .iter()
            .filter(|info| items.contains(info.item()) || items.contains(info.connected()))
            .cloned()
            .collect();

        for info in infos {
            let position = self.factory.handle_position(info.item(), info.handle())?;
            if let Some(glued) = self
                .factory
                .glue_on_port(info.connected(), info.port(), position)
            {
                self.factory
                    .set_handle_position(info.item(), info.handle(), glued)?;
            }
        }

        let state = self.state();
        state.pending.retain(|id| !items.contains(id));
        Ok(())
    }

    /// Processes every pending update request.
    pub fn flush_updates(&mut self) -> Result<(), ModelError> {
        let pending: Vec<Id> = self.state().pending.iter().cloned().collect();
        debug!(diagram:% = self.id, count = pending.len(); "Updating items");
        self.update_now(&pending)
    }

    /// Registers a connection without moving any handle.
    ///
    /// Returns the record it replaced.
    pub fn connect_item(
        &mut self,
        info: ConnectionInfo,
    ) -> Result<Option<ConnectionInfo>, ModelError> {
        self.check_owned(info.item())?;
        self.check_owned(info.connected())?;
        Ok(self.state().connections.connect_item(info))
    }

    /// Connects a line handle to the nearest port of `target`.
    ///
    /// The handle is moved onto the port and the connection is recorded with
    /// a callback that detaches the line's subject on disconnect. Returns the
    /// chosen port.
    pub fn connect(&mut self, item: &Id, handle: usize, target: &Id) -> Result<usize, ModelError> {
        self.check_owned(item)?;
        self.check_owned(target)?;

        let connectable = self
            .factory
            .get(item)
            .and_then(|element| element.handles().get(handle).copied())
            .ok_or_else(|| ModelError::UnknownHandle {
                item: item.clone(),
                handle,
            })?
            .is_connectable();
        if !connectable {
            return Err(ModelError::HandleNotConnectable {
                item: item.clone(),
                handle,
            });
        }

        let position = self.factory.handle_position(item, handle)?;
        let glue = self
            .factory
            .glue(target, position)
            .ok_or_else(|| ModelError::NoPort(target.clone()))?;
        self.factory
            .set_handle_position(item, handle, glue.point())?;

        let info = ConnectionInfo::new(item.clone(), handle, target.clone(), glue.port())
            .with_callback(detach_subject());
        if let Some(previous) = self.state().connections.connect_item(info) {
            trace!(item:%, handle, previous:% = previous.connected(); "Replaced connection");
        }
        self.request_update(item);
        debug!(item:%, handle, target:%, port = glue.port(); "Connected handle");
        Ok(glue.port())
    }

    /// Removes the connection of a handle and runs its callback.
    pub fn disconnect_item(&mut self, item: &Id, handle: usize) -> Option<ConnectionInfo> {
        let info = self.state().connections.remove_connection(item, handle)?;
        if let Some(callback) = info.callback().cloned() {
            (*callback)(self.factory, &info);
        }
        Some(info)
    }

    fn state(&mut self) -> &mut DiagramState {
        self.factory.diagrams.entry(self.id.clone()).or_default()
    }

    fn check_owned(&self, item: &Id) -> Result<(), ModelError> {
        let owned = self
            .factory
            .get(item)
            .is_some_and(|element| element.single("diagram") == Some(&self.id));
        if owned {
            Ok(())
        } else {
            Err(ModelError::ForeignItem {
                item: item.clone(),
                diagram: self.id.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        geometry::Point,
        modeling::{core, uml},
    };

    use super::*;

    struct Fixture {
        factory: ElementFactory,
        diagram: Id,
    }

    fn fixture() -> Fixture {
        let mut factory = ElementFactory::new();
        let diagram = factory.create(&core::DIAGRAM);
        Fixture { factory, diagram }
    }

    fn place(factory: &mut ElementFactory, item: &Id, x: f64, y: f64) {
        let mut matrix = Matrix::identity();
        matrix.translate(x, y);
        factory.set_value(item, "matrix", matrix).unwrap();
    }

    #[test]
    fn test_create_item_links_diagram_and_subject() {
        let Fixture {
            mut factory,
            diagram,
        } = fixture();
        let class = factory.create(&uml::CLASS);

        let item = factory
            .diagram_mut(&diagram)
            .unwrap()
            .create(&uml::CLASS_ITEM, Some(&class))
            .unwrap();

        let element = factory.get(&item).unwrap();
        assert_eq!(element.single("diagram"), Some(&diagram));
        assert_eq!(element.single("subject"), Some(&class));
        assert_eq!(element.size(), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
        assert_eq!(factory.get(&class).unwrap().targets("presentation"), &[item.clone()]);

        let view = factory.diagram(&diagram).unwrap();
        assert!(view.owns(&item));
        assert_eq!(view.pending_updates().count(), 1);
    }

    #[test]
    fn test_create_rejects_model_classes() {
        let Fixture {
            mut factory,
            diagram,
        } = fixture();
        let err = factory
            .diagram_mut(&diagram)
            .unwrap()
            .create(&uml::CLASS, None)
            .unwrap_err();
        assert_eq!(err, ModelError::NotAPresentation("Class"));
    }

    #[test]
    fn test_select_items() {
        let Fixture {
            mut factory,
            diagram,
        } = fixture();
        {
            let mut view = factory.diagram_mut(&diagram).unwrap();
            view.create(&uml::CLASS_ITEM, None).unwrap();
            view.create(&core::COMMENT_ITEM, None).unwrap();
            view.create(&uml::CLASS_ITEM, None).unwrap();
        }

        let view = factory.diagram(&diagram).unwrap();
        assert_eq!(view.get_all_items().count(), 3);
        assert_eq!(view.select(|item| item.is_a(&uml::CLASS_ITEM)).count(), 2);
    }

    #[test]
    fn test_connect_glues_handle_and_records_port() {
        let Fixture {
            mut factory,
            diagram,
        } = fixture();
        let (class_item, line) = {
            let mut view = factory.diagram_mut(&diagram).unwrap();
            let class_item = view.create(&uml::CLASS_ITEM, None).unwrap();
            let line = view.create(&uml::ASSOCIATION_ITEM, None).unwrap();
            (class_item, line)
        };
        place(&mut factory, &class_item, 200.0, 200.0);
        factory
            .set_handle_position(&line, 0, Point::new(195.0, 220.0))
            .unwrap();

        let port = factory
            .diagram_mut(&diagram)
            .unwrap()
            .connect(&line, 0, &class_item)
            .unwrap();

        assert_eq!(port, 3);
        assert_eq!(
            factory.handle_position(&line, 0).unwrap(),
            Point::new(200.0, 220.0)
        );
        let view = factory.diagram(&diagram).unwrap();
        let info = view.connections().get_connection(&line, 0).unwrap();
        assert_eq!(info.connected(), &class_item);
        assert_eq!(info.port(), 3);
        assert!(info.callback().is_some());
    }

    #[test]
    fn test_connect_rejects_items_from_other_diagrams() {
        let Fixture {
            mut factory,
            diagram,
        } = fixture();
        let other = factory.create(&core::DIAGRAM);
        let foreign = factory
            .diagram_mut(&other)
            .unwrap()
            .create(&uml::CLASS_ITEM, None)
            .unwrap();
        let mut view = factory.diagram_mut(&diagram).unwrap();
        let line = view.create(&uml::ASSOCIATION_ITEM, None).unwrap();

        let err = view.connect(&line, 0, &foreign).unwrap_err();
        assert!(matches!(err, ModelError::ForeignItem { .. }));
    }

    #[test]
    fn test_update_now_follows_moved_target() {
        let Fixture {
            mut factory,
            diagram,
        } = fixture();
        let (class_item, line) = {
            let mut view = factory.diagram_mut(&diagram).unwrap();
            (
                view.create(&uml::CLASS_ITEM, None).unwrap(),
                view.create(&uml::ASSOCIATION_ITEM, None).unwrap(),
            )
        };
        factory
            .diagram_mut(&diagram)
            .unwrap()
            .connect(&line, 1, &class_item)
            .unwrap();

        // Move the class far away; the tail follows onto the same port.
        place(&mut factory, &class_item, 300.0, 0.0);
        factory
            .diagram_mut(&diagram)
            .unwrap()
            .update_now(std::slice::from_ref(&class_item))
            .unwrap();

        let position = factory.handle_position(&line, 1).unwrap();
        let glued = factory.glue(&class_item, position).unwrap();
        assert_eq!(glued.distance(), 0.0);
    }

    #[test]
    fn test_disconnect_detaches_subject() {
        let Fixture {
            mut factory,
            diagram,
        } = fixture();
        let association = factory.create(&uml::ASSOCIATION);
        let mut view = factory.diagram_mut(&diagram).unwrap();
        let class_item = view.create(&uml::CLASS_ITEM, None).unwrap();
        let line = view
            .create(&uml::ASSOCIATION_ITEM, Some(&association))
            .unwrap();
        view.connect(&line, 0, &class_item).unwrap();

        let info = view.disconnect_item(&line, 0).unwrap();

        assert_eq!(info.connected(), &class_item);
        assert_eq!(factory.get(&line).unwrap().single("subject"), None);
        assert!(factory.get(&association).unwrap().targets("presentation").is_empty());
    }

    #[test]
    fn test_deleting_connected_item_runs_callback() {
        let Fixture {
            mut factory,
            diagram,
        } = fixture();
        let association = factory.create(&uml::ASSOCIATION);
        let class_item = {
            let mut view = factory.diagram_mut(&diagram).unwrap();
            let class_item = view.create(&uml::CLASS_ITEM, None).unwrap();
            let line = view
                .create(&uml::ASSOCIATION_ITEM, Some(&association))
                .unwrap();
            view.connect(&line, 1, &class_item).unwrap();
            class_item
        };

        factory.delete(&class_item).unwrap();

        let view = factory.diagram(&diagram).unwrap();
        assert!(view.connections().is_empty());
        assert_eq!(view.get_all_items().count(), 1);
        assert!(factory.get(&association).unwrap().targets("presentation").is_empty());
    }

    #[test]
    fn test_deleting_diagram_deletes_items() {
        let Fixture {
            mut factory,
            diagram,
        } = fixture();
        factory
            .diagram_mut(&diagram)
            .unwrap()
            .create(&core::COMMENT_ITEM, None)
            .unwrap();

        let deleted = factory.delete(&diagram).unwrap();
        assert_eq!(deleted.len(), 2);
        assert!(factory.is_empty());
    }
}
