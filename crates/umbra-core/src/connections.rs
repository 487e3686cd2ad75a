//! Handle connections of a diagram.
//!
//! Every diagram keeps a [`Connections`] table recording which handle of
//! which line item is glued to which port of which other item. There is at
//! most one record per `(item, handle)` pair.

use std::{fmt, rc::Rc};

use indexmap::IndexMap;

use crate::{factory::ElementFactory, identifier::Id};

/// Invoked after a connection has been removed from its table.
pub type ConnectionCallback = Rc<dyn Fn(&mut ElementFactory, &ConnectionInfo)>;

/// One handle connection.
#[derive(Clone)]
pub struct ConnectionInfo {
    item: Id,
    handle: usize,
    connected: Id,
    port: usize,
    callback: Option<ConnectionCallback>,
}

impl ConnectionInfo {
    pub fn new(item: Id, handle: usize, connected: Id, port: usize) -> Self {
        Self {
            item,
            handle,
            connected,
            port,
            callback: None,
        }
    }

    /// Attaches a disconnect callback.
    pub fn with_callback(mut self, callback: ConnectionCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    /// The item owning the handle.
    pub fn item(&self) -> &Id {
        &self.item
    }

    /// Index of the handle on `item`.
    pub fn handle(&self) -> usize {
        self.handle
    }

    /// The item the handle is glued to.
    pub fn connected(&self) -> &Id {
        &self.connected
    }

    /// Index of the port on `connected`.
    pub fn port(&self) -> usize {
        self.port
    }

    pub fn callback(&self) -> Option<&ConnectionCallback> {
        self.callback.as_ref()
    }
}

impl fmt::Debug for ConnectionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionInfo")
            .field("item", &self.item)
            .field("handle", &self.handle)
            .field("connected", &self.connected)
            .field("port", &self.port)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

/// Connection table of one diagram.
#[derive(Debug, Default, Clone)]
pub struct Connections {
    infos: IndexMap<(Id, usize), ConnectionInfo>,
}

impl Connections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a connection, returning the record it replaced.
    pub fn connect_item(&mut self, info: ConnectionInfo) -> Option<ConnectionInfo> {
        let key = (info.item.clone(), info.handle);
        self.infos.insert(key, info)
    }

    /// Removes the record for `(item, handle)` without running its callback.
    pub fn remove_connection(&mut self, item: &Id, handle: usize) -> Option<ConnectionInfo> {
        self.infos.shift_remove(&(item.clone(), handle))
    }

    pub fn get_connection(&self, item: &Id, handle: usize) -> Option<&ConnectionInfo> {
        self.infos.get(&(item.clone(), handle))
    }

    /// Connections filtered by owning item and/or connected item.
    pub fn get_connections<'a>(
        &'a self,
        item: Option<&'a Id>,
        connected: Option<&'a Id>,
    ) -> impl Iterator<Item = &'a ConnectionInfo> + 'a {
        self.infos.values().filter(move |info| {
            item.is_none_or(|item| info.item == *item)
                && connected.is_none_or(|connected| info.connected == *connected)
        })
    }

    /// Removes and returns every record that involves an id matching `doomed`.
    pub(crate) fn drain_involving(&mut self, doomed: impl Fn(&Id) -> bool) -> Vec<ConnectionInfo> {
        let mut removed = Vec::new();
        self.infos.retain(|_, info| {
            if doomed(&info.item) || doomed(&info.connected) {
                removed.push(info.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConnectionInfo> {
        self.infos.values()
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_record_per_handle() {
        let mut connections = Connections::new();
        let line = Id::new("line");

        connections.connect_item(ConnectionInfo::new(line.clone(), 0, Id::new("a"), 1));
        connections.connect_item(ConnectionInfo::new(line.clone(), 1, Id::new("b"), 3));
        let replaced =
            connections.connect_item(ConnectionInfo::new(line.clone(), 0, Id::new("c"), 2));

        assert_eq!(connections.len(), 2);
        assert_eq!(replaced.map(|info| info.connected().clone()), Some(Id::new("a")));
        assert_eq!(
            connections.get_connection(&line, 0).map(|info| info.port()),
            Some(2)
        );
    }

    #[test]
    fn test_filter_by_connected() {
        let mut connections = Connections::new();
        let target = Id::new("a");
        connections.connect_item(ConnectionInfo::new(Id::new("l1"), 0, target.clone(), 0));
        connections.connect_item(ConnectionInfo::new(Id::new("l2"), 1, target.clone(), 0));
        connections.connect_item(ConnectionInfo::new(Id::new("l2"), 0, Id::new("b"), 0));

        assert_eq!(connections.get_connections(None, Some(&target)).count(), 2);
        assert_eq!(
            connections
                .get_connections(Some(&Id::new("l2")), Some(&target))
                .count(),
            1
        );
        assert_eq!(connections.get_connections(None, None).count(), 3);
    }

    #[test]
    fn test_drain_involving() {
        let mut connections = Connections::new();
        connections.connect_item(ConnectionInfo::new(Id::new("l1"), 0, Id::new("a"), 0));
        connections.connect_item(ConnectionInfo::new(Id::new("l2"), 0, Id::new("b"), 0));

        let drained = connections.drain_involving(|id| id == "a");
        assert_eq!(drained.len(), 1);
        assert_eq!(connections.len(), 1);
    }
}
