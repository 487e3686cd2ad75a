//! Restoring handle connections of loaded line items.
//!
//! Connections are persisted as `head-connection`/`tail-connection`
//! references. They run once every item exists, since a line may connect
//! to an item further down the file.

use log::debug;
use umbra_core::{
    connections::ConnectionInfo,
    diagram::detach_subject,
    error::ModelError,
    factory::ElementFactory,
    identifier::Id,
    modeling::HandleEnd,
};

use crate::error::{Diagnostic, DiagnosticCollector, ErrorCode};

/// A persisted connection waiting for its items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingConnection {
    item: Id,
    diagram: Id,
    end: HandleEnd,
    connected: Id,
}

impl PendingConnection {
    pub(crate) fn new(item: Id, diagram: Id, end: HandleEnd, connected: Id) -> Self {
        Self {
            item,
            diagram,
            end,
            connected,
        }
    }
}

/// Registers every pending connection on its diagram.
///
/// Handles stay where the file put them; the port is the one nearest to
/// the handle. Failures are reported with [`ErrorCode::W306`], as are
/// connections that replace an earlier one on the same handle. Returns the
/// number of connection records on the diagrams.
pub(crate) fn reconnect(
    factory: &mut ElementFactory,
    pending: Vec<PendingConnection>,
    diagnostics: &mut DiagnosticCollector,
) -> usize {
    let mut restored = 0;
    for connection in pending {
        match reconnect_one(factory, &connection) {
            Ok((port, None)) => {
                debug!(
                    item:% = connection.item,
                    end:? = connection.end,
                    connected:% = connection.connected,
                    port;
                    "Restored connection"
                );
                restored += 1;
            }
            Ok((_, Some(previous))) => diagnostics.emit(
                Diagnostic::warning("Connection replaced another on the same handle")
                    .with_code(ErrorCode::W306)
                    .with_element(connection.item.clone())
                    .with_help(format!(
                        "handle {} was connected to `{}`, now to `{}`",
                        previous.handle(),
                        previous.connected(),
                        connection.connected
                    )),
            ),
            Err(err) => diagnostics.emit(
                Diagnostic::warning("Connection could not be restored")
                    .with_code(ErrorCode::W306)
                    .with_element(connection.item.clone())
                    .with_help(err.to_string()),
            ),
        }
    }
    restored
}

/// Returns the chosen port and the record the connection replaced.
fn reconnect_one(
    factory: &mut ElementFactory,
    connection: &PendingConnection,
) -> Result<(usize, Option<ConnectionInfo>), ModelError> {
    let item = &connection.item;
    let handle = factory
        .get(item)
        .ok_or_else(|| ModelError::UnknownElement(item.clone()))?
        .end_handle(connection.end)
        .ok_or_else(|| ModelError::HandleNotConnectable {
            item: item.clone(),
            handle: 0,
        })?;

    let position = factory.handle_position(item, handle)?;
    let port = factory
        .glue(&connection.connected, position)
        .ok_or_else(|| ModelError::NoPort(connection.connected.clone()))?
        .port();

    let info = ConnectionInfo::new(item.clone(), handle, connection.connected.clone(), port)
        .with_callback(detach_subject());
    let replaced = factory
        .diagram_mut(&connection.diagram)?
        .connect_item(info)?;
    Ok((port, replaced))
}

#[cfg(test)]
mod tests {
    use umbra_core::{
        geometry::{Matrix, Point},
        modeling::core,
    };

    use super::*;

    struct Fixture {
        factory: ElementFactory,
        diagram: Id,
        line: Id,
        left: Id,
        right: Id,
    }

    /// A line from (0, 20) to (200, 20) between two comment boxes.
    fn fixture() -> Fixture {
        let mut factory = ElementFactory::new();
        let diagram = factory.create(&core::DIAGRAM);
        let mut view = factory.diagram_mut(&diagram).unwrap();
        let left = view.create(&core::COMMENT_ITEM, None).unwrap();
        let right = view.create(&core::COMMENT_ITEM, None).unwrap();
        let line = view.create(&core::COMMENT_LINE_ITEM, None).unwrap();

        let mut matrix = Matrix::identity();
        matrix.translate(200.0, 0.0);
        factory.set_value(&right, "matrix", matrix).unwrap();
        factory
            .set_value(
                &line,
                "points",
                vec![Point::new(100.0, 20.0), Point::new(200.0, 20.0)],
            )
            .unwrap();

        Fixture {
            factory,
            diagram,
            line,
            left,
            right,
        }
    }

    #[test]
    fn test_both_ends_get_distinct_records() {
        let Fixture {
            mut factory,
            diagram,
            line,
            left,
            right,
        } = fixture();
        let pending = vec![
            PendingConnection::new(line.clone(), diagram.clone(), HandleEnd::Head, left.clone()),
            PendingConnection::new(line.clone(), diagram.clone(), HandleEnd::Tail, right.clone()),
        ];
        let mut diagnostics = DiagnosticCollector::new();

        assert_eq!(reconnect(&mut factory, pending, &mut diagnostics), 2);
        assert_eq!(diagnostics.len(), 0);

        let view = factory.diagram(&diagram).unwrap();
        let head = view.connections().get_connection(&line, 0).unwrap();
        let tail = view.connections().get_connection(&line, 1).unwrap();
        assert_eq!(head.connected(), &left);
        assert_eq!(tail.connected(), &right);
        // East side of the left box, west side of the right box.
        assert_eq!(head.port(), 1);
        assert_eq!(tail.port(), 3);
        assert!(head.callback().is_some());
        assert!(!std::ptr::eq(head, tail));
    }

    #[test]
    fn test_handles_are_not_moved() {
        let Fixture {
            mut factory,
            diagram,
            line,
            left,
            ..
        } = fixture();
        let pending = vec![PendingConnection::new(
            line.clone(),
            diagram,
            HandleEnd::Head,
            left,
        )];

        reconnect(&mut factory, pending, &mut DiagnosticCollector::new());
        assert_eq!(
            factory.handle_position(&line, 0).unwrap(),
            Point::new(100.0, 20.0)
        );
    }

    #[test]
    fn test_ends_sharing_a_handle_count_once() {
        let Fixture {
            mut factory,
            diagram,
            line,
            left,
            right,
        } = fixture();
        factory
            .set_value(&line, "points", vec![Point::new(150.0, 20.0)])
            .unwrap();
        let pending = vec![
            PendingConnection::new(line.clone(), diagram.clone(), HandleEnd::Head, left),
            PendingConnection::new(line.clone(), diagram.clone(), HandleEnd::Tail, right.clone()),
        ];
        let mut diagnostics = DiagnosticCollector::new();

        assert_eq!(reconnect(&mut factory, pending, &mut diagnostics), 1);
        let diagnostics = diagnostics.into_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::W306));

        let view = factory.diagram(&diagram).unwrap();
        assert_eq!(view.connections().len(), 1);
        let info = view.connections().get_connection(&line, 0).unwrap();
        assert_eq!(info.connected(), &right);
    }

    #[test]
    fn test_connection_across_diagrams_is_reported() {
        let Fixture {
            mut factory, line, ..
        } = fixture();
        let other = factory.create(&core::DIAGRAM);
        let stranger = factory
            .diagram_mut(&other)
            .unwrap()
            .create(&core::COMMENT_ITEM, None)
            .unwrap();
        let line_diagram = factory.get(&line).unwrap().single("diagram").cloned().unwrap();
        let pending = vec![PendingConnection::new(
            line.clone(),
            line_diagram.clone(),
            HandleEnd::Tail,
            stranger,
        )];
        let mut diagnostics = DiagnosticCollector::new();

        assert_eq!(reconnect(&mut factory, pending, &mut diagnostics), 0);
        let diagnostics = diagnostics.into_diagnostics();
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::W306));
        assert_eq!(diagnostics[0].element(), Some(&line));
        assert!(
            factory
                .diagram(&line_diagram)
                .unwrap()
                .connections()
                .get_connection(&line, 1)
                .is_none()
        );
    }
}
