//! The two-pass id table.
//!
//! Pass 1 creates every element under its persisted id; pass 2 assigns the
//! persisted attributes, resolving each referenced id against the table.
//! A reference that does not resolve is dropped with a diagnostic and never
//! aborts the load.

use std::collections::HashMap;

use log::{debug, trace};
use umbra_core::{
    factory::ElementFactory,
    identifier::Id,
    modeling::{AttributeDef, AttributeKind, ElementClass, Multiplicity},
};

use super::connect::PendingConnection;
use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, Result},
    reader::{Record, RecordValue},
    value::parse_value,
};

/// A record paired with the class its type name resolved to.
pub(crate) type TypedRecord<'r> = (&'r Record, &'static ElementClass);

/// An element created in pass 1.
#[derive(Debug, Clone)]
struct Resolved {
    id: Id,
    class: &'static ElementClass,
    diagram: Option<Id>,
}

/// Maps persisted ids to the elements created for them.
#[derive(Debug, Default)]
pub(crate) struct Resolver<'r> {
    table: HashMap<&'r str, Resolved>,
    placed: Vec<(Id, Id)>,
    pending: Vec<PendingConnection>,
}

impl<'r> Resolver<'r> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Pass 1: creates model elements, then items on their diagrams.
    ///
    /// Items whose diagram is not part of the file are skipped with
    /// [`ErrorCode::W302`].
    pub(crate) fn instantiate(
        &mut self,
        factory: &mut ElementFactory,
        records: &[TypedRecord<'r>],
        diagnostics: &mut DiagnosticCollector,
    ) -> Result<()> {
        for &(record, class) in records {
            if class.is_presentation() {
                continue;
            }
            let id = factory.create_as(class, Id::new(record.id()))?;
            self.table.insert(
                record.id(),
                Resolved {
                    id,
                    class,
                    diagram: None,
                },
            );
        }

        for &(record, class) in records {
            if !class.is_presentation() {
                continue;
            }
            let Some(diagram) = self.diagram_of(record) else {
                diagnostics.emit(
                    Diagnostic::warning("Presentation item has no diagram")
                        .with_code(ErrorCode::W302)
                        .with_element(Id::new(record.id()))
                        .with_help(format!(
                            "`{}` on line {} was not loaded",
                            record.type_name(),
                            record.line()
                        )),
                );
                continue;
            };
            let id = factory
                .diagram_mut(&diagram)?
                .create_as(class, Id::new(record.id()))?;
            self.placed.push((diagram.clone(), id.clone()));
            self.table.insert(
                record.id(),
                Resolved {
                    id,
                    class,
                    diagram: Some(diagram),
                },
            );
        }

        debug!(elements = self.elements(), items = self.items(); "Instantiated elements");
        Ok(())
    }

    /// Pass 2: assigns values and references.
    pub(crate) fn resolve(
        &mut self,
        factory: &mut ElementFactory,
        records: &[TypedRecord<'r>],
        diagnostics: &mut DiagnosticCollector,
    ) {
        for &(record, class) in records {
            let Some(source) = self.table.get(record.id()).cloned() else {
                continue;
            };
            trace!(id:% = source.id, attributes = record.attributes().len(); "Resolving record");
            for (name, value) in record.attributes() {
                let Some(attribute) = class.attribute(name) else {
                    diagnostics.emit(
                        Diagnostic::warning(format!("`{}` has no attribute `{name}`", class.name()))
                            .with_code(ErrorCode::W303)
                            .with_element(source.id.clone()),
                    );
                    continue;
                };
                self.assign(factory, &source, attribute, value, diagnostics);
            }
        }
        debug!(connections = self.pending.len(); "Resolved references");
    }

    fn assign(
        &mut self,
        factory: &mut ElementFactory,
        source: &Resolved,
        attribute: &'static AttributeDef,
        value: &RecordValue,
        diagnostics: &mut DiagnosticCollector,
    ) {
        let name = attribute.name();
        match (attribute.kind(), value) {
            (AttributeKind::Value(value_type), RecordValue::Value(text)) => {
                let assigned = parse_value(value_type, text)
                    .map_err(|err| err.to_string())
                    .and_then(|value| {
                        factory
                            .set_value(&source.id, name, value)
                            .map_err(|err| err.to_string())
                    });
                if let Err(reason) = assigned {
                    diagnostics.emit(
                        Diagnostic::warning(format!("Invalid value for `{name}`"))
                            .with_code(ErrorCode::W304)
                            .with_element(source.id.clone())
                            .with_help(reason),
                    );
                }
            }
            (AttributeKind::Association(_), RecordValue::Ref(target)) => {
                self.assign_references(factory, source, attribute, &[target.as_str()], diagnostics);
            }
            (AttributeKind::Association(association), RecordValue::RefList(targets))
                if association.multiplicity() == Multiplicity::Many =>
            {
                let targets: Vec<&str> = targets.iter().map(String::as_str).collect();
                self.assign_references(factory, source, attribute, &targets, diagnostics);
            }
            (AttributeKind::Connection(end), RecordValue::Ref(target)) => {
                let Some(connected) = self.lookup(source, name, target, diagnostics) else {
                    return;
                };
                if let Some(diagram) = &source.diagram {
                    self.pending.push(PendingConnection::new(
                        source.id.clone(),
                        diagram.clone(),
                        end,
                        connected.id,
                    ));
                }
            }
            _ => diagnostics.emit(
                Diagnostic::warning(format!("Unexpected content for `{name}`"))
                    .with_code(ErrorCode::W305)
                    .with_element(source.id.clone())
                    .with_help(format!("`{name}` is declared as {}", describe(attribute))),
            ),
        }
    }

    /// Resolves `targets` in order and assigns the ones that fit.
    fn assign_references(
        &self,
        factory: &mut ElementFactory,
        source: &Resolved,
        attribute: &'static AttributeDef,
        targets: &[&str],
        diagnostics: &mut DiagnosticCollector,
    ) {
        let Some(association) = attribute.association_kind() else {
            return;
        };
        let name = attribute.name();
        let mut resolved = Vec::with_capacity(targets.len());
        for target in targets {
            let Some(found) = self.lookup(source, name, target, diagnostics) else {
                continue;
            };
            if !found.class.is_a(association.target()) {
                diagnostics.emit(
                    Diagnostic::warning("Model has reference of the wrong type")
                        .with_code(ErrorCode::W301)
                        .with_element(source.id.clone())
                        .with_help(format!(
                            "`{name}` expects a `{}`, `{target}` is a `{}`",
                            association.target().name(),
                            found.class.name()
                        )),
                );
                continue;
            }
            resolved.push(found.id);
        }

        if let Err(err) = factory.set_references(&source.id, name, resolved) {
            diagnostics.emit(
                Diagnostic::warning("Model has reference of the wrong type")
                    .with_code(ErrorCode::W301)
                    .with_element(source.id.clone())
                    .with_help(err.to_string()),
            );
        }
    }

    /// Looks a persisted id up, reporting it when absent.
    fn lookup(
        &self,
        source: &Resolved,
        name: &str,
        target: &str,
        diagnostics: &mut DiagnosticCollector,
    ) -> Option<Resolved> {
        let found = self.table.get(target).cloned();
        if found.is_none() {
            diagnostics.emit(
                Diagnostic::warning("Model has unknown reference")
                    .with_code(ErrorCode::W300)
                    .with_element(source.id.clone())
                    .with_help(format!("`{name}` refers to `{target}`, which is not in the file")),
            );
        }
        found
    }

    fn diagram_of(&self, record: &Record) -> Option<Id> {
        let diagram = self.table.get(record.reference("diagram")?)?;
        diagram.class.is_diagram().then(|| diagram.id.clone())
    }

    /// Number of loaded model elements, diagrams included.
    pub(crate) fn elements(&self) -> usize {
        self.table.values().filter(|r| r.diagram.is_none()).count()
    }

    /// Number of loaded presentation items.
    pub(crate) fn items(&self) -> usize {
        self.placed.len()
    }

    /// Every loaded item with its diagram, in file order.
    pub(crate) fn placed_items(&self) -> &[(Id, Id)] {
        &self.placed
    }

    /// Connections recorded in pass 2, in record order.
    pub(crate) fn take_connections(&mut self) -> Vec<PendingConnection> {
        std::mem::take(&mut self.pending)
    }
}

fn describe(attribute: &AttributeDef) -> &'static str {
    match attribute.kind() {
        AttributeKind::Value(_) => "a value",
        AttributeKind::Association(association) => match association.multiplicity() {
            Multiplicity::One => "a single reference",
            Multiplicity::Many => "a reference list",
        },
        AttributeKind::Connection(_) => "a connection",
    }
}
