//! Writing a model as an XML document.
//!
//! Model elements are written in creation order, followed by the items of
//! every written diagram in the diagram's presentation order. Each element
//! becomes one flat record; items refer to their diagram through the
//! `diagram` attribute and are never wrapped in a canvas element.

use std::{borrow::Cow, collections::HashSet, io::Write};

use log::{debug, info, trace};
use quick_xml::{
    Writer,
    escape::escape,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use umbra_core::{
    element::Element,
    factory::ElementFactory,
    identifier::Id,
    modeling::{AttributeKind, HandleEnd, Multiplicity},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, Result},
    reader::{NAMESPACE, ROOT_TAG},
    report::Report,
    value::format_value,
    version::{FORMAT_VERSION, MODEL_VERSION},
};

/// Formatting options of the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    indent: usize,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

impl SaveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of spaces per nesting level.
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn indent(&self) -> usize {
        self.indent
    }
}

/// Persisted content of one attribute.
enum Field {
    Value(String),
    Ref(Id),
    RefList(Vec<Id>),
}

/// Writes every element of `factory` to `sink`.
pub fn save<W: Write>(sink: W, factory: &ElementFactory) -> Result<Report> {
    save_with(sink, factory, &SaveOptions::default(), |_| true)
}

/// Writes the elements of `factory` accepted by `include`.
///
/// Items are only written when their diagram is. References to elements
/// outside the written set are dropped and reported with
/// [`ErrorCode::W300`].
pub fn save_filtered<W, P>(sink: W, factory: &ElementFactory, include: P) -> Result<Report>
where
    W: Write,
    P: Fn(&Element) -> bool,
{
    save_with(sink, factory, &SaveOptions::default(), include)
}

/// Like [`save_filtered`], with explicit formatting options.
pub fn save_with<W, P>(
    sink: W,
    factory: &ElementFactory,
    options: &SaveOptions,
    include: P,
) -> Result<Report>
where
    W: Write,
    P: Fn(&Element) -> bool,
{
    let elements = export_order(factory, &include);
    let exported: HashSet<&Id> = elements.iter().map(|element| element.id()).collect();
    info!(elements = elements.len(), total = factory.len(); "Saving model");

    let mut diagnostics = DiagnosticCollector::new();
    let mut writer = Writer::new_with_indent(sink, b' ', options.indent());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    write_tag_start_with_attrs(
        &mut writer,
        ROOT_TAG,
        &[
            ("xmlns", NAMESPACE),
            ("version", FORMAT_VERSION),
            ("gaphor-version", MODEL_VERSION),
        ],
    )?;

    for element in &elements {
        let fields = fields_of(factory, element, &exported, &mut diagnostics);
        write_record(&mut writer, element, &fields)?;
    }

    write_tag_end(&mut writer, ROOT_TAG)?;
    let mut sink = writer.into_inner();
    sink.write_all(b"\n")?;
    sink.flush()?;

    debug!(diagnostics = diagnostics.len(); "Model saved");
    Ok(Report::new(diagnostics.into_diagnostics()))
}

/// Elements to write, in output order.
fn export_order<'f>(
    factory: &'f ElementFactory,
    include: &dyn Fn(&Element) -> bool,
) -> Vec<&'f Element> {
    let mut elements: Vec<&Element> = factory
        .iter()
        .filter(|element| !element.class().is_presentation() && include(*element))
        .collect();

    let diagrams: Vec<&Id> = elements
        .iter()
        .filter(|element| element.class().is_diagram())
        .map(|element| element.id())
        .collect();
    for diagram in diagrams {
        if let Ok(view) = factory.diagram(diagram) {
            let owned = view
                .get_all_items()
                .filter(|item| item.single("diagram") == Some(diagram));
            elements.extend(owned.filter(|item| include(*item)));
        }
    }
    elements
}

/// Collects the persisted attributes of `element` in declaration order.
fn fields_of(
    factory: &ElementFactory,
    element: &Element,
    exported: &HashSet<&Id>,
    diagnostics: &mut DiagnosticCollector,
) -> Vec<(&'static str, Field)> {
    let mut fields = Vec::new();
    let mut keep = |name: &str, target: &Id| {
        if exported.contains(target) {
            return true;
        }
        diagnostics.emit(
            Diagnostic::warning("Model has unknown reference")
                .with_code(ErrorCode::W300)
                .with_element(element.id().clone())
                .with_help(format!(
                    "`{name}` refers to `{target}`, which is not part of the saved model"
                )),
        );
        false
    };

    for attribute in element.class().attributes() {
        let name = attribute.name();
        let field = match attribute.kind() {
            AttributeKind::Value(_) => element.value(name).map(|v| Field::Value(format_value(v))),
            AttributeKind::Association(association) => {
                let targets: Vec<Id> = element
                    .targets(name)
                    .iter()
                    .filter(|target| keep(name, *target))
                    .cloned()
                    .collect();
                match association.multiplicity() {
                    _ if targets.is_empty() => None,
                    Multiplicity::One => targets.into_iter().next().map(Field::Ref),
                    Multiplicity::Many => Some(Field::RefList(targets)),
                }
            }
            AttributeKind::Connection(end) => connected_to(factory, element, end)
                .filter(|target| keep(name, target))
                .map(Field::Ref),
        };
        if let Some(field) = field {
            fields.push((name, field));
        }
    }
    fields
}

/// The element a line end is connected to, from its diagram's connections.
fn connected_to(factory: &ElementFactory, item: &Element, end: HandleEnd) -> Option<Id> {
    let handle = item.end_handle(end)?;
    let diagram = factory.diagram(item.single("diagram")?).ok()?;
    diagram
        .connections()
        .get_connection(item.id(), handle)
        .map(|info| info.connected().clone())
}

fn write_record<W: Write>(
    writer: &mut Writer<W>,
    element: &Element,
    fields: &[(&'static str, Field)],
) -> Result<()> {
    let tag = element.class().name();
    let attrs = [("id", element.id().as_str())];
    trace!(tag, id:% = element.id(), fields = fields.len(); "Writing record");

    if fields.is_empty() {
        return write_empty_tag_with_attrs(writer, tag, &attrs);
    }
    write_tag_start_with_attrs(writer, tag, &attrs)?;
    for (name, field) in fields {
        write_tag_start(writer, name)?;
        match field {
            Field::Value(text) => {
                write_tag_start(writer, "val")?;
                write_tag_text(writer, text)?;
                write_tag_end(writer, "val")?;
            }
            Field::Ref(target) => write_ref(writer, target)?,
            Field::RefList(targets) => {
                write_tag_start(writer, "reflist")?;
                for target in targets {
                    write_ref(writer, target)?;
                }
                write_tag_end(writer, "reflist")?;
            }
        }
        write_tag_end(writer, name)?;
    }
    write_tag_end(writer, tag)
}

fn write_ref<W: Write>(writer: &mut Writer<W>, target: &Id) -> Result<()> {
    write_empty_tag_with_attrs(writer, "ref", &[("refid", target.as_str())])
}

fn write_tag_start<W: Write>(writer: &mut Writer<W>, tag_name: &str) -> Result<()> {
    write_tag_start_with_attrs(writer, tag_name, &[])
}

fn write_tag_start_with_attrs<W: Write>(
    writer: &mut Writer<W>,
    tag_name: &str,
    attrs: &[(&str, &str)],
) -> Result<()> {
    let mut elem = BytesStart::new(tag_name);
    for attr in attrs.iter() {
        elem.push_attribute(*attr);
    }
    writer.write_event(Event::Start(elem))?;
    Ok(())
}

fn write_empty_tag_with_attrs<W: Write>(
    writer: &mut Writer<W>,
    tag_name: &str,
    attrs: &[(&str, &str)],
) -> Result<()> {
    let mut elem = BytesStart::new(tag_name);
    for attr in attrs.iter() {
        elem.push_attribute(*attr);
    }
    writer.write_event(Event::Empty(elem))?;
    Ok(())
}

fn write_tag_end<W: Write>(writer: &mut Writer<W>, tag_name: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(tag_name)))?;
    Ok(())
}

/// Writes text content, always as an event so the closing tag stays on the
/// same line and empty text reads back as empty.
fn write_tag_text<W: Write>(writer: &mut Writer<W>, content: &str) -> Result<()> {
    writer.write_event(Event::Text(BytesText::from_escaped(escape_text(content))))?;
    Ok(())
}

/// Markup characters become entities; carriage returns become character
/// references because parsers normalize literal line endings.
fn escape_text(content: &str) -> Cow<'_, str> {
    let escaped = escape(content);
    if escaped.contains('\r') {
        Cow::Owned(escaped.replace('\r', "&#13;"))
    } else {
        escaped
    }
}
