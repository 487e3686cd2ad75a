//! Reading model documents into flat records.
//!
//! A model document looks like this:
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <gaphor xmlns="http://gaphor.sourceforge.net/model" version="3.0" gaphor-version="2.19.0">
//!   <Package id="p1">
//!     <name>
//!       <val>Model</val>
//!     </name>
//!     <ownedType>
//!       <reflist>
//!         <ref refid="c1"/>
//!       </reflist>
//!     </ownedType>
//!   </Package>
//!   <Class id="c1">
//!     <package>
//!       <ref refid="p1"/>
//!     </package>
//!   </Class>
//! </gaphor>
//! ```
//!
//! Every child of the root is a record whose tag is the element type. The
//! children of a record are its attributes, holding exactly one `val`, `ref`
//! or `reflist`. The reader does not know about element classes; checking
//! types and attributes is left to the loader.

use std::collections::HashSet;

use log::{debug, trace};
use roxmltree::{Document, Node};

use crate::error::{Diagnostic, ErrorCode, Result, StorageError};

/// Namespace of model documents.
pub const NAMESPACE: &str = "http://gaphor.sourceforge.net/model";

/// Name of the root element.
pub const ROOT_TAG: &str = "gaphor";

/// Wrapper for diagram items written by old versions.
const LEGACY_CANVAS_TAG: &str = "canvas";

/// Attributes of the root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    format_version: Option<String>,
    model_version: String,
}

impl FileHeader {
    /// The file format version (`version` attribute).
    pub fn format_version(&self) -> Option<&str> {
        self.format_version.as_deref()
    }

    /// Version of the application that wrote the file (`gaphor-version`).
    ///
    /// A missing attribute reads as `"0"`.
    pub fn model_version(&self) -> &str {
        &self.model_version
    }
}

/// The persisted content of one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValue {
    /// A scalar, in text form.
    Value(String),
    /// A single reference.
    Ref(String),
    /// An ordered list of references.
    RefList(Vec<String>),
}

/// One persisted element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    type_name: String,
    id: String,
    line: u32,
    attributes: Vec<(String, RecordValue)>,
}

impl Record {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Line of the record's start tag.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Attributes in document order.
    pub fn attributes(&self) -> &[(String, RecordValue)] {
        &self.attributes
    }

    /// Looks up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&RecordValue> {
        self.attributes
            .iter()
            .find(|(attribute, _)| attribute == name)
            .map(|(_, value)| value)
    }

    /// The id held by a single reference attribute.
    pub fn reference(&self, name: &str) -> Option<&str> {
        match self.attribute(name)? {
            RecordValue::Ref(id) => Some(id),
            _ => None,
        }
    }
}

/// A parsed model document.
#[derive(Debug)]
pub struct ModelDocument<'input> {
    document: Document<'input>,
}

impl<'input> ModelDocument<'input> {
    /// Parses `source` and checks its root element.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Xml`] when the text is not well formed and a
    /// structure error with [`ErrorCode::E002`] when the root is not a model
    /// root.
    pub fn parse(source: &'input str) -> Result<Self> {
        let document = Document::parse(source)?;
        let root = document.root_element();
        let tag = root.tag_name();
        let namespace_ok = tag.namespace().is_none_or(|namespace| namespace == NAMESPACE);
        if tag.name() != ROOT_TAG || !namespace_ok {
            return Err(StorageError::Structure(
                Diagnostic::error(format!(
                    "expected a `{ROOT_TAG}` root element, found `{}`",
                    tag.name()
                ))
                .with_code(ErrorCode::E002)
                .with_help(format!("model documents use the `{NAMESPACE}` namespace")),
            ));
        }
        Ok(Self { document })
    }

    /// Reads the header attributes.
    pub fn header(&self) -> FileHeader {
        let root = self.document.root_element();
        FileHeader {
            format_version: root.attribute("version").map(str::to_string),
            model_version: root.attribute("gaphor-version").unwrap_or("0").to_string(),
        }
    }

    /// Reads every record in document order.
    ///
    /// # Errors
    ///
    /// A record without an id ([`ErrorCode::E003`]) or an id used twice
    /// ([`ErrorCode::E004`]) is a structure error.
    pub fn records(&self) -> Result<Vec<Record>> {
        let mut seen = HashSet::new();
        let mut records = Vec::new();

        for node in self.document.root_element().children().filter(Node::is_element) {
            let record = self.read_record(node)?;
            if !seen.insert(record.id.clone()) {
                return Err(StorageError::Structure(
                    Diagnostic::error(format!("element id `{}` is used more than once", record.id))
                        .with_code(ErrorCode::E004)
                        .with_help(format!("second use on line {}", record.line)),
                ));
            }
            trace!(type_name = record.type_name(), id = record.id(); "Read record");
            records.push(record);
        }
        debug!(count = records.len(); "Read model records");
        Ok(records)
    }

    fn read_record(&self, node: Node<'_, '_>) -> Result<Record> {
        let type_name = node.tag_name().name().to_string();
        let line = self.line_of(node);
        let Some(id) = node.attribute("id") else {
            return Err(StorageError::Structure(
                Diagnostic::error(format!("`{type_name}` record has no id"))
                    .with_code(ErrorCode::E003)
                    .with_help(format!("record starts on line {line}")),
            ));
        };

        let mut attributes = Vec::new();
        for child in node.children().filter(Node::is_element) {
            let name = child.tag_name().name();
            if name == LEGACY_CANVAS_TAG {
                debug!(id; "Skipping legacy canvas element");
                continue;
            }
            match read_value(child) {
                Some(value) => attributes.push((name.to_string(), value)),
                None => debug!(id, attribute = name; "Skipping attribute without value"),
            }
        }

        Ok(Record {
            type_name,
            id: id.to_string(),
            line,
            attributes,
        })
    }

    fn line_of(&self, node: Node<'_, '_>) -> u32 {
        self.document.text_pos_at(node.range().start).row
    }
}

/// Reads the single `val`, `ref` or `reflist` child of an attribute.
fn read_value(attribute: Node<'_, '_>) -> Option<RecordValue> {
    let content = attribute.children().find(Node::is_element)?;
    match content.tag_name().name() {
        "val" => Some(RecordValue::Value(
            content.text().unwrap_or_default().to_string(),
        )),
        "ref" => content
            .attribute("refid")
            .map(|id| RecordValue::Ref(id.to_string())),
        "reflist" => Some(RecordValue::RefList(
            content
                .children()
                .filter(|node| node.has_tag_name("ref"))
                .filter_map(|node| node.attribute("refid"))
                .map(str::to_string)
                .collect(),
        )),
        _ => None,
    }
}
