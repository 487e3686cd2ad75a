//! Loading a model document into an element factory.
//!
//! Loading runs in phases:
//!
//! 1. parse the document and check the root element
//! 2. reject files older than [`MIN_SUPPORTED_VERSION`]
//! 3. read the records and check every type and id
//! 4. create every element under its persisted id (pass 1)
//! 5. assign values and resolve references (pass 2)
//! 6. add missing opposite references and drop items listed by a diagram
//!    they do not belong to
//! 7. restore handle connections
//! 8. ensure a style sheet and schedule item updates
//!
//! Failures up to and including phase 3 leave the factory untouched. Later
//! fatal failures leave it partially populated, so callers should flush it.

mod connect;
mod resolver;

use std::io::Read;

use log::{debug, info};
use umbra_core::{
    factory::ElementFactory,
    identifier::Id,
    modeling::{ModelingLanguage, core::STYLE_SHEET},
};

use self::resolver::{Resolver, TypedRecord};
use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, Result, StorageError},
    reader::{ModelDocument, Record},
    report::LoadReport,
    version::{MIN_SUPPORTED_VERSION, ModelVersion, version_lower_than},
};

/// Options of the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    ensure_style_sheet: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            ensure_style_sheet: true,
        }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a style sheet is created when the file has none.
    pub fn with_ensure_style_sheet(mut self, ensure: bool) -> Self {
        self.ensure_style_sheet = ensure;
        self
    }

    pub fn ensure_style_sheet(&self) -> bool {
        self.ensure_style_sheet
    }
}

/// Drops `ownedPresentation` entries naming items of another diagram.
///
/// An item belongs to the diagram its own `diagram` reference names.
fn release_foreign_items(
    factory: &mut ElementFactory,
    diagnostics: &mut DiagnosticCollector,
) -> Result<()> {
    let diagrams: Vec<Id> = factory.diagrams().map(|view| view.id().clone()).collect();
    for diagram in diagrams {
        let Some(element) = factory.get(&diagram) else {
            continue;
        };
        let (kept, foreign): (Vec<Id>, Vec<Id>) = element
            .targets("ownedPresentation")
            .iter()
            .cloned()
            .partition(|item| {
                factory.get(item).and_then(|item| item.single("diagram")) == Some(&diagram)
            });
        if foreign.is_empty() {
            continue;
        }

        for item in foreign {
            let owner = factory
                .get(&item)
                .and_then(|item| item.single("diagram"))
                .map_or_else(|| "no diagram".to_string(), |owner| format!("`{owner}`"));
            diagnostics.emit(
                Diagnostic::warning("Diagram lists an item of another diagram")
                    .with_code(ErrorCode::W307)
                    .with_element(diagram.clone())
                    .with_help(format!("`{item}` belongs to {owner}")),
            );
        }
        factory.set_references(&diagram, "ownedPresentation", kept)?;
    }
    Ok(())
}

/// Loads a model document into `factory`.
///
/// # Errors
///
/// Malformed documents, files older than [`MIN_SUPPORTED_VERSION`],
/// element types unknown to `language` and duplicate ids are fatal.
/// Everything else is reported in the returned [`LoadReport`].
pub fn load(
    source: &str,
    factory: &mut ElementFactory,
    language: &dyn ModelingLanguage,
) -> Result<LoadReport> {
    load_with(source, factory, language, &LoadOptions::default())
}

/// Reads a whole document from `reader` and loads it.
pub fn load_from_reader<R: Read>(
    mut reader: R,
    factory: &mut ElementFactory,
    language: &dyn ModelingLanguage,
) -> Result<LoadReport> {
    let mut source = String::new();
    reader.read_to_string(&mut source)?;
    load(&source, factory, language)
}

/// Like [`load`], with explicit options.
pub fn load_with(
    source: &str,
    factory: &mut ElementFactory,
    language: &dyn ModelingLanguage,
    options: &LoadOptions,
) -> Result<LoadReport> {
    let document = ModelDocument::parse(source)?;
    let header = document.header();
    info!(
        version = header.model_version(),
        language = language.name();
        "Loading model"
    );
    if version_lower_than(header.model_version(), MIN_SUPPORTED_VERSION) {
        return Err(StorageError::UnsupportedVersion {
            found: header.model_version().to_string(),
            minimum: ModelVersion::from(MIN_SUPPORTED_VERSION),
        });
    }

    let records = document.records()?;
    let typed = classify(&records, factory, language)?;

    let mut diagnostics = DiagnosticCollector::new();
    let mut resolver = Resolver::new();
    resolver.instantiate(factory, &typed, &mut diagnostics)?;
    resolver.resolve(factory, &typed, &mut diagnostics);

    let reconciled = factory.reconcile_opposites();
    release_foreign_items(factory, &mut diagnostics)?;
    let connections = connect::reconnect(factory, resolver.take_connections(), &mut diagnostics);
    debug!(reconciled, connections; "Resolved model graph");

    if options.ensure_style_sheet() {
        ensure_style_sheet(factory, language);
    }
    for (diagram, item) in resolver.placed_items() {
        factory.diagram_mut(diagram)?.request_update(item);
    }

    let report = LoadReport::new(
        diagnostics.into_diagnostics(),
        resolver.elements(),
        resolver.items(),
        connections,
    );
    info!(
        elements = report.elements(),
        items = report.items(),
        connections = report.connections(),
        diagnostics = report.diagnostics().len();
        "Model loaded"
    );
    Ok(report)
}

/// Pairs every record with its class and rejects ids already in use.
fn classify<'r>(
    records: &'r [Record],
    factory: &ElementFactory,
    language: &dyn ModelingLanguage,
) -> Result<Vec<TypedRecord<'r>>> {
    records
        .iter()
        .map(|record| {
            let class = language
                .lookup_element(record.type_name())
                .ok_or_else(|| StorageError::UnknownType {
                    type_name: record.type_name().to_string(),
                    id: record.id().to_string(),
                })?;
            if factory.contains(&Id::new(record.id())) {
                return Err(StorageError::Structure(
                    Diagnostic::error(format!(
                        "element id `{}` is already in use by the model",
                        record.id()
                    ))
                    .with_code(ErrorCode::E004)
                    .with_help("load into a fresh or flushed factory"),
                ));
            }
            Ok((record, class))
        })
        .collect()
}

fn ensure_style_sheet(factory: &mut ElementFactory, language: &dyn ModelingLanguage) {
    let Some(class) = language.lookup_element(STYLE_SHEET.name()) else {
        return;
    };
    if factory.kindof(class).next().is_none() {
        let id = factory.create(class);
        debug!(id:%; "Created missing style sheet");
    }
}
