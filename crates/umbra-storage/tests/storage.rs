use std::collections::BTreeMap;

use umbra_core::{
    factory::ElementFactory,
    identifier::Id,
    modeling::{core, default_language, uml},
};
use umbra_storage::{ErrorCode, StorageError, load, save, save_filtered};

const SIMPLE_ITEMS: &str = include_str!("models/simple-items.gaphor");
const OLD_VERSION: &str = include_str!("models/old-gaphor-version.gaphor");

fn save_to_string(factory: &ElementFactory) -> String {
    let mut buffer = Vec::new();
    save(&mut buffer, factory).expect("Failed to save");
    String::from_utf8(buffer).expect("Saved model is not UTF-8")
}

fn load_fresh(source: &str) -> ElementFactory {
    let mut factory = ElementFactory::new();
    load(source, &mut factory, &default_language()).expect("Failed to load");
    factory
}

/// Number of elements per type name.
fn census(factory: &ElementFactory) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for element in factory.iter() {
        *counts.entry(element.class().name()).or_default() += 1;
    }
    counts
}

/// Package with two classes and an association, shown on one diagram.
fn sample_model() -> (ElementFactory, Id) {
    let mut factory = ElementFactory::new();
    let package = factory.create(&uml::PACKAGE);
    factory.set_value(&package, "name", "Model").unwrap();
    let diagram = factory.create(&core::DIAGRAM);
    factory.set_value(&diagram, "name", "main").unwrap();
    factory.link(&diagram, "element", &package).unwrap();

    let car = factory.create(&uml::CLASS);
    factory.set_value(&car, "name", "Car").unwrap();
    factory.link(&car, "package", &package).unwrap();
    let wheel = factory.create(&uml::CLASS);
    factory.set_value(&wheel, "name", "Wheel").unwrap();
    factory.link(&wheel, "package", &package).unwrap();
    let association = factory.create(&uml::ASSOCIATION);
    factory.link(&association, "package", &package).unwrap();

    let mut view = factory.diagram_mut(&diagram).unwrap();
    let car_item = view.create(&uml::CLASS_ITEM, Some(&car)).unwrap();
    let wheel_item = view.create(&uml::CLASS_ITEM, Some(&wheel)).unwrap();
    let line = view.create(&uml::ASSOCIATION_ITEM, Some(&association)).unwrap();
    view.connect(&line, 0, &car_item).unwrap();
    view.connect(&line, 1, &wheel_item).unwrap();

    (factory, diagram)
}

#[test]
fn test_round_trip_keeps_counts_and_types() {
    let (factory, _) = sample_model();
    let saved = save_to_string(&factory);

    let mut loaded = ElementFactory::new();
    let report = load(&saved, &mut loaded, &default_language()).expect("Failed to load");

    // The loader adds the style sheet the sample lacks.
    let mut expected = census(&factory);
    expected.insert("StyleSheet", 1);
    assert_eq!(census(&loaded), expected);
    assert_eq!(report.elements(), 5);
    assert_eq!(report.items(), 3);
    assert_eq!(report.connections(), 2);
    assert!(report.is_clean(), "{:?}", report.diagnostics());
}

#[test]
fn test_name_whitespace_survives() {
    let mut factory = ElementFactory::new();
    let class = factory.create(&uml::CLASS);
    let name = "  \t Leading, internal  and trailing\nwhitespace <&> \r\n ";
    factory.set_value(&class, "name", name).unwrap();

    let loaded = load_fresh(&save_to_string(&factory));
    assert_eq!(loaded.get(&class).unwrap().name(), Some(name));
}

#[test]
fn test_save_load_save_is_identical() {
    let (factory, _) = sample_model();
    let first = save_to_string(&factory);
    let second = save_to_string(&load_fresh(&first));
    let third = save_to_string(&load_fresh(&second));

    // The first reload adds a style sheet, after that nothing changes.
    assert_eq!(second, third);
}

#[test]
fn test_fixture_loads_completely() {
    let mut factory = ElementFactory::new();
    let report = load(SIMPLE_ITEMS, &mut factory, &default_language()).expect("Failed to load");

    assert!(report.is_clean(), "{:?}", report.diagnostics());
    assert_eq!(report.elements(), 9);
    assert_eq!(report.items(), 5);
    assert_eq!(report.connections(), 4);
    assert_eq!(factory.len(), 14);

    let diagram = factory.diagram(&Id::new("b4e0c2a2-0f8d-4c5e-8a51-3f1f6c2d9a02")).unwrap();
    assert_eq!(diagram.name(), Some("main"));
    assert_eq!(diagram.get_all_items().count(), 5);

    let car = factory.get(&Id::new("b4e0c2a2-0f8d-4c5e-8a51-3f1f6c2d9a03")).unwrap();
    assert_eq!(car.name(), Some("Car & <Co>"));
    let comment = factory.get(&Id::new("b4e0c2a2-0f8d-4c5e-8a51-3f1f6c2d9a08")).unwrap();
    assert_eq!(comment.text("body"), Some("  A car has wheels.  "));
}

#[test]
fn test_fixture_saves_unchanged() {
    let factory = load_fresh(SIMPLE_ITEMS);
    assert_eq!(save_to_string(&factory), SIMPLE_ITEMS);
}

#[test]
fn test_fixture_connections_are_restored() {
    let factory = load_fresh(SIMPLE_ITEMS);
    let diagram = factory.diagram(&Id::new("b4e0c2a2-0f8d-4c5e-8a51-3f1f6c2d9a02")).unwrap();
    let line = Id::new("b4e0c2a2-0f8d-4c5e-8a51-3f1f6c2d9a12");

    let head = diagram.connections().get_connection(&line, 0).unwrap();
    let tail = diagram.connections().get_connection(&line, 1).unwrap();
    assert_eq!(head.connected(), "b4e0c2a2-0f8d-4c5e-8a51-3f1f6c2d9a10");
    assert_eq!(tail.connected(), "b4e0c2a2-0f8d-4c5e-8a51-3f1f6c2d9a11");
    // East side of the car, west side of the wheel.
    assert_eq!(head.port(), 1);
    assert_eq!(tail.port(), 3);
    assert!(!std::ptr::eq(head, tail));
}

#[test]
fn test_two_lines_get_distinct_connections_after_reload() {
    let mut factory = ElementFactory::new();
    let diagram = factory.create(&core::DIAGRAM);
    let mut view = factory.diagram_mut(&diagram).unwrap();
    let first_target = view.create(&core::COMMENT_ITEM, None).unwrap();
    let second_target = view.create(&core::COMMENT_ITEM, None).unwrap();
    let first_line = view.create(&core::COMMENT_LINE_ITEM, None).unwrap();
    let second_line = view.create(&core::COMMENT_LINE_ITEM, None).unwrap();
    view.connect(&first_line, 0, &first_target).unwrap();
    view.connect(&second_line, 0, &second_target).unwrap();

    let loaded = load_fresh(&save_to_string(&factory));
    let connections = loaded.diagram(&diagram).unwrap().connections();

    let first = connections.get_connection(&first_line, 0).unwrap();
    let second = connections.get_connection(&second_line, 0).unwrap();
    assert_eq!(first.connected(), &first_target);
    assert_eq!(second.connected(), &second_target);
    assert!(!std::ptr::eq(first, second));
    assert_eq!(connections.len(), 2);
}

#[test]
fn test_connections_to_later_records_are_restored() {
    let source = r#"<gaphor gaphor-version="2.19.0">
  <CommentLineItem id="line">
    <diagram><ref refid="d1"/></diagram>
    <points><val>[(100.0, 20.0), (200.0, 20.0)]</val></points>
    <head-connection><ref refid="left"/></head-connection>
    <tail-connection><ref refid="right"/></tail-connection>
  </CommentLineItem>
  <CommentItem id="left">
    <diagram><ref refid="d1"/></diagram>
  </CommentItem>
  <CommentItem id="right">
    <diagram><ref refid="d1"/></diagram>
    <matrix><val>(1.0, 0.0, 0.0, 1.0, 200.0, 0.0)</val></matrix>
  </CommentItem>
  <Diagram id="d1"/>
</gaphor>"#;
    let mut factory = ElementFactory::new();
    let report = load(source, &mut factory, &default_language()).expect("Failed to load");

    assert!(report.is_clean(), "{:?}", report.diagnostics());
    assert_eq!(report.items(), 3);
    assert_eq!(report.connections(), 2);

    let diagram = factory.diagram(&Id::new("d1")).unwrap();
    let line = Id::new("line");
    let head = diagram.connections().get_connection(&line, 0).unwrap();
    let tail = diagram.connections().get_connection(&line, 1).unwrap();
    assert_eq!(head.connected(), "left");
    assert_eq!(tail.connected(), "right");
    assert_eq!(head.port(), 1);
    assert_eq!(tail.port(), 3);
}

#[test]
fn test_item_listed_by_another_diagram_survives_a_save() {
    let source = r#"<gaphor gaphor-version="2.19.0">
  <Diagram id="d1"/>
  <Diagram id="d2">
    <ownedPresentation><reflist><ref refid="i1"/></reflist></ownedPresentation>
  </Diagram>
  <CommentItem id="i1">
    <diagram><ref refid="d1"/></diagram>
  </CommentItem>
</gaphor>"#;
    let mut factory = ElementFactory::new();
    let report = load(source, &mut factory, &default_language()).expect("Failed to load");
    assert_eq!(report.report().with_code(ErrorCode::W307).count(), 1);

    let saved = save_to_string(&factory);
    assert_eq!(saved.matches("<CommentItem id=\"i1\">").count(), 1);

    let reloaded = load_fresh(&saved);
    let owner = reloaded.get(&Id::new("i1")).unwrap().single("diagram").cloned();
    assert_eq!(owner, Some(Id::new("d1")));
}

#[test]
fn test_reference_to_excluded_element_is_dropped() {
    let mut factory = ElementFactory::new();
    let package = factory.create(&uml::PACKAGE);
    let class = factory.create(&uml::CLASS);
    factory.set_value(&class, "name", "Kept").unwrap();
    factory.link(&class, "package", &package).unwrap();

    let mut buffer = Vec::new();
    let report = save_filtered(&mut buffer, &factory, |element| element.id() != &package)
        .expect("Failed to save");
    let xml = String::from_utf8(buffer).unwrap();

    assert!(xml.contains(&format!("<Class id=\"{class}\">")));
    assert!(xml.contains("<val>Kept</val>"));
    assert!(!xml.contains(package.as_str()));
    assert_eq!(report.with_code(ErrorCode::W300).count(), 1);

    let loaded = load_fresh(&xml);
    assert_eq!(loaded.get(&class).unwrap().single("package"), None);
}

#[test]
fn test_back_reference_to_excluded_element_is_dropped() {
    let mut factory = ElementFactory::new();
    let package = factory.create(&uml::PACKAGE);
    factory.set_value(&package, "name", "Target").unwrap();
    let class = factory.create(&uml::CLASS);
    factory.link(&class, "package", &package).unwrap();

    let mut buffer = Vec::new();
    let report = save_filtered(&mut buffer, &factory, |element| element.id() != &class)
        .expect("Failed to save");
    let xml = String::from_utf8(buffer).unwrap();

    assert!(xml.contains(&format!("<Package id=\"{package}\">")));
    assert!(xml.contains("<val>Target</val>"));
    assert!(!xml.contains(class.as_str()));
    let warnings: Vec<_> = report.with_code(ErrorCode::W300).collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].element(), Some(&package));
}

#[test]
fn test_unknown_reference_in_file_keeps_element() {
    let source = SIMPLE_ITEMS.replace(
        r#"<ref refid="b4e0c2a2-0f8d-4c5e-8a51-3f1f6c2d9a08"/>
      </reflist>
    </comment>"#,
        r#"<ref refid="no-such-comment"/>
      </reflist>
    </comment>"#,
    );
    let mut factory = ElementFactory::new();
    let report = load(&source, &mut factory, &default_language()).expect("Failed to load");

    let warnings: Vec<_> = report.report().with_code(ErrorCode::W300).collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].element().map(Id::as_str), Some("b4e0c2a2-0f8d-4c5e-8a51-3f1f6c2d9a03"));

    // The comment still annotates the class; the opposite end is restored.
    let car = factory.get(&Id::new("b4e0c2a2-0f8d-4c5e-8a51-3f1f6c2d9a03")).unwrap();
    assert_eq!(car.name(), Some("Car & <Co>"));
    assert_eq!(car.targets("comment"), &[Id::new("b4e0c2a2-0f8d-4c5e-8a51-3f1f6c2d9a08")]);
}

#[test]
fn test_old_version_is_rejected() {
    let mut factory = ElementFactory::new();
    let err = load(OLD_VERSION, &mut factory, &default_language()).unwrap_err();

    match err {
        StorageError::UnsupportedVersion { found, minimum } => {
            assert_eq!(found, "0.15.0");
            assert_eq!(minimum.to_string(), "0.17.0");
        }
        other => panic!("Expected UnsupportedVersion, got {other:?}"),
    }
    assert!(factory.is_empty());
}

#[test]
fn test_missing_subject_loads_without_subject() {
    let source = r#"<gaphor gaphor-version="2.19.0">
  <Diagram id="d1"/>
  <CommentItem id="i1">
    <subject><ref refid="deleted-comment"/></subject>
    <diagram><ref refid="d1"/></diagram>
  </CommentItem>
</gaphor>"#;
    let mut factory = ElementFactory::new();
    let report = load(source, &mut factory, &default_language()).expect("Failed to load");

    let item = factory.get(&Id::new("i1")).unwrap();
    assert_eq!(item.single("subject"), None);
    assert_eq!(item.single("diagram"), Some(&Id::new("d1")));
    assert_eq!(report.report().with_code(ErrorCode::W300).count(), 1);
}
