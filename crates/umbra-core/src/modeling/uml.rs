//! UML classes and their presentation items.

use super::{
    AttributeDef, ElementClass, ElementKind, ItemShape, ModelingLanguage, ValueType,
    core::{DIAGRAM, ELEMENT, ELEMENT_PRESENTATION, LINE_PRESENTATION},
    lookup_in,
};

const ITEM: ElementKind = ElementKind::Presentation(ItemShape::Element);
const LINE: ElementKind = ElementKind::Presentation(ItemShape::Line);

pub static NAMED_ELEMENT: ElementClass = ElementClass::new_abstract(
    "NamedElement",
    Some(&ELEMENT),
    ElementKind::Model,
    &[AttributeDef::value("name", ValueType::Text)],
);

pub static TYPE: ElementClass = ElementClass::new_abstract(
    "Type",
    Some(&NAMED_ELEMENT),
    ElementKind::Model,
    &[AttributeDef::one("package", &PACKAGE, Some("ownedType"))],
);

pub static PACKAGE: ElementClass = ElementClass::new(
    "Package",
    Some(&NAMED_ELEMENT),
    ElementKind::Model,
    &[
        AttributeDef::one("nestingPackage", &PACKAGE, Some("nestedPackage")),
        AttributeDef::composite("nestedPackage", &PACKAGE, Some("nestingPackage")),
        AttributeDef::composite("ownedType", &TYPE, Some("package")),
        AttributeDef::composite("ownedDiagram", &DIAGRAM, Some("element")),
    ],
);

pub static CLASS: ElementClass = ElementClass::new(
    "Class",
    Some(&TYPE),
    ElementKind::Model,
    &[
        AttributeDef::value("isAbstract", ValueType::Boolean),
        AttributeDef::composite("ownedAttribute", &PROPERTY, Some("class_")),
    ],
);

pub static INTERFACE: ElementClass = ElementClass::new(
    "Interface",
    Some(&TYPE),
    ElementKind::Model,
    &[AttributeDef::composite(
        "ownedAttribute",
        &PROPERTY,
        Some("interface_"),
    )],
);

pub static PROPERTY: ElementClass = ElementClass::new(
    "Property",
    Some(&NAMED_ELEMENT),
    ElementKind::Model,
    &[
        AttributeDef::value("aggregation", ValueType::Text),
        AttributeDef::one("class_", &CLASS, Some("ownedAttribute")),
        AttributeDef::one("interface_", &INTERFACE, Some("ownedAttribute")),
        AttributeDef::one("association", &ASSOCIATION, Some("memberEnd")),
        AttributeDef::one("owningAssociation", &ASSOCIATION, Some("ownedEnd")),
        AttributeDef::one("type", &TYPE, None),
    ],
);

pub static ASSOCIATION: ElementClass = ElementClass::new(
    "Association",
    Some(&TYPE),
    ElementKind::Model,
    &[
        AttributeDef::many("memberEnd", &PROPERTY, Some("association")),
        AttributeDef::composite("ownedEnd", &PROPERTY, Some("owningAssociation")),
    ],
);

pub static CONTROL_FLOW: ElementClass = ElementClass::new(
    "ControlFlow",
    Some(&NAMED_ELEMENT),
    ElementKind::Model,
    &[AttributeDef::value("guard", ValueType::Text)],
);

pub static OBJECT_NODE: ElementClass = ElementClass::new(
    "ObjectNode",
    Some(&NAMED_ELEMENT),
    ElementKind::Model,
    &[
        AttributeDef::value("ordering", ValueType::Text),
        AttributeDef::value("upperBound", ValueType::Text),
    ],
);

pub static CLASS_ITEM: ElementClass = ElementClass::new(
    "ClassItem",
    Some(&ELEMENT_PRESENTATION),
    ITEM,
    &[
        AttributeDef::value("show_attributes", ValueType::Boolean),
        AttributeDef::value("show_operations", ValueType::Boolean),
    ],
);

pub static INTERFACE_ITEM: ElementClass =
    ElementClass::new("InterfaceItem", Some(&ELEMENT_PRESENTATION), ITEM, &[]);

pub static PACKAGE_ITEM: ElementClass =
    ElementClass::new("PackageItem", Some(&ELEMENT_PRESENTATION), ITEM, &[]);

pub static OBJECT_NODE_ITEM: ElementClass = ElementClass::new(
    "ObjectNodeItem",
    Some(&ELEMENT_PRESENTATION),
    ITEM,
    &[AttributeDef::value("show_ordering", ValueType::Boolean)],
);

pub static ASSOCIATION_ITEM: ElementClass = ElementClass::new(
    "AssociationItem",
    Some(&LINE_PRESENTATION),
    LINE,
    &[AttributeDef::value("show_direction", ValueType::Boolean)],
);

pub static CONTROL_FLOW_ITEM: ElementClass =
    ElementClass::new("ControlFlowItem", Some(&LINE_PRESENTATION), LINE, &[]);

static CLASSES: &[&ElementClass] = &[
    &NAMED_ELEMENT,
    &TYPE,
    &PACKAGE,
    &CLASS,
    &INTERFACE,
    &PROPERTY,
    &ASSOCIATION,
    &CONTROL_FLOW,
    &OBJECT_NODE,
    &CLASS_ITEM,
    &INTERFACE_ITEM,
    &PACKAGE_ITEM,
    &OBJECT_NODE_ITEM,
    &ASSOCIATION_ITEM,
    &CONTROL_FLOW_ITEM,
];

/// The UML modeling language.
#[derive(Debug, Clone, Copy, Default)]
pub struct UmlLanguage;

impl ModelingLanguage for UmlLanguage {
    fn name(&self) -> &str {
        "UML"
    }

    fn lookup_element(&self, type_name: &str) -> Option<&'static ElementClass> {
        lookup_in(CLASSES, type_name)
    }
}
