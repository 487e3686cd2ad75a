//! Core classes shared by every modeling language.
//!
//! These are the infrastructural types a model file always relies on:
//! the element root, diagrams, presentation items, comments and the
//! style sheet.

use super::{
    AttributeDef, ElementClass, ElementKind, HandleEnd, ItemShape, ModelingLanguage, ValueType,
    lookup_in,
};

const ITEM: ElementKind = ElementKind::Presentation(ItemShape::Element);
const LINE: ElementKind = ElementKind::Presentation(ItemShape::Line);

/// Root of every model element.
pub static ELEMENT: ElementClass = ElementClass::new_abstract(
    "Element",
    None,
    ElementKind::Model,
    &[
        AttributeDef::composite("presentation", &PRESENTATION, Some("subject")),
        AttributeDef::many("comment", &COMMENT, Some("annotatedElement")),
    ],
);

/// Root of every presentation item.
pub static PRESENTATION: ElementClass = ElementClass::new_abstract(
    "Presentation",
    Some(&ELEMENT),
    ITEM,
    &[
        AttributeDef::one("subject", &ELEMENT, Some("presentation")),
        AttributeDef::one("diagram", &DIAGRAM, Some("ownedPresentation")),
        AttributeDef::one("parent", &PRESENTATION, Some("children")),
        AttributeDef::many("children", &PRESENTATION, Some("parent")),
        AttributeDef::value("matrix", ValueType::Matrix),
    ],
);

/// Box-shaped presentation items.
pub static ELEMENT_PRESENTATION: ElementClass = ElementClass::new_abstract(
    "ElementPresentation",
    Some(&PRESENTATION),
    ITEM,
    &[
        AttributeDef::value("width", ValueType::Real),
        AttributeDef::value("height", ValueType::Real),
    ],
);

/// Line-shaped presentation items.
pub static LINE_PRESENTATION: ElementClass = ElementClass::new_abstract(
    "LinePresentation",
    Some(&PRESENTATION),
    LINE,
    &[
        AttributeDef::value("points", ValueType::Points),
        AttributeDef::value("orthogonal", ValueType::Boolean),
        AttributeDef::value("horizontal", ValueType::Boolean),
        AttributeDef::connection("head-connection", HandleEnd::Head),
        AttributeDef::connection("tail-connection", HandleEnd::Tail),
    ],
);

pub static DIAGRAM: ElementClass = ElementClass::new(
    "Diagram",
    Some(&ELEMENT),
    ElementKind::Diagram,
    &[
        AttributeDef::value("name", ValueType::Text),
        AttributeDef::value("diagramType", ValueType::Text),
        AttributeDef::one("element", &ELEMENT, Some("ownedDiagram")),
        AttributeDef::composite("ownedPresentation", &PRESENTATION, Some("diagram")),
    ],
);

pub static COMMENT: ElementClass = ElementClass::new(
    "Comment",
    Some(&ELEMENT),
    ElementKind::Model,
    &[
        AttributeDef::value("body", ValueType::Text),
        AttributeDef::many("annotatedElement", &ELEMENT, Some("comment")),
    ],
);

/// Holds the user style sheet; every loaded model has exactly one.
pub static STYLE_SHEET: ElementClass = ElementClass::new(
    "StyleSheet",
    Some(&ELEMENT),
    ElementKind::Model,
    &[
        AttributeDef::value("styleSheet", ValueType::Text),
        AttributeDef::value("naturalLanguage", ValueType::Text),
    ],
);

pub static COMMENT_ITEM: ElementClass =
    ElementClass::new("CommentItem", Some(&ELEMENT_PRESENTATION), ITEM, &[]);

pub static COMMENT_LINE_ITEM: ElementClass =
    ElementClass::new("CommentLineItem", Some(&LINE_PRESENTATION), LINE, &[]);

static CLASSES: &[&ElementClass] = &[
    &ELEMENT,
    &PRESENTATION,
    &ELEMENT_PRESENTATION,
    &LINE_PRESENTATION,
    &DIAGRAM,
    &COMMENT,
    &STYLE_SHEET,
    &COMMENT_ITEM,
    &COMMENT_LINE_ITEM,
];

/// The core modeling language.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoreLanguage;

impl ModelingLanguage for CoreLanguage {
    fn name(&self) -> &str {
        "Core"
    }

    fn lookup_element(&self, type_name: &str) -> Option<&'static ElementClass> {
        lookup_in(CLASSES, type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_concrete_classes() {
        assert_eq!(CoreLanguage.lookup_element("Diagram"), Some(&DIAGRAM));
        assert_eq!(CoreLanguage.lookup_element("CommentItem"), Some(&COMMENT_ITEM));
        assert_eq!(CoreLanguage.lookup_element("StyleSheet"), Some(&STYLE_SHEET));
    }

    #[test]
    fn test_abstract_classes_are_hidden() {
        assert!(CoreLanguage.lookup_element("Element").is_none());
        assert!(CoreLanguage.lookup_element("Presentation").is_none());
        assert!(CoreLanguage.lookup_element("Class").is_none());
    }

    #[test]
    fn test_line_connection_attributes() {
        assert!(COMMENT_LINE_ITEM.attribute("head-connection").is_some());
        assert!(COMMENT_LINE_ITEM.attribute("tail-connection").is_some());
        assert!(COMMENT_ITEM.attribute("head-connection").is_none());
    }
}
