//! Errors raised while manipulating a model.

use thiserror::Error;

use crate::{identifier::Id, modeling::ValueType};

/// Error type for element factory and diagram operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("unknown element `{0}`")]
    UnknownElement(Id),

    #[error("an element with id `{0}` already exists")]
    DuplicateId(Id),

    #[error("`{class}` has no attribute `{attribute}`")]
    UnknownAttribute {
        class: &'static str,
        attribute: String,
    },

    #[error("`{class}.{attribute}` is not a reference")]
    NotAReference {
        class: &'static str,
        attribute: &'static str,
    },

    #[error("`{class}.{attribute}` is not a scalar value")]
    NotAValue {
        class: &'static str,
        attribute: &'static str,
    },

    #[error("`{class}.{attribute}` expects a {expected} value, got {found}")]
    ValueTypeMismatch {
        class: &'static str,
        attribute: &'static str,
        expected: ValueType,
        found: ValueType,
    },

    #[error("`{class}.{attribute}` cannot refer to a `{target}`")]
    TargetTypeMismatch {
        class: &'static str,
        attribute: &'static str,
        target: &'static str,
    },

    #[error("element `{0}` is not a diagram")]
    NotADiagram(Id),

    #[error("`{0}` is not a presentation item class")]
    NotAPresentation(&'static str),

    #[error("item `{item}` is not on diagram `{diagram}`")]
    ForeignItem { item: Id, diagram: Id },

    #[error("item `{item}` has no handle {handle}")]
    UnknownHandle { item: Id, handle: usize },

    #[error("handle {handle} of item `{item}` cannot be moved")]
    HandleNotMovable { item: Id, handle: usize },

    #[error("handle {handle} of item `{item}` cannot be connected")]
    HandleNotConnectable { item: Id, handle: usize },

    #[error("item `{0}` has no port to connect to")]
    NoPort(Id),
}
