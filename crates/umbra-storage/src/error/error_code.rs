//! Error codes for the Umbra storage diagnostics.
//!
//! Codes are organized by phase:
//! - `E0xx` - Document structure errors
//! - `E1xx` - Version errors
//! - `E2xx` - Element type errors
//! - `W3xx` - Reference and attribute warnings (recoverable)

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Structure Errors (E0xx)
    // =========================================================================
    /// Malformed document.
    ///
    /// The source is not well-formed XML.
    E001,

    /// Unexpected root element.
    ///
    /// The document root is not a `gaphor` element in the model namespace.
    E002,

    /// Missing element id.
    ///
    /// An element record has no `id` attribute.
    E003,

    /// Duplicate element id.
    ///
    /// Two records share an id, or a record reuses an id already present in
    /// the target factory.
    E004,

    /// Unreadable source or sink.
    ///
    /// Reading or writing the model failed at the I/O level.
    E005,

    // =========================================================================
    // Version Errors (E1xx)
    // =========================================================================
    /// Unsupported model version.
    ///
    /// The file was written by a version older than the minimum supported
    /// one. Older files are rejected, not migrated.
    E100,

    // =========================================================================
    // Type Errors (E2xx)
    // =========================================================================
    /// Unknown element type.
    ///
    /// A record type is not known to the modeling language.
    E200,

    // =========================================================================
    // Reference and Attribute Warnings (W3xx)
    // =========================================================================
    /// Unknown reference.
    ///
    /// A reference points at an id that is not part of the model (or of the
    /// exported subset when saving). The reference is dropped.
    W300,

    /// Reference of the wrong type.
    ///
    /// A reference points at an element the attribute cannot hold.
    W301,

    /// Orphan presentation item.
    ///
    /// A presentation item does not reference an existing diagram.
    W302,

    /// Unknown attribute.
    ///
    /// An attribute is not declared by the element's class.
    W303,

    /// Invalid attribute value.
    ///
    /// A scalar value could not be parsed for its declared type.
    W304,

    /// Attribute shape mismatch.
    ///
    /// A value was found where a reference was expected, a list where a
    /// single reference was expected, or the other way around.
    W305,

    /// Connection not restored.
    ///
    /// A persisted handle connection could not be re-established.
    W306,

    /// Presentation item listed by another diagram.
    ///
    /// A diagram's `ownedPresentation` names an item whose `diagram` is a
    /// different diagram. The entry is dropped.
    W307,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Structure errors
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E005 => "E005",
            // Version errors
            ErrorCode::E100 => "E100",
            // Type errors
            ErrorCode::E200 => "E200",
            // Reference and attribute warnings
            ErrorCode::W300 => "W300",
            ErrorCode::W301 => "W301",
            ErrorCode::W302 => "W302",
            ErrorCode::W303 => "W303",
            ErrorCode::W304 => "W304",
            ErrorCode::W305 => "W305",
            ErrorCode::W306 => "W306",
            ErrorCode::W307 => "W307",
        }
    }

    /// Returns a short description of what this code means.
    pub fn description(&self) -> &'static str {
        match self {
            // Structure errors
            ErrorCode::E001 => "malformed document",
            ErrorCode::E002 => "unexpected root element",
            ErrorCode::E003 => "missing element id",
            ErrorCode::E004 => "duplicate element id",
            ErrorCode::E005 => "unreadable source",
            // Version errors
            ErrorCode::E100 => "unsupported model version",
            // Type errors
            ErrorCode::E200 => "unknown element type",
            // Reference and attribute warnings
            ErrorCode::W300 => "unknown reference",
            ErrorCode::W301 => "reference of the wrong type",
            ErrorCode::W302 => "orphan presentation item",
            ErrorCode::W303 => "unknown attribute",
            ErrorCode::W304 => "invalid attribute value",
            ErrorCode::W305 => "attribute shape mismatch",
            ErrorCode::W306 => "connection not restored",
            ErrorCode::W307 => "item owned by another diagram",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E100.to_string(), "E100");
        assert_eq!(ErrorCode::W300.to_string(), "W300");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E100.description(), "unsupported model version");
        assert_eq!(ErrorCode::W300.description(), "unknown reference");
    }
}
