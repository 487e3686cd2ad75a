//! Scalar attribute values.

use std::fmt;

use crate::geometry::{Matrix, Point};

/// Type of a scalar attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Text,
    Integer,
    Real,
    Boolean,
    /// An item transform.
    Matrix,
    /// A list of item-local points.
    Points,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Boolean => "boolean",
            Self::Matrix => "matrix",
            Self::Points => "points",
        };
        f.write_str(name)
    }
}

/// A scalar attribute value held by an element.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Matrix(Matrix),
    Points(Vec<Point>),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Text(_) => ValueType::Text,
            Self::Integer(_) => ValueType::Integer,
            Self::Real(_) => ValueType::Real,
            Self::Boolean(_) => ValueType::Boolean,
            Self::Matrix(_) => ValueType::Matrix,
            Self::Points(_) => ValueType::Points,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value as a float; integers are widened.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(value) => Some(*value),
            Self::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<Matrix> {
        match self {
            Self::Matrix(matrix) => Some(*matrix),
            _ => None,
        }
    }

    pub fn as_points(&self) -> Option<&[Point]> {
        match self {
            Self::Points(points) => Some(points),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Matrix> for Value {
    fn from(value: Matrix) -> Self {
        Self::Matrix(value)
    }
}

impl From<Vec<Point>> for Value {
    fn from(value: Vec<Point>) -> Self {
        Self::Points(value)
    }
}
