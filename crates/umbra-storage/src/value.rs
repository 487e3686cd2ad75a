//! Text form of scalar attribute values.
//!
//! | type      | example                                  |
//! |-----------|------------------------------------------|
//! | text      | written as is                            |
//! | integer   | `42`                                     |
//! | real      | `12.5`                                   |
//! | boolean   | `1` or `0`                               |
//! | matrix    | `(1.0, 0.0, 0.0, 1.0, 10.0, 10.0)`       |
//! | points    | `[(0.0, 0.0), (10.0, 10.0)]`             |
//!
//! Reals use the shortest representation that parses back to the same
//! number, so saving a loaded model reproduces its values exactly.

use thiserror::Error;
use umbra_core::{
    geometry::{Matrix, Point},
    modeling::{Value, ValueType},
};

/// A value that does not parse as its declared type.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("`{text}` is not a valid {expected} value")]
pub struct ParseValueError {
    expected: ValueType,
    text: String,
}

impl ParseValueError {
    fn new(expected: ValueType, text: &str) -> Self {
        Self {
            expected,
            text: text.to_string(),
        }
    }

    pub fn expected(&self) -> ValueType {
        self.expected
    }
}

/// Formats a value for the `<val>` element.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Text(text) => text.clone(),
        Value::Integer(number) => number.to_string(),
        Value::Real(number) => format_real(*number),
        Value::Boolean(flag) => if *flag { "1" } else { "0" }.to_string(),
        Value::Matrix(matrix) => {
            let coefficients: Vec<String> =
                matrix.to_array().into_iter().map(format_real).collect();
            format!("({})", coefficients.join(", "))
        }
        Value::Points(points) => {
            let points: Vec<String> = points
                .iter()
                .map(|p| format!("({}, {})", format_real(p.x()), format_real(p.y())))
                .collect();
            format!("[{}]", points.join(", "))
        }
    }
}

/// Parses the text of a `<val>` element as `expected`.
///
/// Booleans also accept `true`/`false`; integers are accepted where a real
/// is expected.
pub fn parse_value(expected: ValueType, text: &str) -> Result<Value, ParseValueError> {
    let invalid = || ParseValueError::new(expected, text);
    match expected {
        ValueType::Text => Ok(Value::Text(text.to_string())),
        ValueType::Integer => text
            .trim()
            .parse()
            .map(Value::Integer)
            .map_err(|_| invalid()),
        ValueType::Real => text.trim().parse().map(Value::Real).map_err(|_| invalid()),
        ValueType::Boolean => match text.trim().to_ascii_lowercase().as_str() {
            "1" | "true" => Ok(Value::Boolean(true)),
            "0" | "false" => Ok(Value::Boolean(false)),
            _ => Err(invalid()),
        },
        ValueType::Matrix => {
            let numbers = parse_numbers(text).ok_or_else(invalid)?;
            let coefficients: [f64; 6] = numbers.try_into().map_err(|_| invalid())?;
            Ok(Value::Matrix(Matrix::from_array(coefficients)))
        }
        ValueType::Points => {
            let numbers = parse_numbers(text).ok_or_else(invalid)?;
            if numbers.len() % 2 != 0 {
                return Err(invalid());
            }
            Ok(Value::Points(
                numbers
                    .chunks_exact(2)
                    .map(|pair| Point::new(pair[0], pair[1]))
                    .collect(),
            ))
        }
    }
}

fn format_real(number: f64) -> String {
    format!("{number:?}")
}

/// Reads every number of a bracketed, comma separated list.
fn parse_numbers(text: &str) -> Option<Vec<f64>> {
    let flat: String = text
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '[' | ']'))
        .collect();
    if flat.trim().is_empty() {
        return Some(Vec::new());
    }
    flat.split(',').map(|part| part.trim().parse().ok()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_matrix() {
        let mut matrix = Matrix::identity();
        matrix.translate(10.0, 10.0);
        assert_eq!(
            format_value(&Value::Matrix(matrix)),
            "(1.0, 0.0, 0.0, 1.0, 10.0, 10.0)"
        );
    }

    #[test]
    fn test_format_points() {
        let points = vec![Point::new(0.0, 0.0), Point::new(10.5, -3.0)];
        assert_eq!(
            format_value(&Value::Points(points)),
            "[(0.0, 0.0), (10.5, -3.0)]"
        );
        assert_eq!(format_value(&Value::Points(Vec::new())), "[]");
    }

    #[test]
    fn test_format_scalars() {
        assert_eq!(format_value(&Value::Boolean(true)), "1");
        assert_eq!(format_value(&Value::Integer(-4)), "-4");
        assert_eq!(format_value(&Value::Real(100.0)), "100.0");
        assert_eq!(format_value(&Value::Text(" a <b> ".into())), " a <b> ");
    }

    #[test]
    fn test_parse_matrix() {
        let value = parse_value(ValueType::Matrix, "(1.0, 0.0, 0.0, 1.0, 261.0, 137)").unwrap();
        assert_eq!(
            value.as_matrix().unwrap().to_array(),
            [1.0, 0.0, 0.0, 1.0, 261.0, 137.0]
        );
    }

    #[test]
    fn test_parse_matrix_needs_six_numbers() {
        let err = parse_value(ValueType::Matrix, "(1.0, 0.0)").unwrap_err();
        assert_eq!(err.expected(), ValueType::Matrix);
        assert_eq!(err.to_string(), "`(1.0, 0.0)` is not a valid matrix value");
    }

    #[test]
    fn test_parse_points() {
        let value = parse_value(ValueType::Points, "[(0.0, 0.0), (50.0, 20.0)]").unwrap();
        assert_eq!(
            value.as_points().unwrap(),
            &[Point::new(0.0, 0.0), Point::new(50.0, 20.0)]
        );
        assert!(parse_value(ValueType::Points, "[(1.0, 2.0, 3.0)]").is_err());
        assert!(parse_value(ValueType::Points, "[(a, b)]").is_err());
    }

    #[test]
    fn test_parse_boolean() {
        assert_eq!(
            parse_value(ValueType::Boolean, "1").unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            parse_value(ValueType::Boolean, "False").unwrap(),
            Value::Boolean(false)
        );
        assert!(parse_value(ValueType::Boolean, "maybe").is_err());
    }

    #[test]
    fn test_text_is_kept_verbatim() {
        let text = "  spaced\tname \n";
        assert_eq!(
            parse_value(ValueType::Text, text).unwrap(),
            Value::Text(text.to_string())
        );
    }

    #[test]
    fn test_reals_roundtrip_exactly() {
        for number in [0.1, 1.0 / 3.0, 1e-7, 123456789.125, -0.0] {
            let text = format_value(&Value::Real(number));
            assert_eq!(parse_value(ValueType::Real, &text).unwrap(), Value::Real(number));
        }
    }
}
