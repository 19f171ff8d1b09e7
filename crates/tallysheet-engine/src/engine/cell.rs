//! Cell contents and evaluated values.
//!
//! Cells hold untyped text. What that text means is decided when it is read:
//! - [`CellContent`] - classification of raw text (empty, literal, or formula)
//! - [`Value`] - the result of resolving a cell or evaluating a formula

use serde::{Deserialize, Serialize};

/// Raw cell text, classified at read time.
#[derive(Clone, Debug, PartialEq)]
pub enum CellContent<'a> {
    Empty,
    /// Anything that is not a formula: numbers and text alike.
    Literal(&'a str),
    /// Formula body, without the leading '='.
    Formula(&'a str),
}

impl<'a> CellContent<'a> {
    /// Classify raw cell text.
    /// - Empty string -> Empty
    /// - Starts with '=' -> Formula (without the '=')
    /// - Otherwise -> Literal, untouched
    pub fn classify(raw: &'a str) -> CellContent<'a> {
        if raw.is_empty() {
            CellContent::Empty
        } else if let Some(body) = raw.strip_prefix('=') {
            CellContent::Formula(body)
        } else {
            CellContent::Literal(raw)
        }
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, CellContent::Formula(_))
    }
}

/// The value of a cell or formula.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Result of formula arithmetic.
    Scalar(f64),
    /// Pass-through text (non-formula cells, or a formula that produced nothing).
    Text(String),
}

impl Value {
    pub fn empty() -> Value {
        Value::Text(String::new())
    }

    /// Numeric coercion shared by ranges and arithmetic.
    /// Text must parse as a float after trimming; anything else is `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Scalar(n) => Some(*n),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    /// Numeric coercion with the arithmetic fallback of zero.
    pub fn as_number_or_zero(&self) -> f64 {
        self.as_number().unwrap_or(0.0)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Scalar(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}
