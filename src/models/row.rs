use crate::error::{AppError, Result};
use serde_json::Value;
use std::fmt;

// 2^53, the largest magnitude below which every integer is an exact f64
const MAX_EXACT_F64: f64 = 9_007_199_254_740_992.0;

/// A single scalar cell value as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{}", i),
            // Integral floats keep a trailing ".0" so they stay distinguishable from integers
            CellValue::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 => {
                write!(f, "{:.1}", x)
            }
            CellValue::Float(x) => write!(f, "{}", x),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Boolean(true) => f.write_str("True"),
            CellValue::Boolean(false) => f.write_str("False"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl From<f64> for CellValue {
    fn from(x: f64) -> Self {
        CellValue::Float(x)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl TryFrom<&Value> for CellValue {
    type Error = AppError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(CellValue::Text(s.clone())),
            Value::Bool(b) => Ok(CellValue::Boolean(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    return Ok(CellValue::Integer(i));
                }
                // Integers past i64, or written without a fraction but too large
                // for an exact f64, would change their digits when stringified
                match n.as_f64() {
                    Some(x) if !n.is_u64() && !(x.fract() == 0.0 && x.abs() > MAX_EXACT_F64) => {
                        Ok(CellValue::Float(x))
                    }
                    _ => Err(AppError::InvalidRow(format!(
                        "number {} cannot be sent exactly, pass it as a string instead",
                        n
                    ))),
                }
            }
            other => Err(AppError::InvalidRow(format!(
                "expected a scalar value, got {}",
                other
            ))),
        }
    }
}

/// One line of cells, in column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row(Vec<CellValue>);

impl Row {
    /// Build a row from free-text entries, one text cell per entry
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            entries
                .into_iter()
                .map(|s| CellValue::Text(s.into()))
                .collect(),
        )
    }

    /// Parse a JSON array of scalars. Anything other than an array is rejected.
    pub fn from_json(input: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(input)
            .map_err(|e| AppError::InvalidRow(format!("not valid JSON: {}", e)))?;

        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(AppError::InvalidRow(format!(
                    "expected a list of values, got {}",
                    other
                )));
            }
        };

        items
            .iter()
            .map(CellValue::try_from)
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }

    pub fn cells(&self) -> &[CellValue] {
        &self.0
    }

    /// String form of every cell, in order, as sent to the Sheets API
    pub fn to_wire(&self) -> Vec<Value> {
        self.0
            .iter()
            .map(|cell| Value::String(cell.to_string()))
            .collect()
    }
}
