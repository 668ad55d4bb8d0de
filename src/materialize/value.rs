//! Inference of typed values from raw cell text

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::schema::FieldType;

/// A raw cell value after type inference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InferredValue {
    /// Exact `true` / `false`
    Bool(bool),
    /// Finite number; integers stay integral
    Number(Number),
    /// Anything else, untouched
    String(String),
}

impl InferredValue {
    /// Infer booleans and numbers from `raw`
    ///
    /// Returns `None` for empty and whitespace-only cells, which are never
    /// written to documents.
    pub fn infer(raw: &str) -> Option<Self> {
        Self::infer_with(raw, true, true)
    }

    /// Infer with individual rules switched on or off
    pub fn infer_with(raw: &str, booleans: bool, numbers: bool) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        if booleans {
            match trimmed {
                "true" => return Some(InferredValue::Bool(true)),
                "false" => return Some(InferredValue::Bool(false)),
                _ => {}
            }
        }

        if numbers && let Some(number) = parse_number(trimmed) {
            return Some(InferredValue::Number(number));
        }

        Some(InferredValue::String(raw.to_string()))
    }

    /// Infer honouring a declared field type
    ///
    /// `string` fields keep the raw text verbatim, and other declared types
    /// only try their own rule. `booleans` and `numbers` still gate each
    /// rule. Cells that do not parse as their declared type are kept as
    /// text.
    pub fn infer_for(
        raw: &str,
        field_type: Option<FieldType>,
        booleans: bool,
        numbers: bool,
    ) -> Option<Self> {
        let (booleans, numbers) = match field_type {
            Some(FieldType::String) => (false, false),
            Some(FieldType::Boolean) => (booleans, false),
            Some(FieldType::Number) | Some(FieldType::Integer) => (false, numbers),
            None => (booleans, numbers),
        };
        Self::infer_with(raw, booleans, numbers)
    }

    /// JSON type name of the inferred value
    pub fn type_name(&self) -> &'static str {
        match self {
            InferredValue::Bool(_) => "boolean",
            InferredValue::Number(n) if n.is_f64() => "number",
            InferredValue::Number(_) => "integer",
            InferredValue::String(_) => "string",
        }
    }

    pub fn into_json(self) -> Value {
        match self {
            InferredValue::Bool(b) => Value::Bool(b),
            InferredValue::Number(n) => Value::Number(n),
            InferredValue::String(s) => Value::String(s),
        }
    }
}

impl From<InferredValue> for Value {
    fn from(value: InferredValue) -> Self {
        value.into_json()
    }
}

fn parse_number(text: &str) -> Option<Number> {
    if let Ok(i) = text.parse::<i64>() {
        return Some(Number::from(i));
    }
    // Reject spellings f64 accepts but a spreadsheet user would not mean
    if text.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    text.parse::<f64>().ok().and_then(Number::from_f64)
}
