//! Decoding of uploaded JSON training logs into plottable rows.
//!
//! Two shapes are accepted, mirroring what loosely structured training
//! scripts actually emit:
//! - an array of objects carrying `timestamp`, `iteration` and
//!   `gradient_norm` keys (extra keys are ignored), or
//! - an array of 3-element arrays in `[timestamp, iteration, gradient_norm]`
//!   order.
//!
//! Numeric fields coerce permissively (JSON numbers or numeric strings).
//! Anything else fails with `PlotError::MalformedInput` naming the offending
//! field; decoding is a pure function with no side effects.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{PlotError, PlotResult};

pub const FIELD_TIMESTAMP: &str = "timestamp";
pub const FIELD_ITERATION: &str = "iteration";
pub const FIELD_GRADIENT_NORM: &str = "gradient_norm";

/// Wall-clock marker attached to a row. Training logs disagree on whether
/// this is an ISO string or an epoch number, so both survive decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimestampValue {
    Text(String),
    Number(f64),
}

/// One decoded sample. Immutable once produced; lives for one render cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub timestamp: TimestampValue,
    pub iteration: f64,
    pub gradient_norm: f64,
}

/// Decode one uploaded file into rows, in file order.
///
/// `name` is only used to contextualize error messages.
pub fn decode(name: &str, bytes: &[u8]) -> PlotResult<Vec<Row>> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|err| PlotError::MalformedInput(format!("{name}: not valid JSON ({err})")))?;

    let records = value.as_array().ok_or_else(|| {
        PlotError::MalformedInput(format!("{name}: expected a JSON array of records"))
    })?;

    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        rows.push(decode_record(record)?);
    }
    Ok(rows)
}

fn decode_record(record: &Value) -> PlotResult<Row> {
    match record {
        Value::Object(fields) => {
            let timestamp = fields
                .get(FIELD_TIMESTAMP)
                .ok_or_else(|| PlotError::missing_field(FIELD_TIMESTAMP))?;
            let iteration = fields
                .get(FIELD_ITERATION)
                .ok_or_else(|| PlotError::missing_field(FIELD_ITERATION))?;
            let gradient_norm = fields
                .get(FIELD_GRADIENT_NORM)
                .ok_or_else(|| PlotError::missing_field(FIELD_GRADIENT_NORM))?;
            build_row(timestamp, iteration, gradient_norm)
        }
        // Tuple form: position is the contract.
        Value::Array(items) if items.len() == 3 => build_row(&items[0], &items[1], &items[2]),
        Value::Array(items) => Err(PlotError::MalformedInput(format!(
            "tuple record has {} elements, expected 3",
            items.len()
        ))),
        other => Err(PlotError::MalformedInput(format!(
            "record is neither an object nor a tuple (found {})",
            json_kind(other)
        ))),
    }
}

fn build_row(timestamp: &Value, iteration: &Value, gradient_norm: &Value) -> PlotResult<Row> {
    Ok(Row {
        timestamp: decode_timestamp(timestamp)?,
        iteration: coerce_number(iteration, FIELD_ITERATION)?,
        gradient_norm: coerce_number(gradient_norm, FIELD_GRADIENT_NORM)?,
    })
}

fn decode_timestamp(value: &Value) -> PlotResult<TimestampValue> {
    match value {
        Value::String(text) => Ok(TimestampValue::Text(text.clone())),
        Value::Number(num) => num
            .as_f64()
            .map(TimestampValue::Number)
            .ok_or_else(|| non_numeric(FIELD_TIMESTAMP, value)),
        other => Err(PlotError::MalformedInput(format!(
            "`{FIELD_TIMESTAMP}` must be a string or number (found {})",
            json_kind(other)
        ))),
    }
}

/// Accept JSON numbers and numeric strings; everything else is malformed.
fn coerce_number(value: &Value, field: &str) -> PlotResult<f64> {
    match value {
        Value::Number(num) => num.as_f64().ok_or_else(|| non_numeric(field, value)),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| non_numeric(field, value)),
        _ => Err(non_numeric(field, value)),
    }
}

fn non_numeric(field: &str, value: &Value) -> PlotError {
    PlotError::MalformedInput(format!(
        "`{field}` is not numeric (found {})",
        json_kind(value)
    ))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_record_objects() {
        let bytes = br#"[
            {"timestamp": "2024-01-01T00:00:00Z", "iteration": 1, "gradient_norm": 0.5},
            {"timestamp": "2024-01-01T00:00:10Z", "iteration": 2, "gradient_norm": 0.3}
        ]"#;
        let rows = decode("a.json", bytes).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].iteration, 1.0);
        assert_eq!(rows[1].gradient_norm, 0.3);
    }

    #[test]
    fn decodes_tuple_records() {
        let bytes = br#"[["t0", 1, 0.9], [1700000000, "2", "0.7"]]"#;
        let rows = decode("b.json", bytes).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].timestamp, TimestampValue::Text("t0".into()));
        assert_eq!(rows[1].timestamp, TimestampValue::Number(1_700_000_000.0));
        // Numeric strings coerce.
        assert_eq!(rows[1].iteration, 2.0);
        assert_eq!(rows[1].gradient_norm, 0.7);
    }

    #[test]
    fn missing_gradient_norm_names_the_field() {
        let bytes = br#"[{"timestamp": "t0", "iteration": 1}]"#;
        let err = decode("a.json", bytes).unwrap_err();
        match err {
            PlotError::MalformedInput(message) => {
                assert!(message.contains("gradient_norm"), "message: {message}")
            }
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn rejects_non_array_payloads() {
        let err = decode("a.json", br#"{"timestamp": "t0"}"#).unwrap_err();
        assert!(matches!(err, PlotError::MalformedInput(_)));
    }

    #[test]
    fn rejects_invalid_json() {
        let err = decode("a.json", b"not json at all").unwrap_err();
        assert!(matches!(err, PlotError::MalformedInput(_)));
    }

    #[test]
    fn rejects_non_numeric_iteration() {
        let bytes = br#"[{"timestamp": "t0", "iteration": true, "gradient_norm": 0.5}]"#;
        let err = decode("a.json", bytes).unwrap_err();
        match err {
            PlotError::MalformedInput(message) => {
                assert!(message.contains("iteration"), "message: {message}")
            }
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn empty_array_is_zero_rows() {
        assert!(decode("a.json", b"[]").unwrap().is_empty());
    }
}
