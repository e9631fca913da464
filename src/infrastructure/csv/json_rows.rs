// ============================================================
// JSON ROWS
// ============================================================
// Already-keyed row objects bypass the delimited parser

use serde_json::Value;

use crate::domain::csv::{KeyedRows, RawRow};
use crate::domain::error::{AppError, Result};

/// Accept a bare array of row objects or an envelope `{ "data": [...] }`.
pub fn parse_json_rows(payload: Value) -> Result<KeyedRows> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(mut envelope) => match envelope.remove("data") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(AppError::ParseError(
                    "JSON envelope field 'data' is not an array".to_string(),
                ))
            }
            None => {
                return Err(AppError::ParseError(
                    "JSON object has no 'data' array".to_string(),
                ))
            }
        },
        other => {
            return Err(AppError::ParseError(format!(
                "expected a JSON array of rows, found {}",
                json_kind(&other)
            )))
        }
    };

    let rows = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map
                .into_iter()
                .map(|(key, value)| (key.trim().to_string(), cell_text(value)))
                .collect::<RawRow>()),
            other => Err(AppError::ParseError(format!(
                "row {} is a JSON {}, not an object",
                index + 1,
                json_kind(&other)
            ))),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(KeyedRows::from_rows(rows))
}

/// Parse JSON text, rejecting HTML error pages up front.
pub fn parse_json_text(text: &str) -> Result<KeyedRows> {
    let leading = text.trim_start_matches('\u{feff}').trim_start();
    if leading.is_empty() {
        return Err(AppError::ParseError("source is empty".to_string()));
    }
    if leading.starts_with('<') {
        return Err(AppError::ParseError(
            "source looks like an HTML page, not JSON data".to_string(),
        ));
    }

    let value: Value = serde_json::from_str(leading)
        .map_err(|e| AppError::ParseError(format!("Failed to parse JSON: {}", e)))?;
    parse_json_rows(value)
}

fn cell_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
