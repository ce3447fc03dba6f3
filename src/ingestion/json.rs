//! JSON record reader.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"id":1, ...}, {"id":2, ...}]`
//! - Newline-delimited JSON (NDJSON): `{"id":1, ...}\n{"id":2, ...}\n`

use std::fs;
use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{ensure_unique_ids, Field, FieldKind, Record, RecordId};

use super::record::{parse_error, RecordBuilder};

/// Read records from a JSON / NDJSON file.
pub fn ingest_json_from_path(path: impl AsRef<Path>) -> IngestionResult<Vec<Record>> {
    let text = fs::read_to_string(path)?;
    ingest_json_from_str(&text)
}

/// Read records from an in-memory JSON string.
pub fn ingest_json_from_str(input: &str) -> IngestionResult<Vec<Record>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(IngestionError::SchemaMismatch {
            message: "json input is empty".to_string(),
        });
    }

    // First try parsing as a single JSON value (array or object).
    let records = if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        match v {
            serde_json::Value::Array(items) => ingest_json_values(&items)?,
            serde_json::Value::Object(_) => ingest_json_values(std::slice::from_ref(&v))?,
            _ => {
                return Err(IngestionError::SchemaMismatch {
                    message: "json must be an object, an array of objects, or NDJSON".to_string(),
                });
            }
        }
    } else {
        let mut values = Vec::new();
        for (i, line) in trimmed.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let v = serde_json::from_str::<serde_json::Value>(line).map_err(|e| {
                IngestionError::SchemaMismatch {
                    message: format!("invalid ndjson at line {}: {}", i + 1, e),
                }
            })?;
            values.push(v);
        }
        ingest_json_values(&values)?
    };

    ensure_unique_ids(&records, 1)?;
    Ok(records)
}

fn ingest_json_values(values: &[serde_json::Value]) -> IngestionResult<Vec<Record>> {
    let mut records = Vec::with_capacity(values.len());

    for (idx0, v) in values.iter().enumerate() {
        let row_num = idx0 + 1;
        let obj = v.as_object().ok_or_else(|| IngestionError::SchemaMismatch {
            message: format!("row {row_num} is not a json object"),
        })?;

        let mut builder = RecordBuilder::new(row_num);
        for field in Field::ALL {
            let jv = obj.get(field.name()).ok_or_else(|| IngestionError::SchemaMismatch {
                message: format!("row {row_num} missing required field '{field}'"),
            })?;
            convert_json_value(&mut builder, row_num, field, jv)?;
        }
        records.push(builder.build()?);
    }

    Ok(records)
}

fn convert_json_value(
    builder: &mut RecordBuilder,
    row: usize,
    field: Field,
    v: &serde_json::Value,
) -> IngestionResult<()> {
    let raw = v.to_string();
    match field.kind() {
        FieldKind::Id => {
            let id = if let Some(n) = v.as_i64() {
                RecordId::Int(n)
            } else if let Some(s) = v.as_str() {
                RecordId::Text(s.to_string())
            } else {
                return Err(parse_error(row, field, &raw, "expected integer or string id"));
            };
            builder.id(id);
            Ok(())
        }
        FieldKind::Text => {
            let s = v
                .as_str()
                .ok_or_else(|| parse_error(row, field, &raw, "expected string"))?;
            builder.text(field, s.to_string());
            Ok(())
        }
        FieldKind::Timestamp => {
            let s = v
                .as_str()
                .ok_or_else(|| parse_error(row, field, &raw, "expected timestamp string"))?;
            builder.timestamp(field, s)
        }
        FieldKind::Number => {
            let n = v
                .as_f64()
                .ok_or_else(|| parse_error(row, field, &raw, "expected number"))?;
            builder.number(field, n, &raw)
        }
    }
}
