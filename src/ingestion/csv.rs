//! CSV record reader.

use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{ensure_unique_ids, Field, FieldKind, Record, RecordId};

use super::record::{parse_error, RecordBuilder};

/// Read records from a CSV file.
///
/// Rules:
///
/// - CSV must have headers, named after the record fields (`id`, `name`, `category`,
///   `subcategory`, `createdAt`, `updatedAt`, `price`, `sale_price`); order can differ and
///   extra columns are ignored.
/// - An all-digit `id` becomes an integer key, anything else a text key.
/// - Record ids must be unique.
pub fn ingest_csv_from_path(path: impl AsRef<Path>) -> IngestionResult<Vec<Record>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr)
}

/// Read records from an existing CSV reader.
pub fn ingest_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> IngestionResult<Vec<Record>> {
    let headers = rdr.headers()?.clone();

    // Map fields -> CSV column indexes (allows re-ordered CSV columns).
    let mut col_idxs = Vec::with_capacity(Field::ALL.len());
    for field in Field::ALL {
        match headers.iter().position(|h| h.trim() == field.name()) {
            Some(idx) => col_idxs.push((field, idx)),
            None => {
                return Err(IngestionError::SchemaMismatch {
                    message: format!(
                        "missing required column '{field}'. headers={:?}",
                        headers.iter().collect::<Vec<_>>(),
                    ),
                });
            }
        }
    }

    let mut records = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // 1-based for users, +1 again because the header is row 1.
        let user_row = row_idx0 + 2;
        let raw_record = result?;

        let mut builder = RecordBuilder::new(user_row);
        for &(field, csv_idx) in &col_idxs {
            let raw = raw_record.get(csv_idx).unwrap_or("");
            parse_csv_field(&mut builder, user_row, field, raw)?;
        }
        records.push(builder.build()?);
    }

    // Data starts on line 2, after the header.
    ensure_unique_ids(&records, 2)?;
    Ok(records)
}

fn parse_csv_field(builder: &mut RecordBuilder, row: usize, field: Field, raw: &str) -> IngestionResult<()> {
    let trimmed = raw.trim();
    if trimmed.is_empty() && field.kind() != FieldKind::Text {
        return Err(parse_error(row, field, raw, "value is required"));
    }

    match field.kind() {
        FieldKind::Id => {
            let id = match trimmed.parse::<i64>() {
                Ok(v) => RecordId::Int(v),
                Err(_) => RecordId::Text(trimmed.to_owned()),
            };
            builder.id(id);
            Ok(())
        }
        FieldKind::Text => {
            builder.text(field, trimmed.to_owned());
            Ok(())
        }
        FieldKind::Timestamp => builder.timestamp(field, trimmed),
        FieldKind::Number => {
            let value = trimmed
                .parse::<f64>()
                .map_err(|e| parse_error(row, field, raw, &e.to_string()))?;
            builder.number(field, value, raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ingest_csv_from_reader;
    use crate::types::RecordId;

    const HEADER: &str = "id,name,category,subcategory,createdAt,updatedAt,price,sale_price";

    fn read(input: &str) -> crate::error::IngestionResult<Vec<crate::types::Record>> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(input.as_bytes());
        ingest_csv_from_reader(&mut rdr)
    }

    #[test]
    fn text_ids_are_kept_as_text() {
        let input = format!("{HEADER}\nsku-1,Lamp,Home,Lighting,2024-01-01,2024-01-02,10,8\n");
        let records = read(&input).unwrap();
        assert_eq!(records[0].id, RecordId::Text("sku-1".to_string()));
    }

    #[test]
    fn negative_prices_are_rejected() {
        let input = format!("{HEADER}\n1,Lamp,Home,Lighting,2024-01-01,2024-01-02,-1,8\n");
        let msg = read(&input).unwrap_err().to_string();
        assert!(msg.contains("column 'price'"));
        assert!(msg.contains("non-negative"));
    }

    #[test]
    fn duplicate_ids_use_the_same_row_numbers_as_parse_errors() {
        let dup = format!(
            "{HEADER}\n1,Lamp,Home,Lighting,2024-01-01,2024-01-02,10,8\n1,Mat,Sports,Fitness,2024-01-01,2024-01-02,5,4\n"
        );
        let msg = read(&dup).unwrap_err().to_string();
        assert_eq!(msg, "duplicate record id '1' at row 3");

        let bad_price = format!(
            "{HEADER}\n1,Lamp,Home,Lighting,2024-01-01,2024-01-02,10,8\n2,Mat,Sports,Fitness,2024-01-01,2024-01-02,x,4\n"
        );
        let msg = read(&bad_price).unwrap_err().to_string();
        assert!(msg.contains("at row 3"));
    }

    #[test]
    fn bad_timestamps_are_reported_with_row() {
        let input = format!("{HEADER}\n1,Lamp,Home,Lighting,someday,2024-01-02,1,1\n");
        let msg = read(&input).unwrap_err().to_string();
        assert!(msg.contains("row 2"));
        assert!(msg.contains("column 'createdAt'"));
    }
}
