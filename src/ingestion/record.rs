//! Field-level parsing shared by the format readers.

use crate::error::{IngestionError, IngestionResult};
use crate::types::{is_valid_amount, parse_timestamp, Field, Record, RecordId, Timestamp};

/// Collects parsed fields for one row, then checks that the record is complete.
#[derive(Debug, Default)]
pub(crate) struct RecordBuilder {
    row: usize,
    id: Option<RecordId>,
    name: Option<String>,
    category: Option<String>,
    subcategory: Option<String>,
    created_at: Option<Timestamp>,
    updated_at: Option<Timestamp>,
    price: Option<f64>,
    sale_price: Option<f64>,
}

impl RecordBuilder {
    pub(crate) fn new(row: usize) -> Self {
        Self {
            row,
            ..Default::default()
        }
    }

    pub(crate) fn id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    pub(crate) fn text(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = Some(value),
            Field::Category => self.category = Some(value),
            Field::Subcategory => self.subcategory = Some(value),
            _ => {}
        }
    }

    pub(crate) fn timestamp(&mut self, field: Field, raw: &str) -> IngestionResult<()> {
        let ts = parse_timestamp(raw).ok_or_else(|| parse_error(self.row, field, raw, "expected timestamp"))?;
        match field {
            Field::CreatedAt => self.created_at = Some(ts),
            Field::UpdatedAt => self.updated_at = Some(ts),
            _ => {}
        }
        Ok(())
    }

    pub(crate) fn number(&mut self, field: Field, value: f64, raw: &str) -> IngestionResult<()> {
        if !is_valid_amount(value) {
            return Err(parse_error(self.row, field, raw, "expected a non-negative number"));
        }
        match field {
            Field::Price => self.price = Some(value),
            Field::SalePrice => self.sale_price = Some(value),
            _ => {}
        }
        Ok(())
    }

    pub(crate) fn build(self) -> IngestionResult<Record> {
        let row = self.row;
        let missing = |field: Field| IngestionError::SchemaMismatch {
            message: format!("row {row} missing required field '{field}'"),
        };
        Ok(Record {
            id: self.id.ok_or_else(|| missing(Field::Id))?,
            name: self.name.ok_or_else(|| missing(Field::Name))?,
            category: self.category.ok_or_else(|| missing(Field::Category))?,
            subcategory: self.subcategory.ok_or_else(|| missing(Field::Subcategory))?,
            created_at: self.created_at.ok_or_else(|| missing(Field::CreatedAt))?,
            updated_at: self.updated_at.ok_or_else(|| missing(Field::UpdatedAt))?,
            price: self.price.ok_or_else(|| missing(Field::Price))?,
            sale_price: self.sale_price.ok_or_else(|| missing(Field::SalePrice))?,
        })
    }
}

pub(crate) fn parse_error(row: usize, field: Field, raw: &str, message: &str) -> IngestionError {
    IngestionError::ParseError {
        row,
        column: field.name().to_string(),
        raw: raw.to_string(),
        message: message.to_string(),
    }
}
