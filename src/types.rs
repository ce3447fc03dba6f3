//! Core data model for the explorer.
//!
//! A [`Record`] is one immutable row of the base collection. Every other component reads
//! records through [`Record::value`], which returns a typed [`FieldValue`] for a [`Field`].

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{IngestionError, IngestionResult, UnknownFieldError};

/// Timestamp type used for `createdAt` / `updatedAt`.
pub type Timestamp = DateTime<Utc>;

/// Unique key of a [`Record`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Integer key.
    Int(i64),
    /// Text key.
    Text(String),
}

impl Ord for RecordId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Int(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Int(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for RecordId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for RecordId {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for RecordId {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// The value kind of a [`Field`], which decides how it compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// The record key.
    Id,
    /// Free text, compared lexicographically (case-sensitive).
    Text,
    /// Timestamp, compared chronologically.
    Timestamp,
    /// Non-negative number, compared numerically.
    Number,
}

/// One column of the record schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "category")]
    Category,
    #[serde(rename = "subcategory")]
    Subcategory,
    #[serde(rename = "createdAt")]
    CreatedAt,
    #[serde(rename = "updatedAt")]
    UpdatedAt,
    #[serde(rename = "price")]
    Price,
    #[serde(rename = "sale_price")]
    SalePrice,
}

impl Field {
    /// Every field, in column order.
    pub const ALL: [Field; 8] = [
        Field::Id,
        Field::Name,
        Field::Category,
        Field::Subcategory,
        Field::CreatedAt,
        Field::UpdatedAt,
        Field::Price,
        Field::SalePrice,
    ];

    /// Name used on the wire and in panel callbacks.
    pub fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Category => "category",
            Self::Subcategory => "subcategory",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
            Self::Price => "price",
            Self::SalePrice => "sale_price",
        }
    }

    /// Column header shown by the rendering layer.
    pub fn header(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Name => "Name",
            Self::Category => "Category",
            Self::Subcategory => "Subcategory",
            Self::CreatedAt => "Created At",
            Self::UpdatedAt => "Updated At",
            Self::Price => "Price",
            Self::SalePrice => "Sale Price",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Self::Id => FieldKind::Id,
            Self::Name | Self::Category | Self::Subcategory => FieldKind::Text,
            Self::CreatedAt | Self::UpdatedAt => FieldKind::Timestamp,
            Self::Price | Self::SalePrice => FieldKind::Number,
        }
    }

    /// Whether the field may be used as the active grouping field.
    pub fn groupable(self) -> bool {
        matches!(self, Self::Category | Self::Subcategory)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| UnknownFieldError(s.to_string()))
    }
}

/// A typed, borrowed view of one field of a [`Record`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Id(&'a RecordId),
    Text(&'a str),
    Timestamp(Timestamp),
    Number(f64),
}

impl FieldValue<'_> {
    /// Compare two values of the same field.
    ///
    /// Values of different kinds only meet when the caller mixes fields; they are ordered by
    /// kind so the comparison stays total.
    pub fn compare(&self, other: &FieldValue<'_>) -> Ordering {
        match (self, other) {
            (FieldValue::Id(a), FieldValue::Id(b)) => a.cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => a.cmp(b),
            (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::Id(_) => 0,
            FieldValue::Text(_) => 1,
            FieldValue::Timestamp(_) => 2,
            FieldValue::Number(_) => 3,
        }
    }
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Id(v) => write!(f, "{v}"),
            FieldValue::Text(v) => f.write_str(v),
            FieldValue::Timestamp(v) => f.write_str(&v.to_rfc3339()),
            FieldValue::Number(v) => write!(f, "{v}"),
        }
    }
}

/// One immutable row of the base collection.
///
/// Two records are equal when their `id`s are equal.
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub category: String,
    pub subcategory: String,
    #[serde(rename = "createdAt")]
    pub created_at: Timestamp,
    #[serde(rename = "updatedAt")]
    pub updated_at: Timestamp,
    pub price: f64,
    pub sale_price: f64,
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Record {
    /// Typed accessor used by matching, filtering, sorting and grouping.
    pub fn value(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::Id => FieldValue::Id(&self.id),
            Field::Name => FieldValue::Text(&self.name),
            Field::Category => FieldValue::Text(&self.category),
            Field::Subcategory => FieldValue::Text(&self.subcategory),
            Field::CreatedAt => FieldValue::Timestamp(self.created_at),
            Field::UpdatedAt => FieldValue::Timestamp(self.updated_at),
            Field::Price => FieldValue::Number(self.price),
            Field::SalePrice => FieldValue::Number(self.sale_price),
        }
    }
}

/// Parse a timestamp as RFC 3339, `YYYY-MM-DDTHH:MM:SS` (UTC) or `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Whether `value` is a valid `price` / `sale_price`: finite and non-negative.
pub fn is_valid_amount(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Checks the field invariants of one record; `row` is used for error reporting.
pub fn validate_record(record: &Record, row: usize) -> IngestionResult<()> {
    for (field, value) in [(Field::Price, record.price), (Field::SalePrice, record.sale_price)] {
        if !is_valid_amount(value) {
            return Err(IngestionError::ParseError {
                row,
                column: field.name().to_string(),
                raw: value.to_string(),
                message: "expected a non-negative number".to_string(),
            });
        }
    }
    Ok(())
}

/// Checks that no two records share an `id`.
///
/// `first_row` is the row number reported for `records[0]` (1 for JSON, 2 for CSV with a
/// header line).
pub fn ensure_unique_ids(records: &[Record], first_row: usize) -> IngestionResult<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for (idx0, record) in records.iter().enumerate() {
        if !seen.insert(&record.id) {
            return Err(IngestionError::DuplicateId {
                row: first_row + idx0,
                id: record.id.to_string(),
            });
        }
    }
    Ok(())
}
