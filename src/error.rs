use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned when loading or validating a base record set.
///
/// Transformations over an already loaded record set never fail; this enum only covers the
/// input boundary.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The input does not have the record shape (missing columns, non-object rows, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A value could not be parsed into the field's type.
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },

    /// Two records share an `id`.
    #[error("duplicate record id '{id}' at row {row}")]
    DuplicateId { row: usize, id: String },
}

/// A field name that is not part of the record schema.
///
/// Panel callbacks treat this as a no-op; it is surfaced as an error only to callers that
/// parse field names themselves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown field '{0}'")]
pub struct UnknownFieldError(pub String);

/// A sort direction other than `""`, `"asc"` or `"desc"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort direction '{0}'")]
pub struct UnknownSortDirection(pub String);
