use std::sync::Arc;

use crate::processing::Grouped;
use crate::types::{Field, FieldValue, Record};

/// Display-ready output of the composer: visible columns plus ordered (and possibly grouped)
/// rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedView {
    pub columns: Vec<Field>,
    pub rows: Grouped<Arc<Record>>,
}

impl RenderedView {
    /// The visible cells of `record`, in column order.
    pub fn project<'a>(&self, record: &'a Record) -> Vec<(Field, FieldValue<'a>)> {
        self.columns.iter().map(|&f| (f, record.value(f))).collect()
    }

    /// Column headers, in column order.
    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|f| f.header()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.rows.row_count()
    }
}
