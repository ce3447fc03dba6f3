//! `table-explorer` is the data-transformation core of an in-memory tabular explorer: it takes
//! a static collection of [`types::Record`]s and derives the rows a table should display from
//! the user's search text, category/subcategory selection, price range, date ranges, sort
//! keys, grouping field and column visibility.
//!
//! The primary entrypoint is [`view::ViewComposer`], which owns the base records and all
//! criteria, applies user actions one at a time, and always runs the stages in the order
//! **filter → sort → group**, with visibility as a render-time projection.
//!
//! ## Quick example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use table_explorer::types::{Field, Record, RecordId};
//! use table_explorer::view::{ViewComposer, ViewOptions};
//!
//! # fn main() -> Result<(), table_explorer::IngestionError> {
//! let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let rec = |id: i64, category: &str, price: f64| Record {
//!     id: RecordId::Int(id),
//!     name: format!("item {id}"),
//!     category: category.to_string(),
//!     subcategory: "general".to_string(),
//!     created_at: ts,
//!     updated_at: ts,
//!     price,
//!     sale_price: price,
//! };
//!
//! let mut view = ViewComposer::new(
//!     vec![rec(1, "A", 10.0), rec(2, "B", 5.0), rec(3, "A", 20.0)],
//!     ViewOptions::default(),
//! )?;
//!
//! view.set_categories(["A"]);
//! view.on_column_sort_change("price", "desc");
//! view.on_column_visibility_change("sale_price", true);
//!
//! let rendered = view.render();
//! let ids: Vec<_> = rendered.rows.rows().iter().map(|r| r.id.clone()).collect();
//! assert_eq!(ids, vec![RecordId::Int(3), RecordId::Int(1)]);
//! assert!(!rendered.columns.contains(&Field::SalePrice));
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`types`]: record model, fields and typed field values
//! - [`processing`]: the pure stages (fuzzy search, filter, sort, group, visibility)
//! - [`view`]: the composer that owns state and orders the stages
//! - [`ingestion`]: loading the base record set from JSON / CSV
//! - [`error`]: error types used at the input boundary

pub mod error;
pub mod ingestion;
pub mod processing;
pub mod types;
pub mod view;

pub use error::{IngestionError, IngestionResult, UnknownFieldError, UnknownSortDirection};
