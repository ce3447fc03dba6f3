//! Record transformations.
//!
//! Every stage is a pure function over a slice of rows. Rows are generic over
//! `R: Borrow<Record>`, so callers can pass `&Record`, `Arc<Record>` or owned records and get
//! the same handles back, reordered or narrowed but never modified.
//!
//! - [`fuzzy`]: approximate text search over one field
//! - [`filter`]: composite predicate ([`FilterCriteria`]) on top of the fuzzy search
//! - [`sort`]: stable multi-key sort ([`SortSpec`]) and the per-field toggle cycle
//! - [`group`]: first-occurrence grouping ([`GroupSpec`])
//! - [`visibility`]: column projection ([`ColumnVisibility`])
//!
//! ## Example: filter → sort → group
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use table_explorer::processing::{
//!     filter_records, group_records, sort_records, FilterCriteria, GroupSpec, SortDirection,
//!     SortKey, SortSpec,
//! };
//! use table_explorer::types::{Field, Record, RecordId};
//!
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
//! let base = vec![rec(1, "A", 10.0), rec(2, "B", 5.0), rec(3, "A", 20.0)];
//!
//! let criteria = FilterCriteria::default().with_categories(["A"]);
//! let mut rows = filter_records(&base.iter().collect::<Vec<_>>(), &criteria);
//!
//! sort_records(
//!     &mut rows,
//!     &SortSpec::from_keys([SortKey::new(Field::Price, SortDirection::Desc)]),
//! );
//! let ids: Vec<_> = rows.iter().map(|r| r.id.clone()).collect();
//! assert_eq!(ids, vec![RecordId::Int(3), RecordId::Int(1)]);
//!
//! let grouped = group_records(&rows, &GroupSpec::by(Field::Category).unwrap());
//! assert_eq!(grouped.groups().len(), 1);
//! ```

pub mod filter;
pub mod fuzzy;
pub mod group;
pub mod sort;
pub mod visibility;

pub use filter::{distinct_values, filter_records, DateRange, FilterCriteria, FilterEngine, PriceRange};
pub use fuzzy::{FuzzySearcher, SearchOptions};
pub use group::{group_records, Group, GroupChildren, GroupSpec, Grouped};
pub use sort::{sort_records, SortDirection, SortKey, SortSpec, SortState, SortToggles};
pub use visibility::{ColumnVisibility, VisibilitySelection};
