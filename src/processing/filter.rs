//! Composite record filtering.
//!
//! [`FilterEngine::apply`] first narrows the collection with the fuzzy searcher using
//! [`FilterCriteria::search_query`], then keeps the records for which every predicate holds:
//!
//! - category: `categories` is empty, or contains the record's category
//! - subcategory: `subcategories` is empty, or contains the record's subcategory
//! - price: `price_range.min <= price <= price_range.max`
//! - created at: each set bound of `created_at_range` holds
//!
//! `updated_at_range` is collected but not part of the predicate.
//!
//! Inverted ranges (`min > max`) are not validated; they simply match nothing.

use std::borrow::Borrow;
use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::types::{Field, FieldValue, Record, Timestamp};

use super::fuzzy::{FuzzySearcher, SearchOptions};

/// Inclusive numeric bounds. Defaults to `[0, +inf)`.
///
/// An infinite `max` is serialized as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    #[serde(with = "open_upper_bound")]
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: f64::INFINITY,
        }
    }
}

mod open_upper_bound {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(max: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if max.is_infinite() && max.is_sign_positive() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(max)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

/// Inclusive timestamp bounds; an unset side is unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub min: Option<Timestamp>,
    pub max: Option<Timestamp>,
}

impl DateRange {
    pub fn new(min: Option<Timestamp>, max: Option<Timestamp>) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: Timestamp) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn is_inverted(&self) -> bool {
        matches!((self.min, self.max), (Some(min), Some(max)) if min > max)
    }
}

/// User-specified filter criteria.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search_query: String,
    /// Empty means no constraint.
    pub categories: BTreeSet<String>,
    /// Empty means no constraint.
    pub subcategories: BTreeSet<String>,
    pub price_range: PriceRange,
    pub created_at_range: DateRange,
    /// Collected from the user but not applied by [`FilterCriteria::matches`].
    pub updated_at_range: DateRange,
}

impl FilterCriteria {
    pub fn with_search_query(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_subcategories<I, S>(mut self, subcategories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subcategories = subcategories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_price_range(mut self, min: f64, max: f64) -> Self {
        self.price_range = PriceRange::new(min, max);
        self
    }

    pub fn with_created_at_range(mut self, min: Option<Timestamp>, max: Option<Timestamp>) -> Self {
        self.created_at_range = DateRange::new(min, max);
        self
    }

    pub fn with_updated_at_range(mut self, min: Option<Timestamp>, max: Option<Timestamp>) -> Self {
        self.updated_at_range = DateRange::new(min, max);
        self
    }

    /// Reset every criterion to its default.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Whether any range bound has `min > max`.
    pub fn has_inverted_range(&self) -> bool {
        !self.inverted_ranges().is_empty()
    }

    /// Names of the ranges with `min > max`, in declaration order.
    pub fn inverted_ranges(&self) -> Vec<&'static str> {
        [
            ("price", self.price_range.is_inverted()),
            ("createdAt", self.created_at_range.is_inverted()),
            ("updatedAt", self.updated_at_range.is_inverted()),
        ]
        .into_iter()
        .filter_map(|(name, inverted)| inverted.then_some(name))
        .collect()
    }

    /// The conjunction of the non-text predicates.
    pub fn matches(&self, record: &Record) -> bool {
        let category_match =
            self.categories.is_empty() || self.categories.contains(&record.category);
        let subcategory_match =
            self.subcategories.is_empty() || self.subcategories.contains(&record.subcategory);
        let price_match = self.price_range.contains(record.price);
        let created_at_match = self.created_at_range.contains(record.created_at);

        category_match && subcategory_match && price_match && created_at_match
    }
}

/// Applies [`FilterCriteria`] using a fuzzy searcher for the text part.
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    searcher: FuzzySearcher,
}

impl FilterEngine {
    pub fn new(searcher: FuzzySearcher) -> Self {
        Self { searcher }
    }

    /// Engine searching `field` with the given options.
    pub fn for_field(field: Field, options: SearchOptions) -> Self {
        Self::new(FuzzySearcher::new(field, options))
    }

    pub fn searcher(&self) -> &FuzzySearcher {
        &self.searcher
    }

    /// Returns the rows matching `criteria`, in fuzzy-search order.
    pub fn apply<R>(&self, rows: &[R], criteria: &FilterCriteria) -> Vec<R>
    where
        R: Borrow<Record> + Clone,
    {
        let mut out = self.searcher.search(rows, &criteria.search_query);
        out.retain(|row| criteria.matches(row.borrow()));
        out
    }
}

/// Convenience wrapper around [`FilterEngine::apply`] searching `name` with default options.
pub fn filter_records<R>(rows: &[R], criteria: &FilterCriteria) -> Vec<R>
where
    R: Borrow<Record> + Clone,
{
    FilterEngine::default().apply(rows, criteria)
}

/// Distinct values of `field` in first-occurrence order.
///
/// Used to populate the category / subcategory option lists.
pub fn distinct_values<R>(rows: &[R], field: Field) -> Vec<String>
where
    R: Borrow<Record>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for row in rows {
        let value = match row.borrow().value(field) {
            FieldValue::Text(s) => s.to_string(),
            other => other.to_string(),
        };
        if seen.insert(value.clone()) {
            out.push(value);
        }
    }
    out
}
