//! Approximate text matching over one field of a record collection.
//!
//! A query matches a record when every character of the (trimmed) query appears in the
//! target field in the same relative order, not necessarily contiguously. Matching is
//! case-insensitive unless [`SearchOptions::case_sensitive`] is set. Scoring is delegated to
//! the [`nucleo`] fuzzy matcher.

use std::borrow::Borrow;
use std::cmp::Reverse;

use nucleo::pattern::{Atom, AtomKind, CaseMatching, Normalization};
use nucleo::{Config, Matcher, Utf32Str};

use crate::types::{Field, Record};

/// Options for [`FuzzySearcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Match case exactly. Off by default.
    pub case_sensitive: bool,
    /// Order results by match quality (best first). When off, results keep input order.
    pub sort: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            sort: true,
        }
    }
}

/// Fuzzy searcher bound to a target field.
#[derive(Debug, Clone)]
pub struct FuzzySearcher {
    field: Field,
    options: SearchOptions,
}

impl FuzzySearcher {
    pub fn new(field: Field, options: SearchOptions) -> Self {
        Self { field, options }
    }

    /// The field queries are matched against.
    pub fn field(&self) -> Field {
        self.field
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// Returns the records of `rows` whose target field matches `query`, most relevant first.
    ///
    /// An empty (or whitespace-only) query returns every row in its original order.
    pub fn search<R>(&self, rows: &[R], query: &str) -> Vec<R>
    where
        R: Borrow<Record> + Clone,
    {
        let needle = query.trim();
        if needle.is_empty() {
            return rows.to_vec();
        }

        let case = if self.options.case_sensitive {
            CaseMatching::Respect
        } else {
            CaseMatching::Ignore
        };
        let atom = Atom::new(needle, case, Normalization::Smart, AtomKind::Fuzzy, false);
        let mut matcher = Matcher::new(Config::DEFAULT);
        let mut buf = Vec::new();

        let mut scored: Vec<(u16, &R)> = Vec::new();
        for row in rows {
            let text = row.borrow().value(self.field).to_string();
            if let Some(score) = atom.score(Utf32Str::new(&text, &mut buf), &mut matcher) {
                scored.push((score, row));
            }
        }

        if self.options.sort {
            // Stable: equal scores keep input order.
            scored.sort_by_key(|&(score, _)| Reverse(score));
        }

        scored.into_iter().map(|(_, row)| row.clone()).collect()
    }

    /// Whether a single record matches `query`.
    pub fn is_match(&self, record: &Record, query: &str) -> bool {
        !self.search(&[record], query).is_empty()
    }
}

impl Default for FuzzySearcher {
    fn default() -> Self {
        Self::new(Field::Name, SearchOptions::default())
    }
}
