//! Multi-key record sorting.
//!
//! A [`SortSpec`] is an ordered list of `(field, direction)` keys with at most one key per
//! field; the first key is the primary sort. [`sort_records`] is stable, so rows that tie on
//! every key keep their input order.
//!
//! [`SortToggles`] holds the per-field `unsorted -> asc -> desc -> unsorted` cycle driven by
//! the sorting panel. Each toggle yields the new [`SortState`], which is then folded into the
//! spec with [`SortSpec::set`].

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownSortDirection;
use crate::types::{Field, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            Self::Asc => ord,
            Self::Desc => ord.reverse(),
        }
    }
}

/// Sort state of one field as seen by the sorting panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortState {
    #[default]
    Unsorted,
    Asc,
    Desc,
}

impl SortState {
    /// Next state in the toggle cycle.
    pub fn next(self) -> Self {
        match self {
            Self::Unsorted => Self::Asc,
            Self::Asc => Self::Desc,
            Self::Desc => Self::Unsorted,
        }
    }

    pub fn direction(self) -> Option<SortDirection> {
        match self {
            Self::Unsorted => None,
            Self::Asc => Some(SortDirection::Asc),
            Self::Desc => Some(SortDirection::Desc),
        }
    }

    /// Callback encoding: `""`, `"asc"` or `"desc"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unsorted => "",
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl From<SortDirection> for SortState {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => Self::Asc,
            SortDirection::Desc => Self::Desc,
        }
    }
}

impl fmt::Display for SortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortState {
    type Err = UnknownSortDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Self::Unsorted),
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(UnknownSortDirection(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: Field,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(field: Field, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

/// Ordered sort keys, primary first, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a spec from keys; a later key for an already present field updates it in place.
    pub fn from_keys(keys: impl IntoIterator<Item = SortKey>) -> Self {
        let mut spec = Self::new();
        for key in keys {
            spec.set(key.field, key.direction.into());
        }
        spec
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn direction_of(&self, field: Field) -> Option<SortDirection> {
        self.keys.iter().find(|k| k.field == field).map(|k| k.direction)
    }

    /// Fold a field's new state into the spec.
    ///
    /// `Unsorted` removes the field's key; an existing key is updated in place (keeping its
    /// priority); a new field is appended as the lowest-priority key.
    pub fn set(&mut self, field: Field, state: SortState) {
        match state.direction() {
            None => self.keys.retain(|k| k.field != field),
            Some(direction) => match self.keys.iter_mut().find(|k| k.field == field) {
                Some(existing) => existing.direction = direction,
                None => self.keys.push(SortKey::new(field, direction)),
            },
        }
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Compare two records by every key in priority order.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        for key in &self.keys {
            let ord = a.value(key.field).compare(&b.value(key.field));
            if ord != Ordering::Equal {
                return key.direction.apply(ord);
            }
        }
        Ordering::Equal
    }
}

/// Sort `rows` in place by `spec`. Stable; an empty spec leaves the order untouched.
pub fn sort_records<R>(rows: &mut [R], spec: &SortSpec)
where
    R: Borrow<Record>,
{
    if spec.is_empty() {
        return;
    }
    rows.sort_by(|a, b| spec.compare(a.borrow(), b.borrow()));
}

/// Per-field toggle state held by the sorting panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortToggles {
    states: BTreeMap<Field, SortState>,
}

impl SortToggles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, field: Field) -> SortState {
        self.states.get(&field).copied().unwrap_or_default()
    }

    /// Advance `field` one step through the cycle and return its new state.
    ///
    /// Other fields are unaffected.
    pub fn toggle(&mut self, field: Field) -> SortState {
        let next = self.state(field).next();
        self.set(field, next);
        next
    }

    pub fn set(&mut self, field: Field, state: SortState) {
        if state == SortState::Unsorted {
            self.states.remove(&field);
        } else {
            self.states.insert(field, state);
        }
    }

    /// Reset every field, returning one `(field, Unsorted)` notification per known field.
    pub fn clear(&mut self, fields: &[Field]) -> Vec<(Field, SortState)> {
        self.states.clear();
        fields.iter().map(|&f| (f, SortState::Unsorted)).collect()
    }
}
