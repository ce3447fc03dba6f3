//! Column visibility.
//!
//! Visibility is a projection applied at render time only; nothing here touches rows.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::types::Field;

/// Committed per-field visibility. Absent entries are visible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnVisibility {
    visible: BTreeMap<Field, bool>,
}

impl ColumnVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_visible(&mut self, field: Field, visible: bool) {
        self.visible.insert(field, visible);
    }

    pub fn is_visible(&self, field: Field) -> bool {
        self.visible.get(&field).copied().unwrap_or(true)
    }

    /// Mark every field in `fields` visible.
    pub fn show_all(&mut self, fields: &[Field]) {
        for &field in fields {
            self.visible.insert(field, true);
        }
    }

    /// The visible subset of `fields`, in the given order.
    pub fn visible_fields(&self, fields: &[Field]) -> Vec<Field> {
        fields.iter().copied().filter(|&f| self.is_visible(f)).collect()
    }

    pub fn hidden_count(&self) -> usize {
        self.visible.values().filter(|v| !**v).count()
    }
}

/// Staged selection held by the show/hide panel until it is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilitySelection {
    fields: Vec<Field>,
    selected: BTreeSet<Field>,
}

impl VisibilitySelection {
    /// A selection over `fields` with everything selected.
    pub fn new(fields: &[Field]) -> Self {
        Self {
            fields: fields.to_vec(),
            selected: fields.iter().copied().collect(),
        }
    }

    pub fn is_selected(&self, field: Field) -> bool {
        self.selected.contains(&field)
    }

    /// Flip a field's staged state. Fields outside the known list are ignored.
    pub fn toggle(&mut self, field: Field) {
        if !self.fields.contains(&field) {
            return;
        }
        if !self.selected.remove(&field) {
            self.selected.insert(field);
        }
    }

    /// Select everything and return a `(field, hidden = false)` notification per field.
    pub fn show_all(&mut self) -> Vec<(Field, bool)> {
        self.selected = self.fields.iter().copied().collect();
        self.fields.iter().map(|&f| (f, false)).collect()
    }

    /// One `(field, hidden)` pair per known field; unselected fields are hidden.
    pub fn apply(&self) -> Vec<(Field, bool)> {
        self.fields
            .iter()
            .map(|&f| (f, !self.selected.contains(&f)))
            .collect()
    }
}

impl Default for VisibilitySelection {
    fn default() -> Self {
        Self::new(&Field::ALL)
    }
}
