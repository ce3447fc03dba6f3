//! Grouping of an already filtered and sorted row sequence.
//!
//! Groups appear in first-occurrence order of their key, so a sort on the grouping field
//! carries over to the group order. Rows inside a group keep their input order.

use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

use crate::types::{Field, Record};

/// Active grouping fields, outermost first.
///
/// Modelled as a sequence so nested grouping can be added later; today at most one field
/// is held, and only [`Field::groupable`] fields are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    fields: Vec<Field>,
}

impl GroupSpec {
    /// No grouping (flat list).
    pub fn none() -> Self {
        Self::default()
    }

    /// Group by `field`, or `None` if the field is not groupable.
    pub fn by(field: Field) -> Option<Self> {
        field.groupable().then(|| Self {
            fields: vec![field],
        })
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self) -> Option<Field> {
        self.fields.first().copied()
    }

    pub fn is_none(&self) -> bool {
        self.fields.is_empty()
    }

    /// Replace the active field. Returns `false` (and leaves the spec unchanged) when the
    /// field is not groupable.
    pub fn set(&mut self, field: Option<Field>) -> bool {
        match field {
            None => {
                self.fields.clear();
                true
            }
            Some(f) if f.groupable() => {
                self.fields = vec![f];
                true
            }
            Some(_) => false,
        }
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

/// A group header and its members.
#[derive(Debug, Clone, PartialEq)]
pub struct Group<R> {
    pub field: Field,
    pub key: String,
    pub children: GroupChildren<R>,
}

impl<R> Group<R> {
    /// Number of leaf rows under this group.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GroupChildren<R> {
    Rows(Vec<R>),
    Groups(Vec<Group<R>>),
}

impl<R> GroupChildren<R> {
    pub fn len(&self) -> usize {
        match self {
            Self::Rows(rows) => rows.len(),
            Self::Groups(groups) => groups.iter().map(Group::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Output of [`group_records`].
#[derive(Debug, Clone, PartialEq)]
pub enum Grouped<R> {
    Flat(Vec<R>),
    Groups(Vec<Group<R>>),
}

impl<R> Grouped<R> {
    /// Total leaf rows.
    pub fn row_count(&self) -> usize {
        match self {
            Self::Flat(rows) => rows.len(),
            Self::Groups(groups) => groups.iter().map(Group::len).sum(),
        }
    }

    /// Leaf rows in display order.
    pub fn rows(&self) -> Vec<&R> {
        let mut out = Vec::with_capacity(self.row_count());
        match self {
            Self::Flat(rows) => out.extend(rows),
            Self::Groups(groups) => {
                for g in groups {
                    collect_rows(&g.children, &mut out);
                }
            }
        }
        out
    }

    pub fn groups(&self) -> &[Group<R>] {
        match self {
            Self::Flat(_) => &[],
            Self::Groups(groups) => groups,
        }
    }
}

fn collect_rows<'a, R>(children: &'a GroupChildren<R>, out: &mut Vec<&'a R>) {
    match children {
        GroupChildren::Rows(rows) => out.extend(rows),
        GroupChildren::Groups(groups) => {
            for g in groups {
                collect_rows(&g.children, out);
            }
        }
    }
}

/// Partition `rows` by the fields of `spec`.
pub fn group_records<R>(rows: &[R], spec: &GroupSpec) -> Grouped<R>
where
    R: Borrow<Record> + Clone,
{
    match spec.fields() {
        [] => Grouped::Flat(rows.to_vec()),
        fields => Grouped::Groups(partition(rows, fields)),
    }
}

fn partition<R>(rows: &[R], fields: &[Field]) -> Vec<Group<R>>
where
    R: Borrow<Record> + Clone,
{
    let Some((&field, rest)) = fields.split_first() else {
        return Vec::new();
    };

    let mut buckets: Vec<(String, Vec<R>)> = Vec::new();
    for row in rows {
        let key = row.borrow().value(field).to_string();
        match buckets.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(row.clone()),
            None => buckets.push((key, vec![row.clone()])),
        }
    }

    buckets
        .into_iter()
        .map(|(key, members)| {
            let children = if rest.is_empty() {
                GroupChildren::Rows(members)
            } else {
                GroupChildren::Groups(partition(&members, rest))
            };
            Group {
                field,
                key,
                children,
            }
        })
        .collect()
}
