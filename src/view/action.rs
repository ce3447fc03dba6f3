use std::collections::BTreeSet;

use crate::processing::{DateRange, FilterCriteria, PriceRange, SortState};
use crate::types::Field;

/// A user intent routed through [`super::ViewComposer::dispatch`].
///
/// Panels never touch derived state; they describe what the user did and the composer
/// applies it.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewAction {
    /// Replace the whole filter criteria.
    SetFilter(FilterCriteria),
    SetSearchQuery(String),
    SetCategories(BTreeSet<String>),
    SetSubcategories(BTreeSet<String>),
    SetPriceRange(PriceRange),
    SetCreatedAtRange(DateRange),
    SetUpdatedAtRange(DateRange),
    ClearFilters,

    /// Advance one field through `unsorted -> asc -> desc -> unsorted`.
    ToggleSort(Field),
    SetSort(Field, SortState),
    ClearSorting,

    /// Stage a grouping field (`None` = flat); takes effect on [`ViewAction::ApplyGrouping`].
    StageGrouping(Option<Field>),
    ApplyGrouping,
    ClearGrouping,

    SetColumnVisible(Field, bool),
    /// Flip a field in the staged show/hide selection.
    ToggleColumnSelection(Field),
    ApplyColumnSelection,
    ShowAllColumns,
}
