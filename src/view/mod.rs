//! The view composer: owner of all derived state.
//!
//! [`ViewComposer`] holds the base record set and the four criteria objects
//! ([`FilterCriteria`], [`SortSpec`], [`GroupSpec`], [`ColumnVisibility`]). Every mutation goes
//! through one of its action handlers and is applied synchronously:
//!
//! - a filter change re-runs **filter**, then **sort**, over the base collection
//! - a sort change re-runs **sort** over the current filtered rows
//! - grouping is applied over the sorted rows at render time
//! - visibility is a projection applied at render time and never feeds back into rows
//!
//! Panels push criteria (not pre-filtered results); the composer owns filtering.
//! Unknown field names passed to the string callbacks are ignored.

mod action;
mod observer;
mod render;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::fmt;

use crate::error::IngestionResult;
use crate::processing::{
    distinct_values, group_records, sort_records, ColumnVisibility, DateRange, FilterCriteria, FilterEngine,
    GroupSpec, PriceRange, SearchOptions, SortSpec, SortState, SortToggles, VisibilitySelection,
};
use crate::types::{ensure_unique_ids, validate_record, Field, Record, Timestamp};

pub use action::ViewAction;
pub use observer::{TracingViewObserver, ViewEvent, ViewObserver, ViewStats};
pub use render::RenderedView;

/// Configuration for the [`ViewComposer`].
#[derive(Clone)]
pub struct ViewOptions {
    /// Field the search query is matched against.
    pub search_field: Field,
    pub search: SearchOptions,
    /// Optional observer for recompute events.
    pub observer: Option<Arc<dyn ViewObserver>>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            search_field: Field::Name,
            search: SearchOptions::default(),
            observer: None,
        }
    }
}

impl fmt::Debug for ViewOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewOptions")
            .field("search_field", &self.search_field)
            .field("search", &self.search)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

/// Session state for one explorer view.
pub struct ViewComposer {
    base: Vec<Arc<Record>>,
    engine: FilterEngine,
    observer: Option<Arc<dyn ViewObserver>>,

    criteria: FilterCriteria,
    sort_spec: SortSpec,
    sort_toggles: SortToggles,
    group_spec: GroupSpec,
    staged_group: Option<Field>,
    visibility: ColumnVisibility,
    selection: VisibilitySelection,

    filtered: Vec<Arc<Record>>,
    ordered: Vec<Arc<Record>>,
    stats: ViewStats,
}

impl fmt::Debug for ViewComposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewComposer")
            .field("base_rows", &self.base.len())
            .field("criteria", &self.criteria)
            .field("sort_spec", &self.sort_spec)
            .field("group_spec", &self.group_spec)
            .field("visibility", &self.visibility)
            .field("stats", &self.stats)
            .finish()
    }
}

impl ViewComposer {
    /// Start a session over `records` with every criterion at its default.
    ///
    /// Fails if two records share an `id`, or a price is negative or not finite.
    pub fn new(records: Vec<Record>, options: ViewOptions) -> IngestionResult<Self> {
        for (idx0, record) in records.iter().enumerate() {
            validate_record(record, idx0 + 1)?;
        }
        ensure_unique_ids(&records, 1)?;
        let base: Vec<Arc<Record>> = records.into_iter().map(Arc::new).collect();

        let mut composer = Self {
            engine: FilterEngine::for_field(options.search_field, options.search),
            observer: options.observer,
            criteria: FilterCriteria::default(),
            sort_spec: SortSpec::default(),
            sort_toggles: SortToggles::default(),
            group_spec: GroupSpec::none(),
            staged_group: None,
            visibility: ColumnVisibility::default(),
            selection: VisibilitySelection::default(),
            filtered: Vec::new(),
            ordered: Vec::new(),
            stats: ViewStats {
                base_rows: base.len(),
                ..Default::default()
            },
            base,
        };
        composer.refilter();
        Ok(composer)
    }

    pub fn base(&self) -> &[Arc<Record>] {
        &self.base
    }

    /// Rows passing the current filter, before sorting.
    pub fn filtered(&self) -> &[Arc<Record>] {
        &self.filtered
    }

    /// Filtered rows in display order (flat).
    pub fn rows(&self) -> &[Arc<Record>] {
        &self.ordered
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort_spec(&self) -> &SortSpec {
        &self.sort_spec
    }

    /// The sorting panel's state for `field`.
    pub fn sort_state(&self, field: Field) -> SortState {
        self.sort_toggles.state(field)
    }

    pub fn group_spec(&self) -> &GroupSpec {
        &self.group_spec
    }

    /// Grouping field staged but not yet applied.
    pub fn staged_grouping(&self) -> Option<Field> {
        self.staged_group
    }

    pub fn visibility(&self) -> &ColumnVisibility {
        &self.visibility
    }

    pub fn column_selection(&self) -> &VisibilitySelection {
        &self.selection
    }

    pub fn stats(&self) -> ViewStats {
        self.stats
    }

    /// Distinct categories of the base collection, first occurrence first.
    pub fn category_options(&self) -> Vec<String> {
        distinct_values(&self.base, Field::Category)
    }

    /// Distinct subcategories of the base collection, first occurrence first.
    pub fn subcategory_options(&self) -> Vec<String> {
        distinct_values(&self.base, Field::Subcategory)
    }

    /// Apply one action and recompute whatever depends on it.
    pub fn dispatch(&mut self, action: ViewAction) {
        match action {
            ViewAction::SetFilter(criteria) => self.on_filter_change(criteria),
            ViewAction::SetSearchQuery(query) => self.update_criteria(|c| c.search_query = query),
            ViewAction::SetCategories(set) => self.update_criteria(|c| c.categories = set),
            ViewAction::SetSubcategories(set) => self.update_criteria(|c| c.subcategories = set),
            ViewAction::SetPriceRange(range) => self.update_criteria(|c| c.price_range = range),
            ViewAction::SetCreatedAtRange(range) => self.update_criteria(|c| c.created_at_range = range),
            ViewAction::SetUpdatedAtRange(range) => self.update_criteria(|c| c.updated_at_range = range),
            ViewAction::ClearFilters => self.update_criteria(FilterCriteria::clear),

            ViewAction::ToggleSort(field) => {
                let state = self.sort_toggles.toggle(field);
                self.sort_spec.set(field, state);
                self.resort();
            }
            ViewAction::SetSort(field, state) => {
                self.sort_toggles.set(field, state);
                self.sort_spec.set(field, state);
                self.resort();
            }
            ViewAction::ClearSorting => {
                for (field, state) in self.sort_toggles.clear(&Field::ALL) {
                    self.sort_spec.set(field, state);
                }
                self.resort();
            }

            ViewAction::StageGrouping(field) => match field {
                Some(f) if !f.groupable() => {
                    self.ignore(format!("field '{f}' is not groupable"));
                }
                _ => self.staged_group = field,
            },
            ViewAction::ApplyGrouping => self.commit_grouping(),
            ViewAction::ClearGrouping => {
                self.staged_group = None;
                self.commit_grouping();
            }

            ViewAction::SetColumnVisible(field, visible) => {
                self.visibility.set_visible(field, visible);
                self.visibility_changed();
            }
            ViewAction::ToggleColumnSelection(field) => self.selection.toggle(field),
            ViewAction::ApplyColumnSelection => {
                for (field, hidden) in self.selection.apply() {
                    self.visibility.set_visible(field, !hidden);
                }
                self.visibility_changed();
            }
            ViewAction::ShowAllColumns => {
                for (field, hidden) in self.selection.show_all() {
                    self.visibility.set_visible(field, !hidden);
                }
                self.visibility.show_all(&Field::ALL);
                self.visibility_changed();
            }
        }
    }

    /// Replace the filter criteria and recompute.
    pub fn on_filter_change(&mut self, criteria: FilterCriteria) {
        self.update_criteria(|c| *c = criteria);
    }

    /// Live search: recompute on every keystroke.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.dispatch(ViewAction::SetSearchQuery(query.into()));
    }

    pub fn set_categories<I, S>(&mut self, categories: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = categories.into_iter().map(Into::into).collect();
        self.dispatch(ViewAction::SetCategories(set));
    }

    pub fn set_subcategories<I, S>(&mut self, subcategories: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = subcategories.into_iter().map(Into::into).collect();
        self.dispatch(ViewAction::SetSubcategories(set));
    }

    pub fn set_price_range(&mut self, min: f64, max: f64) {
        self.dispatch(ViewAction::SetPriceRange(PriceRange::new(min, max)));
    }

    pub fn set_created_at_range(&mut self, min: Option<Timestamp>, max: Option<Timestamp>) {
        self.dispatch(ViewAction::SetCreatedAtRange(DateRange::new(min, max)));
    }

    pub fn set_updated_at_range(&mut self, min: Option<Timestamp>, max: Option<Timestamp>) {
        self.dispatch(ViewAction::SetUpdatedAtRange(DateRange::new(min, max)));
    }

    pub fn clear_filters(&mut self) {
        self.dispatch(ViewAction::ClearFilters);
    }

    /// Toggle `field` through the sort cycle; returns its new state.
    pub fn toggle_sort(&mut self, field: Field) -> SortState {
        self.dispatch(ViewAction::ToggleSort(field));
        self.sort_toggles.state(field)
    }

    /// Sorting panel callback. `direction` is `""`, `"asc"` or `"desc"`.
    pub fn on_column_sort_change(&mut self, field: &str, direction: &str) {
        let Some(field) = self.parse_field(field) else {
            return;
        };
        match direction.parse::<SortState>() {
            Ok(state) => self.dispatch(ViewAction::SetSort(field, state)),
            Err(err) => self.ignore(err.to_string()),
        }
    }

    pub fn clear_sorting(&mut self) {
        self.dispatch(ViewAction::ClearSorting);
    }

    /// Grouping panel callback; an empty name stages "no grouping".
    pub fn on_grouping_change(&mut self, field: &str) {
        if field.is_empty() {
            self.dispatch(ViewAction::StageGrouping(None));
            return;
        }
        if let Some(field) = self.parse_field(field) {
            self.dispatch(ViewAction::StageGrouping(Some(field)));
        }
    }

    pub fn on_apply_grouping(&mut self) {
        self.dispatch(ViewAction::ApplyGrouping);
    }

    /// Stage and apply "no grouping", restoring the flat view.
    pub fn clear_grouping(&mut self) {
        self.dispatch(ViewAction::ClearGrouping);
    }

    /// Column toggle callback.
    pub fn on_column_visibility_change(&mut self, field: &str, hidden: bool) {
        if let Some(field) = self.parse_field(field) {
            self.dispatch(ViewAction::SetColumnVisible(field, !hidden));
        }
    }

    pub fn set_visible(&mut self, field: Field, visible: bool) {
        self.dispatch(ViewAction::SetColumnVisible(field, visible));
    }

    pub fn toggle_column_selection(&mut self, field: Field) {
        self.dispatch(ViewAction::ToggleColumnSelection(field));
    }

    /// Commit the staged show/hide selection for every known field.
    pub fn apply_column_selection(&mut self) {
        self.dispatch(ViewAction::ApplyColumnSelection);
    }

    pub fn show_all(&mut self) {
        self.dispatch(ViewAction::ShowAllColumns);
    }

    /// Build the display-ready structure from the current state.
    pub fn render(&self) -> RenderedView {
        RenderedView {
            columns: self.visibility.visible_fields(&Field::ALL),
            rows: group_records(&self.ordered, &self.group_spec),
        }
    }

    fn update_criteria(&mut self, update: impl FnOnce(&mut FilterCriteria)) {
        update(&mut self.criteria);
        self.refilter();
    }

    fn refilter(&mut self) {
        let inverted = self.criteria.inverted_ranges();
        if !inverted.is_empty() {
            tracing::warn!(
                ranges = ?inverted,
                criteria = ?self.criteria,
                "filter has an inverted range; it will match nothing"
            );
        }

        self.filtered = self.engine.apply(&self.base, &self.criteria);
        self.stats.filter_runs += 1;
        self.stats.filtered_rows = self.filtered.len();
        self.emit(ViewEvent::Filtered {
            base_rows: self.base.len(),
            filtered_rows: self.filtered.len(),
        });

        self.resort();
    }

    fn resort(&mut self) {
        let mut ordered = self.filtered.clone();
        sort_records(&mut ordered, &self.sort_spec);
        self.ordered = ordered;
        self.stats.sort_runs += 1;
        self.emit(ViewEvent::Sorted {
            keys: self.sort_spec.keys().to_vec(),
            rows: self.ordered.len(),
        });
    }

    fn commit_grouping(&mut self) {
        if self.group_spec.set(self.staged_group) {
            self.stats.grouping_changes += 1;
            self.emit(ViewEvent::GroupingChanged {
                field: self.group_spec.field(),
            });
        }
    }

    fn visibility_changed(&mut self) {
        self.stats.visibility_changes += 1;
        self.emit(ViewEvent::VisibilityChanged {
            visible_columns: self.visibility.visible_fields(&Field::ALL).len(),
        });
    }

    fn parse_field(&mut self, name: &str) -> Option<Field> {
        match name.parse::<Field>() {
            Ok(field) => Some(field),
            Err(err) => {
                self.ignore(err.to_string());
                None
            }
        }
    }

    fn ignore(&mut self, reason: String) {
        tracing::debug!(%reason, "view action ignored");
        self.stats.ignored_actions += 1;
        self.emit(ViewEvent::Ignored { reason });
    }

    fn emit(&self, event: ViewEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}
