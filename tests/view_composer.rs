use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use table_explorer::ingestion::json::ingest_json_from_path;
use table_explorer::processing::{FilterCriteria, GroupChildren, SortDirection, SortKey, SortState};
use table_explorer::types::{Field, Record, RecordId, Timestamp};
use table_explorer::view::{ViewAction, ViewComposer, ViewEvent, ViewObserver, ViewOptions};

fn ts(y: i32, m: u32, d: u32) -> Timestamp {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn rec(id: i64, category: &str, price: f64) -> Record {
    Record {
        id: RecordId::Int(id),
        name: format!("item {id}"),
        category: category.to_string(),
        subcategory: format!("{category}-sub"),
        created_at: ts(2024, 1, id as u32),
        updated_at: ts(2024, 2, id as u32),
        price,
        sale_price: price,
    }
}

fn abc() -> Vec<Record> {
    vec![rec(1, "A", 10.0), rec(2, "B", 5.0), rec(3, "A", 20.0)]
}

fn products() -> ViewComposer {
    let records = ingest_json_from_path("tests/fixtures/products.json").unwrap();
    ViewComposer::new(records, ViewOptions::default()).unwrap()
}

fn ids(view: &ViewComposer) -> Vec<i64> {
    view.render()
        .rows
        .rows()
        .iter()
        .map(|r| match r.id {
            RecordId::Int(v) => v,
            RecordId::Text(_) => -1,
        })
        .collect()
}

#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<ViewEvent>>,
}

impl ViewObserver for RecordingObserver {
    fn on_event(&self, event: &ViewEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

#[test]
fn defaults_render_the_base_collection_in_order() {
    let view = ViewComposer::new(abc(), ViewOptions::default()).unwrap();
    assert_eq!(ids(&view), vec![1, 2, 3]);
    assert_eq!(view.render().columns, Field::ALL.to_vec());
}

#[test]
fn filter_then_sort_example() {
    let mut view = ViewComposer::new(abc(), ViewOptions::default()).unwrap();

    view.set_categories(["A"]);
    assert_eq!(ids(&view), vec![1, 3]);

    view.on_column_sort_change("price", "desc");
    assert_eq!(ids(&view), vec![3, 1]);
}

#[test]
fn sorting_never_sees_filtered_out_rows() {
    let mut view = ViewComposer::new(abc(), ViewOptions::default()).unwrap();
    view.toggle_sort(Field::Price);
    assert_eq!(ids(&view), vec![2, 1, 3]);

    view.set_price_range(6.0, 100.0);
    assert_eq!(ids(&view), vec![1, 3]);

    view.clear_filters();
    assert_eq!(ids(&view), vec![2, 1, 3]);
}

#[test]
fn toggling_sort_three_times_returns_to_unsorted() {
    let mut view = ViewComposer::new(abc(), ViewOptions::default()).unwrap();

    assert_eq!(view.toggle_sort(Field::Price), SortState::Asc);
    assert_eq!(view.toggle_sort(Field::Price), SortState::Desc);
    assert_eq!(ids(&view), vec![3, 1, 2]);
    assert_eq!(view.toggle_sort(Field::Price), SortState::Unsorted);

    assert!(view.sort_spec().is_empty());
    assert_eq!(ids(&view), vec![1, 2, 3]);
}

#[test]
fn multi_column_sort_uses_toggle_order_as_priority() {
    let mut view = ViewComposer::new(
        vec![rec(1, "B", 5.0), rec(2, "A", 10.0), rec(3, "A", 20.0), rec(4, "B", 7.0)],
        ViewOptions::default(),
    )
    .unwrap();

    view.toggle_sort(Field::Category);
    view.toggle_sort(Field::Price);
    view.toggle_sort(Field::Price);

    assert_eq!(
        view.sort_spec().keys(),
        &[
            SortKey::new(Field::Category, SortDirection::Asc),
            SortKey::new(Field::Price, SortDirection::Desc),
        ]
    );
    assert_eq!(ids(&view), vec![3, 2, 4, 1]);
}

#[test]
fn clear_sorting_resets_every_field() {
    let mut view = ViewComposer::new(abc(), ViewOptions::default()).unwrap();
    view.toggle_sort(Field::Category);
    view.toggle_sort(Field::Price);

    view.clear_sorting();

    assert!(view.sort_spec().is_empty());
    assert!(Field::ALL.iter().all(|&f| view.sort_state(f) == SortState::Unsorted));
    assert_eq!(ids(&view), vec![1, 2, 3]);
}

#[test]
fn grouping_is_staged_until_applied() {
    let mut view = products();

    view.on_grouping_change("category");
    assert_eq!(view.staged_grouping(), Some(Field::Category));
    assert!(view.render().rows.groups().is_empty());

    view.on_apply_grouping();
    let rendered = view.render();
    let keys: Vec<&str> = rendered.rows.groups().iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["Electronics", "Home", "Sports"]);
    assert_eq!(rendered.row_count(), 8);

    view.clear_grouping();
    assert!(view.group_spec().is_none());
    assert!(view.render().rows.groups().is_empty());
    assert_eq!(view.render().row_count(), 8);
}

#[test]
fn grouping_follows_sort_over_the_grouping_field() {
    let mut view = products();
    view.on_column_sort_change("category", "desc");
    view.on_grouping_change("category");
    view.on_apply_grouping();

    let rendered = view.render();
    let keys: Vec<&str> = rendered.rows.groups().iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["Sports", "Home", "Electronics"]);
}

#[test]
fn grouping_after_single_category_filter_yields_one_group() {
    let mut view = products();
    view.set_categories(["Home"]);
    view.on_grouping_change("category");
    view.on_apply_grouping();

    let rendered = view.render();
    assert_eq!(rendered.rows.groups().len(), 1);
    let group = &rendered.rows.groups()[0];
    assert_eq!(group.key, "Home");
    match &group.children {
        GroupChildren::Rows(rows) => assert_eq!(rows.len(), 3),
        GroupChildren::Groups(_) => panic!("single-level grouping expected"),
    }
}

#[test]
fn non_groupable_fields_are_ignored() {
    let mut view = products();
    view.on_grouping_change("price");
    view.on_apply_grouping();
    assert!(view.group_spec().is_none());
    assert_eq!(view.stats().ignored_actions, 1);
}

#[test]
fn unknown_field_names_are_no_ops() {
    let mut view = products();
    let before = view.render();

    view.on_column_sort_change("colour", "asc");
    view.on_column_visibility_change("colour", true);
    view.on_grouping_change("colour");
    view.on_column_sort_change("price", "sideways");

    assert_eq!(view.render(), before);
    assert_eq!(view.stats().ignored_actions, 4);
}

#[test]
fn visibility_never_changes_rows() {
    let mut view = products();
    view.set_search_query("lamp");
    view.toggle_sort(Field::Price);
    view.on_grouping_change("subcategory");
    view.on_apply_grouping();
    let before = view.render().rows;

    view.on_column_visibility_change("name", true);
    view.on_column_visibility_change("price", true);
    let after = view.render();

    assert_eq!(after.rows, before);
    assert!(!after.columns.contains(&Field::Name));
    assert!(!after.columns.contains(&Field::Price));

    view.show_all();
    assert_eq!(view.render().columns, Field::ALL.to_vec());
    assert_eq!(view.render().rows, before);
}

#[test]
fn applying_column_selection_hides_unselected_fields() {
    let mut view = products();
    view.toggle_column_selection(Field::CreatedAt);
    view.toggle_column_selection(Field::UpdatedAt);
    // staged only
    assert_eq!(view.render().columns.len(), Field::ALL.len());

    view.apply_column_selection();
    let rendered = view.render();
    assert_eq!(rendered.columns.len(), Field::ALL.len() - 2);
    assert_eq!(
        rendered.headers(),
        vec!["ID", "Name", "Category", "Subcategory", "Price", "Sale Price"]
    );

    let rows = rendered.rows.rows();
    let cells = rendered.project(rows[0]);
    assert_eq!(cells.len(), 6);
    assert_eq!(cells[1].1.to_string(), "Wireless Headphones");
}

#[test]
fn live_search_narrows_by_name() {
    let mut view = products();
    view.set_search_query("l");
    let broad = view.render().row_count();
    view.set_search_query("lamp");
    let narrow = ids(&view);

    assert!(broad >= narrow.len());
    let mut sorted = narrow.clone();
    sorted.sort();
    assert_eq!(sorted, vec![2, 5]);

    view.set_search_query("");
    assert_eq!(ids(&view), vec![1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn created_at_range_filters_and_updated_at_range_does_not() {
    let mut view = products();
    view.set_created_at_range(Some(ts(2024, 3, 1)), Some(ts(2024, 4, 30)));
    assert_eq!(ids(&view), vec![3, 4, 5, 6]);

    view.set_updated_at_range(Some(ts(2030, 1, 1)), None);
    assert_eq!(ids(&view), vec![3, 4, 5, 6]);
    assert!(view.criteria().updated_at_range.min.is_some());
}

#[test]
fn inverted_price_range_yields_no_rows() {
    let mut view = products();
    view.set_price_range(100.0, 10.0);
    assert_eq!(view.render().row_count(), 0);
}

#[test]
fn every_rendered_row_satisfies_the_criteria() {
    let mut view = products();
    let criteria = FilterCriteria::default()
        .with_categories(["Electronics", "Home"])
        .with_subcategories(["Audio", "Lighting", "Accessories"])
        .with_price_range(40.0, 150.0)
        .with_created_at_range(Some(ts(2024, 2, 1)), None);
    view.on_filter_change(criteria.clone());

    let rendered = view.render();
    assert_eq!(rendered.row_count(), 4);
    assert!(rendered.rows.rows().iter().all(|r| criteria.matches(r)));
}

#[test]
fn option_lists_come_from_the_base_collection() {
    let mut view = products();
    view.set_categories(["Sports"]);
    assert_eq!(view.category_options(), vec!["Electronics", "Home", "Sports"]);
    assert_eq!(
        view.subcategory_options(),
        vec!["Audio", "Lighting", "Accessories", "Decor", "Fitness"]
    );
}

#[test]
fn duplicate_ids_are_rejected() {
    let err = ViewComposer::new(vec![rec(1, "A", 1.0), rec(1, "B", 2.0)], ViewOptions::default()).unwrap_err();
    assert!(err.to_string().contains("duplicate record id '1'"));
}

#[test]
fn invalid_prices_are_rejected() {
    let mut negative = rec(2, "B", 5.0);
    negative.price = -1.0;
    let err = ViewComposer::new(vec![rec(1, "A", 1.0), negative], ViewOptions::default()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("row 2"));
    assert!(msg.contains("column 'price'"));

    let mut nan = rec(1, "A", 1.0);
    nan.sale_price = f64::NAN;
    assert!(ViewComposer::new(vec![nan], ViewOptions::default()).is_err());
}

#[test]
fn unknown_sort_direction_is_reported_to_observers() {
    let observer = Arc::new(RecordingObserver::default());
    let opts = ViewOptions {
        observer: Some(observer.clone()),
        ..Default::default()
    };
    let mut view = ViewComposer::new(abc(), opts).unwrap();
    view.on_column_sort_change("price", "sideways");

    let events = observer.events.lock().unwrap().clone();
    assert_eq!(
        events.last(),
        Some(&ViewEvent::Ignored {
            reason: "unknown sort direction 'sideways'".to_string()
        })
    );
}

#[test]
fn observer_sees_recomputes_in_pipeline_order() {
    let observer = Arc::new(RecordingObserver::default());
    let opts = ViewOptions {
        observer: Some(observer.clone()),
        ..Default::default()
    };
    let mut view = ViewComposer::new(abc(), opts).unwrap();
    observer.events.lock().unwrap().clear();

    view.dispatch(ViewAction::SetCategories(["A".to_string()].into_iter().collect()));
    view.dispatch(ViewAction::ToggleSort(Field::Price));

    let events = observer.events.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            ViewEvent::Filtered {
                base_rows: 3,
                filtered_rows: 2
            },
            ViewEvent::Sorted { keys: vec![], rows: 2 },
            ViewEvent::Sorted {
                keys: vec![SortKey::new(Field::Price, SortDirection::Asc)],
                rows: 2
            },
        ]
    );
    assert_eq!(view.stats().filtered_rows, 2);
}
