//! Derived View Pipeline Tests
//!
//! filter → sort → paginate over an immutable result set.

use querydeck::catalog::Row;
use querydeck::view::{self, column_label, SortDirection, SortSpec, ViewState, WidthDefaults};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn rows(values: &[Value]) -> Vec<Row> {
    values
        .iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect()
}

fn numbered(n: usize) -> Vec<Row> {
    (1..=n)
        .map(|i| json!({"id": i, "name": format!("row {}", i)}))
        .map(|v| v.as_object().cloned().unwrap())
        .collect()
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn ids(slice: &view::ViewSlice<'_>) -> Vec<i64> {
    slice.rows.iter().map(|r| r["n"].as_i64().unwrap()).collect()
}

// =============================================================================
// Sort Tests
// =============================================================================

/// Toggling a column sorts ascending, then descending.
#[test]
fn test_sort_toggle() {
    let data = rows(&[json!({"n": 3}), json!({"n": 1}), json!({"n": 2})]);
    let cols = columns(&["n"]);
    let mut state = ViewState::default();

    assert_eq!(ids(&view::compute(&data, &cols, &mut state)), vec![3, 1, 2]);

    state.toggle_sort("n");
    assert_eq!(ids(&view::compute(&data, &cols, &mut state)), vec![1, 2, 3]);

    state.toggle_sort("n");
    assert_eq!(state.sort().unwrap().direction, SortDirection::Desc);
    assert_eq!(ids(&view::compute(&data, &cols, &mut state)), vec![3, 2, 1]);
}

/// Sorting never reorders the underlying rows.
#[test]
fn test_input_not_mutated() {
    let data = rows(&[json!({"n": 3}), json!({"n": 1}), json!({"n": 2})]);
    let before = data.clone();
    let mut state = ViewState::default();
    state.set_sort(Some(SortSpec::desc("n")));

    view::compute(&data, &columns(&["n"]), &mut state);
    assert_eq!(data, before);
}

// =============================================================================
// Filter Tests
// =============================================================================

/// Search matches number text, case-insensitively, across visible columns.
#[test]
fn test_filter_matches_display_text() {
    let data = rows(&[
        json!({"n": 3, "city": "Berlin"}),
        json!({"n": 12, "city": "London"}),
        json!({"n": 2, "city": null}),
    ]);
    let cols = columns(&["n", "city"]);
    let mut state = ViewState::default();

    state.set_search("2");
    assert_eq!(ids(&view::compute(&data, &cols, &mut state)), vec![12, 2]);

    state.set_search("BER");
    assert_eq!(ids(&view::compute(&data, &cols, &mut state)), vec![3]);

    state.set_search("null");
    assert!(view::compute(&data, &cols, &mut state).rows.is_empty());
}

// =============================================================================
// Pagination Tests
// =============================================================================

/// 23 rows at 10 per page make 3 pages; the last has 3 rows.
#[test]
fn test_page_count_and_last_page() {
    let data = numbered(23);
    let cols = columns(&["id", "name"]);
    let mut state = ViewState::default();

    let first = view::compute(&data, &cols, &mut state);
    assert_eq!(first.total_pages, 3);
    assert_eq!(first.rows.len(), 10);

    assert_eq!(state.set_page(3, first.filtered_count), 3);
    let last = view::compute(&data, &cols, &mut state);
    assert_eq!(last.rows.len(), 3);
    assert_eq!(last.start_offset, 20);
}

/// With 23 rows and page size 10, a request for page 5 clamps to page 3.
#[test]
fn test_page_out_of_range_clamped() {
    let data = numbered(23);
    let cols = columns(&["id"]);
    let mut state = ViewState::default();
    let slice = view::compute(&data, &cols, &mut state);

    assert_eq!(state.set_page(5, slice.filtered_count), 3);
    let slice = view::compute(&data, &cols, &mut state);
    assert_eq!(slice.page, 3);
    assert_eq!(slice.total_pages, 3);
    assert_eq!(slice.rows.len(), 3);

    assert_eq!(state.set_page(0, slice.filtered_count), 1);
    let slice = view::compute(&data, &cols, &mut state);
    assert_eq!(slice.page, 1);
    assert_eq!(slice.start_offset, 0);
}

/// A page left stale by a shrinking result set is clamped.
#[test]
fn test_stale_page_clamped() {
    let big = numbered(50);
    let small = numbered(23);
    let cols = columns(&["id"]);
    let mut state = ViewState::default();

    let slice = view::compute(&big, &cols, &mut state);
    assert_eq!(state.set_page(5, slice.filtered_count), 5);

    let slice = view::compute(&small, &cols, &mut state);
    assert_eq!(slice.page, 3);
    assert_eq!(state.page(), 3);
}

/// An empty result still reports one page.
#[test]
fn test_empty_result_one_page() {
    let mut state = ViewState::default();
    let slice = view::compute(&[], &columns(&["id"]), &mut state);
    assert_eq!(slice.total_pages, 1);
    assert_eq!(slice.page, 1);
    assert!(slice.rows.is_empty());
}

// =============================================================================
// Column Tests
// =============================================================================

/// First column is wider; resizes never go below the minimum.
#[test]
fn test_column_widths() {
    let mut state = ViewState::new(10, WidthDefaults::default());
    state.init_column_widths(&columns(&["id", "name"]));
    assert_eq!(state.column_width("id"), Some(180));
    assert_eq!(state.column_width("name"), Some(150));

    state.resize_column("name", 10);
    assert_eq!(state.column_width("name"), Some(50));

    // widths already set are kept
    state.init_column_widths(&columns(&["id", "name"]));
    assert_eq!(state.column_width("name"), Some(50));
}

#[test]
fn test_column_labels() {
    assert_eq!(column_label("unit_price"), "Unit price");
    assert_eq!(column_label("CustomerID"), "CustomerID");
}
