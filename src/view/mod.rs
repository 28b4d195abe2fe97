//! Derived view over a result set
//!
//! Fixed pipeline: filter → sort → paginate. The input rows are never
//! mutated; the output borrows from them.

mod filters;
mod paginate;
mod sorter;
mod state;

use serde::Serialize;

use crate::catalog::Row;

pub use filters::{display_text, SearchFilter};
pub use paginate::{clamp_page, page_bounds, total_pages};
pub use sorter::{ResultSorter, SortDirection, SortSpec};
pub use state::{column_label, ViewState, WidthDefaults};

/// The visible slice of a result set
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSlice<'a> {
    pub rows: Vec<&'a Row>,
    pub total_pages: usize,
    /// Index of the first visible row within the filtered rows
    pub start_offset: usize,
    pub filtered_count: usize,
    /// Page actually shown, after clamping
    pub page: usize,
}

/// Run the pipeline; clamps `view`'s page into range
pub fn compute<'a>(rows: &'a [Row], columns: &[String], view: &mut ViewState) -> ViewSlice<'a> {
    let mut filtered = SearchFilter::apply(rows, columns, view.search());

    if let Some(spec) = view.sort() {
        ResultSorter::sort(&mut filtered, spec);
    }

    let filtered_count = filtered.len();
    let total = total_pages(filtered_count, view.page_size());
    view.clamp_page_to(total);

    let (start, end) = page_bounds(view.page(), view.page_size(), filtered_count);
    let visible = filtered.drain(start..end).collect();

    ViewSlice {
        rows: visible,
        total_pages: total,
        start_offset: start,
        filtered_count,
        page: view.page(),
    }
}
