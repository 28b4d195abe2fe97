//! Ephemeral table state
//!
//! Search term, sort, page and column widths. Never persisted.

use std::collections::BTreeMap;

use serde::Serialize;

use super::paginate::{clamp_page, total_pages};
use super::sorter::{SortDirection, SortSpec};

/// Column width defaults, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WidthDefaults {
    pub first: u32,
    pub rest: u32,
    pub min: u32,
}

impl Default for WidthDefaults {
    fn default() -> Self {
        Self {
            first: 180,
            rest: 150,
            min: 50,
        }
    }
}

/// UI-only parameters of the derived view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    search: String,
    sort: Option<SortSpec>,
    page: usize,
    page_size: usize,
    column_widths: BTreeMap<String, u32>,
    #[serde(skip)]
    widths: WidthDefaults,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(10, WidthDefaults::default())
    }
}

impl ViewState {
    /// Page 1, no search, no sort
    pub fn new(page_size: usize, widths: WidthDefaults) -> Self {
        Self {
            search: String::new(),
            sort: None,
            page: 1,
            page_size: page_size.max(1),
            column_widths: BTreeMap::new(),
            widths,
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// Current 1-based page
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn column_widths(&self) -> &BTreeMap<String, u32> {
        &self.column_widths
    }

    /// Width of one column, if initialised
    pub fn column_width(&self, column: &str) -> Option<u32> {
        self.column_widths.get(column).copied()
    }

    /// Replace the search term; back to page 1
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.page = 1;
    }

    /// Same column ascending flips to descending; anything else sorts
    /// ascending. Back to page 1.
    pub fn toggle_sort(&mut self, column: &str) {
        let direction = match &self.sort {
            Some(spec) if spec.column == column && spec.direction == SortDirection::Asc => {
                SortDirection::Desc
            }
            _ => SortDirection::Asc,
        };
        self.sort = Some(SortSpec {
            column: column.to_string(),
            direction,
        });
        self.page = 1;
    }

    /// Set or clear the sort directly; back to page 1
    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
        self.page = 1;
    }

    /// Move to `page`, clamped into `[1, total]` for `filtered` rows.
    ///
    /// Returns the page actually selected.
    pub fn set_page(&mut self, page: usize, filtered: usize) -> usize {
        self.page = clamp_page(page, total_pages(filtered, self.page_size));
        self.page
    }

    /// Rows per page (at least one); back to page 1
    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.page = 1;
    }

    /// Set a column's width, never below the minimum
    pub fn resize_column(&mut self, column: &str, width: u32) {
        self.column_widths
            .insert(column.to_string(), width.max(self.widths.min));
    }

    /// Give every column its default width, only if none are set yet
    pub fn init_column_widths(&mut self, columns: &[String]) {
        if !self.column_widths.is_empty() {
            return;
        }
        for (i, column) in columns.iter().enumerate() {
            let width = if i == 0 {
                self.widths.first
            } else {
                self.widths.rest
            };
            self.column_widths.insert(column.clone(), width);
        }
    }

    /// Forget widths, e.g. when the column set changes
    pub fn reset_column_widths(&mut self) {
        self.column_widths.clear();
    }

    pub(crate) fn clamp_page_to(&mut self, total: usize) {
        self.page = clamp_page(self.page, total);
    }
}

/// Header text for a column key: first letter upper-cased, `_` → space
pub fn column_label(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>().replace('_', " "),
        None => String::new(),
    }
}
