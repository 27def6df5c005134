//! Search filtering and pagination over an in-memory working set.
//!
//! Filtering always runs before pagination, on every fetch; the view is a
//! derived slice, never stored incrementally.

use serde::Serialize;

use crate::Resource;

/// Page size used when a query leaves `per_page` unset (zero).
pub const DEFAULT_PER_PAGE: usize = 10;

/// The query a store reads when fetching: search text plus page position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    pub page: usize,
    pub per_page: usize,
    pub search: String,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            search: String::new(),
        }
    }
}

impl PageQuery {
    /// Zero values fall back to the defaults instead of producing a
    /// degenerate slice.
    fn normalized(&self) -> (usize, usize) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = if self.per_page == 0 {
            DEFAULT_PER_PAGE
        } else {
            self.per_page
        };
        (page, per_page)
    }
}

/// One page of a filtered working set, plus its position within the
/// whole.
///
/// `from`/`to` are 1-based and describe the slice actually returned; an
/// empty slice reports `from = 0, to = 0`. `last_page` is always
/// `ceil(total / per_page)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginatedView<R> {
    pub items: Vec<R>,
    pub from: usize,
    pub to: usize,
    pub total: usize,
    pub per_page: usize,
    pub current_page: usize,
    pub last_page: usize,
}

impl<R> Default for PaginatedView<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            from: 0,
            to: 0,
            total: 0,
            per_page: DEFAULT_PER_PAGE,
            current_page: 1,
            last_page: 1,
        }
    }
}

/// Case-insensitive substring filter over the entity's searchable
/// fields. An empty needle keeps everything.
pub fn filter_records<R: Resource>(records: &[R], search: &str) -> Vec<R> {
    if search.is_empty() {
        return records.to_vec();
    }
    let needle = search.to_lowercase();
    records
        .iter()
        .filter(|record| {
            record
                .search_text()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// Slice `records` according to `query`.
///
/// An out-of-range page yields an empty `items` but a still-valid view;
/// `to` never exceeds `total`.
pub fn paginate<R: Clone>(records: &[R], query: &PageQuery) -> PaginatedView<R> {
    let (page, per_page) = query.normalized();
    let total = records.len();
    let start = (page - 1) * per_page;

    let items: Vec<R> = records.iter().skip(start).take(per_page).cloned().collect();
    let (from, to) = if items.is_empty() {
        (0, 0)
    } else {
        (start + 1, start + items.len())
    };

    PaginatedView {
        items,
        from,
        to,
        total,
        per_page,
        current_page: page,
        last_page: total.div_ceil(per_page),
    }
}
