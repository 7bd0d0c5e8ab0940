//! Listing pagination

use serde::Serialize;

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// 1-based page number after clamping
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Paginated<T> {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Slice `items` into the requested page
///
/// Page numbers are clamped into `1..=total_pages`; an empty listing still
/// has one (empty) page. A `per_page` of zero is treated as one.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Paginated<T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);

    let items = items
        .into_iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .collect();

    Paginated {
        items,
        page,
        per_page,
        total_items,
        total_pages,
    }
}
