//! Page-window arithmetic for bounded listings.

use serde::Serialize;

/// Smallest page size ever used.
pub const MIN_PER_PAGE: usize = 2;

/// The slice of a listing that one page covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageWindow {
    pub count: usize,
    pub per_page: usize,
    /// Zero-based.
    pub current_page: usize,
    pub skip: usize,
    /// Exclusive end of this page's slice.
    pub next_offset: usize,
    /// 1-based page numbers covering the whole listing.
    pub page_numbers: Vec<usize>,
}

impl PageWindow {
    /// Row limit for a store query.
    pub fn limit(&self) -> usize {
        self.per_page
    }
}

/// Compute the window for a 1-based `page` request over `count` items.
///
/// `per_page` falls back to `default_per_page` and is never below
/// [`MIN_PER_PAGE`]. Missing or non-positive pages mean the first page.
pub fn paginate(
    count: usize,
    page: Option<i64>,
    per_page: Option<i64>,
    default_per_page: usize,
) -> PageWindow {
    let requested = per_page.unwrap_or_else(|| i64::try_from(default_per_page).unwrap_or(i64::MAX));
    let per_page = usize::try_from(requested)
        .unwrap_or(MIN_PER_PAGE)
        .max(MIN_PER_PAGE);

    let current_page = page
        .map(|p| p.saturating_sub(1).max(0))
        .and_then(|p| usize::try_from(p).ok())
        .unwrap_or(0);

    let skip = current_page.saturating_mul(per_page);
    let next_offset = skip.saturating_add(per_page).min(count);

    let extra_pages = if count % per_page > 0 { 2 } else { 1 };
    let page_numbers = (1..count / per_page + extra_pages).collect();

    PageWindow {
        count,
        per_page,
        current_page,
        skip,
        next_offset,
        page_numbers,
    }
}
