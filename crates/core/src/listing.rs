//! Search and pagination for the admin artist list.

use serde::Serialize;

/// Artists shown per admin page.
pub const ARTISTS_PER_PAGE: usize = 8;

/// Case-insensitive substring match on an artist's name or project name.
/// A blank search term matches everything.
pub fn matches_search(name: &str, project_name: &str, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    name.to_lowercase().contains(&term) || project_name.to_lowercase().contains(&term)
}

/// One page of a filtered list.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually returned.
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Slice `items` into the requested 1-based page.
///
/// Page 0 is treated as page 1; a page past the end is clamped to the last
/// page. An empty list yields page 1 of 0 with no items.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(per_page);
    let page = page.clamp(1, total_pages.max(1));
    let start = (page - 1) * per_page;

    let items = items.into_iter().skip(start).take(per_page).collect();
    Page {
        items,
        page,
        per_page,
        total,
        total_pages,
    }
}
