//! Pagination arithmetic
//!
//! Pure window and navigation math over (count, page size, current page).
//! Pages and positions are 1-based throughout; a window that would start
//! past the last item simply does not exist.

/// Labels used by [`nav_entries`] for the relative navigation entries.
#[derive(Debug, Clone)]
pub struct NavLabels {
    pub previous: String,
    pub next: String,
    pub previous_group: String,
    pub next_group: String,
}

impl Default for NavLabels {
    fn default() -> Self {
        Self {
            previous: "<".to_string(),
            next: ">".to_string(),
            previous_group: "\u{2026}".to_string(),
            next_group: "\u{2026}".to_string(),
        }
    }
}

/// One entry in a navigation strip.
///
/// `page` is the navigation target; it is `None` for the current page, which
/// renders as a label with nowhere to go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub page: Option<usize>,
    pub label: String,
}

impl NavEntry {
    fn new(page: impl Into<Option<usize>>, label: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            label: label.into(),
        }
    }
}

/// Computes the 1-based inclusive item bounds of `page`.
///
/// Returns `None` when the page's start position exceeds `count`, i.e. the
/// requested page is past the last valid one.
pub fn window(page: usize, page_size: usize, count: usize) -> Option<(usize, usize)> {
    let page = page.max(1);
    let start = (page - 1) * page_size + 1;
    if start > count {
        return None;
    }
    Some((start, (page * page_size).min(count)))
}

/// Number of pages needed for `count` items at `page_size` per page.
///
/// Always at least 1, and exactly 1 when `count` is 0.
pub fn page_count(page_size: usize, count: usize) -> usize {
    if page_size == 0 || count == 0 {
        return 1;
    }
    count.div_ceil(page_size)
}

/// Page numbers centered on `page` with `buffer` pages on each side, clipped
/// to `[1, pages]`.
///
/// Run-off past either end is redistributed to the other side, so the list
/// keeps its full `2 * buffer + 1` length whenever enough pages exist.
pub fn page_numbers(buffer: usize, page: usize, pages: usize) -> Vec<usize> {
    let pages = pages.max(1) as i64;
    let page = (page.max(1) as i64).min(pages);
    let buffer = buffer as i64;

    let mut low = page - buffer;
    let mut high = page + buffer;

    // low-side run-off extends the high side
    if low < 1 {
        high += 1 - low;
        low = 1;
    }
    // high-side run-off extends the low side
    if high > pages {
        low = (low - (high - pages)).max(1);
        high = pages;
    }

    (low..=high).map(|p| p as usize).collect()
}

/// Builds a human-navigable page strip with previous/next and group jumps.
///
/// Emits, in order: a previous entry (unless on page 1), a first-page entry
/// and a jump-back ellipsis (when the window's first page is at, respectively
/// strictly beyond, `buffer`), the windowed page numbers themselves (current
/// page with a `None` target), a jump-forward ellipsis and last-page entry
/// (unless the window already ends on the final page), and a next entry
/// (unless on the last page).
pub fn nav_entries(buffer: usize, page: usize, pages: usize, labels: &NavLabels) -> Vec<NavEntry> {
    let pages = pages.max(1);
    let page = page.clamp(1, pages);
    let numbers = page_numbers(buffer, page, pages);
    let mut nav = Vec::new();

    // previous page
    if page > 1 {
        nav.push(NavEntry::new(page - 1, labels.previous.clone()));
    }

    // first page and jump back
    if let Some(&first) = numbers.first() {
        if first >= buffer && first > 1 {
            nav.push(NavEntry::new(1, "1"));
            if first > buffer {
                nav.push(NavEntry::new(
                    first.saturating_sub(buffer).max(1),
                    labels.previous_group.clone(),
                ));
            }
        }
    }

    // windowed pages, current page with no target
    for &number in &numbers {
        let target = (number != page).then_some(number);
        nav.push(NavEntry {
            page: target,
            label: number.to_string(),
        });
    }

    // jump forward and last page
    if let Some(&last) = numbers.last()
        && last != pages
    {
        if last < pages - 1 {
            nav.push(NavEntry::new(
                (last + buffer + 1).min(pages),
                labels.next_group.clone(),
            ));
        }
        nav.push(NavEntry::new(pages, pages.to_string()));
    }

    // next page
    if page < pages {
        nav.push(NavEntry::new(page + 1, labels.next.clone()));
    }

    nav
}
