//! Page-window arithmetic and page navigation state

use crate::constants::gallery::PAGE_SIZE;

/// Result of paginating a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Number of pages, never below 1
    pub total_pages: usize,
    /// First index shown (inclusive)
    pub start: usize,
    /// One past the last index shown
    pub end: usize,
}

impl PageWindow {
    /// Number of items in the window
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the window shows nothing
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Window as a slice range
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

/// Number of pages needed for `total_items`; an empty result still has one page
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    assert!(page_size > 0, "page size must be positive");
    total_items.div_ceil(page_size).max(1)
}

/// Compute the page count and the half-open index window of `current_page`
///
/// Pages are 1-based. A page past the end yields an empty window at
/// `total_items` rather than an inverted range.
pub fn paginate(total_items: usize, current_page: usize, page_size: usize) -> PageWindow {
    let total_pages = total_pages(total_items, page_size);
    let start = current_page
        .saturating_sub(1)
        .saturating_mul(page_size)
        .min(total_items);
    let end = start.saturating_add(page_size).min(total_items);

    PageWindow {
        total_pages,
        start,
        end,
    }
}

/// Navigation state for one browsing session
///
/// Owned by the presentation layer and passed into each recomputation.
/// `1 <= current_page <= total_pages` holds after every [`PageState::recount`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    current_page: usize,
    total_pages: usize,
    page_size: usize,
}

impl PageState {
    /// Fresh state on page 1 of 1
    pub fn new() -> Self {
        Self::with_page_size(PAGE_SIZE)
    }

    /// Fresh state with a custom page size
    pub fn with_page_size(page_size: usize) -> Self {
        assert!(page_size > 0, "page size must be positive");
        Self {
            current_page: 1,
            total_pages: 1,
            page_size,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Whether a next page exists
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Whether a previous page exists
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Move to the next page; no-op on the last page
    pub fn advance(&mut self) -> bool {
        if self.has_next() {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Move to the previous page; no-op on the first page
    pub fn retreat(&mut self) -> bool {
        if self.has_previous() {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to a page if it exists
    pub fn go_to(&mut self, page: usize) -> bool {
        if (1..=self.total_pages).contains(&page) {
            self.current_page = page;
            true
        } else {
            false
        }
    }

    /// Recompute the page count after the filtered set changed
    ///
    /// If the current page no longer exists the state goes back to page 1,
    /// not to the last page. Returns true when that reset happened.
    pub fn recount(&mut self, total_items: usize) -> bool {
        self.total_pages = total_pages(total_items, self.page_size);
        if self.current_page > self.total_pages {
            self.current_page = 1;
            true
        } else {
            false
        }
    }

    /// Window for the current page over `total_items`
    pub fn window(&self, total_items: usize) -> PageWindow {
        paginate(total_items, self.current_page, self.page_size)
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new()
    }
}
