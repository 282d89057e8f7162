//! core::pagination
//!
//! Page math for the reconciled group list.
//!
//! # Design
//!
//! The pager never errors: out-of-range navigation clamps into
//! `[1, total_pages]`, and any change to the underlying list resets to page 1.
//! Page size is fixed at construction; callers never hard-code it.
//!
//! # Example
//!
//! ```
//! use veridoc::core::pagination::Pager;
//!
//! let mut pager = Pager::new(3);
//! assert_eq!(pager.total_pages(7), 3);
//!
//! pager.goto(99, 7);
//! assert_eq!(pager.current_page(), 3); // clamped
//!
//! pager.reset();
//! assert_eq!(pager.current_page(), 1);
//!
//! let items: Vec<u32> = (0..7).collect();
//! pager.goto(2, items.len());
//! assert_eq!(pager.slice(&items), &[3, 4, 5]);
//! ```

/// Items shown per page in the reference view.
pub const DEFAULT_PAGE_SIZE: usize = 3;

/// Tracks the current page over a list that changes underneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    current_page: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pager {
    /// Create a pager with the given page size.
    ///
    /// A zero page size is treated as one item per page.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    /// The configured page size.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The currently selected page (1-based).
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Total pages for a list of `len` items: `ceil(len / page_size)`.
    ///
    /// An empty list still has one (empty) page so the current page stays
    /// inside `[1, total_pages]`.
    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size).max(1)
    }

    /// Navigate to `page`, clamping into `[1, total_pages]` for a list of
    /// `len` items.
    pub fn goto(&mut self, page: usize, len: usize) {
        self.current_page = page.clamp(1, self.total_pages(len));
    }

    /// Reset to page 1. Call whenever the underlying list changes.
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Re-clamp the current page after the list shrank or grew.
    pub fn reclamp(&mut self, len: usize) {
        self.current_page = self.current_page.clamp(1, self.total_pages(len));
    }

    /// The window of `items` visible on the current page.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.current_page - 1) * self.page_size;
        let end = (start + self.page_size).min(items.len());
        if start >= items.len() {
            &[]
        } else {
            &items[start..end]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_is_ceiling() {
        let pager = Pager::new(3);
        assert_eq!(pager.total_pages(0), 1);
        assert_eq!(pager.total_pages(1), 1);
        assert_eq!(pager.total_pages(3), 1);
        assert_eq!(pager.total_pages(4), 2);
        assert_eq!(pager.total_pages(9), 3);
        assert_eq!(pager.total_pages(10), 4);
    }

    #[test]
    fn goto_clamps_low_and_high() {
        let mut pager = Pager::new(3);
        pager.goto(0, 7);
        assert_eq!(pager.current_page(), 1);
        pager.goto(100, 7);
        assert_eq!(pager.current_page(), 3);
        pager.goto(2, 7);
        assert_eq!(pager.current_page(), 2);
    }

    #[test]
    fn goto_on_empty_list_stays_on_page_one() {
        let mut pager = Pager::new(3);
        pager.goto(5, 0);
        assert_eq!(pager.current_page(), 1);
    }

    #[test]
    fn slice_windows() {
        let items: Vec<u32> = (0..7).collect();
        let mut pager = Pager::new(3);
        assert_eq!(pager.slice(&items), &[0, 1, 2]);
        pager.goto(3, items.len());
        assert_eq!(pager.slice(&items), &[6]);
    }

    #[test]
    fn slice_out_of_range_is_empty() {
        // Page left pointing past the end after the list shrank.
        let mut pager = Pager::new(3);
        pager.goto(3, 9);
        let items: Vec<u32> = (0..2).collect();
        assert_eq!(pager.slice(&items), &[] as &[u32]);
        pager.reclamp(items.len());
        assert_eq!(pager.current_page(), 1);
        assert_eq!(pager.slice(&items), &[0, 1]);
    }

    #[test]
    fn zero_page_size_treated_as_one() {
        let pager = Pager::new(0);
        assert_eq!(pager.page_size(), 1);
        assert_eq!(pager.total_pages(4), 4);
    }

    #[test]
    fn default_uses_reference_page_size() {
        let pager = Pager::default();
        assert_eq!(pager.page_size(), DEFAULT_PAGE_SIZE);
    }
}
