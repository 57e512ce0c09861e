//! Client-side paging over an already fetched list.
//!
//! "Load more" only reveals more of the list in memory; it never fetches.

/// Default number of items revealed after a reset
pub const DEFAULT_INITIAL_SIZE: usize = 10;
/// Default number of items revealed by each load-more
pub const DEFAULT_LOAD_MORE_SIZE: usize = 4;

/// Snapshot of the paging window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub all: Vec<T>,
    pub shown: Vec<T>,
    pub has_more: bool,
}

impl<T> Page<T> {
    pub fn shown_len(&self) -> usize {
        self.shown.len()
    }

    pub fn total_len(&self) -> usize {
        self.all.len()
    }
}

/// Holds the full list and the size of its visible prefix.
#[derive(Debug, Clone)]
pub struct PagingController<T> {
    initial_size: usize,
    page_size: usize,
    all: Vec<T>,
    window: usize,
}

impl<T: Clone> PagingController<T> {
    pub fn new(initial_size: usize, page_size: usize) -> Self {
        Self {
            initial_size,
            page_size,
            all: Vec::new(),
            window: 0,
        }
    }

    /// Replace the list and shrink the window back to the initial size
    pub fn reset(&mut self, items: Vec<T>) -> Page<T> {
        self.window = self.initial_size.min(items.len());
        self.all = items;
        self.current_page()
    }

    /// Grow the window by one page, clamped to the list length
    pub fn load_more(&mut self) -> Page<T> {
        if self.all.is_empty() {
            return self.current_page();
        }
        self.window = (self.window + self.page_size).min(self.all.len());
        self.current_page()
    }

    pub fn current_page(&self) -> Page<T> {
        Page {
            all: self.all.clone(),
            shown: self.all[..self.window].to_vec(),
            has_more: self.window < self.all.len(),
        }
    }

    /// Drop the list entirely
    pub fn clear(&mut self) {
        self.all.clear();
        self.window = 0;
    }

    pub fn has_more(&self) -> bool {
        self.window < self.all.len()
    }

    pub fn initial_size(&self) -> usize {
        self.initial_size
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

impl<T: Clone> Default for PagingController<T> {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_SIZE, DEFAULT_LOAD_MORE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("t{}", i)).collect()
    }

    fn assert_prefix(page: &Page<String>) {
        assert!(page.shown.len() <= page.all.len());
        assert_eq!(&page.all[..page.shown.len()], page.shown.as_slice());
        assert_eq!(page.has_more, page.shown.len() < page.all.len());
    }

    #[test]
    fn test_twenty_items_eight_by_eight() {
        let mut paging = PagingController::new(8, 8);

        let page = paging.reset(items(20));
        assert_eq!(page.shown.len(), 8);
        assert!(page.has_more);

        let page = paging.load_more();
        assert_eq!(page.shown.len(), 16);
        assert!(page.has_more);

        let page = paging.load_more();
        assert_eq!(page.shown.len(), 20);
        assert!(!page.has_more);
    }

    #[test]
    fn test_reset_shows_initial_prefix() {
        let mut paging = PagingController::new(10, 4);
        let list = items(25);
        paging.reset(list.clone());

        let page = paging.current_page();
        assert_eq!(page.shown, list.into_iter().take(10).collect::<Vec<_>>());
    }

    #[test]
    fn test_load_more_is_idempotent_once_exhausted() {
        let mut paging = PagingController::new(10, 4);
        paging.reset(items(12));
        paging.load_more();

        let exhausted = paging.current_page();
        assert!(!exhausted.has_more);
        for _ in 0..5 {
            assert_eq!(paging.load_more(), exhausted);
        }
    }

    #[test]
    fn test_short_list_and_empty_list() {
        let mut paging = PagingController::new(10, 4);

        let page = paging.reset(items(3));
        assert_eq!(page.shown.len(), 3);
        assert!(!page.has_more);

        let page = paging.reset(Vec::new());
        assert!(page.shown.is_empty());
        assert!(!page.has_more);
        assert_eq!(paging.load_more(), page);
    }

    #[test]
    fn test_current_page_is_stable() {
        let mut paging = PagingController::new(8, 8);
        paging.reset(items(20));
        assert_eq!(paging.current_page(), paging.current_page());
    }

    #[test]
    fn test_shown_is_always_a_prefix() {
        for total in [0usize, 1, 7, 8, 9, 20, 33] {
            let mut paging = PagingController::new(8, 5);
            assert_prefix(&paging.reset(items(total)));
            for _ in 0..10 {
                assert_prefix(&paging.load_more());
            }
        }
    }

    #[test]
    fn test_clear_empties_window() {
        let mut paging = PagingController::new(8, 8);
        paging.reset(items(20));
        paging.clear();
        let page = paging.current_page();
        assert!(page.all.is_empty());
        assert!(!paging.has_more());
    }
}
