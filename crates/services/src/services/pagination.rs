//! A single pagination interface over two strategies: slicing a fully
//! loaded collection, or following the page metadata the server reports.
//!
//! Pages are 1-based. Jumping outside `1..=total_pages` is refused and
//! leaves the current page untouched.

use std::ops::Range;

use domain::models::page::Page;

pub trait Pagination {
    fn current_page(&self) -> u32;

    /// Never less than 1, even for an empty collection.
    fn total_pages(&self) -> u32;

    /// Whether `page` can be jumped to.
    fn contains(&self, page: u32) -> bool {
        (1..=self.total_pages()).contains(&page)
    }

    /// Returns `false` and keeps the current page when `page` is out of range.
    fn go_to(&mut self, page: u32) -> bool;

    fn next(&mut self) -> bool {
        let page = self.current_page().saturating_add(1);
        self.go_to(page)
    }

    fn prev(&mut self) -> bool {
        let page = self.current_page().saturating_sub(1);
        self.go_to(page)
    }

    fn has_next(&self) -> bool {
        self.current_page() < self.total_pages()
    }

    fn has_prev(&self) -> bool {
        self.current_page() > 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientPager {
    total_items: usize,
    page_size: usize,
    current: u32,
}

impl ClientPager {
    pub fn new(total_items: usize, page_size: usize) -> Self {
        Self {
            total_items,
            page_size: page_size.max(1),
            current: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// Collection size changed (refetch, delete, search); the current page
    /// is pulled back when it no longer exists.
    pub fn set_total_items(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.current = self.current.min(self.total_pages());
    }

    /// Index range of the current page within the collection.
    pub fn range(&self) -> Range<usize> {
        let start = (self.current as usize - 1) * self.page_size;
        let start = start.min(self.total_items);
        let end = (start + self.page_size).min(self.total_items);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.range();
        let end = range.end.min(items.len());
        let start = range.start.min(end);
        &items[start..end]
    }
}

impl Pagination for ClientPager {
    fn current_page(&self) -> u32 {
        self.current
    }

    fn total_pages(&self) -> u32 {
        (self.total_items.div_ceil(self.page_size) as u32).max(1)
    }

    fn go_to(&mut self, page: u32) -> bool {
        if !self.contains(page) {
            return false;
        }
        self.current = page;
        true
    }
}

/// Mirrors the `current_page` / `last_page` / `total` reported by the server.
/// `go_to` only validates and records the target; fetching it is up to the
/// owner (see `EntityStore::go_to_page`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerPager {
    current: u32,
    last: u32,
    per_page: u32,
    total: u64,
}

impl Default for ServerPager {
    fn default() -> Self {
        Self {
            current: 1,
            last: 1,
            per_page: 0,
            total: 0,
        }
    }
}

impl ServerPager {
    pub fn from_page<T>(page: &Page<T>) -> Self {
        let mut pager = Self::default();
        pager.update(page);
        pager
    }

    pub fn update<T>(&mut self, page: &Page<T>) {
        self.last = page.last_page.max(1);
        self.current = page.current_page.clamp(1, self.last);
        self.per_page = page.per_page;
        self.total = page.total;
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn adjust_total(&mut self, delta: i64) {
        self.total = self.total.saturating_add_signed(delta);
    }
}

impl Pagination for ServerPager {
    fn current_page(&self) -> u32 {
        self.current
    }

    fn total_pages(&self) -> u32 {
        self.last
    }

    fn go_to(&mut self, page: u32) -> bool {
        if !self.contains(page) {
            return false;
        }
        self.current = page;
        true
    }
}

/// The strategy an entity store uses; decided by the store, not the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pager {
    Client(ClientPager),
    Server(ServerPager),
}

impl Pager {
    pub fn is_server(&self) -> bool {
        matches!(self, Pager::Server(_))
    }
}

impl Pagination for Pager {
    fn current_page(&self) -> u32 {
        match self {
            Pager::Client(p) => p.current_page(),
            Pager::Server(p) => p.current_page(),
        }
    }

    fn total_pages(&self) -> u32 {
        match self {
            Pager::Client(p) => p.total_pages(),
            Pager::Server(p) => p.total_pages(),
        }
    }

    fn go_to(&mut self, page: u32) -> bool {
        match self {
            Pager::Client(p) => p.go_to(page),
            Pager::Server(p) => p.go_to(page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_pager_boundaries() {
        let mut pager = ClientPager::new(13, 5);
        assert_eq!(pager.total_pages(), 3);
        assert!(!pager.go_to(0));
        assert_eq!(pager.current_page(), 1);
        assert!(pager.go_to(3));
        assert!(!pager.go_to(4));
        assert_eq!(pager.current_page(), 3);
        assert_eq!(pager.range(), 10..13);
        assert!(!pager.next());
        assert!(pager.prev());
        assert_eq!(pager.current_page(), 2);
    }

    #[test]
    fn test_client_pager_slice_and_shrink() {
        let items: Vec<u32> = (1..=13).collect();
        let mut pager = ClientPager::new(items.len(), 5);
        pager.go_to(3);
        assert_eq!(pager.slice(&items), &[11, 12, 13]);

        pager.set_total_items(7);
        assert_eq!(pager.current_page(), 2);
        assert_eq!(pager.slice(&items[..7]), &[6, 7]);
    }

    #[test]
    fn test_empty_collection_has_one_page() {
        let mut pager = ClientPager::new(0, 5);
        assert_eq!(pager.total_pages(), 1);
        assert!(pager.slice::<u32>(&[]).is_empty());
        assert!(!pager.prev());
        assert!(!pager.has_next());
    }

    #[test]
    fn test_server_pager_trusts_metadata() {
        let page = Page {
            data: vec![1, 2, 3, 4, 5],
            current_page: 2,
            last_page: 3,
            per_page: 5,
            total: 13,
        };
        let mut pager = Pager::Server(ServerPager::from_page(&page));
        assert!(pager.is_server());
        assert_eq!(pager.current_page(), 2);
        assert_eq!(pager.total_pages(), 3);
        assert!(!pager.go_to(4));
        assert_eq!(pager.current_page(), 2);
        assert!(pager.has_prev() && pager.has_next());
    }
}
