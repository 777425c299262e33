//! Collection type, accessors and item mutators.

use crate::items::OrderedItems;
use crate::types::{FetchResponse, PageNumber, PageStatus, FIRST_PAGE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::hash::Hash;

/// Fetch status and contents of a collection served by a paginated backend.
///
/// Tracks per-page status (`NotRequested`, `Loading`, `Failed`, `Loaded`),
/// the backend's reported total count, and items inserted locally that do not
/// belong to any page yet.
///
/// ```ignore
/// let c = PaginatedCollection::<u64, String, MyError>::new();
/// let next = c.fetch_all_pages();               // [1]
/// let c = c.set_page_loading(next[0]);
/// let c = c.handle_fetched_page(1, FetchResponse::succeeded(items, 42));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Serialize, V: Serialize, E: Serialize",
    deserialize = "K: Deserialize<'de> + Eq + Hash + Clone, V: Deserialize<'de>, E: Deserialize<'de>"
))]
pub struct PaginatedCollection<K, V, E> {
    /// Page number to status. Ordered so that iteration is ascending.
    pub(crate) pages: BTreeMap<PageNumber, PageStatus<K, V, E>>,

    /// Backend-reported total, excluding local items.
    pub(crate) total_count: Option<usize>,

    /// Items not attributed to any page.
    pub(crate) local: OrderedItems<K, V>,
}

impl<K: Eq + Hash + Clone, V, E> PaginatedCollection<K, V, E> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self {
            pages: BTreeMap::new(),
            total_count: None,
            local: OrderedItems::new(),
        }
    }

    // --- Accessors ---

    /// Look up a key, checking local items before pages in ascending order.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.local.get(key).or_else(|| {
            self.pages
                .values()
                .filter_map(PageStatus::items)
                .find_map(|items| items.get(key))
        })
    }

    /// Loaded page items in page order, then local items in insertion order.
    pub fn iter_all(&self) -> impl Iterator<Item = (&K, &V)> {
        self.pages
            .values()
            .filter_map(PageStatus::items)
            .flat_map(|items| items.iter())
            .chain(self.local.iter())
    }

    /// Collected form of [`iter_all`](Self::iter_all).
    pub fn get_all(&self) -> Vec<(&K, &V)> {
        self.iter_all().collect()
    }

    /// Borrow the status of a page, if an entry exists.
    pub fn page(&self, page: PageNumber) -> Option<&PageStatus<K, V, E>> {
        if page < FIRST_PAGE {
            return None;
        }
        self.pages.get(&page)
    }

    /// Status of a page, `NotRequested` when unknown.
    pub fn get_page(&self, page: PageNumber) -> PageStatus<K, V, E>
    where
        V: Clone,
        E: Clone,
    {
        self.page(page).cloned().unwrap_or_default()
    }

    /// Borrow the items of a page if it is loaded.
    pub fn items_on_page(&self, page: PageNumber) -> Option<&OrderedItems<K, V>> {
        self.page(page).and_then(PageStatus::items)
    }

    /// Items of a page, empty unless the page is loaded.
    pub fn get_items_on_page(&self, page: PageNumber) -> OrderedItems<K, V>
    where
        V: Clone,
    {
        self.items_on_page(page).cloned().unwrap_or_default()
    }

    pub fn get_local(&self) -> &OrderedItems<K, V> {
        &self.local
    }

    pub fn get_total_count(&self) -> Option<usize> {
        self.total_count
    }

    /// Known page numbers in ascending order.
    pub fn page_numbers(&self) -> Vec<PageNumber> {
        self.pages.keys().copied().collect()
    }

    /// Highest known page number.
    pub fn last_page(&self) -> Option<PageNumber> {
        self.pages.keys().next_back().copied()
    }

    /// Page size inferred from the lowest loaded page.
    pub fn page_size(&self) -> Option<usize> {
        self.pages
            .values()
            .find_map(PageStatus::items)
            .map(OrderedItems::len)
    }

    pub fn loaded_page_count(&self) -> usize {
        self.pages.values().filter(|s| s.is_loaded()).count()
    }

    /// Number of items returned by [`get_all`](Self::get_all).
    pub fn len(&self) -> usize {
        self.pages.values().map(PageStatus::item_count).sum::<usize>() + self.local.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // --- Mutators ---

    /// Overwrite the total count directly.
    #[must_use]
    pub fn set_total_count(mut self, total_count: Option<usize>) -> Self {
        self.total_count = total_count;
        self
    }

    /// Mark a page as in flight.
    #[must_use]
    pub fn set_page_loading(self, page: PageNumber) -> Self {
        self.handle_fetched_page(page, FetchResponse::Loading)
    }

    /// Apply `f` to every stored copy of `key`: in local items and in each
    /// loaded page that contains it.
    #[must_use]
    pub fn update<F>(mut self, key: &K, f: F) -> Self
    where
        F: FnMut(&mut V),
    {
        self.update_in_place(key, f);
        self
    }

    /// Remove `key` from local items and from every loaded page.
    ///
    /// Pages keep their full item lists, so removing from the middle of a
    /// page leaves the rest of the page intact. The page becomes shorter than
    /// the inferred page size until it is fetched again.
    #[must_use]
    pub fn remove(mut self, key: &K) -> Self {
        self.remove_in_place(key);
        self
    }

    /// Insert or overwrite a local item.
    #[must_use]
    pub fn insert_local(mut self, key: K, value: V) -> Self {
        self.local.insert(key, value);
        self
    }

    // In-place forms used by the store while it holds the write lock.

    pub(crate) fn update_in_place<F>(&mut self, key: &K, mut f: F)
    where
        F: FnMut(&mut V),
    {
        if let Some(value) = self.local.get_mut(key) {
            f(value);
        }

        for status in self.pages.values_mut() {
            if let PageStatus::Loaded(items) = status {
                if let Some(value) = items.get_mut(key) {
                    f(value);
                }
            }
        }
    }

    pub(crate) fn remove_in_place(&mut self, key: &K) {
        self.local.remove(key);

        for status in self.pages.values_mut() {
            if let PageStatus::Loaded(items) = status {
                items.remove(key);
            }
        }
    }
}

impl<K: Eq + Hash + Clone, V, E> Default for PaginatedCollection<K, V, E> {
    fn default() -> Self {
        Self::new()
    }
}
