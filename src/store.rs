//! Thread-safe holder for a collection with change notifications.

use crate::collection::PaginatedCollection;
use crate::subscriptions::{
    CollectionEvent, ItemChange, SubscriptionConfig, SubscriptionHandle, SubscriptionId,
    SubscriptionManager,
};
use crate::types::{FetchResponse, PageNumber, FIRST_PAGE};
use parking_lot::RwLock;
use std::hash::Hash;
use tracing::trace;

/// Shared state owning one [`PaginatedCollection`].
///
/// Every mutator takes the write lock, applies the operation to the
/// collection in place and broadcasts the resulting events after the lock is
/// released. An operation that panics leaves the collection as it was up to
/// the panic.
pub struct CollectionStore<K, V, E> {
    collection: RwLock<PaginatedCollection<K, V, E>>,
    subscriptions: SubscriptionManager,
}

impl<K: Eq + Hash + Clone, V, E> CollectionStore<K, V, E> {
    /// Create a store holding an empty collection.
    pub fn new() -> Self {
        Self::from_collection(PaginatedCollection::new())
    }

    /// Create a store holding an existing collection (e.g. a loaded snapshot).
    pub fn from_collection(collection: PaginatedCollection<K, V, E>) -> Self {
        Self {
            collection: RwLock::new(collection),
            subscriptions: SubscriptionManager::new(),
        }
    }

    // --- Reading ---

    /// Run `f` against the current collection under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&PaginatedCollection<K, V, E>) -> R) -> R {
        f(&self.collection.read())
    }

    /// Clone of the current collection.
    pub fn snapshot(&self) -> PaginatedCollection<K, V, E>
    where
        V: Clone,
        E: Clone,
    {
        self.collection.read().clone()
    }

    pub fn fetch_next_page(&self, current: PageNumber) -> Vec<PageNumber> {
        self.collection.read().fetch_next_page(current)
    }

    pub fn fetch_all_pages(&self) -> Vec<PageNumber> {
        self.collection.read().fetch_all_pages()
    }

    // --- Subscriptions ---

    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        self.subscriptions.subscribe(config)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscriptions.unsubscribe(id);
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.subscription_count()
    }

    // --- Mutators ---

    /// Apply a fetch response. See [`PaginatedCollection::handle_fetched_page`].
    pub fn handle_fetched_page(&self, page: PageNumber, response: FetchResponse<K, V, E>) {
        if page < FIRST_PAGE {
            return;
        }

        let reconciles = response.is_success();
        let events = self.apply(|c| c.apply_response(page, response), |before, after| {
            let mut events = Vec::new();
            if let Some(status) = after.page(page) {
                events.push(CollectionEvent::PageChanged {
                    page,
                    status: status.kind(),
                    item_count: status.item_count(),
                });
            }
            if reconciles {
                let pages = after.page_numbers();
                if before.pages != pages {
                    events.push(CollectionEvent::PagesReconciled { pages });
                }
            }
            if before.total_count != after.total_count {
                events.push(CollectionEvent::TotalCountChanged {
                    total_count: after.total_count,
                });
            }
            events
        });

        self.subscriptions.broadcast_all(events);
    }

    pub fn set_page_loading(&self, page: PageNumber) {
        self.handle_fetched_page(page, FetchResponse::Loading);
    }

    pub fn set_total_count(&self, total_count: Option<usize>) {
        let events = self.apply(
            |c| c.total_count = total_count,
            |before, after| {
                if before.total_count == after.total_count {
                    Vec::new()
                } else {
                    vec![CollectionEvent::TotalCountChanged {
                        total_count: after.total_count,
                    }]
                }
            },
        );
        self.subscriptions.broadcast_all(events);
    }

    pub fn update<F: FnMut(&mut V)>(&self, key: &K, f: F) {
        let events = self.apply(
            |c| c.update_in_place(key, f),
            |_, after| item_event(after, key, ItemChange::Updated),
        );
        self.subscriptions.broadcast_all(events);
    }

    pub fn remove(&self, key: &K) {
        let events = {
            let mut guard = self.collection.write();
            let present = guard.get(key).is_some();
            guard.remove_in_place(key);
            if present {
                vec![CollectionEvent::ItemsChanged {
                    change: ItemChange::Removed,
                }]
            } else {
                Vec::new()
            }
        };
        self.subscriptions.broadcast_all(events);
    }

    pub fn insert_local(&self, key: K, value: V) {
        let events = self.apply(
            |c| {
                c.local.insert(key, value);
            },
            |_, _| {
                vec![CollectionEvent::ItemsChanged {
                    change: ItemChange::InsertedLocal,
                }]
            },
        );
        self.subscriptions.broadcast_all(events);
    }

    /// Apply `op` under the write lock and compute events from a summary of
    /// the state before and after.
    fn apply(
        &self,
        op: impl FnOnce(&mut PaginatedCollection<K, V, E>),
        diff: impl FnOnce(&Shape, &PaginatedCollection<K, V, E>) -> Vec<CollectionEvent>,
    ) -> Vec<CollectionEvent> {
        let mut guard = self.collection.write();
        let before = Shape::of(&*guard);
        op(&mut *guard);
        let events = diff(&before, &*guard);
        trace!(events = events.len(), "Applied collection operation");
        events
    }
}

impl<K: Eq + Hash + Clone, V, E> Default for CollectionStore<K, V, E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Page numbers and total count, captured before a mutation.
struct Shape {
    pages: Vec<PageNumber>,
    total_count: Option<usize>,
}

impl Shape {
    fn of<K: Eq + Hash + Clone, V, E>(collection: &PaginatedCollection<K, V, E>) -> Self {
        Self {
            pages: collection.page_numbers(),
            total_count: collection.total_count,
        }
    }
}

fn item_event<K: Eq + Hash + Clone, V, E>(
    collection: &PaginatedCollection<K, V, E>,
    key: &K,
    change: ItemChange,
) -> Vec<CollectionEvent> {
    if collection.get(key).is_some() {
        vec![CollectionEvent::ItemsChanged { change }]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscriptions::SubscriptionFilter;
    use crate::types::PageStatusKind;

    type Store = CollectionStore<u32, String, String>;

    fn items(keys: std::ops::Range<u32>) -> Vec<(u32, String)> {
        keys.map(|k| (k, k.to_string())).collect()
    }

    #[test]
    fn test_success_emits_page_range_and_count() {
        let store = Store::new();
        let handle = store.subscribe(SubscriptionConfig::default());

        store.handle_fetched_page(1, FetchResponse::succeeded(items(0..5), 12));

        assert_eq!(
            handle.drain(),
            vec![
                CollectionEvent::PageChanged {
                    page: 1,
                    status: PageStatusKind::Loaded,
                    item_count: 5,
                },
                CollectionEvent::PagesReconciled {
                    pages: vec![1, 2, 3]
                },
                CollectionEvent::TotalCountChanged {
                    total_count: Some(12)
                },
            ]
        );
    }

    #[test]
    fn test_loading_emits_only_page_change() {
        let store = Store::new();
        let handle = store.subscribe(SubscriptionConfig::default());

        store.set_page_loading(2);
        store.set_page_loading(0);

        assert_eq!(
            handle.drain(),
            vec![CollectionEvent::PageChanged {
                page: 2,
                status: PageStatusKind::Loading,
                item_count: 0,
            }]
        );
    }

    #[test]
    fn test_item_events() {
        let store = Store::new();
        store.handle_fetched_page(1, FetchResponse::succeeded(items(0..2), 2));

        let handle = store.subscribe(SubscriptionConfig {
            filter: SubscriptionFilter::items(),
            ..Default::default()
        });

        store.update(&1, |v| v.push('x'));
        store.update(&42, |v| v.push('x'));
        store.insert_local(9, "nine".into());
        store.remove(&0);
        store.remove(&0);

        assert_eq!(
            handle.drain(),
            vec![
                CollectionEvent::ItemsChanged {
                    change: ItemChange::Updated
                },
                CollectionEvent::ItemsChanged {
                    change: ItemChange::InsertedLocal
                },
                CollectionEvent::ItemsChanged {
                    change: ItemChange::Removed
                },
            ]
        );
        assert_eq!(store.read(|c| c.get(&1).cloned()), Some("1x".to_string()));
        assert_eq!(store.read(|c| c.len()), 2);
    }

    #[test]
    fn test_panicking_update_keeps_collection() {
        let store = Store::new();
        store.handle_fetched_page(1, FetchResponse::succeeded(items(0..2), 10));
        store.insert_local(7, "seven".into());
        let shape = |s: &Store| s.read(|c| (c.len(), c.page_numbers(), c.get_total_count()));
        let before = shape(&store);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            store.update(&1, |_| panic!("callback failed"));
        }));

        assert!(result.is_err());
        assert_eq!(before, (3, vec![1, 2, 3, 4, 5], Some(10)));
        assert_eq!(shape(&store), before);

        // The lock is released and the store keeps working.
        store.update(&0, |v| v.push('!'));
        assert_eq!(store.read(|c| c.get(&0).cloned()), Some("0!".to_string()));
    }

    #[test]
    fn test_total_count_event_only_on_change() {
        let store = Store::new();
        let handle = store.subscribe(SubscriptionConfig::default());

        store.set_total_count(Some(3));
        store.set_total_count(Some(3));

        assert_eq!(handle.drain().len(), 1);
    }

    #[test]
    fn test_fetch_decisions_match_collection() {
        let store = Store::new();
        assert_eq!(store.fetch_all_pages(), vec![1]);

        store.set_page_loading(1);
        assert!(store.fetch_all_pages().is_empty());

        store.handle_fetched_page(1, FetchResponse::succeeded(items(0..5), 10));
        assert_eq!(store.fetch_next_page(1), vec![2]);
        assert_eq!(store.snapshot().fetch_next_page(1), vec![2]);
    }
}
