//! Subscription types for collection change events.

use crate::types::{PageNumber, PageStatusKind};
use serde::{Deserialize, Serialize};

/// Configuration for a subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionConfig {
    /// Max buffered events before dropping subscriber.
    /// Default: 1000
    pub buffer_size: usize,

    /// Filter criteria.
    pub filter: SubscriptionFilter,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            buffer_size: 1000,
            filter: SubscriptionFilter::all(),
        }
    }
}

/// Filter criteria for subscriptions.
#[derive(Clone, Debug, Default)]
pub struct SubscriptionFilter {
    /// Only page events for these pages (None = all pages).
    pub pages: Option<Vec<PageNumber>>,

    /// Include page status and page range events.
    pub include_page_events: bool,

    /// Include total count events.
    pub include_count_events: bool,

    /// Include item update/removal/local insert events.
    pub include_item_events: bool,
}

impl SubscriptionFilter {
    /// Page status events for every page.
    pub fn pages_only() -> Self {
        Self {
            include_page_events: true,
            ..Default::default()
        }
    }

    /// Page status events for specific pages.
    pub fn page(pages: Vec<PageNumber>) -> Self {
        Self {
            pages: Some(pages),
            include_page_events: true,
            ..Default::default()
        }
    }

    /// Item change events.
    pub fn items() -> Self {
        Self {
            include_item_events: true,
            ..Default::default()
        }
    }

    /// Subscribe to everything.
    pub fn all() -> Self {
        Self {
            pages: None,
            include_page_events: true,
            include_count_events: true,
            include_item_events: true,
        }
    }

    /// Check whether an event passes this filter.
    pub fn matches(&self, event: &CollectionEvent) -> bool {
        match event {
            CollectionEvent::PageChanged { page, .. } => {
                self.include_page_events
                    && self.pages.as_ref().map_or(true, |pages| pages.contains(page))
            }
            CollectionEvent::PagesReconciled { .. } => {
                self.include_page_events && self.pages.is_none()
            }
            CollectionEvent::TotalCountChanged { .. } => self.include_count_events,
            CollectionEvent::ItemsChanged { .. } => self.include_item_events,
            CollectionEvent::Dropped { .. } => true,
        }
    }
}

/// What happened to items.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemChange {
    Updated,
    Removed,
    InsertedLocal,
}

/// Events emitted to subscribers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CollectionEvent {
    // --- Page Events ---
    /// A page's status changed.
    PageChanged {
        page: PageNumber,
        status: PageStatusKind,
        /// Items held by the page after the change.
        item_count: usize,
    },

    /// A successful response rebuilt the page map.
    PagesReconciled {
        /// Known page numbers after reconciliation.
        pages: Vec<PageNumber>,
    },

    // --- Count Events ---
    /// The total count changed.
    TotalCountChanged { total_count: Option<usize> },

    // --- Item Events ---
    /// Items were updated, removed or inserted locally.
    ItemsChanged { change: ItemChange },

    // --- Lifecycle Events ---
    /// Subscription was dropped.
    Dropped { reason: DropReason },
}

/// Why a subscription was dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Explicitly unsubscribed.
    Unsubscribed,
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Handle to manage a subscription.
pub struct SubscriptionHandle {
    pub id: SubscriptionId,
    /// Channel to receive events.
    pub receiver: crossbeam_channel::Receiver<CollectionEvent>,
}

impl SubscriptionHandle {
    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<CollectionEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<CollectionEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<CollectionEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain every event currently buffered.
    pub fn drain(&self) -> Vec<CollectionEvent> {
        self.receiver.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_event(page: PageNumber) -> CollectionEvent {
        CollectionEvent::PageChanged {
            page,
            status: PageStatusKind::Loading,
            item_count: 0,
        }
    }

    #[test]
    fn test_page_filter() {
        let filter = SubscriptionFilter::page(vec![2]);
        assert!(filter.matches(&page_event(2)));
        assert!(!filter.matches(&page_event(3)));
        assert!(!filter.matches(&CollectionEvent::PagesReconciled { pages: vec![1, 2] }));
        assert!(!filter.matches(&CollectionEvent::TotalCountChanged {
            total_count: Some(1)
        }));
    }

    #[test]
    fn test_items_filter() {
        let filter = SubscriptionFilter::items();
        assert!(filter.matches(&CollectionEvent::ItemsChanged {
            change: ItemChange::Removed
        }));
        assert!(!filter.matches(&page_event(1)));
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_value(page_event(4)).unwrap();
        assert_eq!(json["type"], "page_changed");
        assert_eq!(json["page"], 4);
        assert_eq!(json["status"], "loading");

        let json = serde_json::to_value(CollectionEvent::Dropped {
            reason: DropReason::BufferOverflow,
        })
        .unwrap();
        assert_eq!(json["reason"], "buffer_overflow");
    }
}
