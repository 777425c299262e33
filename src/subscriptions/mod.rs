//! Subscriptions to collection changes.
//!
//! Used by [`CollectionStore`](crate::CollectionStore) to notify observers
//! (typically a UI) when pages, counts or items change:
//! - Filtering by event kind and page number
//! - Bounded buffers with slow-subscriber dropping
//!
//! # Example
//!
//! ```ignore
//! let store = CollectionStore::<u64, Item, ApiError>::new();
//! let handle = store.subscribe(SubscriptionConfig {
//!     filter: SubscriptionFilter::pages_only(),
//!     ..Default::default()
//! });
//!
//! while let Ok(event) = handle.recv() {
//!     match event {
//!         CollectionEvent::PageChanged { page, status, .. } => redraw(page, status),
//!         CollectionEvent::Dropped { .. } => break,
//!         _ => {}
//!     }
//! }
//! ```

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{
    CollectionEvent, DropReason, ItemChange, SubscriptionConfig, SubscriptionFilter,
    SubscriptionHandle, SubscriptionId,
};
