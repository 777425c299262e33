//! # Paginated Collection
//!
//! Client-side bookkeeping for a collection served by a paginated backend.
//!
//! ## Core Concepts
//!
//! - **Pages**: Per-page fetch status (`NotRequested`, `Loading`, `Failed`,
//!   `Loaded`) with the full item list of every loaded page
//! - **Total count**: Backend-reported size, used to infer how many pages exist
//! - **Local items**: Items known to the client but not attributed to a page
//! - **Fetch decisions**: Read-only answers to "which page should I request next?"
//!
//! The collection is a plain value with no I/O. The caller owns the
//! request/response cycle; [`FetchDriver`] runs it against a [`PageSource`]
//! and [`CollectionStore`] shares one collection between threads.
//!
//! ## Example
//!
//! ```ignore
//! use paginated_collection::{FetchResponse, PaginatedCollection};
//!
//! let c = PaginatedCollection::<u64, String, HttpError>::new();
//!
//! // Nothing known yet: start at page 1.
//! assert_eq!(c.fetch_all_pages(), vec![1]);
//!
//! let c = c.set_page_loading(1);
//! let c = c.handle_fetched_page(1, FetchResponse::succeeded(first_page, 42));
//!
//! // Page size inferred from page 1; page 2 is next.
//! assert_eq!(c.fetch_all_pages(), vec![2]);
//! ```

pub mod collection;
pub mod driver;
pub mod error;
pub mod items;
pub mod pager;
pub mod snapshot;
pub mod store;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use collection::PaginatedCollection;
pub use driver::{DriverConfig, FetchDriver, FetchReport, PageSource};
pub use error::{CollectionError, Result};
pub use items::OrderedItems;
pub use pager::{page_links, PageLink, Pager, PagerConfig};
pub use store::CollectionStore;
pub use subscriptions::{
    CollectionEvent, DropReason, ItemChange, SubscriptionConfig, SubscriptionFilter,
    SubscriptionHandle, SubscriptionId, SubscriptionManager,
};
pub use types::*;
