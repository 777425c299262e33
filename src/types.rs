//! Core types for the paginated collection.

use crate::items::OrderedItems;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// A 1-based page number.
///
/// Signed so that out-of-range input (zero, negatives) can be passed through
/// and handled as a no-op instead of being unrepresentable at the call site.
pub type PageNumber = i64;

/// The first valid page number.
pub const FIRST_PAGE: PageNumber = 1;

/// Fetch status of a single page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Serialize, V: Serialize, E: Serialize",
    deserialize = "K: Deserialize<'de> + Eq + Hash + Clone, V: Deserialize<'de>, E: Deserialize<'de>"
))]
pub enum PageStatus<K, V, E> {
    /// Known to exist (or asked about) but never requested.
    NotRequested,
    /// A request is in flight.
    Loading,
    /// The last request failed.
    Failed(E),
    /// The page's items, in backend order.
    Loaded(OrderedItems<K, V>),
}

impl<K, V, E> PageStatus<K, V, E> {
    pub fn kind(&self) -> PageStatusKind {
        match self {
            PageStatus::NotRequested => PageStatusKind::NotRequested,
            PageStatus::Loading => PageStatusKind::Loading,
            PageStatus::Failed(_) => PageStatusKind::Failed,
            PageStatus::Loaded(_) => PageStatusKind::Loaded,
        }
    }

    pub fn is_not_requested(&self) -> bool {
        matches!(self, PageStatus::NotRequested)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PageStatus::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PageStatus::Failed(_))
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, PageStatus::Loaded(_))
    }

    /// Items if the page is loaded.
    pub fn items(&self) -> Option<&OrderedItems<K, V>> {
        match self {
            PageStatus::Loaded(items) => Some(items),
            _ => None,
        }
    }

    /// The stored error if the page failed.
    pub fn error(&self) -> Option<&E> {
        match self {
            PageStatus::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Number of items held (zero unless loaded).
    pub fn item_count(&self) -> usize {
        self.items().map_or(0, OrderedItems::len)
    }
}

impl<K, V, E> Default for PageStatus<K, V, E> {
    fn default() -> Self {
        PageStatus::NotRequested
    }
}

/// Payload-free tag of a [`PageStatus`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStatusKind {
    NotRequested,
    Loading,
    Failed,
    Loaded,
}

impl fmt::Display for PageStatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageStatusKind::NotRequested => "not_requested",
            PageStatusKind::Loading => "loading",
            PageStatusKind::Failed => "failed",
            PageStatusKind::Loaded => "loaded",
        };
        f.write_str(name)
    }
}

/// Outcome of a page request, as reported by the backend collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FetchResponse<K, V, E> {
    /// The request was issued and is still pending.
    Loading,
    /// Reset the page to its unrequested state.
    NotRequested,
    /// The request failed.
    Failed(E),
    /// The request succeeded.
    Succeeded {
        /// Items on the page, in backend order.
        items: Vec<(K, V)>,
        /// Total number of items the backend reports across all pages.
        total_count: usize,
    },
}

impl<K, V, E> FetchResponse<K, V, E> {
    /// Shorthand for a successful response.
    pub fn succeeded(items: impl IntoIterator<Item = (K, V)>, total_count: usize) -> Self {
        FetchResponse::Succeeded {
            items: items.into_iter().collect(),
            total_count,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchResponse::Succeeded { .. })
    }

    /// The status tag this response will produce once applied.
    pub fn kind(&self) -> PageStatusKind {
        match self {
            FetchResponse::Loading => PageStatusKind::Loading,
            FetchResponse::NotRequested => PageStatusKind::NotRequested,
            FetchResponse::Failed(_) => PageStatusKind::Failed,
            FetchResponse::Succeeded { .. } => PageStatusKind::Loaded,
        }
    }
}
