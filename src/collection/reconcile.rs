//! Applying fetch responses to the page map.

use super::PaginatedCollection;
use crate::types::{FetchResponse, PageNumber, PageStatus, FIRST_PAGE};
use std::hash::Hash;
use tracing::{debug, trace};

impl<K: Eq + Hash + Clone, V, E> PaginatedCollection<K, V, E> {
    /// Record the outcome of a page request.
    ///
    /// `Loading`, `NotRequested` and `Failed` overwrite the page's status and
    /// touch nothing else. `Succeeded` stores the items, re-infers the page
    /// size from the lowest loaded page, and rebuilds the page map so that it
    /// holds an entry for every page up to the inferred last page. Loaded
    /// pages are always kept, even beyond the new last page.
    ///
    /// Page numbers below 1 are ignored.
    #[must_use]
    pub fn handle_fetched_page(
        mut self,
        page: PageNumber,
        response: FetchResponse<K, V, E>,
    ) -> Self {
        self.apply_response(page, response);
        self
    }

    pub(crate) fn apply_response(&mut self, page: PageNumber, response: FetchResponse<K, V, E>) {
        if page < FIRST_PAGE {
            trace!(page, "Ignoring response for invalid page");
            return;
        }

        match response {
            FetchResponse::Loading => {
                self.pages.insert(page, PageStatus::Loading);
            }
            FetchResponse::NotRequested => {
                self.pages.insert(page, PageStatus::NotRequested);
            }
            FetchResponse::Failed(error) => {
                self.pages.insert(page, PageStatus::Failed(error));
            }
            FetchResponse::Succeeded { items, total_count } => {
                self.pages
                    .insert(page, PageStatus::Loaded(items.into_iter().collect()));
                self.reconcile_page_range(total_count);
                self.total_count = Some(total_count);
            }
        }
    }

    /// Rebuild the page map after a successful response.
    fn reconcile_page_range(&mut self, total_count: usize) {
        // A page was just loaded, so this is always found.
        let page_size = self.page_size().unwrap_or(0);
        let last_page = last_page_for(total_count, page_size);

        debug!(page_size, total_count, last_page, "Reconciling page range");

        self.pages
            .retain(|&number, status| status.is_loaded() || number <= last_page);

        let stale = self.pages.range(last_page.saturating_add(1)..).count();
        if stale > 0 {
            debug!(
                stale,
                last_page, "Keeping loaded pages beyond the inferred last page"
            );
        }

        for number in FIRST_PAGE..=last_page {
            self.pages.entry(number).or_insert(PageStatus::NotRequested);
        }
    }
}

/// Last page number for `total_count` items split into pages of `page_size`.
///
/// An empty first page means the whole result is that single page.
fn last_page_for(total_count: usize, page_size: usize) -> PageNumber {
    if page_size == 0 {
        return FIRST_PAGE;
    }
    PageNumber::try_from(total_count.div_ceil(page_size)).unwrap_or(PageNumber::MAX)
}
