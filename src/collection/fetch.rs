//! Deciding which page to request next.
//!
//! These are read-only: they never change state. A page keeps being suggested
//! until the caller marks it loading (or applies a response for it).

use super::PaginatedCollection;
use crate::types::{PageNumber, PageStatus, FIRST_PAGE};
use std::hash::Hash;

impl<K: Eq + Hash + Clone, V, E> PaginatedCollection<K, V, E> {
    /// Pages to request given the page the caller is looking at.
    ///
    /// Returns at most one page:
    /// - the current page itself if it was never requested
    /// - nothing while it is loading or after it failed
    /// - the following page once it is loaded, or page 1 when the current
    ///   page is the last known one and page 1 was never requested
    pub fn fetch_next_page(&self, current: PageNumber) -> Vec<PageNumber> {
        if current < FIRST_PAGE {
            return Vec::new();
        }

        match self.pages.get(&current) {
            None | Some(PageStatus::NotRequested) => vec![current],
            Some(PageStatus::Loading) | Some(PageStatus::Failed(_)) => Vec::new(),
            Some(PageStatus::Loaded(_)) => {
                let next = current.checked_add(1).and_then(|next| self.pages.get(&next));
                match next {
                    Some(PageStatus::NotRequested) => vec![current + 1],
                    None if self
                        .pages
                        .get(&FIRST_PAGE)
                        .is_some_and(PageStatus::is_not_requested) =>
                    {
                        vec![FIRST_PAGE]
                    }
                    _ => Vec::new(),
                }
            }
        }
    }

    /// Pages to request to walk the whole collection.
    ///
    /// Continues from the highest loaded page, or from page 1 when nothing
    /// has loaded yet.
    pub fn fetch_all_pages(&self) -> Vec<PageNumber> {
        let current = self
            .pages
            .iter()
            .rev()
            .find(|(_, status)| status.is_loaded())
            .map_or(FIRST_PAGE, |(&number, _)| number);

        self.fetch_next_page(current)
    }
}
