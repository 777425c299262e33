//! Pagination control model for UI rendering.
//!
//! The collection does no rendering. This module turns its page map into the
//! data a pager widget needs: an ordered list of page links with active and
//! clickable state, the current page, and a trigger for "user selected page N".

use crate::collection::PaginatedCollection;
use crate::error::{CollectionError, Result};
use crate::types::{PageNumber, PageStatusKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Pager configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PagerConfig {
    /// Maximum number of links to show (None = all known pages).
    pub max_links: Option<usize>,
}

/// One entry in a pagination control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub number: PageNumber,
    pub status: PageStatusKind,
    /// This is the current page.
    pub active: bool,
    /// Selecting this link should trigger navigation.
    pub clickable: bool,
}

/// Build page links for every known page of `collection`.
///
/// With `max_links` set, a window of consecutive links centered on `current`
/// is returned, clamped to the known range.
pub fn page_links<K, V, E>(
    collection: &PaginatedCollection<K, V, E>,
    current: PageNumber,
    config: &PagerConfig,
) -> Vec<PageLink>
where
    K: Eq + Hash + Clone,
{
    let links: Vec<PageLink> = collection
        .pages
        .iter()
        .map(|(&number, status)| PageLink {
            number,
            status: status.kind(),
            active: number == current,
            clickable: number != current,
        })
        .collect();

    match config.max_links {
        Some(max) if links.len() > max => {
            let center = links
                .iter()
                .position(|link| link.active)
                .unwrap_or_else(|| links.partition_point(|link| link.number < current));
            let start = center
                .saturating_sub(max / 2)
                .min(links.len() - max);
            links[start..start + max].to_vec()
        }
        _ => links,
    }
}

/// A pagination control bound to a selection callback.
pub struct Pager<F> {
    links: Vec<PageLink>,
    current: PageNumber,
    config: PagerConfig,
    on_select: F,
}

impl<F: FnMut(PageNumber)> Pager<F> {
    /// Build a pager for `collection` positioned at `current`.
    pub fn new<K, V, E>(
        collection: &PaginatedCollection<K, V, E>,
        current: PageNumber,
        config: PagerConfig,
        on_select: F,
    ) -> Self
    where
        K: Eq + Hash + Clone,
    {
        Self {
            links: page_links(collection, current, &config),
            current,
            config,
            on_select,
        }
    }

    pub fn links(&self) -> &[PageLink] {
        &self.links
    }

    pub fn current(&self) -> PageNumber {
        self.current
    }

    /// Rebuild links after the collection changed.
    pub fn refresh<K, V, E>(&mut self, collection: &PaginatedCollection<K, V, E>)
    where
        K: Eq + Hash + Clone,
    {
        self.links = page_links(collection, self.current, &self.config);
    }

    /// Handle a user selecting `page`.
    ///
    /// Fires the callback and moves the active link when `page` is a
    /// clickable link; otherwise returns `InvalidPage` and does nothing.
    pub fn select(&mut self, page: PageNumber) -> Result<()> {
        let clickable = self
            .links
            .iter()
            .any(|link| link.number == page && link.clickable);
        if !clickable {
            return Err(CollectionError::InvalidPage(page));
        }

        (self.on_select)(page);

        self.current = page;
        for link in &mut self.links {
            link.active = link.number == page;
            link.clickable = !link.active;
        }
        Ok(())
    }
}

impl<F> fmt::Debug for Pager<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pager")
            .field("links", &self.links)
            .field("current", &self.current)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FetchResponse;

    type Collection = PaginatedCollection<u32, u32, ()>;

    fn ten_pages() -> Collection {
        Collection::new().handle_fetched_page(
            1,
            FetchResponse::succeeded((0..10).map(|k| (k, k)), 100),
        )
    }

    fn numbers(links: &[PageLink]) -> Vec<PageNumber> {
        links.iter().map(|l| l.number).collect()
    }

    #[test]
    fn test_all_links() {
        let links = page_links(&ten_pages(), 1, &PagerConfig::default());
        assert_eq!(links.len(), 10);
        assert_eq!(links.iter().filter(|l| l.active).count(), 1);
        assert!(links[0].active && !links[0].clickable);
        assert_eq!(links[0].status, PageStatusKind::Loaded);
        assert!(links[1].clickable);
        assert_eq!(links[1].status, PageStatusKind::NotRequested);
    }

    #[test]
    fn test_window_centered_and_clamped() {
        let config = PagerConfig { max_links: Some(5) };
        let c = ten_pages();

        assert_eq!(numbers(&page_links(&c, 5, &config)), vec![3, 4, 5, 6, 7]);
        assert_eq!(numbers(&page_links(&c, 1, &config)), vec![1, 2, 3, 4, 5]);
        assert_eq!(numbers(&page_links(&c, 10, &config)), vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_window_for_unknown_current() {
        let config = PagerConfig { max_links: Some(3) };
        let links = page_links(&ten_pages(), 42, &config);
        assert_eq!(numbers(&links), vec![8, 9, 10]);
        assert!(links.iter().all(|l| !l.active));
    }

    #[test]
    fn test_empty_collection_has_no_links() {
        let links = page_links(&Collection::new(), 1, &PagerConfig { max_links: Some(3) });
        assert!(links.is_empty());
    }

    #[test]
    fn test_select_fires_callback() {
        let mut selected = Vec::new();
        {
            let mut pager = Pager::new(&ten_pages(), 1, PagerConfig::default(), |page| {
                selected.push(page)
            });
            pager.select(4).unwrap();
            assert_eq!(pager.current(), 4);
            assert!(pager.links()[3].active);
            assert!(pager.links()[0].clickable);
        }
        assert_eq!(selected, vec![4]);
    }

    #[test]
    fn test_select_rejects_active_and_unknown() {
        let mut calls = 0;
        let mut pager = Pager::new(&ten_pages(), 2, PagerConfig::default(), |_| calls += 1);

        assert!(matches!(pager.select(2), Err(CollectionError::InvalidPage(2))));
        assert!(matches!(pager.select(11), Err(CollectionError::InvalidPage(11))));
        assert!(matches!(pager.select(0), Err(CollectionError::InvalidPage(0))));
        assert_eq!(pager.current(), 2);
        drop(pager);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_refresh_picks_up_new_pages() {
        let c = Collection::new();
        let mut pager = Pager::new(&c, 1, PagerConfig::default(), |_| {});
        assert!(pager.links().is_empty());

        pager.refresh(&ten_pages());
        assert_eq!(pager.links().len(), 10);
        assert!(pager.links()[0].active);
    }
}
