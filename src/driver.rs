//! Driving fetches against a backend.
//!
//! The collection only decides *which* page to fetch. [`PageSource`] is the
//! seam to whatever actually talks to the backend, and [`FetchDriver`] runs
//! the ask / mark loading / fetch / apply cycle synchronously.

use crate::collection::PaginatedCollection;
use crate::error::{CollectionError, Result};
use crate::types::{FetchResponse, PageNumber};
use std::hash::Hash;
use tracing::{debug, info, warn};

/// Backend fetch collaborator.
pub trait PageSource<K, V, E> {
    /// Request one page and report the outcome.
    fn fetch_page(&mut self, page: PageNumber) -> FetchResponse<K, V, E>;
}

impl<K, V, E, F> PageSource<K, V, E> for F
where
    F: FnMut(PageNumber) -> FetchResponse<K, V, E>,
{
    fn fetch_page(&mut self, page: PageNumber) -> FetchResponse<K, V, E> {
        self(page)
    }
}

/// Driver configuration.
#[derive(Clone, Debug)]
pub struct DriverConfig {
    /// Upper bound on requests issued by a single `fetch_all` run.
    /// Default: 1000
    pub max_requests: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self { max_requests: 1000 }
    }
}

/// What a `fetch_all` run did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FetchReport {
    /// Pages requested, in request order.
    pub requested: Vec<PageNumber>,
    /// Pages whose request failed.
    pub failed: Vec<PageNumber>,
}

impl FetchReport {
    pub fn request_count(&self) -> usize {
        self.requested.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs fetch cycles against a [`PageSource`].
#[derive(Clone, Debug, Default)]
pub struct FetchDriver {
    config: DriverConfig,
}

impl FetchDriver {
    pub fn new(config: DriverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Fetch pages until the collection has nothing more to suggest.
    ///
    /// Stops early when a request fails (the failed page is not retried) or
    /// when a response leaves the page loading.
    pub fn fetch_all<K, V, E, S>(
        &self,
        mut collection: PaginatedCollection<K, V, E>,
        source: &mut S,
    ) -> Result<(PaginatedCollection<K, V, E>, FetchReport)>
    where
        K: Eq + Hash + Clone,
        S: PageSource<K, V, E> + ?Sized,
    {
        let mut report = FetchReport::default();

        loop {
            let pages = collection.fetch_all_pages();
            if pages.is_empty() {
                break;
            }

            for page in pages {
                if report.requested.len() >= self.config.max_requests {
                    warn!(
                        limit = self.config.max_requests,
                        page, "Request limit reached"
                    );
                    return Err(CollectionError::RequestLimitExceeded {
                        limit: self.config.max_requests,
                    });
                }

                collection = Self::request(collection, page, source, &mut report);
            }
        }

        info!(
            requests = report.request_count(),
            failed = report.failed.len(),
            total_count = ?collection.get_total_count(),
            "Fetch run finished"
        );

        Ok((collection, report))
    }

    /// Fetch at most one page, chosen by `fetch_next_page(current)`.
    ///
    /// Returns the requested page, if any.
    pub fn fetch_next<K, V, E, S>(
        &self,
        mut collection: PaginatedCollection<K, V, E>,
        current: PageNumber,
        source: &mut S,
    ) -> (PaginatedCollection<K, V, E>, Option<PageNumber>)
    where
        K: Eq + Hash + Clone,
        S: PageSource<K, V, E> + ?Sized,
    {
        let mut report = FetchReport::default();
        let requested = collection.fetch_next_page(current).into_iter().next();

        if let Some(page) = requested {
            collection = Self::request(collection, page, source, &mut report);
        }

        (collection, requested)
    }

    fn request<K, V, E, S>(
        collection: PaginatedCollection<K, V, E>,
        page: PageNumber,
        source: &mut S,
        report: &mut FetchReport,
    ) -> PaginatedCollection<K, V, E>
    where
        K: Eq + Hash + Clone,
        S: PageSource<K, V, E> + ?Sized,
    {
        debug!(page, "Requesting page");
        let collection = collection.set_page_loading(page);
        report.requested.push(page);

        let response = source.fetch_page(page);
        match &response {
            FetchResponse::Failed(_) => {
                warn!(page, "Page request failed");
                report.failed.push(page);
            }
            FetchResponse::Succeeded { items, total_count } => {
                debug!(page, items = items.len(), total_count, "Page loaded");
            }
            FetchResponse::Loading | FetchResponse::NotRequested => {
                debug!(page, status = %response.kind(), "Page not settled");
            }
        }

        collection.handle_fetched_page(page, response)
    }
}
