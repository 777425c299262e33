//! Fetch driver tests against simulated backends.

use paginated_collection::{
    CollectionError, DriverConfig, FetchDriver, FetchResponse, PageNumber, PageSource,
    PaginatedCollection,
};
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq)]
enum HttpError {
    Timeout,
    Status(u16),
}

type Collection = PaginatedCollection<u64, String, HttpError>;
type Response = FetchResponse<u64, String, HttpError>;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// A backend that serves `total` items in pages and can be told to fail
/// specific pages a number of times.
struct FakeBackend {
    total: u64,
    page_size: u64,
    failures: HashMap<PageNumber, (u32, HttpError)>,
    calls: Vec<PageNumber>,
}

impl FakeBackend {
    fn new(total: u64, page_size: u64) -> Self {
        Self {
            total,
            page_size,
            failures: HashMap::new(),
            calls: Vec::new(),
        }
    }

    fn fail(mut self, page: PageNumber, times: u32, error: HttpError) -> Self {
        self.failures.insert(page, (times, error));
        self
    }
}

impl PageSource<u64, String, HttpError> for FakeBackend {
    fn fetch_page(&mut self, page: PageNumber) -> Response {
        self.calls.push(page);

        if let Some((remaining, error)) = self.failures.get_mut(&page) {
            if *remaining > 0 {
                *remaining -= 1;
                return Response::Failed(error.clone());
            }
        }

        let start = (page as u64 - 1) * self.page_size;
        let end = (start + self.page_size).min(self.total);
        Response::succeeded(
            (start..end).map(|id| (id, format!("record {}", id))),
            self.total as usize,
        )
    }
}

#[test]
fn test_fetch_all_pages_in_order() {
    init_tracing();
    let mut backend = FakeBackend::new(95, 10);

    let (c, report) = FetchDriver::default()
        .fetch_all(Collection::new(), &mut backend)
        .unwrap();

    assert_eq!(backend.calls, (1..=10).collect::<Vec<_>>());
    assert_eq!(report.requested, backend.calls);
    assert!(report.is_complete());
    assert_eq!(c.len(), 95);
    assert_eq!(c.get_total_count(), Some(95));
    assert_eq!(c.get(&94).map(String::as_str), Some("record 94"));
}

#[test]
fn test_resume_after_failure() {
    init_tracing();
    let driver = FetchDriver::default();
    let mut backend = FakeBackend::new(30, 10).fail(2, 1, HttpError::Status(503));

    let (c, report) = driver.fetch_all(Collection::new(), &mut backend).unwrap();
    assert_eq!(report.failed, vec![2]);
    assert_eq!(c.page(2).and_then(|s| s.error()), Some(&HttpError::Status(503)));

    // The driver does not retry. The caller resets the page and runs again.
    let c = c.handle_fetched_page(2, Response::NotRequested);
    let (c, report) = driver.fetch_all(c, &mut backend).unwrap();

    assert_eq!(report.requested, vec![2, 3]);
    assert_eq!(c.len(), 30);
    assert!(c.fetch_all_pages().is_empty());
}

#[test]
fn test_empty_backend() {
    init_tracing();
    let mut backend = FakeBackend::new(0, 10);

    let (c, report) = FetchDriver::default()
        .fetch_all(Collection::new(), &mut backend)
        .unwrap();

    assert_eq!(report.requested, vec![1]);
    assert!(c.is_empty());
    assert_eq!(c.get_total_count(), Some(0));
}

#[test]
fn test_closure_source_with_limit() {
    init_tracing();
    let driver = FetchDriver::new(DriverConfig { max_requests: 3 });
    let mut source = |page: PageNumber| -> Response {
        Response::succeeded(vec![(page as u64, "x".to_string())], 100)
    };

    let result = driver.fetch_all(Collection::new(), &mut source);
    assert!(matches!(
        result,
        Err(CollectionError::RequestLimitExceeded { limit: 3 })
    ));
}

#[test]
fn test_browse_from_middle_page() {
    init_tracing();
    let driver = FetchDriver::default();
    let mut backend = FakeBackend::new(30, 10).fail(1, 1, HttpError::Timeout);

    // User lands on page 3 directly.
    let (c, page) = driver.fetch_next(Collection::new(), 3, &mut backend);
    assert_eq!(page, Some(3));

    // Last page loaded; wrap-around prefetch asks for page 1, which fails.
    let (c, page) = driver.fetch_next(c, 3, &mut backend);
    assert_eq!(page, Some(1));
    assert!(c.page(1).unwrap().is_failed());

    // Nothing more is suggested from page 3 until the caller intervenes.
    let (_, page) = driver.fetch_next(c, 3, &mut backend);
    assert_eq!(page, None);
}
