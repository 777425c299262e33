//! The paginated collection and its operations.
//!
//! The collection is a plain value: every mutator consumes it and returns the
//! updated value. Operations are split by concern:
//! - `paginated`: the type, accessors and item mutators
//! - `reconcile`: applying fetch responses to the page map
//! - `fetch`: deciding which page to request next

mod fetch;
mod paginated;
mod reconcile;

pub use paginated::PaginatedCollection;
