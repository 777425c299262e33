//! Error types for the collection's outer layers.
//!
//! Operations on [`PaginatedCollection`](crate::PaginatedCollection) itself
//! never fail; page fetch failures are stored as data. These errors come from
//! snapshots, the fetch driver and the pager.

use crate::types::PageNumber;
use thiserror::Error;

/// Main error type.
#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Invalid snapshot format: {0}")]
    InvalidFormat(String),

    #[error("Checksum mismatch: expected {expected}, got {got}")]
    ChecksumMismatch { expected: u32, got: u32 },

    #[error("Invalid page: {0}")]
    InvalidPage(PageNumber),

    #[error("Request limit exceeded: {limit} requests issued without completing")]
    RequestLimitExceeded { limit: usize },
}

impl From<serde_json::Error> for CollectionError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_data() || e.is_syntax() || e.is_eof() {
            CollectionError::Deserialization(e.to_string())
        } else {
            CollectionError::Serialization(e.to_string())
        }
    }
}

impl From<rmp_serde::encode::Error> for CollectionError {
    fn from(e: rmp_serde::encode::Error) -> Self {
        CollectionError::Serialization(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for CollectionError {
    fn from(e: rmp_serde::decode::Error) -> Self {
        CollectionError::Deserialization(e.to_string())
    }
}

/// Result type for fallible collection operations.
pub type Result<T> = std::result::Result<T, CollectionError>;
