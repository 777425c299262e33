//! Snapshot encoding for collections.
//!
//! Two formats:
//! - JSON, for debugging and interop
//! - a binary envelope around a MessagePack payload, checksummed so that a
//!   truncated or corrupted file is rejected instead of silently misread
//!
//! Envelope layout (little-endian):
//!
//! ```text
//! magic "PGC\0" | version u8 | payload length u32 | crc32 u32 | payload
//! ```

use crate::collection::PaginatedCollection;
use crate::error::{CollectionError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::hash::Hash;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Magic bytes for a snapshot envelope.
const SNAPSHOT_MAGIC: &[u8; 4] = b"PGC\0";

/// Current snapshot format version.
const SNAPSHOT_VERSION: u8 = 1;

/// Magic + version + length + crc.
const HEADER_LEN: usize = 4 + 1 + 4 + 4;

/// Serialize a collection to JSON.
pub fn to_json<K, V, E>(collection: &PaginatedCollection<K, V, E>) -> Result<String>
where
    K: Serialize,
    V: Serialize,
    E: Serialize,
{
    Ok(serde_json::to_string(collection)?)
}

/// Deserialize a collection from JSON.
pub fn from_json<K, V, E>(json: &str) -> Result<PaginatedCollection<K, V, E>>
where
    K: DeserializeOwned + Eq + Hash + Clone,
    V: DeserializeOwned,
    E: DeserializeOwned,
{
    Ok(serde_json::from_str(json)?)
}

/// Encode a collection into a binary envelope.
pub fn encode<K, V, E>(collection: &PaginatedCollection<K, V, E>) -> Result<Vec<u8>>
where
    K: Serialize,
    V: Serialize,
    E: Serialize,
{
    let payload = rmp_serde::to_vec_named(collection)?;
    let len = u32::try_from(payload.len()).map_err(|_| {
        CollectionError::Serialization(format!("Snapshot too large: {} bytes", payload.len()))
    })?;

    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(SNAPSHOT_MAGIC);
    out.push(SNAPSHOT_VERSION);
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Decode a binary envelope produced by [`encode`].
pub fn decode<K, V, E>(bytes: &[u8]) -> Result<PaginatedCollection<K, V, E>>
where
    K: DeserializeOwned + Eq + Hash + Clone,
    V: DeserializeOwned,
    E: DeserializeOwned,
{
    if bytes.len() < HEADER_LEN {
        return Err(CollectionError::InvalidFormat(format!(
            "Snapshot truncated: {} bytes, header needs {}",
            bytes.len(),
            HEADER_LEN
        )));
    }

    let (header, rest) = bytes.split_at(HEADER_LEN);
    if &header[0..4] != SNAPSHOT_MAGIC {
        return Err(CollectionError::InvalidFormat("Invalid snapshot magic".into()));
    }
    if header[4] != SNAPSHOT_VERSION {
        return Err(CollectionError::InvalidFormat(format!(
            "Unsupported snapshot version: {}",
            header[4]
        )));
    }

    let len = u32::from_le_bytes([header[5], header[6], header[7], header[8]]) as usize;
    let expected = u32::from_le_bytes([header[9], header[10], header[11], header[12]]);

    if rest.len() != len {
        return Err(CollectionError::InvalidFormat(format!(
            "Snapshot payload length mismatch: header says {}, found {}",
            len,
            rest.len()
        )));
    }

    let got = crc32fast::hash(rest);
    if got != expected {
        return Err(CollectionError::ChecksumMismatch { expected, got });
    }

    Ok(rmp_serde::from_slice(rest)?)
}

/// Write a binary snapshot to `path`, replacing any existing file.
pub fn save<K, V, E>(path: impl AsRef<Path>, collection: &PaginatedCollection<K, V, E>) -> Result<()>
where
    K: Serialize,
    V: Serialize,
    E: Serialize,
{
    let path = path.as_ref();
    let bytes = encode(collection)?;

    let mut file = File::create(path)?;
    file.write_all(&bytes)?;
    file.sync_all()?;

    debug!(path = %path.display(), bytes = bytes.len(), "Saved snapshot");
    Ok(())
}

/// Read a binary snapshot from `path`.
pub fn load<K, V, E>(path: impl AsRef<Path>) -> Result<PaginatedCollection<K, V, E>>
where
    K: DeserializeOwned + Eq + Hash + Clone,
    V: DeserializeOwned,
    E: DeserializeOwned,
{
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "Loading snapshot");
    decode(&bytes)
}
