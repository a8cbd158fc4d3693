//! Content handles: raw artifact bytes plus their identity hashes.
//!
//! A [`ContentHandle`] wraps the immutable bytes of one published schema
//! document. Identity is hash-based: the SHA-256 of the raw bytes
//! deduplicates storage, and the SHA-256 of the canonical JSON form (when the
//! content is JSON) matches documents that differ only in formatting.

use bytes::Bytes;
use sha2::{Digest, Sha256};

use crate::canonical;

/// Immutable artifact content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentHandle {
    bytes: Bytes,
}

impl ContentHandle {
    /// Wraps the given bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Wraps a static byte slice without copying.
    #[must_use]
    pub const fn from_static(bytes: &'static [u8]) -> Self {
        Self {
            bytes: Bytes::from_static(bytes),
        }
    }

    /// Returns the raw bytes.
    #[must_use]
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Returns the content length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true when the content is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the lowercase hex SHA-256 of the raw bytes.
    #[must_use]
    pub fn sha256_hex(&self) -> String {
        hex_digest(&self.bytes)
    }

    /// Returns the lowercase hex SHA-256 of the canonical JSON form.
    ///
    /// Falls back to the raw-bytes hash when the content is not valid JSON,
    /// so every content handle has exactly one canonical hash.
    #[must_use]
    pub fn canonical_sha256_hex(&self) -> String {
        match canonical::canonicalize(&self.bytes) {
            Some(canonical_bytes) => hex_digest(&canonical_bytes),
            None => self.sha256_hex(),
        }
    }

    /// Parses the content as a JSON value.
    ///
    /// # Errors
    ///
    /// Returns the underlying parse error when the bytes are not valid JSON.
    pub fn parse_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.bytes)
    }
}

impl From<Bytes> for ContentHandle {
    fn from(bytes: Bytes) -> Self {
        Self::new(bytes)
    }
}

impl From<Vec<u8>> for ContentHandle {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&str> for ContentHandle {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes().to_vec())
    }
}

fn hex_digest(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(64);
    for byte in digest {
        use std::fmt::Write;
        let _ = write!(out, "{byte:02x}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_bytes_same_hash() {
        let a = ContentHandle::from_static(b"{\"type\":\"string\"}");
        let b = ContentHandle::from_static(b"{\"type\":\"string\"}");
        assert_eq!(a.sha256_hex(), b.sha256_hex());
    }

    #[test]
    fn different_bytes_different_hash() {
        let a = ContentHandle::from_static(b"{\"type\":\"string\"}");
        let b = ContentHandle::from_static(b"{\"type\":\"int\"}");
        assert_ne!(a.sha256_hex(), b.sha256_hex());
    }

    #[test]
    fn canonical_hash_ignores_formatting() {
        let a = ContentHandle::from_static(b"{ \"type\" : \"string\" }");
        let b = ContentHandle::from_static(b"{\"type\":\"string\"}");
        assert_ne!(a.sha256_hex(), b.sha256_hex());
        assert_eq!(a.canonical_sha256_hex(), b.canonical_sha256_hex());
    }

    #[test]
    fn canonical_hash_of_non_json_is_raw_hash() {
        let c = ContentHandle::from_static(b"message Foo {}");
        assert_eq!(c.canonical_sha256_hex(), c.sha256_hex());
    }
}
