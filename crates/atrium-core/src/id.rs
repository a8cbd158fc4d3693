//! Strongly-typed identifiers for registry entities.
//!
//! Unlike random or time-ordered ids, registry identifiers are **dense
//! sequences**: each tenant's storage owns one counter per id kind, ids are
//! allocated in creation order starting at 1, and an allocated id is never
//! reused, not even after the entity it named is deleted.
//!
//! # Example
//!
//! ```rust
//! use atrium_core::id::{GlobalId, IdSequence};
//!
//! let seq = IdSequence::new();
//! let first: GlobalId = seq.next_global_id();
//! let second: GlobalId = seq.next_global_id();
//! assert!(second > first);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::Error;

/// A tenant-wide unique identifier of one artifact version.
///
/// Allocation order equals creation order across all artifacts of a tenant;
/// global ids are strictly increasing and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalId(u64);

/// A tenant-wide unique identifier of one deduplicated content entry.
///
/// The content hash deterministically determines the content id: storing the
/// same bytes twice yields the same `ContentId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(u64);

/// A per-artifact version number.
///
/// Starts at 1 for the first version of an artifact and increases by exactly
/// one per accepted write. Deleting a version does not renumber the remaining
/// versions or make its number reusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(u32);

macro_rules! id_impls {
    ($name:ident, $raw:ty, $label:literal) => {
        impl $name {
            /// Wraps a raw value previously produced by this registry.
            #[must_use]
            pub const fn from_raw(raw: $raw) -> Self {
                Self(raw)
            }

            /// Returns the raw numeric value.
            #[must_use]
            pub const fn as_raw(&self) -> $raw {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Error> {
                s.parse::<$raw>().map(Self).map_err(|e| Error::InvalidId {
                    message: format!(concat!("invalid ", $label, " '{}': {}"), s, e),
                })
            }
        }
    };
}

id_impls!(GlobalId, u64, "global id");
id_impls!(ContentId, u64, "content id");
id_impls!(Version, u32, "version number");

impl Version {
    /// The first version number of any artifact.
    pub const FIRST: Self = Self(1);

    /// Returns the next version number.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Per-tenant id allocator.
///
/// Owns one atomic counter per id kind. Counters start at 1 and only move
/// forward, so allocation is gap-free in allocation order even under
/// concurrent writers.
#[derive(Debug)]
pub struct IdSequence {
    global: AtomicU64,
    content: AtomicU64,
}

impl IdSequence {
    /// Creates a fresh allocator with both counters at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            global: AtomicU64::new(1),
            content: AtomicU64::new(1),
        }
    }

    /// Allocates the next global id.
    pub fn next_global_id(&self) -> GlobalId {
        GlobalId(self.global.fetch_add(1, Ordering::SeqCst))
    }

    /// Allocates the next content id.
    pub fn next_content_id(&self) -> ContentId {
        ContentId(self.content.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}
