//! Content-addressable store for artifact bytes.
//!
//! Content is deduplicated by the SHA-256 of the raw bytes: storing the same
//! bytes twice yields the same content id and keeps one copy. Entries are
//! reference-counted by the versions pointing at them and dropped when the
//! last reference goes away.

use std::collections::HashMap;

use atrium_core::{ContentHandle, ContentId, IdSequence};

/// One deduplicated content entry.
#[derive(Debug, Clone)]
pub(crate) struct ContentEntry {
    pub(crate) content: ContentHandle,
    pub(crate) hash: String,
    pub(crate) canonical_hash: String,
    references: usize,
}

/// In-memory content store for one tenant.
#[derive(Debug, Default)]
pub(crate) struct ContentStore {
    entries: HashMap<ContentId, ContentEntry>,
    by_hash: HashMap<String, ContentId>,
}

impl ContentStore {
    /// Stores `content`, returning the id of the (possibly pre-existing)
    /// entry and incrementing its reference count.
    pub(crate) fn store(&mut self, ids: &IdSequence, content: ContentHandle) -> ContentId {
        let hash = content.sha256_hex();
        if let Some(&content_id) = self.by_hash.get(&hash) {
            if let Some(entry) = self.entries.get_mut(&content_id) {
                entry.references += 1;
            }
            return content_id;
        }

        let content_id = ids.next_content_id();
        let canonical_hash = content.canonical_sha256_hex();
        self.by_hash.insert(hash.clone(), content_id);
        self.entries.insert(
            content_id,
            ContentEntry {
                content,
                hash,
                canonical_hash,
                references: 1,
            },
        );
        content_id
    }

    /// Drops one reference; the entry is removed when none remain.
    pub(crate) fn release(&mut self, content_id: ContentId) {
        let Some(entry) = self.entries.get_mut(&content_id) else {
            return;
        };
        entry.references = entry.references.saturating_sub(1);
        if entry.references == 0 {
            if let Some(entry) = self.entries.remove(&content_id) {
                self.by_hash.remove(&entry.hash);
            }
        }
    }

    pub(crate) fn get(&self, content_id: ContentId) -> Option<&ContentEntry> {
        self.entries.get(&content_id)
    }

    pub(crate) fn get_by_hash(&self, hash: &str) -> Option<&ContentEntry> {
        self.by_hash.get(hash).and_then(|id| self.entries.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_bytes(store: &mut ContentStore, ids: &IdSequence, bytes: &'static [u8]) -> ContentId {
        store.store(ids, ContentHandle::from_static(bytes))
    }

    #[test]
    fn identical_bytes_share_one_entry() {
        let ids = IdSequence::new();
        let mut store = ContentStore::default();

        let first = store_bytes(&mut store, &ids, b"{\"type\":\"string\"}");
        let second = store_bytes(&mut store, &ids, b"{\"type\":\"string\"}");
        assert_eq!(first, second);

        let third = store_bytes(&mut store, &ids, b"{\"type\":\"int\"}");
        assert_ne!(first, third);
    }

    #[test]
    fn entry_survives_until_last_release() {
        let ids = IdSequence::new();
        let mut store = ContentStore::default();

        let id = store_bytes(&mut store, &ids, b"shared");
        let same = store_bytes(&mut store, &ids, b"shared");
        assert_eq!(id, same);

        store.release(id);
        assert!(store.get(id).is_some(), "one reference remains");

        store.release(id);
        assert!(store.get(id).is_none(), "last reference released");
        assert!(store.get_by_hash(&ContentHandle::from_static(b"shared").sha256_hex()).is_none());
    }

    #[test]
    fn content_ids_are_not_reused_after_release() {
        let ids = IdSequence::new();
        let mut store = ContentStore::default();

        let first = store_bytes(&mut store, &ids, b"one");
        store.release(first);
        let second = store_bytes(&mut store, &ids, b"one");
        assert!(second > first, "released ids must not be reallocated");
    }
}
