use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use jiff::Timestamp;
use std::sync::atomic::{AtomicU64, Ordering};
use stellar_core::error::{Result, StorageError};
use stellar_core::repository::{NewUrlRecord, ReadRepository, RecordId, Repository, UrlRecord};
use stellar_core::ShortId;

/// In-memory implementation of the Repository trait using DashMap.
///
/// DashMap shards its locks, so operations on different short ids proceed
/// in parallel while operations on the same id serialise on its shard.
/// Both the uniqueness check on insert and the click increment run under
/// the shard's write lock, which makes them atomic per id.
#[derive(Debug)]
pub struct InMemoryRepository {
    storage: DashMap<String, UrlRecord>,
    next_id: AtomicU64,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: DashMap::with_capacity(capacity),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, id: &ShortId) -> Result<Option<UrlRecord>> {
        Ok(self.storage.get(id.as_str()).map(|entry| entry.value().clone()))
    }

    async fn exists(&self, id: &ShortId) -> Result<bool> {
        Ok(self.storage.contains_key(id.as_str()))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, record: NewUrlRecord) -> Result<UrlRecord> {
        match self.storage.entry(record.short_id.as_str().to_owned()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(record.short_id.to_string())),
            Entry::Vacant(slot) => {
                let id = RecordId(self.next_id.fetch_add(1, Ordering::Relaxed));
                let stored = record.into_record(id);
                slot.insert(stored.clone());
                Ok(stored)
            }
        }
    }

    async fn increment_and_touch(&self, id: &ShortId, at: Timestamp) -> Result<UrlRecord> {
        let Some(mut entry) = self.storage.get_mut(id.as_str()) else {
            return Err(StorageError::NotFound(id.to_string()));
        };

        entry.click_count += 1;
        if at > entry.last_accessed_at {
            entry.last_accessed_at = at;
        }

        Ok(entry.value().clone())
    }
}
