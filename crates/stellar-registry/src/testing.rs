//! Test doubles shared by the unit tests of this crate.

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use parking_lot::Mutex;
use std::sync::Arc;
use stellar_core::error::{Result, StorageError};
use stellar_core::{Clock, NewUrlRecord, ReadRepository, Repository, ShortId, UrlRecord};
use stellar_generator::Generator;
use stellar_storage::InMemoryRepository;

pub(crate) fn new_record(url: &str, id: &str) -> NewUrlRecord {
    NewUrlRecord {
        original_url: url.to_string(),
        short_id: ShortId::new_unchecked(id),
        created_at: Timestamp::now(),
    }
}

/// Always proposes `"a"` repeated to the requested length.
#[derive(Debug)]
pub(crate) struct ConstantGenerator;

impl Generator for ConstantGenerator {
    fn generate(&self, length: usize) -> ShortId {
        ShortId::new_unchecked("a".repeat(length))
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub(crate) struct TestClock {
    now: Arc<Mutex<Timestamp>>,
}

impl TestClock {
    pub(crate) fn new(now: Timestamp) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub(crate) fn advance(&self, by: SignedDuration) {
        let mut now = self.now.lock();
        *now = *now + by;
    }
}

impl Clock for TestClock {
    fn now(&self) -> Timestamp {
        *self.now.lock()
    }
}

/// Reports every id as free, as if a concurrent insert happened right
/// after the existence check.
#[derive(Debug, Default)]
pub(crate) struct BlindRepository {
    pub(crate) inner: InMemoryRepository,
}

#[async_trait]
impl ReadRepository for BlindRepository {
    async fn get(&self, id: &ShortId) -> Result<Option<UrlRecord>> {
        self.inner.get(id).await
    }

    async fn exists(&self, _id: &ShortId) -> Result<bool> {
        Ok(false)
    }
}

#[async_trait]
impl Repository for BlindRepository {
    async fn insert(&self, record: NewUrlRecord) -> Result<UrlRecord> {
        self.inner.insert(record).await
    }

    async fn increment_and_touch(&self, id: &ShortId, at: Timestamp) -> Result<UrlRecord> {
        self.inner.increment_and_touch(id, at).await
    }
}

/// Every call fails as if the backend were down.
#[derive(Debug, Default)]
pub(crate) struct UnavailableRepository;

fn unavailable<T>() -> Result<T> {
    Err(StorageError::Unavailable("connection refused".to_string()))
}

#[async_trait]
impl ReadRepository for UnavailableRepository {
    async fn get(&self, _id: &ShortId) -> Result<Option<UrlRecord>> {
        unavailable()
    }

    async fn exists(&self, _id: &ShortId) -> Result<bool> {
        unavailable()
    }
}

#[async_trait]
impl Repository for UnavailableRepository {
    async fn insert(&self, _record: NewUrlRecord) -> Result<UrlRecord> {
        unavailable()
    }

    async fn increment_and_touch(&self, _id: &ShortId, _at: Timestamp) -> Result<UrlRecord> {
        unavailable()
    }
}
