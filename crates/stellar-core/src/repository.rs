use crate::error::Result;
use crate::short_id::ShortId;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Storage-assigned identity of a record. Never exposed to end users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub u64);

impl Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored URL record in the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlRecord {
    pub id: RecordId,
    /// The original URL that was shortened.
    pub original_url: String,
    /// The unique short id mapped to `original_url`.
    pub short_id: ShortId,
    /// When the record was created. Never mutated.
    pub created_at: Timestamp,
    /// When the record was last accessed; equals `created_at` until the first access.
    pub last_accessed_at: Timestamp,
    /// Number of successful accesses.
    pub click_count: u64,
    /// Reserved for soft deletion. Always `true` today.
    pub active: bool,
}

/// A record about to be inserted; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUrlRecord {
    pub original_url: String,
    pub short_id: ShortId,
    pub created_at: Timestamp,
}

impl NewUrlRecord {
    /// Materialises the stored form with zeroed statistics.
    pub fn into_record(self, id: RecordId) -> UrlRecord {
        UrlRecord {
            id,
            original_url: self.original_url,
            short_id: self.short_id,
            created_at: self.created_at,
            last_accessed_at: self.created_at,
            click_count: 0,
            active: true,
        }
    }
}

/// A read-only view of a repository.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the URL record for a given short id.
    /// Returns `None` if the id does not exist.
    async fn get(&self, id: &ShortId) -> Result<Option<UrlRecord>>;

    /// Checks whether a short id already exists in the repository.
    async fn exists(&self, id: &ShortId) -> Result<bool>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new URL record and returns it with its assigned id.
    ///
    /// Implementations must enforce short id uniqueness themselves and
    /// return `Err(Conflict)` when the id is already taken, even if a
    /// concurrent caller inserted it after an `exists` check.
    async fn insert(&self, record: NewUrlRecord) -> Result<UrlRecord>;

    /// Atomically increments the click count by one and moves
    /// `last_accessed_at` forward to `at` (never backwards).
    ///
    /// Returns the post-increment record, or `Err(NotFound)`.
    async fn increment_and_touch(&self, id: &ShortId, at: Timestamp) -> Result<UrlRecord>;
}
