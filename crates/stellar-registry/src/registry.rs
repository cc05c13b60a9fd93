use crate::allocator::{AllocatorSettings, IdentifierAllocator};
use async_trait::async_trait;
use std::sync::Arc;
use stellar_core::{
    Clock, CreateParams, NewUrlRecord, Registry, RegistryError, Repository, ShortId,
    StorageError, SystemClock, UrlRecord,
};
use stellar_generator::Generator;
use tracing::{debug, info, trace, warn};

type Result<T> = std::result::Result<T, RegistryError>;

/// A concrete implementation of the `Registry` trait.
///
/// This service wraps a `Repository`, an [`IdentifierAllocator`] and a
/// [`Clock`] to handle:
/// - Short id allocation (custom alias or generated)
/// - Translation of store-level uniqueness violations
/// - Atomic access counting
///
/// It holds no mutable state of its own; all coordination between
/// concurrent callers happens in the repository.
#[derive(Debug)]
pub struct UrlRegistry<R, G, C = SystemClock> {
    repository: Arc<R>,
    allocator: IdentifierAllocator<R, G>,
    clock: C,
}

impl<R: Repository, G: Generator> UrlRegistry<R, G, SystemClock> {
    /// Creates a new `UrlRegistry` using the system clock.
    pub fn new(repository: R, generator: G, settings: AllocatorSettings) -> Result<Self> {
        Self::with_clock(repository, generator, settings, SystemClock)
    }
}

impl<R: Repository, G: Generator, C: Clock> UrlRegistry<R, G, C> {
    pub fn with_clock(
        repository: R,
        generator: G,
        settings: AllocatorSettings,
        clock: C,
    ) -> Result<Self> {
        let repository = Arc::new(repository);
        let allocator = IdentifierAllocator::new(Arc::clone(&repository), generator, settings)?;
        Ok(Self {
            repository,
            allocator,
            clock,
        })
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Blank URLs are rejected, and so are control characters: the URL is
    /// sent back verbatim as a `Location` header.
    fn validate_url(url: &str) -> Result<()> {
        if url.trim().is_empty() {
            return Err(RegistryError::InvalidInput(
                "URL cannot be empty".to_string(),
            ));
        }
        if url.chars().any(char::is_control) {
            return Err(RegistryError::InvalidInput(
                "URL must not contain control characters".to_string(),
            ));
        }
        Ok(())
    }

    /// An empty alias means "generate one for me".
    fn parse_alias(alias: Option<String>) -> Result<Option<ShortId>> {
        match alias {
            Some(alias) if !alias.is_empty() => ShortId::new(alias).map(Some),
            _ => Ok(None),
        }
    }

    fn new_record(&self, original_url: String, short_id: ShortId) -> NewUrlRecord {
        NewUrlRecord {
            original_url,
            short_id,
            created_at: self.clock.now(),
        }
    }

    async fn create_with_alias(&self, original_url: String, alias: ShortId) -> Result<UrlRecord> {
        let short_id = self.allocator.allocate(Some(&alias)).await?;

        // A conflict here means another caller claimed the alias after our
        // existence check; the store's answer wins.
        let record = self
            .repository
            .insert(self.new_record(original_url, short_id))
            .await?;

        info!(short_id = %record.short_id, "created short url with custom alias");
        Ok(record)
    }

    async fn create_generated(&self, original_url: String) -> Result<UrlRecord> {
        let mut budget = self.allocator.budget();

        loop {
            let short_id = self.allocator.allocate_generated(&mut budget).await?;

            match self
                .repository
                .insert(self.new_record(original_url.clone(), short_id))
                .await
            {
                Ok(record) => {
                    info!(
                        short_id = %record.short_id,
                        attempts = budget.attempts(),
                        "created short url"
                    );
                    return Ok(record);
                }
                Err(StorageError::Conflict(short_id)) => {
                    warn!(
                        short_id = %short_id,
                        attempts = budget.attempts(),
                        "generated short id was claimed concurrently, retrying"
                    );
                }
                Err(other) => return Err(other.into()),
            }
        }
    }
}

#[async_trait]
impl<R: Repository, G: Generator, C: Clock> Registry for UrlRegistry<R, G, C> {
    async fn create(&self, params: CreateParams) -> Result<UrlRecord> {
        Self::validate_url(&params.original_url)?;

        match Self::parse_alias(params.custom_alias)? {
            Some(alias) => self.create_with_alias(params.original_url, alias).await,
            None => self.create_generated(params.original_url).await,
        }
    }

    async fn resolve(&self, id: &ShortId) -> Result<UrlRecord> {
        trace!(short_id = %id, "resolving short id");

        match self.repository.get(id).await? {
            Some(record) => {
                debug!(short_id = %id, url = %record.original_url, "resolved short id");
                Ok(record)
            }
            None => {
                trace!(short_id = %id, "short id not found");
                Err(RegistryError::NotFound(id.to_string()))
            }
        }
    }

    async fn record_access(&self, id: &ShortId) -> Result<UrlRecord> {
        let record = self
            .repository
            .increment_and_touch(id, self.clock.now())
            .await?;

        debug!(
            short_id = %id,
            click_count = record.click_count,
            "recorded access"
        );
        Ok(record)
    }
}
