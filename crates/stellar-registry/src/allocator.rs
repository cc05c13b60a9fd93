use std::sync::Arc;
use stellar_core::short_id::{MAX_LENGTH, MIN_LENGTH};
use stellar_core::{ReadRepository, RegistryError, ShortId};
use stellar_generator::Generator;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

type Result<T> = std::result::Result<T, RegistryError>;

/// Ids that collide with fixed HTTP routes next to the redirect route.
pub const RESERVED_IDS: &[&str] = &["shorten", "stats"];

fn is_reserved(id: &ShortId) -> bool {
    RESERVED_IDS.contains(&id.as_str())
}

/// Tuning for random short id allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TypedBuilder)]
pub struct AllocatorSettings {
    /// Length of generated ids before any growth.
    #[builder(default = 6)]
    pub length: usize,
    /// Candidates drawn at one length before moving to the next.
    #[builder(default = 8)]
    pub max_attempts_per_length: u32,
    /// Longest generated id; allocation fails once this length is spent too.
    #[builder(default = 12)]
    pub max_length: usize,
}

impl Default for AllocatorSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl AllocatorSettings {
    fn validate(&self) -> Result<()> {
        if self.length < MIN_LENGTH || self.max_length > MAX_LENGTH {
            return Err(RegistryError::InvalidInput(format!(
                "generated id lengths must stay within {MIN_LENGTH}..={MAX_LENGTH}, got {}..={}",
                self.length, self.max_length
            )));
        }
        if self.length > self.max_length {
            return Err(RegistryError::InvalidInput(format!(
                "id length {} exceeds max id length {}",
                self.length, self.max_length
            )));
        }
        if self.max_attempts_per_length == 0 {
            return Err(RegistryError::InvalidInput(
                "max attempts per length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Remaining candidate draws for one allocation.
///
/// A single budget covers both existence checks and insert collisions of
/// one create call, so the whole call is bounded.
#[derive(Debug, Clone)]
pub struct AllocationBudget {
    settings: AllocatorSettings,
    length: usize,
    attempts_at_length: u32,
    attempts: u32,
}

impl AllocationBudget {
    fn new(settings: AllocatorSettings) -> Self {
        Self {
            settings,
            length: settings.length,
            attempts_at_length: 0,
            attempts: 0,
        }
    }

    /// Consumes one draw and returns its length, or `None` when exhausted.
    fn next_length(&mut self) -> Option<usize> {
        if self.attempts_at_length >= self.settings.max_attempts_per_length {
            self.length += 1;
            self.attempts_at_length = 0;
        }
        if self.length > self.settings.max_length {
            return None;
        }
        self.attempts_at_length += 1;
        self.attempts += 1;
        Some(self.length)
    }

    /// Total draws consumed so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

/// Decides which short id a new record should try to claim.
///
/// The allocator only reads from the repository. The store's uniqueness
/// constraint remains the source of truth: an id returned here may still
/// be claimed by a concurrent caller before it is inserted.
#[derive(Debug)]
pub struct IdentifierAllocator<R, G> {
    repository: Arc<R>,
    generator: G,
    settings: AllocatorSettings,
}

impl<R: ReadRepository, G: Generator> IdentifierAllocator<R, G> {
    pub fn new(repository: Arc<R>, generator: G, settings: AllocatorSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            repository,
            generator,
            settings,
        })
    }

    pub fn settings(&self) -> &AllocatorSettings {
        &self.settings
    }

    /// A fresh budget for one allocation.
    pub fn budget(&self) -> AllocationBudget {
        AllocationBudget::new(self.settings)
    }

    /// Returns `custom_alias` if it is free, otherwise a free generated id.
    pub async fn allocate(&self, custom_alias: Option<&ShortId>) -> Result<ShortId> {
        match custom_alias {
            Some(alias) => self.claim_alias(alias).await,
            None => self.allocate_generated(&mut self.budget()).await,
        }
    }

    /// Fails with `AliasTaken` if the alias is already stored and with
    /// `InvalidInput` if it is one of [`RESERVED_IDS`].
    pub async fn claim_alias(&self, alias: &ShortId) -> Result<ShortId> {
        if is_reserved(alias) {
            return Err(RegistryError::InvalidInput(format!(
                "alias '{alias}' is reserved"
            )));
        }
        if self.repository.exists(alias).await? {
            debug!(short_id = %alias, "custom alias is taken");
            return Err(RegistryError::AliasTaken(alias.to_string()));
        }
        Ok(alias.clone())
    }

    /// Draws candidates until one is free or `budget` runs out.
    pub async fn allocate_generated(&self, budget: &mut AllocationBudget) -> Result<ShortId> {
        while let Some(length) = budget.next_length() {
            let candidate = self.generator.generate(length);
            if is_reserved(&candidate) {
                continue;
            }
            if !self.repository.exists(&candidate).await? {
                trace!(short_id = %candidate, attempts = budget.attempts(), "allocated short id");
                return Ok(candidate);
            }
            debug!(short_id = %candidate, attempts = budget.attempts(), "generated short id is taken");
        }

        Err(RegistryError::AllocationExhausted {
            attempts: budget.attempts(),
        })
    }
}
