use crate::error::RegistryError;
use crate::repository::UrlRecord;
use crate::short_id::ShortId;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, RegistryError>;

/// Parameters for creating a shortened URL.
#[derive(Debug, Clone)]
pub struct CreateParams {
    /// The original URL to be shortened.
    pub original_url: String,
    /// Optional custom alias. An empty string is treated as no alias.
    pub custom_alias: Option<String>,
}

impl CreateParams {
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            custom_alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.custom_alias = Some(alias.into());
        self
    }
}

#[async_trait]
pub trait Registry: Send + Sync + 'static {
    /// Creates a shortened URL and returns the stored record.
    async fn create(&self, params: CreateParams) -> Result<UrlRecord>;

    /// Looks up a record without side effects.
    async fn resolve(&self, id: &ShortId) -> Result<UrlRecord>;

    /// Counts one access to the record and returns it post-increment.
    async fn record_access(&self, id: &ShortId) -> Result<UrlRecord>;
}
