use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use stellar_core::UrlRecord;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUrlRequest {
    pub url: String,
    #[serde(default)]
    pub custom_alias: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlResponse {
    pub original_url: String,
    pub short_url: String,
    pub created_at: Timestamp,
    pub click_count: u64,
}

impl UrlResponse {
    pub fn from_record(record: UrlRecord, base_url: &str) -> Self {
        Self {
            short_url: record.short_id.to_url(base_url),
            original_url: record.original_url,
            created_at: record.created_at,
            click_count: record.click_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub timestamp: Timestamp,
    pub message: String,
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
