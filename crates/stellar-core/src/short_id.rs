use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Shortest identifier accepted, for both custom aliases and generated ids.
pub const MIN_LENGTH: usize = 4;
/// Longest identifier accepted. Matches the `short_id` column width.
pub const MAX_LENGTH: usize = 32;

/// A validated short identifier for a shortened URL.
///
/// Short ids must be 4-32 characters long and contain only
/// alphanumeric characters, hyphens, or underscores.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortId(String);

impl ShortId {
    /// Creates a new `ShortId` after validating the input.
    ///
    /// Valid ids are 4-32 characters and contain only `[a-zA-Z0-9_-]`.
    pub fn new(id: impl Into<String>) -> std::result::Result<Self, RegistryError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Creates a `ShortId` without validation.
    ///
    /// Use this only for ids produced by trusted internal sources
    /// (generators, rows read back from storage).
    pub fn new_unchecked(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    /// Returns the short id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(id: &str) -> std::result::Result<(), RegistryError> {
        if id.len() < MIN_LENGTH || id.len() > MAX_LENGTH {
            return Err(RegistryError::InvalidInput(format!(
                "short id length must be between {} and {}, got {}",
                MIN_LENGTH,
                MAX_LENGTH,
                id.len()
            )));
        }

        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(RegistryError::InvalidInput(format!(
                "short id must contain only alphanumeric characters, hyphens, or underscores: '{}'",
                id
            )));
        }

        Ok(())
    }
}

impl Display for ShortId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ShortId {
    type Error = RegistryError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ShortId> for String {
    fn from(value: ShortId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_ids() {
        assert!(ShortId::new("abcd").is_ok());
        assert!(ShortId::new("Abc-123_xyz").is_ok());
        assert!(ShortId::new("a".repeat(32)).is_ok());
    }

    #[test]
    fn too_short() {
        assert!(ShortId::new("abc").is_err());
        assert!(ShortId::new("").is_err());
    }

    #[test]
    fn too_long() {
        assert!(ShortId::new("a".repeat(33)).is_err());
    }

    #[test]
    fn invalid_characters() {
        assert!(ShortId::new("abc def").is_err());
        assert!(ShortId::new("abc/def").is_err());
        assert!(ShortId::new("abc!def").is_err());
    }

    #[test]
    fn invalid_id_is_invalid_input() {
        let err = ShortId::new("a b").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidInput(_)));
    }

    #[test]
    fn display() {
        let id = ShortId::new("my-alias").unwrap();
        assert_eq!(id.to_string(), "my-alias");
    }

    #[test]
    fn to_url() {
        let id = ShortId::new("abc123").unwrap();
        assert_eq!(
            id.to_url("https://stellar.example/api"),
            "https://stellar.example/api/abc123"
        );
        assert_eq!(
            id.to_url("https://stellar.example/api/"),
            "https://stellar.example/api/abc123"
        );
    }

    #[test]
    fn deserialize_validates() {
        let ok: ShortId = serde_json::from_str("\"abc123\"").unwrap();
        assert_eq!(ok.as_str(), "abc123");
        assert!(serde_json::from_str::<ShortId>("\"a!\"").is_err());
    }
}
