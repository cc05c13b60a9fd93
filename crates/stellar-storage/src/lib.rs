//! Storage backends for the Stellar URL shortener.

pub mod memory;
pub mod mysql;

pub use memory::InMemoryRepository;
pub use mysql::{MySqlRepository, MySqlSettings};
pub use stellar_core::{NewUrlRecord, ReadRepository, Repository, StorageError, UrlRecord};
