//! Core types and traits for the Stellar URL shortener.
//!
//! This crate provides the record model, the storage contract and the
//! registry contract shared by the registry service, the storage
//! backends and the HTTP gateway.

pub mod clock;
pub mod error;
pub mod registry;
pub mod repository;
pub mod short_id;

pub use clock::{Clock, SystemClock};
pub use error::{RegistryError, StorageError};
pub use registry::{CreateParams, Registry};
pub use repository::{NewUrlRecord, ReadRepository, RecordId, Repository, UrlRecord};
pub use short_id::ShortId;
