//! Short id allocation and the URL registry service.
//!
//! [`UrlRegistry`] implements [`stellar_core::Registry`] on top of any
//! [`stellar_core::Repository`] and any [`stellar_generator::Generator`].
//! Core types are re-exported from `stellar_core`.

pub mod allocator;
pub mod registry;

#[cfg(test)]
mod testing;

pub use allocator::{AllocationBudget, AllocatorSettings, IdentifierAllocator, RESERVED_IDS};
pub use registry::UrlRegistry;
pub use stellar_core::{CreateParams, Registry, RegistryError, ShortId, UrlRecord};
