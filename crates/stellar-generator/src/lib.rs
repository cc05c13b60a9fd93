pub mod random;
pub mod seq;

pub use random::RandomGenerator;
pub use seq::SeqGenerator;

use stellar_core::ShortId;

/// Alphabet shared by all generators: lowercase, uppercase, digits.
pub const BASE62_ALPHABET: &[u8; 62] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Trait for generating candidate short ids.
///
/// Implementations are pure generators that don't interact with storage;
/// the allocator is responsible for checking candidates against the store.
pub trait Generator: Send + Sync + 'static {
    /// Generates a candidate of (at least) `length` characters drawn from
    /// [`BASE62_ALPHABET`].
    fn generate(&self, length: usize) -> ShortId;
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    fn generate(&self, length: usize) -> ShortId {
        (**self).generate(length)
    }
}
