use crate::{Generator, BASE62_ALPHABET};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stellar_core::ShortId;

enum Source {
    /// Per-thread RNG, seeded from the OS.
    Thread,
    /// Shared deterministic RNG.
    Seeded(Mutex<StdRng>),
}

/// Draws every character uniformly from the base62 alphabet.
///
/// The generator carries no state of its own unless it was built with
/// [`RandomGenerator::seeded`], in which case all draws come from one
/// deterministic stream. Useful for reproducible tests.
pub struct RandomGenerator {
    source: Source,
}

impl RandomGenerator {
    /// Creates a generator backed by the thread-local RNG.
    pub fn new() -> Self {
        Self {
            source: Source::Thread,
        }
    }

    /// Creates a generator backed by a `StdRng` seeded with `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self {
            source: Source::Seeded(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RandomGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source = match self.source {
            Source::Thread => "thread",
            Source::Seeded(_) => "seeded",
        };
        f.debug_struct("RandomGenerator")
            .field("source", &source)
            .finish()
    }
}

fn draw<R: Rng>(rng: &mut R, length: usize) -> String {
    std::iter::repeat_with(|| BASE62_ALPHABET[rng.random_range(0..BASE62_ALPHABET.len())] as char)
        .take(length)
        .collect()
}

impl Generator for RandomGenerator {
    fn generate(&self, length: usize) -> ShortId {
        let code = match &self.source {
            Source::Thread => draw(&mut rand::rng(), length),
            Source::Seeded(rng) => draw(&mut *rng.lock(), length),
        };
        ShortId::new_unchecked(code)
    }
}
