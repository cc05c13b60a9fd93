use crate::{Generator, BASE62_ALPHABET};
use std::sync::atomic::{AtomicU64, Ordering};
use stellar_core::ShortId;

/// A short id generator using a sequential counter.
///
/// This generator produces base62-encoded counter values, left-padded to
/// the requested length: "aaaaaa", "aaaaab", ... It never repeats within a
/// single instance. For several nodes sharing one store, give each node a
/// disjoint offset range.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
}

impl Clone for SeqGenerator {
    fn clone(&self) -> Self {
        Self {
            counter: AtomicU64::new(self.counter.load(Ordering::SeqCst)),
        }
    }
}

impl SeqGenerator {
    pub fn new() -> Self {
        Self::with_offset(0)
    }

    /// Creates a generator starting from a specific counter value.
    ///
    /// Useful for resuming from a known state or distributing
    /// counter ranges across nodes.
    pub fn with_offset(offset: u64) -> Self {
        Self {
            counter: AtomicU64::new(offset),
        }
    }
}

impl Default for SeqGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Encodes `value` in base62, left-padded with the zero digit to `length`.
/// Values that need more digits than `length` are returned unpadded.
fn encode(mut value: u64, length: usize) -> String {
    let base = BASE62_ALPHABET.len() as u64;
    let mut digits = Vec::with_capacity(length);
    loop {
        digits.push(BASE62_ALPHABET[(value % base) as usize]);
        value /= base;
        if value == 0 {
            break;
        }
    }
    while digits.len() < length {
        digits.push(BASE62_ALPHABET[0]);
    }
    digits.iter().rev().map(|&b| b as char).collect()
}

impl Generator for SeqGenerator {
    fn generate(&self, length: usize) -> ShortId {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        ShortId::new_unchecked(encode(count, length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_sequential_ids() {
        let generator = SeqGenerator::new();

        assert_eq!(generator.generate(6).as_str(), "aaaaaa");
        assert_eq!(generator.generate(6).as_str(), "aaaaab");
        assert_eq!(generator.generate(6).as_str(), "aaaaac");
    }

    #[test]
    fn carries_into_next_digit() {
        let generator = SeqGenerator::with_offset(61);

        assert_eq!(generator.generate(6).as_str(), "aaaaa9");
        assert_eq!(generator.generate(6).as_str(), "aaaaba");
    }

    #[test]
    fn overflowing_value_is_not_truncated() {
        // 62^4 needs five digits
        assert_eq!(encode(62u64.pow(4), 4), "baaaa");
    }

    #[test]
    fn clone_preserves_counter_state() {
        let generator = SeqGenerator::new();
        generator.generate(4);
        generator.generate(4);

        let cloned = generator.clone();

        assert_eq!(generator.generate(4).as_str(), "aaac");
        assert_eq!(cloned.generate(4).as_str(), "aaac");
    }
}
