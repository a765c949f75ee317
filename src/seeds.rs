//! Seed management for cave generation
//!
//! Seeds are entered as text (so they can be typed, shared and replayed) and
//! hashed into the `u64` that seeds the RNG. A clock-derived seed is still a
//! text seed: its string is kept so the run can be reproduced later.

use chrono::Local;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// A resolved generation seed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaveSeed {
    /// The text the seed was derived from
    pub text: String,
    /// Hashed value fed to the RNG
    pub value: u64,
}

impl CaveSeed {
    /// Create a seed from explicit text. The same text always yields the same value.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let value = hash_seed_text(&text);
        Self { text, value }
    }

    /// Derive a seed from the current wall-clock time.
    pub fn from_clock() -> Self {
        Self::from_text(Local::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string())
    }

    /// Resolve the seed for a run: an explicit seed wins unless a random seed is requested.
    pub fn resolve(explicit: Option<&str>, use_random_seed: bool) -> Self {
        match explicit {
            Some(text) if !use_random_seed => Self::from_text(text),
            _ => Self::from_clock(),
        }
    }

    /// Fresh RNG for this seed.
    pub fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.value)
    }
}

/// Hash seed text into a `u64`.
fn hash_seed_text(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

impl std::fmt::Display for CaveSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" ({})", self.text, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_text_seed_is_deterministic() {
        let a = CaveSeed::from_text("test");
        let b = CaveSeed::from_text("test");
        assert_eq!(a, b);

        let mut rng_a = a.rng();
        let mut rng_b = b.rng();
        for _ in 0..16 {
            assert_eq!(rng_a.gen::<u32>(), rng_b.gen::<u32>());
        }
    }

    #[test]
    fn test_different_text_gives_different_value() {
        assert_ne!(CaveSeed::from_text("test").value, CaveSeed::from_text("test2").value);
    }

    #[test]
    fn test_resolve_prefers_explicit_seed() {
        let seed = CaveSeed::resolve(Some("caverns"), false);
        assert_eq!(seed.text, "caverns");

        // A random seed request ignores the explicit text
        let clock = CaveSeed::resolve(Some("caverns"), true);
        assert_ne!(clock.text, "caverns");
        assert!(!clock.text.is_empty());
    }
}
