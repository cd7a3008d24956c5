//! Random sources owned by a session.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use combat_core::{RandomSource, SeededRandom};

/// OS-seeded source for casual play. Not replayable.
#[derive(Debug, Clone)]
pub struct EntropyRandom {
    rng: StdRng,
}

impl EntropyRandom {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeds the underlying generator. Useful for reproducing a casual run
    /// locally; the stream is not compatible with [`SeededRandom`].
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for EntropyRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for EntropyRandom {
    fn float(&mut self, _tag: &str) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}

/// Random source of a session: replayable or not.
#[derive(Debug, Clone)]
pub enum SessionRng {
    Seeded(SeededRandom),
    Entropy(EntropyRandom),
}

impl SessionRng {
    pub fn seeded(seed: u64) -> Self {
        Self::Seeded(SeededRandom::new(seed))
    }

    pub fn entropy() -> Self {
        Self::Entropy(EntropyRandom::new())
    }

    /// The seeded source, when the session is replayable.
    pub fn replayable(&self) -> Option<SeededRandom> {
        match self {
            Self::Seeded(rng) => Some(*rng),
            Self::Entropy(_) => None,
        }
    }
}

impl RandomSource for SessionRng {
    fn float(&mut self, tag: &str) -> f64 {
        match self {
            Self::Seeded(rng) => rng.float(tag),
            Self::Entropy(rng) => rng.float(tag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entropy_draws_stay_in_range() {
        let mut rng = EntropyRandom::from_seed(11);
        for _ in 0..1_000 {
            let value = rng.float("test");
            assert!((0.0..1.0).contains(&value));
        }
        let roll = rng.int("test", 3, 5);
        assert!((3..=5).contains(&roll));
    }

    #[test]
    fn only_seeded_sessions_are_replayable() {
        assert_eq!(SessionRng::seeded(4).replayable(), Some(SeededRandom::new(4)));
        assert!(SessionRng::entropy().replayable().is_none());
    }

    #[test]
    fn seeded_session_rng_matches_the_core_source() {
        let mut session = SessionRng::seeded(99);
        let mut core = SeededRandom::new(99);
        for tag in ["a", "b", "c"] {
            assert_eq!(session.float(tag), core.float(tag));
        }
    }
}
