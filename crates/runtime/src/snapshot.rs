//! Session snapshots for save/replay.
//!
//! A snapshot is the full battle state plus the position of the seeded
//! random stream. Restoring both reproduces every future draw, so two
//! sessions with the same digest play out identically.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use combat_core::{BattleState, SeededRandom};

use crate::error::{Result, RuntimeError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: BattleState,
    pub rng: SeededRandom,
}

impl SessionSnapshot {
    pub fn new(state: BattleState, rng: SeededRandom) -> Self {
        Self { state, rng }
    }

    /// bincode encoding of the snapshot.
    pub fn encode(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(RuntimeError::Encode)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(RuntimeError::Decode)
    }

    /// Decodes `bytes` after checking them against a digest taken earlier.
    pub fn decode_verified(bytes: &[u8], expected: &str) -> Result<Self> {
        let found = digest_bytes(bytes);
        if found != expected {
            return Err(RuntimeError::DigestMismatch {
                expected: expected.to_owned(),
                found,
            });
        }
        Self::decode(bytes)
    }

    /// Hex SHA-256 of the encoded snapshot.
    pub fn digest(&self) -> Result<String> {
        Ok(digest_bytes(&self.encode()?))
    }
}

fn digest_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
