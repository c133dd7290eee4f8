//! Hash commitments and deterministic random ids.

use alloy_primitives::{keccak256, B256, U256};
use serde::{Deserialize, Serialize};

/// A commitment to a 32-byte secret: `keccak256(secret)`.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::From,
    derive_more::Display,
)]
pub struct Commitment(pub B256);

impl Commitment {
    /// Commits to a secret.
    pub fn from_secret(secret: B256) -> Self {
        Self(keccak256(secret))
    }

    /// Whether `secret` opens this commitment.
    pub fn is_opened_by(&self, secret: B256) -> bool {
        commitment_eq(self.0, Self::from_secret(secret).0)
    }
}

/// Compares two 32-byte values.
pub fn commitment_eq(a: B256, b: B256) -> bool {
    a == b
}

/// Derives the `index`-th id from `seed`: `keccak256(pad32(seed) ++ pad32(index))`.
pub fn random_id(seed: U256, index: U256) -> U256 {
    let mut preimage = [0u8; 64];
    preimage[..32].copy_from_slice(&seed.to_be_bytes::<32>());
    preimage[32..].copy_from_slice(&index.to_be_bytes::<32>());
    U256::from_be_bytes(keccak256(preimage).0)
}
