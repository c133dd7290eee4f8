use alloy_primitives::{keccak256, Address, Bytes, U256};
use k256::ecdsa::SigningKey;

use crate::{context_hash, SignedContextV1};

/// A deterministic signing key derived from `seed`. `seed` must be nonzero.
pub fn test_signing_key(seed: u8) -> SigningKey {
    SigningKey::from_slice(&[seed; 32]).expect("nonzero scalar below the curve order")
}

/// The address of a signing key.
pub fn signer_address(key: &SigningKey) -> Address {
    let public = key.verifying_key().to_encoded_point(false);
    Address::from_slice(&keccak256(&public.as_bytes()[1..])[12..])
}

/// Signs `context` with `key`, producing a 65-byte `r ++ s ++ v` signature with `v` in `{27, 28}`.
pub fn sign_context(key: &SigningKey, context: Vec<U256>) -> SignedContextV1 {
    let hash = context_hash(&context);
    let (signature, recovery_id) =
        key.sign_prehash_recoverable(hash.as_slice()).expect("signing a 32-byte prehash");
    let mut bytes = signature.to_bytes().to_vec();
    bytes.push(27 + recovery_id.to_byte());
    SignedContextV1 { signer: signer_address(key), signature: Bytes::from(bytes), context }
}
