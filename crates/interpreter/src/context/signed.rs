use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use serde::{Deserialize, Serialize};

use crate::ContextError;

/// Length of a `r || s || v` signature.
pub const SIGNATURE_LENGTH: usize = 65;

/// A context row vouched for by an off-chain signer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedContextV1 {
    /// The claimed signer.
    pub signer: Address,
    /// A 65-byte `r || s || v` signature over [`context_hash`] of `context`.
    pub signature: Bytes,
    /// The signed words, appended to the context as one row.
    pub context: Vec<U256>,
}

impl SignedContextV1 {
    /// The hash the signature must cover.
    pub fn hash(&self) -> B256 {
        context_hash(&self.context)
    }

    /// Checks that the signature recovers to the claimed signer. `index` is reported on failure.
    pub fn verify(&self, index: usize) -> Result<(), ContextError> {
        let recovered = recover_signer(self.hash(), &self.signature)
            .ok_or(ContextError::MalformedSignature { index })?;
        if recovered != self.signer {
            return Err(ContextError::InvalidSignature { index, signer: self.signer, recovered });
        }
        Ok(())
    }
}

/// Hashes context words packed as consecutive 32-byte big-endian words.
pub fn context_hash(words: &[U256]) -> B256 {
    let mut packed = Vec::with_capacity(words.len() * 32);
    for word in words {
        packed.extend_from_slice(&word.to_be_bytes::<32>());
    }
    keccak256(packed)
}

/// Recovers the address that produced `signature` over the prehashed `hash`.
///
/// Accepts `v` as either `27`/`28` or a raw recovery id `0`/`1`. Returns `None` for anything that
/// does not parse or recover.
pub fn recover_signer(hash: B256, signature: &[u8]) -> Option<Address> {
    if signature.len() != SIGNATURE_LENGTH {
        return None;
    }
    let v = match signature[64] {
        v @ (27 | 28) => v - 27,
        v @ (0 | 1) => v,
        _ => return None,
    };
    let recovery_id = RecoveryId::try_from(v).ok()?;
    let signature = Signature::from_slice(&signature[..64]).ok()?;
    let recovered_key =
        VerifyingKey::recover_from_prehash(&hash[..], &signature, recovery_id).ok()?;

    // drop the 0x04 prefix of the uncompressed point and keep the last 20 bytes of the hash
    let point = recovered_key.to_encoded_point(false);
    let pubkey_hash = keccak256(&point.as_bytes()[1..]);
    Some(Address::from_slice(&pubkey_hash[12..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sign_context, signer_address, test_signing_key};

    #[test]
    fn test_context_hash_packs_words() {
        let words = [U256::from(1), U256::from(2)];
        let mut packed = [0u8; 64];
        packed[31] = 1;
        packed[63] = 2;
        assert_eq!(context_hash(&words), keccak256(packed));
        assert_eq!(context_hash(&[]), keccak256([]));
    }

    #[test]
    fn test_verify_signed_context() {
        let key = test_signing_key(1);
        let signed = sign_context(&key, vec![U256::from(42)]);
        assert_eq!(signed.signer, signer_address(&key));
        assert_eq!(signed.verify(0), Ok(()));

        let mut tampered = signed.clone();
        tampered.context[0] = U256::from(43);
        assert!(matches!(
            tampered.verify(3),
            Err(ContextError::InvalidSignature { index: 3, .. })
        ));
    }

    #[test]
    fn test_recovery_id_forms() {
        let key = test_signing_key(2);
        let signed = sign_context(&key, vec![U256::from(7)]);
        let mut raw = signed.signature.to_vec();
        assert!(raw[64] == 27 || raw[64] == 28);
        raw[64] -= 27;
        assert_eq!(recover_signer(signed.hash(), &raw), Some(signed.signer));
        raw[64] = 5;
        assert_eq!(recover_signer(signed.hash(), &raw), None);
        assert_eq!(recover_signer(signed.hash(), &raw[..64]), None);
    }

    #[test]
    fn test_malformed_signature() {
        let signed = SignedContextV1 {
            signer: Address::ZERO,
            signature: Bytes::from(vec![0u8; 65]),
            context: vec![],
        };
        assert_eq!(signed.verify(0), Err(ContextError::MalformedSignature { index: 0 }));
    }
}
