//! The persistent key/value store.
//!
//! Every entry lives under a [`FullyQualifiedNamespace`], derived from the namespace chosen by the
//! calling contract and the calling contract itself. An evaluation only ever sees a
//! [`StagedStore`] bound to one namespace, so unrelated expressions cannot observe each other.

mod staged;
pub use staged::*;

use core::fmt::Debug;

use alloy_primitives::{keccak256, map::HashMap, Address, B256, U256};
use auto_impl::auto_impl;
use serde::{Deserialize, Serialize};

/// The namespace chosen by a calling contract, e.g. one per flow.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::From,
    derive_more::Display,
)]
pub struct StateNamespace(pub U256);

impl StateNamespace {
    /// Qualifies the namespace with the calling contract: `keccak256(namespace ++ pad32(sender))`.
    pub fn qualify(self, sender: Address) -> FullyQualifiedNamespace {
        let mut preimage = [0u8; 64];
        preimage[..32].copy_from_slice(&self.0.to_be_bytes::<32>());
        preimage[44..].copy_from_slice(sender.as_slice());
        FullyQualifiedNamespace(keccak256(preimage))
    }
}

/// A namespace qualified with the calling contract that owns it.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::From,
    derive_more::Display,
)]
pub struct FullyQualifiedNamespace(pub B256);

/// Persistent storage shared by every expression of a host.
///
/// Absent keys read as zero. Writes only reach a store through [`Store::set`], which is called
/// once per successful evaluation with all of its writes.
#[auto_impl(&mut, Box)]
pub trait Store: Debug {
    /// Reads a value.
    fn get(&self, namespace: FullyQualifiedNamespace, key: U256) -> U256;

    /// Applies a batch of writes in order.
    fn set(&mut self, namespace: FullyQualifiedNamespace, writes: &[(U256, U256)]);
}

/// One entry of a store snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreEntry {
    /// The namespace of the entry.
    pub namespace: FullyQualifiedNamespace,
    /// The key.
    pub key: U256,
    /// The value.
    pub value: U256,
}

/// An in-memory [`Store`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: HashMap<(FullyQualifiedNamespace, U256), U256>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, sorted by namespace then key.
    pub fn snapshot(&self) -> Vec<StoreEntry> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|(&(namespace, key), &value)| StoreEntry { namespace, key, value })
            .collect();
        entries.sort_by_key(|entry| (entry.namespace, entry.key));
        entries
    }
}

impl FromIterator<StoreEntry> for MemoryStore {
    fn from_iter<T: IntoIterator<Item = StoreEntry>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|entry| ((entry.namespace, entry.key), entry.value))
                .collect(),
        }
    }
}

impl Store for MemoryStore {
    fn get(&self, namespace: FullyQualifiedNamespace, key: U256) -> U256 {
        self.entries.get(&(namespace, key)).copied().unwrap_or_default()
    }

    fn set(&mut self, namespace: FullyQualifiedNamespace, writes: &[(U256, U256)]) {
        for &(key, value) in writes {
            self.entries.insert((namespace, key), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use super::*;

    #[test]
    fn test_qualify() {
        let sender = address!("00000000000000000000000000000000000000aa");
        let qualified = StateNamespace(U256::from(1)).qualify(sender);
        let mut preimage = [0u8; 64];
        preimage[31] = 1;
        preimage[63] = 0xaa;
        assert_eq!(qualified.0, keccak256(preimage));

        let other = address!("00000000000000000000000000000000000000bb");
        assert_ne!(StateNamespace(U256::from(1)).qualify(other), qualified);
        assert_ne!(StateNamespace(U256::from(2)).qualify(sender), qualified);
    }

    #[test]
    fn test_memory_store() {
        let a = StateNamespace(U256::from(1)).qualify(Address::ZERO);
        let b = StateNamespace(U256::from(2)).qualify(Address::ZERO);
        let mut store = MemoryStore::new();
        store.set(a, &[(U256::from(5), U256::from(50)), (U256::from(5), U256::from(51))]);
        assert_eq!(store.get(a, U256::from(5)), U256::from(51));
        assert_eq!(store.get(b, U256::from(5)), U256::ZERO);
        assert_eq!(store.len(), 1);

        let restored: MemoryStore = store.snapshot().into_iter().collect();
        assert_eq!(restored, store);
    }
}
