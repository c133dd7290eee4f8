use alloy_primitives::{map::HashMap, U256};

use crate::{FullyQualifiedNamespace, Store};

/// A write buffer over a [`Store`], bound to one namespace.
///
/// Reads see the buffered writes first and fall back to the parent store. Nothing reaches the
/// parent until [`StagedStore::into_writes`] is handed to [`Store::set`], so a reverted evaluation
/// leaves no trace.
#[derive(Debug)]
pub struct StagedStore<'a, S: ?Sized> {
    parent: &'a S,
    namespace: FullyQualifiedNamespace,
    /// Writes in first-write order, each holding its latest value.
    writes: Vec<(U256, U256)>,
    /// Index of each written key into `writes`.
    index: HashMap<U256, usize>,
}

impl<'a, S: Store + ?Sized> StagedStore<'a, S> {
    /// Creates an empty buffer over `parent`.
    pub fn new(parent: &'a S, namespace: FullyQualifiedNamespace) -> Self {
        Self { parent, namespace, writes: Vec::new(), index: HashMap::default() }
    }

    /// The namespace the buffer is bound to.
    pub const fn namespace(&self) -> FullyQualifiedNamespace {
        self.namespace
    }

    /// Reads a value, preferring buffered writes.
    pub fn get(&self, key: U256) -> U256 {
        match self.index.get(&key) {
            Some(&slot) => self.writes[slot].1,
            None => self.parent.get(self.namespace, key),
        }
    }

    /// Buffers a write.
    pub fn set(&mut self, key: U256, value: U256) {
        match self.index.get(&key) {
            Some(&slot) => self.writes[slot].1 = value,
            None => {
                self.index.insert(key, self.writes.len());
                self.writes.push((key, value));
            }
        }
    }

    /// The buffered writes.
    pub fn writes(&self) -> &[(U256, U256)] {
        &self.writes
    }

    /// Consumes the buffer, returning its writes in first-write order.
    pub fn into_writes(self) -> Vec<(U256, U256)> {
        self.writes
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::Address;

    use super::*;
    use crate::{MemoryStore, StateNamespace};

    #[test]
    fn test_reads_through_and_buffers() {
        let namespace = StateNamespace(U256::from(1)).qualify(Address::ZERO);
        let mut parent = MemoryStore::new();
        parent.set(namespace, &[(U256::from(1), U256::from(10))]);

        let mut staged = StagedStore::new(&parent, namespace);
        assert_eq!(staged.get(U256::from(1)), U256::from(10));
        staged.set(U256::from(2), U256::from(20));
        staged.set(U256::from(1), U256::from(11));
        staged.set(U256::from(2), U256::from(21));
        assert_eq!(staged.get(U256::from(1)), U256::from(11));
        assert_eq!(
            staged.into_writes(),
            vec![(U256::from(2), U256::from(21)), (U256::from(1), U256::from(11))]
        );
        // the parent is untouched until the writes are applied
        assert_eq!(parent.get(namespace, U256::from(1)), U256::from(10));
    }
}
