//! The evaluation stack.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::{constants::v1::SENTINEL, EvalError, Opcode};

/// One item on the stack.
///
/// Sentinels delimit variable-length lists in the final stack. They are a distinct item rather
/// than a reserved word, so no data value can ever be mistaken for one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackItem {
    /// A data word.
    Value(U256),
    /// A list delimiter.
    Sentinel,
}

impl StackItem {
    /// Returns the data word, or `None` for a sentinel.
    pub const fn value(self) -> Option<U256> {
        match self {
            Self::Value(value) => Some(value),
            Self::Sentinel => None,
        }
    }

    /// Returns the data word, failing for a sentinel consumed by `opcode`.
    pub fn expect_value(self, opcode: Opcode) -> Result<U256, EvalError> {
        match self {
            Self::Value(value) => Ok(value),
            Self::Sentinel => Err(EvalError::SentinelAsValue { opcode }),
        }
    }

    /// Whether the item is a sentinel.
    pub const fn is_sentinel(self) -> bool {
        matches!(self, Self::Sentinel)
    }

    /// Flattens the item to a raw word, mapping sentinels to [`SENTINEL`].
    pub fn to_word(self) -> U256 {
        match self {
            Self::Value(value) => value,
            Self::Sentinel => *SENTINEL,
        }
    }
}

impl From<U256> for StackItem {
    fn from(value: U256) -> Self {
        Self::Value(value)
    }
}

/// A bounded stack that can also be read relative to its top.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stack {
    data: Vec<StackItem>,
    limit: usize,
}

impl Stack {
    /// Creates an empty stack holding at most `limit` items.
    pub fn with_limit(limit: usize) -> Self {
        Self { data: Vec::with_capacity(limit), limit }
    }

    /// The current height.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The maximum height.
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Pushes an item.
    pub fn push(&mut self, item: StackItem) -> Result<(), EvalError> {
        if self.data.len() >= self.limit {
            return Err(EvalError::StackOverflow { limit: self.limit });
        }
        self.data.push(item);
        Ok(())
    }

    /// Pushes a data word.
    pub fn push_value(&mut self, value: U256) -> Result<(), EvalError> {
        self.push(StackItem::Value(value))
    }

    /// Reads the item `offset` positions below the top without popping it. Offset 0 is the top.
    pub fn peek(&self, offset: usize) -> Result<StackItem, EvalError> {
        let height = self.data.len();
        if offset >= height {
            return Err(EvalError::StackReadOutOfBounds { offset, height });
        }
        Ok(self.data[height - 1 - offset])
    }

    /// Pops the top `N` items, returned in push order (the top item last).
    pub fn pop_array<const N: usize>(&mut self) -> Option<[StackItem; N]> {
        let start = self.data.len().checked_sub(N)?;
        let mut items = [StackItem::Sentinel; N];
        items.copy_from_slice(&self.data[start..]);
        self.data.truncate(start);
        Some(items)
    }

    /// Pops the top `n` items, returned in push order (the top item last).
    pub fn pop_many(&mut self, n: usize) -> Option<Vec<StackItem>> {
        let start = self.data.len().checked_sub(n)?;
        Some(self.data.split_off(start))
    }

    /// The items from bottom to top.
    pub fn as_slice(&self) -> &[StackItem] {
        &self.data
    }

    /// Consumes the stack, returning the items from bottom to top.
    pub fn into_vec(self) -> Vec<StackItem> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(n: u64) -> StackItem {
        StackItem::Value(U256::from(n))
    }

    #[test]
    fn test_peek_is_relative_to_top() {
        let mut stack = Stack::with_limit(4);
        stack.push(value(1)).unwrap();
        stack.push(value(2)).unwrap();
        assert_eq!(stack.peek(0), Ok(value(2)));
        assert_eq!(stack.peek(1), Ok(value(1)));
        assert_eq!(stack.peek(2), Err(EvalError::StackReadOutOfBounds { offset: 2, height: 2 }));

        // the same offset resolves to a different slot once the stack grows
        stack.push(value(3)).unwrap();
        assert_eq!(stack.peek(1), Ok(value(2)));
    }

    #[test]
    fn test_limit() {
        let mut stack = Stack::with_limit(1);
        stack.push(StackItem::Sentinel).unwrap();
        assert_eq!(stack.push(value(1)), Err(EvalError::StackOverflow { limit: 1 }));
    }

    #[test]
    fn test_pop_order() {
        let mut stack = Stack::with_limit(8);
        for n in 1..=4 {
            stack.push(value(n)).unwrap();
        }
        assert_eq!(stack.pop_array::<2>(), Some([value(3), value(4)]));
        assert_eq!(stack.pop_many(2), Some(vec![value(1), value(2)]));
        assert_eq!(stack.pop_array::<1>(), None);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_sentinel_is_not_a_value() {
        assert_eq!(
            StackItem::Sentinel.expect_value(Opcode::Add),
            Err(EvalError::SentinelAsValue { opcode: Opcode::Add })
        );
        assert_eq!(StackItem::Sentinel.to_word(), *SENTINEL);
        assert_eq!(value(5).value(), Some(U256::from(5)));
    }
}
