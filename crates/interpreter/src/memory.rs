//! Resolution of memory operands.

use alloy_primitives::U256;

use crate::{EvalError, MemoryOperand, MemoryType, Stack, StackItem};

/// Resolves a memory operand against the constants table and the current stack.
///
/// Stack reads are relative to the top at the moment of the read: offset 0 is the top item. The
/// resolved slot is never cached, so the same operand can address different slots as the stack
/// moves.
pub fn resolve_memory(
    operand: MemoryOperand,
    constants: &[U256],
    stack: &Stack,
) -> Result<StackItem, EvalError> {
    let offset = operand.offset as usize;
    match operand.memory_type {
        MemoryType::Constant => constants
            .get(offset)
            .copied()
            .map(StackItem::Value)
            .ok_or(EvalError::ConstantOutOfBounds { index: offset, length: constants.len() }),
        MemoryType::Stack => stack.peek(offset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_constant() {
        let constants = [U256::from(10), U256::from(20)];
        let stack = Stack::with_limit(1);
        let operand = MemoryOperand::new(MemoryType::Constant, 1).unwrap();
        assert_eq!(
            resolve_memory(operand, &constants, &stack),
            Ok(StackItem::Value(U256::from(20)))
        );

        let operand = MemoryOperand::new(MemoryType::Constant, 2).unwrap();
        assert_eq!(
            resolve_memory(operand, &constants, &stack),
            Err(EvalError::ConstantOutOfBounds { index: 2, length: 2 })
        );
    }

    #[test]
    fn test_resolve_stack() {
        let mut stack = Stack::with_limit(2);
        stack.push_value(U256::from(1)).unwrap();
        stack.push(StackItem::Sentinel).unwrap();
        let top = MemoryOperand::new(MemoryType::Stack, 0).unwrap();
        let below = MemoryOperand::new(MemoryType::Stack, 1).unwrap();
        assert_eq!(resolve_memory(top, &[], &stack), Ok(StackItem::Sentinel));
        assert_eq!(resolve_memory(below, &[], &stack), Ok(StackItem::Value(U256::from(1))));
        let past = MemoryOperand::new(MemoryType::Stack, 2).unwrap();
        assert!(resolve_memory(past, &[], &stack).is_err());
    }
}
