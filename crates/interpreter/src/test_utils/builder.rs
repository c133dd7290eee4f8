//! A builder for assembling expressions instruction by instruction.

use alloy_primitives::{Address, Bytes, U256};

use crate::{
    address_to_word, context_operand, encode_source, math::Rounding, memory_operand,
    DeployedExpression, Expression, Instruction, IntegrityError, InterpreterSpecId, MemoryType,
    Opcode, Operand, ScaleOperand,
};

/// A builder for assembling expressions.
///
/// Instructions are appended to the current source. [`ExpressionBuilder::end_source`] starts the
/// next entrypoint. Pushed literals are interned into the shared constants table.
#[derive(Debug, Default)]
pub struct ExpressionBuilder {
    sources: Vec<Bytes>,
    current: Vec<Instruction>,
    constants: Vec<U256>,
    min_outputs: Vec<u16>,
}

impl ExpressionBuilder {
    /// Build the expression.
    pub fn build(mut self) -> Expression {
        if !self.current.is_empty() || self.sources.is_empty() {
            self = self.end_source();
        }
        Expression::new(self.sources, self.constants).with_min_outputs(self.min_outputs)
    }

    /// Build and deploy the expression.
    pub fn deploy(self, spec: InterpreterSpecId) -> Result<DeployedExpression, IntegrityError> {
        self.build().deploy(spec)
    }

    /// Get the number of instructions in the current source.
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// Check if the current source is empty.
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Finish the current source and start the next entrypoint.
    pub fn end_source(mut self) -> Self {
        let source = encode_source(core::mem::take(&mut self.current));
        self.sources.push(source);
        self
    }

    /// Declare the minimum outputs of the leading entrypoints.
    pub fn min_outputs(mut self, min_outputs: impl Into<Vec<u16>>) -> Self {
        self.min_outputs = min_outputs.into();
        self
    }

    /// Append a raw instruction.
    pub fn append(mut self, instruction: Instruction) -> Self {
        self.current.push(instruction);
        self
    }

    /// Append an opcode with an operand.
    pub fn op(self, opcode: Opcode, operand: u16) -> Self {
        self.append(Instruction::new(opcode, Operand(operand)))
    }

    /// Append an opcode taking no operand.
    pub fn op0(self, opcode: Opcode) -> Self {
        self.op(opcode, 0)
    }

    /// Push a literal, reading it from the constants table.
    pub fn push(mut self, value: impl Into<U256>) -> Self {
        let value = value.into();
        let index = match self.constants.iter().position(|constant| *constant == value) {
            Some(index) => index,
            None => {
                self.constants.push(value);
                self.constants.len() - 1
            }
        };
        self.read(MemoryType::Constant, index as u16)
    }

    /// Push an address as a word.
    pub fn push_address(self, address: Address) -> Self {
        self.push(address_to_word(address))
    }

    /// Copy the stack item `offset` below the top.
    pub fn dup(self, offset: u16) -> Self {
        self.read(MemoryType::Stack, offset)
    }

    fn read(self, memory_type: MemoryType, offset: u16) -> Self {
        let operand = memory_operand(memory_type, offset).expect("offset fits the operand");
        self.append(Instruction::new(Opcode::ReadMemory, operand))
    }

    /// Push the context cell at `(row, column)`.
    pub fn context(self, row: u8, column: u8) -> Self {
        self.append(Instruction::new(Opcode::Context, context_operand(row, column)))
    }

    /// Push a sentinel.
    pub fn sentinel(self) -> Self {
        self.op0(Opcode::Sentinel)
    }

    /// Append a scaling opcode.
    pub fn scale(self, opcode: Opcode, scale: ScaleOperand) -> Self {
        self.append(Instruction::new(opcode, scale.encode()))
    }

    /// Append a fixed-point opcode with a rounding mode.
    pub fn fixed_point(self, opcode: Opcode, rounding: Rounding) -> Self {
        self.op(opcode, rounding as u16)
    }

    /// Append an `ensure` over the top `n` items.
    pub fn ensure(self, n: u16) -> Self {
        self.op(Opcode::Ensure, n)
    }

    /// Append a `set` of the top two items, `[key, value]`.
    pub fn set(self) -> Self {
        self.op0(Opcode::Set)
    }

    /// Append a `get` of the top item.
    pub fn get(self) -> Self {
        self.op0(Opcode::Get)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_are_interned() {
        let expression = ExpressionBuilder::default()
            .push(U256::from(7))
            .push(U256::from(8))
            .push(U256::from(7))
            .end_source()
            .push(U256::from(8))
            .build();
        assert_eq!(expression.constants, vec![U256::from(7), U256::from(8)]);
        assert_eq!(expression.sources.len(), 2);
        assert_eq!(expression.sources[0].len(), 12);
    }

    #[test]
    fn test_empty_builder_has_one_source() {
        let expression = ExpressionBuilder::default().build();
        assert_eq!(expression.sources, vec![Bytes::new()]);
    }
}
