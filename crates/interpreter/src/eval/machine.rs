use alloy_primitives::U256;
use tracing::trace;

use super::table::InstructionTable;
use crate::{
    Context, EvalError, Host, Instruction, Opcode, Operand, Stack, StackItem, StagedStore, Store,
};

/// The state of one running evaluation.
pub(crate) struct Machine<'a, H, S> {
    pub(crate) stack: Stack,
    pub(crate) constants: &'a [U256],
    pub(crate) context: &'a Context,
    pub(crate) host: &'a H,
    pub(crate) store: StagedStore<'a, S>,
    /// Index of the executing instruction.
    pub(crate) position: usize,
    /// The executing instruction.
    pub(crate) instruction: Instruction,
}

impl<'a, H: Host, S: Store> Machine<'a, H, S> {
    pub(crate) fn new(
        stack_limit: usize,
        constants: &'a [U256],
        context: &'a Context,
        host: &'a H,
        store: StagedStore<'a, S>,
    ) -> Self {
        Self {
            stack: Stack::with_limit(stack_limit),
            constants,
            context,
            host,
            store,
            position: 0,
            instruction: Instruction { opcode: 0, operand: Operand(0) },
        }
    }

    /// Runs a source to completion, returning the final stack and the staged writes.
    pub(crate) fn run(
        mut self,
        table: &InstructionTable<H, S>,
        source: &[Instruction],
    ) -> Result<(Stack, StagedStore<'a, S>), EvalError> {
        for (position, instruction) in source.iter().enumerate() {
            self.position = position;
            self.instruction = *instruction;
            trace!(
                target: "rain::eval",
                position,
                opcode = instruction.opcode,
                operand = %instruction.operand,
                height = self.stack.len(),
                "Step"
            );
            table.get(instruction.opcode)(&mut self)?;
        }
        Ok((self.stack, self.store))
    }

    /// The operand of the executing instruction.
    pub(crate) const fn operand(&self) -> Operand {
        self.instruction.operand
    }

    fn underflow(&self) -> EvalError {
        EvalError::StackUnderflow { position: self.position }
    }

    /// Pops `N` items in push order.
    pub(crate) fn pop_items<const N: usize>(&mut self) -> Result<[StackItem; N], EvalError> {
        self.stack.pop_array::<N>().ok_or_else(|| self.underflow())
    }

    /// Pops `N` data words in push order.
    pub(crate) fn pop_values<const N: usize>(
        &mut self,
        opcode: Opcode,
    ) -> Result<[U256; N], EvalError> {
        let items = self.pop_items::<N>()?;
        let mut values = [U256::ZERO; N];
        for (value, item) in values.iter_mut().zip(items) {
            *value = item.expect_value(opcode)?;
        }
        Ok(values)
    }

    /// Pops as many data words as the operand says, in push order.
    pub(crate) fn pop_operand_values(&mut self, opcode: Opcode) -> Result<Vec<U256>, EvalError> {
        let n = opcode.inputs(self.operand());
        let items = self.stack.pop_many(n).ok_or_else(|| self.underflow())?;
        items.into_iter().map(|item| item.expect_value(opcode)).collect()
    }

    pub(crate) fn push(&mut self, item: StackItem) -> Result<(), EvalError> {
        self.stack.push(item)
    }

    pub(crate) fn push_value(&mut self, value: U256) -> Result<(), EvalError> {
        self.stack.push_value(value)
    }
}
