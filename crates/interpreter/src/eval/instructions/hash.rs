use alloy_primitives::{keccak256, U256};

use crate::{eval::Machine, EvalError, Host, Opcode, Store};

pub(crate) fn hash<H: Host, S: Store>(machine: &mut Machine<'_, H, S>) -> Result<(), EvalError> {
    let values = machine.pop_operand_values(Opcode::Hash)?;
    let mut packed = Vec::with_capacity(values.len() * 32);
    for value in &values {
        packed.extend_from_slice(&value.to_be_bytes::<32>());
    }
    machine.push_value(U256::from_be_bytes(keccak256(packed).0))
}

/// Inputs: `[seed, index]`.
pub(crate) fn random_id<H: Host, S: Store>(
    machine: &mut Machine<'_, H, S>,
) -> Result<(), EvalError> {
    let [seed, index] = machine.pop_values(Opcode::RandomId)?;
    machine.push_value(crate::random_id(seed, index))
}
