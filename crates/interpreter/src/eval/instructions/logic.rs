use alloy_primitives::U256;

use super::flag;
use crate::{eval::Machine, EvalError, Host, Opcode, StackItem, Store};

pub(crate) fn equal_to<H: Host, S: Store>(
    machine: &mut Machine<'_, H, S>,
) -> Result<(), EvalError> {
    let [a, b] = machine.pop_values(Opcode::EqualTo)?;
    machine.push_value(flag(a == b))
}

pub(crate) fn greater_than<H: Host, S: Store>(
    machine: &mut Machine<'_, H, S>,
) -> Result<(), EvalError> {
    let [a, b] = machine.pop_values(Opcode::GreaterThan)?;
    machine.push_value(flag(a > b))
}

pub(crate) fn less_than<H: Host, S: Store>(
    machine: &mut Machine<'_, H, S>,
) -> Result<(), EvalError> {
    let [a, b] = machine.pop_values(Opcode::LessThan)?;
    machine.push_value(flag(a < b))
}

pub(crate) fn is_zero<H: Host, S: Store>(machine: &mut Machine<'_, H, S>) -> Result<(), EvalError> {
    let [a] = machine.pop_values(Opcode::IsZero)?;
    machine.push_value(flag(a.is_zero()))
}

pub(crate) fn every<H: Host, S: Store>(machine: &mut Machine<'_, H, S>) -> Result<(), EvalError> {
    let values = machine.pop_operand_values(Opcode::Every)?;
    let result = if values.iter().any(U256::is_zero) {
        U256::ZERO
    } else {
        values.first().copied().unwrap_or_default()
    };
    machine.push_value(result)
}

pub(crate) fn any<H: Host, S: Store>(machine: &mut Machine<'_, H, S>) -> Result<(), EvalError> {
    let values = machine.pop_operand_values(Opcode::Any)?;
    let result = values.into_iter().find(|value| !value.is_zero()).unwrap_or_default();
    machine.push_value(result)
}

/// Selects between two already evaluated items. Only the condition must be a value.
pub(crate) fn eager_if<H: Host, S: Store>(
    machine: &mut Machine<'_, H, S>,
) -> Result<(), EvalError> {
    let [condition, if_true, if_false] = machine.pop_items()?;
    let condition = condition.expect_value(Opcode::EagerIf)?;
    let selected: StackItem = if condition.is_zero() { if_false } else { if_true };
    machine.push(selected)
}

pub(crate) fn ensure<H: Host, S: Store>(machine: &mut Machine<'_, H, S>) -> Result<(), EvalError> {
    let values = machine.pop_operand_values(Opcode::Ensure)?;
    if let Some(input) = values.iter().position(U256::is_zero) {
        return Err(EvalError::EnsureFailed { position: machine.position, input });
    }
    Ok(())
}
