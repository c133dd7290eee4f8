use alloy_primitives::U256;

use super::checked;
use crate::{eval::Machine, EvalError, Host, MathError, Opcode, Store};

/// Folds the operand-counted inputs left to right.
fn fold<H: Host, S: Store>(
    machine: &mut Machine<'_, H, S>,
    opcode: Opcode,
    f: impl Fn(U256, U256) -> Result<U256, MathError>,
) -> Result<(), EvalError> {
    let values = machine.pop_operand_values(opcode)?;
    let (first, rest) = values
        .split_first()
        .ok_or(EvalError::StackUnderflow { position: machine.position })?;
    let result = checked(opcode, rest.iter().try_fold(*first, |acc, value| f(acc, *value)))?;
    machine.push_value(result)
}

pub(crate) fn add<H: Host, S: Store>(machine: &mut Machine<'_, H, S>) -> Result<(), EvalError> {
    fold(machine, Opcode::Add, |a, b| a.checked_add(b).ok_or(MathError::Overflow))
}

pub(crate) fn sub<H: Host, S: Store>(machine: &mut Machine<'_, H, S>) -> Result<(), EvalError> {
    fold(machine, Opcode::Sub, |a, b| a.checked_sub(b).ok_or(MathError::Overflow))
}

pub(crate) fn mul<H: Host, S: Store>(machine: &mut Machine<'_, H, S>) -> Result<(), EvalError> {
    fold(machine, Opcode::Mul, |a, b| a.checked_mul(b).ok_or(MathError::Overflow))
}

pub(crate) fn div<H: Host, S: Store>(machine: &mut Machine<'_, H, S>) -> Result<(), EvalError> {
    fold(machine, Opcode::Div, |a, b| a.checked_div(b).ok_or(MathError::DivisionByZero))
}

pub(crate) fn rem<H: Host, S: Store>(machine: &mut Machine<'_, H, S>) -> Result<(), EvalError> {
    fold(machine, Opcode::Mod, |a, b| a.checked_rem(b).ok_or(MathError::DivisionByZero))
}

pub(crate) fn min<H: Host, S: Store>(machine: &mut Machine<'_, H, S>) -> Result<(), EvalError> {
    fold(machine, Opcode::Min, |a, b| Ok(a.min(b)))
}

pub(crate) fn max<H: Host, S: Store>(machine: &mut Machine<'_, H, S>) -> Result<(), EvalError> {
    fold(machine, Opcode::Max, |a, b| Ok(a.max(b)))
}

pub(crate) fn saturating_add<H: Host, S: Store>(
    machine: &mut Machine<'_, H, S>,
) -> Result<(), EvalError> {
    fold(machine, Opcode::SaturatingAdd, |a, b| Ok(a.saturating_add(b)))
}

pub(crate) fn saturating_sub<H: Host, S: Store>(
    machine: &mut Machine<'_, H, S>,
) -> Result<(), EvalError> {
    fold(machine, Opcode::SaturatingSub, |a, b| Ok(a.saturating_sub(b)))
}

pub(crate) fn exp<H: Host, S: Store>(machine: &mut Machine<'_, H, S>) -> Result<(), EvalError> {
    let [base, exponent] = machine.pop_values(Opcode::Exp)?;
    let result = checked(Opcode::Exp, base.checked_pow(exponent).ok_or(MathError::Overflow))?;
    machine.push_value(result)
}
