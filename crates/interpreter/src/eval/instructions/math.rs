use alloy_primitives::U256;

use super::checked;
use crate::{
    eval::Machine,
    math::{self, Rounding},
    EvalError, Host, Opcode, ScaleOperand, Store,
};

fn rounding<H, S>(machine: &Machine<'_, H, S>, opcode: Opcode) -> Result<Rounding, EvalError> {
    let operand = machine.instruction.operand;
    Rounding::from_bits(operand.low()).ok_or(EvalError::InvalidOperand { opcode, operand })
}

fn scale_operand<H, S>(
    machine: &Machine<'_, H, S>,
    opcode: Opcode,
) -> Result<ScaleOperand, EvalError> {
    let operand = machine.instruction.operand;
    ScaleOperand::decode(operand).ok_or(EvalError::InvalidOperand { opcode, operand })
}

/// Decimals taken from the stack. Anything past `u8::MAX` behaves like `u8::MAX`, which already
/// scales every nonzero value out of range.
fn saturating_decimals(word: U256) -> u8 {
    if word > U256::from(u8::MAX) {
        u8::MAX
    } else {
        word.as_limbs()[0] as u8
    }
}

pub(crate) fn fixed_point_mul<H: Host, S: Store>(
    machine: &mut Machine<'_, H, S>,
) -> Result<(), EvalError> {
    let rounding = rounding(machine, Opcode::FixedPointMul)?;
    let [a, b] = machine.pop_values(Opcode::FixedPointMul)?;
    let result = checked(Opcode::FixedPointMul, math::fixed_point_mul(a, b, rounding))?;
    machine.push_value(result)
}

pub(crate) fn fixed_point_div<H: Host, S: Store>(
    machine: &mut Machine<'_, H, S>,
) -> Result<(), EvalError> {
    let rounding = rounding(machine, Opcode::FixedPointDiv)?;
    let [a, b] = machine.pop_values(Opcode::FixedPointDiv)?;
    let result = checked(Opcode::FixedPointDiv, math::fixed_point_div(a, b, rounding))?;
    machine.push_value(result)
}

fn scale18_with<H: Host, S: Store>(
    machine: &mut Machine<'_, H, S>,
    opcode: Opcode,
    scale: ScaleOperand,
    decimals: u8,
    value: U256,
) -> Result<(), EvalError> {
    let result = if scale.saturate {
        math::saturating_scale18(value, decimals, scale.rounding)
    } else {
        checked(opcode, math::scale18(value, decimals, scale.rounding))?
    };
    machine.push_value(result)
}

fn scale_n_with<H: Host, S: Store>(
    machine: &mut Machine<'_, H, S>,
    opcode: Opcode,
    scale: ScaleOperand,
    decimals: u8,
    value: U256,
) -> Result<(), EvalError> {
    let result = if scale.saturate {
        math::saturating_scale_n(value, decimals, scale.rounding)
    } else {
        checked(opcode, math::scale_n(value, decimals, scale.rounding))?
    };
    machine.push_value(result)
}

pub(crate) fn scale18<H: Host, S: Store>(machine: &mut Machine<'_, H, S>) -> Result<(), EvalError> {
    let scale = scale_operand(machine, Opcode::Scale18)?;
    let [value] = machine.pop_values(Opcode::Scale18)?;
    scale18_with(machine, Opcode::Scale18, scale, scale.value, value)
}

pub(crate) fn scale_n<H: Host, S: Store>(machine: &mut Machine<'_, H, S>) -> Result<(), EvalError> {
    let scale = scale_operand(machine, Opcode::ScaleN)?;
    let [value] = machine.pop_values(Opcode::ScaleN)?;
    scale_n_with(machine, Opcode::ScaleN, scale, scale.value, value)
}

/// The low byte of the operand is a two's complement number of places.
pub(crate) fn scale_by<H: Host, S: Store>(
    machine: &mut Machine<'_, H, S>,
) -> Result<(), EvalError> {
    let scale = scale_operand(machine, Opcode::ScaleBy)?;
    let [value] = machine.pop_values(Opcode::ScaleBy)?;
    let places = i8::from_be_bytes([scale.value]);
    let result = if scale.saturate {
        math::saturating_scale_by(value, places, scale.rounding)
    } else {
        checked(Opcode::ScaleBy, math::scale_by(value, places, scale.rounding))?
    };
    machine.push_value(result)
}

/// Inputs: `[decimals, value]`.
pub(crate) fn scale18_dynamic<H: Host, S: Store>(
    machine: &mut Machine<'_, H, S>,
) -> Result<(), EvalError> {
    let scale = scale_operand(machine, Opcode::Scale18Dynamic)?;
    let [decimals, value] = machine.pop_values(Opcode::Scale18Dynamic)?;
    scale18_with(machine, Opcode::Scale18Dynamic, scale, saturating_decimals(decimals), value)
}

/// Inputs: `[decimals, value]`.
pub(crate) fn scale_n_dynamic<H: Host, S: Store>(
    machine: &mut Machine<'_, H, S>,
) -> Result<(), EvalError> {
    let scale = scale_operand(machine, Opcode::ScaleNDynamic)?;
    let [decimals, value] = machine.pop_values(Opcode::ScaleNDynamic)?;
    scale_n_with(machine, Opcode::ScaleNDynamic, scale, saturating_decimals(decimals), value)
}
