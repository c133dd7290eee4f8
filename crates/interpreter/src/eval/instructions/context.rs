use alloy_primitives::U256;

use crate::{
    address_to_word, eval::Machine, EvalError, Host, Store, BASE_ROW, CALLER_COLUMN,
    THIS_ADDRESS_COLUMN,
};

pub(crate) fn context<H: Host, S: Store>(machine: &mut Machine<'_, H, S>) -> Result<(), EvalError> {
    let operand = machine.operand();
    let value = machine.context.get(operand.high() as usize, operand.low() as usize)?;
    machine.push_value(value)
}

pub(crate) fn caller<H: Host, S: Store>(machine: &mut Machine<'_, H, S>) -> Result<(), EvalError> {
    let value = machine.context.get(BASE_ROW, CALLER_COLUMN)?;
    machine.push_value(value)
}

pub(crate) fn this_address<H: Host, S: Store>(
    machine: &mut Machine<'_, H, S>,
) -> Result<(), EvalError> {
    let value = machine.context.get(BASE_ROW, THIS_ADDRESS_COLUMN)?;
    machine.push_value(value)
}

pub(crate) fn block_number<H: Host, S: Store>(
    machine: &mut Machine<'_, H, S>,
) -> Result<(), EvalError> {
    let number = machine.host.block_number();
    machine.push_value(U256::from(number))
}

pub(crate) fn block_timestamp<H: Host, S: Store>(
    machine: &mut Machine<'_, H, S>,
) -> Result<(), EvalError> {
    let timestamp = machine.host.block_timestamp();
    machine.push_value(U256::from(timestamp))
}

pub(crate) fn signer<H: Host, S: Store>(machine: &mut Machine<'_, H, S>) -> Result<(), EvalError> {
    let signer = machine.context.signer(machine.operand().get() as usize)?;
    machine.push_value(address_to_word(signer))
}

pub(crate) fn context_row_len<H: Host, S: Store>(
    machine: &mut Machine<'_, H, S>,
) -> Result<(), EvalError> {
    let len = machine.context.row_len(machine.operand().low() as usize)?;
    machine.push_value(U256::from(len))
}
