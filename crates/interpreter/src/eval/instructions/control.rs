use crate::{eval::Machine, EvalError};

pub(crate) fn unknown<H, S>(machine: &mut Machine<'_, H, S>) -> Result<(), EvalError> {
    Err(EvalError::UnknownOpcode { opcode: machine.instruction.opcode })
}
