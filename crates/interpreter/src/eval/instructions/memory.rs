use crate::{eval::Machine, resolve_memory, EvalError, Host, MemoryOperand, Store};

pub(crate) fn read_memory<H: Host, S: Store>(
    machine: &mut Machine<'_, H, S>,
) -> Result<(), EvalError> {
    let operand = MemoryOperand::decode(machine.operand());
    let item = resolve_memory(operand, machine.constants, &machine.stack)?;
    machine.push(item)
}
