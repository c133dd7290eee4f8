use crate::{eval::Machine, EvalError, Host, Opcode, Store};

pub(crate) fn get<H: Host, S: Store>(machine: &mut Machine<'_, H, S>) -> Result<(), EvalError> {
    let [key] = machine.pop_values(Opcode::Get)?;
    let value = machine.store.get(key);
    machine.push_value(value)
}

pub(crate) fn set<H: Host, S: Store>(machine: &mut Machine<'_, H, S>) -> Result<(), EvalError> {
    let [key, value] = machine.pop_values(Opcode::Set)?;
    machine.store.set(key, value);
    Ok(())
}
