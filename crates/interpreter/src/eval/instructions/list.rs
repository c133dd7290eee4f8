use crate::{eval::Machine, EvalError, Host, StackItem, Store};

pub(crate) fn sentinel<H: Host, S: Store>(
    machine: &mut Machine<'_, H, S>,
) -> Result<(), EvalError> {
    machine.push(StackItem::Sentinel)
}
