use crate::{address_to_word, eval::Machine, word_to_address, EvalError, Host, Opcode, Store};

pub(crate) fn erc20_balance_of<H: Host, S: Store>(
    machine: &mut Machine<'_, H, S>,
) -> Result<(), EvalError> {
    let [token, account] = machine.pop_values(Opcode::Erc20BalanceOf)?;
    let balance = machine.host.erc20_balance_of(word_to_address(token), word_to_address(account))?;
    machine.push_value(balance)
}

pub(crate) fn erc20_total_supply<H: Host, S: Store>(
    machine: &mut Machine<'_, H, S>,
) -> Result<(), EvalError> {
    let [token] = machine.pop_values(Opcode::Erc20TotalSupply)?;
    let supply = machine.host.erc20_total_supply(word_to_address(token))?;
    machine.push_value(supply)
}

pub(crate) fn erc721_balance_of<H: Host, S: Store>(
    machine: &mut Machine<'_, H, S>,
) -> Result<(), EvalError> {
    let [token, account] = machine.pop_values(Opcode::Erc721BalanceOf)?;
    let balance =
        machine.host.erc721_balance_of(word_to_address(token), word_to_address(account))?;
    machine.push_value(balance)
}

pub(crate) fn erc721_owner_of<H: Host, S: Store>(
    machine: &mut Machine<'_, H, S>,
) -> Result<(), EvalError> {
    let [token, id] = machine.pop_values(Opcode::Erc721OwnerOf)?;
    let owner = machine.host.erc721_owner_of(word_to_address(token), id)?;
    machine.push_value(address_to_word(owner))
}

/// Inputs: `[token, account, id]`.
pub(crate) fn erc1155_balance_of<H: Host, S: Store>(
    machine: &mut Machine<'_, H, S>,
) -> Result<(), EvalError> {
    let [token, account, id] = machine.pop_values(Opcode::Erc1155BalanceOf)?;
    let balance =
        machine.host.erc1155_balance_of(word_to_address(token), word_to_address(account), id)?;
    machine.push_value(balance)
}
