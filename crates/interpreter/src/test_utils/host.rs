use alloy_primitives::{map::HashMap, Address, U256};
use delegate::delegate;

use crate::{BlockEnv, Host, HostError};

/// An in-memory host with configurable block and token state.
#[derive(Clone, Debug, Default)]
pub struct TestHost {
    /// The block returned by the block opcodes.
    pub block: BlockEnv,
    erc20_balances: HashMap<(Address, Address), U256>,
    erc20_supplies: HashMap<Address, U256>,
    erc721_owners: HashMap<(Address, U256), Address>,
    erc1155_balances: HashMap<(Address, Address, U256), U256>,
}

impl TestHost {
    /// Sets the block number and timestamp.
    pub fn block(mut self, number: u64, timestamp: u64) -> Self {
        self.block = BlockEnv { number, timestamp };
        self
    }

    /// Sets an ERC-20 balance, adding it to the total supply.
    pub fn erc20_balance(mut self, token: Address, account: Address, balance: U256) -> Self {
        let previous = self.erc20_balances.insert((token, account), balance).unwrap_or_default();
        let supply = self.erc20_supplies.entry(token).or_default();
        *supply = *supply - previous + balance;
        self
    }

    /// Mints an ERC-721 token to `owner`.
    pub fn erc721_owner(mut self, token: Address, id: U256, owner: Address) -> Self {
        self.erc721_owners.insert((token, id), owner);
        self
    }

    /// Sets an ERC-1155 balance.
    pub fn erc1155_balance(
        mut self,
        token: Address,
        account: Address,
        id: U256,
        balance: U256,
    ) -> Self {
        self.erc1155_balances.insert((token, account, id), balance);
        self
    }
}

impl Host for TestHost {
    delegate! {
        to self.block {
            fn block_number(&self) -> u64;
            fn block_timestamp(&self) -> u64;
        }
    }

    fn erc20_balance_of(&self, token: Address, account: Address) -> Result<U256, HostError> {
        Ok(self.erc20_balances.get(&(token, account)).copied().unwrap_or_default())
    }

    fn erc20_total_supply(&self, token: Address) -> Result<U256, HostError> {
        Ok(self.erc20_supplies.get(&token).copied().unwrap_or_default())
    }

    fn erc721_balance_of(&self, token: Address, account: Address) -> Result<U256, HostError> {
        let owned = self
            .erc721_owners
            .iter()
            .filter(|((owned_token, _), owner)| *owned_token == token && **owner == account)
            .count();
        Ok(U256::from(owned))
    }

    fn erc721_owner_of(&self, token: Address, id: U256) -> Result<Address, HostError> {
        self.erc721_owners
            .get(&(token, id))
            .copied()
            .ok_or(HostError::NonexistentToken { token, id })
    }

    fn erc1155_balance_of(
        &self,
        token: Address,
        account: Address,
        id: U256,
    ) -> Result<U256, HostError> {
        Ok(self.erc1155_balances.get(&(token, account, id)).copied().unwrap_or_default())
    }
}
