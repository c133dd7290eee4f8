//! The host environment queried by block and token opcodes.

use core::fmt::Debug;

use alloy_primitives::{Address, U256};
use auto_impl::auto_impl;
use serde::{Deserialize, Serialize};

use crate::HostError;

/// Read-only access to the chain the calling contract runs on.
///
/// All queries must be deterministic for the duration of one evaluation. Typically one
/// implementation reads the state of the block being built.
#[auto_impl(&, Box, Arc)]
pub trait Host: Debug {
    /// The current block number.
    fn block_number(&self) -> u64;

    /// The current block timestamp, in seconds.
    fn block_timestamp(&self) -> u64;

    /// ERC-20 `balanceOf(account)`.
    fn erc20_balance_of(&self, token: Address, account: Address) -> Result<U256, HostError>;

    /// ERC-20 `totalSupply()`.
    fn erc20_total_supply(&self, token: Address) -> Result<U256, HostError>;

    /// ERC-721 `balanceOf(account)`.
    fn erc721_balance_of(&self, token: Address, account: Address) -> Result<U256, HostError>;

    /// ERC-721 `ownerOf(id)`. Fails for tokens that were never minted.
    fn erc721_owner_of(&self, token: Address, id: U256) -> Result<Address, HostError>;

    /// ERC-1155 `balanceOf(account, id)`.
    fn erc1155_balance_of(
        &self,
        token: Address,
        account: Address,
        id: U256,
    ) -> Result<U256, HostError>;
}

/// A host that only knows the current block. Every token query fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEnv {
    /// The block number.
    pub number: u64,
    /// The block timestamp.
    pub timestamp: u64,
}

impl BlockEnv {
    fn no_token_state(query: &'static str, token: Address) -> HostError {
        HostError::Call { query, token, reason: "no token state".to_string() }
    }
}

impl Host for BlockEnv {
    fn block_number(&self) -> u64 {
        self.number
    }

    fn block_timestamp(&self) -> u64 {
        self.timestamp
    }

    fn erc20_balance_of(&self, token: Address, _account: Address) -> Result<U256, HostError> {
        Err(Self::no_token_state("erc20_balance_of", token))
    }

    fn erc20_total_supply(&self, token: Address) -> Result<U256, HostError> {
        Err(Self::no_token_state("erc20_total_supply", token))
    }

    fn erc721_balance_of(&self, token: Address, _account: Address) -> Result<U256, HostError> {
        Err(Self::no_token_state("erc721_balance_of", token))
    }

    fn erc721_owner_of(&self, token: Address, _id: U256) -> Result<Address, HostError> {
        Err(Self::no_token_state("erc721_owner_of", token))
    }

    fn erc1155_balance_of(
        &self,
        token: Address,
        _account: Address,
        _id: U256,
    ) -> Result<U256, HostError> {
        Err(Self::no_token_state("erc1155_balance_of", token))
    }
}
