//! JSON inputs of the rain-eval commands.

use std::{fs, path::Path};

use alloy_primitives::{Address, U256};
use rain_interpreter::{test_utils::TestHost, Expression, SignedContextV1, StoreEntry};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use super::{decode_hex, EvalCliError, Result};

/// Reads and parses a JSON file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!(path = %path.display(), "Loading JSON");
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|source| EvalCliError::Json { path: path.display().to_string(), source })
}

/// Serializes a value as pretty JSON.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|source| EvalCliError::Json { path: "<output>".to_string(), source })
}

/// An expression as written by hand: hex sources, word constants.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionConfig {
    /// Hex-encoded sources, one per entrypoint.
    pub sources: Vec<String>,
    /// The constants table.
    #[serde(default)]
    pub constants: Vec<U256>,
    /// Minimum outputs of the leading entrypoints.
    #[serde(default)]
    pub min_outputs: Vec<u16>,
}

impl ExpressionConfig {
    /// Decodes the sources into an [`Expression`].
    pub fn into_expression(self) -> Result<Expression> {
        let sources = self.sources.iter().map(|source| decode_hex(source)).collect::<Result<_>>()?;
        Ok(Expression::new(sources, self.constants).with_min_outputs(self.min_outputs))
    }
}

/// Signed contexts, in the order they are appended to the context.
pub type SignedContexts = Vec<SignedContextV1>;

/// A store snapshot.
pub type StoreSnapshot = Vec<StoreEntry>;

/// The chain state answered by block and token opcodes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostSnapshot {
    /// ERC-20 balances.
    pub erc20: Vec<Erc20Balance>,
    /// ERC-721 owners.
    pub erc721: Vec<Erc721Owner>,
    /// ERC-1155 balances.
    pub erc1155: Vec<Erc1155Balance>,
}

/// One ERC-20 balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erc20Balance {
    /// Token contract.
    pub token: Address,
    /// Holder.
    pub account: Address,
    /// Balance.
    pub balance: U256,
}

/// One ERC-721 owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erc721Owner {
    /// Token contract.
    pub token: Address,
    /// Token id.
    pub id: U256,
    /// Owner.
    pub owner: Address,
}

/// One ERC-1155 balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erc1155Balance {
    /// Token contract.
    pub token: Address,
    /// Holder.
    pub account: Address,
    /// Token id.
    pub id: U256,
    /// Balance.
    pub balance: U256,
}

impl HostSnapshot {
    /// Builds a host at the given block.
    pub fn into_host(self, number: u64, timestamp: u64) -> TestHost {
        let host = TestHost::default().block(number, timestamp);
        let host = self.erc20.into_iter().fold(host, |host, entry| {
            host.erc20_balance(entry.token, entry.account, entry.balance)
        });
        let host = self
            .erc721
            .into_iter()
            .fold(host, |host, entry| host.erc721_owner(entry.token, entry.id, entry.owner));
        self.erc1155.into_iter().fold(host, |host, entry| {
            host.erc1155_balance(entry.token, entry.account, entry.id, entry.balance)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_config() {
        let config: ExpressionConfig = serde_json::from_str(
            r#"{"sources": ["0x00000001"], "constants": ["0x2a"], "minOutputs": [1]}"#,
        )
        .unwrap();
        let expression = config.into_expression().unwrap();
        assert_eq!(expression.sources[0].to_vec(), vec![0, 0, 0, 1]);
        assert_eq!(expression.constants, vec![U256::from(42)]);
        assert_eq!(expression.min_outputs, vec![1]);
    }

    #[test]
    fn test_host_snapshot_defaults() {
        let snapshot: HostSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snapshot, HostSnapshot::default());
    }
}
