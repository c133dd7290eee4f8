use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use super::tail_values;
use crate::{ConventionError, StackItem};

/// Deposit and withdraw bounds of a vault.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultCaps {
    /// The largest deposit allowed.
    pub max_deposit: U256,
    /// The largest withdrawal allowed, if the expression bounds withdrawals.
    pub max_withdraw: Option<U256>,
}

impl VaultCaps {
    /// Reads the caps from the top of the stack.
    ///
    /// A single item is the deposit cap. With two or more items the top two are
    /// `[max_deposit, max_withdraw]`.
    pub fn from_stack(stack: &[StackItem]) -> Result<Self, ConventionError> {
        if stack.len() < 2 {
            let [max_deposit] = tail_values(stack)?;
            return Ok(Self { max_deposit, max_withdraw: None });
        }
        let [max_deposit, max_withdraw] = tail_values(stack)?;
        Ok(Self { max_deposit, max_withdraw: Some(max_withdraw) })
    }

    /// Whether `amount` may be deposited.
    pub fn allows_deposit(&self, amount: U256) -> bool {
        amount <= self.max_deposit
    }

    /// Whether `amount` may be withdrawn. Unbounded when no withdraw cap was given.
    pub fn allows_withdraw(&self, amount: U256) -> bool {
        self.max_withdraw.is_none_or(|max| amount <= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caps() {
        let deposit_only = VaultCaps::from_stack(&[U256::from(10).into()]).unwrap();
        assert_eq!(deposit_only.max_withdraw, None);
        assert!(deposit_only.allows_deposit(U256::from(10)));
        assert!(!deposit_only.allows_deposit(U256::from(11)));
        assert!(deposit_only.allows_withdraw(U256::MAX));

        let both = VaultCaps::from_stack(&[U256::from(10).into(), U256::from(3).into()]).unwrap();
        assert_eq!(
            both,
            VaultCaps { max_deposit: U256::from(10), max_withdraw: Some(U256::from(3)) }
        );
        assert!(!both.allows_withdraw(U256::from(4)));

        assert_eq!(
            VaultCaps::from_stack(&[]),
            Err(ConventionError::StackTooShort { expected: 1, actual: 0 })
        );
    }
}
