use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use super::tail_values;
use crate::{
    math::{fixed_point_mul, Rounding},
    ConventionError, StackItem,
};

/// The result of an order expression: stack tail `[output_max, ratio]`.
///
/// At most `output_max` units of the order's output token may leave its vault, priced at `ratio`
/// units of the input token per output unit, in 18-decimal fixed point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCalculation {
    /// Maximum output amount.
    pub output_max: U256,
    /// Input per output, 18 decimals.
    pub ratio: U256,
}

impl OrderCalculation {
    /// Reads the top two stack items.
    pub fn from_stack(stack: &[StackItem]) -> Result<Self, ConventionError> {
        let [output_max, ratio] = tail_values(stack)?;
        Ok(Self { output_max, ratio })
    }

    /// Caps the output at what the vault holds.
    pub fn capped(self, vault_balance: U256) -> Self {
        Self { output_max: self.output_max.min(vault_balance), ..self }
    }
}

/// The amounts moved by clearing two opposing orders.
///
/// The output of one order is the input of the other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearStateChange {
    /// Amount leaving order A's output vault.
    pub a_output: U256,
    /// Amount leaving order B's output vault.
    pub b_output: U256,
    /// Amount arriving in order A's input vault.
    pub a_input: U256,
    /// Amount arriving in order B's input vault.
    pub b_input: U256,
}

/// Clears order `a` against order `b`.
///
/// Each side outputs the least of its own capped maximum and what the counterparty is willing to
/// pay for it: `a_output = min(a.output_max, b.output_max * b.ratio)`, and symmetrically for `b`.
/// Vault balances cap the maximums first.
pub fn clear(
    a: OrderCalculation,
    b: OrderCalculation,
    a_vault_balance: U256,
    b_vault_balance: U256,
) -> Result<ClearStateChange, ConventionError> {
    let a = a.capped(a_vault_balance);
    let b = b.capped(b_vault_balance);
    let a_output = a.output_max.min(fixed_point_mul(b.output_max, b.ratio, Rounding::Down)?);
    let b_output = b.output_max.min(fixed_point_mul(a.output_max, a.ratio, Rounding::Down)?);
    Ok(ClearStateChange { a_output, b_output, a_input: b_output, b_input: a_output })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::v1::FP_ONE;

    #[test]
    fn test_from_stack() {
        let stack = [StackItem::Sentinel, U256::from(5).into(), U256::from(7).into()];
        assert_eq!(
            OrderCalculation::from_stack(&stack),
            Ok(OrderCalculation { output_max: U256::from(5), ratio: U256::from(7) })
        );
        assert_eq!(
            OrderCalculation::from_stack(&stack[..2]),
            Err(ConventionError::UnexpectedSentinel { slot: 0 })
        );
        assert_eq!(
            OrderCalculation::from_stack(&stack[..1]),
            Err(ConventionError::StackTooShort { expected: 2, actual: 1 })
        );
    }

    #[test]
    fn test_clear_caps_by_vault() {
        let a = OrderCalculation { output_max: U256::from(100), ratio: FP_ONE * U256::from(2) };
        let b = OrderCalculation { output_max: U256::from(1000), ratio: FP_ONE / U256::from(2) };
        let change = clear(a, b, U256::from(100), U256::from(150)).unwrap();
        // a offers 100, b pays up to 150 * 0.5 = 75 for it
        assert_eq!(change.a_output, U256::from(75));
        // b offers 150, a pays up to 100 * 2 = 200 for it
        assert_eq!(change.b_output, U256::from(150));
        assert_eq!(change.a_input, change.b_output);
        assert_eq!(change.b_input, change.a_output);
    }
}
