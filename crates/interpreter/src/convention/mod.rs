//! Readers of the final stack under the conventions of calling contracts.
//!
//! The interpreter returns a flat stack. Each kind of calling contract reads its tail
//! differently:
//! - orders read `[output_max, ratio]`, see [`OrderCalculation`];
//! - flows read six sentinel-delimited lists of transfers, mints and burns, see
//!   [`FlowTransfers`];
//! - lobbies read one boolean per phase, see [`Gate`];
//! - vaults read deposit and withdraw caps, see [`VaultCaps`].

mod caps;
mod flow;
mod gate;
mod order;

pub use caps::*;
pub use flow::*;
pub use gate::*;
pub use order::*;

use alloy_primitives::U256;

use crate::{ConventionError, StackItem};

/// Reads the top `N` items as values, in push order.
fn tail_values<const N: usize>(stack: &[StackItem]) -> Result<[U256; N], ConventionError> {
    let start = stack
        .len()
        .checked_sub(N)
        .ok_or(ConventionError::StackTooShort { expected: N, actual: stack.len() })?;
    let mut values = [U256::ZERO; N];
    for (slot, (value, item)) in values.iter_mut().zip(&stack[start..]).enumerate() {
        *value = item.value().ok_or(ConventionError::UnexpectedSentinel { slot })?;
    }
    Ok(values)
}
