//! Instruction handlers, grouped by concern.
//!
//! Every handler pops its inputs in push order, so for `[a, b]` the item pushed first is `a`.

pub(super) mod arithmetic;
pub(super) mod context;
pub(super) mod control;
pub(super) mod hash;
pub(super) mod list;
pub(super) mod logic;
pub(super) mod math;
pub(super) mod memory;
pub(super) mod store;
pub(super) mod token;

use alloy_primitives::U256;

use crate::{EvalError, MathError, Opcode};

/// Attributes an arithmetic failure to `opcode`.
fn checked(opcode: Opcode, result: Result<U256, MathError>) -> Result<U256, EvalError> {
    result.map_err(|error| EvalError::Math { opcode, error })
}

/// Encodes a boolean as `0` or `1`.
fn flag(value: bool) -> U256 {
    if value {
        U256::from(1)
    } else {
        U256::ZERO
    }
}
