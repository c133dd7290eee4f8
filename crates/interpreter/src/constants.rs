//! Constants for the interpreter.
//!
//! It groups the constants for different interpreter versions as sub-modules.

/// Constants for the `V1` interpreter.
pub mod v1 {
    use alloy_primitives::{keccak256, U256};
    use once_cell::sync::Lazy;

    /// The maximum height of the stack of a single evaluation.
    pub const STACK_LIMIT: usize = 1024;

    /// The size in bytes of one encoded instruction: a 2-byte opcode followed by a 2-byte
    /// operand, both big-endian.
    pub const INSTRUCTION_SIZE: usize = 4;

    /// The largest offset a memory operand can carry. The low bit of the operand is reserved for
    /// the addressing mode, leaving 15 bits for the offset.
    pub const MEMORY_OFFSET_LIMIT: u16 = 0x7FFF;

    /// The number of decimals of canonical fixed-point values.
    pub const FP_DECIMALS: u8 = 18;

    /// `1.0` in canonical 18-decimal fixed point.
    pub const FP_ONE: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

    /// The largest power of ten that fits in a 256-bit word is `10^77`.
    pub const MAX_POW10_EXPONENT: u8 = 77;

    /// The word a [`crate::StackItem::Sentinel`] is flattened to when the final stack is exported
    /// as raw words, e.g. for ABI encoding. Within the interpreter sentinels are a distinct item
    /// and never compare equal to data.
    pub static SENTINEL: Lazy<U256> =
        Lazy::new(|| U256::from_be_bytes(keccak256(b"rain.interpreter.sentinel").0));
}

/// Constants for the `V2` interpreter.
pub mod v2 {
    pub use super::v1::*;

    /// The maximum number of words hashed by a single `hash` instruction.
    pub const MAX_HASH_INPUTS: u16 = 255;
}
