//! Bytecode and operand codec.
//!
//! A source is a flat byte string of fixed-width instructions. Each instruction is a 2-byte
//! opcode id followed by a 2-byte operand, both big-endian. The meaning of the operand depends on
//! the opcode, see [`Opcode`] and the operand helpers in this module.

mod disasm;
mod opcode;

pub use disasm::*;
pub use opcode::*;

use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};

use crate::{
    constants::v1::{INSTRUCTION_SIZE, MEMORY_OFFSET_LIMIT},
    math::Rounding,
    IntegrityError,
};

/// The operand attached to every instruction.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::From,
    derive_more::Into,
    derive_more::Display,
)]
#[display("{_0:#06x}")]
pub struct Operand(pub u16);

impl Operand {
    /// The raw 16-bit value.
    pub const fn get(self) -> u16 {
        self.0
    }

    /// The low byte of the operand.
    pub const fn low(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// The high byte of the operand.
    pub const fn high(self) -> u8 {
        (self.0 >> 8) as u8
    }
}

/// The addressing mode of a memory operand.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemoryType {
    /// Read relative to the current top of the stack. Offset 0 is the top item.
    Stack = 0,
    /// Read from the constants table of the expression.
    Constant = 1,
}

/// A decoded memory operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MemoryOperand {
    /// The addressing mode.
    pub memory_type: MemoryType,
    /// The offset into the addressed memory.
    pub offset: u16,
}

impl MemoryOperand {
    /// Creates a memory operand, rejecting offsets that do not fit in the 15 bits left beside the
    /// addressing mode.
    pub fn new(memory_type: MemoryType, offset: u16) -> Result<Self, IntegrityError> {
        if offset > MEMORY_OFFSET_LIMIT {
            return Err(IntegrityError::MemoryOffsetOutOfRange { offset });
        }
        Ok(Self { memory_type, offset })
    }

    /// Packs the addressing mode into the low bit and the offset into the remaining bits.
    pub const fn encode(self) -> Operand {
        Operand((self.offset << 1) | self.memory_type as u16)
    }

    /// Decodes a memory operand. Every 16-bit value is a valid memory operand.
    pub const fn decode(operand: Operand) -> Self {
        let memory_type =
            if operand.0 & 1 == 1 { MemoryType::Constant } else { MemoryType::Stack };
        Self { memory_type, offset: operand.0 >> 1 }
    }
}

/// Encodes a memory operand for the `read_memory` opcode.
pub fn memory_operand(memory_type: MemoryType, offset: u16) -> Result<Operand, IntegrityError> {
    MemoryOperand::new(memory_type, offset).map(MemoryOperand::encode)
}

/// Encodes a `(row, column)` context operand: row in the high byte, column in the low byte.
pub const fn context_operand(row: u8, column: u8) -> Operand {
    Operand(((row as u16) << 8) | column as u16)
}

/// Operand of the scaling opcodes.
///
/// The low byte carries the decimals (or the signed number of places for `scale_by`), the high
/// byte carries the rounding mode in bits 8-9 and the saturation flag in bit 10.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScaleOperand {
    /// Decimals or places, depending on the opcode.
    pub value: u8,
    /// Rounding mode applied when scaling down.
    pub rounding: Rounding,
    /// Saturate at `U256::MAX` instead of failing when scaling up overflows.
    pub saturate: bool,
}

const SATURATE_BIT: u16 = 1 << 10;
const FLAG_MASK: u16 = 0b111 << 8;

impl ScaleOperand {
    /// Creates a new scale operand.
    pub const fn new(value: u8, rounding: Rounding) -> Self {
        Self { value, rounding, saturate: false }
    }

    /// Sets the saturation flag.
    pub const fn saturating(mut self) -> Self {
        self.saturate = true;
        self
    }

    /// Encodes the operand.
    pub const fn encode(self) -> Operand {
        let mut raw = self.value as u16 | ((self.rounding as u16) << 8);
        if self.saturate {
            raw |= SATURATE_BIT;
        }
        Operand(raw)
    }

    /// Decodes the operand. Returns `None` if reserved bits are set or the rounding mode is
    /// unknown.
    pub const fn decode(operand: Operand) -> Option<Self> {
        if operand.0 & !(FLAG_MASK | 0xFF) != 0 {
            return None;
        }
        let rounding = match Rounding::from_bits(((operand.0 >> 8) & 0b11) as u8) {
            Some(rounding) => rounding,
            None => return None,
        };
        Some(Self { value: operand.low(), rounding, saturate: operand.0 & SATURATE_BIT != 0 })
    }
}

/// One decoded instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Instruction {
    /// The raw opcode id. Unknown ids are representable here and rejected by the integrity
    /// check.
    pub opcode: u16,
    /// The operand.
    pub operand: Operand,
}

impl Instruction {
    /// Creates an instruction for a known opcode.
    pub const fn new(opcode: Opcode, operand: Operand) -> Self {
        Self { opcode: opcode as u16, operand }
    }

    /// Encodes the instruction into its 4-byte form.
    pub const fn encode(self) -> [u8; INSTRUCTION_SIZE] {
        let [op_hi, op_lo] = self.opcode.to_be_bytes();
        let [operand_hi, operand_lo] = self.operand.0.to_be_bytes();
        [op_hi, op_lo, operand_hi, operand_lo]
    }

    /// Decodes a single instruction from exactly [`INSTRUCTION_SIZE`] bytes.
    pub const fn decode(bytes: [u8; INSTRUCTION_SIZE]) -> Self {
        Self {
            opcode: u16::from_be_bytes([bytes[0], bytes[1]]),
            operand: Operand(u16::from_be_bytes([bytes[2], bytes[3]])),
        }
    }
}

/// Encodes a sequence of instructions into a source.
pub fn encode_source(instructions: impl IntoIterator<Item = Instruction>) -> Bytes {
    instructions.into_iter().flat_map(Instruction::encode).collect::<Vec<u8>>().into()
}

/// Decodes a source into its instructions.
///
/// Fails if the source length is not a multiple of [`INSTRUCTION_SIZE`].
pub fn decode_source(
    source_index: usize,
    source: &[u8],
) -> Result<Vec<Instruction>, IntegrityError> {
    if source.len() % INSTRUCTION_SIZE != 0 {
        return Err(IntegrityError::TruncatedSource { source_index, length: source.len() });
    }
    Ok(source
        .chunks_exact(INSTRUCTION_SIZE)
        .map(|chunk| Instruction::decode([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}
