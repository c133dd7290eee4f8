//! The versioned opcode registry.

use core::fmt;

use crate::{constants, InterpreterSpecId, Operand, ScaleOperand};

/// Number of opcodes known to the latest interpreter version.
pub const OPCODE_COUNT: usize = 43;

/// Every opcode understood by the interpreter.
///
/// Ids are stable across versions: new opcodes are only ever appended. [`Opcode::since`] returns
/// the first version in which an opcode is available.
#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Opcode {
    /// Push a word from the constants table or the stack. Operand: memory operand.
    ReadMemory = 0,
    /// Push a context cell. Operand: row in the high byte, column in the low byte.
    Context,
    /// Push the caller address (context cell `(0, 0)`).
    Caller,
    /// Push the calling contract address (context cell `(0, 1)`).
    ThisAddress,
    /// Push the current block number.
    BlockNumber,
    /// Push the current block timestamp.
    BlockTimestamp,
    /// Checked addition of `n` inputs.
    Add,
    /// Checked subtraction of `n` inputs, left to right.
    Sub,
    /// Checked multiplication of `n` inputs.
    Mul,
    /// Division of `n` inputs, left to right. Fails on division by zero.
    Div,
    /// Remainder of `n` inputs, left to right. Fails on division by zero.
    Mod,
    /// Checked exponentiation `a ^ b`.
    Exp,
    /// Minimum of `n` inputs.
    Min,
    /// Maximum of `n` inputs.
    Max,
    /// Saturating addition of `n` inputs.
    SaturatingAdd,
    /// Saturating subtraction of `n` inputs, left to right.
    SaturatingSub,
    /// `1` if both inputs are equal.
    EqualTo,
    /// `1` if `a > b`.
    GreaterThan,
    /// `1` if `a < b`.
    LessThan,
    /// `1` if the input is zero.
    IsZero,
    /// The first of `n` inputs if all of them are nonzero, otherwise zero.
    Every,
    /// The first nonzero of `n` inputs, or zero.
    Any,
    /// Strict ternary: `condition ? a : b` over three already evaluated inputs.
    EagerIf,
    /// Fails the evaluation if any of the `n` inputs is zero.
    Ensure,
    /// Read a value from the store.
    Get,
    /// Write a value to the store.
    Set,
    /// 18-decimal fixed-point multiplication. Operand: rounding mode.
    FixedPointMul,
    /// 18-decimal fixed-point division. Operand: rounding mode.
    FixedPointDiv,
    /// Rescale a value from the operand's decimals to 18 decimals.
    Scale18,
    /// Rescale an 18-decimal value to the operand's decimals.
    ScaleN,
    /// Scale by a signed power of ten taken from the operand.
    ScaleBy,
    /// ERC-20 `balanceOf(account)` of a token.
    Erc20BalanceOf,
    /// ERC-20 `totalSupply()` of a token.
    Erc20TotalSupply,
    /// ERC-721 `balanceOf(account)` of a token.
    Erc721BalanceOf,
    /// ERC-721 `ownerOf(id)` of a token.
    Erc721OwnerOf,
    /// ERC-1155 `balanceOf(account, id)` of a token.
    Erc1155BalanceOf,
    /// Push a list sentinel.
    Sentinel,
    /// `keccak256` over `n` words.
    Hash,
    /// `keccak256(seed ++ index)`.
    RandomId,
    /// Push the signer of a signed context. Operand: signed context index.
    Signer,
    /// Like [`Opcode::Scale18`] with the decimals taken from the stack.
    Scale18Dynamic,
    /// Like [`Opcode::ScaleN`] with the decimals taken from the stack.
    ScaleNDynamic,
    /// Push the number of columns of a context row. Operand: row.
    ContextRowLen,
}

/// How many inputs an opcode pops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    /// A fixed number of inputs.
    Fixed(usize),
    /// The number of inputs is the operand value, bounded to `min..=max`.
    Operand {
        /// Minimum number of inputs.
        min: u16,
        /// Maximum number of inputs.
        max: u16,
    },
}

impl Opcode {
    /// All opcodes, indexed by id.
    pub const ALL: [Self; OPCODE_COUNT] = [
        Self::ReadMemory,
        Self::Context,
        Self::Caller,
        Self::ThisAddress,
        Self::BlockNumber,
        Self::BlockTimestamp,
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Mod,
        Self::Exp,
        Self::Min,
        Self::Max,
        Self::SaturatingAdd,
        Self::SaturatingSub,
        Self::EqualTo,
        Self::GreaterThan,
        Self::LessThan,
        Self::IsZero,
        Self::Every,
        Self::Any,
        Self::EagerIf,
        Self::Ensure,
        Self::Get,
        Self::Set,
        Self::FixedPointMul,
        Self::FixedPointDiv,
        Self::Scale18,
        Self::ScaleN,
        Self::ScaleBy,
        Self::Erc20BalanceOf,
        Self::Erc20TotalSupply,
        Self::Erc721BalanceOf,
        Self::Erc721OwnerOf,
        Self::Erc1155BalanceOf,
        Self::Sentinel,
        Self::Hash,
        Self::RandomId,
        Self::Signer,
        Self::Scale18Dynamic,
        Self::ScaleNDynamic,
        Self::ContextRowLen,
    ];

    /// Looks up an opcode by id.
    pub const fn from_u16(id: u16) -> Option<Self> {
        if (id as usize) < OPCODE_COUNT {
            Some(Self::ALL[id as usize])
        } else {
            None
        }
    }

    /// The snake case name used by the disassembler.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ReadMemory => "read_memory",
            Self::Context => "context",
            Self::Caller => "caller",
            Self::ThisAddress => "this_address",
            Self::BlockNumber => "block_number",
            Self::BlockTimestamp => "block_timestamp",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Mod => "mod",
            Self::Exp => "exp",
            Self::Min => "min",
            Self::Max => "max",
            Self::SaturatingAdd => "saturating_add",
            Self::SaturatingSub => "saturating_sub",
            Self::EqualTo => "equal_to",
            Self::GreaterThan => "greater_than",
            Self::LessThan => "less_than",
            Self::IsZero => "is_zero",
            Self::Every => "every",
            Self::Any => "any",
            Self::EagerIf => "eager_if",
            Self::Ensure => "ensure",
            Self::Get => "get",
            Self::Set => "set",
            Self::FixedPointMul => "fixed_point_mul",
            Self::FixedPointDiv => "fixed_point_div",
            Self::Scale18 => "scale18",
            Self::ScaleN => "scale_n",
            Self::ScaleBy => "scale_by",
            Self::Erc20BalanceOf => "erc20_balance_of",
            Self::Erc20TotalSupply => "erc20_total_supply",
            Self::Erc721BalanceOf => "erc721_balance_of",
            Self::Erc721OwnerOf => "erc721_owner_of",
            Self::Erc1155BalanceOf => "erc1155_balance_of",
            Self::Sentinel => "sentinel",
            Self::Hash => "hash",
            Self::RandomId => "random_id",
            Self::Signer => "signer",
            Self::Scale18Dynamic => "scale18_dynamic",
            Self::ScaleNDynamic => "scale_n_dynamic",
            Self::ContextRowLen => "context_row_len",
        }
    }

    /// The first interpreter version in which the opcode is available.
    pub const fn since(self) -> InterpreterSpecId {
        match self {
            Self::Hash |
            Self::RandomId |
            Self::Signer |
            Self::Scale18Dynamic |
            Self::ScaleNDynamic |
            Self::ContextRowLen => InterpreterSpecId::V2,
            _ => InterpreterSpecId::V1,
        }
    }

    /// Whether the opcode is available in the given interpreter version.
    pub const fn is_enabled_in(self, spec: InterpreterSpecId) -> bool {
        spec.is_enabled(self.since())
    }

    /// The input arity of the opcode.
    pub const fn arity(self) -> Arity {
        match self {
            Self::ReadMemory |
            Self::Context |
            Self::Caller |
            Self::ThisAddress |
            Self::BlockNumber |
            Self::BlockTimestamp |
            Self::Sentinel |
            Self::Signer |
            Self::ContextRowLen => Arity::Fixed(0),
            Self::IsZero |
            Self::Get |
            Self::Scale18 |
            Self::ScaleN |
            Self::ScaleBy |
            Self::Erc20TotalSupply => Arity::Fixed(1),
            Self::Exp |
            Self::EqualTo |
            Self::GreaterThan |
            Self::LessThan |
            Self::Set |
            Self::FixedPointMul |
            Self::FixedPointDiv |
            Self::Erc20BalanceOf |
            Self::Erc721BalanceOf |
            Self::Erc721OwnerOf |
            Self::RandomId |
            Self::Scale18Dynamic |
            Self::ScaleNDynamic => Arity::Fixed(2),
            Self::EagerIf | Self::Erc1155BalanceOf => Arity::Fixed(3),
            Self::Add |
            Self::Sub |
            Self::Mul |
            Self::Div |
            Self::Mod |
            Self::Min |
            Self::Max |
            Self::SaturatingAdd |
            Self::SaturatingSub => Arity::Operand { min: 2, max: u8::MAX as u16 },
            Self::Every | Self::Any | Self::Ensure => {
                Arity::Operand { min: 1, max: u8::MAX as u16 }
            }
            Self::Hash => Arity::Operand { min: 1, max: constants::v2::MAX_HASH_INPUTS },
        }
    }

    /// The number of inputs popped for the given operand.
    pub const fn inputs(self, operand: Operand) -> usize {
        match self.arity() {
            Arity::Fixed(n) => n,
            Arity::Operand { .. } => operand.0 as usize,
        }
    }

    /// The number of outputs pushed.
    pub const fn outputs(self) -> usize {
        match self {
            Self::Ensure | Self::Set => 0,
            _ => 1,
        }
    }

    /// Validates an operand for this opcode, returning the reason it is rejected.
    ///
    /// Operands whose validity depends on the expression (constant indices, stack offsets) are
    /// checked separately by the integrity check.
    pub const fn check_operand(self, operand: Operand) -> Result<(), &'static str> {
        match self {
            Self::ReadMemory | Self::Context | Self::Signer => Ok(()),
            Self::ContextRowLen => {
                if operand.high() == 0 {
                    Ok(())
                } else {
                    Err("row must fit in one byte")
                }
            }
            Self::FixedPointMul | Self::FixedPointDiv => match crate::math::Rounding::from_bits(
                operand.low(),
            ) {
                Some(_) if operand.high() == 0 => Ok(()),
                _ => Err("expected a rounding mode"),
            },
            Self::Scale18 | Self::ScaleN | Self::ScaleBy => match ScaleOperand::decode(operand) {
                Some(_) => Ok(()),
                None => Err("invalid scale flags"),
            },
            Self::Scale18Dynamic | Self::ScaleNDynamic => match ScaleOperand::decode(operand) {
                Some(scale) if scale.value == 0 => Ok(()),
                _ => Err("invalid scale flags"),
            },
            _ => match self.arity() {
                Arity::Operand { min, max } => {
                    if operand.0 < min {
                        Err("too few inputs")
                    } else if operand.0 > max {
                        Err("too many inputs")
                    } else {
                        Ok(())
                    }
                }
                Arity::Fixed(_) => {
                    if operand.0 == 0 {
                        Ok(())
                    } else {
                        Err("operand must be zero")
                    }
                }
            },
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Rounding;

    #[test]
    fn test_ids_are_dense_and_stable() {
        for (id, opcode) in Opcode::ALL.iter().enumerate() {
            assert_eq!(*opcode as usize, id);
            assert_eq!(Opcode::from_u16(id as u16), Some(*opcode));
        }
        assert_eq!(Opcode::from_u16(OPCODE_COUNT as u16), None);
        assert_eq!(Opcode::ReadMemory as u16, 0);
        assert_eq!(Opcode::Sentinel as u16, 36);
    }

    #[test]
    fn test_versioning() {
        assert!(Opcode::Add.is_enabled_in(InterpreterSpecId::V1));
        assert!(!Opcode::Hash.is_enabled_in(InterpreterSpecId::V1));
        assert!(Opcode::Hash.is_enabled_in(InterpreterSpecId::V2));
        // every V2 opcode is appended after the V1 ones
        let first_v2 = Opcode::ALL.iter().position(|op| op.since() == InterpreterSpecId::V2);
        assert_eq!(first_v2, Some(Opcode::Hash as usize));
        assert!(Opcode::ALL[Opcode::Hash as usize..]
            .iter()
            .all(|op| op.since() == InterpreterSpecId::V2));
    }

    #[test]
    fn test_operand_validation() {
        assert_eq!(Opcode::Add.check_operand(Operand(2)), Ok(()));
        assert_eq!(Opcode::Add.check_operand(Operand(1)), Err("too few inputs"));
        assert_eq!(Opcode::Add.check_operand(Operand(256)), Err("too many inputs"));
        assert_eq!(Opcode::Ensure.check_operand(Operand(1)), Ok(()));
        assert_eq!(Opcode::Caller.check_operand(Operand(1)), Err("operand must be zero"));
        assert_eq!(Opcode::FixedPointMul.check_operand(Operand(Rounding::Up as u16)), Ok(()));
        assert!(Opcode::FixedPointMul.check_operand(Operand(3)).is_err());
        assert!(Opcode::Scale18Dynamic.check_operand(Operand(6)).is_err());
        assert_eq!(Opcode::ContextRowLen.check_operand(Operand(4)), Ok(()));
    }

    #[test]
    fn test_io() {
        assert_eq!(Opcode::Add.inputs(Operand(5)), 5);
        assert_eq!(Opcode::EagerIf.inputs(Operand(0)), 3);
        assert_eq!(Opcode::Set.outputs(), 0);
        assert_eq!(Opcode::Ensure.outputs(), 0);
        assert_eq!(Opcode::Hash.outputs(), 1);
    }
}
