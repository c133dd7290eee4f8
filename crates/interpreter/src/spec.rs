//! Definitions of the interpreter versions (`InterpreterSpecId`).

use core::{
    fmt::{self, Display},
    str::FromStr,
};
use serde::{Deserialize, Serialize};

/// Interpreter spec id, defining different versions of the opcode registry.
///
/// Versions are additive: every opcode available in a version is also available, with identical
/// semantics, in all later versions. An expression deployed against one version keeps evaluating
/// identically when the interpreter is upgraded.
#[repr(u8)]
#[derive(
    Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[non_exhaustive]
pub enum InterpreterSpecId {
    /// The initial opcode set: memory, context, arithmetic, logic, store, token queries and
    /// sentinels.
    V1,
    /// Adds hashing, random ids, signer access and decimals taken from the stack.
    #[default]
    V2,
}

/// String identifiers for interpreter versions.
pub mod name {
    /// The string identifier for the `V1` interpreter.
    pub const V1: &str = "V1";
    /// The string identifier for the `V2` interpreter.
    pub const V2: &str = "V2";
}

/// Error returned when parsing an unknown interpreter version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown interpreter version")]
pub struct UnknownSpec;

impl InterpreterSpecId {
    /// The most recent interpreter version.
    pub const LATEST: Self = Self::V2;

    /// Checks if one given [`InterpreterSpecId`] is enabled in the current one.
    ///
    /// Versions are backward compatible, so a lower version is always enabled in a higher one.
    pub const fn is_enabled(self, other: Self) -> bool {
        other as u8 <= self as u8
    }
}

impl From<InterpreterSpecId> for &'static str {
    fn from(spec_id: InterpreterSpecId) -> Self {
        match spec_id {
            InterpreterSpecId::V1 => name::V1,
            InterpreterSpecId::V2 => name::V2,
        }
    }
}

impl FromStr for InterpreterSpecId {
    type Err = UnknownSpec;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            name::V1 => Ok(Self::V1),
            name::V2 => Ok(Self::V2),
            _ => Err(UnknownSpec),
        }
    }
}

impl Display for InterpreterSpecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{}", s)
    }
}
