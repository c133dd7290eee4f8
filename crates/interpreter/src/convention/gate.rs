use serde::{Deserialize, Serialize};

use super::tail_values;
use crate::{ConventionError, StackItem};

/// The phases of a lobby, each guarded by its own entrypoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum LobbyEntrypoint {
    /// Entering the lobby.
    #[display("join")]
    Join = 0,
    /// Leaving before the lobby completes.
    #[display("leave")]
    Leave = 1,
    /// Claiming a share after completion.
    #[display("claim")]
    Claim = 2,
    /// Invalidating the lobby.
    #[display("invalidate")]
    Invalidate = 3,
}

impl LobbyEntrypoint {
    /// All phases, by entrypoint index.
    pub const ALL: [Self; 4] = [Self::Join, Self::Leave, Self::Claim, Self::Invalidate];

    /// The entrypoint evaluated for this phase.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A boolean gate: the top stack word, zero meaning deny.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::Deref,
)]
pub struct Gate(pub bool);

impl Gate {
    /// Reads the top stack item.
    pub fn from_stack(stack: &[StackItem]) -> Result<Self, ConventionError> {
        let [word] = tail_values(stack)?;
        Ok(Self(!word.is_zero()))
    }

    /// Whether the gated action may proceed.
    pub const fn is_open(self) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::U256;

    use super::*;

    #[test]
    fn test_gate() {
        assert_eq!(Gate::from_stack(&[U256::ZERO.into()]), Ok(Gate(false)));
        assert!(Gate::from_stack(&[U256::ZERO.into(), U256::from(2).into()]).unwrap().is_open());
        assert_eq!(
            Gate::from_stack(&[]),
            Err(ConventionError::StackTooShort { expected: 1, actual: 0 })
        );
        assert_eq!(
            Gate::from_stack(&[StackItem::Sentinel]),
            Err(ConventionError::UnexpectedSentinel { slot: 0 })
        );
    }

    #[test]
    fn test_lobby_entrypoints() {
        for (index, phase) in LobbyEntrypoint::ALL.into_iter().enumerate() {
            assert_eq!(phase.index(), index);
        }
        assert_eq!(LobbyEntrypoint::Invalidate.to_string(), "invalidate");
    }
}
