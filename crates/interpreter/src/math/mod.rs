//! Fixed-point math.
//!
//! Values are unsigned 256-bit integers interpreted with a number of decimals. The canonical
//! precision is 18 decimals ([`FP_ONE`](crate::constants::v1::FP_ONE) is `1.0`). Every lossy
//! operation takes an explicit [`Rounding`].

mod fixed_point;
pub use fixed_point::*;

use serde::{Deserialize, Serialize};

/// Rounding mode of lossy operations.
///
/// Values are unsigned, so [`Rounding::Down`] and [`Rounding::Zero`] both truncate.
/// [`Rounding::Up`] adds one unit in the last place whenever the discarded remainder is nonzero.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rounding {
    /// Round towards negative infinity.
    #[default]
    Down = 0,
    /// Round towards positive infinity.
    Up = 1,
    /// Round towards zero (truncate).
    Zero = 2,
}

impl Rounding {
    /// Decodes a rounding mode from its operand bits.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::Down),
            1 => Some(Self::Up),
            2 => Some(Self::Zero),
            _ => None,
        }
    }

    /// Whether a nonzero remainder bumps the result by one.
    pub const fn rounds_up(self) -> bool {
        matches!(self, Self::Up)
    }
}
