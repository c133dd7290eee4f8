use alloy_primitives::{aliases::U512, U256};

use super::Rounding;
use crate::{
    constants::v1::{FP_DECIMALS, FP_ONE, MAX_POW10_EXPONENT},
    MathError,
};

/// Returns `10^places`, failing if it does not fit in 256 bits.
pub fn pow10(places: u8) -> Result<U256, MathError> {
    if places > MAX_POW10_EXPONENT {
        return Err(MathError::Overflow);
    }
    U256::from(10u64).checked_pow(U256::from(places)).ok_or(MathError::Overflow)
}

/// Multiplies `value` by `10^places`, failing on overflow.
pub fn scale_up(value: U256, places: u8) -> Result<U256, MathError> {
    if value.is_zero() {
        return Ok(U256::ZERO);
    }
    value.checked_mul(pow10(places)?).ok_or(MathError::Overflow)
}

/// Multiplies `value` by `10^places`, saturating at [`U256::MAX`].
pub fn saturating_scale_up(value: U256, places: u8) -> U256 {
    scale_up(value, places).unwrap_or(U256::MAX)
}

/// Divides `value` by `10^places`.
///
/// Scaling down never fails: for more places than a word can hold the result is zero, or one when
/// rounding up a nonzero value.
pub fn scale_down(value: U256, places: u8, rounding: Rounding) -> U256 {
    let Ok(divisor) = pow10(places) else {
        return if rounding.rounds_up() && !value.is_zero() { U256::from(1) } else { U256::ZERO };
    };
    let quotient = value / divisor;
    // the quotient is at most U256::MAX / 10 whenever the remainder can be nonzero
    if rounding.rounds_up() && !(value % divisor).is_zero() {
        quotient + U256::from(1)
    } else {
        quotient
    }
}

/// Rescales `value` from `decimals` to the canonical 18 decimals.
pub fn scale18(value: U256, decimals: u8, rounding: Rounding) -> Result<U256, MathError> {
    if decimals > FP_DECIMALS {
        Ok(scale_down(value, decimals - FP_DECIMALS, rounding))
    } else {
        scale_up(value, FP_DECIMALS - decimals)
    }
}

/// Like [`scale18`], saturating instead of failing on overflow.
pub fn saturating_scale18(value: U256, decimals: u8, rounding: Rounding) -> U256 {
    scale18(value, decimals, rounding).unwrap_or(U256::MAX)
}

/// Rescales an 18-decimal `value` to `decimals`.
pub fn scale_n(value: U256, decimals: u8, rounding: Rounding) -> Result<U256, MathError> {
    if decimals > FP_DECIMALS {
        scale_up(value, decimals - FP_DECIMALS)
    } else {
        Ok(scale_down(value, FP_DECIMALS - decimals, rounding))
    }
}

/// Like [`scale_n`], saturating instead of failing on overflow.
pub fn saturating_scale_n(value: U256, decimals: u8, rounding: Rounding) -> U256 {
    scale_n(value, decimals, rounding).unwrap_or(U256::MAX)
}

/// Scales `value` by a signed power of ten: positive `places` multiply, negative divide.
pub fn scale_by(value: U256, places: i8, rounding: Rounding) -> Result<U256, MathError> {
    if places >= 0 {
        scale_up(value, places.unsigned_abs())
    } else {
        Ok(scale_down(value, places.unsigned_abs(), rounding))
    }
}

/// Like [`scale_by`], saturating instead of failing on overflow.
pub fn saturating_scale_by(value: U256, places: i8, rounding: Rounding) -> U256 {
    scale_by(value, places, rounding).unwrap_or(U256::MAX)
}

/// Rescales a ratio of token B per token A from 18 decimals on both sides to the native decimals
/// of each token.
pub fn scale_ratio(
    ratio: U256,
    a_decimals: u8,
    b_decimals: u8,
    rounding: Rounding,
) -> Result<U256, MathError> {
    let places = i16::from(b_decimals) - i16::from(a_decimals);
    let magnitude = u8::try_from(places.unsigned_abs()).map_err(|_| MathError::Overflow)?;
    if places >= 0 {
        scale_up(ratio, magnitude)
    } else {
        Ok(scale_down(ratio, magnitude, rounding))
    }
}

/// Computes `a * b / denominator` with a 512-bit intermediate product.
pub fn mul_div(
    a: U256,
    b: U256,
    denominator: U256,
    rounding: Rounding,
) -> Result<U256, MathError> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let product = widen(a) * widen(b);
    let denominator = widen(denominator);
    let quotient = narrow(product / denominator)?;
    if rounding.rounds_up() && !(product % denominator).is_zero() {
        quotient.checked_add(U256::from(1)).ok_or(MathError::Overflow)
    } else {
        Ok(quotient)
    }
}

/// Multiplies two 18-decimal values.
pub fn fixed_point_mul(a: U256, b: U256, rounding: Rounding) -> Result<U256, MathError> {
    mul_div(a, b, FP_ONE, rounding)
}

/// Divides two 18-decimal values.
pub fn fixed_point_div(a: U256, b: U256, rounding: Rounding) -> Result<U256, MathError> {
    mul_div(a, FP_ONE, b, rounding)
}

fn widen(value: U256) -> U512 {
    let [l0, l1, l2, l3] = *value.as_limbs();
    U512::from_limbs([l0, l1, l2, l3, 0, 0, 0, 0])
}

fn narrow(value: U512) -> Result<U256, MathError> {
    let limbs = value.as_limbs();
    if limbs[4..].iter().any(|limb| *limb != 0) {
        return Err(MathError::Overflow);
    }
    Ok(U256::from_limbs([limbs[0], limbs[1], limbs[2], limbs[3]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fp(units: u64) -> U256 {
        U256::from(units) * FP_ONE
    }

    #[test]
    fn test_pow10_bounds() {
        assert_eq!(pow10(0), Ok(U256::from(1)));
        assert_eq!(pow10(18), Ok(FP_ONE));
        assert!(pow10(77).is_ok());
        assert_eq!(pow10(78), Err(MathError::Overflow));
    }

    #[test]
    fn test_scale18() {
        // 1.5 USDC (6 decimals) to 18 decimals
        assert_eq!(
            scale18(U256::from(1_500_000), 6, Rounding::Down),
            Ok(U256::from(1_500_000_000_000_000_000u128))
        );
        // 20 decimals down to 18, with a remainder
        assert_eq!(scale18(U256::from(199), 20, Rounding::Down), Ok(U256::from(1)));
        assert_eq!(scale18(U256::from(199), 20, Rounding::Up), Ok(U256::from(2)));
        assert_eq!(scale18(U256::from(200), 20, Rounding::Up), Ok(U256::from(2)));
        assert_eq!(scale18(U256::MAX, 0, Rounding::Down), Err(MathError::Overflow));
        assert_eq!(saturating_scale18(U256::MAX, 0, Rounding::Down), U256::MAX);
    }

    #[test]
    fn test_scale_n() {
        assert_eq!(scale_n(fp(3), 6, Rounding::Down), Ok(U256::from(3_000_000)));
        assert_eq!(scale_n(U256::from(1), 0, Rounding::Down), Ok(U256::ZERO));
        assert_eq!(scale_n(U256::from(1), 0, Rounding::Up), Ok(U256::from(1)));
        assert_eq!(scale_n(U256::from(5), 20, Rounding::Down), Ok(U256::from(500)));
    }

    #[test]
    fn test_scale_by_and_down() {
        assert_eq!(scale_by(U256::from(7), 2, Rounding::Down), Ok(U256::from(700)));
        assert_eq!(scale_by(U256::from(799), -2, Rounding::Zero), Ok(U256::from(7)));
        assert_eq!(scale_by(U256::from(799), -2, Rounding::Up), Ok(U256::from(8)));
        assert_eq!(scale_down(U256::MAX, 200, Rounding::Down), U256::ZERO);
        assert_eq!(scale_down(U256::MAX, 200, Rounding::Up), U256::from(1));
        assert_eq!(scale_down(U256::ZERO, 200, Rounding::Up), U256::ZERO);
        assert_eq!(saturating_scale_by(U256::MAX, 1, Rounding::Down), U256::MAX);
    }

    #[test]
    fn test_scale_ratio() {
        // 1 A (18 decimals) buys 2 B (6 decimals)
        let ratio = fp(2);
        assert_eq!(scale_ratio(ratio, 18, 6, Rounding::Down), Ok(U256::from(2_000_000)));
        assert_eq!(scale_ratio(U256::from(2_000_000), 6, 18, Rounding::Down), Ok(ratio));
    }

    #[test]
    fn test_fixed_point_mul_div() {
        assert_eq!(fixed_point_mul(fp(3), fp(4), Rounding::Down), Ok(fp(12)));
        assert_eq!(
            fixed_point_div(fp(1), fp(3), Rounding::Down),
            Ok(U256::from(333_333_333_333_333_333u64))
        );
        assert_eq!(
            fixed_point_div(fp(1), fp(3), Rounding::Up),
            Ok(U256::from(333_333_333_333_333_334u64))
        );
        assert_eq!(
            fixed_point_div(fp(1), U256::ZERO, Rounding::Down),
            Err(MathError::DivisionByZero)
        );
        // the intermediate product exceeds 256 bits but the result fits
        assert_eq!(fixed_point_mul(U256::MAX, FP_ONE, Rounding::Down), Ok(U256::MAX));
        assert_eq!(fixed_point_mul(U256::MAX, fp(2), Rounding::Down), Err(MathError::Overflow));
        assert_eq!(
            fixed_point_mul(U256::MAX, FP_ONE + U256::from(1), Rounding::Up),
            Err(MathError::Overflow)
        );
    }
}
