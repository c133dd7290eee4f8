//! Algebraic properties of the pure helpers.

use alloy_primitives::{keccak256, B256, U256};
use proptest::prelude::*;
use rain_interpreter::{
    commitment_eq, constants::v1::FP_ONE, decode_lists, encode_list,
    math::{fixed_point_div, fixed_point_mul, pow10, scale18, scale_n, Rounding},
    random_id, records, Commitment, MathError,
};

fn u128_word() -> impl Strategy<Value = U256> {
    any::<u128>().prop_map(U256::from)
}

fn word() -> impl Strategy<Value = U256> {
    any::<[u8; 32]>().prop_map(U256::from_be_bytes)
}

/// Full-width words, mixed with 64-bit ones so that products often fit after scaling.
fn operand() -> impl Strategy<Value = U256> {
    prop_oneof![word(), any::<u64>().prop_map(U256::from)]
}

/// Checks the rounding law of one `a * b / d` against its truncated result.
fn check_round_up(
    truncated: Result<U256, MathError>,
    up: Result<U256, MathError>,
    inexact: bool,
) -> Result<(), TestCaseError> {
    match truncated {
        Ok(zero) if inexact && zero == U256::MAX => prop_assert_eq!(up, Err(MathError::Overflow)),
        Ok(zero) => prop_assert_eq!(up, Ok(zero + U256::from(u8::from(inexact)))),
        Err(err) => {
            prop_assert_eq!(err, MathError::Overflow);
            prop_assert_eq!(up, Err(MathError::Overflow));
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn test_commitment_eq(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
        let (a, b) = (B256::from(a), B256::from(b));
        prop_assert!(commitment_eq(a, a));
        prop_assert_eq!(commitment_eq(a, b), a == b);
    }

    #[test]
    fn test_from_secret_is_keccak(secret in any::<[u8; 32]>()) {
        let secret = B256::from(secret);
        prop_assert_eq!(Commitment::from_secret(secret).0, keccak256(secret));
    }

    #[test]
    fn test_random_id_preimage(seed in word(), index in word()) {
        let mut preimage = seed.to_be_bytes::<32>().to_vec();
        preimage.extend_from_slice(&index.to_be_bytes::<32>());
        let expected = U256::from_be_bytes(keccak256(&preimage).0);
        prop_assert_eq!(random_id(seed, index), expected);
        prop_assert_eq!(random_id(seed, index), expected);
    }

    #[test]
    fn test_fixed_point_mul_rounding(a in u128_word(), b in u128_word()) {
        let down = fixed_point_mul(a, b, Rounding::Down).unwrap();
        let zero = fixed_point_mul(a, b, Rounding::Zero).unwrap();
        let up = fixed_point_mul(a, b, Rounding::Up).unwrap();
        let inexact = !(a * b % FP_ONE).is_zero();
        prop_assert_eq!(down, zero);
        prop_assert_eq!(up, zero + U256::from(u8::from(inexact)));
    }

    #[test]
    fn test_fixed_point_div_rounding(a in u128_word(), b in u128_word()) {
        prop_assume!(!b.is_zero());
        let zero = fixed_point_div(a, b, Rounding::Zero).unwrap();
        let up = fixed_point_div(a, b, Rounding::Up).unwrap();
        let inexact = !(a * FP_ONE % b).is_zero();
        prop_assert_eq!(up, zero + U256::from(u8::from(inexact)));
    }

    #[test]
    fn test_fixed_point_mul_rounding_full_width(a in operand(), b in operand()) {
        let inexact = !a.mul_mod(b, FP_ONE).is_zero();
        check_round_up(
            fixed_point_mul(a, b, Rounding::Zero),
            fixed_point_mul(a, b, Rounding::Up),
            inexact,
        )?;
    }

    #[test]
    fn test_fixed_point_div_rounding_full_width(a in operand(), b in operand()) {
        prop_assume!(!b.is_zero());
        let inexact = !a.mul_mod(FP_ONE, b).is_zero();
        check_round_up(
            fixed_point_div(a, b, Rounding::Zero),
            fixed_point_div(a, b, Rounding::Up),
            inexact,
        )?;
    }

    #[test]
    fn test_scale18_scale_n_inverse(value in u128_word(), decimals in 0u8..=36) {
        let scaled = scale18(value, decimals, Rounding::Down).unwrap();
        let back = scale_n(scaled, decimals, Rounding::Down).unwrap();
        if decimals <= 18 {
            prop_assert_eq!(back, value);
        } else {
            prop_assert!(back <= value);
            prop_assert!(value - back < pow10(decimals - 18).unwrap());
            let up = scale18(value, decimals, Rounding::Up).unwrap();
            prop_assert!(scale_n(up, decimals, Rounding::Up).unwrap() >= value);
        }
    }

    #[test]
    fn test_sentinel_round_trip(
        lists in prop::collection::vec(prop::collection::vec(any::<[u64; 3]>(), 0..6), 1..5),
    ) {
        let records_in: Vec<Vec<[U256; 3]>> = lists
            .iter()
            .map(|list| list.iter().map(|record| record.map(U256::from)).collect())
            .collect();
        let mut stack = Vec::new();
        for list in &records_in {
            stack.extend(encode_list(list));
        }
        let widths = vec![3; records_in.len()];
        let decoded = decode_lists(&stack, &widths).unwrap();
        prop_assert_eq!(decoded.consumed, stack.len());
        let records_out: Vec<Vec<[U256; 3]>> =
            decoded.lists.iter().map(|list| records::<3>(list).collect()).collect();
        prop_assert_eq!(records_out, records_in);
    }
}

#[test]
fn test_random_id_edges() {
    let seed = U256::from(0x5eed);
    assert_eq!(random_id(seed, U256::ZERO), random_id(seed, U256::ZERO));
    assert_ne!(random_id(seed, U256::ZERO), random_id(seed, U256::MAX));
}

#[test]
fn test_fixed_point_errors() {
    assert!(fixed_point_div(U256::from(1), U256::ZERO, Rounding::Down).is_err());
    assert!(fixed_point_mul(U256::MAX, U256::MAX, Rounding::Down).is_err());
}

#[test]
fn test_round_up_past_256_bit_product() {
    let a = U256::MAX / U256::from(7);
    let b = FP_ONE + U256::from(1);
    let truncated = fixed_point_mul(a, b, Rounding::Zero).unwrap();
    // a * b overflows 256 bits but a * b / 1e18 does not
    assert!(a.checked_mul(b).is_none());
    assert_eq!(fixed_point_mul(a, b, Rounding::Up), Ok(truncated + U256::from(1)));
}
