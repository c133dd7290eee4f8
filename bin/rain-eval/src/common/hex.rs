use alloy_primitives::{hex, Bytes};

use super::{EvalCliError, Result};

/// Decode a hex string, with or without a `0x` prefix. Surrounding whitespace is ignored.
pub fn decode_hex(s: &str) -> Result<Bytes> {
    let s = s.trim();
    let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    if digits.len() % 2 != 0 {
        return Err(EvalCliError::InvalidInput(format!(
            "Invalid hex string length: {} (must be even)",
            digits.len()
        )));
    }
    Ok(hex::decode(digits)?.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hex() {
        assert_eq!(decode_hex(" 0x0102 ").unwrap(), Bytes::from(vec![1, 2]));
        assert_eq!(decode_hex("0X").unwrap(), Bytes::new());
        assert!(matches!(decode_hex("0x123"), Err(EvalCliError::InvalidInput(_))));
        assert!(matches!(decode_hex("zz"), Err(EvalCliError::InvalidHex(_))));
    }
}
