//! # Hex Encoding
//!
//! Lowercase hex helpers shared by the address newtypes and the ledger ABI
//! decoder. Accepts an optional `0x` prefix on input; always emits lowercase
//! without a prefix.

use crate::error::ValidationError;

/// Render bytes as a lowercase hex string without a prefix.
pub fn encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Strip a leading `0x` or `0X`, if present.
pub fn strip_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Decode a hex string (optional `0x` prefix) into bytes.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidHex`] on odd length or a non-hex digit.
pub fn decode(s: &str) -> Result<Vec<u8>, ValidationError> {
    let digits = strip_prefix(s).as_bytes();
    if digits.len() % 2 != 0 {
        return Err(ValidationError::InvalidHex(format!(
            "odd number of digits ({})",
            digits.len()
        )));
    }
    digits
        .chunks(2)
        .map(|pair| -> Result<u8, ValidationError> {
            Ok((nibble(pair[0])? << 4) | nibble(pair[1])?)
        })
        .collect()
}

/// Decode a hex string into a fixed-size array.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidHex`] if the string is malformed or does
/// not decode to exactly `N` bytes.
pub fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], ValidationError> {
    let bytes = decode(s)?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| ValidationError::InvalidHex(format!("expected {N} bytes, got {len}")))
}

fn nibble(c: u8) -> Result<u8, ValidationError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        other => Err(ValidationError::InvalidHex(format!(
            "non-hex digit {:?}",
            other as char
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_is_lowercase() {
        assert_eq!(encode(&[0xde, 0xad, 0xBE, 0xef]), "deadbeef");
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn decode_accepts_prefix_and_mixed_case() {
        assert_eq!(decode("0xDeAd").unwrap(), vec![0xde, 0xad]);
        assert_eq!(decode("beef").unwrap(), vec![0xbe, 0xef]);
        assert_eq!(decode("0x").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn decode_rejects_odd_length() {
        assert!(decode("0xabc").is_err());
    }

    #[test]
    fn decode_rejects_non_hex() {
        assert!(decode("zz").is_err());
    }

    #[test]
    fn decode_fixed_checks_length() {
        let ok: [u8; 2] = decode_fixed("0x0102").unwrap();
        assert_eq!(ok, [1, 2]);
        assert!(decode_fixed::<3>("0x0102").is_err());
    }
}
