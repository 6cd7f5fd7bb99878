//! # ABI Call Data and Return Words
//!
//! Every registry query is a single-word `eth_call`: a 4-byte selector,
//! optionally followed by one 32-byte argument, returning one 32-byte word.
//! Results pack several small big-endian integers into that word at fixed
//! byte offsets, so decoding is a matter of reading the right slice.

use std::ops::Range;

use attest_core::{hex, Address, ExposureReportId};

use crate::error::LedgerError;

/// `revokes(address)`: last revocation time, low 5 bytes.
pub const LAST_REVOKE: [u8; 4] = [0x6a, 0x0d, 0x10, 0x4e];
/// `exposureReported(bytes32)`: last exposure report time, low 5 bytes.
pub const EXPOSURE_REPORTED: [u8; 4] = [0x72, 0x79, 0x72, 0x21];
/// `signerInfo(address)`: packed end time, stake and start time.
pub const SIGNER_INFO: [u8; 4] = [0x27, 0x96, 0xd3, 0xf1];
/// `signerCountNeeded()`: low byte.
pub const SIGNER_COUNT_NEEDED: [u8; 4] = [0x46, 0xfc, 0x4b, 0xe1];
/// `signerStakeNeeded()`: low 6 bytes.
pub const SIGNER_STAKE_NEEDED: [u8; 4] = [0xc8, 0x67, 0x6e, 0xc4];
/// `handleOf(address)`: the full word.
pub const HANDLE_OF: [u8; 4] = [0xc5, 0x0a, 0x15, 0x14];

/// Byte ranges of the packed fields inside a return word.
pub mod layout {
    use std::ops::Range;

    pub const REVOKE_TIMESTAMP: Range<usize> = 27..32;
    pub const EXPOSURE_TIMESTAMP: Range<usize> = 27..32;
    pub const SIGNER_END_TS: Range<usize> = 12..18;
    pub const SIGNER_STAKE: Range<usize> = 18..24;
    pub const SIGNER_START_TS: Range<usize> = 26..32;
    pub const COUNT_NEEDED: Range<usize> = 31..32;
    pub const STAKE_NEEDED: Range<usize> = 26..32;
}

/// Encoded call data for a single-argument (or no-argument) call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calldata(Vec<u8>);

impl Calldata {
    pub fn selector(selector: [u8; 4]) -> Self {
        Self(selector.to_vec())
    }

    /// Append an address, left-padded to 32 bytes.
    pub fn address(mut self, addr: &Address) -> Self {
        self.0.extend_from_slice(&[0u8; 12]);
        self.0.extend_from_slice(&addr.to_bytes());
        self
    }

    /// Append a 32-byte report identifier.
    pub fn report_id(mut self, id: &ExposureReportId) -> Self {
        // Validated as 64 hex digits at construction.
        let bytes: [u8; 32] = hex::decode_fixed(id.as_hex()).unwrap_or([0u8; 32]);
        self.0.extend_from_slice(&bytes);
        self
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// `0x`-prefixed hex, as sent in `eth_call`.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }
}

/// One 32-byte ABI return word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbiWord([u8; 32]);

impl AbiWord {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Decode an `eth_call` result string.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Decode`] unless the string is exactly one
    /// hex-encoded word.
    pub fn from_hex(query: &'static str, raw: &str) -> Result<Self, LedgerError> {
        hex::decode_fixed::<32>(raw)
            .map(Self)
            .map_err(|e| LedgerError::Decode {
                query,
                reason: e.to_string(),
            })
    }

    /// Read a big-endian unsigned integer from `range`. Ranges wider than
    /// eight bytes are rejected rather than truncated.
    pub fn uint(&self, query: &'static str, range: Range<usize>) -> Result<u64, LedgerError> {
        if range.len() > 8 || range.end > 32 || range.start >= range.end {
            return Err(LedgerError::Decode {
                query,
                reason: format!("unsupported field range {range:?}"),
            });
        }
        Ok(self.0[range]
            .iter()
            .fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_hex(bytes: &[(usize, u8)]) -> String {
        let mut w = [0u8; 32];
        for (i, b) in bytes {
            w[*i] = *b;
        }
        format!("0x{}", hex::encode(&w))
    }

    #[test]
    fn address_call_data_is_left_padded() {
        let addr = Address::from_bytes([0x11; 20]);
        let data = Calldata::selector(LAST_REVOKE).address(&addr);
        assert_eq!(data.as_bytes().len(), 36);
        assert_eq!(
            data.to_hex(),
            format!("0x6a0d104e{}{}", "00".repeat(12), "11".repeat(20))
        );
    }

    #[test]
    fn report_call_data_appends_raw_id() {
        let id = ExposureReportId::new("ab".repeat(32)).unwrap();
        let data = Calldata::selector(EXPOSURE_REPORTED).report_id(&id);
        assert_eq!(data.to_hex(), format!("0x72797221{}", "ab".repeat(32)));
    }

    #[test]
    fn no_argument_call_data() {
        assert_eq!(Calldata::selector(SIGNER_COUNT_NEEDED).to_hex(), "0x46fc4be1");
        assert_eq!(Calldata::selector(SIGNER_STAKE_NEEDED).to_hex(), "0xc8676ec4");
    }

    #[test]
    fn decodes_signer_info_fields() {
        // end = 0x0102, stake = 0x0a0b0c, start = 0x05
        let raw = word_hex(&[(16, 0x01), (17, 0x02), (21, 0x0a), (22, 0x0b), (23, 0x0c), (31, 0x05)]);
        let w = AbiWord::from_hex("signerInfo", &raw).unwrap();
        assert_eq!(w.uint("signerInfo", layout::SIGNER_END_TS).unwrap(), 0x0102);
        assert_eq!(w.uint("signerInfo", layout::SIGNER_STAKE).unwrap(), 0x0a0b0c);
        assert_eq!(w.uint("signerInfo", layout::SIGNER_START_TS).unwrap(), 0x05);
    }

    #[test]
    fn high_bytes_outside_field_are_ignored() {
        let raw = word_hex(&[(0, 0xff), (26, 0xff), (27, 0x01), (31, 0x02)]);
        let w = AbiWord::from_hex("revokes", &raw).unwrap();
        assert_eq!(
            w.uint("revokes", layout::REVOKE_TIMESTAMP).unwrap(),
            0x01_0000_0002
        );
    }

    #[test]
    fn rejects_short_or_empty_results() {
        assert!(matches!(
            AbiWord::from_hex("revokes", "0x").unwrap_err(),
            LedgerError::Decode { query: "revokes", .. }
        ));
        assert!(AbiWord::from_hex("revokes", "0x01").is_err());
    }

    #[test]
    fn rejects_wide_ranges() {
        let w = AbiWord::from_bytes([0u8; 32]);
        assert!(w.uint("x", 0..9).is_err());
        assert!(w.uint("x", 30..33).is_err());
        assert!(w.is_zero());
    }
}
