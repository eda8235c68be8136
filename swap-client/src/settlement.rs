//! Translation from source-chain transaction hashes to THORChain settlement
//! ids

use std::{fmt, str::FromStr};

use alloy_primitives::TxHash;

use crate::error::SwapClientError;

/// The public tracker settlement ids are linked to
pub const TRACKER_BASE_URL: &str = "https://track.ninerealms.com";

/// The number of hex digits in a transaction hash
const TX_HASH_HEX_LEN: usize = 64;

/// The id THORChain uses for an inbound transaction: its hash with the `0x`
/// prefix stripped, upper-cased
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SettlementId(String);

impl SettlementId {
    /// Derive the settlement id of a transaction hash
    pub fn from_tx_hash(tx_hash: &TxHash) -> Self {
        let hex = format!("{tx_hash:#x}");
        Self(hex.trim_start_matches("0x").to_uppercase())
    }

    /// The id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The public tracker url for the settlement
    pub fn tracker_url(&self) -> String {
        format!("{TRACKER_BASE_URL}/{}", self.0)
    }
}

impl fmt::Display for SettlementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SettlementId {
    type Err = SwapClientError;

    /// Parse a transaction hash or settlement id, with or without the `0x`
    /// prefix
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.len() != TX_HASH_HEX_LEN || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(SwapClientError::validation(format!(
                "expected a {TX_HASH_HEX_LEN} digit hex transaction hash, got {s}"
            )));
        }

        Ok(Self(digits.to_uppercase()))
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::b256;

    use super::*;

    /// The hash used across tests
    const HASH: &str = "0xabcdef0123456789abcdef0123456789abcdef0123456789abcdef0123456789";
    /// The settlement id of `HASH`
    const ID: &str = "ABCDEF0123456789ABCDEF0123456789ABCDEF0123456789ABCDEF0123456789";

    /// Test deriving a settlement id from a hash
    #[test]
    fn test_from_tx_hash() {
        let hash = b256!("abcdef0123456789abcdef0123456789abcdef0123456789abcdef0123456789");
        let id = SettlementId::from_tx_hash(&hash);

        assert_eq!(id.as_str(), ID);
        assert!(!id.as_str().starts_with("0x"));
        assert_eq!(id.to_string().len(), TX_HASH_HEX_LEN);
    }

    /// Test that leading zero bytes are preserved
    #[test]
    fn test_from_tx_hash_leading_zeros() {
        let hash = TxHash::with_last_byte(1);
        let id = SettlementId::from_tx_hash(&hash);
        assert_eq!(id.as_str(), format!("{}01", "0".repeat(62)));
    }

    /// Test parsing ids with and without the prefix
    #[test]
    fn test_parse() {
        assert_eq!(HASH.parse::<SettlementId>().unwrap().as_str(), ID);
        assert_eq!(ID.parse::<SettlementId>().unwrap().as_str(), ID);
        assert_eq!(ID.to_lowercase().parse::<SettlementId>().unwrap().as_str(), ID);

        assert!("0x1234".parse::<SettlementId>().is_err());
        assert!(format!("0x{}", "zz".repeat(32)).parse::<SettlementId>().is_err());
    }

    /// Test the tracker url
    #[test]
    fn test_tracker_url() {
        let id: SettlementId = HASH.parse().unwrap();
        assert_eq!(id.tracker_url(), format!("https://track.ninerealms.com/{ID}"));
    }
}
