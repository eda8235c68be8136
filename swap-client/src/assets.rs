//! Supported source assets and amount conversions
//!
//! THORChain denominates every amount in 8 decimal base units, while the
//! source assets on Base carry their own native decimals. All conversions
//! here use integer or arbitrary precision decimal arithmetic and truncate
//! extra precision

use std::{cmp::Ordering, fmt, str::FromStr};

use alloy_primitives::{address, hex, Address, U256};
use bigdecimal::{BigDecimal, Zero};

use crate::error::SwapClientError;

// -------------
// | Constants |
// -------------

/// The sentinel address used for the chain's native asset
pub const NATIVE_ASSET_ADDRESS: Address = Address::ZERO;
/// The number of decimals THORChain uses for every amount
pub const THORCHAIN_DECIMALS: u32 = 8;
/// The default destination asset
pub const BTC_ASSET: &str = "BTC.BTC";

/// The USDC contract on Base
const USDC_ADDRESS: Address = address!("833589fcd6edb6e08f4c7c32d4f71b54bda02913");
/// The cbBTC contract on Base
const CBBTC_ADDRESS: Address = address!("cbb7c0000ab88b473b1f5afd9ef808440eed33bf");

/// The chain prefix of every supported asset's THORChain identifier
const BASE_CHAIN_PREFIX: &str = "BASE";

// ----------
// | Assets |
// ----------

/// An asset on Base that can be swapped through THORChain
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SupportedAsset {
    /// Native ether
    Eth,
    /// Circle's USDC
    Usdc,
    /// Coinbase wrapped BTC
    CbBtc,
}

impl SupportedAsset {
    /// Every supported asset
    pub const ALL: [SupportedAsset; 3] =
        [SupportedAsset::Eth, SupportedAsset::Usdc, SupportedAsset::CbBtc];

    /// The asset's ticker
    pub fn symbol(&self) -> &'static str {
        match self {
            SupportedAsset::Eth => "ETH",
            SupportedAsset::Usdc => "USDC",
            SupportedAsset::CbBtc => "cbBTC",
        }
    }

    /// The asset's contract address, the zero address for the native asset
    pub fn address(&self) -> Address {
        match self {
            SupportedAsset::Eth => NATIVE_ASSET_ADDRESS,
            SupportedAsset::Usdc => USDC_ADDRESS,
            SupportedAsset::CbBtc => CBBTC_ADDRESS,
        }
    }

    /// The asset's native decimals
    pub fn decimals(&self) -> u32 {
        match self {
            SupportedAsset::Eth => 18,
            SupportedAsset::Usdc => 6,
            SupportedAsset::CbBtc => 8,
        }
    }

    /// Whether the asset is the chain's native asset
    pub fn is_native(&self) -> bool {
        self.address() == NATIVE_ASSET_ADDRESS
    }

    /// The asset's THORChain identifier
    ///
    /// Native assets are `BASE.{SYMBOL}`, tokens are
    /// `BASE.{SYMBOL}-{ADDRESS}` with the address upper-cased
    pub fn thorchain_id(&self) -> String {
        let symbol = self.symbol().to_uppercase();
        if self.is_native() {
            return format!("{BASE_CHAIN_PREFIX}.{symbol}");
        }

        let addr = hex::encode_upper(self.address().as_slice());
        format!("{BASE_CHAIN_PREFIX}.{symbol}-0X{addr}")
    }
}

impl fmt::Display for SupportedAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for SupportedAsset {
    type Err = SwapClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        SupportedAsset::ALL
            .into_iter()
            .find(|a| a.symbol().to_uppercase() == normalized || a.thorchain_id() == normalized)
            .ok_or_else(|| SwapClientError::validation(format!("unsupported asset: {s}")))
    }
}

// ---------------
// | Conversions |
// ---------------

/// Parse a human-readable decimal amount into 8 decimal base units
///
/// Precision beyond 8 decimals is truncated. Amounts that are empty,
/// non-numeric, non-positive, or that truncate to zero are rejected
pub fn parse_base_units(amount: &str) -> Result<U256, SwapClientError> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(SwapClientError::validation("amount is required"));
    }

    let value = BigDecimal::from_str(trimmed)
        .map_err(|_| SwapClientError::validation(format!("invalid amount: {trimmed}")))?;
    if value <= BigDecimal::zero() {
        return Err(SwapClientError::validation("amount must be greater than 0"));
    }

    let scale = BigDecimal::from(10u64.pow(THORCHAIN_DECIMALS));
    let (digits, _) = (value * scale).with_scale(0).into_bigint_and_exponent();
    let base_units = U256::from_str_radix(&digits.to_string(), 10)
        .map_err(|_| SwapClientError::validation(format!("amount out of range: {trimmed}")))?;

    if base_units.is_zero() {
        return Err(SwapClientError::validation(format!(
            "amount is below the minimum precision of {THORCHAIN_DECIMALS} decimals: {trimmed}"
        )));
    }

    Ok(base_units)
}

/// Convert an integer amount between decimal precisions, flooring when
/// scaling down
pub fn convert_decimals(amount: U256, from_decimals: u32, to_decimals: u32) -> U256 {
    let ten = U256::from(10u64);
    match from_decimals.cmp(&to_decimals) {
        Ordering::Equal => amount,
        Ordering::Greater => amount / ten.pow(U256::from(from_decimals - to_decimals)),
        Ordering::Less => amount * ten.pow(U256::from(to_decimals - from_decimals)),
    }
}

/// Format 8 decimal base units as a human-readable decimal string
pub fn format_base_units(amount: U256) -> String {
    let divisor = U256::from(10u64).pow(U256::from(THORCHAIN_DECIMALS));
    let whole = amount / divisor;
    let frac = amount % divisor;
    format!("{whole}.{frac:0>width$}", frac = frac.to_string(), width = THORCHAIN_DECIMALS as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test the THORChain identifiers of the supported assets
    #[test]
    fn test_thorchain_ids() {
        assert_eq!(SupportedAsset::Eth.thorchain_id(), "BASE.ETH");
        assert_eq!(
            SupportedAsset::Usdc.thorchain_id(),
            "BASE.USDC-0X833589FCD6EDB6E08F4C7C32D4F71B54BDA02913"
        );
        assert_eq!(
            SupportedAsset::CbBtc.thorchain_id(),
            "BASE.CBBTC-0XCBB7C0000AB88B473B1F5AFD9EF808440EED33BF"
        );
    }

    /// Test parsing assets by ticker and identifier
    #[test]
    fn test_parse_asset() {
        assert_eq!("eth".parse::<SupportedAsset>().unwrap(), SupportedAsset::Eth);
        assert_eq!("cbBTC".parse::<SupportedAsset>().unwrap(), SupportedAsset::CbBtc);
        assert_eq!(
            "BASE.USDC-0X833589FCD6EDB6E08F4C7C32D4F71B54BDA02913".parse::<SupportedAsset>().unwrap(),
            SupportedAsset::Usdc
        );
        assert!("DOGE".parse::<SupportedAsset>().is_err());
    }

    /// Test parsing human amounts into base units
    #[test]
    fn test_parse_base_units() {
        assert_eq!(parse_base_units("1.5").unwrap(), U256::from(150_000_000u64));
        assert_eq!(parse_base_units("0.00000001").unwrap(), U256::from(1u64));
        assert_eq!(parse_base_units(" 2 ").unwrap(), U256::from(200_000_000u64));

        // Extra precision is truncated rather than rounded
        assert_eq!(parse_base_units("0.123456789").unwrap(), U256::from(12_345_678u64));
    }

    /// Test that invalid amounts are rejected
    #[test]
    fn test_parse_base_units_invalid() {
        for amount in ["", "abc", "0", "-1", "0.000000001"] {
            let err = parse_base_units(amount).unwrap_err();
            assert!(matches!(err, SwapClientError::Validation(_)), "{amount}: {err}");
        }
    }

    /// Test converting between decimal precisions
    #[test]
    fn test_convert_decimals() {
        // 1.5 units from 8 decimals into USDC's 6
        assert_eq!(convert_decimals(U256::from(150_000_000u64), 8, 6), U256::from(1_500_000u64));
        // Scaling down floors
        assert_eq!(convert_decimals(U256::from(100_000_001u64), 8, 6), U256::from(1_000_000u64));
        // Scaling up into ETH's 18
        assert_eq!(
            convert_decimals(U256::from(150_000_000u64), 8, 18),
            U256::from(1_500_000_000_000_000_000u128)
        );
        assert_eq!(convert_decimals(U256::from(42u64), 8, 8), U256::from(42u64));
    }

    /// Test that scaling up then down recovers the original amount
    #[test]
    fn test_convert_decimals_recovers_amount() {
        let amount = U256::from(123_456_789u64);
        for decimals in [8, 18] {
            let scaled = convert_decimals(amount, THORCHAIN_DECIMALS, decimals);
            assert_eq!(convert_decimals(scaled, decimals, THORCHAIN_DECIMALS), amount);
        }
    }

    /// Test formatting base units
    #[test]
    fn test_format_base_units() {
        assert_eq!(format_base_units(U256::from(970_000u64)), "0.00970000");
        assert_eq!(format_base_units(U256::from(150_000_000u64)), "1.50000000");
    }
}
