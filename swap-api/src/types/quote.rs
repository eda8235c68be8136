//! API types for swap quotes

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::serialization::{option_u256_string_serialization, u256_string_serialization};

// --------------
// | Api Routes |
// --------------

/// The route on which to request a swap quote
pub const QUOTE_SWAP_ROUTE: &str = "/thorchain/quote/swap";

// -------------
// | Api Types |
// -------------

/// The query parameters of a swap quote request
///
/// Amounts are always denominated in THORChain's 8 decimal base units,
/// regardless of the native decimals of the source asset
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteSwapParams {
    /// The input amount, in 8 decimal base units
    #[serde(with = "u256_string_serialization")]
    pub amount: U256,
    /// The THORChain identifier of the source asset, e.g. `BASE.ETH`
    pub from_asset: String,
    /// The THORChain identifier of the destination asset, e.g. `BTC.BTC`
    pub to_asset: String,
    /// The address that receives the output on the destination chain
    pub destination: String,
    /// The number of blocks between streaming sub-swaps
    pub streaming_interval: u64,
    /// The number of streaming sub-swaps, zero lets the protocol decide
    pub streaming_quantity: u64,
    /// The affiliate name, `-` for none
    pub affiliate: String,
    /// The affiliate fee in basis points
    pub affiliate_bps: u64,
}

/// The fee breakdown attached to a quote
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteFees {
    /// The asset the fees are denominated in
    #[serde(default)]
    pub asset: String,
    /// The affiliate fee
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliate: Option<String>,
    /// The outbound fee
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outbound: Option<String>,
    /// The liquidity fee
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquidity: Option<String>,
    /// The total fee
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<String>,
    /// The slippage in basis points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slippage_bps: Option<i64>,
    /// The total fee in basis points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_bps: Option<i64>,
}

/// The response body of a swap quote request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteSwapResponse {
    /// The inbound vault address on the source chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inbound_address: Option<String>,
    /// The number of confirmation blocks required on the source chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inbound_confirmation_blocks: Option<u64>,
    /// The expected seconds of inbound confirmation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inbound_confirmation_seconds: Option<u64>,
    /// The number of blocks the outbound is delayed by
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outbound_delay_blocks: Option<u64>,
    /// The expected seconds of outbound delay
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outbound_delay_seconds: Option<u64>,
    /// The fee breakdown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fees: Option<QuoteFees>,
    /// The router contract on the source chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub router: Option<String>,
    /// The unix timestamp after which the quote is no longer honored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<u64>,
    /// A protocol warning attached to the quote
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Usage notes attached to the quote
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// The minimum inbound amount below which funds are lost
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dust_threshold: Option<String>,
    /// The recommended minimum input amount, in 8 decimal base units
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "option_u256_string_serialization"
    )]
    pub recommended_min_amount_in: Option<U256>,
    /// The recommended gas rate on the source chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_gas_rate: Option<String>,
    /// The units of the recommended gas rate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_rate_units: Option<String>,
    /// The memo to attach to the inbound deposit
    pub memo: String,
    /// The expected output, in 8 decimal base units
    #[serde(with = "u256_string_serialization")]
    pub expected_amount_out: U256,
    /// The maximum allowed streaming quantity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_streaming_quantity: Option<u64>,
    /// The number of blocks a streaming swap takes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streaming_swap_blocks: Option<u64>,
    /// The expected seconds a streaming swap takes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streaming_swap_seconds: Option<u64>,
    /// The total expected seconds from deposit to outbound
    #[serde(default)]
    pub total_swap_seconds: u64,
}
