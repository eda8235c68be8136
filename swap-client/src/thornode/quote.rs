//! Swap quotes and the slippage-adjusted memo

use alloy_primitives::U256;
use swap_api::quote::{QuoteFees, QuoteSwapParams, QuoteSwapResponse, QUOTE_SWAP_ROUTE};
use tracing::{info, instrument, warn};

use super::ThornodeClient;
use crate::{
    assets::{parse_base_units, SupportedAsset, BTC_ASSET},
    config::{
        DEFAULT_SLIPPAGE_BPS, DEFAULT_STREAMING_INTERVAL, MAX_SLIPPAGE_BPS, MAX_STREAMING_INTERVAL,
    },
    error::SwapClientError,
};

/// The basis point denominator
const BPS_DENOMINATOR: u64 = 10_000;

// ---------
// | Types |
// ---------

/// A request for a swap quote
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuoteRequest {
    /// The input amount as a human-readable decimal string
    pub amount: String,
    /// The source asset on Base
    pub from_asset: SupportedAsset,
    /// The THORChain identifier of the destination asset
    pub to_asset: String,
    /// The address that receives the output
    pub destination: String,
    /// The slippage tolerance, in basis points
    pub slippage_bps: u64,
    /// The number of blocks between streaming sub-swaps
    pub streaming_interval: u64,
}

impl QuoteRequest {
    /// Create a request into BTC with the default slippage and streaming
    /// interval
    pub fn new(amount: &str, from_asset: SupportedAsset, destination: &str) -> Self {
        Self {
            amount: amount.to_string(),
            from_asset,
            to_asset: BTC_ASSET.to_string(),
            destination: destination.to_string(),
            slippage_bps: DEFAULT_SLIPPAGE_BPS,
            streaming_interval: DEFAULT_STREAMING_INTERVAL,
        }
    }

    /// Set the destination asset
    pub fn with_to_asset(mut self, to_asset: &str) -> Self {
        self.to_asset = to_asset.to_string();
        self
    }

    /// Set the slippage tolerance
    pub fn with_slippage_bps(mut self, slippage_bps: u64) -> Self {
        self.slippage_bps = slippage_bps;
        self
    }

    /// Set the streaming interval
    pub fn with_streaming_interval(mut self, streaming_interval: u64) -> Self {
        self.streaming_interval = streaming_interval;
        self
    }

    /// Validate the request, returning the input amount in base units
    pub fn validate(&self) -> Result<U256, SwapClientError> {
        let amount = parse_base_units(&self.amount)?;
        if self.destination.trim().is_empty() {
            return Err(SwapClientError::validation("destination address is required"));
        }
        if self.to_asset.trim().is_empty() {
            return Err(SwapClientError::validation("destination asset is required"));
        }
        if self.slippage_bps > MAX_SLIPPAGE_BPS {
            return Err(SwapClientError::validation(format!(
                "slippage of {} bps exceeds {MAX_SLIPPAGE_BPS} bps",
                self.slippage_bps
            )));
        }
        if !(1..=MAX_STREAMING_INTERVAL).contains(&self.streaming_interval) {
            return Err(SwapClientError::validation(format!(
                "streaming interval must be between 1 and {MAX_STREAMING_INTERVAL} blocks"
            )));
        }

        Ok(amount)
    }
}

/// A swap quote with its memo adjusted for the requested slippage
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Quote {
    /// The source asset the quote was issued for
    pub from_asset: SupportedAsset,
    /// The destination asset the quote was issued for
    pub to_asset: String,
    /// The destination address the quote was issued for
    pub destination: String,
    /// The input amount, in 8 decimal base units
    pub input_amount: U256,
    /// The expected output, in 8 decimal base units
    pub expected_amount_out: U256,
    /// The minimum output encoded into the memo
    pub min_amount_out: U256,
    /// The memo to attach to the deposit, with the price limit applied
    pub memo: String,
    /// The total expected seconds from deposit to outbound
    pub total_swap_seconds: u64,
    /// The unix timestamp after which the protocol no longer honors the quote
    pub expiry: Option<u64>,
    /// The fee breakdown
    pub fees: Option<QuoteFees>,
    /// The recommended minimum input, in 8 decimal base units
    pub recommended_min_amount_in: Option<U256>,
    /// The expected seconds of inbound confirmation
    pub inbound_confirmation_seconds: Option<u64>,
    /// The expected seconds of outbound delay
    pub outbound_delay_seconds: Option<u64>,
    /// A protocol warning attached to the quote
    pub warning: Option<String>,
    /// Usage notes attached to the quote
    pub notes: Option<String>,
}

impl Quote {
    /// Build a quote from a THORNode response
    fn from_response(
        request: &QuoteRequest,
        input_amount: U256,
        resp: QuoteSwapResponse,
    ) -> Self {
        let min_amount_out = calculate_min_output(resp.expected_amount_out, request.slippage_bps);
        let memo =
            update_memo_with_price_limit(&resp.memo, resp.expected_amount_out, request.slippage_bps);

        Self {
            from_asset: request.from_asset,
            to_asset: request.to_asset.clone(),
            destination: request.destination.clone(),
            input_amount,
            expected_amount_out: resp.expected_amount_out,
            min_amount_out,
            memo,
            total_swap_seconds: resp.total_swap_seconds,
            expiry: resp.expiry,
            fees: resp.fees,
            recommended_min_amount_in: resp.recommended_min_amount_in,
            inbound_confirmation_seconds: resp.inbound_confirmation_seconds,
            outbound_delay_seconds: resp.outbound_delay_seconds,
            warning: resp.warning,
            notes: resp.notes,
        }
    }

    /// Whether the protocol expiry has passed at the given unix timestamp
    pub fn is_expired(&self, now: u64) -> bool {
        self.expiry.is_some_and(|expiry| now >= expiry)
    }
}

// ------------------
// | Memo Utilities |
// ------------------

/// Compute the minimum acceptable output for a slippage tolerance
///
/// `floor(((10000 - slippage_bps) * expected) / 10000)`
pub fn calculate_min_output(expected: U256, slippage_bps: u64) -> U256 {
    let retained = U256::from(BPS_DENOMINATOR.saturating_sub(slippage_bps));
    retained * expected / U256::from(BPS_DENOMINATOR)
}

/// Replace the limit in a swap memo with the slippage-adjusted minimum output
///
/// The limit is the run of digits immediately preceding the first `/`. A memo
/// without such a run is returned unchanged
pub fn update_memo_with_price_limit(memo: &str, expected: U256, slippage_bps: u64) -> String {
    let Some(slash_idx) = memo.find('/') else {
        warn!("memo has no streaming suffix, leaving price limit unset: {memo}");
        return memo.to_string();
    };

    let prefix = &memo[..slash_idx];
    let limit_start = prefix.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if limit_start == slash_idx {
        warn!("memo has no price limit before its streaming suffix, leaving it unchanged: {memo}");
        return memo.to_string();
    }

    let limit = calculate_min_output(expected, slippage_bps);
    format!("{}{}{}", &memo[..limit_start], limit, &memo[slash_idx..])
}

// ----------
// | Client |
// ----------

impl ThornodeClient {
    /// Fetch a swap quote and apply the slippage limit to its memo
    #[instrument(skip_all, fields(from = %request.from_asset, to = %request.to_asset))]
    pub async fn get_swap_quote(&self, request: &QuoteRequest) -> Result<Quote, SwapClientError> {
        let amount = request.validate()?;
        let params = QuoteSwapParams {
            amount,
            from_asset: request.from_asset.thorchain_id(),
            to_asset: request.to_asset.clone(),
            destination: request.destination.trim().to_string(),
            streaming_interval: request.streaming_interval,
            streaming_quantity: self.quote_settings.streaming_quantity,
            affiliate: self.quote_settings.affiliate.clone(),
            affiliate_bps: self.quote_settings.affiliate_bps,
        };

        let url = Self::build_url(&self.thornode_url, QUOTE_SWAP_ROUTE);
        let request_builder = self.http_client.get(url).query(&params);
        let resp: QuoteSwapResponse = self
            .send_get_request(request_builder)
            .await
            .map_err(|e| SwapClientError::quote_fetch(e.message()))?;

        let quote = Quote::from_response(request, amount, resp);
        info!(
            "received quote: expected out {}, min out {}, ~{}s",
            quote.expected_amount_out, quote.min_amount_out, quote.total_swap_seconds
        );
        Ok(quote)
    }
}
