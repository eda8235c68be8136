//! Configuration for the swap client

use std::time::Duration;

// -------------
// | Constants |
// -------------

/// The default THORNode endpoint, used for quotes and inbound addresses
pub const DEFAULT_THORNODE_URL: &str = "https://thornode.ninerealms.com";
/// The default low-latency mirror for the stages endpoint
pub const DEFAULT_STAGES_MIRROR_URL: &str = "https://gateway.liquify.com/chain/thorchain_api";
/// The default canonical endpoint for stages, tried after the mirror
pub const DEFAULT_STAGES_CANONICAL_URL: &str = DEFAULT_THORNODE_URL;
/// The chain symbol deposits are made from
pub const DEFAULT_CHAIN: &str = "BASE";

/// The default slippage tolerance, in basis points
pub const DEFAULT_SLIPPAGE_BPS: u64 = 300;
/// The default number of blocks between streaming sub-swaps
pub const DEFAULT_STREAMING_INTERVAL: u64 = 1;
/// The largest accepted slippage tolerance, in basis points
pub const MAX_SLIPPAGE_BPS: u64 = 2_000;
/// The largest accepted number of blocks between streaming sub-swaps
pub const MAX_STREAMING_INTERVAL: u64 = 10;
/// The default number of streaming sub-swaps, zero lets the protocol decide
pub const DEFAULT_STREAMING_QUANTITY: u64 = 0;
/// The default affiliate name, `-` for none
pub const DEFAULT_AFFILIATE: &str = "-";
/// The default affiliate fee in basis points
pub const DEFAULT_AFFILIATE_BPS: u64 = 8;

/// The default interval between status polls
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 6_000;
/// The default lifetime of a deposit before the router rejects it
pub const DEFAULT_DEPOSIT_EXPIRY_SECS: u64 = 60 * 60;
/// The default buffer applied on top of gas estimates, in percent
pub const DEFAULT_GAS_BUFFER_PERCENT: u64 = 20;
/// The default priority fee, 0.001 gwei
pub const DEFAULT_PRIORITY_FEE_WEI: u128 = 1_000_000;
/// The default delay before a balance refresh is published
pub const DEFAULT_BALANCE_REFRESH_DELAY_MS: u64 = 500;
/// The default timeout on THORNode requests
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

// ----------
// | Config |
// ----------

/// The configuration options for the swap client
#[derive(Debug, Clone)]
pub struct SwapClientConfig {
    /// The THORNode endpoint used for quotes and inbound addresses
    pub thornode_url: String,
    /// The mirror endpoint tried first for transaction stages
    pub stages_mirror_url: String,
    /// The canonical endpoint tried when the mirror fails
    pub stages_canonical_url: String,
    /// The chain symbol deposits are made from
    pub chain: String,
    /// The number of streaming sub-swaps requested in quotes
    pub streaming_quantity: u64,
    /// The affiliate name attached to quotes
    pub affiliate: String,
    /// The affiliate fee attached to quotes, in basis points
    pub affiliate_bps: u64,
    /// The interval between status polls
    pub poll_interval: Duration,
    /// How long a deposit remains valid once sent
    pub deposit_expiry: Duration,
    /// The buffer applied on top of gas estimates, in percent
    pub gas_buffer_percent: u64,
    /// The priority fee added on top of the base fee, in wei
    pub priority_fee_wei: u128,
    /// The delay before a balance refresh is published
    pub balance_refresh_delay: Duration,
    /// The timeout on THORNode requests
    pub http_timeout: Duration,
}

impl Default for SwapClientConfig {
    fn default() -> Self {
        Self {
            thornode_url: DEFAULT_THORNODE_URL.to_string(),
            stages_mirror_url: DEFAULT_STAGES_MIRROR_URL.to_string(),
            stages_canonical_url: DEFAULT_STAGES_CANONICAL_URL.to_string(),
            chain: DEFAULT_CHAIN.to_string(),
            streaming_quantity: DEFAULT_STREAMING_QUANTITY,
            affiliate: DEFAULT_AFFILIATE.to_string(),
            affiliate_bps: DEFAULT_AFFILIATE_BPS,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            deposit_expiry: Duration::from_secs(DEFAULT_DEPOSIT_EXPIRY_SECS),
            gas_buffer_percent: DEFAULT_GAS_BUFFER_PERCENT,
            priority_fee_wei: DEFAULT_PRIORITY_FEE_WEI,
            balance_refresh_delay: Duration::from_millis(DEFAULT_BALANCE_REFRESH_DELAY_MS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}
