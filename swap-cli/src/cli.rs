//! CLI argument definition & parsing for the swap driver

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use swap_client::{
    assets::{SupportedAsset, BTC_ASSET},
    config::{
        DEFAULT_AFFILIATE, DEFAULT_AFFILIATE_BPS, DEFAULT_BALANCE_REFRESH_DELAY_MS, DEFAULT_CHAIN,
        DEFAULT_DEPOSIT_EXPIRY_SECS, DEFAULT_GAS_BUFFER_PERCENT, DEFAULT_HTTP_TIMEOUT_SECS,
        DEFAULT_POLL_INTERVAL_MS, DEFAULT_PRIORITY_FEE_WEI, DEFAULT_SLIPPAGE_BPS,
        DEFAULT_STAGES_CANONICAL_URL, DEFAULT_STAGES_MIRROR_URL, DEFAULT_STREAMING_INTERVAL,
        DEFAULT_STREAMING_QUANTITY, DEFAULT_THORNODE_URL, MAX_SLIPPAGE_BPS, MAX_STREAMING_INTERVAL,
    },
    thornode::quote::QuoteRequest,
    SwapClientConfig,
};

/// The maximum affiliate fee in basis points
const MAX_AFFILIATE_BPS: u64 = 10_000;

/// The cli for the swap driver
#[rustfmt::skip]
#[derive(Parser)]
#[clap(about = "Swap assets on Base into THORChain")]
pub struct Cli {
    // --- THORNode Config --- //

    /// The THORNode endpoint used for quotes and inbound addresses
    #[clap(long, env = "THORNODE_URL", default_value = DEFAULT_THORNODE_URL)]
    pub thornode_url: String,
    /// The mirror queried first for settlement stages
    #[clap(long, env = "STAGES_MIRROR_URL", default_value = DEFAULT_STAGES_MIRROR_URL)]
    pub stages_mirror_url: String,
    /// The canonical THORNode queried when the mirror fails
    #[clap(long, env = "STAGES_CANONICAL_URL", default_value = DEFAULT_STAGES_CANONICAL_URL)]
    pub stages_canonical_url: String,
    /// The THORChain symbol of the source chain
    #[clap(long, env = "SWAP_CHAIN", default_value = DEFAULT_CHAIN)]
    pub chain: String,
    /// The timeout applied to THORNode requests, in seconds
    #[clap(long, env = "HTTP_TIMEOUT_SECS", default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    pub http_timeout_secs: u64,

    // --- Quote Params --- //

    /// The number of streaming sub-swaps, zero lets the protocol decide
    #[clap(long, env = "STREAMING_QUANTITY", default_value_t = DEFAULT_STREAMING_QUANTITY)]
    pub streaming_quantity: u64,
    /// The affiliate attached to quotes
    #[clap(long, env = "AFFILIATE", default_value = DEFAULT_AFFILIATE)]
    pub affiliate: String,
    /// The affiliate fee in basis points
    #[clap(long, env = "AFFILIATE_BPS", default_value_t = DEFAULT_AFFILIATE_BPS)]
    pub affiliate_bps: u64,

    // --- Transaction Params --- //

    /// The seconds until a deposit expires
    #[clap(long, env = "DEPOSIT_EXPIRY_SECS", default_value_t = DEFAULT_DEPOSIT_EXPIRY_SECS)]
    pub deposit_expiry_secs: u64,
    /// The buffer added to gas estimates, in percent
    #[clap(long, env = "GAS_BUFFER_PERCENT", default_value_t = DEFAULT_GAS_BUFFER_PERCENT)]
    pub gas_buffer_percent: u64,
    /// The priority fee added to the gas price, in wei
    #[clap(long, env = "PRIORITY_FEE_WEI", default_value_t = DEFAULT_PRIORITY_FEE_WEI)]
    pub priority_fee_wei: u128,

    // --- Tracking --- //

    /// The interval between settlement polls, in milliseconds
    #[clap(long, env = "POLL_INTERVAL_MS", default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    pub poll_interval_ms: u64,
    /// The delay before balances are refreshed after a transaction, in
    /// milliseconds
    #[clap(long, env = "BALANCE_REFRESH_DELAY_MS", default_value_t = DEFAULT_BALANCE_REFRESH_DELAY_MS)]
    pub balance_refresh_delay_ms: u64,

    // --- Telemetry --- //

    /// Whether to emit JSON formatted logs
    #[clap(long, env = "JSON_LOGS", default_value = "false")]
    pub json_logs: bool,

    /// The command to run
    #[clap(subcommand)]
    pub command: Command,
}

/// The commands of the swap driver
#[derive(Subcommand)]
pub enum Command {
    /// Fetch a slippage-protected quote
    Quote(QuoteArgs),
    /// Quote and execute a swap, then track it to settlement
    Swap(SwapArgs),
    /// Track an existing settlement
    Track(TrackArgs),
    /// List the inbound addresses of every chain
    Inbound,
}

/// The inputs of a quote
#[rustfmt::skip]
#[derive(Args)]
pub struct QuoteArgs {
    /// The amount to swap, as a decimal in units of the source asset
    #[clap(long)]
    pub amount: String,
    /// The source asset: ETH, USDC or cbBTC
    #[clap(long, default_value = "ETH")]
    pub from: SupportedAsset,
    /// The THORChain identifier of the destination asset
    #[clap(long, default_value = BTC_ASSET)]
    pub to: String,
    /// The address receiving the destination asset
    #[clap(long, env = "DESTINATION_ADDRESS")]
    pub destination: String,
    /// The slippage tolerance in basis points
    #[clap(long, default_value_t = DEFAULT_SLIPPAGE_BPS)]
    pub slippage_bps: u64,
    /// The streaming interval in blocks
    #[clap(long, default_value_t = DEFAULT_STREAMING_INTERVAL)]
    pub streaming_interval: u64,
}

impl QuoteArgs {
    /// Build the quote request
    pub fn to_request(&self) -> QuoteRequest {
        QuoteRequest::new(&self.amount, self.from, &self.destination)
            .with_to_asset(&self.to)
            .with_slippage_bps(self.slippage_bps)
            .with_streaming_interval(self.streaming_interval)
    }
}

/// The inputs of a swap
#[rustfmt::skip]
#[derive(Args)]
pub struct SwapArgs {
    /// The quote to execute
    #[clap(flatten)]
    pub quote: QuoteArgs,
    /// The RPC url of the Base node
    #[clap(long, env = "RPC_URL")]
    pub rpc_url: String,
    /// The private key signing the approval and deposit
    #[clap(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,
}

/// The inputs of a tracking session
#[derive(Args)]
pub struct TrackArgs {
    /// The deposit transaction hash or settlement id
    pub id: String,
    /// The estimated seconds remaining, used for the countdown
    #[clap(long, default_value_t = 0)]
    pub estimated_seconds: u64,
}

impl Cli {
    /// Validate the CLI arguments
    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval_ms == 0 {
            return Err("--poll-interval-ms must be greater than 0".to_string());
        }

        if self.affiliate_bps > MAX_AFFILIATE_BPS {
            return Err("--affiliate-bps must be at most 10000".to_string());
        }

        let quote = match &self.command {
            Command::Quote(args) => Some(args),
            Command::Swap(args) => Some(&args.quote),
            Command::Track(_) | Command::Inbound => None,
        };
        if let Some(args) = quote {
            if args.slippage_bps > MAX_SLIPPAGE_BPS {
                return Err(format!("--slippage-bps must be at most {MAX_SLIPPAGE_BPS}"));
            }
            if !(1..=MAX_STREAMING_INTERVAL).contains(&args.streaming_interval) {
                return Err(format!(
                    "--streaming-interval must be between 1 and {MAX_STREAMING_INTERVAL}"
                ));
            }
        }

        Ok(())
    }

    /// Build the swap client's configuration
    pub fn client_config(&self) -> SwapClientConfig {
        SwapClientConfig {
            thornode_url: self.thornode_url.clone(),
            stages_mirror_url: self.stages_mirror_url.clone(),
            stages_canonical_url: self.stages_canonical_url.clone(),
            chain: self.chain.clone(),
            streaming_quantity: self.streaming_quantity,
            affiliate: self.affiliate.clone(),
            affiliate_bps: self.affiliate_bps,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            deposit_expiry: Duration::from_secs(self.deposit_expiry_secs),
            gas_buffer_percent: self.gas_buffer_percent,
            priority_fee_wei: self.priority_fee_wei,
            balance_refresh_delay: Duration::from_millis(self.balance_refresh_delay_ms),
            http_timeout: Duration::from_secs(self.http_timeout_secs),
        }
    }
}
