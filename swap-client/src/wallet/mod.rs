//! The wallet seam through which the swap client reads chain state and
//! submits transactions

use alloy::rpc::types::TransactionRequest;
use alloy_primitives::{Address, Bytes, TxHash};
use async_trait::async_trait;

use crate::error::SwapClientError;

pub mod abi;
pub mod provider;

/// The outcome of a mined transaction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxReceipt {
    /// The transaction hash
    pub transaction_hash: TxHash,
    /// The block the transaction was mined in
    pub block_number: Option<u64>,
    /// The gas consumed by the transaction
    pub gas_used: u64,
    /// Whether the transaction succeeded
    pub status: bool,
}

/// A connected wallet on the source chain
///
/// Implementations sign with whatever key the user has connected; the swap
/// client never handles key material directly
#[async_trait]
pub trait WalletClient: Send + Sync {
    /// The connected account, if any
    fn address(&self) -> Option<Address>;

    /// Execute a read-only call
    async fn call(&self, tx: TransactionRequest) -> Result<Bytes, SwapClientError>;

    /// Estimate the gas a transaction consumes
    async fn estimate_gas(&self, tx: TransactionRequest) -> Result<u64, SwapClientError>;

    /// The current gas price, used as the base fee
    async fn gas_price(&self) -> Result<u128, SwapClientError>;

    /// Sign and submit a transaction, returning its hash once broadcast
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, SwapClientError>;

    /// Wait for a submitted transaction to be mined
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt, SwapClientError>;
}

/// Apply a percentage buffer on top of a gas estimate
pub fn apply_gas_buffer(estimate: u64, buffer_percent: u64) -> u64 {
    estimate.saturating_mul(100 + buffer_percent) / 100
}
