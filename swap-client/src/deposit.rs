//! Deposits into the THORChain router
//!
//! A deposit is a single EIP-1559 `depositWithExpiry` call. Token deposits
//! carry the amount in calldata with zero value; native deposits use the
//! zero address as the asset, a zero amount, and carry the amount as value

use std::{sync::Arc, time::Duration};

use alloy::{network::TransactionBuilder, rpc::types::TransactionRequest};
use alloy_primitives::{Address, TxHash, U256};
use alloy_sol_types::SolCall;
use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::{
    assets::NATIVE_ASSET_ADDRESS,
    config::SwapClientConfig,
    error::SwapClientError,
    wallet::{abi::IThorRouter, apply_gas_buffer, TxReceipt, WalletClient},
};

/// The EIP-1559 transaction type
const EIP1559_TX_TYPE: u8 = 2;

// ---------
// | Types |
// ---------

/// The parameters of a router deposit
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionParams {
    /// The inbound vault credited with the deposit
    pub vault: Address,
    /// The router contract called
    pub router: Address,
    /// The deposited asset, the zero address for the native asset
    pub asset: Address,
    /// The token amount, zero on the native path
    pub amount: U256,
    /// The value sent, zero on the token path
    pub value: U256,
    /// The swap memo
    pub memo: String,
    /// The sender
    pub sender: Address,
}

impl TransactionParams {
    /// Build deposit parameters, routing the amount into calldata or value
    /// depending on the asset
    pub fn new(
        vault: Address,
        router: Address,
        asset: Address,
        amount: U256,
        memo: String,
        sender: Address,
    ) -> Self {
        let (amount, value) =
            if asset == NATIVE_ASSET_ADDRESS { (U256::ZERO, amount) } else { (amount, U256::ZERO) };
        Self { vault, router, asset, amount, value, memo, sender }
    }

    /// Whether the deposit is of the native asset
    pub fn is_native(&self) -> bool {
        self.asset == NATIVE_ASSET_ADDRESS
    }

    /// Check that every field a deposit needs is present
    pub fn validate(&self) -> Result<(), SwapClientError> {
        if self.vault.is_zero() {
            return Err(SwapClientError::validation("vault address is required"));
        }
        if self.router.is_zero() {
            return Err(SwapClientError::validation("router address is required"));
        }
        if self.sender.is_zero() {
            return Err(SwapClientError::validation("sender address is required"));
        }
        if self.memo.is_empty() {
            return Err(SwapClientError::validation("memo is required"));
        }

        let (applicable, other) =
            if self.is_native() { (self.value, self.amount) } else { (self.amount, self.value) };
        if applicable.is_zero() {
            return Err(SwapClientError::validation("deposit amount must be greater than 0"));
        }
        if !other.is_zero() {
            return Err(SwapClientError::validation(
                "native deposits carry value only, token deposits amount only",
            ));
        }

        Ok(())
    }
}

/// Progress of a deposit, reported as it happens
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DepositEvent {
    /// The transaction is about to be submitted
    Sending,
    /// The transaction was broadcast
    TransactionHash(TxHash),
    /// The transaction was mined successfully
    Receipt(TxReceipt),
}

// ------------
// | Executor |
// ------------

/// Builds and submits router deposits
#[derive(Clone)]
pub struct DepositExecutor {
    /// The wallet deposits are sent from
    wallet: Arc<dyn WalletClient>,
    /// How long a deposit remains valid once sent
    expiry: Duration,
    /// The buffer applied on top of gas estimates, in percent
    gas_buffer_percent: u64,
    /// The priority fee added on top of the base fee, in wei
    priority_fee_wei: u128,
}

impl DepositExecutor {
    /// Constructor
    pub fn new(wallet: Arc<dyn WalletClient>, config: &SwapClientConfig) -> Self {
        Self {
            wallet,
            expiry: config.deposit_expiry,
            gas_buffer_percent: config.gas_buffer_percent,
            priority_fee_wei: config.priority_fee_wei,
        }
    }

    /// Submit a deposit and wait for it to be mined
    ///
    /// `on_event` observes the submission, the hash once broadcast, and the
    /// receipt once mined. Failures are returned without retry
    #[instrument(skip_all, fields(router = %params.router, native = params.is_native()))]
    pub async fn execute<F>(
        &self,
        params: TransactionParams,
        mut on_event: F,
    ) -> Result<TxReceipt, SwapClientError>
    where
        F: FnMut(DepositEvent) + Send,
    {
        params.validate()?;

        let expiry = compute_expiry(Utc::now().timestamp(), self.expiry);
        let tx = build_deposit_tx(&params, expiry);

        let estimate = self.wallet.estimate_gas(tx.clone()).await.map_err(|e| {
            SwapClientError::deposit(format!("gas estimation failed: {}", e.message()))
        })?;
        let base_fee = self.wallet.gas_price().await.map_err(|e| {
            SwapClientError::deposit(format!("gas price lookup failed: {}", e.message()))
        })?;

        let gas_limit = apply_gas_buffer(estimate, self.gas_buffer_percent);
        let max_fee = compute_max_fee(base_fee, self.priority_fee_wei);
        let mut tx = tx
            .with_gas_limit(gas_limit)
            .with_max_fee_per_gas(max_fee)
            .with_max_priority_fee_per_gas(self.priority_fee_wei);
        tx.transaction_type = Some(EIP1559_TX_TYPE);

        info!("sending deposit: gas limit {gas_limit}, max fee {max_fee}, expiry {expiry}");
        on_event(DepositEvent::Sending);
        let tx_hash = self
            .wallet
            .send_transaction(tx)
            .await
            .map_err(|e| SwapClientError::deposit(e.message()))?;
        on_event(DepositEvent::TransactionHash(tx_hash));

        let receipt = self
            .wallet
            .wait_for_receipt(tx_hash)
            .await
            .map_err(|e| SwapClientError::deposit(e.message()))?;
        if !receipt.status {
            warn!("deposit tx ({:#x}) failed", tx_hash);
            return Err(SwapClientError::deposit(format!("deposit tx {tx_hash:#x} reverted")));
        }

        info!("deposit tx ({:#x}) confirmed", tx_hash);
        on_event(DepositEvent::Receipt(receipt.clone()));
        Ok(receipt)
    }
}

// -----------
// | Helpers |
// -----------

/// The unix timestamp a deposit expires at
pub fn compute_expiry(now: i64, lifetime: Duration) -> u64 {
    u64::try_from(now).unwrap_or_default().saturating_add(lifetime.as_secs())
}

/// The max fee per gas for a base fee and priority fee
pub fn compute_max_fee(base_fee: u128, priority_fee: u128) -> u128 {
    base_fee.saturating_add(priority_fee)
}

/// Build the unsigned `depositWithExpiry` transaction, without gas or fees
pub fn build_deposit_tx(params: &TransactionParams, expiry: u64) -> TransactionRequest {
    let calldata = IThorRouter::depositWithExpiryCall {
        vault: params.vault,
        asset: params.asset,
        amount: params.amount,
        memo: params.memo.clone(),
        expiry: U256::from(expiry),
    }
    .abi_encode();

    TransactionRequest::default()
        .with_from(params.sender)
        .with_to(params.router)
        .with_value(params.value)
        .with_input(calldata)
}
