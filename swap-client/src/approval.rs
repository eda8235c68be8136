//! ERC-20 allowance management for the router

use std::sync::Arc;

use alloy::{network::TransactionBuilder, rpc::types::TransactionRequest};
use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use tracing::{info, instrument, warn};

use crate::{
    assets::NATIVE_ASSET_ADDRESS,
    error::SwapClientError,
    wallet::{abi::IERC20, apply_gas_buffer, TxReceipt, WalletClient},
};

/// The outcome of ensuring an allowance
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// The existing allowance already covers the amount; nothing was sent
    AlreadySufficient,
    /// An approval was mined
    Approved(TxReceipt),
}

/// An allowance the router needs before a token deposit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApprovalRequest {
    /// The token contract
    pub token: Address,
    /// The account granting the allowance
    pub owner: Address,
    /// The account being approved
    pub spender: Address,
    /// The amount required, in the token's native decimals
    pub amount: U256,
}

/// Ensures the router may spend the sender's tokens
#[derive(Clone)]
pub struct ApprovalManager {
    /// The wallet approvals are sent from
    wallet: Arc<dyn WalletClient>,
    /// The buffer applied on top of gas estimates, in percent
    gas_buffer_percent: u64,
}

impl ApprovalManager {
    /// Constructor
    pub fn new(wallet: Arc<dyn WalletClient>, gas_buffer_percent: u64) -> Self {
        Self { wallet, gas_buffer_percent }
    }

    /// Read the current allowance
    pub async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, SwapClientError> {
        let calldata = IERC20::allowanceCall { owner, spender }.abi_encode();
        let tx = TransactionRequest::default().with_to(token).with_input(calldata);

        let ret = self
            .wallet
            .call(tx)
            .await
            .map_err(|e| SwapClientError::approval(format!("allowance read failed: {}", e.message())))?;
        IERC20::allowanceCall::abi_decode_returns(&ret).map_err(SwapClientError::parse)
    }

    /// Approve the spender for the amount unless the existing allowance
    /// already covers it
    #[instrument(skip_all, fields(token = %request.token, spender = %request.spender))]
    pub async fn ensure_allowance(
        &self,
        request: ApprovalRequest,
    ) -> Result<ApprovalOutcome, SwapClientError> {
        let ApprovalRequest { token, owner, spender, amount } = request;
        if token == NATIVE_ASSET_ADDRESS {
            return Err(SwapClientError::validation("the native asset needs no approval"));
        }

        let allowance = self.allowance(token, owner, spender).await?;
        if allowance >= amount {
            info!("Already approved {allowance} for {amount}, skipping approval");
            return Ok(ApprovalOutcome::AlreadySufficient);
        }

        info!("Approving {amount} (current allowance {allowance})");
        let calldata = IERC20::approveCall { spender, amount }.abi_encode();
        let tx = TransactionRequest::default().with_from(owner).with_to(token).with_input(calldata);

        let estimate = self.wallet.estimate_gas(tx.clone()).await.map_err(|e| {
            SwapClientError::approval(format!("gas estimation failed: {}", e.message()))
        })?;
        let tx = tx.with_gas_limit(apply_gas_buffer(estimate, self.gas_buffer_percent));

        let tx_hash = self
            .wallet
            .send_transaction(tx)
            .await
            .map_err(|e| SwapClientError::approval(e.message()))?;
        let receipt = self
            .wallet
            .wait_for_receipt(tx_hash)
            .await
            .map_err(|e| SwapClientError::approval(e.message()))?;

        if !receipt.status {
            warn!("approval tx ({:#x}) failed", tx_hash);
            return Err(SwapClientError::approval(format!("approval tx {tx_hash:#x} reverted")));
        }

        info!("approval tx ({:#x}) confirmed", tx_hash);
        Ok(ApprovalOutcome::Approved(receipt))
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use super::*;
    use crate::{
        assets::SupportedAsset,
        test_helpers::{selector, MockWallet, WalletCall, MOCK_GAS_ESTIMATE},
    };

    /// The sender used across tests
    const OWNER: Address = address!("00000000000000000000000000000000000000aa");
    /// The router used across tests
    const ROUTER: Address = address!("00000000000000000000000000000000000000bb");

    /// An approval request for 1.5 USDC
    fn usdc_request() -> ApprovalRequest {
        ApprovalRequest {
            token: SupportedAsset::Usdc.address(),
            owner: OWNER,
            spender: ROUTER,
            amount: U256::from(1_500_000u64),
        }
    }

    /// Test that a sufficient allowance sends nothing
    #[tokio::test]
    async fn test_already_sufficient() {
        let wallet = Arc::new(MockWallet::new(OWNER).with_allowance(U256::from(2_000_000u64)));
        let manager = ApprovalManager::new(wallet.clone(), 20);

        let outcome = manager.ensure_allowance(usdc_request()).await.unwrap();
        assert_eq!(outcome, ApprovalOutcome::AlreadySufficient);
        assert!(wallet.sent().is_empty());
    }

    /// Test that approving twice only sends once
    #[tokio::test]
    async fn test_approval_is_idempotent() {
        let wallet = Arc::new(MockWallet::new(OWNER));
        let manager = ApprovalManager::new(wallet.clone(), 20);

        let first = manager.ensure_allowance(usdc_request()).await.unwrap();
        assert!(matches!(first, ApprovalOutcome::Approved(ref r) if r.status));
        assert_eq!(wallet.allowance(), U256::from(1_500_000u64));

        let second = manager.ensure_allowance(usdc_request()).await.unwrap();
        assert_eq!(second, ApprovalOutcome::AlreadySufficient);
        assert_eq!(wallet.sent().len(), 1);
    }

    /// Test the approval transaction's shape
    #[tokio::test]
    async fn test_approval_tx() {
        let wallet = Arc::new(MockWallet::new(OWNER).with_allowance(U256::from(1u64)));
        let manager = ApprovalManager::new(wallet.clone(), 20);
        let outcome = manager.ensure_allowance(usdc_request()).await.unwrap();
        let ApprovalOutcome::Approved(receipt) = outcome else { panic!("expected an approval") };

        let sent = wallet.sent();
        let tx = &sent[0];
        assert_eq!(selector(tx), Some(IERC20::approveCall::SELECTOR));
        assert_eq!(tx.to.and_then(|k| k.to().copied()), Some(SupportedAsset::Usdc.address()));
        assert_eq!(tx.from, Some(OWNER));
        assert_eq!(tx.gas, Some(MOCK_GAS_ESTIMATE * 120 / 100));

        let input = tx.input.input().unwrap();
        let call = IERC20::approveCall::abi_decode(input).unwrap();
        assert_eq!(call.spender, ROUTER);
        assert_eq!(call.amount, U256::from(1_500_000u64));

        // The receipt of the sent approval is awaited after the send
        let Some(WalletCall::WaitForReceipt(awaited)) = wallet.calls().last().cloned() else {
            panic!("expected a receipt lookup")
        };
        assert_eq!(awaited, receipt.transaction_hash);
    }

    /// Test the approval failure modes
    #[tokio::test]
    async fn test_approval_failures() {
        let wallets = [
            MockWallet::new(OWNER).failing_estimate(),
            MockWallet::new(OWNER).rejecting(),
            MockWallet::new(OWNER).reverting(),
        ];

        for wallet in wallets {
            let manager = ApprovalManager::new(Arc::new(wallet), 20);
            let err = manager.ensure_allowance(usdc_request()).await.unwrap_err();
            assert!(matches!(err, SwapClientError::Approval(_)), "{err}");
        }
    }

    /// Test that the native asset is refused
    #[tokio::test]
    async fn test_native_asset_refused() {
        let wallet = Arc::new(MockWallet::new(OWNER));
        let manager = ApprovalManager::new(wallet.clone(), 20);
        let request = ApprovalRequest { token: NATIVE_ASSET_ADDRESS, ..usdc_request() };

        assert!(manager.ensure_allowance(request).await.is_err());
        assert_eq!(wallet.erc20_call_count(), 0);
    }
}
