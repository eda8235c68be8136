//! A wallet backed by an alloy provider and an optional local signer

use alloy::{
    providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use alloy_primitives::{Address, Bytes, TxHash};
use async_trait::async_trait;
use tracing::info;

use super::{TxReceipt, WalletClient};
use crate::error::SwapClientError;

/// A wallet that reads through an RPC provider and, when a signer is
/// configured, submits transactions signed by it
#[derive(Clone)]
pub struct ProviderWallet {
    /// The provider, with a wallet filler when a signer is configured
    provider: DynProvider,
    /// The signer's address
    address: Option<Address>,
}

impl ProviderWallet {
    /// Connect to an HTTP RPC endpoint
    ///
    /// Without a signer the wallet is read-only and reports no connected
    /// address
    pub fn new(rpc_url: &str, signer: Option<PrivateKeySigner>) -> Result<Self, SwapClientError> {
        let url: Url = rpc_url.parse().map_err(SwapClientError::parse)?;
        let Some(signer) = signer else {
            let provider = ProviderBuilder::new().connect_http(url);
            return Ok(Self { provider: DynProvider::new(provider), address: None });
        };

        let address = signer.address();
        let provider = ProviderBuilder::new().wallet(signer).connect_http(url);
        info!("connected wallet {address:#x}");
        Ok(Self { provider: DynProvider::new(provider), address: Some(address) })
    }
}

#[async_trait]
impl WalletClient for ProviderWallet {
    fn address(&self) -> Option<Address> {
        self.address
    }

    async fn call(&self, tx: TransactionRequest) -> Result<Bytes, SwapClientError> {
        self.provider.call(tx).await.map_err(SwapClientError::wallet)
    }

    async fn estimate_gas(&self, tx: TransactionRequest) -> Result<u64, SwapClientError> {
        self.provider.estimate_gas(tx).await.map_err(SwapClientError::wallet)
    }

    async fn gas_price(&self) -> Result<u128, SwapClientError> {
        self.provider.get_gas_price().await.map_err(SwapClientError::wallet)
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, SwapClientError> {
        if self.address.is_none() {
            return Err(SwapClientError::wallet("no signer configured"));
        }

        let pending = self.provider.send_transaction(tx).await.map_err(SwapClientError::wallet)?;
        Ok(pending.tx_hash().to_owned())
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt, SwapClientError> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .get_receipt()
            .await
            .map_err(SwapClientError::wallet)?;

        Ok(TxReceipt {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            status: receipt.status(),
        })
    }
}
