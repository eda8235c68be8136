//! Inbound vault and router resolution

use std::str::FromStr;

use alloy_primitives::Address;
use swap_api::inbound::{InboundAddress, INBOUND_ADDRESSES_ROUTE};
use tracing::{info, instrument};

use super::ThornodeClient;
use crate::error::SwapClientError;

/// The vault and router a deposit must target on a chain
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainMetadata {
    /// The inbound vault address
    pub vault: Address,
    /// The router contract
    pub router: Address,
}

impl ThornodeClient {
    /// Fetch the inbound addresses of every connected chain
    pub async fn get_inbound_addresses(&self) -> Result<Vec<InboundAddress>, SwapClientError> {
        let url = Self::build_url(&self.thornode_url, INBOUND_ADDRESSES_ROUTE);
        self.send_get_request(self.http_client.get(url))
            .await
            .map_err(|e| SwapClientError::metadata(e.message()))
    }

    /// Resolve the vault and router for a chain
    ///
    /// Never cached: vaults rotate, so every swap resolves them afresh
    #[instrument(skip(self))]
    pub async fn get_chain_metadata(&self, chain: &str) -> Result<ChainMetadata, SwapClientError> {
        let addresses = self.get_inbound_addresses().await?;
        let metadata = select_chain_metadata(&addresses, chain)?;
        info!("resolved vault {:#x} and router {:#x}", metadata.vault, metadata.router);
        Ok(metadata)
    }
}

/// Select a chain's vault and router from a list of inbound addresses
pub fn select_chain_metadata(
    addresses: &[InboundAddress],
    chain: &str,
) -> Result<ChainMetadata, SwapClientError> {
    let entry = addresses
        .iter()
        .find(|a| a.chain.eq_ignore_ascii_case(chain))
        .ok_or_else(|| SwapClientError::metadata(format!("{chain} inbound address not found")))?;

    if entry.is_trading_halted() {
        return Err(SwapClientError::chain_halted(format!(
            "trading is halted or paused on {chain}"
        )));
    }

    let router = entry
        .router
        .as_deref()
        .ok_or_else(|| SwapClientError::metadata(format!("{chain} router address not found")))?;

    let vault = Address::from_str(&entry.address).map_err(|e| {
        SwapClientError::metadata(format!("invalid {chain} vault address {}: {e}", entry.address))
    })?;
    let router = Address::from_str(router).map_err(|e| {
        SwapClientError::metadata(format!("invalid {chain} router address {router}: {e}"))
    })?;

    Ok(ChainMetadata { vault, router })
}
