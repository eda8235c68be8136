//! API types for the inbound addresses endpoint

use serde::{Deserialize, Serialize};

/// The route listing the inbound vaults of every connected chain
pub const INBOUND_ADDRESSES_ROUTE: &str = "/thorchain/inbound_addresses";

/// An inbound vault entry for a single chain
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundAddress {
    /// The chain symbol, e.g. `BASE`
    pub chain: String,
    /// The vault's public key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pub_key: Option<String>,
    /// The vault address deposits are credited to
    pub address: String,
    /// The router contract, only present on EVM chains
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub router: Option<String>,
    /// Whether the chain is halted
    #[serde(default)]
    pub halted: bool,
    /// Whether trading is paused on every chain
    #[serde(default)]
    pub global_trading_paused: bool,
    /// Whether trading is paused on this chain
    #[serde(default)]
    pub chain_trading_paused: bool,
    /// Whether liquidity actions are paused on this chain
    #[serde(default)]
    pub chain_lp_actions_paused: bool,
    /// The current gas rate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_rate: Option<String>,
    /// The units of the gas rate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_rate_units: Option<String>,
    /// The outbound fee charged on this chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outbound_fee: Option<String>,
    /// The minimum inbound amount below which funds are lost
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dust_threshold: Option<String>,
}

impl InboundAddress {
    /// Whether swaps into this chain's vault are currently rejected
    pub fn is_trading_halted(&self) -> bool {
        self.halted || self.global_trading_paused || self.chain_trading_paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test deserializing a list of inbound addresses
    #[test]
    fn test_deserialize_inbound_addresses() {
        let body = r#"[
            {"chain":"BTC","pub_key":"thorpub1","address":"bc1qvault","halted":false,
             "global_trading_paused":false,"chain_trading_paused":false,
             "chain_lp_actions_paused":false,"gas_rate":"5","gas_rate_units":"satsperbyte"},
            {"chain":"BASE","address":"0x1111111111111111111111111111111111111111",
             "router":"0x2222222222222222222222222222222222222222","halted":false,
             "chain_trading_paused":true}
        ]"#;

        let addrs: Vec<InboundAddress> = serde_json::from_str(body).unwrap();
        assert_eq!(addrs.len(), 2);
        assert!(addrs[0].router.is_none());
        assert!(!addrs[0].is_trading_halted());
        assert!(addrs[1].router.is_some());
        assert!(addrs[1].is_trading_halted());
    }
}
