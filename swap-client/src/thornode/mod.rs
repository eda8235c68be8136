//! A client for the THORNode REST API
//!
//! Quotes and inbound addresses are served by the configured THORNode
//! endpoint; transaction stages are fetched from a low-latency mirror first
//! and from the canonical endpoint on failure

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::{config::SwapClientConfig, error::SwapClientError};

pub mod inbound;
pub mod quote;
pub mod stages;

/// The quote parameters taken from configuration rather than user input
#[derive(Debug, Clone)]
struct QuoteSettings {
    /// The number of streaming sub-swaps
    streaming_quantity: u64,
    /// The affiliate name
    affiliate: String,
    /// The affiliate fee in basis points
    affiliate_bps: u64,
}

/// A client for the THORNode REST API
#[derive(Debug, Clone)]
pub struct ThornodeClient {
    /// The endpoint serving quotes and inbound addresses
    thornode_url: String,
    /// The mirror endpoint tried first for transaction stages
    stages_mirror_url: String,
    /// The canonical endpoint for transaction stages
    stages_canonical_url: String,
    /// The quote parameters taken from configuration
    quote_settings: QuoteSettings,
    /// The shared HTTP client
    http_client: Client,
}

impl ThornodeClient {
    /// Create a new client from the swap client's configuration
    pub fn new(config: &SwapClientConfig) -> Result<Self, SwapClientError> {
        let http_client =
            Client::builder().timeout(config.http_timeout).build().map_err(SwapClientError::http)?;

        Ok(Self {
            thornode_url: config.thornode_url.clone(),
            stages_mirror_url: config.stages_mirror_url.clone(),
            stages_canonical_url: config.stages_canonical_url.clone(),
            quote_settings: QuoteSettings {
                streaming_quantity: config.streaming_quantity,
                affiliate: config.affiliate.clone(),
                affiliate_bps: config.affiliate_bps,
            },
            http_client,
        })
    }

    /// Join a base url and a route
    fn build_url(base_url: &str, route: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), route)
    }

    /// Send a GET request and deserialize the response body
    async fn send_get_request<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, SwapClientError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SwapClientError::http(format!("Status {}: {}", status, message)));
        }

        response.json::<T>().await.map_err(SwapClientError::parse)
    }
}
