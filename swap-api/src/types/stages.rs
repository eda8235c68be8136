//! API types for the transaction stages endpoint
//!
//! Every stage is optional: THORNode omits a stage's key entirely until the
//! transaction reaches it

use serde::{Deserialize, Serialize};

/// The route prefix for transaction stages, followed by `/{settlement_id}`
pub const TX_STAGES_ROUTE: &str = "/thorchain/tx/stages";

/// Build the stages path for a settlement id
pub fn tx_stages_path(settlement_id: &str) -> String {
    format!("{TX_STAGES_ROUTE}/{settlement_id}")
}

/// The inbound observation stage
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundObservedStage {
    /// Whether observation has started
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started: Option<bool>,
    /// The number of nodes that observed the tx before confirmation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_confirmation_count: Option<u64>,
    /// The number of nodes that observed the tx after confirmation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_count: Option<u64>,
    /// Whether the stage is complete
    #[serde(default)]
    pub completed: bool,
}

/// The inbound confirmation counting stage
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundConfirmationCountedStage {
    /// The THORChain height at which counting started
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counting_start_height: Option<u64>,
    /// The source chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
    /// The source chain height the tx was observed at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_observed_height: Option<u64>,
    /// The source chain height at which the tx is considered confirmed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_confirmation_delay_height: Option<u64>,
    /// The estimated seconds until confirmation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_confirmation_seconds: Option<u64>,
    /// Whether the stage is complete
    #[serde(default)]
    pub completed: bool,
}

/// A stage carrying only a completion flag
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionStage {
    /// Whether the stage is complete
    #[serde(default)]
    pub completed: bool,
}

/// Streaming progress of a swap
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamingStatus {
    /// The number of blocks between sub-swaps
    #[serde(default)]
    pub interval: u64,
    /// The total number of sub-swaps
    #[serde(default)]
    pub quantity: u64,
    /// The number of sub-swaps executed so far
    #[serde(default)]
    pub count: u64,
}

/// The swap queue status
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapStatusStage {
    /// Whether the swap is still queued
    #[serde(default)]
    pub pending: bool,
    /// Streaming progress, if the swap streams
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streaming: Option<StreamingStatus>,
}

/// The outbound delay stage
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundDelayStage {
    /// The remaining blocks of delay
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_delay_blocks: Option<u64>,
    /// The remaining seconds of delay
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_delay_seconds: Option<u64>,
    /// Whether the stage is complete
    #[serde(default)]
    pub completed: bool,
}

/// The outbound signing stage
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundSignedStage {
    /// The height the outbound is scheduled for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_outbound_height: Option<u64>,
    /// The blocks elapsed since the outbound was scheduled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks_since_scheduled: Option<u64>,
    /// Whether the stage is complete
    #[serde(default)]
    pub completed: bool,
}

/// The response body of a transaction stages request
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxStagesResponse {
    /// Observation of the inbound tx
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inbound_observed: Option<InboundObservedStage>,
    /// Confirmation counting of the inbound tx
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inbound_confirmation_counted: Option<InboundConfirmationCountedStage>,
    /// Finalisation of the inbound tx
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inbound_finalised: Option<CompletionStage>,
    /// The swap queue status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swap_status: Option<SwapStatusStage>,
    /// Finalisation of the swap
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swap_finalised: Option<CompletionStage>,
    /// The outbound delay
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outbound_delay: Option<OutboundDelayStage>,
    /// Signing of the outbound tx
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outbound_signed: Option<OutboundSignedStage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test that a partially progressed response leaves later stages absent
    #[test]
    fn test_partial_stages() {
        let body = r#"{
            "inbound_observed": {"started": true, "pre_confirmation_count": 3, "final_count": 0, "completed": false}
        }"#;
        let resp: TxStagesResponse = serde_json::from_str(body).unwrap();

        let observed = resp.inbound_observed.unwrap();
        assert!(!observed.completed);
        assert_eq!(observed.pre_confirmation_count, Some(3));
        assert!(resp.inbound_confirmation_counted.is_none());
        assert!(resp.outbound_signed.is_none());
    }

    /// Test that a stage without a completion flag is treated as incomplete
    #[test]
    fn test_missing_completed_flag() {
        let body = r#"{"swap_status": {"pending": true}, "swap_finalised": {}}"#;
        let resp: TxStagesResponse = serde_json::from_str(body).unwrap();

        assert!(resp.swap_status.unwrap().pending);
        assert!(!resp.swap_finalised.unwrap().completed);
    }

    /// Test the stages path
    #[test]
    fn test_stages_path() {
        assert_eq!(tx_stages_path("ABCD"), "/thorchain/tx/stages/ABCD");
    }
}
