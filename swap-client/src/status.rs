//! The settlement stage state machine
//!
//! A settlement moves through five ordered stages. Each stage is either not
//! yet reached (absent from the API response), in progress (present but not
//! completed) or completed. The settlement is terminal only once the
//! outbound is signed

use std::fmt;

use swap_api::stages::TxStagesResponse;

/// The ordered stages of a settlement
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SwapStage {
    /// The inbound tx has been observed by THORChain
    InboundObserved,
    /// The inbound tx's confirmations are being counted
    InboundConfirmationCounted,
    /// The inbound tx is final
    InboundFinalised,
    /// The swap has executed
    SwapFinalised,
    /// The outbound tx has been signed
    OutboundSigned,
}

impl SwapStage {
    /// Every stage, in order
    pub const ALL: [SwapStage; 5] = [
        SwapStage::InboundObserved,
        SwapStage::InboundConfirmationCounted,
        SwapStage::InboundFinalised,
        SwapStage::SwapFinalised,
        SwapStage::OutboundSigned,
    ];

    /// The stage following this one
    pub fn next(self) -> Option<SwapStage> {
        match self {
            SwapStage::InboundObserved => Some(SwapStage::InboundConfirmationCounted),
            SwapStage::InboundConfirmationCounted => Some(SwapStage::InboundFinalised),
            SwapStage::InboundFinalised => Some(SwapStage::SwapFinalised),
            SwapStage::SwapFinalised => Some(SwapStage::OutboundSigned),
            SwapStage::OutboundSigned => None,
        }
    }

    /// A short label for the stage
    pub fn label(self) -> &'static str {
        match self {
            SwapStage::InboundObserved => "Inbound Observed",
            SwapStage::InboundConfirmationCounted => "Confirmation Counts",
            SwapStage::InboundFinalised => "Inbound Finalised",
            SwapStage::SwapFinalised => "Swap Finalised",
            SwapStage::OutboundSigned => "Outbound Signed",
        }
    }

    /// The message shown while waiting for the stage to start
    fn awaiting_message(self) -> &'static str {
        match self {
            SwapStage::InboundObserved => "Awaiting observation",
            SwapStage::InboundConfirmationCounted => "Awaiting confirmation counts",
            SwapStage::InboundFinalised => "Awaiting inbound finalisation",
            SwapStage::SwapFinalised => "Awaiting swap",
            SwapStage::OutboundSigned => "Swap completed, awaiting outbound",
        }
    }

    /// The message shown while the stage is in progress
    fn in_progress_message(self) -> &'static str {
        match self {
            SwapStage::InboundObserved => "Inbound observation in progress",
            SwapStage::InboundConfirmationCounted => "Confirmation counting in progress",
            SwapStage::InboundFinalised => "Inbound finalisation in progress",
            SwapStage::SwapFinalised => "Swap in progress",
            SwapStage::OutboundSigned => "Outbound signing in progress",
        }
    }
}

/// The progress of a single stage
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageProgress {
    /// The stage is absent from the response
    NotReached,
    /// The stage is present but not completed
    InProgress,
    /// The stage is completed
    Completed,
}

impl StageProgress {
    /// Derive progress from an optional stage's completion flag
    fn from_completion(completed: Option<bool>) -> Self {
        match completed {
            None => StageProgress::NotReached,
            Some(false) => StageProgress::InProgress,
            Some(true) => StageProgress::Completed,
        }
    }
}

/// The phase of a settlement, derived from its deepest present stage
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapPhase {
    /// No stage has been reached yet
    Initializing,
    /// The deepest present stage is in progress
    InProgress(SwapStage),
    /// The deepest present stage completed, the given stage is next
    Awaiting(SwapStage),
    /// The outbound is signed
    Completed,
}

impl SwapPhase {
    /// The human-readable message for the phase
    pub fn message(&self) -> &'static str {
        match self {
            SwapPhase::Initializing => "Initializing",
            SwapPhase::InProgress(stage) => stage.in_progress_message(),
            SwapPhase::Awaiting(stage) => stage.awaiting_message(),
            SwapPhase::Completed => "Swap completed successfully",
        }
    }
}

impl fmt::Display for SwapPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A snapshot of a settlement's stages, replaced wholesale on every poll
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SwapStageStatus {
    /// The raw stages response
    stages: TxStagesResponse,
}

impl From<TxStagesResponse> for SwapStageStatus {
    fn from(stages: TxStagesResponse) -> Self {
        Self { stages }
    }
}

impl SwapStageStatus {
    /// The raw stages response
    pub fn stages(&self) -> &TxStagesResponse {
        &self.stages
    }

    /// The progress of a stage
    pub fn progress(&self, stage: SwapStage) -> StageProgress {
        let s = &self.stages;
        let completed = match stage {
            SwapStage::InboundObserved => s.inbound_observed.as_ref().map(|st| st.completed),
            SwapStage::InboundConfirmationCounted => {
                s.inbound_confirmation_counted.as_ref().map(|st| st.completed)
            },
            SwapStage::InboundFinalised => s.inbound_finalised.as_ref().map(|st| st.completed),
            SwapStage::SwapFinalised => s.swap_finalised.as_ref().map(|st| st.completed),
            SwapStage::OutboundSigned => s.outbound_signed.as_ref().map(|st| st.completed),
        };

        StageProgress::from_completion(completed)
    }

    /// Whether the settlement is terminal
    ///
    /// Only a completed outbound signature is terminal; the completion of
    /// any earlier stage is not
    pub fn is_complete(&self) -> bool {
        self.progress(SwapStage::OutboundSigned) == StageProgress::Completed
    }

    /// The current phase of the settlement
    pub fn phase(&self) -> SwapPhase {
        if self.is_complete() {
            return SwapPhase::Completed;
        }

        let deepest = SwapStage::ALL
            .into_iter()
            .rev()
            .find_map(|stage| match self.progress(stage) {
                StageProgress::NotReached => None,
                progress => Some((stage, progress)),
            });

        match deepest {
            None => SwapPhase::Initializing,
            Some((stage, StageProgress::InProgress)) => SwapPhase::InProgress(stage),
            Some((stage, _)) => match stage.next() {
                Some(next) => SwapPhase::Awaiting(next),
                None => SwapPhase::Completed,
            },
        }
    }

    /// The estimated seconds until inbound confirmation, while counting
    pub fn remaining_confirmation_seconds(&self) -> Option<u64> {
        self.stages
            .inbound_confirmation_counted
            .as_ref()
            .filter(|st| !st.completed)
            .and_then(|st| st.remaining_confirmation_seconds)
    }

    /// The streaming progress as `(count, quantity)`, if the swap streams
    pub fn streaming_progress(&self) -> Option<(u64, u64)> {
        let streaming = self.stages.swap_status.as_ref()?.streaming.as_ref()?;
        Some((streaming.count, streaming.quantity))
    }
}

#[cfg(test)]
mod tests {
    use swap_api::stages::{
        CompletionStage, InboundConfirmationCountedStage, InboundObservedStage,
        OutboundSignedStage,
    };

    use super::*;

    /// Build a status from a JSON body
    fn status(body: &str) -> SwapStageStatus {
        serde_json::from_str::<TxStagesResponse>(body).unwrap().into()
    }

    /// Test that absent and incomplete stages are distinguished
    #[test]
    fn test_stage_presence_vs_completion() {
        let status = SwapStageStatus::from(TxStagesResponse {
            inbound_observed: Some(InboundObservedStage { completed: false, ..Default::default() }),
            ..Default::default()
        });

        assert_eq!(status.progress(SwapStage::InboundObserved), StageProgress::InProgress);
        assert_eq!(
            status.progress(SwapStage::InboundConfirmationCounted),
            StageProgress::NotReached
        );
        assert_eq!(status.phase(), SwapPhase::InProgress(SwapStage::InboundObserved));
        assert_eq!(status.phase().message(), "Inbound observation in progress");
    }

    /// Test that no stages means initializing
    #[test]
    fn test_initializing() {
        let status = SwapStageStatus::default();
        assert_eq!(status.phase(), SwapPhase::Initializing);
        assert_eq!(status.phase().to_string(), "Initializing");
        assert!(!status.is_complete());
    }

    /// Test that a completed stage awaits the next one
    #[test]
    fn test_awaiting_next_stage() {
        let status = status(
            r#"{"inbound_observed":{"completed":true},
                "inbound_confirmation_counted":{"completed":true},
                "inbound_finalised":{"completed":true}}"#,
        );
        assert_eq!(status.phase(), SwapPhase::Awaiting(SwapStage::SwapFinalised));
        assert_eq!(status.phase().message(), "Awaiting swap");
    }

    /// Test that a completed swap awaits the outbound
    #[test]
    fn test_swap_finalised_awaits_outbound() {
        let status = status(r#"{"swap_finalised":{"completed":true}}"#);
        assert_eq!(status.phase().message(), "Swap completed, awaiting outbound");
        assert!(!status.is_complete());
    }

    /// Test that only a completed outbound signature is terminal
    #[test]
    fn test_terminal_detection() {
        let mut stages = TxStagesResponse {
            inbound_observed: Some(InboundObservedStage { completed: true, ..Default::default() }),
            inbound_confirmation_counted: Some(InboundConfirmationCountedStage {
                completed: true,
                ..Default::default()
            }),
            inbound_finalised: Some(CompletionStage { completed: true }),
            swap_finalised: Some(CompletionStage { completed: true }),
            ..Default::default()
        };
        assert!(!SwapStageStatus::from(stages.clone()).is_complete());

        stages.outbound_signed = Some(OutboundSignedStage::default());
        let status = SwapStageStatus::from(stages.clone());
        assert!(!status.is_complete());
        assert_eq!(status.phase().message(), "Outbound signing in progress");

        stages.outbound_signed = Some(OutboundSignedStage { completed: true, ..Default::default() });
        let status = SwapStageStatus::from(stages);
        assert!(status.is_complete());
        assert_eq!(status.phase(), SwapPhase::Completed);
        assert_eq!(status.phase().message(), "Swap completed successfully");
    }

    /// Test that a lone completed outbound is terminal regardless of gaps
    #[test]
    fn test_terminal_with_missing_earlier_stages() {
        let status = status(r#"{"outbound_signed":{"completed":true}}"#);
        assert!(status.is_complete());
    }

    /// Test the confirmation and streaming metadata
    #[test]
    fn test_stage_metadata() {
        let status = status(
            r#"{"inbound_observed":{"completed":true},
                "inbound_confirmation_counted":{"remaining_confirmation_seconds":24,"completed":false},
                "swap_status":{"pending":true,"streaming":{"interval":1,"quantity":10,"count":3}}}"#,
        );
        assert_eq!(status.remaining_confirmation_seconds(), Some(24));
        assert_eq!(status.streaming_progress(), Some((3, 10)));
        assert_eq!(status.phase().message(), "Confirmation counting in progress");
    }
}
