//! A client for swapping assets on Base into THORChain
//!
//! The client fetches slippage-protected quotes, resolves the inbound vault,
//! approves and deposits through the THORChain router, and tracks the
//! resulting settlement until its outbound is signed

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]
#![deny(unsafe_code)]
#![deny(clippy::needless_pass_by_ref_mut)]
#![deny(clippy::unused_async)]

pub mod approval;
pub mod assets;
pub mod config;
pub mod countdown;
pub mod deposit;
pub mod error;
pub mod notifications;
pub mod orchestrator;
pub mod poller;
pub mod settlement;
pub mod status;
pub mod thornode;
pub mod wallet;

#[cfg(test)]
mod test_helpers;

pub use config::SwapClientConfig;
pub use error::SwapClientError;
pub use orchestrator::{SwapOrchestrator, SwapSession};
