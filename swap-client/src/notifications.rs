//! User-facing notifications and balance refresh signalling
//!
//! The swap client never renders anything itself. Progress and failures are
//! published as [`Notification`]s through a [`Notifier`], and wallet balance
//! refreshes are requested through a [`BalanceRefresh`] channel that any
//! number of views may subscribe to

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tracing::{error, info};

use crate::error::SwapClientError;

/// The capacity of the balance refresh channel
const BALANCE_REFRESH_CAPACITY: usize = 16;

// -----------------
// | Notifications |
// -----------------

/// The severity of a notification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// Progress information
    Info,
    /// A successful outcome
    Success,
    /// A failure
    Error,
}

/// A message for the user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// A short title
    pub title: String,
    /// The body of the notification
    pub description: String,
    /// The severity
    pub severity: Severity,
}

impl Notification {
    /// An informational notification
    pub fn info(title: &str, description: impl Into<String>) -> Self {
        Self { title: title.to_string(), description: description.into(), severity: Severity::Info }
    }

    /// A success notification
    pub fn success(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            severity: Severity::Success,
        }
    }

    /// An error notification
    pub fn error(title: &str, description: impl Into<String>) -> Self {
        Self { title: title.to_string(), description: description.into(), severity: Severity::Error }
    }

    /// The notification shown for a failed swap step
    pub fn from_error(err: &SwapClientError) -> Self {
        let title = match err {
            SwapClientError::Validation(_) => "Invalid Input",
            SwapClientError::QuoteFetch(_) => "Quote Failed",
            SwapClientError::Metadata(_) | SwapClientError::ChainHalted(_) => "Swap Unavailable",
            SwapClientError::Approval(_) => "Approval Failed",
            SwapClientError::Polling(_) => "Status Update Failed",
            SwapClientError::Deposit(_)
            | SwapClientError::Http(_)
            | SwapClientError::Parse(_)
            | SwapClientError::Wallet(_) => "Transaction Failed",
        };

        Self::error(title, err.message())
    }
}

/// A sink for user-facing notifications
pub trait Notifier: Send + Sync {
    /// Publish a notification
    fn notify(&self, notification: Notification);
}

/// A notifier that writes notifications to the log
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let Notification { title, description, severity } = notification;
        match severity {
            Severity::Info | Severity::Success => info!("{title}: {description}"),
            Severity::Error => error!("{title}: {description}"),
        }
    }
}

/// A notifier that forwards notifications over a channel
#[derive(Clone, Debug)]
pub struct ChannelNotifier {
    /// The sending half of the channel
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiver its notifications arrive on
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        // A closed receiver means nobody is listening anymore
        let _ = self.sender.send(notification);
    }
}

// -------------------
// | Balance Refresh |
// -------------------

/// A publish/subscribe signal asking views to reload wallet balances
#[derive(Clone, Debug)]
pub struct BalanceRefresh {
    /// The broadcast sender
    sender: broadcast::Sender<()>,
}

impl Default for BalanceRefresh {
    fn default() -> Self {
        Self::new()
    }
}

impl BalanceRefresh {
    /// Constructor
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(BALANCE_REFRESH_CAPACITY);
        Self { sender }
    }

    /// Subscribe to refresh requests
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.sender.subscribe()
    }

    /// Request a refresh now
    pub fn trigger(&self) {
        // No subscribers is not an error
        let _ = self.sender.send(());
    }

    /// Request a refresh after a delay, giving the chain time to reflect a
    /// mined transaction
    pub fn trigger_after(&self, delay: Duration) {
        let this = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            this.trigger();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test the error notification titles
    #[test]
    fn test_from_error() {
        let cases = [
            (SwapClientError::validation("amount is required"), "Invalid Input"),
            (SwapClientError::quote_fetch("Status 500"), "Quote Failed"),
            (SwapClientError::chain_halted("paused"), "Swap Unavailable"),
            (SwapClientError::approval("rejected"), "Approval Failed"),
            (SwapClientError::deposit("reverted"), "Transaction Failed"),
            (SwapClientError::wallet("rejected"), "Transaction Failed"),
        ];

        for (err, title) in cases {
            let notification = Notification::from_error(&err);
            assert_eq!(notification.title, title);
            assert_eq!(notification.description, err.message());
            assert_eq!(notification.severity, Severity::Error);
        }
    }

    /// Test that the channel notifier forwards notifications in order
    #[tokio::test]
    async fn test_channel_notifier() {
        let (notifier, mut rx) = ChannelNotifier::new();
        notifier.notify(Notification::info("Sending Transaction", "confirm in your wallet"));
        notifier.notify(Notification::success("Swap Completed", "done"));

        assert_eq!(rx.recv().await.unwrap().title, "Sending Transaction");
        assert_eq!(rx.recv().await.unwrap().severity, Severity::Success);
    }

    /// Test that a delayed refresh reaches every subscriber
    #[tokio::test(start_paused = true)]
    async fn test_balance_refresh_after_delay() {
        let refresh = BalanceRefresh::new();
        let mut a = refresh.subscribe();
        let mut b = refresh.subscribe();

        refresh.trigger_after(Duration::from_millis(500));
        assert!(a.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(501)).await;
        assert!(a.try_recv().is_ok());
        assert!(b.try_recv().is_ok());
    }

    /// Test that triggering without subscribers is harmless
    #[test]
    fn test_trigger_without_subscribers() {
        BalanceRefresh::new().trigger();
    }
}
