//! A 1 Hz countdown of the estimated swap time

use std::time::Duration;

use tokio::{sync::watch, task::JoinHandle, time::MissedTickBehavior};

/// A countdown published once per second, stopping at zero
///
/// The countdown task is aborted when the handle is dropped
#[derive(Debug)]
pub struct Countdown {
    /// The remaining seconds
    remaining: watch::Receiver<u64>,
    /// The task decrementing the countdown
    task: JoinHandle<()>,
}

impl Countdown {
    /// Start a countdown from the given number of seconds
    pub fn start(seconds: u64) -> Self {
        let (tx, remaining) = watch::channel(seconds);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(1));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;

            let mut left = seconds;
            while left > 0 {
                ticker.tick().await;
                left -= 1;
                if tx.send(left).is_err() {
                    break;
                }
            }
        });

        Self { remaining, task }
    }

    /// The remaining seconds
    pub fn remaining(&self) -> u64 {
        *self.remaining.borrow()
    }

    /// Subscribe to the remaining seconds
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.remaining.clone()
    }

    /// Stop the countdown where it is
    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Format seconds as `m:ss`
pub fn format_duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test that the countdown ticks down to zero and stops
    #[tokio::test(start_paused = true)]
    async fn test_counts_down_to_zero() {
        let countdown = Countdown::start(3);
        assert_eq!(countdown.remaining(), 3);

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(countdown.remaining(), 2);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(countdown.remaining(), 0);
    }

    /// Test that a stopped countdown freezes
    #[tokio::test(start_paused = true)]
    async fn test_stop() {
        let countdown = Countdown::start(60);
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        countdown.stop();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(countdown.remaining(), 58);
    }

    /// Test the duration format
    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(65), "1:05");
        assert_eq!(format_duration(612), "10:12");
    }
}
