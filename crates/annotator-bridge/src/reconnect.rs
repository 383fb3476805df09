//! Reconnect state machine for the bridge's outbound connection to the hub:
//! a bounded number of fixed-delay attempts, interruptible by shutdown or by
//! a tool call observing the transport down mid-backoff (`§4.6`'s
//! "immediate reconnect" trigger).

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

pub const MAX_ATTEMPTS: u32 = 20;
pub const RETRY_DELAY: Duration = Duration::from_secs(10);

/// Tracks how many connection attempts have been made and lets a shutdown
/// signal, or an immediate-reconnect trigger, cut a backoff sleep short
/// instead of waiting it out.
pub struct ReconnectState {
    attempt: u32,
    shutdown: Arc<Notify>,
    retry_now: Arc<Notify>,
}

pub enum Outcome {
    /// Sleep elapsed (or an immediate-reconnect trigger fired); try again.
    Retry,
    /// The retry budget is exhausted.
    BudgetExhausted,
    /// Shutdown was signalled during the backoff sleep.
    ShuttingDown,
}

impl ReconnectState {
    pub fn new(shutdown: Arc<Notify>, retry_now: Arc<Notify>) -> Self {
        Self { attempt: 0, shutdown, retry_now }
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Record a failed attempt and wait out the fixed delay, unless shutdown
    /// or an immediate-reconnect trigger fires first, or the budget is
    /// already spent.
    pub async fn backoff(&mut self) -> Outcome {
        self.attempt += 1;
        if self.attempt > MAX_ATTEMPTS {
            return Outcome::BudgetExhausted;
        }

        tokio::select! {
            _ = tokio::time::sleep(RETRY_DELAY) => Outcome::Retry,
            _ = self.retry_now.notified() => Outcome::Retry,
            _ = self.shutdown.notified() => Outcome::ShuttingDown,
        }
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn budget_is_exhausted_after_max_attempts() {
        let mut state = ReconnectState::new(Arc::new(Notify::new()), Arc::new(Notify::new()));
        state.attempt = MAX_ATTEMPTS;
        assert!(matches!(state.backoff().await, Outcome::BudgetExhausted));
    }

    #[tokio::test]
    async fn shutdown_interrupts_the_backoff_sleep() {
        let shutdown = Arc::new(Notify::new());
        let mut state = ReconnectState::new(shutdown.clone(), Arc::new(Notify::new()));
        shutdown.notify_one();
        assert!(matches!(state.backoff().await, Outcome::ShuttingDown));
    }

    #[tokio::test]
    async fn retry_now_interrupts_the_backoff_sleep() {
        let retry_now = Arc::new(Notify::new());
        let mut state = ReconnectState::new(Arc::new(Notify::new()), retry_now.clone());
        retry_now.notify_one();
        assert!(matches!(state.backoff().await, Outcome::Retry));
    }

    #[test]
    fn reset_clears_the_attempt_counter() {
        let mut state = ReconnectState::new(Arc::new(Notify::new()), Arc::new(Notify::new()));
        state.attempt = 5;
        state.reset();
        assert_eq!(state.attempt(), 0);
    }
}
