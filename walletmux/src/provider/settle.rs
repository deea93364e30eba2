//! Settle window applied after a handshake or wallet notification.
//!
//! Wallets update their chain id and selected account asynchronously after a
//! handshake completes, so reading them immediately can return stale values.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep};

use super::WalletState;

/// Default fixed settle delay, in milliseconds.
pub const DEFAULT_SETTLE_MS: u64 = 300;

/// Default fixed settle delay.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(DEFAULT_SETTLE_MS);

/// How long to wait before trusting what a wallet reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlePolicy {
    /// Sleep once, then read.
    Fixed(Duration),
    /// Read repeatedly until two consecutive reads agree or `max` elapses.
    PollUntilStable {
        /// Delay between reads.
        interval: Duration,
        /// Upper bound on the whole window.
        max: Duration,
    },
}

impl Default for SettlePolicy {
    fn default() -> Self {
        Self::Fixed(DEFAULT_SETTLE_DELAY)
    }
}

impl SettlePolicy {
    /// No delay at all.
    #[must_use]
    pub const fn immediate() -> Self {
        Self::Fixed(Duration::ZERO)
    }

    /// Wait out the window and return the settled state.
    pub async fn settle<F, Fut>(&self, mut read: F) -> Option<WalletState>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Option<WalletState>> + Send,
    {
        match *self {
            Self::Fixed(delay) => {
                if !delay.is_zero() {
                    sleep(delay).await;
                }
                read().await
            }
            Self::PollUntilStable { interval, max } => {
                let deadline = Instant::now() + max;
                let mut last = read().await;
                loop {
                    if Instant::now() >= deadline {
                        return last;
                    }
                    sleep(interval).await;
                    let next = read().await;
                    if next.is_some() && next == last {
                        return next;
                    }
                    last = next;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;
    use crate::network::ChainId;

    fn state(chain: u64) -> WalletState {
        WalletState::new("0xabc", ChainId::Evm(chain))
    }

    #[tokio::test]
    async fn test_immediate_reads_once() {
        let reads = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&reads);
        let settled = SettlePolicy::immediate()
            .settle(|| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Some(state(1))
                }
            })
            .await;
        assert_eq!(settled, Some(state(1)));
        assert_eq!(reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_waits_for_stable_reads() {
        // Reports chain 1, then 56 from the second read onwards.
        let reads = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&reads);
        let policy = SettlePolicy::PollUntilStable {
            interval: Duration::from_millis(50),
            max: Duration::from_secs(2),
        };
        let settled = policy
            .settle(|| {
                let counter = Arc::clone(&counter);
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    Some(state(if n == 0 { 1 } else { 56 }))
                }
            })
            .await;
        assert_eq!(settled, Some(state(56)));
        assert_eq!(reads.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_gives_up_at_max() {
        let reads = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&reads);
        let policy = SettlePolicy::PollUntilStable {
            interval: Duration::from_millis(100),
            max: Duration::from_millis(250),
        };
        let settled = policy
            .settle(|| {
                let counter = Arc::clone(&counter);
                async move { Some(state(counter.fetch_add(1, Ordering::SeqCst))) }
            })
            .await;
        assert!(settled.is_some());
        assert!(reads.load(Ordering::SeqCst) <= 4);
    }
}
