//! Forwarding of wallet notifications to the controller.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::debug;

use super::settle::SettlePolicy;
use super::{AdapterEvent, EventSink, ProviderKind, WalletState};
use crate::provider::host::WalletSignal;

/// At most one live forwarding task per adapter instance.
///
/// The task listens to a wallet's [`WalletSignal`] stream, waits out the
/// settle window, re-reads the wallet and pushes the result into the sink.
/// A wallet that no longer exposes an account is reported as closed.
#[derive(Debug, Default)]
pub struct Subscription {
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Subscription {
    /// Create an idle subscription slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while a forwarding task is running.
    pub fn is_active(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Start forwarding. Does nothing if a task is already running.
    ///
    /// Returns `true` if a new task was started.
    pub fn attach<F, Fut>(
        &self,
        kind: ProviderKind,
        signals: broadcast::Receiver<WalletSignal>,
        sink: EventSink,
        settle: SettlePolicy,
        read: F,
    ) -> bool
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<WalletState>> + Send + 'static,
    {
        let mut slot = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|task| !task.is_finished()) {
            debug!(provider = %kind, "already subscribed");
            return false;
        }
        *slot = Some(tokio::spawn(forward(kind, signals, sink, settle, read)));
        true
    }

    /// Stop forwarding.
    pub fn cancel(&self) {
        if let Some(task) = self.task.lock().unwrap_or_else(PoisonError::into_inner).take() {
            task.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn forward<F, Fut>(
    kind: ProviderKind,
    mut signals: broadcast::Receiver<WalletSignal>,
    sink: EventSink,
    settle: SettlePolicy,
    read: F,
) where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Option<WalletState>> + Send,
{
    loop {
        let event = match signals.recv().await {
            Ok(WalletSignal::Close) | Err(RecvError::Closed) => AdapterEvent::Closed,
            Ok(signal) => {
                debug!(provider = %kind, ?signal, "wallet signal");
                settle
                    .settle(&read)
                    .await
                    .map_or(AdapterEvent::Closed, AdapterEvent::Changed)
            }
            Err(RecvError::Lagged(skipped)) => {
                debug!(provider = %kind, skipped, "signal stream lagged");
                continue;
            }
        };

        let closed = matches!(event, AdapterEvent::Closed);
        if sink.send(event).await.is_err() || closed {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::network::ChainId;

    #[tokio::test]
    async fn test_forwards_until_close() {
        let (tx, rx) = broadcast::channel(8);
        let (sink, mut events) = mpsc::channel(8);
        let sub = Subscription::new();

        let started = sub.attach(
            ProviderKind::InjectedEvm,
            rx,
            sink.clone(),
            SettlePolicy::immediate(),
            || async { Some(WalletState::new("0xabc", ChainId::Evm(56))) },
        );
        assert!(started);
        assert!(sub.is_active());

        // A second attach while running is ignored.
        let again = sub.attach(
            ProviderKind::InjectedEvm,
            tx.subscribe(),
            sink,
            SettlePolicy::immediate(),
            || async { None },
        );
        assert!(!again);

        tx.send(WalletSignal::ChainChanged("0x38".into())).unwrap();
        assert_eq!(
            events.recv().await,
            Some(AdapterEvent::Changed(WalletState::new("0xabc", ChainId::Evm(56))))
        );

        tx.send(WalletSignal::Close).unwrap();
        assert_eq!(events.recv().await, Some(AdapterEvent::Closed));
        assert_eq!(events.recv().await, None);
    }

    #[tokio::test]
    async fn test_missing_account_reports_closed() {
        let (tx, rx) = broadcast::channel(8);
        let (sink, mut events) = mpsc::channel(8);
        let sub = Subscription::new();
        sub.attach(
            ProviderKind::SolanaExtension,
            rx,
            sink,
            SettlePolicy::immediate(),
            || async { None },
        );

        tx.send(WalletSignal::Account(String::new())).unwrap();
        assert_eq!(events.recv().await, Some(AdapterEvent::Closed));
    }

    #[tokio::test]
    async fn test_cancel_stops_forwarding() {
        let (tx, rx) = broadcast::channel(8);
        let (sink, mut events) = mpsc::channel(8);
        let sub = Subscription::new();
        sub.attach(
            ProviderKind::InjectedEvm,
            rx,
            sink,
            SettlePolicy::immediate(),
            || async { Some(WalletState::new("0xabc", ChainId::Evm(1))) },
        );
        sub.cancel();
        assert!(!sub.is_active());

        let _ = tx.send(WalletSignal::ChainChanged("0x1".into()));
        assert_eq!(events.recv().await, None);
    }
}
