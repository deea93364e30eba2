//! WalletConnect bridge.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::host::{WalletConnectOptions, WalletConnectSession, WalletHost};
use super::settle::SettlePolicy;
use super::subscription::Subscription;
use super::{EventSink, ProviderAdapter, ProviderKind, SwitchOutcome, WalletState};
use crate::error::{ConnectError, ConnectResult};
use crate::network::{ChainDescriptor, ChainId};

/// Adapter for wallets paired over WalletConnect.
///
/// The remote wallet picks its own network; switch requests are accepted but
/// change nothing locally.
pub struct WalletConnectAdapter {
    host: Arc<dyn WalletHost>,
    options: WalletConnectOptions,
    settle: SettlePolicy,
    session: Mutex<Option<Arc<dyn WalletConnectSession>>>,
    subscription: Subscription,
}

impl std::fmt::Debug for WalletConnectAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletConnectAdapter")
            .field("options", &self.options)
            .field("settle", &self.settle)
            .finish_non_exhaustive()
    }
}

impl WalletConnectAdapter {
    const KIND: ProviderKind = ProviderKind::WalletConnect;

    /// Create the adapter.
    #[must_use]
    pub fn new(host: Arc<dyn WalletHost>, options: WalletConnectOptions, settle: SettlePolicy) -> Self {
        Self {
            host,
            options,
            settle,
            session: Mutex::new(None),
            subscription: Subscription::new(),
        }
    }
}

async fn read_state(session: Arc<dyn WalletConnectSession>) -> Option<WalletState> {
    let chain_id = session.chain_id().await?;
    let address = session.accounts().await.into_iter().find(|a| !a.is_empty())?;
    Some(WalletState::new(address, ChainId::Evm(chain_id)))
}

#[async_trait]
impl ProviderAdapter for WalletConnectAdapter {
    fn kind(&self) -> ProviderKind {
        Self::KIND
    }

    fn is_available(&self) -> bool {
        self.host.wallet_connect().is_some()
    }

    async fn connect(&self) -> ConnectResult<WalletState> {
        let connector = self
            .host
            .wallet_connect()
            .ok_or_else(|| ConnectError::provider_unavailable(Self::KIND))?;

        let session = connector.open(&self.options).await.map_err(|e| {
            debug!(provider = %Self::KIND, error = %e, "pairing failed");
            ConnectError::handshake_rejected(Self::KIND)
        })?;
        *self.session.lock().await = Some(Arc::clone(&session));
        info!(provider = %Self::KIND, "session opened");

        self.settle
            .settle(|| read_state(Arc::clone(&session)))
            .await
            .ok_or_else(|| ConnectError::handshake_rejected(Self::KIND))
    }

    async fn switch_network(&self, target: &ChainDescriptor) -> ConnectResult<SwitchOutcome> {
        debug!(provider = %Self::KIND, chain_id = %target.chain_id, "switch left to the remote wallet");
        Ok(SwitchOutcome::Unchanged)
    }

    async fn subscribe(&self, sink: EventSink) {
        let Some(session) = self.session.lock().await.clone() else {
            return;
        };
        let signals = session.signals();
        self.subscription.attach(Self::KIND, signals, sink, self.settle, move || {
            read_state(Arc::clone(&session))
        });
    }

    fn unsubscribe(&self) {
        self.subscription.cancel();
    }

    fn is_subscribed(&self) -> bool {
        self.subscription.is_active()
    }

    async fn disconnect(&self) {
        self.subscription.cancel();
        let Some(session) = self.session.lock().await.take() else {
            return;
        };
        if let Err(e) = session.disconnect().await {
            warn!(provider = %Self::KIND, error = %e, "session disconnect failed");
        }
    }
}
