//! TronLink extension.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::host::{TronLinkWallet, WalletHost};
use super::settle::SettlePolicy;
use super::subscription::Subscription;
use super::{EventSink, ProviderAdapter, ProviderKind, SwitchOutcome, WalletState, fixed_network_switch};
use crate::error::{ConnectError, ConnectResult};
use crate::network::{ChainDescriptor, ChainId};

/// Adapter for TronLink. Always on the Tron network.
pub struct TronLinkAdapter {
    host: Arc<dyn WalletHost>,
    settle: SettlePolicy,
    subscription: Subscription,
}

impl std::fmt::Debug for TronLinkAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TronLinkAdapter")
            .field("settle", &self.settle)
            .finish_non_exhaustive()
    }
}

impl TronLinkAdapter {
    const KIND: ProviderKind = ProviderKind::TronExtension;

    /// Create the adapter.
    #[must_use]
    pub fn new(host: Arc<dyn WalletHost>, settle: SettlePolicy) -> Self {
        Self {
            host,
            settle,
            subscription: Subscription::new(),
        }
    }

    fn wallet(&self) -> Option<Arc<dyn TronLinkWallet>> {
        self.host.tron_link()
    }
}

async fn read_state(wallet: Arc<dyn TronLinkWallet>) -> Option<WalletState> {
    let address = wallet.default_address().await.filter(|a| !a.is_empty())?;
    Some(WalletState::new(address, ChainId::tron()))
}

#[async_trait]
impl ProviderAdapter for TronLinkAdapter {
    fn kind(&self) -> ProviderKind {
        Self::KIND
    }

    fn is_available(&self) -> bool {
        self.wallet().is_some()
    }

    async fn connect(&self) -> ConnectResult<WalletState> {
        let wallet = self
            .wallet()
            .ok_or_else(|| ConnectError::provider_unavailable(Self::KIND))?;

        match wallet.request_accounts().await {
            Ok(resp) if resp.is_approved() => {}
            Ok(resp) => {
                debug!(provider = %Self::KIND, code = resp.code, message = %resp.message, "access refused");
                return Err(ConnectError::handshake_rejected(Self::KIND));
            }
            Err(e) => {
                debug!(provider = %Self::KIND, error = %e, "tron_requestAccounts failed");
                return Err(ConnectError::handshake_rejected(Self::KIND));
            }
        }

        self.settle
            .settle(|| read_state(Arc::clone(&wallet)))
            .await
            .ok_or_else(|| ConnectError::handshake_rejected(Self::KIND))
    }

    async fn switch_network(&self, target: &ChainDescriptor) -> ConnectResult<SwitchOutcome> {
        fixed_network_switch(&ChainId::tron(), target)
    }

    async fn subscribe(&self, sink: EventSink) {
        let Some(wallet) = self.wallet() else {
            return;
        };
        let signals = wallet.signals();
        self.subscription.attach(Self::KIND, signals, sink, self.settle, move || {
            read_state(Arc::clone(&wallet))
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
    }
}
