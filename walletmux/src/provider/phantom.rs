//! Phantom (Solana) extension.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::host::{PhantomWallet, WalletHost};
use super::settle::SettlePolicy;
use super::subscription::Subscription;
use super::{EventSink, ProviderAdapter, ProviderKind, SwitchOutcome, WalletState, fixed_network_switch};
use crate::error::{ConnectError, ConnectResult};
use crate::network::{ChainDescriptor, ChainId};

/// Adapter for Phantom. Always on Solana.
pub struct PhantomAdapter {
    host: Arc<dyn WalletHost>,
    settle: SettlePolicy,
    subscription: Subscription,
}

impl std::fmt::Debug for PhantomAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhantomAdapter")
            .field("settle", &self.settle)
            .finish_non_exhaustive()
    }
}

impl PhantomAdapter {
    const KIND: ProviderKind = ProviderKind::SolanaExtension;

    /// Create the adapter.
    #[must_use]
    pub fn new(host: Arc<dyn WalletHost>, settle: SettlePolicy) -> Self {
        Self {
            host,
            settle,
            subscription: Subscription::new(),
        }
    }

    fn wallet(&self) -> Option<Arc<dyn PhantomWallet>> {
        self.host.solana()
    }
}

async fn read_state(wallet: Arc<dyn PhantomWallet>) -> Option<WalletState> {
    let key = wallet.public_key().await.filter(|k| !k.is_empty())?;
    Some(WalletState::new(key, ChainId::solana()))
}

#[async_trait]
impl ProviderAdapter for PhantomAdapter {
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

        let key = wallet.connect().await.map_err(|e| {
            debug!(provider = %Self::KIND, error = %e, "connect failed");
            ConnectError::handshake_rejected(Self::KIND)
        })?;

        // connect() already hands back the key; the settle read only refreshes it.
        let settled = self.settle.settle(|| read_state(Arc::clone(&wallet))).await;
        Ok(settled.unwrap_or_else(|| WalletState::new(key, ChainId::solana())))
    }

    async fn switch_network(&self, target: &ChainDescriptor) -> ConnectResult<SwitchOutcome> {
        fixed_network_switch(&ChainId::solana(), target)
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
        let Some(wallet) = self.wallet() else {
            return;
        };
        if let Err(e) = wallet.disconnect().await {
            warn!(provider = %Self::KIND, error = %e, "disconnect failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{SimHost, SimPhantom};

    #[tokio::test]
    async fn test_connect_returns_public_key() {
        let wallet = SimPhantom::new("9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin");
        let host = SimHost::builder().solana(wallet.clone()).build();
        let adapter = PhantomAdapter::new(Arc::new(host), SettlePolicy::immediate());

        let state = adapter.connect().await.unwrap();
        assert_eq!(state.chain_id, ChainId::solana());
        assert_eq!(state.address, "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin");

        adapter.disconnect().await;
        assert!(!wallet.is_connected());
    }

    #[tokio::test]
    async fn test_rejected() {
        let wallet = SimPhantom::new("key");
        wallet.reject_connect(true);
        let host = SimHost::builder().solana(wallet).build();
        let adapter = PhantomAdapter::new(Arc::new(host), SettlePolicy::immediate());
        let err = adapter.connect().await.unwrap_err();
        assert_eq!(err.title, "Not connected to Phantom");
    }
}
