//! Binance Chain Wallet.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::host::{BinanceChainWallet, WalletHost};
use super::settle::SettlePolicy;
use super::subscription::Subscription;
use super::{EventSink, ProviderAdapter, ProviderKind, SwitchOutcome, WalletState};
use crate::error::{ConnectError, ConnectResult};
use crate::network::{ChainDescriptor, ChainId};

/// Adapter for the exchange-operated browser wallet.
///
/// The wallet only serves BNB Smart Chain and its testnet and has its own
/// network switch command instead of `wallet_switchEthereumChain`.
pub struct ExchangeWalletAdapter {
    host: Arc<dyn WalletHost>,
    settle: SettlePolicy,
    subscription: Subscription,
}

impl std::fmt::Debug for ExchangeWalletAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeWalletAdapter")
            .field("settle", &self.settle)
            .finish_non_exhaustive()
    }
}

impl ExchangeWalletAdapter {
    const KIND: ProviderKind = ProviderKind::ExchangeWallet;

    /// Create the adapter.
    #[must_use]
    pub fn new(host: Arc<dyn WalletHost>, settle: SettlePolicy) -> Self {
        Self {
            host,
            settle,
            subscription: Subscription::new(),
        }
    }

    fn wallet(&self) -> Option<Arc<dyn BinanceChainWallet>> {
        self.host.binance_chain()
    }

    /// Wallet-side network id for an EVM chain id.
    fn network_id(chain_id: &ChainId) -> Option<&'static str> {
        match chain_id.as_evm()? {
            56 => Some("bsc-mainnet"),
            97 => Some("bsc-testnet"),
            _ => None,
        }
    }
}

async fn read_state(wallet: Arc<dyn BinanceChainWallet>) -> Option<WalletState> {
    let chain_id = wallet.chain_id().await?.parse::<ChainId>().ok()?;
    let address = wallet.account().await.filter(|a| !a.is_empty())?;
    Some(WalletState::new(address, chain_id))
}

#[async_trait]
impl ProviderAdapter for ExchangeWalletAdapter {
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

        if let Err(e) = wallet.activate().await {
            debug!(provider = %Self::KIND, error = %e, "activation failed");
            return Err(ConnectError::handshake_rejected(Self::KIND));
        }

        self.settle
            .settle(|| read_state(Arc::clone(&wallet)))
            .await
            .ok_or_else(|| ConnectError::handshake_rejected(Self::KIND))
    }

    async fn switch_network(&self, target: &ChainDescriptor) -> ConnectResult<SwitchOutcome> {
        let Some(network_id) = Self::network_id(&target.chain_id) else {
            return Err(ConnectError::wrong_provider(&target.name, target.sole_provider()));
        };
        let wallet = self
            .wallet()
            .ok_or_else(|| ConnectError::provider_unavailable(Self::KIND))?;

        wallet.switch_network(network_id).await.map_err(|e| {
            warn!(provider = %Self::KIND, network_id, error = %e, "switchNetwork failed");
            ConnectError::switch_failed(&target.name, Self::KIND)
        })?;
        Ok(SwitchOutcome::Switched)
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
        if let Some(wallet) = self.wallet() {
            wallet.deactivate().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkRegistry;
    use crate::sim::{SimBinanceWallet, SimHost};

    fn adapter(wallet: &SimBinanceWallet) -> ExchangeWalletAdapter {
        let host = SimHost::builder().binance_chain(wallet.clone()).build();
        ExchangeWalletAdapter::new(Arc::new(host), SettlePolicy::immediate())
    }

    #[test]
    fn test_network_ids() {
        assert_eq!(ExchangeWalletAdapter::network_id(&ChainId::Evm(56)), Some("bsc-mainnet"));
        assert_eq!(ExchangeWalletAdapter::network_id(&ChainId::Evm(97)), Some("bsc-testnet"));
        assert_eq!(ExchangeWalletAdapter::network_id(&ChainId::Evm(1)), None);
        assert_eq!(ExchangeWalletAdapter::network_id(&ChainId::tron()), None);
    }

    #[tokio::test]
    async fn test_connect_and_switch() {
        let wallet = SimBinanceWallet::new("0xb1", 56);
        let adapter = adapter(&wallet);
        let state = adapter.connect().await.unwrap();
        assert_eq!(state.chain_id, ChainId::Evm(56));

        let registry = NetworkRegistry::builtin();
        let testnet = registry.describe(&ChainId::Evm(97)).unwrap();
        assert_eq!(adapter.switch_network(testnet).await, Ok(SwitchOutcome::Switched));
        assert_eq!(wallet.chain(), 97);
    }

    #[tokio::test]
    async fn test_switch_to_non_bsc_rejected() {
        let wallet = SimBinanceWallet::new("0xb1", 56);
        let registry = NetworkRegistry::builtin();
        let eth = registry.describe(&ChainId::Evm(1)).unwrap();

        let err = adapter(&wallet).switch_network(eth).await.unwrap_err();
        assert_eq!(err.title, "Wrong provider for Ethereum");
        assert_eq!(err.text, "Please connect to another provider");
        assert_eq!(wallet.chain(), 56);
    }
}
