//! Injected EIP-1193 wallets (MetaMask, OKX MetaX).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::host::{Eip1193, WalletHost};
use super::settle::SettlePolicy;
use super::subscription::Subscription;
use super::{EventSink, ProviderAdapter, ProviderKind, SwitchOutcome, WalletState};
use crate::error::{ConnectError, ConnectResult, ProviderError};
use crate::network::{ChainDescriptor, ChainId};

type Locate = fn(&dyn WalletHost) -> Option<Arc<dyn Eip1193>>;

/// Adapter for wallets exposing the EIP-1193 request interface.
pub struct InjectedAdapter {
    kind: ProviderKind,
    host: Arc<dyn WalletHost>,
    locate: Locate,
    settle: SettlePolicy,
    subscription: Subscription,
}

impl std::fmt::Debug for InjectedAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InjectedAdapter")
            .field("kind", &self.kind)
            .field("settle", &self.settle)
            .finish_non_exhaustive()
    }
}

impl InjectedAdapter {
    /// MetaMask, found at `window.ethereum`.
    #[must_use]
    pub fn metamask(host: Arc<dyn WalletHost>, settle: SettlePolicy) -> Self {
        Self::new(ProviderKind::InjectedEvm, host, |h| h.ethereum(), settle)
    }

    /// OKX MetaX, found at `window.okexchain`.
    #[must_use]
    pub fn metax(host: Arc<dyn WalletHost>, settle: SettlePolicy) -> Self {
        Self::new(ProviderKind::AltEvm, host, |h| h.okexchain(), settle)
    }

    fn new(kind: ProviderKind, host: Arc<dyn WalletHost>, locate: Locate, settle: SettlePolicy) -> Self {
        Self {
            kind,
            host,
            locate,
            settle,
            subscription: Subscription::new(),
        }
    }

    fn wallet(&self) -> Option<Arc<dyn Eip1193>> {
        (self.locate)(self.host.as_ref())
    }

    async fn request_switch(wallet: &dyn Eip1193, hex_id: &str) -> Result<Value, ProviderError> {
        wallet
            .request("wallet_switchEthereumChain", json!([{ "chainId": hex_id }]))
            .await
    }
}

/// Read `(address, chain id)` from an EIP-1193 wallet.
///
/// Falls back to `eth_accounts` when the wallet does not expose a selected
/// address directly.
async fn read_state(wallet: Arc<dyn Eip1193>) -> Option<WalletState> {
    let chain_id = wallet.chain_id().await?.parse::<ChainId>().ok()?;
    let address = match wallet.selected_address().await {
        Some(address) => address,
        None => first_account(&wallet.request("eth_accounts", json!([])).await.ok()?)?,
    };
    Some(WalletState::new(address, chain_id))
}

fn first_account(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.first()?.as_str().map(str::to_owned),
        _ => None,
    }
    .filter(|s| !s.is_empty())
}

#[async_trait]
impl ProviderAdapter for InjectedAdapter {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn is_available(&self) -> bool {
        self.wallet().is_some()
    }

    async fn connect(&self) -> ConnectResult<WalletState> {
        let wallet = self
            .wallet()
            .ok_or_else(|| ConnectError::provider_unavailable(self.kind))?;

        if let Err(e) = wallet.request("eth_requestAccounts", json!([])).await {
            debug!(provider = %self.kind, error = %e, "eth_requestAccounts failed");
            return Err(ConnectError::handshake_rejected(self.kind));
        }

        self.settle
            .settle(|| read_state(Arc::clone(&wallet)))
            .await
            .ok_or_else(|| ConnectError::handshake_rejected(self.kind))
    }

    async fn switch_network(&self, target: &ChainDescriptor) -> ConnectResult<SwitchOutcome> {
        let wallet = self
            .wallet()
            .ok_or_else(|| ConnectError::provider_unavailable(self.kind))?;
        let Some(hex_id) = target.chain_id.to_hex() else {
            return Err(ConnectError::wrong_provider(&target.name, target.sole_provider()));
        };
        let failed = || ConnectError::switch_failed(&target.name, self.kind);

        match Self::request_switch(wallet.as_ref(), &hex_id).await {
            Ok(_) => Ok(SwitchOutcome::Switched),
            Err(e) if e.is_unrecognized_chain() => {
                debug!(provider = %self.kind, chain_id = %target.chain_id, "chain unknown to wallet, adding");
                let params = target.add_chain_params().ok_or_else(failed)?;
                if let Err(e) = wallet.request("wallet_addEthereumChain", json!([params])).await {
                    warn!(provider = %self.kind, error = %e, "wallet_addEthereumChain failed");
                    return Err(failed());
                }
                Self::request_switch(wallet.as_ref(), &hex_id)
                    .await
                    .map(|_| SwitchOutcome::Switched)
                    .map_err(|e| {
                        warn!(provider = %self.kind, error = %e, "switch after add failed");
                        failed()
                    })
            }
            Err(e) => {
                warn!(provider = %self.kind, error = %e, "wallet_switchEthereumChain failed");
                Err(failed())
            }
        }
    }

    async fn subscribe(&self, sink: EventSink) {
        let Some(wallet) = self.wallet() else {
            return;
        };
        let signals = wallet.signals();
        self.subscription.attach(self.kind, signals, sink, self.settle, move || {
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
        // EIP-1193 has no disconnect request; dropping the listener is all there is.
        self.subscription.cancel();
    }
}
