//! Wallet provider adapters.
//!
//! Every supported wallet is wrapped by a [`ProviderAdapter`] that hides its
//! API quirks (hex vs decimal chain ids, scalar vs array accounts, bespoke
//! handshakes) behind one uniform contract. Adapters never touch the session
//! identity; they report facts and the controller decides what to commit.

mod binance;
mod dispatch;
mod host;
mod injected;
mod kind;
mod phantom;
mod settle;
mod subscription;
mod tron;
mod wallet_connect;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::{ConnectError, ConnectResult};
use crate::network::{ChainDescriptor, ChainId};

pub use binance::ExchangeWalletAdapter;
pub use dispatch::{AdapterFactory, AdapterRegistry};
pub use host::{
    BinanceChainWallet, Eip1193, EmptyHost, PhantomWallet, TronLinkResponse, TronLinkWallet,
    WalletConnectConnector, WalletConnectOptions, WalletConnectSession, WalletHost, WalletSignal,
};
pub use injected::InjectedAdapter;
pub use kind::{ProviderKind, UnknownProvider};
pub use phantom::PhantomAdapter;
pub use settle::{DEFAULT_SETTLE_DELAY, DEFAULT_SETTLE_MS, SettlePolicy};
pub use subscription::Subscription;
pub use tron::TronLinkAdapter;
pub use wallet_connect::WalletConnectAdapter;

/// Capacity of the channel carrying adapter events to the controller.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Normalized `(address, chain id)` pair reported by a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletState {
    /// Selected account.
    pub address: String,
    /// Current chain.
    pub chain_id: ChainId,
}

impl WalletState {
    /// Create a wallet state.
    pub fn new(address: impl Into<String>, chain_id: ChainId) -> Self {
        Self {
            address: address.into(),
            chain_id,
        }
    }
}

/// Result of a successful network switch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The wallet confirmed it moved to the target chain.
    Switched,
    /// The request was accepted but nothing changed yet; the wallet reports
    /// any actual change through its notifications.
    Unchanged,
}

/// Event pushed by an adapter's forwarding task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterEvent {
    /// The wallet changed account or chain.
    Changed(WalletState),
    /// The wallet session ended.
    Closed,
}

/// Receiving end of an adapter subscription.
pub type EventSink = mpsc::Sender<AdapterEvent>;

/// Switch rule for wallets bound to a single network.
fn fixed_network_switch(own: &ChainId, target: &ChainDescriptor) -> ConnectResult<SwitchOutcome> {
    if &target.chain_id == own {
        Ok(SwitchOutcome::Unchanged)
    } else {
        Err(ConnectError::wrong_provider(&target.name, target.sole_provider()))
    }
}

/// Uniform contract over one external wallet.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Provider kind served by this adapter.
    fn kind(&self) -> ProviderKind;

    /// Whether the wallet is present in the host. Never fails.
    fn is_available(&self) -> bool;

    /// Run the handshake and return the settled wallet state.
    async fn connect(&self) -> ConnectResult<WalletState>;

    /// Ask the wallet to move to `target`.
    async fn switch_network(&self, target: &ChainDescriptor) -> ConnectResult<SwitchOutcome>;

    /// Start forwarding wallet notifications into `sink`.
    ///
    /// At most one subscription is live per instance; subscribing again while
    /// one is running is a no-op.
    async fn subscribe(&self, sink: EventSink);

    /// Stop forwarding wallet notifications.
    fn unsubscribe(&self);

    /// Whether a forwarding task is running.
    fn is_subscribed(&self) -> bool;

    /// Best-effort teardown. Errors are logged and swallowed.
    async fn disconnect(&self);
}
