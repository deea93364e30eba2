//! Connection controller.
//!
//! Owns the single active adapter and the published [`Identity`]. Explicit
//! operations (connect, switch chain, sign out) and unsolicited wallet events
//! all funnel into one commit path that validates the reported chain against
//! the [`NetworkRegistry`] before anything becomes visible.
//!
//! # Concurrency
//!
//! Every activation gets a generation number. Commits run under one async
//! lock and are discarded when their generation is no longer current, so a
//! connect that was overtaken by a newer connect or a sign-out resolves with
//! a `Superseded` error instead of resurrecting the old session.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::WalletMuxConfig;
use crate::error::{ConnectError, ConnectResult, Result};
use crate::identity::{ConnectionState, Identity};
use crate::network::{ChainDescriptor, ChainId, ChainKind, NetworkRegistry};
use crate::provider::{
    AdapterEvent, AdapterRegistry, EVENT_CHANNEL_CAPACITY, ProviderAdapter, ProviderKind,
    SwitchOutcome, WalletHost, WalletState,
};
use crate::session::{FileSessionStore, SessionRecord, SessionStore};

/// The wallet connection state machine.
///
/// Cheap to clone; all clones share the same session.
#[derive(Clone)]
pub struct ConnectionController {
    inner: Arc<ControllerInner>,
}

impl std::fmt::Debug for ConnectionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionController")
            .field("identity", &*self.inner.identity.borrow())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

struct ActiveProvider {
    kind: ProviderKind,
    adapter: Arc<dyn ProviderAdapter>,
    generation: u64,
}

struct ControllerInner {
    networks: NetworkRegistry,
    adapters: AdapterRegistry,
    store: Arc<dyn SessionStore>,
    active: Mutex<Option<ActiveProvider>>,
    generation: AtomicU64,
    commit: Mutex<()>,
    identity: watch::Sender<Identity>,
    phase: watch::Sender<ConnectionState>,
}

impl ConnectionController {
    /// Create a controller.
    #[must_use]
    pub fn new(
        networks: NetworkRegistry,
        adapters: AdapterRegistry,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        let (identity, _) = watch::channel(Identity::default());
        let (phase, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            inner: Arc::new(ControllerInner {
                networks,
                adapters,
                store,
                active: Mutex::new(None),
                generation: AtomicU64::new(0),
                commit: Mutex::new(()),
                identity,
                phase,
            }),
        }
    }

    /// Create a controller from configuration, persisting to the configured
    /// session file.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured network table is invalid.
    pub fn from_config(config: &WalletMuxConfig, host: Arc<dyn WalletHost>) -> Result<Self> {
        let networks = config.network_registry()?;
        let adapters = AdapterRegistry::with_defaults(
            host,
            config.settle_policy(),
            config.wallet_connect.clone(),
        );
        let store = Arc::new(FileSessionStore::new(config.session_path()));
        Ok(Self::new(networks, adapters, store))
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Connect through `kind`, replacing any active provider.
    ///
    /// Fails fast with `ProviderUnavailable` when the wallet is missing, in
    /// which case the current session is left untouched.
    pub async fn connect(&self, kind: ProviderKind) -> ConnectResult {
        let inner = &self.inner;
        inner.identity.send_if_modified(|id| std::mem::take(&mut id.unknown_chain));

        let Some(adapter) = inner.adapters.create(kind) else {
            warn!(provider = %kind, "no adapter registered");
            return Err(ConnectError::unknown_provider());
        };
        if !adapter.is_available() {
            info!(provider = %kind, "wallet not available");
            return Err(ConnectError::provider_unavailable(kind));
        }

        let generation = inner.activate(kind, Arc::clone(&adapter)).await;
        info!(provider = %kind, generation, "connecting");

        let state = match adapter.connect().await {
            Ok(state) => state,
            Err(e) => {
                info!(provider = %kind, error = %e, "connect failed");
                inner.abandon(generation, adapter.as_ref()).await;
                return Err(e);
            }
        };

        Arc::clone(inner).complete(kind, generation, adapter, state).await
    }

    /// Replace the active provider with `kind`.
    pub async fn switch_provider(&self, kind: ProviderKind) -> ConnectResult {
        debug!(from = ?self.selected_provider(), to = %kind, "switching provider");
        self.connect(kind).await
    }

    /// Connect through `kind`, then move to `network`.
    pub async fn switch_provider_to_network(&self, kind: ProviderKind, network: &str) -> ConnectResult {
        self.connect(kind).await?;
        self.switch_chain(network).await
    }

    /// Move the active provider to the network named `network` (slug or
    /// display name).
    ///
    /// Only valid once a provider is connected. The identity is only updated
    /// once the wallet confirms the switch.
    pub async fn switch_chain(&self, network: &str) -> ConnectResult {
        let inner = &self.inner;
        let Some(target) = inner.networks.describe_by_slug_or_name(network).cloned() else {
            return Err(ConnectError::network_not_allowed());
        };

        let (kind, adapter, generation) = {
            let active = inner.active.lock().await;
            let Some(active) = active.as_ref() else {
                return Err(ConnectError::provider_not_connected());
            };
            if !inner.is_connected(active.kind) {
                debug!(provider = %active.kind, "switch requested before handshake finished");
                return Err(ConnectError::provider_not_connected());
            }
            (active.kind, Arc::clone(&active.adapter), active.generation)
        };

        if !target.allows(kind) {
            return Err(ConnectError::wrong_provider(&target.name, target.sole_provider()));
        }

        match adapter.switch_network(&target).await? {
            SwitchOutcome::Unchanged => {
                debug!(provider = %kind, network = %target.slug, "switch accepted without change");
                Ok(())
            }
            SwitchOutcome::Switched => {
                let _commit = inner.commit.lock().await;
                if !inner.is_current(generation) {
                    return Err(ConnectError::superseded());
                }
                if !inner.is_connected(kind) {
                    return Err(ConnectError::provider_not_connected());
                }
                let address = inner.identity.borrow().address.clone();
                inner
                    .apply_locked(kind, WalletState::new(address, target.chain_id.clone()))
                    .await?;
                info!(provider = %kind, network = %target.slug, "network switched");
                Ok(())
            }
        }
    }

    /// Sign out: tear down the adapter, clear the record, reset the identity.
    pub async fn signout(&self) {
        let _commit = self.inner.commit.lock().await;
        self.inner.force_logout_locked(false).await;
        info!("signed out");
    }

    /// Sign out and keep `network` selected with an empty address, so its
    /// public data can be browsed.
    pub async fn select_network_signed_out(&self, network: &str) -> ConnectResult {
        let inner = &self.inner;
        let Some(target) = inner.networks.describe_by_slug_or_name(network) else {
            return Err(ConnectError::network_not_allowed());
        };
        let _commit = inner.commit.lock().await;
        inner.force_logout_locked(false).await;
        inner.identity.send_replace(Identity::browsing(target.chain_id.clone()));
        info!(network = %target.slug, "network selected while signed out");
        Ok(())
    }

    /// Resume the persisted session.
    ///
    /// Failures are swallowed. A record whose provider is merely unavailable
    /// is left as persisted; a record that cannot be interpreted, or claims a
    /// session without naming a usable provider, is cleared.
    pub async fn restore(&self) {
        let inner = &self.inner;
        let record = match inner.store.read().await {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "unreadable session record, clearing");
                inner.clear_record().await;
                return;
            }
        };
        if !record.authenticated {
            debug!("no session to restore");
            return;
        }
        let Some(kind) = record.last_provider.filter(|k| inner.adapters.contains(*k)) else {
            warn!(provider = ?record.last_provider, "session names no usable provider, clearing");
            inner.clear_record().await;
            return;
        };

        match self.connect(kind).await {
            Ok(()) => info!(provider = %kind, "session restored"),
            Err(e) => debug!(provider = %kind, error = %e, "session not restored"),
        }
    }

    /// Run [`restore`](Self::restore) in the background.
    #[must_use]
    pub fn spawn_restore(&self) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move { this.restore().await })
    }

    /// Read and clear the unknown-chain flag.
    ///
    /// Returns `true` exactly once after a forced logout caused by an
    /// unsupported chain.
    pub fn take_unknown_chain(&self) -> bool {
        self.inner
            .identity
            .send_if_modified(|id| std::mem::take(&mut id.unknown_chain))
    }

    // ------------------------------------------------------------------
    // Getters
    // ------------------------------------------------------------------

    /// Snapshot of the identity.
    #[must_use]
    pub fn identity(&self) -> Identity {
        self.inner.identity.borrow().clone()
    }

    /// Watch the identity.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Identity> {
        self.inner.identity.subscribe()
    }

    /// Watch the connection state.
    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.phase.subscribe()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        let phase = *self.inner.phase.borrow();
        if phase == ConnectionState::Disconnected && self.is_unknown_chain() {
            ConnectionState::UnknownChain
        } else {
            phase
        }
    }

    /// Selected account, empty when signed out.
    #[must_use]
    pub fn selected_address(&self) -> String {
        self.inner.identity.borrow().address.clone()
    }

    /// Active chain.
    #[must_use]
    pub fn chain_id(&self) -> Option<ChainId> {
        self.inner.identity.borrow().chain_id.clone()
    }

    /// Whether an account is connected.
    #[must_use]
    pub fn is_auth(&self) -> bool {
        self.inner.identity.borrow().is_auth()
    }

    /// Whether the unknown-chain flag is set.
    #[must_use]
    pub fn is_unknown_chain(&self) -> bool {
        self.inner.identity.borrow().unknown_chain
    }

    /// Descriptor of the active chain.
    #[must_use]
    pub fn selected_network(&self) -> Option<ChainDescriptor> {
        let chain_id = self.chain_id()?;
        self.inner.networks.describe(&chain_id).cloned()
    }

    /// Display name of the active chain.
    #[must_use]
    pub fn selected_network_name(&self) -> Option<String> {
        self.selected_network().map(|c| c.name)
    }

    /// Slug of the active chain.
    #[must_use]
    pub fn selected_network_slug(&self) -> Option<String> {
        self.selected_network().map(|c| c.slug)
    }

    /// Family of the active chain.
    #[must_use]
    pub fn selected_network_kind(&self) -> Option<ChainKind> {
        self.selected_network().map(|c| c.kind)
    }

    /// Active provider.
    #[must_use]
    pub fn selected_provider(&self) -> Option<ProviderKind> {
        self.inner.identity.borrow().provider
    }

    /// Product name of the active provider's wallet.
    #[must_use]
    pub fn selected_provider_name(&self) -> Option<&'static str> {
        self.selected_provider().map(ProviderKind::wallet_name)
    }

    /// Network table in use.
    #[must_use]
    pub fn networks(&self) -> &NetworkRegistry {
        &self.inner.networks
    }
}

impl ControllerInner {
    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn is_connected(&self, kind: ProviderKind) -> bool {
        *self.phase.borrow() == ConnectionState::Connected(kind)
    }

    /// Tear down the previous adapter and install `adapter` under a new
    /// generation.
    async fn activate(&self, kind: ProviderKind, adapter: Arc<dyn ProviderAdapter>) -> u64 {
        let _commit = self.commit.lock().await;
        self.teardown_locked().await;

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.active.lock().await = Some(ActiveProvider {
            kind,
            adapter,
            generation,
        });
        self.identity.send_replace(Identity::default());
        self.phase.send_replace(ConnectionState::Connecting(kind));
        generation
    }

    /// Drop a failed activation.
    async fn abandon(&self, generation: u64, adapter: &dyn ProviderAdapter) {
        let _commit = self.commit.lock().await;
        if !self.is_current(generation) {
            release(adapter).await;
            return;
        }
        self.teardown_locked().await;
        self.phase.send_replace(ConnectionState::Disconnected);
    }

    /// Commit a successful handshake, subscribe and persist.
    async fn complete(
        self: Arc<Self>,
        kind: ProviderKind,
        generation: u64,
        adapter: Arc<dyn ProviderAdapter>,
        state: WalletState,
    ) -> ConnectResult {
        let _commit = self.commit.lock().await;
        if !self.is_current(generation) {
            debug!(provider = %kind, generation, "connect superseded");
            release(adapter.as_ref()).await;
            return Err(ConnectError::superseded());
        }

        self.apply_locked(kind, state).await?;

        let (sink, events) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        adapter.subscribe(sink).await;
        tokio::spawn(pump(Arc::downgrade(&self), generation, events));

        if let Err(e) = self.store.write(&SessionRecord::signed_in(kind)).await {
            warn!(provider = %kind, error = %e, "failed to persist session record");
        }
        info!(provider = %kind, chain_id = ?self.identity.borrow().chain_id, "connected");
        Ok(())
    }

    /// The single commit path. Caller holds the commit lock.
    ///
    /// Writes address and chain together, or forces a logout with the
    /// unknown-chain flag when `kind` may not drive the reported chain.
    async fn apply_locked(&self, kind: ProviderKind, state: WalletState) -> ConnectResult {
        if !self.networks.is_supported_by(&state.chain_id, kind) {
            warn!(provider = %kind, chain_id = %state.chain_id, "unsupported network, logging out");
            self.force_logout_locked(true).await;
            return Err(ConnectError::unsupported_network(kind));
        }

        let chain_id = state.chain_id.clone();
        self.identity.send_if_modified(|id| {
            let next = Identity::connected(kind, state);
            if *id == next {
                false
            } else {
                *id = next;
                true
            }
        });
        self.phase.send_replace(ConnectionState::Connected(kind));
        debug!(provider = %kind, chain_id = %chain_id, "identity committed");
        Ok(())
    }

    /// Handle an event from the adapter of `generation`.
    ///
    /// Returns `false` once the event stream should stop.
    async fn handle_event(&self, generation: u64, event: AdapterEvent) -> bool {
        let _commit = self.commit.lock().await;
        if !self.is_current(generation) {
            return false;
        }
        let kind = match self.active.lock().await.as_ref() {
            Some(active) => active.kind,
            None => return false,
        };

        match event {
            AdapterEvent::Changed(state) => self.apply_locked(kind, state).await.is_ok(),
            AdapterEvent::Closed => {
                warn!(provider = %kind, "wallet session closed, logging out");
                self.force_logout_locked(false).await;
                false
            }
        }
    }

    /// Invalidate in-flight work, tear down, reset identity, clear the record.
    async fn force_logout_locked(&self, unknown_chain: bool) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.teardown_locked().await;
        self.identity.send_replace(Identity {
            unknown_chain,
            ..Identity::default()
        });
        self.phase.send_replace(ConnectionState::Disconnected);
        self.clear_record().await;
    }

    async fn teardown_locked(&self) {
        let previous = self.active.lock().await.take();
        if let Some(active) = previous {
            active.adapter.unsubscribe();
            active.adapter.disconnect().await;
            debug!(provider = %active.kind, generation = active.generation, "adapter torn down");
        }
    }

    async fn clear_record(&self) {
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "failed to clear session record");
        }
    }
}

/// Tear down an adapter whose activation was overtaken. Its handshake may
/// have opened a session after the regular teardown already ran.
async fn release(adapter: &dyn ProviderAdapter) {
    adapter.unsubscribe();
    adapter.disconnect().await;
    debug!(provider = %adapter.kind(), "stale adapter released");
}

/// Feed adapter events into the commit path until the stream ends or the
/// generation goes stale.
async fn pump(
    inner: Weak<ControllerInner>,
    generation: u64,
    mut events: mpsc::Receiver<AdapterEvent>,
) {
    while let Some(event) = events.recv().await {
        let Some(inner) = inner.upgrade() else {
            break;
        };
        if !inner.handle_event(generation, event).await {
            break;
        }
    }
    debug!(generation, "event pump stopped");
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::error::{ConnectErrorKind, ProviderResult};
    use crate::provider::{
        SettlePolicy, WalletConnectConnector, WalletConnectOptions, WalletConnectSession,
    };
    use crate::session::MemorySessionStore;
    use crate::sim::{SimEvmWallet, SimHost, SimWalletConnect};

    /// Pairing that takes a while to be approved.
    struct SlowPairing(SimWalletConnect);

    #[async_trait]
    impl WalletConnectConnector for SlowPairing {
        async fn open(
            &self,
            options: &WalletConnectOptions,
        ) -> ProviderResult<Arc<dyn WalletConnectSession>> {
            tokio::time::sleep(Duration::from_millis(100)).await;
            self.0.open(options).await
        }
    }

    fn controller(host: SimHost) -> (ConnectionController, Arc<MemorySessionStore>) {
        controller_with(host, SettlePolicy::immediate())
    }

    fn controller_with(
        host: SimHost,
        settle: SettlePolicy,
    ) -> (ConnectionController, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::new());
        let adapters =
            AdapterRegistry::with_defaults(Arc::new(host), settle, WalletConnectOptions::default());
        let controller = ConnectionController::new(
            NetworkRegistry::builtin(),
            adapters,
            Arc::clone(&store) as Arc<dyn SessionStore>,
        );
        (controller, store)
    }

    async fn wait_until(mut check: impl FnMut() -> bool) {
        for _ in 0..200 {
            if check() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached");
    }

    #[tokio::test]
    async fn test_connect_commits_pair_and_record() {
        let wallet = SimEvmWallet::new("0xabc", 56);
        let (controller, store) = controller(SimHost::builder().ethereum(wallet).build());

        controller.connect(ProviderKind::InjectedEvm).await.unwrap();

        assert_eq!(controller.selected_address(), "0xabc");
        assert_eq!(controller.chain_id(), Some(ChainId::Evm(56)));
        assert_eq!(controller.selected_network_slug().as_deref(), Some("bsc"));
        assert_eq!(controller.selected_provider_name(), Some("MetaMask"));
        assert_eq!(controller.state(), ConnectionState::Connected(ProviderKind::InjectedEvm));
        assert_eq!(
            store.read().await.unwrap(),
            SessionRecord::signed_in(ProviderKind::InjectedEvm)
        );
    }

    #[tokio::test]
    async fn test_connect_on_unsupported_chain() {
        let wallet = SimEvmWallet::new("0xabc", 999);
        let (controller, store) = controller(SimHost::builder().ethereum(wallet).build());
        store
            .write(&SessionRecord::signed_in(ProviderKind::AltEvm))
            .await
            .unwrap();

        let err = controller.connect(ProviderKind::InjectedEvm).await.unwrap_err();
        assert_eq!(err.kind, ConnectErrorKind::UnsupportedNetwork);
        assert_eq!(controller.state(), ConnectionState::UnknownChain);
        assert!(!controller.is_auth());
        assert_eq!(store.read().await.unwrap(), SessionRecord::signed_out());

        assert!(controller.take_unknown_chain());
        assert!(!controller.take_unknown_chain());
        assert_eq!(controller.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_switch_chain_prechecks() {
        let wallet = SimEvmWallet::new("0xabc", 1);
        let (controller, _) = controller(SimHost::builder().ethereum(wallet).build());

        let err = controller.switch_chain("bsc").await.unwrap_err();
        assert_eq!(err.kind, ConnectErrorKind::ProviderNotConnected);

        controller.connect(ProviderKind::InjectedEvm).await.unwrap();

        let err = controller.switch_chain("avalanche").await.unwrap_err();
        assert_eq!(err.title, "Network is not allowed");

        let err = controller.switch_chain("tron").await.unwrap_err();
        assert_eq!(err.title, "Wrong provider for Tron");
        assert_eq!(err.text, "Please install and connect TronLink Ext.");
        assert_eq!(controller.chain_id(), Some(ChainId::Evm(1)));
    }

    #[tokio::test]
    async fn test_switch_chain_commits_on_success() {
        let wallet = SimEvmWallet::new("0xabc", 1);
        let (controller, _) = controller(SimHost::builder().ethereum(wallet.clone()).build());
        controller.connect(ProviderKind::InjectedEvm).await.unwrap();

        controller.switch_chain("Polygon").await.unwrap();
        assert_eq!(controller.chain_id(), Some(ChainId::Evm(137)));
        assert_eq!(controller.selected_address(), "0xabc");
        assert_eq!(wallet.chain(), 137);
    }

    #[tokio::test(start_paused = true)]
    async fn test_switch_chain_during_handshake() {
        let wallet = SimEvmWallet::new("0xabc", 1);
        let (controller, _) = controller_with(
            SimHost::builder().ethereum(wallet.clone()).build(),
            SettlePolicy::Fixed(Duration::from_millis(100)),
        );

        let (connected, switched) = tokio::join!(
            controller.connect(ProviderKind::InjectedEvm),
            async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                controller.switch_chain("bsc").await
            },
        );

        connected.unwrap();
        assert_eq!(switched.unwrap_err().kind, ConnectErrorKind::ProviderNotConnected);
        assert_eq!(wallet.chain(), 1);
        assert_eq!(controller.selected_address(), "0xabc");
        assert_eq!(controller.chain_id(), Some(ChainId::Evm(1)));
        assert_eq!(controller.state(), ConnectionState::Connected(ProviderKind::InjectedEvm));
    }

    #[tokio::test(start_paused = true)]
    async fn test_overtaken_pairing_is_closed() {
        let wc = SimWalletConnect::new("0xwc", 1);
        let host = SimHost::builder()
            .ethereum(SimEvmWallet::new("0xabc", 1))
            .wallet_connect(SlowPairing(wc.clone()))
            .build();
        let (controller, store) = controller(host);

        let (first, second) = tokio::join!(
            controller.connect(ProviderKind::WalletConnect),
            async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                controller.connect(ProviderKind::InjectedEvm).await
            },
        );

        assert_eq!(first.unwrap_err().kind, ConnectErrorKind::Superseded);
        second.unwrap();
        assert!(wc.is_closed());
        assert_eq!(controller.selected_provider(), Some(ProviderKind::InjectedEvm));
        assert_eq!(
            store.read().await.unwrap(),
            SessionRecord::signed_in(ProviderKind::InjectedEvm)
        );
    }

    #[tokio::test]
    async fn test_unsolicited_account_change() {
        let wallet = SimEvmWallet::new("0xabc", 1);
        let (controller, _) = controller(SimHost::builder().ethereum(wallet.clone()).build());
        controller.connect(ProviderKind::InjectedEvm).await.unwrap();

        wallet.set_account("0xdef");
        wait_until(|| controller.selected_address() == "0xdef").await;
        assert_eq!(controller.chain_id(), Some(ChainId::Evm(1)));
    }

    #[tokio::test]
    async fn test_select_network_signed_out() {
        let wallet = SimEvmWallet::new("0xabc", 1);
        let (controller, store) = controller(SimHost::builder().ethereum(wallet).build());
        controller.connect(ProviderKind::InjectedEvm).await.unwrap();

        controller.select_network_signed_out("bsc").await.unwrap();
        assert!(!controller.is_auth());
        assert_eq!(controller.selected_address(), "");
        assert_eq!(controller.chain_id(), Some(ChainId::Evm(56)));
        assert_eq!(store.read().await.unwrap().resumable(), None);

        let err = controller.select_network_signed_out("nowhere").await.unwrap_err();
        assert_eq!(err.kind, ConnectErrorKind::NetworkNotAllowed);
    }

    #[tokio::test]
    async fn test_signout() {
        let wallet = SimEvmWallet::new("0xabc", 1);
        let (controller, store) = controller(SimHost::builder().ethereum(wallet).build());
        controller.connect(ProviderKind::InjectedEvm).await.unwrap();

        controller.signout().await;
        assert_eq!(controller.identity(), Identity::default());
        assert_eq!(controller.state(), ConnectionState::Disconnected);
        assert_eq!(store.read().await.unwrap(), SessionRecord::signed_out());
    }
}
