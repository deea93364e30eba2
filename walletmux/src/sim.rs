//! Simulated wallets.
//!
//! In-process implementations of every wallet API trait, driven from code:
//! tests and the CLI's `simulate` command use them to reproduce handshakes,
//! rejections and out-of-band account or network changes.
//!
//! Every simulated wallet is a cheap handle; clones share state, so a test can
//! keep one clone and hand another to a [`SimHost`].

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::broadcast;

use crate::error::{ProviderError, ProviderResult};
use crate::network::ChainId;
use crate::provider::{
    BinanceChainWallet, Eip1193, PhantomWallet, ProviderKind, TronLinkResponse, TronLinkWallet,
    WalletConnectConnector, WalletConnectOptions, WalletConnectSession, WalletHost, WalletSignal,
};

const SIGNAL_CAPACITY: usize = 32;

/// Sample EVM address.
pub const SAMPLE_EVM_ADDRESS: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
/// Sample Tron address.
pub const SAMPLE_TRON_ADDRESS: &str = "TLa2f6VPqDgRE67v1736s7bJ8Ray5wYjU7";
/// Sample Solana public key.
pub const SAMPLE_SOLANA_KEY: &str = "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin";

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

fn hex(chain: u64) -> String {
    format!("{chain:#x}")
}

fn emit(signals: &broadcast::Sender<WalletSignal>, signal: WalletSignal) {
    // No subscribers is fine.
    let _ = signals.send(signal);
}

fn rejected() -> ProviderError {
    ProviderError::rpc(ProviderError::USER_REJECTED, "User rejected the request.")
}

// ============================================================================
// EIP-1193 wallet
// ============================================================================

#[derive(Debug)]
struct EvmState {
    address: String,
    chain: u64,
    known: BTreeSet<u64>,
    connected: bool,
    reject_connect: bool,
    reject_switch: bool,
    requests: Vec<String>,
}

/// Simulated MetaMask-style wallet.
#[derive(Debug, Clone)]
pub struct SimEvmWallet {
    state: Arc<Mutex<EvmState>>,
    signals: broadcast::Sender<WalletSignal>,
}

impl SimEvmWallet {
    /// Wallet holding `address` on `chain`. Knows Ethereum and its testnets
    /// out of the box.
    pub fn new(address: impl Into<String>, chain: u64) -> Self {
        let known = [1, 3, 4, 5, 42, chain].into_iter().collect();
        let (signals, _) = broadcast::channel(SIGNAL_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(EvmState {
                address: address.into(),
                chain,
                known,
                connected: false,
                reject_connect: false,
                reject_switch: false,
                requests: Vec::new(),
            })),
            signals,
        }
    }

    /// Replace the set of chains the wallet knows without
    /// `wallet_addEthereumChain`. The current chain is always known.
    #[must_use]
    pub fn with_known_chains(self, chains: impl IntoIterator<Item = u64>) -> Self {
        {
            let mut state = lock(&self.state);
            state.known = chains.into_iter().collect();
            let current = state.chain;
            state.known.insert(current);
        }
        self
    }

    /// Make `eth_requestAccounts` fail.
    pub fn reject_connect(&self, reject: bool) {
        lock(&self.state).reject_connect = reject;
    }

    /// Make switch and add-chain requests fail.
    pub fn reject_switch(&self, reject: bool) {
        lock(&self.state).reject_switch = reject;
    }

    /// Move to `chain` as if the user picked it in the wallet.
    pub fn set_chain(&self, chain: u64) {
        {
            let mut state = lock(&self.state);
            state.chain = chain;
            state.known.insert(chain);
        }
        emit(&self.signals, WalletSignal::ChainChanged(hex(chain)));
    }

    /// Select another account as if the user picked it in the wallet.
    pub fn set_account(&self, address: impl Into<String>) {
        let address = address.into();
        lock(&self.state).address.clone_from(&address);
        emit(&self.signals, WalletSignal::AccountsChanged(vec![address]));
    }

    /// Disconnect the site from the wallet.
    pub fn lock_accounts(&self) {
        lock(&self.state).connected = false;
        emit(&self.signals, WalletSignal::AccountsChanged(Vec::new()));
    }

    /// Current chain.
    #[must_use]
    pub fn chain(&self) -> u64 {
        lock(&self.state).chain
    }

    /// Methods requested so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        lock(&self.state).requests.clone()
    }

    fn target_chain(params: &Value) -> ProviderResult<u64> {
        params[0]["chainId"]
            .as_str()
            .and_then(ChainId::parse_evm)
            .and_then(|id| id.as_evm())
            .ok_or_else(|| ProviderError::rpc(-32602, "invalid chainId"))
    }
}

#[async_trait]
impl Eip1193 for SimEvmWallet {
    async fn request(&self, method: &str, params: Value) -> ProviderResult<Value> {
        let mut state = lock(&self.state);
        state.requests.push(method.to_owned());

        match method {
            "eth_requestAccounts" => {
                if state.reject_connect {
                    return Err(rejected());
                }
                state.connected = true;
                Ok(json!([state.address]))
            }
            "eth_accounts" => Ok(if state.connected {
                json!([state.address])
            } else {
                json!([])
            }),
            "eth_chainId" => Ok(json!(hex(state.chain))),
            "wallet_switchEthereumChain" => {
                if state.reject_switch {
                    return Err(rejected());
                }
                let chain = Self::target_chain(&params)?;
                if !state.known.contains(&chain) {
                    return Err(ProviderError::rpc(
                        ProviderError::UNRECOGNIZED_CHAIN,
                        format!("Unrecognized chain ID \"{}\"", hex(chain)),
                    ));
                }
                state.chain = chain;
                drop(state);
                emit(&self.signals, WalletSignal::ChainChanged(hex(chain)));
                Ok(Value::Null)
            }
            "wallet_addEthereumChain" => {
                if state.reject_switch {
                    return Err(rejected());
                }
                let chain = Self::target_chain(&params)?;
                state.known.insert(chain);
                Ok(Value::Null)
            }
            other => Err(ProviderError::rpc(-32601, format!("method {other} not supported"))),
        }
    }

    async fn chain_id(&self) -> Option<String> {
        Some(hex(lock(&self.state).chain))
    }

    async fn selected_address(&self) -> Option<String> {
        let state = lock(&self.state);
        (state.connected && !state.address.is_empty()).then(|| state.address.clone())
    }

    fn signals(&self) -> broadcast::Receiver<WalletSignal> {
        self.signals.subscribe()
    }
}

// ============================================================================
// Binance Chain Wallet
// ============================================================================

#[derive(Debug)]
struct BinanceState {
    address: String,
    chain: u64,
    active: bool,
    reject_connect: bool,
    reject_switch: bool,
}

/// Simulated Binance Chain Wallet.
#[derive(Debug, Clone)]
pub struct SimBinanceWallet {
    state: Arc<Mutex<BinanceState>>,
    signals: broadcast::Sender<WalletSignal>,
}

impl SimBinanceWallet {
    /// Wallet holding `address` on `chain`.
    pub fn new(address: impl Into<String>, chain: u64) -> Self {
        let (signals, _) = broadcast::channel(SIGNAL_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(BinanceState {
                address: address.into(),
                chain,
                active: false,
                reject_connect: false,
                reject_switch: false,
            })),
            signals,
        }
    }

    /// Make activation fail.
    pub fn reject_connect(&self, reject: bool) {
        lock(&self.state).reject_connect = reject;
    }

    /// Make network switches fail.
    pub fn reject_switch(&self, reject: bool) {
        lock(&self.state).reject_switch = reject;
    }

    /// Move to `chain` as if the user picked it in the wallet.
    pub fn set_chain(&self, chain: u64) {
        lock(&self.state).chain = chain;
        emit(&self.signals, WalletSignal::ChainChanged(hex(chain)));
    }

    /// Current chain.
    #[must_use]
    pub fn chain(&self) -> u64 {
        lock(&self.state).chain
    }
}

#[async_trait]
impl BinanceChainWallet for SimBinanceWallet {
    async fn activate(&self) -> ProviderResult<()> {
        let mut state = lock(&self.state);
        if state.reject_connect {
            return Err(ProviderError::Rejected("activation declined".into()));
        }
        state.active = true;
        Ok(())
    }

    async fn account(&self) -> Option<String> {
        let state = lock(&self.state);
        state.active.then(|| state.address.clone())
    }

    async fn chain_id(&self) -> Option<String> {
        Some(hex(lock(&self.state).chain))
    }

    async fn switch_network(&self, network_id: &str) -> ProviderResult<()> {
        let chain = match network_id {
            "bsc-mainnet" => 56,
            "bsc-testnet" => 97,
            other => return Err(ProviderError::Unexpected(format!("unknown network {other}"))),
        };
        {
            let mut state = lock(&self.state);
            if state.reject_switch {
                return Err(ProviderError::Rejected("switch declined".into()));
            }
            state.chain = chain;
        }
        emit(&self.signals, WalletSignal::ChainChanged(hex(chain)));
        Ok(())
    }

    fn signals(&self) -> broadcast::Receiver<WalletSignal> {
        self.signals.subscribe()
    }

    async fn deactivate(&self) {
        lock(&self.state).active = false;
    }
}

// ============================================================================
// WalletConnect
// ============================================================================

#[derive(Debug)]
struct WcState {
    address: String,
    chain: u64,
    open: bool,
    reject_connect: bool,
}

/// Simulated WalletConnect connector and remote wallet.
#[derive(Debug, Clone)]
pub struct SimWalletConnect {
    state: Arc<Mutex<WcState>>,
    signals: broadcast::Sender<WalletSignal>,
}

impl SimWalletConnect {
    /// Remote wallet holding `address` on `chain`.
    pub fn new(address: impl Into<String>, chain: u64) -> Self {
        let (signals, _) = broadcast::channel(SIGNAL_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(WcState {
                address: address.into(),
                chain,
                open: false,
                reject_connect: false,
            })),
            signals,
        }
    }

    /// Make pairing fail.
    pub fn reject_connect(&self, reject: bool) {
        lock(&self.state).reject_connect = reject;
    }

    /// The remote wallet switches network on its own.
    pub fn set_chain(&self, chain: u64) {
        lock(&self.state).chain = chain;
        emit(&self.signals, WalletSignal::ChainChanged(hex(chain)));
    }

    /// The remote wallet ends the session.
    pub fn close(&self) {
        lock(&self.state).open = false;
        emit(&self.signals, WalletSignal::Close);
    }

    /// Current chain.
    #[must_use]
    pub fn chain(&self) -> u64 {
        lock(&self.state).chain
    }

    /// Whether no session is open.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        !lock(&self.state).open
    }
}

#[async_trait]
impl WalletConnectConnector for SimWalletConnect {
    async fn open(
        &self,
        _options: &WalletConnectOptions,
    ) -> ProviderResult<Arc<dyn WalletConnectSession>> {
        {
            let mut state = lock(&self.state);
            if state.reject_connect {
                return Err(ProviderError::Rejected("pairing declined".into()));
            }
            state.open = true;
        }
        Ok(Arc::new(self.clone()))
    }
}

#[async_trait]
impl WalletConnectSession for SimWalletConnect {
    async fn accounts(&self) -> Vec<String> {
        let state = lock(&self.state);
        if state.open {
            vec![state.address.clone()]
        } else {
            Vec::new()
        }
    }

    async fn chain_id(&self) -> Option<u64> {
        Some(lock(&self.state).chain)
    }

    fn signals(&self) -> broadcast::Receiver<WalletSignal> {
        self.signals.subscribe()
    }

    async fn disconnect(&self) -> ProviderResult<()> {
        lock(&self.state).open = false;
        Ok(())
    }
}

// ============================================================================
// TronLink
// ============================================================================

#[derive(Debug)]
struct TronState {
    address: String,
    ready: bool,
    reject_connect: bool,
}

/// Simulated TronLink.
#[derive(Debug, Clone)]
pub struct SimTronLink {
    state: Arc<Mutex<TronState>>,
    signals: broadcast::Sender<WalletSignal>,
}

impl SimTronLink {
    /// Wallet holding base58 `address`.
    pub fn new(address: impl Into<String>) -> Self {
        let (signals, _) = broadcast::channel(SIGNAL_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(TronState {
                address: address.into(),
                ready: false,
                reject_connect: false,
            })),
            signals,
        }
    }

    /// Make `tron_requestAccounts` answer with a refusal code.
    pub fn reject_connect(&self, reject: bool) {
        lock(&self.state).reject_connect = reject;
    }

    /// Select another account (`setAccount` message).
    pub fn set_account(&self, address: impl Into<String>) {
        let address = address.into();
        lock(&self.state).address.clone_from(&address);
        emit(&self.signals, WalletSignal::Account(address));
    }
}

#[async_trait]
impl TronLinkWallet for SimTronLink {
    async fn request_accounts(&self) -> ProviderResult<TronLinkResponse> {
        let mut state = lock(&self.state);
        if state.reject_connect {
            return Ok(TronLinkResponse {
                code: ProviderError::USER_REJECTED,
                message: "User rejected the request".into(),
            });
        }
        state.ready = true;
        Ok(TronLinkResponse {
            code: TronLinkResponse::APPROVED,
            message: "The site is already in the whitelist".into(),
        })
    }

    async fn default_address(&self) -> Option<String> {
        let state = lock(&self.state);
        state.ready.then(|| state.address.clone())
    }

    fn signals(&self) -> broadcast::Receiver<WalletSignal> {
        self.signals.subscribe()
    }
}

// ============================================================================
// Phantom
// ============================================================================

#[derive(Debug)]
struct PhantomState {
    key: String,
    connected: bool,
    reject_connect: bool,
}

/// Simulated Phantom.
#[derive(Debug, Clone)]
pub struct SimPhantom {
    state: Arc<Mutex<PhantomState>>,
    signals: broadcast::Sender<WalletSignal>,
}

impl SimPhantom {
    /// Wallet holding public key `key`.
    pub fn new(key: impl Into<String>) -> Self {
        let (signals, _) = broadcast::channel(SIGNAL_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(PhantomState {
                key: key.into(),
                connected: false,
                reject_connect: false,
            })),
            signals,
        }
    }

    /// Make `connect()` fail.
    pub fn reject_connect(&self, reject: bool) {
        lock(&self.state).reject_connect = reject;
    }

    /// Select another account (`accountChanged` event).
    pub fn set_account(&self, key: impl Into<String>) {
        let key = key.into();
        lock(&self.state).key.clone_from(&key);
        emit(&self.signals, WalletSignal::Account(key));
    }

    /// Whether the site is connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        lock(&self.state).connected
    }
}

#[async_trait]
impl PhantomWallet for SimPhantom {
    async fn connect(&self) -> ProviderResult<String> {
        let mut state = lock(&self.state);
        if state.reject_connect {
            return Err(ProviderError::Rejected("User rejected the request.".into()));
        }
        state.connected = true;
        Ok(state.key.clone())
    }

    async fn public_key(&self) -> Option<String> {
        let state = lock(&self.state);
        state.connected.then(|| state.key.clone())
    }

    fn signals(&self) -> broadcast::Receiver<WalletSignal> {
        self.signals.subscribe()
    }

    async fn disconnect(&self) -> ProviderResult<()> {
        lock(&self.state).connected = false;
        emit(&self.signals, WalletSignal::Close);
        Ok(())
    }
}

// ============================================================================
// Host
// ============================================================================

/// A [`WalletHost`] serving simulated wallets.
#[derive(Clone, Default)]
pub struct SimHost {
    ethereum: Option<Arc<dyn Eip1193>>,
    okexchain: Option<Arc<dyn Eip1193>>,
    binance_chain: Option<Arc<dyn BinanceChainWallet>>,
    tron_link: Option<Arc<dyn TronLinkWallet>>,
    solana: Option<Arc<dyn PhantomWallet>>,
    wallet_connect: Option<Arc<dyn WalletConnectConnector>>,
}

impl std::fmt::Debug for SimHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimHost")
            .field("ethereum", &self.ethereum.is_some())
            .field("okexchain", &self.okexchain.is_some())
            .field("binance_chain", &self.binance_chain.is_some())
            .field("tron_link", &self.tron_link.is_some())
            .field("solana", &self.solana.is_some())
            .field("wallet_connect", &self.wallet_connect.is_some())
            .finish()
    }
}

impl SimHost {
    /// Start building a host.
    #[must_use]
    pub fn builder() -> SimHostBuilder {
        SimHostBuilder::default()
    }

    /// A host with one wallet serving `kind`, placed on `chain` where the
    /// wallet lets the user pick a network.
    ///
    /// Returns `None` when `chain` is not numeric for an EVM kind.
    #[must_use]
    pub fn with_wallet(kind: ProviderKind, chain: &ChainId) -> Option<(Self, SimWallet)> {
        let builder = Self::builder();
        let (builder, wallet) = match kind {
            ProviderKind::InjectedEvm | ProviderKind::AltEvm => {
                let wallet = SimEvmWallet::new(SAMPLE_EVM_ADDRESS, chain.as_evm()?);
                let builder = if kind == ProviderKind::InjectedEvm {
                    builder.ethereum(wallet.clone())
                } else {
                    builder.okexchain(wallet.clone())
                };
                (builder, SimWallet::Evm(wallet))
            }
            ProviderKind::ExchangeWallet => {
                let wallet = SimBinanceWallet::new(SAMPLE_EVM_ADDRESS, chain.as_evm()?);
                (builder.binance_chain(wallet.clone()), SimWallet::Exchange(wallet))
            }
            ProviderKind::WalletConnect => {
                let wallet = SimWalletConnect::new(SAMPLE_EVM_ADDRESS, chain.as_evm()?);
                (builder.wallet_connect(wallet.clone()), SimWallet::WalletConnect(wallet))
            }
            ProviderKind::TronExtension => {
                let wallet = SimTronLink::new(SAMPLE_TRON_ADDRESS);
                (builder.tron_link(wallet.clone()), SimWallet::Tron(wallet))
            }
            ProviderKind::SolanaExtension => {
                let wallet = SimPhantom::new(SAMPLE_SOLANA_KEY);
                (builder.solana(wallet.clone()), SimWallet::Phantom(wallet))
            }
        };
        Some((builder.build(), wallet))
    }
}

impl WalletHost for SimHost {
    fn ethereum(&self) -> Option<Arc<dyn Eip1193>> {
        self.ethereum.clone()
    }

    fn okexchain(&self) -> Option<Arc<dyn Eip1193>> {
        self.okexchain.clone()
    }

    fn binance_chain(&self) -> Option<Arc<dyn BinanceChainWallet>> {
        self.binance_chain.clone()
    }

    fn tron_link(&self) -> Option<Arc<dyn TronLinkWallet>> {
        self.tron_link.clone()
    }

    fn solana(&self) -> Option<Arc<dyn PhantomWallet>> {
        self.solana.clone()
    }

    fn wallet_connect(&self) -> Option<Arc<dyn WalletConnectConnector>> {
        self.wallet_connect.clone()
    }
}

/// Builder for [`SimHost`].
#[derive(Default)]
pub struct SimHostBuilder {
    host: SimHost,
}

impl std::fmt::Debug for SimHostBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimHostBuilder")
            .field("host", &self.host)
            .finish()
    }
}

impl SimHostBuilder {
    /// Install an injected wallet at `ethereum`.
    #[must_use]
    pub fn ethereum(mut self, wallet: impl Eip1193 + 'static) -> Self {
        self.host.ethereum = Some(Arc::new(wallet));
        self
    }

    /// Install an injected wallet at `okexchain`.
    #[must_use]
    pub fn okexchain(mut self, wallet: impl Eip1193 + 'static) -> Self {
        self.host.okexchain = Some(Arc::new(wallet));
        self
    }

    /// Install a Binance Chain Wallet.
    #[must_use]
    pub fn binance_chain(mut self, wallet: impl BinanceChainWallet + 'static) -> Self {
        self.host.binance_chain = Some(Arc::new(wallet));
        self
    }

    /// Install TronLink.
    #[must_use]
    pub fn tron_link(mut self, wallet: impl TronLinkWallet + 'static) -> Self {
        self.host.tron_link = Some(Arc::new(wallet));
        self
    }

    /// Install Phantom.
    #[must_use]
    pub fn solana(mut self, wallet: impl PhantomWallet + 'static) -> Self {
        self.host.solana = Some(Arc::new(wallet));
        self
    }

    /// Install a WalletConnect connector.
    #[must_use]
    pub fn wallet_connect(mut self, connector: impl WalletConnectConnector + 'static) -> Self {
        self.host.wallet_connect = Some(Arc::new(connector));
        self
    }

    /// Finish.
    #[must_use]
    pub fn build(self) -> SimHost {
        self.host
    }
}

/// Handle on whichever simulated wallet [`SimHost::with_wallet`] installed.
#[derive(Debug, Clone)]
pub enum SimWallet {
    /// MetaMask or MetaX.
    Evm(SimEvmWallet),
    /// Binance Chain Wallet.
    Exchange(SimBinanceWallet),
    /// WalletConnect remote wallet.
    WalletConnect(SimWalletConnect),
    /// TronLink.
    Tron(SimTronLink),
    /// Phantom.
    Phantom(SimPhantom),
}

impl SimWallet {
    /// Move the wallet to `chain` out of band.
    ///
    /// Returns `false` for wallets bound to one network or non-numeric chains.
    pub fn drift_to(&self, chain: &ChainId) -> bool {
        let Some(id) = chain.as_evm() else {
            return false;
        };
        match self {
            Self::Evm(w) => w.set_chain(id),
            Self::Exchange(w) => w.set_chain(id),
            Self::WalletConnect(w) => w.set_chain(id),
            Self::Tron(_) | Self::Phantom(_) => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_evm_switch_unknown_chain() {
        let wallet = SimEvmWallet::new("0xabc", 1).with_known_chains([1]);
        let err = wallet
            .request("wallet_switchEthereumChain", json!([{ "chainId": "0x38" }]))
            .await
            .unwrap_err();
        assert!(err.is_unrecognized_chain());

        wallet
            .request("wallet_addEthereumChain", json!([{ "chainId": "0x38" }]))
            .await
            .unwrap();
        wallet
            .request("wallet_switchEthereumChain", json!([{ "chainId": "0x38" }]))
            .await
            .unwrap();
        assert_eq!(wallet.chain(), 56);
    }

    #[tokio::test]
    async fn test_evm_accounts_after_handshake() {
        let wallet = SimEvmWallet::new("0xabc", 1);
        assert_eq!(wallet.selected_address().await, None);
        assert_eq!(
            wallet.request("eth_accounts", json!([])).await.unwrap(),
            json!([])
        );
        wallet.request("eth_requestAccounts", json!([])).await.unwrap();
        assert_eq!(wallet.selected_address().await.as_deref(), Some("0xabc"));
        assert_eq!(wallet.chain_id().await.as_deref(), Some("0x1"));
    }

    #[tokio::test]
    async fn test_signals_reach_subscribers() {
        let wallet = SimEvmWallet::new("0xabc", 1);
        let mut rx = wallet.signals();
        wallet.set_chain(137);
        assert_eq!(rx.recv().await.unwrap(), WalletSignal::ChainChanged("0x89".into()));
    }

    #[test]
    fn test_with_wallet() {
        let (host, wallet) = SimHost::with_wallet(ProviderKind::AltEvm, &ChainId::Evm(56)).unwrap();
        assert!(host.okexchain().is_some());
        assert!(host.ethereum().is_none());
        assert!(matches!(wallet, SimWallet::Evm(_)));

        let (host, wallet) =
            SimHost::with_wallet(ProviderKind::TronExtension, &ChainId::tron()).unwrap();
        assert!(host.tron_link().is_some());
        assert!(!wallet.drift_to(&ChainId::Evm(1)));

        assert!(SimHost::with_wallet(ProviderKind::InjectedEvm, &ChainId::tron()).is_none());
    }
}
