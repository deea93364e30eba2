//! Wallet host capability and the wallet APIs it exposes.
//!
//! Every wallet an adapter talks to is reached through [`WalletHost`]. A host
//! hands out optional handles; a missing handle means the wallet is not
//! installed. Each wallet API is a trait so browsers, native bridges and the
//! [`sim`](crate::sim) wallets plug in the same way.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

use crate::error::ProviderResult;

/// Unsolicited notification from a wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletSignal {
    /// EIP-1193 `accountsChanged`.
    AccountsChanged(Vec<String>),
    /// EIP-1193 `chainChanged`, carrying the raw chain id.
    ChainChanged(String),
    /// Single-account change (TronLink `setAccount`, Phantom `accountChanged`).
    Account(String),
    /// The wallet session ended.
    Close,
}

/// EIP-1193 request interface shared by injected EVM wallets.
#[async_trait]
pub trait Eip1193: Send + Sync {
    /// Issue a JSON-RPC request.
    async fn request(&self, method: &str, params: Value) -> ProviderResult<Value>;

    /// Chain id as the wallet reports it, hex or decimal.
    async fn chain_id(&self) -> Option<String>;

    /// Currently selected account.
    async fn selected_address(&self) -> Option<String>;

    /// Subscribe to wallet notifications.
    fn signals(&self) -> broadcast::Receiver<WalletSignal>;
}

/// Binance Chain Wallet connector.
#[async_trait]
pub trait BinanceChainWallet: Send + Sync {
    /// Ask the wallet for access.
    async fn activate(&self) -> ProviderResult<()>;

    /// Active account.
    async fn account(&self) -> Option<String>;

    /// Chain id as the wallet reports it.
    async fn chain_id(&self) -> Option<String>;

    /// Switch to a wallet network id such as `bsc-mainnet`.
    async fn switch_network(&self, network_id: &str) -> ProviderResult<()>;

    /// Subscribe to wallet notifications.
    fn signals(&self) -> broadcast::Receiver<WalletSignal>;

    /// Release the wallet.
    async fn deactivate(&self);
}

/// Options used to open a WalletConnect session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConnectOptions {
    /// Infura project id for chains served through Infura.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infura_id: Option<String>,
    /// RPC endpoint per EVM chain id.
    #[serde(default)]
    pub rpc: BTreeMap<u64, String>,
}

/// Opens WalletConnect sessions.
#[async_trait]
pub trait WalletConnectConnector: Send + Sync {
    /// Run the pairing flow and return the established session.
    async fn open(&self, options: &WalletConnectOptions)
    -> ProviderResult<Arc<dyn WalletConnectSession>>;
}

/// An established WalletConnect session.
#[async_trait]
pub trait WalletConnectSession: Send + Sync {
    /// Accounts shared by the remote wallet.
    async fn accounts(&self) -> Vec<String>;

    /// Chain id of the remote wallet.
    async fn chain_id(&self) -> Option<u64>;

    /// Subscribe to session notifications.
    fn signals(&self) -> broadcast::Receiver<WalletSignal>;

    /// Close the session.
    async fn disconnect(&self) -> ProviderResult<()>;
}

/// Reply to TronLink's `tron_requestAccounts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TronLinkResponse {
    /// Status code, `200` on approval.
    pub code: i64,
    /// Status message.
    #[serde(default)]
    pub message: String,
}

impl TronLinkResponse {
    /// Code TronLink returns when the user approved access.
    pub const APPROVED: i64 = 200;

    /// Returns `true` if access was granted.
    #[must_use]
    pub const fn is_approved(&self) -> bool {
        self.code == Self::APPROVED
    }
}

/// TronLink extension.
#[async_trait]
pub trait TronLinkWallet: Send + Sync {
    /// Request account access.
    async fn request_accounts(&self) -> ProviderResult<TronLinkResponse>;

    /// Base58 default address.
    async fn default_address(&self) -> Option<String>;

    /// Subscribe to wallet notifications.
    fn signals(&self) -> broadcast::Receiver<WalletSignal>;
}

/// Phantom extension.
#[async_trait]
pub trait PhantomWallet: Send + Sync {
    /// Connect and return the public key.
    async fn connect(&self) -> ProviderResult<String>;

    /// Current public key, if connected.
    async fn public_key(&self) -> Option<String>;

    /// Subscribe to wallet notifications.
    fn signals(&self) -> broadcast::Receiver<WalletSignal>;

    /// Disconnect.
    async fn disconnect(&self) -> ProviderResult<()>;
}

/// Environment in which wallets are discovered.
///
/// All accessors default to `None`, so a host only overrides the wallets it
/// actually provides.
pub trait WalletHost: Send + Sync {
    /// Injected EIP-1193 provider (`window.ethereum`).
    fn ethereum(&self) -> Option<Arc<dyn Eip1193>> {
        None
    }

    /// OKX MetaX provider (`window.okexchain`).
    fn okexchain(&self) -> Option<Arc<dyn Eip1193>> {
        None
    }

    /// Binance Chain Wallet (`window.BinanceChain`).
    fn binance_chain(&self) -> Option<Arc<dyn BinanceChainWallet>> {
        None
    }

    /// TronLink (`window.tronLink`).
    fn tron_link(&self) -> Option<Arc<dyn TronLinkWallet>> {
        None
    }

    /// Phantom (`window.solana`).
    fn solana(&self) -> Option<Arc<dyn PhantomWallet>> {
        None
    }

    /// WalletConnect connector.
    fn wallet_connect(&self) -> Option<Arc<dyn WalletConnectConnector>> {
        None
    }
}

/// A host with no wallets installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyHost;

impl WalletHost for EmptyHost {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_host_has_no_wallets() {
        let host = EmptyHost;
        assert!(host.ethereum().is_none());
        assert!(host.okexchain().is_none());
        assert!(host.binance_chain().is_none());
        assert!(host.tron_link().is_none());
        assert!(host.solana().is_none());
        assert!(host.wallet_connect().is_none());
    }

    #[test]
    fn test_tron_link_response() {
        let resp: TronLinkResponse =
            serde_json::from_str(r#"{"code":200,"message":"The site is already in the whitelist"}"#)
                .unwrap();
        assert!(resp.is_approved());

        let resp: TronLinkResponse = serde_json::from_str(r#"{"code":4001}"#).unwrap();
        assert!(!resp.is_approved());
        assert!(resp.message.is_empty());
    }

    #[test]
    fn test_wallet_connect_options_keys() {
        let options: WalletConnectOptions =
            serde_json::from_str(r#"{"rpc":{"56":"https://bsc-dataseed.binance.org/"}}"#).unwrap();
        assert_eq!(
            options.rpc.get(&56).map(String::as_str),
            Some("https://bsc-dataseed.binance.org/")
        );
        assert!(options.infura_id.is_none());
    }
}
