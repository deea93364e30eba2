//! Provider kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of wallet providers.
///
/// Each kind maps to exactly one adapter in the
/// [`AdapterRegistry`](super::AdapterRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    /// Injected EVM wallet (MetaMask).
    #[serde(alias = "metamask")]
    InjectedEvm,
    /// WalletConnect bridge.
    #[serde(alias = "walletconnect", alias = "walletConnect")]
    WalletConnect,
    /// Exchange wallet (Binance Chain Wallet).
    #[serde(alias = "bsc_wallet", alias = "bscWallet")]
    ExchangeWallet,
    /// Alternative injected EVM wallet (OKX MetaX).
    #[serde(alias = "okex")]
    AltEvm,
    /// Tron browser extension (TronLink).
    #[serde(alias = "tron_link", alias = "tron")]
    TronExtension,
    /// Solana browser extension (Phantom).
    #[serde(alias = "phantom")]
    SolanaExtension,
}

impl ProviderKind {
    /// All provider kinds in a stable order.
    pub const ALL: [Self; 6] = [
        Self::InjectedEvm,
        Self::WalletConnect,
        Self::ExchangeWallet,
        Self::AltEvm,
        Self::TronExtension,
        Self::SolanaExtension,
    ];

    /// Canonical name, as persisted in the session record.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InjectedEvm => "injected-evm",
            Self::WalletConnect => "wallet-connect",
            Self::ExchangeWallet => "exchange-wallet",
            Self::AltEvm => "alt-evm",
            Self::TronExtension => "tron-extension",
            Self::SolanaExtension => "solana-extension",
        }
    }

    /// Product name of the wallet behind this kind.
    #[must_use]
    pub const fn wallet_name(self) -> &'static str {
        match self {
            Self::InjectedEvm => "MetaMask",
            Self::WalletConnect => "WalletConnect",
            Self::ExchangeWallet => "Binance Wallet",
            Self::AltEvm => "MetaX",
            Self::TronExtension => "TronLink",
            Self::SolanaExtension => "Phantom",
        }
    }

    /// Title and text shown when the handshake with this wallet fails.
    #[must_use]
    pub fn handshake_failure(self) -> (String, String) {
        let name = self.wallet_name();
        match self {
            Self::WalletConnect => (
                "WalletConnect not connected".to_owned(),
                "Please choose supported chain in the wallet and accept connect".to_owned(),
            ),
            Self::TronExtension | Self::SolanaExtension => (
                format!("Not connected to {name}"),
                format!("Please accept connect in the {name} Ext., reload page and try again"),
            ),
            Self::InjectedEvm | Self::ExchangeWallet | Self::AltEvm => (
                format!("Not connected to {name}"),
                format!("Please choose supported chain in the {name} Ext. and accept connect"),
            ),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a provider name does not match any kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown provider: {0}")]
pub struct UnknownProvider(pub String);

impl FromStr for ProviderKind {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "injected-evm" | "metamask" => Ok(Self::InjectedEvm),
            "wallet-connect" | "walletconnect" | "walletConnect" => Ok(Self::WalletConnect),
            "exchange-wallet" | "bsc_wallet" | "bscWallet" => Ok(Self::ExchangeWallet),
            "alt-evm" | "okex" => Ok(Self::AltEvm),
            "tron-extension" | "tron_link" | "tron" => Ok(Self::TronExtension),
            "solana-extension" | "phantom" => Ok(Self::SolanaExtension),
            other => Err(UnknownProvider(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_names_round_trip() {
        for kind in ProviderKind::ALL {
            assert_eq!(kind.as_str().parse::<ProviderKind>(), Ok(kind));
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_legacy_names() {
        assert_eq!("metamask".parse(), Ok(ProviderKind::InjectedEvm));
        assert_eq!("bsc_wallet".parse(), Ok(ProviderKind::ExchangeWallet));
        assert_eq!("okex".parse(), Ok(ProviderKind::AltEvm));
        assert_eq!("phantom".parse(), Ok(ProviderKind::SolanaExtension));

        let kind: ProviderKind = serde_json::from_str("\"tron_link\"").unwrap();
        assert_eq!(kind, ProviderKind::TronExtension);

        assert_eq!(
            "ledger".parse::<ProviderKind>(),
            Err(UnknownProvider("ledger".into()))
        );
    }

    #[test]
    fn test_handshake_failure_text() {
        let (title, text) = ProviderKind::InjectedEvm.handshake_failure();
        assert_eq!(title, "Not connected to MetaMask");
        assert_eq!(
            text,
            "Please choose supported chain in the MetaMask Ext. and accept connect"
        );

        let (title, _) = ProviderKind::WalletConnect.handshake_failure();
        assert_eq!(title, "WalletConnect not connected");

        let (_, text) = ProviderKind::TronExtension.handshake_failure();
        assert!(text.starts_with("Please accept connect in the TronLink Ext."));
    }
}
