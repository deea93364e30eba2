//! Chain identifiers and descriptors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::provider::ProviderKind;

/// Identifier of a blockchain network.
///
/// EVM networks are numbered (`1`, `56`, `137`, ...). Tron and Solana have no
/// EIP-155 id and are identified by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChainId {
    /// EIP-155 numeric chain id.
    Evm(u64),
    /// Named chain (`"tron"`, `"solana"`).
    Named(String),
}

impl ChainId {
    /// Chain id used for Tron.
    #[must_use]
    pub fn tron() -> Self {
        Self::Named("tron".to_owned())
    }

    /// Chain id used for Solana.
    #[must_use]
    pub fn solana() -> Self {
        Self::Named("solana".to_owned())
    }

    /// Parses an EVM chain id delivered either as decimal (`"56"`) or as
    /// `0x`-prefixed hex (`"0x38"`).
    #[must_use]
    pub fn parse_evm(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let parsed = if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
            u64::from_str_radix(hex, 16).ok()
        } else {
            raw.parse::<u64>().ok()
        };
        parsed.map(Self::Evm)
    }

    /// Returns the numeric id for EVM chains.
    #[must_use]
    pub const fn as_evm(&self) -> Option<u64> {
        match self {
            Self::Evm(id) => Some(*id),
            Self::Named(_) => None,
        }
    }

    /// Returns the `0x`-prefixed hex form used by EIP-1193 requests.
    #[must_use]
    pub fn to_hex(&self) -> Option<String> {
        self.as_evm().map(|id| format!("{id:#x}"))
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Evm(id) => write!(f, "{id}"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self::Evm(id)
    }
}

impl FromStr for ChainId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty chain id".to_owned());
        }
        Ok(Self::parse_evm(s).unwrap_or_else(|| Self::Named(s.to_ascii_lowercase())))
    }
}

/// Family of a chain, which decides the address format and wallet API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainKind {
    /// EVM-compatible chain.
    Evm,
    /// Tron.
    Tron,
    /// Solana.
    Solana,
}

impl fmt::Display for ChainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Evm => "evm",
            Self::Tron => "tron",
            Self::Solana => "solana",
        })
    }
}

/// Native currency metadata of a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    /// Currency name (e.g., "Binance coin").
    pub name: String,
    /// Ticker symbol (e.g., "BNB").
    pub symbol: String,
    /// Decimal places.
    pub decimals: u8,
}

impl NativeCurrency {
    /// Create native currency metadata.
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
        }
    }
}

/// Static description of a supported network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainDescriptor {
    /// Chain identifier.
    pub chain_id: ChainId,
    /// Display name (e.g., "Binance Smart Chain").
    pub name: String,
    /// URL slug (e.g., "bsc").
    pub slug: String,
    /// Chain family.
    pub kind: ChainKind,
    /// Native currency.
    pub native_currency: NativeCurrency,
    /// Public RPC endpoints.
    #[serde(default)]
    pub rpc_urls: Vec<String>,
    /// Block explorer URLs.
    #[serde(default)]
    pub explorer_urls: Vec<String>,
    /// Provider kinds allowed to drive this chain.
    #[serde(default)]
    pub providers: Vec<ProviderKind>,
    /// Base URL of the explorer/indexer API serving this chain's data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explorer_api: Option<String>,
}

impl ChainDescriptor {
    /// Returns `true` if `kind` may drive this chain.
    #[must_use]
    pub fn allows(&self, kind: ProviderKind) -> bool {
        self.providers.contains(&kind)
    }

    /// Returns the provider kind when exactly one may drive this chain.
    #[must_use]
    pub fn sole_provider(&self) -> Option<ProviderKind> {
        match self.providers.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Parameters for `wallet_addEthereumChain`, for EVM chains only.
    #[must_use]
    pub fn add_chain_params(&self) -> Option<Value> {
        let chain_id = self.chain_id.to_hex()?;
        Some(json!({
            "chainId": chain_id,
            "chainName": self.name,
            "nativeCurrency": {
                "name": self.native_currency.name,
                "symbol": self.native_currency.symbol,
                "decimals": self.native_currency.decimals,
            },
            "rpcUrls": self.rpc_urls,
            "blockExplorerUrls": self.explorer_urls,
        }))
    }
}
