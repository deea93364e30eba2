//! Published session identity.

use serde::Serialize;

use crate::network::ChainId;
use crate::provider::{ProviderKind, WalletState};

/// Who is connected, on which chain, through which provider.
///
/// Published whole through a `watch` channel, so `address` and `chain_id`
/// always change together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Identity {
    /// Selected account; empty when signed out.
    pub address: String,
    /// Active chain. May be set while signed out when a network was picked
    /// for browsing.
    pub chain_id: Option<ChainId>,
    /// Active provider.
    pub provider: Option<ProviderKind>,
    /// Set after a forced logout caused by an unsupported chain, until read.
    pub unknown_chain: bool,
}

impl Identity {
    /// Identity of a live connection.
    #[must_use]
    pub fn connected(kind: ProviderKind, state: WalletState) -> Self {
        Self {
            address: state.address,
            chain_id: Some(state.chain_id),
            provider: Some(kind),
            unknown_chain: false,
        }
    }

    /// Signed out, with a network chosen for browsing.
    #[must_use]
    pub fn browsing(chain_id: ChainId) -> Self {
        Self {
            address: String::new(),
            chain_id: Some(chain_id),
            provider: None,
            unknown_chain: false,
        }
    }

    /// Returns `true` if an account is connected.
    #[must_use]
    pub fn is_auth(&self) -> bool {
        !self.address.is_empty() && self.provider.is_some()
    }
}

/// Connection state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "provider", rename_all = "snake_case")]
pub enum ConnectionState {
    /// No provider active.
    #[default]
    Disconnected,
    /// Handshake in progress.
    Connecting(ProviderKind),
    /// Provider active and on a supported chain.
    Connected(ProviderKind),
    /// Logged out because the wallet reported an unsupported chain; cleared
    /// once the flag is taken or a new connect starts.
    UnknownChain,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_auth() {
        assert!(!Identity::default().is_auth());
        assert!(!Identity::browsing(ChainId::Evm(56)).is_auth());

        let id = Identity::connected(
            ProviderKind::InjectedEvm,
            WalletState::new("0xabc", ChainId::Evm(1)),
        );
        assert!(id.is_auth());
        assert_eq!(id.chain_id, Some(ChainId::Evm(1)));
    }

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_value(ConnectionState::Connected(ProviderKind::AltEvm)).unwrap();
        assert_eq!(json, serde_json::json!({"state": "connected", "provider": "alt-evm"}));

        let json = serde_json::to_value(ConnectionState::Disconnected).unwrap();
        assert_eq!(json, serde_json::json!({"state": "disconnected"}));
    }
}
