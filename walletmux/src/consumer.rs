//! Read-only view for data services.
//!
//! Balance, history and NFT services only need to know which account to query
//! and which explorer API serves the active chain. [`ScopeWatcher`] turns the
//! controller's identity stream into that.

use serde::Serialize;
use tokio::sync::watch;

use crate::controller::ConnectionController;
use crate::identity::Identity;
use crate::network::{ChainDescriptor, NetworkRegistry};

/// What a data request should be scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scope {
    /// Account to query; empty while browsing signed out.
    pub address: String,
    /// Active chain.
    pub chain: ChainDescriptor,
    /// Explorer API base URL for the chain.
    pub explorer_api: Option<String>,
}

impl Scope {
    /// Resolve an identity against the network table.
    ///
    /// Returns `None` when no chain is selected or the chain is unknown.
    #[must_use]
    pub fn resolve(identity: &Identity, networks: &NetworkRegistry) -> Option<Self> {
        let chain = networks.describe(identity.chain_id.as_ref()?)?.clone();
        Some(Self {
            address: identity.address.clone(),
            explorer_api: chain.explorer_api.clone(),
            chain,
        })
    }

    /// Returns `true` if an account is selected.
    #[must_use]
    pub fn has_account(&self) -> bool {
        !self.address.is_empty()
    }
}

/// Yields a fresh [`Scope`] whenever the address or chain changes.
#[derive(Debug)]
pub struct ScopeWatcher {
    identity: watch::Receiver<Identity>,
    networks: NetworkRegistry,
    last: Option<Scope>,
}

impl ScopeWatcher {
    /// Watch `controller`.
    #[must_use]
    pub fn new(controller: &ConnectionController) -> Self {
        let mut identity = controller.subscribe();
        let networks = controller.networks().clone();
        let last = Scope::resolve(&identity.borrow_and_update(), &networks);
        Self {
            identity,
            networks,
            last,
        }
    }

    /// Current scope.
    #[must_use]
    pub fn current(&self) -> Option<Scope> {
        self.last.clone()
    }

    /// Wait for the scope to change.
    ///
    /// Returns `None` once the controller is gone.
    pub async fn changed(&mut self) -> Option<Option<Scope>> {
        loop {
            self.identity.changed().await.ok()?;
            let next = Scope::resolve(&self.identity.borrow_and_update(), &self.networks);
            if next != self.last {
                self.last.clone_from(&next);
                return Some(next);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::ChainId;
    use crate::provider::{ProviderKind, WalletState};

    #[test]
    fn test_resolve() {
        let networks = NetworkRegistry::builtin();

        assert!(Scope::resolve(&Identity::default(), &networks).is_none());

        let id = Identity::connected(
            ProviderKind::InjectedEvm,
            WalletState::new("0xabc", ChainId::Evm(56)),
        );
        let scope = Scope::resolve(&id, &networks).unwrap();
        assert!(scope.has_account());
        assert_eq!(scope.explorer_api.as_deref(), Some("https://api.bscscan.com/api?"));

        let browsing = Scope::resolve(&Identity::browsing(ChainId::tron()), &networks).unwrap();
        assert!(!browsing.has_account());
        assert_eq!(
            browsing.explorer_api.as_deref(),
            Some("https://apilist.tronscan.org/api/")
        );

        let unknown = Identity::browsing(ChainId::Evm(999));
        assert!(Scope::resolve(&unknown, &networks).is_none());
    }
}
