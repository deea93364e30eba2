//! Dispatch table from provider kind to adapter factory.

use std::collections::HashMap;
use std::sync::Arc;

use super::host::{WalletConnectOptions, WalletHost};
use super::settle::SettlePolicy;
use super::{
    ExchangeWalletAdapter, InjectedAdapter, PhantomAdapter, ProviderAdapter, ProviderKind,
    TronLinkAdapter, WalletConnectAdapter,
};

/// Builds a fresh adapter for one activation.
pub type AdapterFactory = Arc<dyn Fn() -> Arc<dyn ProviderAdapter> + Send + Sync>;

/// Maps each [`ProviderKind`] to the factory that builds its adapter.
///
/// Each activation gets a new adapter instance, so subscription state never
/// leaks from one connection into the next.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    factories: HashMap<ProviderKind, AdapterFactory>,
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.factories.keys().collect();
        kinds.sort();
        f.debug_struct("AdapterRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

impl AdapterRegistry {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with the six built-in adapters over `host`.
    #[must_use]
    pub fn with_defaults(
        host: Arc<dyn WalletHost>,
        settle: SettlePolicy,
        wallet_connect: WalletConnectOptions,
    ) -> Self {
        let mut registry = Self::new();

        let h = Arc::clone(&host);
        registry.register(ProviderKind::InjectedEvm, move || {
            Arc::new(InjectedAdapter::metamask(Arc::clone(&h), settle))
        });
        let h = Arc::clone(&host);
        registry.register(ProviderKind::AltEvm, move || {
            Arc::new(InjectedAdapter::metax(Arc::clone(&h), settle))
        });
        let h = Arc::clone(&host);
        registry.register(ProviderKind::ExchangeWallet, move || {
            Arc::new(ExchangeWalletAdapter::new(Arc::clone(&h), settle))
        });
        let h = Arc::clone(&host);
        registry.register(ProviderKind::WalletConnect, move || {
            Arc::new(WalletConnectAdapter::new(Arc::clone(&h), wallet_connect.clone(), settle))
        });
        let h = Arc::clone(&host);
        registry.register(ProviderKind::TronExtension, move || {
            Arc::new(TronLinkAdapter::new(Arc::clone(&h), settle))
        });
        registry.register(ProviderKind::SolanaExtension, move || {
            Arc::new(PhantomAdapter::new(Arc::clone(&host), settle))
        });

        registry
    }

    /// Install or replace the factory for `kind`.
    pub fn register<F>(&mut self, kind: ProviderKind, factory: F) -> &mut Self
    where
        F: Fn() -> Arc<dyn ProviderAdapter> + Send + Sync + 'static,
    {
        self.factories.insert(kind, Arc::new(factory));
        self
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with_factory<F>(mut self, kind: ProviderKind, factory: F) -> Self
    where
        F: Fn() -> Arc<dyn ProviderAdapter> + Send + Sync + 'static,
    {
        self.register(kind, factory);
        self
    }

    /// Build a new adapter for `kind`.
    #[must_use]
    pub fn create(&self, kind: ProviderKind) -> Option<Arc<dyn ProviderAdapter>> {
        self.factories.get(&kind).map(|factory| factory())
    }

    /// Returns `true` if `kind` has a factory.
    #[must_use]
    pub fn contains(&self, kind: ProviderKind) -> bool {
        self.factories.contains_key(&kind)
    }
}
