//! walletmux - one wallet connection state machine over many wallet providers.
//!
//! A dApp can sign users in through injected EVM wallets (MetaMask, MetaX),
//! WalletConnect, Binance Chain Wallet, TronLink and Phantom. walletmux wraps
//! each behind a uniform adapter, keeps exactly one of them active, and
//! publishes a single identity (address, chain, provider) that downstream data
//! services read.
//!
//! # Architecture
//!
//! - **Networks** ([`network`]) - Static table of supported chains and which
//!   providers may drive each one
//! - **Providers** ([`provider`]) - Wallet API traits and one adapter per
//!   wallet, created through an [`AdapterRegistry`](provider::AdapterRegistry)
//! - **Controller** ([`controller`]) - Connect, switch, sign out and restore,
//!   with every identity change funneled through one validated commit path
//! - **Session** ([`session`]) - Persisted "authenticated / last provider"
//!   record used to resume on the next start
//! - **Consumer** ([`consumer`]) - Read-only scope for balance and history
//!   services
//! - **Sim** ([`sim`]) - Scriptable in-process wallets
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use walletmux::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = load_config().await?;
//!     let controller = ConnectionController::from_config(&config, Arc::new(EmptyHost))?;
//!     controller.restore().await;
//!     if let Err(e) = controller.connect(ProviderKind::InjectedEvm).await {
//!         println!("{}: {}", e.title, e.text);
//!     }
//!     Ok(())
//! }
//! ```

// Core modules
pub mod controller;
pub mod error;
pub mod identity;
pub mod network;
pub mod provider;
pub mod session;

// Supporting modules
pub mod config;
pub mod consumer;
pub mod sim;

/// Prelude module for convenient imports.
pub mod prelude {
    // Error types (centralized)
    pub use crate::error::{
        ConfigError, ConfigResult, ConnectError, ConnectErrorKind, ConnectOutcome, ConnectResult,
        ErrorContext, ProviderError, ProviderResult, RegistryError, Result, StorageError,
        StorageResult, WalletMuxError,
    };

    // Networks
    pub use crate::network::{ChainDescriptor, ChainId, ChainKind, NativeCurrency, NetworkRegistry};

    // Providers
    pub use crate::provider::{
        AdapterEvent, AdapterRegistry, EmptyHost, ProviderAdapter, ProviderKind, SettlePolicy,
        SwitchOutcome, WalletConnectOptions, WalletHost, WalletState,
    };

    // Controller
    pub use crate::controller::ConnectionController;
    pub use crate::identity::{ConnectionState, Identity};

    // Session
    pub use crate::session::{FileSessionStore, MemorySessionStore, SessionRecord, SessionStore};

    // Config
    pub use crate::config::{
        SettleConfig, WalletMuxConfig, config_path, init_config, load_config, save_config,
    };

    // Consumer
    pub use crate::consumer::{Scope, ScopeWatcher};
}
