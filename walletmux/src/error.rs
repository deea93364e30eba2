//! Unified error types for walletmux.
//!
//! Two families live here:
//!
//! - Infrastructure errors ([`StorageError`], [`ConfigError`], [`RegistryError`])
//!   that fold into [`WalletMuxError`] via `?`, and [`ProviderError`], the raw
//!   wallet RPC failure adapters translate before it leaves them.
//! - [`ConnectError`], the user-facing failure value returned by every
//!   connection and network-switch operation. It carries a short title and a
//!   descriptive text so a UI can render any provider failure the same way.

use std::fmt;

use serde::Serialize;

use crate::provider::ProviderKind;

// ============================================================================
// Main Error Type
// ============================================================================

/// The main error type for walletmux infrastructure.
#[derive(Debug, thiserror::Error)]
pub enum WalletMuxError {
    /// Session storage error.
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Configuration error.
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    /// Network registry error.
    #[error("registry: {0}")]
    Registry(#[from] RegistryError),

    /// IO error.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic internal error.
    #[error("{0}")]
    Internal(String),
}

impl WalletMuxError {
    /// Create a config error from a string.
    #[inline]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(ConfigError::Invalid(msg.into()))
    }
}

/// Result type alias for walletmux operations.
pub type Result<T> = std::result::Result<T, WalletMuxError>;

// ============================================================================
// Storage Errors
// ============================================================================

/// Error type for session record persistence.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// IO error.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// A stored entry exists but cannot be interpreted.
    #[error("malformed entry '{key}': {reason}")]
    Malformed {
        /// Storage key of the offending entry.
        key: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}

impl StorageError {
    /// Create a malformed entry error.
    #[inline]
    pub fn malformed(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            key,
            reason: reason.into(),
        }
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

// ============================================================================
// Configuration Errors
// ============================================================================

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("parse: {0}")]
    Parse(#[from] serde_json::Error),

    /// Invalid value.
    #[error("invalid: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Create an invalid value error.
    #[inline]
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// ============================================================================
// Registry Errors
// ============================================================================

/// Error type for building a network registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Two descriptors share a chain id.
    #[error("duplicate chain id: {0}")]
    DuplicateChainId(String),

    /// Two descriptors share a slug.
    #[error("duplicate slug: {0}")]
    DuplicateSlug(String),

    /// A descriptor has an empty slug or name.
    #[error("descriptor for chain {0} has an empty slug or name")]
    Unnamed(String),
}

/// Result type for registry operations.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

// ============================================================================
// Provider Errors
// ============================================================================

/// Low-level failure reported by a wallet API.
///
/// Adapters translate these into [`ConnectError`] values; they never cross
/// the controller boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// JSON-RPC style error with a numeric code (EIP-1193).
    #[error("rpc error {code}: {message}")]
    Rpc {
        /// Provider error code.
        code: i64,
        /// Provider error message.
        message: String,
    },

    /// The user or wallet refused the request.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The wallet returned something the adapter could not interpret.
    #[error("unexpected response: {0}")]
    Unexpected(String),

    /// The wallet connection is closed.
    #[error("connection closed")]
    Closed,
}

impl ProviderError {
    /// EIP-1193 code for a user-rejected request.
    pub const USER_REJECTED: i64 = 4001;

    /// EIP-3326 code for "unrecognized chain id".
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;

    /// Create an RPC error.
    #[inline]
    pub fn rpc(code: i64, message: impl Into<String>) -> Self {
        Self::Rpc {
            code,
            message: message.into(),
        }
    }

    /// Returns the RPC code, if this is an RPC error.
    #[must_use]
    pub const fn code(&self) -> Option<i64> {
        match self {
            Self::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns `true` if the wallet reported that it does not know the chain.
    #[must_use]
    pub const fn is_unrecognized_chain(&self) -> bool {
        matches!(self.code(), Some(Self::UNRECOGNIZED_CHAIN))
    }
}

/// Result type for wallet API calls.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

// ============================================================================
// Connect Errors
// ============================================================================

/// Category of a connection or network-switch failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectErrorKind {
    /// Wallet or extension not present in the environment.
    ProviderUnavailable,
    /// The user declined, or the provider's handshake failed.
    HandshakeRejected,
    /// The provider's current chain is not supported for that provider.
    UnsupportedNetwork,
    /// The requested switch is invalid for the provider's capabilities.
    NetworkSwitchUnsupported,
    /// The switch (or add-chain then switch) request failed.
    NetworkSwitchFailed,
    /// The requested network name is not in the registry.
    NetworkNotAllowed,
    /// A network switch was requested with no active provider.
    ProviderNotConnected,
    /// A newer connect, switch or signout replaced this request.
    Superseded,
}

/// A user-facing failure with a dialog-ready title and text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{title}: {text}")]
pub struct ConnectError {
    /// Failure category.
    pub kind: ConnectErrorKind,
    /// Short title.
    pub title: String,
    /// Descriptive text, naming the extension where relevant.
    pub text: String,
}

impl ConnectError {
    /// Create a connect error.
    pub fn new(kind: ConnectErrorKind, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            text: text.into(),
        }
    }

    /// The wallet for `kind` is not installed.
    #[must_use]
    pub fn provider_unavailable(kind: ProviderKind) -> Self {
        let name = kind.wallet_name();
        Self::new(
            ConnectErrorKind::ProviderUnavailable,
            format!("Not found {name} extension"),
            format!("Please install {name} Ext., reload page and try again"),
        )
    }

    /// A provider name that does not map to any adapter.
    #[must_use]
    pub fn unknown_provider() -> Self {
        Self::new(
            ConnectErrorKind::ProviderUnavailable,
            "This provider is not available",
            "Please try another provider",
        )
    }

    /// The handshake with `kind` failed or was declined.
    #[must_use]
    pub fn handshake_rejected(kind: ProviderKind) -> Self {
        let (title, text) = kind.handshake_failure();
        Self::new(ConnectErrorKind::HandshakeRejected, title, text)
    }

    /// The wallet for `kind` sits on a chain this system does not support.
    #[must_use]
    pub fn unsupported_network(kind: ProviderKind) -> Self {
        let (title, text) = kind.handshake_failure();
        Self::new(ConnectErrorKind::UnsupportedNetwork, title, text)
    }

    /// The network name does not resolve in the registry.
    #[must_use]
    pub fn network_not_allowed() -> Self {
        Self::new(
            ConnectErrorKind::NetworkNotAllowed,
            "Network is not allowed",
            "Please try another network",
        )
    }

    /// No provider is active.
    #[must_use]
    pub fn provider_not_connected() -> Self {
        Self::new(
            ConnectErrorKind::ProviderNotConnected,
            "Provider is not connected",
            "Please reload page and try again",
        )
    }

    /// The active provider cannot drive `network`.
    ///
    /// `supported_by` names the only provider able to, when there is exactly one.
    #[must_use]
    pub fn wrong_provider(network: &str, supported_by: Option<ProviderKind>) -> Self {
        let text = supported_by.map_or_else(
            || "Please connect to another provider".to_owned(),
            |kind| format!("Please install and connect {} Ext.", kind.wallet_name()),
        );
        Self::new(
            ConnectErrorKind::NetworkSwitchUnsupported,
            format!("Wrong provider for {network}"),
            text,
        )
    }

    /// The wallet for `kind` refused or failed to move to `network`.
    #[must_use]
    pub fn switch_failed(network: &str, kind: ProviderKind) -> Self {
        Self::new(
            ConnectErrorKind::NetworkSwitchFailed,
            format!("Not connected to {network}"),
            format!("Please accept connect in the {} Ext.", kind.wallet_name()),
        )
    }

    /// A newer operation replaced this one before it finished.
    #[must_use]
    pub fn superseded() -> Self {
        Self::new(
            ConnectErrorKind::Superseded,
            "Connection cancelled",
            "Another wallet connection replaced this request",
        )
    }
}

/// Outcome of every connection and network-switch operation.
pub type ConnectResult<T = ()> = std::result::Result<T, ConnectError>;

/// Serializable view of a [`ConnectResult`] for UI and JSON consumers.
///
/// Renders as `{"status":"success"}` or
/// `{"status":"error","kind":...,"title":...,"text":...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ConnectOutcome {
    /// The operation succeeded.
    Success,
    /// The operation failed.
    Error(ConnectError),
}

impl<T> From<&ConnectResult<T>> for ConnectOutcome {
    fn from(result: &ConnectResult<T>) -> Self {
        match result {
            Ok(_) => Self::Success,
            Err(e) => Self::Error(e.clone()),
        }
    }
}

impl ConnectOutcome {
    /// Returns `true` on success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

// ============================================================================
// Error Context Extension
// ============================================================================

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<WalletMuxError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            WalletMuxError::Internal(format!("{}: {}", msg.into(), err))
        })
    }
}

/// A wrapper that displays errors in a user-friendly format.
#[derive(Debug)]
pub struct DisplayError<'a>(pub &'a WalletMuxError);

impl fmt::Display for DisplayError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            WalletMuxError::Storage(e) => write!(f, "Session storage error: {e}"),
            WalletMuxError::Config(e) => write!(f, "Configuration error: {e}"),
            WalletMuxError::Registry(e) => write!(f, "Network registry error: {e}"),
            WalletMuxError::Io(e) => write!(f, "IO error: {e}"),
            WalletMuxError::Json(e) => write!(f, "JSON error: {e}"),
            WalletMuxError::Internal(e) => write!(f, "Internal error: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversions() {
        let err: WalletMuxError = StorageError::malformed("auth", "not json").into();
        assert!(matches!(err, WalletMuxError::Storage(_)));

        let err: WalletMuxError = RegistryError::DuplicateSlug("bsc".into()).into();
        assert!(matches!(err, WalletMuxError::Registry(_)));

        let err: WalletMuxError = ConfigError::invalid("settle").into();
        assert_eq!(DisplayError(&err).to_string(), "Configuration error: invalid: settle");
    }

    #[test]
    fn test_provider_error_codes() {
        let err = ProviderError::rpc(4902, "Unrecognized chain ID");
        assert!(err.is_unrecognized_chain());
        assert_eq!(err.code(), Some(4902));

        assert!(!ProviderError::rpc(ProviderError::USER_REJECTED, "denied").is_unrecognized_chain());
        assert_eq!(ProviderError::Closed.code(), None);
    }

    #[test]
    fn test_connect_error_names_extension() {
        let err = ConnectError::provider_unavailable(ProviderKind::InjectedEvm);
        assert_eq!(err.kind, ConnectErrorKind::ProviderUnavailable);
        assert_eq!(err.title, "Not found MetaMask extension");
        assert!(err.text.contains("MetaMask Ext."));

        let err = ConnectError::wrong_provider("Tron", Some(ProviderKind::TronExtension));
        assert_eq!(err.title, "Wrong provider for Tron");
        assert_eq!(err.text, "Please install and connect TronLink Ext.");
    }

    #[test]
    fn test_connect_outcome_shape() {
        let ok: ConnectResult = Ok(());
        let json = serde_json::to_value(ConnectOutcome::from(&ok)).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "success" }));
        assert!(ConnectOutcome::from(&ok).is_success());

        let failed: ConnectResult = Err(ConnectError::network_not_allowed());
        let json = serde_json::to_value(ConnectOutcome::from(&failed)).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["title"], "Network is not allowed");
        assert_eq!(json["text"], "Please try another network");
        assert_eq!(json["kind"], "network_not_allowed");
        assert!(!ConnectOutcome::from(&failed).is_success());
    }
}
