//! Configuration for walletmux.
//!
//! Stored as JSON at `~/.walletmux/config.json`, or wherever
//! `WALLETMUX_CONFIG` points. Every field is optional.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult, Result};
use crate::network::{ChainDescriptor, NetworkRegistry};
use crate::provider::{DEFAULT_SETTLE_MS, SettlePolicy, WalletConnectOptions};
use crate::session::FileSessionStore;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "WALLETMUX_CONFIG";

/// Settle window, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettleConfig {
    /// Fixed delay.
    Fixed(u64),
    /// Poll until two reads agree, bounded by `max_ms`.
    Poll {
        /// Delay between reads.
        interval_ms: u64,
        /// Upper bound on the window.
        max_ms: u64,
    },
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self::Fixed(DEFAULT_SETTLE_MS)
    }
}

impl From<SettleConfig> for SettlePolicy {
    fn from(config: SettleConfig) -> Self {
        match config {
            SettleConfig::Fixed(ms) => Self::Fixed(Duration::from_millis(ms)),
            SettleConfig::Poll {
                interval_ms,
                max_ms,
            } => Self::PollUntilStable {
                interval: Duration::from_millis(interval_ms),
                max: Duration::from_millis(max_ms),
            },
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletMuxConfig {
    /// Settle window after handshakes and wallet notifications.
    pub settle: SettleConfig,
    /// Session record file. Defaults to `~/.walletmux/session.json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_path: Option<PathBuf>,
    /// Replacement network table. Defaults to the built-in table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub networks: Option<Vec<ChainDescriptor>>,
    /// WalletConnect options.
    pub wallet_connect: WalletConnectOptions,
}

impl WalletMuxConfig {
    /// Settle policy for adapters.
    #[must_use]
    pub fn settle_policy(&self) -> SettlePolicy {
        self.settle.into()
    }

    /// Resolved session record path.
    #[must_use]
    pub fn session_path(&self) -> PathBuf {
        self.session_path
            .clone()
            .unwrap_or_else(FileSessionStore::default_path)
    }

    /// Network table to use.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured table has duplicate entries.
    pub fn network_registry(&self) -> Result<NetworkRegistry> {
        match &self.networks {
            Some(networks) => Ok(NetworkRegistry::new(networks.clone())?),
            None => Ok(NetworkRegistry::builtin()),
        }
    }

    /// Check the configuration for values that cannot work.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> ConfigResult<()> {
        if let SettleConfig::Poll {
            interval_ms,
            max_ms,
        } = self.settle
        {
            if interval_ms == 0 {
                return Err(ConfigError::invalid("settle.poll.interval_ms must be positive"));
            }
            if interval_ms > max_ms {
                return Err(ConfigError::invalid(
                    "settle.poll.interval_ms must not exceed max_ms",
                ));
            }
        }

        if let Some(networks) = &self.networks {
            if networks.is_empty() {
                return Err(ConfigError::invalid("networks must not be empty"));
            }
            NetworkRegistry::new(networks.clone())
                .map_err(|e| ConfigError::invalid(format!("networks: {e}")))?;
        }

        for (chain_id, url) in &self.wallet_connect.rpc {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::invalid(format!(
                    "wallet_connect.rpc.{chain_id}: not an http(s) URL"
                )));
            }
        }

        Ok(())
    }
}

/// Config file location.
#[must_use]
pub fn config_path() -> PathBuf {
    match std::env::var(CONFIG_ENV) {
        Ok(path) if !path.is_empty() => return PathBuf::from(path),
        _ => {}
    }
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".walletmux")
        .join("config.json")
}

/// Load the configuration from [`config_path`].
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read, parsed or
/// validated.
pub async fn load_config() -> ConfigResult<WalletMuxConfig> {
    load_config_from(&config_path()).await
}

/// Load the configuration from `path`. A missing file yields the defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read, parsed or
/// validated.
pub async fn load_config_from(path: &Path) -> ConfigResult<WalletMuxConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(WalletMuxConfig::default());
    }
    let content = tokio::fs::read_to_string(path).await?;
    let config: WalletMuxConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Write `config` to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub async fn save_config(config: &WalletMuxConfig, path: &Path) -> ConfigResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let content = serde_json::to_string_pretty(config)?;
    tokio::fs::write(path, content).await?;
    Ok(())
}

/// Write the default configuration to [`config_path`].
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub async fn init_config() -> ConfigResult<PathBuf> {
    let path = config_path();
    save_config(&WalletMuxConfig::default(), &path).await?;
    Ok(path)
}
