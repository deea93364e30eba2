//! Persisted session record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{StorageError, StorageResult};
use crate::provider::ProviderKind;

/// Storage key of the authentication flag.
pub const AUTH_KEY: &str = "auth";

/// Storage key of the last used provider.
pub const LAST_PROVIDER_KEY: &str = "lastProvider";

/// Raw string entries, as a browser's local storage would hold them.
pub type Entries = BTreeMap<String, String>;

#[derive(Serialize, Deserialize)]
struct AuthEntry {
    authenticated: bool,
}

/// The "last session" surviving restarts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionRecord {
    /// Whether the user was signed in.
    pub authenticated: bool,
    /// Provider used for the last successful connect.
    pub last_provider: Option<ProviderKind>,
}

impl SessionRecord {
    /// Record written after a successful connect.
    #[must_use]
    pub const fn signed_in(kind: ProviderKind) -> Self {
        Self {
            authenticated: true,
            last_provider: Some(kind),
        }
    }

    /// Record written on logout.
    #[must_use]
    pub const fn signed_out() -> Self {
        Self {
            authenticated: false,
            last_provider: None,
        }
    }

    /// Provider to resume with, if the record describes a resumable session.
    #[must_use]
    pub const fn resumable(&self) -> Option<ProviderKind> {
        if self.authenticated {
            self.last_provider
        } else {
            None
        }
    }

    /// Decode from raw entries. Missing entries mean "no prior session".
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Malformed`] when an entry exists but cannot be
    /// interpreted.
    pub fn decode(entries: &Entries) -> StorageResult<Self> {
        let authenticated = match entries.get(AUTH_KEY) {
            Some(raw) => {
                serde_json::from_str::<AuthEntry>(raw)
                    .map_err(|e| StorageError::malformed(AUTH_KEY, e.to_string()))?
                    .authenticated
            }
            None => false,
        };
        let last_provider = match entries.get(LAST_PROVIDER_KEY) {
            Some(raw) => Some(
                raw.parse::<ProviderKind>()
                    .map_err(|e| StorageError::malformed(LAST_PROVIDER_KEY, e.to_string()))?,
            ),
            None => None,
        };
        Ok(Self {
            authenticated,
            last_provider,
        })
    }

    /// Write into raw entries, removing `lastProvider` when there is none.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Json`] if the auth entry cannot be serialized.
    pub fn encode_into(&self, entries: &mut Entries) -> StorageResult<()> {
        let auth = serde_json::to_string(&AuthEntry {
            authenticated: self.authenticated,
        })?;
        entries.insert(AUTH_KEY.to_owned(), auth);
        match self.last_provider {
            Some(kind) => {
                entries.insert(LAST_PROVIDER_KEY.to_owned(), kind.as_str().to_owned());
            }
            None => {
                entries.remove(LAST_PROVIDER_KEY);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_means_no_session() {
        let record = SessionRecord::decode(&Entries::new()).unwrap();
        assert_eq!(record, SessionRecord::default());
        assert_eq!(record.resumable(), None);
    }

    #[test]
    fn test_encode_layout() {
        let mut entries = Entries::new();
        SessionRecord::signed_in(ProviderKind::InjectedEvm)
            .encode_into(&mut entries)
            .unwrap();
        assert_eq!(entries[AUTH_KEY], r#"{"authenticated":true}"#);
        assert_eq!(entries[LAST_PROVIDER_KEY], "injected-evm");

        SessionRecord::signed_out().encode_into(&mut entries).unwrap();
        assert_eq!(entries[AUTH_KEY], r#"{"authenticated":false}"#);
        assert!(!entries.contains_key(LAST_PROVIDER_KEY));
    }

    #[test]
    fn test_decode_legacy_and_malformed() {
        let mut entries = Entries::new();
        entries.insert(AUTH_KEY.into(), r#"{"authenticated":true}"#.into());
        entries.insert(LAST_PROVIDER_KEY.into(), "metamask".into());
        assert_eq!(
            SessionRecord::decode(&entries).unwrap().resumable(),
            Some(ProviderKind::InjectedEvm)
        );

        entries.insert(AUTH_KEY.into(), "yes".into());
        assert!(matches!(
            SessionRecord::decode(&entries),
            Err(StorageError::Malformed { key: AUTH_KEY, .. })
        ));

        entries.insert(AUTH_KEY.into(), r#"{"authenticated":true}"#.into());
        entries.insert(LAST_PROVIDER_KEY.into(), "ledger".into());
        assert!(matches!(
            SessionRecord::decode(&entries),
            Err(StorageError::Malformed { key: LAST_PROVIDER_KEY, .. })
        ));
    }
}
