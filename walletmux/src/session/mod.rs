//! Persisted "last session" record.
//!
//! Two string entries survive restarts: `auth` (JSON `{"authenticated": bool}`)
//! and `lastProvider` (canonical provider name). Absence of either means there
//! is no prior session.

mod record;
mod storage;

pub use record::{AUTH_KEY, Entries, LAST_PROVIDER_KEY, SessionRecord};
pub use storage::{FileSessionStore, MemorySessionStore, SessionStore};
