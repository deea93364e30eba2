//! Supported networks.
//!
//! [`NetworkRegistry`] is the static table the controller validates every
//! provider-reported chain against.

mod chain;
mod registry;

pub use chain::{ChainDescriptor, ChainId, ChainKind, NativeCurrency};
pub use registry::NetworkRegistry;
