//! Storage aggregate: keys, the envelope codec and the host store abstraction.

pub mod backend;
pub mod envelope;
pub mod keys;

pub use backend::*;
pub use envelope::*;
pub use keys::*;

use strum::{AsRefStr, Display, EnumString};

/// Which host store an accessor talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString)]
pub enum StorageArea {
    /// Survives tab close, shared across tabs of the same origin.
    #[strum(serialize = "local")]
    Persistent,
    /// Scoped to one tab.
    #[strum(serialize = "session")]
    Session,
}

impl StorageArea {
    /// Only persistent storage broadcasts changes to other tabs.
    pub fn is_shared_across_tabs(&self) -> bool {
        matches!(self, StorageArea::Persistent)
    }
}
