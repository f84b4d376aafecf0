use derive_more::{Deref, Display, From};
use strum::{AsRefStr, EnumIter};

/// Prefix shared by every key the dashboard writes.
pub const NAMESPACE: &str = "corpoview";

/// Opaque storage key. Uniqueness is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deref, Display, From)]
pub struct StorageKey(String);

impl StorageKey {
    /// `corpoview:<category>:<name>`
    pub fn namespaced(category: &str, name: &str) -> Self {
        Self(format!("{NAMESPACE}:{category}:{name}"))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StorageKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Keys held in persistent (`localStorage`) storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter)]
pub enum LocalKey {
    #[strum(serialize = "corpoview:theme")]
    Theme,
    #[strum(serialize = "corpoview:preferences")]
    Preferences,
    #[strum(serialize = "corpoview:sidebar:collapsed")]
    SidebarCollapsed,
    #[strum(serialize = "corpoview:filters")]
    Filters,
    #[strum(serialize = "corpoview:recent:stocks")]
    RecentStocks,
    #[strum(serialize = "corpoview:recent:crypto")]
    RecentCrypto,
    #[strum(serialize = "corpoview:favorites")]
    Favorites,
    #[strum(serialize = "corpoview:chart:preferences")]
    ChartPreferences,
}

/// Keys held in session (`sessionStorage`) storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter)]
pub enum SessionKey {
    #[strum(serialize = "corpoview:modal:state")]
    ModalState,
    #[strum(serialize = "corpoview:form:data")]
    FormData,
    #[strum(serialize = "corpoview:search:query")]
    SearchQuery,
    #[strum(serialize = "corpoview:filters:temp")]
    TempFilters,
    #[strum(serialize = "corpoview:chart:state")]
    ChartState,
    #[strum(serialize = "corpoview:route:previous")]
    PreviousRoute,
}

impl From<LocalKey> for StorageKey {
    fn from(key: LocalKey) -> Self {
        Self(key.as_ref().to_string())
    }
}

impl From<SessionKey> for StorageKey {
    fn from(key: SessionKey) -> Self {
        Self(key.as_ref().to_string())
    }
}
