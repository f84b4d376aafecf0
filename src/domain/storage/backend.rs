use crate::domain::errors::StorageError;

/// String-keyed store provided by the host (`localStorage`, `sessionStorage`,
/// or an in-memory stand-in).
///
/// Implementations are synchronous; the host serializes access.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Fails with [`StorageError::QuotaExceeded`] when the store is full.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Removes every key, including ones this application does not own.
    fn clear(&self) -> Result<(), StorageError>;

    fn keys(&self) -> Result<Vec<String>, StorageError>;

    fn len(&self) -> Result<usize, StorageError> {
        self.keys().map(|keys| keys.len())
    }
}
