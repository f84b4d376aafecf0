use strum::AsRefStr;

/// Storage failures. None of these reach UI code: accessors log them and degrade
/// to "as if the cache were empty".
#[derive(Debug, Clone, PartialEq, Eq, AsRefStr)]
pub enum StorageError {
    /// Stored text is not a valid envelope for the requested type.
    Parse(String),
    /// The host store refused a write because it is full.
    QuotaExceeded { key: String },
    /// The value could not be converted to the wire format.
    Serialization(String),
    /// The host store is missing or threw for another reason.
    Unavailable(String),
    /// Invalid configuration text.
    Config(String),
}

impl StorageError {
    /// Stable name used for error tracking.
    pub fn kind(&self) -> &str {
        self.as_ref()
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Parse(msg) => write!(f, "Parse Error: {}", msg),
            StorageError::QuotaExceeded { key } => write!(f, "Quota Exceeded while writing '{}'", key),
            StorageError::Serialization(msg) => write!(f, "Serialization Error: {}", msg),
            StorageError::Unavailable(msg) => write!(f, "Storage Unavailable: {}", msg),
            StorageError::Config(msg) => write!(f, "Configuration Error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_are_variant_names() {
        assert_eq!(StorageError::Parse("x".into()).kind(), "Parse");
        assert_eq!(
            StorageError::QuotaExceeded { key: "k".into() }.kind(),
            "QuotaExceeded"
        );
    }
}
