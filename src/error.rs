use std::fmt;

/// Failure reported by a store client primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Connectivity loss, throttling, or any other failed store call.
    Unavailable(String),
    /// The store call did not complete in time.
    Timeout(String),
    /// The store rejected the request shape (missing key attribute, bad table).
    Malformed(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(message) => write!(f, "store unavailable: {}", message),
            StoreError::Timeout(message) => write!(f, "store timed out: {}", message),
            StoreError::Malformed(message) => write!(f, "malformed store request: {}", message),
        }
    }
}

impl std::error::Error for StoreError {}

/// Error type for record operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// No item exists for the given identity or index query.
    NotFound { collection: String, key: String },
    /// The underlying store call failed.
    StoreUnavailable(String),
    /// The underlying store call timed out.
    Timeout(String),
    /// Identity attributes or attribute bag could not resolve to a valid record.
    ValidationFailure(String),
    /// A record could not be converted to or from its attribute form.
    Serde(String),
}

impl RecordError {
    pub(crate) fn not_found(collection: &str, key: &crate::Attributes) -> Self {
        RecordError::NotFound {
            collection: collection.to_string(),
            key: serde_json::Value::Object(key.clone()).to_string(),
        }
    }

    /// True when the record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RecordError::NotFound { .. })
    }

    /// True for store-level failures worth retrying later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RecordError::StoreUnavailable(_) | RecordError::Timeout(_))
    }
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::NotFound { collection, key } => {
                write!(f, "record not found in {}: {}", collection, key)
            }
            RecordError::StoreUnavailable(message) => {
                write!(f, "record store unavailable: {}", message)
            }
            RecordError::Timeout(message) => write!(f, "record store timed out: {}", message),
            RecordError::ValidationFailure(message) => {
                write!(f, "record validation failed: {}", message)
            }
            RecordError::Serde(message) => write!(f, "record serialization error: {}", message),
        }
    }
}

impl std::error::Error for RecordError {}

impl From<StoreError> for RecordError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Timeout(message) => RecordError::Timeout(message),
            other => RecordError::StoreUnavailable(other.to_string()),
        }
    }
}
