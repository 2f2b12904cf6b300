//! Error types for the dataset store.

/// Errors that can occur while loading or saving the dataset blob.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The backing storage connection could not be established, or the
    /// storage configuration is unusable.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Human-readable description of the failure.
        message: String,
        /// Source error if available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The dataset object could not be fetched or decoded.
    #[error("storage read failed: {message}")]
    ReadFailed {
        /// Human-readable description of the failure.
        message: String,
        /// Source error if available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The dataset object could not be serialized or uploaded.
    #[error("storage write failed: {message}")]
    WriteFailed {
        /// Human-readable description of the failure.
        message: String,
        /// Source error if available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Convenience `Result` alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates an `Unavailable` error from a message.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Error::Unavailable {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a `ReadFailed` error from a message.
    pub fn read_failed(message: impl Into<String>) -> Self {
        Error::ReadFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a `ReadFailed` error wrapping a source error.
    pub fn read_failed_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::ReadFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a `WriteFailed` error from a message.
    pub fn write_failed(message: impl Into<String>) -> Self {
        Error::WriteFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a `WriteFailed` error wrapping a source error.
    pub fn write_failed_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::WriteFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
