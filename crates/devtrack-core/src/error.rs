//! Error types for the Devtrack core library.

/// Errors produced by pure dataset operations.
///
/// Storage and auth failures have their own enums in `devtrack-store` and
/// `devtrack-auth`; this covers everything that can go wrong without I/O.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// No record matches the requested (category, project name) identity.
    #[error("project not found: {category}/{name}")]
    NotFound {
        /// Category component of the identity.
        category: String,
        /// Project-name component of the identity.
        name: String,
    },

    /// A supplied value failed validation.
    ///
    /// Reserved: merge-patch currently drops unknown fields rather than
    /// rejecting them, so nothing in the default flow constructs this, but
    /// callers that want strict input handling can.
    #[error("validation error: {message}")]
    Validation {
        /// Field the message refers to, when known.
        field: Option<String>,
        /// What went wrong.
        message: String,
    },
}

/// Convenience `Result` alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a `NotFound` error for the given identity pair.
    pub fn not_found(category: impl Into<String>, name: impl Into<String>) -> Self {
        Error::NotFound {
            category: category.into(),
            name: name.into(),
        }
    }

    /// Creates a validation error without a field name.
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Returns `true` for errors caused by the request rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::NotFound { .. } | Error::Validation { .. })
    }
}
