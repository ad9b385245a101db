//! Error types for the backend crate.

use thiserror::Error;

/// Boxed error used to carry the underlying cause of a transport failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Backend error type covering every failure a session can surface.
#[derive(Debug, Error)]
pub enum BackendError {
    // Session establishment errors
    /// Session parameters do not match any approved connection profile.
    #[error("not valid")]
    NotValid,

    /// The authentication request could not be completed.
    #[error("cannot query login info: {0}")]
    Transport(#[source] BoxError),

    /// The authentication response was not a JSON boolean.
    #[error("cannot decode login info {body:?}: {source}")]
    Decode {
        /// Raw response body, kept for diagnostics.
        body: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The account server rejected the credentials.
    #[error("authentication failed")]
    AuthenticationFailed,

    // Registry errors
    /// No driver is registered under the requested type name.
    #[error("unknown backend type: {0}")]
    UnknownBackend(String),

    // Filesystem errors
    /// A delegated filesystem operation failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BackendError {
    /// Wrap any error as a transport failure.
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        BackendError::Transport(err.into())
    }

    /// Whether the caller should present a "bad credentials" message.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, BackendError::AuthenticationFailed)
    }
}

/// Result type alias for backend operations.
pub type Result<T> = std::result::Result<T, BackendError>;
