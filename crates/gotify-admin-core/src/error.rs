//! Error types for the gotify-admin core library.

use thiserror::Error;

use crate::session::StorageError;

/// Result type alias using the gotify-admin [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure a console operation can surface.
///
/// Callers branch on the variant, never on the rendered text.
#[derive(Debug, Error)]
pub enum Error {
    /// No session token is stored; the request never left the process.
    #[error("Not authenticated")]
    Auth,

    /// The server answered with a non-2xx status (or an unreadable body).
    #[error("Error {status}: {message}")]
    Api { status: u16, message: String },

    /// The request could not be delivered.
    #[error("Request failed: {0}")]
    Network(String),

    /// Local input checks rejected the operation before any request.
    #[error("{0}")]
    Validation(String),

    /// The persisted session could not be read or written.
    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
}

impl Error {
    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// HTTP status carried by an API error.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the operator has to log in (again) to continue.
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Auth | Self::Api { status: 401, .. })
    }

    /// Text shown in an inline banner.
    ///
    /// Network failures collapse to a generic message; the detail goes to the log.
    pub fn banner(&self) -> String {
        match self {
            Self::Network(_) => "Request failed, check the server address and your connection".into(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn api_error_embeds_status() {
        let err = Error::Api {
            status: 404,
            message: "Not Found".into(),
        };
        assert_eq!(err.to_string(), "Error 404: Not Found");
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.banner(), "Error 404: Not Found");
    }

    #[test]
    fn unauthorized_counts_as_auth_failure() {
        let err = Error::Api {
            status: 401,
            message: "Unauthorized".into(),
        };
        assert!(err.is_auth_failure());
        assert!(Error::Auth.is_auth_failure());
        assert!(
            !Error::Api {
                status: 403,
                message: "Forbidden".into()
            }
            .is_auth_failure()
        );
    }

    #[test]
    fn network_banner_is_generic() {
        let err = Error::Network("connection refused (os error 111)".into());
        assert!(err.banner().starts_with("Request failed"));
        assert!(!err.banner().contains("os error"));
    }

    #[test]
    fn validation_displays_message_only() {
        let err = Error::validation("Password is required");
        assert_eq!(err.to_string(), "Password is required");
        assert!(err.status().is_none());
    }
}
