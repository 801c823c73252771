//! Error types for backend calls.

use thiserror::Error;

/// Errors that can occur when talking to the monitoring backend.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// Credentials rejected or registration refused. Carries the
    /// server-provided message (or a localized default).
    #[error("{0}")]
    Auth(String),

    /// The backend rejected the session token.
    #[error("Session expired")]
    SessionExpired,

    /// The call requires a session but none is stored.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Request could not be sent or the connection failed.
    #[error("Network error: {0}")]
    Network(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// The backend answered with an error status or `success: false`.
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Coarse error classes, deciding how a failure is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// User-correctable; shown inline on the form.
    Auth,
    /// Forces logout; never swallowed.
    SessionExpired,
    /// Transient; the caller keeps its previous data and may retry.
    Network,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Auth(_) => ErrorKind::Auth,
            ClientError::SessionExpired | ClientError::NotAuthenticated => {
                ErrorKind::SessionExpired
            }
            ClientError::Network(_)
            | ClientError::Timeout
            | ClientError::Rejected(_)
            | ClientError::Parse(_) => ErrorKind::Network,
        }
    }

    /// True when the failure means the local session must be torn down.
    pub fn is_session_expired(&self) -> bool {
        self.kind() == ErrorKind::SessionExpired
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Parse(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(ClientError::Auth("x".into()).kind(), ErrorKind::Auth);
        assert_eq!(ClientError::SessionExpired.kind(), ErrorKind::SessionExpired);
        assert_eq!(ClientError::Timeout.kind(), ErrorKind::Network);
        assert_eq!(ClientError::Parse("bad".into()).kind(), ErrorKind::Network);
        assert!(ClientError::NotAuthenticated.is_session_expired());
    }

    #[test]
    fn auth_error_displays_server_message() {
        let err = ClientError::Auth("Email atau password salah".into());
        assert_eq!(err.to_string(), "Email atau password salah");
    }
}
