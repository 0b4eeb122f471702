//! Error types for SMTP operations.

use std::io;

/// Result type alias for SMTP operations.
pub type Result<T> = std::result::Result<T, Error>;

/// SMTP error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// TLS error.
    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),

    /// Server returned error response.
    #[error("SMTP error {code}: {message}")]
    SmtpError {
        /// Reply code (e.g., 550).
        code: u16,
        /// Error message from server.
        message: String,
    },

    /// Protocol error (unexpected response).
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Server closed the connection while a reply was expected.
    #[error("Connection closed by server")]
    ConnectionClosed,

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Invalid server name for TLS verification.
    #[error("Invalid server name: {0}")]
    InvalidServerName(String),

    /// Credentials were issued for a different server.
    #[error("Credentials are for {expected}, connected to {actual}")]
    WrongHost {
        /// Realm the credentials were created for.
        expected: String,
        /// Server name of the connection.
        actual: String,
    },

    /// Message too large.
    #[error("Message exceeds size limit: {size} bytes (limit {limit})")]
    MessageTooLarge {
        /// Size of the message.
        size: usize,
        /// Limit advertised by the server.
        limit: usize,
    },

    /// Feature not supported by server.
    #[error("Server does not support {0}")]
    NotSupported(String),
}

impl Error {
    /// Creates an SMTP error from a reply code and message.
    #[must_use]
    pub fn smtp_error(code: u16, message: impl Into<String>) -> Self {
        Self::SmtpError {
            code,
            message: message.into(),
        }
    }

    /// Returns the server reply code, if this error came from a reply.
    #[must_use]
    pub const fn reply_code(&self) -> Option<u16> {
        match self {
            Self::SmtpError { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns true if this is a permanent error (5xx).
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        matches!(self, Self::SmtpError { code, .. } if *code >= 500 && *code < 600)
    }

    /// Returns true if this is a transient error (4xx).
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::SmtpError { code, .. } if *code >= 400 && *code < 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_classification() {
        let permanent = Error::smtp_error(550, "No such user");
        assert!(permanent.is_permanent());
        assert!(!permanent.is_transient());
        assert_eq!(permanent.reply_code(), Some(550));

        let transient = Error::smtp_error(451, "Try again later");
        assert!(transient.is_transient());
        assert!(!transient.is_permanent());

        assert_eq!(Error::ConnectionClosed.reply_code(), None);
        assert!(!Error::ConnectionClosed.is_permanent());
    }

    #[test]
    fn test_display() {
        let err = Error::smtp_error(535, "Authentication failed");
        assert_eq!(err.to_string(), "SMTP error 535: Authentication failed");

        let err = Error::MessageTooLarge { size: 20, limit: 10 };
        assert_eq!(err.to_string(), "Message exceeds size limit: 20 bytes (limit 10)");
    }
}
