//! Error types for delivery sessions.

use std::fmt;

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Step of a delivery at which a failure occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStep {
    /// `MAIL FROM`.
    MailFrom,
    /// `RCPT TO` for one recipient.
    RcptTo {
        /// Mailbox that was rejected.
        recipient: String,
    },
    /// `DATA`.
    Data,
    /// Writing the encoded message.
    Write,
    /// End of data and the server's final reply.
    Commit,
}

impl fmt::Display for DeliveryStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MailFrom => f.write_str("MAIL FROM"),
            Self::RcptTo { recipient } => write!(f, "RCPT TO <{recipient}>"),
            Self::Data => f.write_str("DATA"),
            Self::Write => f.write_str("message write"),
            Self::Commit => f.write_str("end of data"),
        }
    }
}

/// Session error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configured server address is malformed.
    #[error("Invalid server address {address:?}: {reason}")]
    Config {
        /// Address as configured.
        address: String,
        /// What is wrong with it.
        reason: String,
    },

    /// TCP connect or TLS handshake failed.
    #[error("Failed to connect to {address}: {source}")]
    Connection {
        /// Address that was dialed.
        address: String,
        /// Underlying failure.
        source: mailman_smtp::Error,
    },

    /// The server's banner or greeting reply was a rejection.
    #[error("SMTP greeting with {host} failed: {source}")]
    Protocol {
        /// Server host.
        host: String,
        /// Underlying failure.
        source: mailman_smtp::Error,
    },

    /// Authentication was rejected or is unavailable.
    #[error("Authentication as {username} failed: {source}")]
    Auth {
        /// Username that was tried.
        username: String,
        /// Underlying failure.
        source: mailman_smtp::Error,
    },

    /// A step of the mail transaction failed.
    #[error("Delivery failed at {step}: {source}")]
    Delivery {
        /// Step that failed.
        step: DeliveryStep,
        /// Underlying failure.
        source: mailman_smtp::Error,
    },

    /// The session was closed.
    #[error("Session is closed")]
    Closed,
}

impl Error {
    pub(crate) const fn delivery(step: DeliveryStep, source: mailman_smtp::Error) -> Self {
        Self::Delivery { step, source }
    }

    /// Returns the underlying SMTP error, if any.
    #[must_use]
    pub const fn smtp_error(&self) -> Option<&mailman_smtp::Error> {
        match self {
            Self::Connection { source, .. }
            | Self::Protocol { source, .. }
            | Self::Auth { source, .. }
            | Self::Delivery { source, .. } => Some(source),
            Self::Config { .. } | Self::Closed => None,
        }
    }

    /// Returns true if the server answered with a transient (4xx) reply.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        self.smtp_error()
            .is_some_and(mailman_smtp::Error::is_transient)
    }

    /// Returns true if the server answered with a permanent (5xx) reply.
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        self.smtp_error()
            .is_some_and(mailman_smtp::Error::is_permanent)
    }
}
