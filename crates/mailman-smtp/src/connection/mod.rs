//! SMTP connection management with type-state pattern.

mod client;
mod states;
mod stream;

pub use client::Client;
pub use states::{Authenticated, Connected, Data, MailTransaction, RecipientAdded};
pub use stream::{SmtpStream, connect_tls};

use crate::types::{AuthMechanism, Extension};
use std::collections::HashSet;

/// What is known about the server on the other end of a connection.
#[derive(Debug, Clone, Default)]
pub struct ServerInfo {
    /// Host the connection was dialed for.
    pub server_name: String,
    /// Server hostname from greeting.
    pub hostname: String,
    /// Extensions advertised in the EHLO response.
    pub extensions: HashSet<Extension>,
}

impl ServerInfo {
    /// Checks if the server supports an extension.
    #[must_use]
    pub fn supports(&self, ext: &Extension) -> bool {
        self.extensions.contains(ext)
    }

    /// Checks if the server advertised SIZE, with or without a limit.
    #[must_use]
    pub fn supports_size(&self) -> bool {
        self.extensions
            .iter()
            .any(|ext| matches!(ext, Extension::Size(_)))
    }

    /// Returns the maximum message size, if a non-zero limit is advertised.
    #[must_use]
    pub fn max_message_size(&self) -> Option<usize> {
        self.extensions.iter().find_map(|ext| match ext {
            Extension::Size(Some(size)) if *size > 0 => Some(*size),
            _ => None,
        })
    }

    /// Returns supported authentication mechanisms.
    #[must_use]
    pub fn auth_mechanisms(&self) -> Vec<AuthMechanism> {
        self.extensions
            .iter()
            .find_map(|ext| match ext {
                Extension::Auth(mechanisms) => Some(mechanisms.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Checks if the server offers an authentication mechanism.
    #[must_use]
    pub fn supports_auth(&self, mechanism: &AuthMechanism) -> bool {
        self.extensions.iter().any(|ext| match ext {
            Extension::Auth(mechanisms) => mechanisms.contains(mechanism),
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(lines: &[&str]) -> ServerInfo {
        ServerInfo {
            server_name: "smtp.example.com".into(),
            hostname: "mx.example.com".into(),
            extensions: lines.iter().map(|l| Extension::parse(l)).collect(),
        }
    }

    #[test]
    fn test_size_limits() {
        assert_eq!(info(&["SIZE 1000"]).max_message_size(), Some(1000));
        assert_eq!(info(&["SIZE 0"]).max_message_size(), None);
        assert!(info(&["SIZE 0"]).supports_size());
        assert!(info(&["SIZE"]).supports_size());
        assert!(!info(&["8BITMIME"]).supports_size());
    }

    #[test]
    fn test_auth_support() {
        let server = info(&["AUTH LOGIN PLAIN", "PIPELINING"]);
        assert!(server.supports_auth(&AuthMechanism::Plain));
        assert_eq!(server.auth_mechanisms().len(), 2);
        assert!(server.supports(&Extension::Pipelining));

        let server = info(&["AUTH LOGIN"]);
        assert!(!server.supports_auth(&AuthMechanism::Plain));
        assert!(!info(&[]).supports_auth(&AuthMechanism::Plain));
    }
}
