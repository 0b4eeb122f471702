//! Commands the client sends.

use crate::types::{Address, AuthMechanism};

/// A client command, one per line on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `HELO <identity>`, for servers without ESMTP.
    Helo {
        /// Name the client announces.
        hostname: String,
    },
    /// `EHLO <identity>`; the reply lists extensions.
    Ehlo {
        /// Name the client announces.
        hostname: String,
    },
    /// `AUTH <mechanism> [initial-response]`.
    Auth {
        /// SASL mechanism.
        mechanism: AuthMechanism,
        /// Base64 initial response (RFC 4954 SASL-IR).
        initial_response: Option<String>,
    },
    /// `MAIL FROM:<sender> [SIZE=n]`.
    MailFrom {
        /// Envelope sender.
        from: Address,
        /// Declared message size (RFC 1870).
        size: Option<usize>,
    },
    /// `RCPT TO:<recipient>`.
    RcptTo {
        /// Envelope recipient.
        to: Address,
    },
    /// `DATA`
    Data,
    /// `RSET`
    Rset,
    /// `QUIT`
    Quit,
}

impl Command {
    /// Wire form of the command, CRLF included.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let line = match self {
            Self::Helo { hostname } => format!("HELO {hostname}"),
            Self::Ehlo { hostname } => format!("EHLO {hostname}"),
            Self::Auth {
                mechanism,
                initial_response: Some(response),
            } => format!("AUTH {} {response}", mechanism.as_str()),
            Self::Auth {
                mechanism,
                initial_response: None,
            } => format!("AUTH {}", mechanism.as_str()),
            Self::MailFrom {
                from,
                size: Some(size),
            } => format!("MAIL FROM:<{from}> SIZE={size}"),
            Self::MailFrom { from, size: None } => format!("MAIL FROM:<{from}>"),
            Self::RcptTo { to } => format!("RCPT TO:<{to}>"),
            Self::Data | Self::Rset | Self::Quit => self.verb().to_string(),
        };

        let mut bytes = line.into_bytes();
        bytes.extend_from_slice(b"\r\n");
        bytes
    }

    /// Command name without arguments. Safe to log: never contains
    /// credentials.
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Helo { .. } => "HELO",
            Self::Ehlo { .. } => "EHLO",
            Self::Auth { .. } => "AUTH",
            Self::MailFrom { .. } => "MAIL FROM",
            Self::RcptTo { .. } => "RCPT TO",
            Self::Data => "DATA",
            Self::Rset => "RSET",
            Self::Quit => "QUIT",
        }
    }
}
