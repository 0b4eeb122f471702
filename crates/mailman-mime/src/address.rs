//! Mail addresses with display names.

use crate::encoding::encode_rfc2047;
use std::fmt;

/// A mailbox with a display name, as it appears in `From` and `To` headers.
///
/// The display name may be empty. No validation is applied to the mailbox;
/// envelope validation happens when the SMTP session uses it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Address {
    display_name: String,
    mailbox: String,
}

impl Address {
    /// Creates an address with a display name.
    #[must_use]
    pub fn new(display_name: impl Into<String>, mailbox: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            mailbox: mailbox.into(),
        }
    }

    /// Creates an address with an empty display name.
    #[must_use]
    pub fn mailbox_only(mailbox: impl Into<String>) -> Self {
        Self::new(String::new(), mailbox)
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the mailbox (`local@domain`).
    #[must_use]
    pub fn mailbox(&self) -> &str {
        &self.mailbox
    }
}

impl From<&str> for Address {
    fn from(mailbox: &str) -> Self {
        Self::mailbox_only(mailbox)
    }
}

impl<N: Into<String>, M: Into<String>> From<(N, M)> for Address {
    fn from((display_name, mailbox): (N, M)) -> Self {
        Self::new(display_name, mailbox)
    }
}

/// Header form: `"Display Name" <mailbox>`.
///
/// Non-ASCII display names are written as an RFC 2047 encoded word, which
/// must stay outside the quotes to be decoded by readers.
impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.display_name.is_ascii() {
            let escaped = self.display_name.replace('\\', "\\\\").replace('"', "\\\"");
            write!(f, "\"{escaped}\" <{}>", self.mailbox)
        } else {
            let encoded = encode_rfc2047(&self.display_name, "utf-8");
            write!(f, "{encoded} <{}>", self.mailbox)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_quotes_name() {
        let addr = Address::new("John Doe", "john@example.com");
        assert_eq!(addr.to_string(), "\"John Doe\" <john@example.com>");
    }

    #[test]
    fn test_display_empty_name() {
        let addr = Address::from("a@x.com");
        assert_eq!(addr.display_name(), "");
        assert_eq!(addr.to_string(), "\"\" <a@x.com>");
    }

    #[test]
    fn test_display_escapes_quotes() {
        let addr = Address::new("The \"Boss\"", "boss@example.com");
        assert_eq!(addr.to_string(), "\"The \\\"Boss\\\"\" <boss@example.com>");
    }

    #[test]
    fn test_display_non_ascii_name() {
        let addr = Address::new("José", "jose@example.com");
        assert_eq!(addr.to_string(), "=?utf-8?B?Sm9zw6k=?= <jose@example.com>");
    }

    #[test]
    fn test_from_tuple() {
        let addr = Address::from(("Jane", "jane@example.com"));
        assert_eq!(addr.display_name(), "Jane");
        assert_eq!(addr.mailbox(), "jane@example.com");
    }
}
