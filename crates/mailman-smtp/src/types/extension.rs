//! SMTP extension types.

/// SMTP extensions advertised in the EHLO response.
///
/// Only the extensions the client acts on get their own variant; the rest
/// are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Extension {
    /// AUTH - Authentication with the listed mechanisms
    Auth(Vec<AuthMechanism>),
    /// SIZE - Maximum message size (`None` or `Some(0)` means no fixed limit)
    Size(Option<usize>),
    /// 8BITMIME - 8-bit MIME transport
    EightBitMime,
    /// PIPELINING - Command pipelining
    Pipelining,
    /// SMTPUTF8 - UTF-8 email addresses
    SmtpUtf8,
    /// Any other extension line
    Other(String),
}

impl Extension {
    /// Parses an extension line from EHLO response.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();
        let Some(keyword) = words.next() else {
            return Self::Other(line.to_string());
        };

        match keyword.to_ascii_uppercase().as_str() {
            "AUTH" => Self::Auth(words.map(AuthMechanism::parse).collect()),
            "SIZE" => Self::Size(words.next().and_then(|s| s.parse().ok())),
            "8BITMIME" => Self::EightBitMime,
            "PIPELINING" => Self::Pipelining,
            "SMTPUTF8" => Self::SmtpUtf8,
            _ => Self::Other(line.to_string()),
        }
    }
}

/// SASL authentication mechanism.
///
/// The client only speaks PLAIN; other advertised names are preserved so
/// callers can report what the server offered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AuthMechanism {
    /// PLAIN - RFC 4616
    Plain,
    /// Any other mechanism, upper-cased
    Other(String),
}

impl AuthMechanism {
    /// Parses an authentication mechanism name.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let name = s.to_ascii_uppercase();
        if name == "PLAIN" {
            Self::Plain
        } else {
            Self::Other(name)
        }
    }

    /// Returns the mechanism name as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Plain => "PLAIN",
            Self::Other(name) => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_auth_mechanisms() {
        let ext = Extension::parse("AUTH PLAIN LOGIN xoauth2");
        assert_eq!(
            ext,
            Extension::Auth(vec![
                AuthMechanism::Plain,
                AuthMechanism::Other("LOGIN".into()),
                AuthMechanism::Other("XOAUTH2".into()),
            ])
        );
    }

    #[test]
    fn parse_auth_lowercase_keyword() {
        assert_eq!(
            Extension::parse("auth plain"),
            Extension::Auth(vec![AuthMechanism::Plain])
        );
    }

    #[test]
    fn parse_size() {
        assert_eq!(Extension::parse("SIZE 52428800"), Extension::Size(Some(52_428_800)));
        assert_eq!(Extension::parse("SIZE"), Extension::Size(None));
        assert_eq!(Extension::parse("SIZE abc"), Extension::Size(None));
    }

    #[test]
    fn parse_flags() {
        assert_eq!(Extension::parse("8BITMIME"), Extension::EightBitMime);
        assert_eq!(Extension::parse("PIPELINING"), Extension::Pipelining);
        assert_eq!(Extension::parse("SMTPUTF8"), Extension::SmtpUtf8);
    }

    #[test]
    fn parse_other() {
        assert_eq!(
            Extension::parse("STARTTLS"),
            Extension::Other("STARTTLS".into())
        );
        assert_eq!(Extension::parse(""), Extension::Other(String::new()));
    }

    #[test]
    fn mechanism_names() {
        assert_eq!(AuthMechanism::Plain.as_str(), "PLAIN");
        assert_eq!(AuthMechanism::parse("cram-md5").as_str(), "CRAM-MD5");
    }
}
