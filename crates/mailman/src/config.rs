//! Session configuration types.

use std::fmt;

use crate::error::{Error, Result};

/// Name announced in EHLO/HELO unless configured otherwise.
pub const DEFAULT_CLIENT_IDENTITY: &str = "localhost";

/// Authentication mechanism used when preparing a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AuthMode {
    /// SASL PLAIN (RFC 4616) with the server host as realm.
    #[default]
    Plain,
}

/// Configuration for a delivery session.
///
/// ```ignore
/// let config = SessionConfig::new("smtp.example.com:465", "user@example.com", "secret")
///     .client_identity("mailer.example.com");
/// ```
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionConfig {
    /// Server address as `host:port` (`[v6addr]:port` for IPv6 literals).
    pub server_address: String,
    /// Username for authentication.
    pub username: String,
    /// Password for authentication.
    pub password: String,
    /// Authentication mechanism.
    #[cfg_attr(feature = "serde", serde(default))]
    pub auth_mode: AuthMode,
    /// Name sent with EHLO/HELO.
    #[cfg_attr(feature = "serde", serde(default = "default_client_identity"))]
    pub client_identity: String,
}

#[cfg(feature = "serde")]
fn default_client_identity() -> String {
    DEFAULT_CLIENT_IDENTITY.to_string()
}

impl SessionConfig {
    /// Creates a configuration using PLAIN authentication and the default
    /// client identity.
    #[must_use]
    pub fn new(
        server_address: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server_address: server_address.into(),
            username: username.into(),
            password: password.into(),
            auth_mode: AuthMode::default(),
            client_identity: DEFAULT_CLIENT_IDENTITY.to_string(),
        }
    }

    /// Sets the authentication mechanism.
    #[must_use]
    pub const fn auth_mode(mut self, auth_mode: AuthMode) -> Self {
        self.auth_mode = auth_mode;
        self
    }

    /// Sets the name sent with EHLO/HELO.
    #[must_use]
    pub fn client_identity(mut self, identity: impl Into<String>) -> Self {
        self.client_identity = identity.into();
        self
    }

    /// Parses the configured server address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the address is malformed.
    pub fn parse_address(&self) -> Result<ServerAddress> {
        ServerAddress::parse(&self.server_address)
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("server_address", &self.server_address)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("auth_mode", &self.auth_mode)
            .field("client_identity", &self.client_identity)
            .finish()
    }
}

/// A parsed `host:port` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerAddress {
    /// Host name or IP literal, without brackets.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl ServerAddress {
    /// Parses `host:port` or `[v6addr]:port`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the port is missing, not a number or
    /// zero, if the host is empty, or if brackets are unbalanced.
    pub fn parse(address: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::Config {
            address: address.to_string(),
            reason: reason.to_string(),
        };

        let (host, port) = if let Some(rest) = address.strip_prefix('[') {
            let (host, rest) = rest
                .split_once(']')
                .ok_or_else(|| invalid("missing ']' in address"))?;
            let port = rest
                .strip_prefix(':')
                .ok_or_else(|| invalid("missing port in address"))?;
            if host.contains('[') {
                return Err(invalid("unexpected '[' in address"));
            }
            (host, port)
        } else {
            let (host, port) = address
                .rsplit_once(':')
                .ok_or_else(|| invalid("missing port in address"))?;
            if host.contains(':') {
                return Err(invalid("too many colons in address"));
            }
            if host.contains('[') || host.contains(']') {
                return Err(invalid("unbalanced brackets in address"));
            }
            (host, port)
        };

        if port.contains(']') {
            return Err(invalid("unexpected ']' in address"));
        }
        if host.is_empty() {
            return Err(invalid("missing host in address"));
        }
        if port.is_empty() {
            return Err(invalid("missing port in address"));
        }

        let port = match port.parse::<u16>() {
            Ok(0) | Err(_) => return Err(invalid("invalid port")),
            Ok(port) => port,
        };

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}
