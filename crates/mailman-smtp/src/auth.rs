//! SASL PLAIN credentials (RFC 4616).

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt;

/// Credentials for the PLAIN mechanism.
///
/// `realm` is the server host the credentials are meant for. The client
/// refuses to send them over a connection dialed for any other host.
#[derive(Clone, PartialEq, Eq)]
pub struct PlainCredentials {
    identity: String,
    username: String,
    password: String,
    realm: String,
}

impl PlainCredentials {
    /// Creates credentials with an empty authorization identity.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        realm: impl Into<String>,
    ) -> Self {
        Self {
            identity: String::new(),
            username: username.into(),
            password: password.into(),
            realm: realm.into(),
        }
    }

    /// Sets the authorization identity (act as another user).
    #[must_use]
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = identity.into();
        self
    }

    /// Returns the authentication username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the realm (server host).
    #[must_use]
    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// Builds the base64 initial response: `identity NUL username NUL password`.
    #[must_use]
    pub fn initial_response(&self) -> String {
        let message = format!("{}\0{}\0{}", self.identity, self.username, self.password);
        STANDARD.encode(message.as_bytes())
    }
}

impl fmt::Debug for PlainCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlainCredentials")
            .field("identity", &self.identity)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("realm", &self.realm)
            .finish()
    }
}
