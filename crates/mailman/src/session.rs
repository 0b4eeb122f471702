//! Delivery session over an authenticated SMTP connection.
//!
//! `Session` wraps the type-state SMTP client and hides its transitions
//! behind a `&mut self` API. A live connection exists only while the
//! session is ready; any failure during delivery drops it, and the next
//! delivery dials a fresh one.
//!
//! ## Example
//!
//! ```ignore
//! use mailman::{Message, Session, SessionConfig};
//!
//! let config = SessionConfig::new("smtp.example.com:465", "user@example.com", "password");
//! let mut session = Session::new(config);
//!
//! let message = Message::builder()
//!     .from(("Alice", "alice@example.com"))
//!     .to("bob@example.com")
//!     .subject("Hello")
//!     .body_text("Hi Bob")
//!     .build()?;
//!
//! let report = session.deliver(&message).await?;
//! session.close().await?;
//! ```

use std::fmt;

use mailman_mime::{AttachmentWarning, Encoder, Message};
use mailman_smtp::{Authenticated, Client, PlainCredentials, Reply, ServerInfo};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::config::{AuthMode, SessionConfig};
use crate::connector::{Connector, TlsConnector};
use crate::error::{DeliveryStep, Error, Result};

/// Current state of the session.
enum SessionState<S> {
    /// No connection.
    Unprepared,
    /// Connected and authenticated.
    Ready(Client<S, Authenticated>),
    /// Closed for good.
    Closed,
}

impl<S> SessionState<S> {
    const fn name(&self) -> &'static str {
        match self {
            Self::Unprepared => "Unprepared",
            Self::Ready(_) => "Ready",
            Self::Closed => "Closed",
        }
    }
}

/// Outcome of a successful delivery.
#[derive(Debug)]
pub struct DeliveryReport {
    /// Attachments that could not be read and were left out.
    pub warnings: Vec<AttachmentWarning>,
    /// Text of the server's final reply (often a queue id).
    pub reply: String,
}

impl DeliveryReport {
    /// Returns true if every attachment made it into the message.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Delivery session.
///
/// Holds at most one connection. Methods take `&mut self`, so a session is
/// used by one task at a time; independent sessions share nothing.
pub struct Session<C: Connector = TlsConnector> {
    config: SessionConfig,
    connector: C,
    encoder: Encoder,
    state: SessionState<C::Stream>,
}

impl Session {
    /// Creates an unprepared session that connects with implicit TLS.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self::with_connector(config, TlsConnector)
    }
}

impl<C: Connector> Session<C> {
    /// Creates an unprepared session that dials through `connector`.
    #[must_use]
    pub fn with_connector(config: SessionConfig, connector: C) -> Self {
        Self {
            config,
            connector,
            encoder: Encoder::new(),
            state: SessionState::Unprepared,
        }
    }

    /// Sets the encoder used to render messages.
    #[must_use]
    pub fn encoder(mut self, encoder: Encoder) -> Self {
        self.encoder = encoder;
        self
    }

    /// Returns the session configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns true if the session holds an authenticated connection.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self.state, SessionState::Ready(_))
    }

    /// Returns true if the session has been closed.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self.state, SessionState::Closed)
    }

    /// Returns what the current connection's server advertised.
    #[must_use]
    pub const fn server_info(&self) -> Option<&ServerInfo> {
        match &self.state {
            SessionState::Ready(client) => Some(client.server_info()),
            SessionState::Unprepared | SessionState::Closed => None,
        }
    }

    /// Connects, greets and authenticates, unless already ready.
    ///
    /// On failure the session stays unprepared and nothing opened along
    /// the way is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`], [`Error::Connection`], [`Error::Protocol`]
    /// or [`Error::Auth`] for the step that failed, and [`Error::Closed`]
    /// once the session is closed.
    pub async fn prepare(&mut self) -> Result<()> {
        let client = self.take_client().await?;
        self.state = SessionState::Ready(client);
        Ok(())
    }

    /// Encodes and delivers a message, preparing the session first if
    /// needed.
    ///
    /// There is no retry within a call. If any transaction step fails the
    /// connection is dropped and the next call starts a new one.
    ///
    /// # Errors
    ///
    /// Returns the [`prepare`](Self::prepare) error unchanged if the
    /// session could not be prepared, or [`Error::Delivery`] naming the
    /// step that failed.
    pub async fn deliver(&mut self, message: &Message) -> Result<DeliveryReport> {
        let client = self.take_client().await?;

        let encoded = self.encoder.encode(message);
        let host = client.server_info().server_name.clone();

        match run_delivery(client, message, &encoded.bytes).await {
            Ok((client, reply)) => {
                self.state = SessionState::Ready(client);
                tracing::info!(
                    host = %host,
                    recipients = message.to().len(),
                    skipped_attachments = encoded.warnings.len(),
                    "Message delivered"
                );
                Ok(DeliveryReport {
                    warnings: encoded.warnings,
                    reply: reply.message_text(),
                })
            }
            Err(err) => {
                tracing::warn!(host = %host, error = %err, "Delivery failed, connection dropped");
                Err(err)
            }
        }
    }

    /// Sends QUIT and closes the session for good.
    ///
    /// Closing a session that is not connected, or already closed, does
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] if QUIT fails. The connection is released
    /// and the session closed regardless.
    pub async fn close(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, SessionState::Closed) {
            SessionState::Ready(client) => {
                let host = client.server_info().server_name.clone();
                tracing::info!(host = %host, "Closing session");
                client
                    .quit()
                    .await
                    .map_err(|source| Error::Protocol { host, source })
            }
            SessionState::Unprepared | SessionState::Closed => Ok(()),
        }
    }

    /// Moves the ready connection out of the session, opening one if needed.
    ///
    /// The session is left unprepared; callers put the client back only
    /// once it is known to be in a clean state.
    async fn take_client(&mut self) -> Result<Client<C::Stream, Authenticated>> {
        match std::mem::replace(&mut self.state, SessionState::Unprepared) {
            SessionState::Ready(client) => Ok(client),
            SessionState::Closed => {
                self.state = SessionState::Closed;
                Err(Error::Closed)
            }
            SessionState::Unprepared => self.open().await,
        }
    }

    async fn open(&self) -> Result<Client<C::Stream, Authenticated>> {
        let address = self.config.parse_address()?;
        let host = address.host.clone();

        let stream = self
            .connector
            .connect(&address)
            .await
            .map_err(|source| Error::Connection {
                address: address.to_string(),
                source,
            })?;
        tracing::debug!(%address, "Connected");

        let protocol = |source: mailman_smtp::Error| Error::Protocol {
            host: host.clone(),
            source,
        };
        let client = Client::from_stream(stream, host.clone())
            .await
            .map_err(protocol)?
            .hello(&self.config.client_identity)
            .await
            .map_err(protocol)?;

        let credentials = match self.config.auth_mode {
            AuthMode::Plain => {
                PlainCredentials::new(&self.config.username, &self.config.password, &host)
            }
        };
        let client = client
            .auth_plain(&credentials)
            .await
            .map_err(|source| Error::Auth {
                username: self.config.username.clone(),
                source,
            })?;

        tracing::info!(%address, username = %self.config.username, "Session ready");
        Ok(client)
    }
}

impl<C: Connector> fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("state", &self.state.name())
            .finish_non_exhaustive()
    }
}

/// Runs one mail transaction on an authenticated connection.
///
/// Each step stops the transaction on failure; the client is consumed and
/// its connection dropped.
async fn run_delivery<S>(
    client: Client<S, Authenticated>,
    message: &Message,
    data: &[u8],
) -> Result<(Client<S, Authenticated>, Reply)>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let at = |step: DeliveryStep| move |source: mailman_smtp::Error| Error::delivery(step, source);

    let from = mailman_smtp::Address::new(message.from().mailbox())
        .map_err(at(DeliveryStep::MailFrom))?;
    let Some((first, rest)) = message.to().split_first() else {
        return Err(Error::delivery(
            DeliveryStep::RcptTo {
                recipient: String::new(),
            },
            mailman_smtp::Error::InvalidAddress(String::new()),
        ));
    };

    let client = client
        .mail_from(from, Some(data.len()))
        .await
        .map_err(at(DeliveryStep::MailFrom))?;
    tracing::debug!(from = message.from().mailbox(), "Sender accepted");

    let step = recipient_step(first.mailbox());
    let to = mailman_smtp::Address::new(first.mailbox()).map_err(at(step.clone()))?;
    let mut client = client.rcpt_to(to).await.map_err(at(step))?;

    for recipient in rest {
        let step = recipient_step(recipient.mailbox());
        let to = mailman_smtp::Address::new(recipient.mailbox()).map_err(at(step.clone()))?;
        client = client.rcpt_to(to).await.map_err(at(step))?;
    }
    tracing::debug!(recipients = message.to().len(), "Recipients accepted");

    let mut client = client.data().await.map_err(at(DeliveryStep::Data))?;
    client.write(data).await.map_err(at(DeliveryStep::Write))?;
    client.finish().await.map_err(at(DeliveryStep::Commit))
}

fn recipient_step(mailbox: &str) -> DeliveryStep {
    DeliveryStep::RcptTo {
        recipient: mailbox.to_string(),
    }
}
