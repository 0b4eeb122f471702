//! Type-state SMTP client.

use super::ServerInfo;
use super::states::{Authenticated, Connected, Data, MailTransaction, RecipientAdded};
use crate::auth::PlainCredentials;
use crate::command::Command;
use crate::error::{Error, Result};
use crate::parser::{is_last_reply_line, parse_reply};
use crate::types::{Address, AuthMechanism, Extension, Reply, ReplyCode};
use std::collections::HashSet;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

/// SMTP client with type-state pattern.
///
/// `S` is the underlying byte stream (normally [`SmtpStream`](super::SmtpStream));
/// `State` tracks which commands are valid. Every transition consumes the
/// client, so a client whose command failed is dropped along with its
/// connection.
pub struct Client<S, State> {
    stream: BufReader<S>,
    server_info: ServerInfo,
    state: State,
}

impl<S, State: std::fmt::Debug> std::fmt::Debug for Client<S, State> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("server_info", &self.server_info)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<S> Client<S, Connected>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a client from a stream and reads the server greeting.
    ///
    /// `server_name` is the host the stream was dialed for; PLAIN
    /// credentials are only sent if their realm matches it.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the greeting fails or if the server does
    /// not answer with 220.
    pub async fn from_stream(stream: S, server_name: impl Into<String>) -> Result<Self> {
        let mut client = Self {
            stream: BufReader::new(stream),
            server_info: ServerInfo {
                server_name: server_name.into(),
                ..ServerInfo::default()
            },
            state: Connected,
        };

        let greeting = client
            .read_reply()
            .await?
            .ensure_code(ReplyCode::SERVICE_READY)?;

        // Extract hostname from greeting (first word after code)
        client.server_info.hostname = greeting
            .message
            .first()
            .and_then(|msg| msg.split_whitespace().next())
            .unwrap_or("unknown")
            .to_string();
        tracing::debug!(hostname = %client.server_info.hostname, "Received SMTP greeting");

        Ok(client)
    }

    /// Sends EHLO and discovers server capabilities.
    ///
    /// # Errors
    ///
    /// Returns an error if the EHLO command fails.
    pub async fn ehlo(mut self, client_hostname: &str) -> Result<Self> {
        let reply = self
            .send_command(Command::Ehlo {
                hostname: client_hostname.to_string(),
            })
            .await?
            .ensure_success()?;

        self.server_info.extensions = parse_extensions(&reply);
        Ok(self)
    }

    /// Greets the server with EHLO, falling back to HELO if the server
    /// permanently rejects EHLO.
    ///
    /// After a HELO fallback no extensions are known.
    ///
    /// # Errors
    ///
    /// Returns an error if both greetings fail, or if EHLO fails with
    /// anything other than a permanent rejection.
    pub async fn hello(mut self, client_hostname: &str) -> Result<Self> {
        let reply = self
            .send_command(Command::Ehlo {
                hostname: client_hostname.to_string(),
            })
            .await?;

        if reply.is_success() {
            self.server_info.extensions = parse_extensions(&reply);
            return Ok(self);
        }
        if !reply.is_permanent_error() {
            return Err(reply.into_error());
        }

        tracing::debug!(code = reply.code.as_u16(), "EHLO rejected, falling back to HELO");
        self.send_command(Command::Helo {
            hostname: client_hostname.to_string(),
        })
        .await?
        .ensure_success()?;

        self.server_info.extensions.clear();
        Ok(self)
    }

    /// Authenticates using the PLAIN mechanism.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials' realm does not match the server
    /// name, if the server does not offer PLAIN, or if authentication is
    /// rejected.
    pub async fn auth_plain(mut self, credentials: &PlainCredentials) -> Result<Client<S, Authenticated>> {
        if !credentials
            .realm()
            .eq_ignore_ascii_case(&self.server_info.server_name)
        {
            return Err(Error::WrongHost {
                expected: credentials.realm().to_string(),
                actual: self.server_info.server_name.clone(),
            });
        }

        if !self.server_info.supports_auth(&AuthMechanism::Plain) {
            return Err(Error::NotSupported("AUTH PLAIN".into()));
        }

        self.send_command(Command::Auth {
            mechanism: AuthMechanism::Plain,
            initial_response: Some(credentials.initial_response()),
        })
        .await?
        .ensure_success()?;

        tracing::debug!(username = credentials.username(), "Authenticated");
        Ok(self.transition(Authenticated))
    }
}

impl<S> Client<S, Authenticated>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Starts a mail transaction.
    ///
    /// `size` is announced with the SIZE parameter when the server supports
    /// it. If the server advertises a limit and `size` exceeds it, nothing
    /// is sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the message is too large or the MAIL FROM command
    /// fails.
    pub async fn mail_from(
        mut self,
        from: Address,
        size: Option<usize>,
    ) -> Result<Client<S, MailTransaction>> {
        let size = size.filter(|_| self.server_info.supports_size());
        if let (Some(size), Some(limit)) = (size, self.server_info.max_message_size()) {
            if size > limit {
                return Err(Error::MessageTooLarge { size, limit });
            }
        }

        self.send_command(Command::MailFrom { from, size })
            .await?
            .ensure_success()?;

        Ok(self.transition(MailTransaction))
    }
}

impl<S> Client<S, MailTransaction>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Adds the first recipient to the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the RCPT TO command fails.
    pub async fn rcpt_to(mut self, to: Address) -> Result<Client<S, RecipientAdded>> {
        self.send_command(Command::RcptTo { to })
            .await?
            .ensure_success()?;

        Ok(self.transition(RecipientAdded))
    }

    /// Aborts the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the RSET command fails.
    pub async fn reset(mut self) -> Result<Client<S, Authenticated>> {
        self.send_command(Command::Rset).await?.ensure_success()?;
        Ok(self.transition(Authenticated))
    }
}

impl<S> Client<S, RecipientAdded>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Adds another recipient to the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the RCPT TO command fails.
    pub async fn rcpt_to(mut self, to: Address) -> Result<Self> {
        self.send_command(Command::RcptTo { to })
            .await?
            .ensure_success()?;

        Ok(self)
    }

    /// Begins sending message data.
    ///
    /// # Errors
    ///
    /// Returns an error if the DATA command is not answered with 354.
    pub async fn data(mut self) -> Result<Client<S, Data>> {
        self.send_command(Command::Data)
            .await?
            .ensure_code(ReplyCode::START_DATA)?;

        Ok(self.transition(Data::new()))
    }

    /// Aborts the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the RSET command fails.
    pub async fn reset(mut self) -> Result<Client<S, Authenticated>> {
        self.send_command(Command::Rset).await?.ensure_success()?;
        Ok(self.transition(Authenticated))
    }
}

impl<S> Client<S, Data>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Writes a chunk of message content.
    ///
    /// Bare LF line endings are sent as CRLF and lines starting with `.`
    /// are dot-stuffed. Chunks may split lines anywhere.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn write(&mut self, chunk: &[u8]) -> Result<()> {
        let mut out = Vec::with_capacity(chunk.len() + chunk.len() / 32 + 2);
        let mut last = self.state.last_byte;

        for &byte in chunk {
            if byte == b'\n' && last != b'\r' {
                out.push(b'\r');
            }
            if byte == b'.' && last == b'\n' {
                out.push(b'.');
            }
            out.push(byte);
            last = byte;
        }

        self.write_raw(&out).await?;
        self.state.last_byte = last;
        Ok(())
    }

    /// Ends the message with `CRLF.CRLF` and waits for the server to accept
    /// it.
    ///
    /// Returns the authenticated client, ready for another transaction, and
    /// the server's final reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or the server rejects the message.
    pub async fn finish(mut self) -> Result<(Client<S, Authenticated>, Reply)> {
        if !self.state.at_line_start() {
            self.write_raw(b"\r\n").await?;
        }
        self.write_raw(b".\r\n").await?;

        let reply = self.read_reply().await?.ensure_success()?;
        Ok((self.transition(Authenticated), reply))
    }

    /// Writes a complete message and finishes the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if sending fails or the server rejects the message.
    pub async fn send_message(mut self, message: &[u8]) -> Result<(Client<S, Authenticated>, Reply)> {
        self.write(message).await?;
        self.finish().await
    }
}

// Common implementation for all states
impl<S, State> Client<S, State>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Returns the server information.
    #[must_use]
    pub const fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    /// Sends QUIT and closes the connection (available in any state).
    ///
    /// # Errors
    ///
    /// Returns an error if the QUIT command fails.
    pub async fn quit(mut self) -> Result<()> {
        let reply = self.send_command(Command::Quit).await?;

        if !reply.is_success() && reply.code != ReplyCode::CLOSING {
            return Err(reply.into_error());
        }

        self.stream.get_mut().shutdown().await?;
        Ok(())
    }

    fn transition<T>(self, state: T) -> Client<S, T> {
        Client {
            stream: self.stream,
            server_info: self.server_info,
            state,
        }
    }

    async fn send_command(&mut self, cmd: Command) -> Result<Reply> {
        tracing::trace!(command = cmd.verb(), "Sending SMTP command");
        self.write_raw(&cmd.serialize()).await?;

        let reply = self.read_reply().await?;
        tracing::debug!(command = cmd.verb(), code = reply.code.as_u16(), "SMTP reply");
        Ok(reply)
    }

    async fn write_raw(&mut self, data: &[u8]) -> Result<()> {
        let writer = self.stream.get_mut();
        writer.write_all(data).await?;
        writer.flush().await?;
        Ok(())
    }

    async fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        if self.stream.read_line(&mut line).await? == 0 {
            return Err(Error::ConnectionClosed);
        }
        Ok(line.trim_end().to_string())
    }

    async fn read_reply(&mut self) -> Result<Reply> {
        let mut lines = Vec::new();
        loop {
            let line = self.read_line().await?;
            if line.is_empty() {
                continue;
            }

            let is_last = is_last_reply_line(&line);
            lines.push(line);

            if is_last {
                break;
            }
        }

        parse_reply(&lines)
    }
}

fn parse_extensions(reply: &Reply) -> HashSet<Extension> {
    // First line is the server's greeting text
    reply
        .message
        .iter()
        .skip(1)
        .map(|line| Extension::parse(line))
        .collect()
}
