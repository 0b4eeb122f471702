//! # mailman-smtp
//!
//! An SMTP submission client (RFC 5321) for authenticated delivery over
//! implicit TLS.
//!
//! ## Features
//!
//! - **Type-state connection management**: Compile-time enforcement of valid
//!   SMTP state transitions
//! - **Protocol support**: EHLO (with HELO fallback), AUTH PLAIN, MAIL FROM,
//!   RCPT TO, DATA, RSET, QUIT
//! - **TLS**: Implicit TLS (port 465) with webpki roots
//! - **Transport-agnostic**: the client runs over any `AsyncRead + AsyncWrite`
//!   stream
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailman_smtp::{Address, Client, PlainCredentials};
//! use mailman_smtp::connection::connect_tls;
//!
//! #[tokio::main]
//! async fn main() -> mailman_smtp::Result<()> {
//!     let stream = connect_tls("smtp.example.com", 465).await?;
//!     let client = Client::from_stream(stream, "smtp.example.com").await?;
//!     let client = client.hello("client.example.com").await?;
//!
//!     let credentials = PlainCredentials::new("user@example.com", "password", "smtp.example.com");
//!     let client = client.auth_plain(&credentials).await?;
//!
//!     let client = client.mail_from(Address::new("sender@example.com")?, None).await?;
//!     let client = client.rcpt_to(Address::new("recipient@example.com")?).await?;
//!     let client = client.data().await?;
//!
//!     let message = b"Subject: Test\r\n\r\nHello, World!\r\n";
//!     let (client, _reply) = client.send_message(message).await?;
//!
//!     client.quit().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Connection States
//!
//! ```text
//! ┌──────────────┐
//! │  Connected   │ ─── auth_plain() ───→ Authenticated
//! └──────────────┘                            │
//!        ┌────────────────────────────────────┘
//!        └─── mail_from() ───→ MailTransaction ───→ RecipientAdded ───→ Data
//!                                                                        │
//!                         Authenticated ←─── finish() ───────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod auth;
pub mod command;
pub mod connection;
mod error;
pub mod parser;
pub mod types;

pub use auth::PlainCredentials;
pub use connection::{
    Authenticated, Client, Connected, Data, MailTransaction, RecipientAdded, ServerInfo,
    SmtpStream,
};
pub use error::{Error, Result};
pub use types::{Address, AuthMechanism, Extension, Reply, ReplyCode};
