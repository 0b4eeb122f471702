//! # mailman
//!
//! Deliver mail with attachments through an authenticated SMTP server over
//! implicit TLS.
//!
//! ## Features
//!
//! - **Session**: prepare once, deliver many messages over the same
//!   connection; a failed delivery drops the connection and the next one
//!   reconnects
//! - **Errors by step**: configuration, connection, greeting, authentication
//!   and each transaction step fail with their own error variant
//! - **Best-effort attachments**: unreadable attachments are left out and
//!   reported in the [`DeliveryReport`]
//! - **Pluggable transport**: sessions dial through a [`Connector`];
//!   [`TlsConnector`] is the default
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailman::{FileAttachment, Message, Session, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SessionConfig::new("smtp.example.com:465", "user@example.com", "password");
//!     let mut session = Session::new(config);
//!
//!     let message = Message::builder()
//!         .from(("Reports", "reports@example.com"))
//!         .to("team@example.com")
//!         .subject("Weekly report")
//!         .body_text("Numbers attached.")
//!         .attach(FileAttachment::new("report.pdf"))
//!         .build()?;
//!
//!     let report = session.deliver(&message).await?;
//!     for warning in &report.warnings {
//!         eprintln!("{warning}");
//!     }
//!
//!     session.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Session States
//!
//! ```text
//! Unprepared ── prepare() ──→ Ready ── deliver() fails ──→ Unprepared
//!      │                        │
//!      └──────── close() ───────┴──────────→ Closed
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod config;
mod connector;
mod error;
mod session;

pub use config::{AuthMode, DEFAULT_CLIENT_IDENTITY, ServerAddress, SessionConfig};
pub use connector::{Connector, TlsConnector};
pub use error::{DeliveryStep, Error, Result};
pub use session::{DeliveryReport, Session};

// Message types
pub use mailman_mime::{
    Address, Attachment, AttachmentWarning, BoundaryStyle, Encoded, Encoder, Error as MessageError,
    FileAttachment, MemoryAttachment, Message, MessageBuilder,
};

pub use mailman_smtp::ServerInfo;
