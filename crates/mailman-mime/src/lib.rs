//! # mailman-mime
//!
//! MIME generation for outgoing mail.
//!
//! ## Features
//!
//! - **Message model**: sender, ordered recipients, subject, plain-text body
//! - **Attachments**: any source implementing [`Attachment`]; in-memory and
//!   file-backed implementations included
//! - **Encoder**: fixed four-level multipart layout (mixed, related,
//!   alternative, text) with base64 attachments
//! - **Best effort**: unreadable attachments are skipped and reported as
//!   warnings instead of failing the whole message
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailman_mime::{Encoder, MemoryAttachment, Message};
//!
//! let message = Message::builder()
//!     .from(("Alice", "alice@example.com"))
//!     .to("bob@example.com")
//!     .subject("Report")
//!     .body_text("See attached.")
//!     .attach(MemoryAttachment::new("report.csv", "text/csv", csv_bytes))
//!     .build()?;
//!
//! let encoded = Encoder::new().encode(&message);
//! for warning in &encoded.warnings {
//!     eprintln!("{warning}");
//! }
//! ```
//!
//! ## Known limitations
//!
//! - ASCII header values are never folded; long ASCII subjects produce long
//!   lines.
//! - Only a `text/plain` alternative is generated.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod address;
mod attachment;
mod encoder;
mod error;
mod message;

pub mod encoding;

pub use address::Address;
pub use attachment::{Attachment, FileAttachment, MemoryAttachment};
pub use encoder::{
    ALTERNATIVE_BOUNDARY, AttachmentWarning, BoundaryStyle, Encoded, Encoder, MIXED_BOUNDARY,
    RELATED_BOUNDARY,
};
pub use error::{Error, Result};
pub use message::{Message, MessageBuilder};
