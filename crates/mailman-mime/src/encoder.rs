//! MIME multipart encoder.
//!
//! Renders a [`Message`] into the byte stream carried by the SMTP `DATA`
//! command. The body is always four nested regions:
//!
//! ```text
//! headers
//! multipart/mixed
//! ├── multipart/related
//! │   └── multipart/alternative
//! │       └── text/plain (quoted-printable)
//! ├── attachment 1 (base64)
//! └── attachment N (base64)
//! ```

use crate::attachment::Attachment;
use crate::encoding::{encode_base64_wrapped, encode_quoted_printable, encode_rfc2047};
use crate::message::Message;
use chrono::{DateTime, FixedOffset, Local};
use std::fmt::Write as _;
use std::io::{self, Read};
use uuid::Uuid;

/// Boundary of the outer `multipart/mixed` region.
pub const MIXED_BOUNDARY: &str = "MixedBoundaryString";
/// Boundary of the `multipart/related` region.
pub const RELATED_BOUNDARY: &str = "RelatedBoundaryString";
/// Boundary of the innermost `multipart/alternative` region.
pub const ALTERNATIVE_BOUNDARY: &str = "AlternativeBoundaryString";

/// Date header format (RFC 2822).
const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// How multipart boundaries are chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BoundaryStyle {
    /// The fixed strings [`MIXED_BOUNDARY`], [`RELATED_BOUNDARY`] and
    /// [`ALTERNATIVE_BOUNDARY`].
    #[default]
    Fixed,
    /// Fresh random boundaries for every encoded message.
    Unique,
}

#[derive(Debug)]
struct Boundaries {
    mixed: String,
    related: String,
    alternative: String,
}

impl Boundaries {
    fn new(style: BoundaryStyle) -> Self {
        match style {
            BoundaryStyle::Fixed => Self {
                mixed: MIXED_BOUNDARY.to_string(),
                related: RELATED_BOUNDARY.to_string(),
                alternative: ALTERNATIVE_BOUNDARY.to_string(),
            },
            BoundaryStyle::Unique => {
                let token = Uuid::new_v4().simple();
                Self {
                    mixed: format!("{MIXED_BOUNDARY}_{token}"),
                    related: format!("{RELATED_BOUNDARY}_{token}"),
                    alternative: format!("{ALTERNATIVE_BOUNDARY}_{token}"),
                }
            }
        }
    }
}

/// An attachment left out of the encoded message because its data could
/// not be read.
#[derive(Debug, thiserror::Error)]
#[error("attachment {filename:?} skipped: {source}")]
pub struct AttachmentWarning {
    /// Name of the skipped attachment.
    pub filename: String,
    /// Read error.
    #[source]
    pub source: io::Error,
}

/// Output of [`Encoder::encode`].
#[derive(Debug)]
pub struct Encoded {
    /// Wire bytes: headers, blank line, multipart body.
    pub bytes: Vec<u8>,
    /// Attachments that were skipped, in message order.
    pub warnings: Vec<AttachmentWarning>,
}

impl Encoded {
    /// Returns true if every attachment made it into the output.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Stateless MIME encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct Encoder {
    boundary_style: BoundaryStyle,
}

impl Encoder {
    /// Creates an encoder using the fixed boundary strings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how boundaries are chosen.
    #[must_use]
    pub const fn boundary_style(mut self, style: BoundaryStyle) -> Self {
        self.boundary_style = style;
        self
    }

    /// Encodes a message, stamping it with the current local time.
    #[must_use]
    pub fn encode(&self, message: &Message) -> Encoded {
        self.encode_at(message, Local::now().fixed_offset())
    }

    /// Encodes a message with an explicit `Date` header value.
    ///
    /// Attachments whose data cannot be read are skipped and reported in
    /// [`Encoded::warnings`]; encoding itself never fails.
    #[must_use]
    pub fn encode_at(&self, message: &Message, date: DateTime<FixedOffset>) -> Encoded {
        let boundaries = Boundaries::new(self.boundary_style);
        let mut buf = String::new();
        let mut warnings = Vec::new();

        write_headers(&mut buf, message, date, &boundaries);
        write_mixed(&mut buf, message, &boundaries, &mut warnings);

        Encoded {
            bytes: buf.into_bytes(),
            warnings,
        }
    }
}

fn write_headers(buf: &mut String, message: &Message, date: DateTime<FixedOffset>, boundaries: &Boundaries) {
    let recipients = message
        .to()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    let _ = write!(buf, "Date: {}\r\n", date.format(DATE_FORMAT));
    let _ = write!(buf, "From: {}\r\n", message.from());
    let _ = write!(buf, "To: {recipients}\r\n");
    let _ = write!(buf, "Subject: {}\r\n", encode_rfc2047(message.subject(), "utf-8"));
    buf.push_str("MIME-Version: 1.0\r\n");
    let _ = write!(
        buf,
        "Content-Type: multipart/mixed; boundary=\"{}\"\r\n\r\n",
        boundaries.mixed
    );
}

fn write_mixed(
    buf: &mut String,
    message: &Message,
    boundaries: &Boundaries,
    warnings: &mut Vec<AttachmentWarning>,
) {
    let _ = write!(buf, "--{}\r\n", boundaries.mixed);
    write_related(buf, message, boundaries);

    for attachment in message.attachments() {
        if let Err(source) = write_attachment(buf, attachment.as_ref(), &boundaries.mixed) {
            tracing::warn!(
                filename = attachment.filename(),
                error = %source,
                "Skipping unreadable attachment"
            );
            warnings.push(AttachmentWarning {
                filename: attachment.filename().to_string(),
                source,
            });
        }
    }

    let _ = write!(buf, "--{}--\r\n", boundaries.mixed);
}

fn write_related(buf: &mut String, message: &Message, boundaries: &Boundaries) {
    let _ = write!(
        buf,
        "Content-Type: multipart/related; boundary=\"{}\"\r\n\r\n",
        boundaries.related
    );
    let _ = write!(buf, "--{}\r\n", boundaries.related);
    write_alternative(buf, message, boundaries);
    let _ = write!(buf, "--{}--\r\n\r\n", boundaries.related);
}

fn write_alternative(buf: &mut String, message: &Message, boundaries: &Boundaries) {
    let _ = write!(
        buf,
        "Content-Type: multipart/alternative; boundary=\"{}\"\r\n\r\n",
        boundaries.alternative
    );
    let _ = write!(buf, "--{}\r\n", boundaries.alternative);
    buf.push_str("Content-Type: text/plain; charset=\"utf-8\"\r\n");
    buf.push_str("Content-Transfer-Encoding: quoted-printable\r\n\r\n");
    buf.push_str(&encode_quoted_printable(message.body_text()));
    buf.push_str("\r\n\r\n");
    let _ = write!(buf, "--{}--\r\n\r\n", boundaries.alternative);
}

/// Writes one attachment part. Nothing is written if reading fails.
fn write_attachment(buf: &mut String, attachment: &dyn Attachment, boundary: &str) -> io::Result<()> {
    let mut data = Vec::new();
    attachment.open_data()?.read_to_end(&mut data)?;

    let filename = quote_parameter(attachment.filename());
    let _ = write!(buf, "--{boundary}\r\n");
    let _ = write!(
        buf,
        "Content-Type: {}; name=\"{filename}\"\r\n",
        attachment.content_type()
    );
    buf.push_str("Content-Transfer-Encoding: base64\r\n");
    let _ = write!(buf, "Content-Disposition: attachment; filename=\"{filename}\"\r\n\r\n");
    buf.push_str(&encode_base64_wrapped(&data));
    buf.push_str("\r\n");

    Ok(())
}

fn quote_parameter(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
