//! Outgoing message structure.

use crate::address::Address;
use crate::attachment::Attachment;
use crate::error::{Error, Result};

/// An outgoing message: sender, recipients, subject, plain-text body and
/// attachments.
///
/// Built with [`MessageBuilder`]; immutable afterwards. Recipients always
/// contain at least one address.
#[derive(Debug)]
pub struct Message {
    from: Address,
    to: Vec<Address>,
    subject: String,
    body_text: String,
    attachments: Vec<Box<dyn Attachment>>,
}

impl Message {
    /// Creates a message builder.
    #[must_use]
    pub fn builder() -> MessageBuilder {
        MessageBuilder::new()
    }

    /// Returns the sender.
    #[must_use]
    pub const fn from(&self) -> &Address {
        &self.from
    }

    /// Returns the recipients in order.
    #[must_use]
    pub fn to(&self) -> &[Address] {
        &self.to
    }

    /// Returns the subject.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the plain-text body.
    #[must_use]
    pub fn body_text(&self) -> &str {
        &self.body_text
    }

    /// Returns the attachments in order.
    #[must_use]
    pub fn attachments(&self) -> &[Box<dyn Attachment>] {
        &self.attachments
    }
}

/// Builder for [`Message`].
#[derive(Debug, Default)]
pub struct MessageBuilder {
    from: Option<Address>,
    to: Vec<Address>,
    subject: String,
    body_text: String,
    attachments: Vec<Box<dyn Attachment>>,
}

impl MessageBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sender.
    #[must_use]
    pub fn from(mut self, from: impl Into<Address>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Adds a recipient.
    #[must_use]
    pub fn to(mut self, to: impl Into<Address>) -> Self {
        self.to.push(to.into());
        self
    }

    /// Sets the subject.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Sets the plain-text body.
    #[must_use]
    pub fn body_text(mut self, body_text: impl Into<String>) -> Self {
        self.body_text = body_text.into();
        self
    }

    /// Adds an attachment.
    #[must_use]
    pub fn attach(mut self, attachment: impl Attachment + 'static) -> Self {
        self.attachments.push(Box::new(attachment));
        self
    }

    /// Builds the message.
    ///
    /// # Errors
    ///
    /// Returns an error if the sender is missing, there are no recipients,
    /// or an address, the subject or an attachment's name or content type
    /// contains a line break.
    pub fn build(self) -> Result<Message> {
        let from = self.from.ok_or(Error::MissingSender)?;
        if self.to.is_empty() {
            return Err(Error::MissingRecipients);
        }

        check_address("sender", &from)?;
        for to in &self.to {
            check_address("recipient", to)?;
        }
        check_header_value("subject", &self.subject)?;
        for attachment in &self.attachments {
            check_header_value("attachment filename", attachment.filename())?;
            check_header_value("attachment content type", attachment.content_type())?;
        }

        Ok(Message {
            from,
            to: self.to,
            subject: self.subject,
            body_text: self.body_text,
            attachments: self.attachments,
        })
    }
}

fn check_address(field: &'static str, address: &Address) -> Result<()> {
    check_header_value(field, address.display_name())?;
    check_header_value(field, address.mailbox())
}

/// Header values are written verbatim; a CR or LF would start a new header.
fn check_header_value(field: &'static str, value: &str) -> Result<()> {
    if value.contains(['\r', '\n']) {
        return Err(Error::LineBreakInHeader {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::attachment::MemoryAttachment;

    #[test]
    fn test_build_message() {
        let message = Message::builder()
            .from(("Alice", "alice@example.com"))
            .to("bob@example.com")
            .to(("Carol", "carol@example.com"))
            .subject("Hi")
            .body_text("hello")
            .attach(MemoryAttachment::new("a.txt", "text/plain", b"a".to_vec()))
            .build()
            .unwrap();

        assert_eq!(message.from().mailbox(), "alice@example.com");
        assert_eq!(message.to().len(), 2);
        assert_eq!(message.to()[1].display_name(), "Carol");
        assert_eq!(message.subject(), "Hi");
        assert_eq!(message.body_text(), "hello");
        assert_eq!(message.attachments().len(), 1);
    }

    #[test]
    fn test_build_requires_sender() {
        let result = Message::builder().to("bob@example.com").build();
        assert!(matches!(result, Err(Error::MissingSender)));
    }

    #[test]
    fn test_build_requires_recipients() {
        let result = Message::builder().from("alice@example.com").build();
        assert!(matches!(result, Err(Error::MissingRecipients)));
    }

    #[test]
    fn test_build_rejects_line_breaks() {
        let base = || Message::builder().from("alice@example.com").to("bob@example.com");

        let result = base().subject("Hi\nBcc: eve@example.com").build();
        assert!(matches!(
            result,
            Err(Error::LineBreakInHeader { field: "subject", .. })
        ));

        let result = Message::builder()
            .from(("Eve\r", "eve@example.com"))
            .to("bob@example.com")
            .build();
        assert!(matches!(
            result,
            Err(Error::LineBreakInHeader { field: "sender", .. })
        ));

        let result = base().to("carol@example.com\r\nX: y").build();
        assert!(matches!(
            result,
            Err(Error::LineBreakInHeader { field: "recipient", .. })
        ));

        let result = base()
            .attach(MemoryAttachment::new("a.txt", "text/plain\r\nX: y", Vec::new()))
            .build();
        assert!(matches!(
            result,
            Err(Error::LineBreakInHeader { field: "attachment content type", .. })
        ));
    }
}
