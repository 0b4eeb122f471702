//! Type-state markers for SMTP client connection states.

/// Greeted by the server; EHLO/HELO and AUTH are valid.
#[derive(Debug, Clone, Copy, Default)]
pub struct Connected;

/// Authenticated; a mail transaction can start.
#[derive(Debug, Clone, Copy, Default)]
pub struct Authenticated;

/// MAIL FROM accepted; waiting for the first recipient.
#[derive(Debug, Clone, Copy, Default)]
pub struct MailTransaction;

/// At least one recipient accepted; DATA is valid.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecipientAdded;

/// Sending message content.
///
/// Carries the last byte written so dot-stuffing and line endings stay
/// correct across separate writes.
#[derive(Debug, Clone, Copy)]
pub struct Data {
    pub(crate) last_byte: u8,
}

impl Data {
    pub(crate) const fn new() -> Self {
        // Message content starts at the beginning of a line
        Self { last_byte: b'\n' }
    }

    /// Returns true if the next byte written starts a new line.
    #[must_use]
    pub const fn at_line_start(&self) -> bool {
        self.last_byte == b'\n'
    }
}
