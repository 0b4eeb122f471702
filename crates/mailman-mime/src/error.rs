//! Error types for MIME operations.

/// Result type alias for MIME operations.
pub type Result<T> = std::result::Result<T, Error>;

/// MIME error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Message has no sender.
    #[error("Message has no sender")]
    MissingSender,

    /// Message has no recipients.
    #[error("Message has no recipients")]
    MissingRecipients,

    /// A value written into a header contains CR or LF.
    #[error("Line break in {field}: {value:?}")]
    LineBreakInHeader {
        /// Which value was rejected.
        field: &'static str,
        /// The offending value.
        value: String,
    },

    /// Base64 decode error.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),
}
