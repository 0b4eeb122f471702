//! Attachment sources.
//!
//! The encoder only needs the [`Attachment`] capability: a filename, a
//! content type, and a byte stream. How the bytes are produced is up to the
//! implementation.

use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

/// A file attached to an outgoing message.
///
/// [`open_data`](Attachment::open_data) is called once per encode and the
/// returned reader is read to the end and dropped.
pub trait Attachment: fmt::Debug + Send + Sync {
    /// File name announced in the `name` and `filename` parameters.
    fn filename(&self) -> &str;

    /// MIME type, e.g. `application/pdf`.
    fn content_type(&self) -> &str;

    /// Opens a fresh reader over the attachment bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be opened.
    fn open_data(&self) -> io::Result<Box<dyn Read + '_>>;
}

/// Attachment held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryAttachment {
    filename: String,
    content_type: String,
    data: Vec<u8>,
}

impl MemoryAttachment {
    /// Creates an in-memory attachment.
    #[must_use]
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Returns the attachment bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Attachment for MemoryAttachment {
    fn filename(&self) -> &str {
        &self.filename
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn open_data(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(Cursor::new(self.data.as_slice())))
    }
}

/// Attachment read from the filesystem at encode time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    path: PathBuf,
    filename: String,
    content_type: String,
}

impl FileAttachment {
    /// Creates an attachment for `path`.
    ///
    /// The filename is the final path component and the content type is
    /// guessed from the extension, falling back to
    /// `application/octet-stream`. The file is not opened until encoding.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content_type = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Self {
            path,
            filename,
            content_type,
        }
    }

    /// Overrides the guessed content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Returns the path the data is read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Attachment for FileAttachment {
    fn filename(&self) -> &str {
        &self.filename
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn open_data(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(File::open(&self.path)?))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_attachment_reads_data() {
        let attachment = MemoryAttachment::new("notes.txt", "text/plain", b"abc".to_vec());
        let mut data = Vec::new();
        attachment.open_data().unwrap().read_to_end(&mut data).unwrap();
        assert_eq!(data, b"abc");
        assert_eq!(attachment.filename(), "notes.txt");
        assert_eq!(attachment.content_type(), "text/plain");
    }

    #[test]
    fn test_file_attachment_guesses_type() {
        let attachment = FileAttachment::new("/tmp/reports/q3.pdf");
        assert_eq!(attachment.filename(), "q3.pdf");
        assert_eq!(attachment.content_type(), "application/pdf");
    }

    #[test]
    fn test_file_attachment_unknown_extension() {
        let attachment = FileAttachment::new("blob.mailman-unknown");
        assert_eq!(attachment.content_type(), "application/octet-stream");

        let attachment = attachment.with_content_type("text/x-custom");
        assert_eq!(attachment.content_type(), "text/x-custom");
    }

    #[test]
    fn test_file_attachment_missing_file() {
        let attachment = FileAttachment::new("/nonexistent/mailman/file.txt");
        assert!(attachment.open_data().is_err());
    }
}
