//! MIME encoding utilities.
//!
//! Supports Base64, Quoted-Printable, and RFC 2047 header encoding.

use crate::error::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt::Write as _;

/// Maximum encoded line length (RFC 2045, section 6.7 and 6.8).
const MAX_LINE_LENGTH: usize = 76;

/// Maximum length of one encoded word (RFC 2047, section 2).
const MAX_ENCODED_WORD_LENGTH: usize = 75;

/// Encodes data as Base64.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Encodes data as Base64, broken into CRLF-separated lines of at most
/// 76 characters.
#[must_use]
pub fn encode_base64_wrapped(data: &[u8]) -> String {
    let encoded = STANDARD.encode(data);
    let mut result = String::with_capacity(encoded.len() + encoded.len() / MAX_LINE_LENGTH * 2);

    for (idx, ch) in encoded.chars().enumerate() {
        if idx > 0 && idx % MAX_LINE_LENGTH == 0 {
            result.push_str("\r\n");
        }
        result.push(ch);
    }

    result
}

/// Decodes Base64 data, ignoring embedded whitespace and line breaks.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD.decode(cleaned).map_err(Into::into)
}

/// Encodes text using Quoted-Printable encoding (RFC 2045).
///
/// Line breaks in the input (`\n` or `\r\n`) become hard CRLF breaks.
/// Longer lines are split with soft breaks, and bytes that are not
/// printable ASCII, `=`, or whitespace at the end of a line are escaped.
#[must_use]
pub fn encode_quoted_printable(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut lines = text.split('\n').peekable();

    while let Some(line) = lines.next() {
        if lines.peek().is_some() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            encode_quoted_printable_line(line.as_bytes(), &mut result);
            result.push_str("\r\n");
        } else {
            encode_quoted_printable_line(line.as_bytes(), &mut result);
        }
    }

    result
}

fn encode_quoted_printable_line(line: &[u8], result: &mut String) {
    let mut line_length = 0;

    for (idx, &byte) in line.iter().enumerate() {
        let at_end = idx + 1 == line.len();
        let literal = match byte {
            b'!'..=b'<' | b'>'..=b'~' => true,
            // Whitespace is only safe when something follows it on the line
            b' ' | b'\t' => !at_end,
            _ => false,
        };
        let width = if literal { 1 } else { 3 };

        // Leave room for the trailing '=' of a soft line break
        if line_length + width > MAX_LINE_LENGTH - 1 {
            result.push_str("=\r\n");
            line_length = 0;
        }

        if literal {
            result.push(char::from(byte));
        } else {
            let _ = write!(result, "={byte:02X}");
        }
        line_length += width;
    }
}

/// Encodes a header value using RFC 2047 encoding when it contains
/// non-ASCII characters.
///
/// Pure ASCII values are returned unchanged. Otherwise the value becomes
/// one or more `=?charset?B?...?=` encoded words of at most 75 characters,
/// separated by folding whitespace. Words never split a character.
#[must_use]
pub fn encode_rfc2047(text: &str, charset: &str) -> String {
    if text.is_ascii() {
        return text.to_string();
    }

    // "=?" charset "?B?" payload "?="
    let payload = MAX_ENCODED_WORD_LENGTH.saturating_sub(charset.len() + 7);
    let max_chunk = (payload / 4 * 3).max(4);

    let mut words = Vec::new();
    let mut start = 0;
    for (idx, ch) in text.char_indices() {
        if idx + ch.len_utf8() - start > max_chunk {
            words.push(&text[start..idx]);
            start = idx;
        }
    }
    words.push(&text[start..]);

    words
        .iter()
        .map(|chunk| format!("=?{charset}?B?{}?=", encode_base64(chunk.as_bytes())))
        .collect::<Vec<_>>()
        .join("\r\n ")
}
