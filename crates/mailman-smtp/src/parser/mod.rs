//! Reply parsing (RFC 5321 section 4.2).
//!
//! A reply is one or more lines of `code SP text` or `code - text`; only
//! the last line uses the space. Lines arrive here without their CRLF.

use crate::error::{Error, Result};
use crate::types::{Reply, ReplyCode};

/// Builds a [`Reply`] from the lines of one reply.
///
/// All lines must carry the same three-digit code.
///
/// # Errors
///
/// Returns [`Error::Protocol`] if there are no lines, a line does not start
/// with a three-digit code, or the codes differ.
pub fn parse_reply(lines: &[String]) -> Result<Reply> {
    let mut code = None;
    let mut message = Vec::with_capacity(lines.len());

    for line in lines {
        let (line_code, text) = split_line(line)?;
        match code {
            None => code = Some(line_code),
            Some(expected) if expected != line_code => {
                return Err(Error::Protocol(format!(
                    "Reply code changed from {expected} to {line_code}: {line}"
                )));
            }
            Some(_) => {}
        }
        message.push(text.to_string());
    }

    let code = code.ok_or_else(|| Error::Protocol("Empty reply".into()))?;
    Ok(Reply::new(ReplyCode::new(code), message))
}

/// Returns true if `line` ends its reply: a bare code, or a space after the
/// code.
#[must_use]
pub fn is_last_reply_line(line: &str) -> bool {
    match line.as_bytes().get(3) {
        None => line.len() == 3,
        Some(&separator) => separator == b' ',
    }
}

fn split_line(line: &str) -> Result<(u16, &str)> {
    let digits = line
        .get(..3)
        .filter(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| Error::Protocol(format!("Malformed reply line: {line:?}")))?;

    let code = digits
        .parse()
        .map_err(|_| Error::Protocol(format!("Malformed reply line: {line:?}")))?;
    let text = line.get(4..).unwrap_or_default();
    Ok((code, text))
}
