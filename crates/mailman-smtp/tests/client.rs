//! Integration tests for the SMTP client.
//!
//! These tests use a mock stream to simulate SMTP server replies without
//! requiring a real server connection.

#![allow(clippy::unwrap_used)]

use std::io::{self, Cursor};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio_test::{assert_err, assert_ok};

use mailman_smtp::{Address, Authenticated, Client, Error, PlainCredentials};

const HOST: &str = "smtp.example.com";

/// Mock stream that returns predefined replies and records what was sent.
struct MockStream {
    replies: Cursor<Vec<u8>>,
    sent: Arc<Mutex<Vec<u8>>>,
}

impl MockStream {
    fn new(replies: &str) -> (Self, Arc<Mutex<Vec<u8>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let stream = Self {
            replies: Cursor::new(replies.as_bytes().to_vec()),
            sent: Arc::clone(&sent),
        };
        (stream, sent)
    }
}

impl AsyncRead for MockStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let data = self.replies.get_ref();
        let pos = usize::try_from(self.replies.position()).unwrap();

        if pos >= data.len() {
            return Poll::Ready(Ok(()));
        }

        let remaining = &data[pos..];
        let to_read = remaining.len().min(buf.remaining());
        buf.put_slice(&remaining[..to_read]);
        self.replies.set_position((pos + to_read) as u64);

        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for MockStream {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.sent.lock().unwrap().extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

fn sent_text(sent: &Arc<Mutex<Vec<u8>>>) -> String {
    String::from_utf8(sent.lock().unwrap().clone()).unwrap()
}

const GREETING: &str = "220 smtp.example.com ESMTP ready\r\n";
const EHLO_REPLY: &str = "250-smtp.example.com greets client.test\r\n250-AUTH LOGIN PLAIN\r\n250-SIZE 1000\r\n250 8BITMIME\r\n";
const AUTH_OK: &str = "235 2.7.0 Authentication successful\r\n";

fn credentials() -> PlainCredentials {
    PlainCredentials::new("user", "pass", HOST)
}

async fn authenticated(
    transaction_replies: &str,
) -> (Client<MockStream, Authenticated>, Arc<Mutex<Vec<u8>>>) {
    let replies = format!("{GREETING}{EHLO_REPLY}{AUTH_OK}{transaction_replies}");
    let (stream, sent) = MockStream::new(&replies);

    let client = assert_ok!(Client::from_stream(stream, HOST).await);
    let client = assert_ok!(client.hello("client.test").await);
    let client = assert_ok!(client.auth_plain(&credentials()).await);
    (client, sent)
}

#[tokio::test]
async fn test_full_transaction() {
    let (client, sent) = authenticated(concat!(
        "250 2.1.0 Sender OK\r\n",
        "250 2.1.5 Recipient OK\r\n",
        "354 Start mail input\r\n",
        "250 2.0.0 Queued as 1234\r\n",
        "221 2.0.0 Bye\r\n",
    ))
    .await;

    assert_eq!(client.server_info().hostname, "smtp.example.com");
    assert_eq!(client.server_info().max_message_size(), Some(1000));

    let client = assert_ok!(
        client
            .mail_from(Address::new("a@x.com").unwrap(), Some(30))
            .await
    );
    let client = assert_ok!(client.rcpt_to(Address::new("b@x.com").unwrap()).await);
    let client = assert_ok!(client.data().await);
    let (client, reply) = assert_ok!(
        client
            .send_message(b"Subject: t\r\n\r\n.hidden\nend")
            .await
    );
    assert_eq!(reply.message_text(), "2.0.0 Queued as 1234");
    assert_ok!(client.quit().await);

    assert_eq!(
        sent_text(&sent),
        concat!(
            "EHLO client.test\r\n",
            "AUTH PLAIN AHVzZXIAcGFzcw==\r\n",
            "MAIL FROM:<a@x.com> SIZE=30\r\n",
            "RCPT TO:<b@x.com>\r\n",
            "DATA\r\n",
            "Subject: t\r\n\r\n..hidden\r\nend\r\n.\r\n",
            "QUIT\r\n",
        )
    );
}

#[tokio::test]
async fn test_data_written_in_chunks() {
    let (client, sent) = authenticated(concat!(
        "250 OK\r\n",
        "250 OK\r\n",
        "354 Go ahead\r\n",
        "250 OK\r\n",
    ))
    .await;

    let client = assert_ok!(client.mail_from(Address::new("a@x.com").unwrap(), None).await);
    let client = assert_ok!(client.rcpt_to(Address::new("b@x.com").unwrap()).await);
    let mut client = assert_ok!(client.data().await);
    for chunk in [&b"line one\n"[..], b".", b"dot\r", b"\nlast"] {
        assert_ok!(client.write(chunk).await);
    }
    assert_ok!(client.finish().await);

    let text = sent_text(&sent);
    assert!(text.contains("MAIL FROM:<a@x.com>\r\n"));
    assert!(text.ends_with("DATA\r\nline one\r\n..dot\r\nlast\r\n.\r\n"));
}

#[tokio::test]
async fn test_rejected_recipient_stops_transaction() {
    let (client, sent) = authenticated(concat!(
        "250 OK\r\n",
        "550 5.1.1 No such user\r\n",
    ))
    .await;

    let client = assert_ok!(client.mail_from(Address::new("a@x.com").unwrap(), None).await);
    let err = assert_err!(client.rcpt_to(Address::new("nobody@x.com").unwrap()).await);

    assert_eq!(err.reply_code(), Some(550));
    assert!(err.is_permanent());
    assert!(!sent_text(&sent).contains("DATA"));
}

#[tokio::test]
async fn test_message_too_large_is_not_sent() {
    let (client, sent) = authenticated("").await;

    let err = assert_err!(
        client
            .mail_from(Address::new("a@x.com").unwrap(), Some(5000))
            .await
    );
    assert!(matches!(err, Error::MessageTooLarge { size: 5000, limit: 1000 }));
    assert!(!sent_text(&sent).contains("MAIL FROM"));
}

#[tokio::test]
async fn test_ehlo_rejected_falls_back_to_helo() {
    let (stream, sent) = MockStream::new(concat!(
        "220 legacy.example.com SMTP\r\n",
        "502 Command not implemented\r\n",
        "250 legacy.example.com\r\n",
    ));

    let client = assert_ok!(Client::from_stream(stream, HOST).await);
    let client = assert_ok!(client.hello("client.test").await);
    assert!(client.server_info().extensions.is_empty());
    assert_eq!(sent_text(&sent), "EHLO client.test\r\nHELO client.test\r\n");

    // HELO servers advertise no AUTH
    let err = assert_err!(client.auth_plain(&credentials()).await);
    assert!(matches!(err, Error::NotSupported(_)));
}

#[tokio::test]
async fn test_transient_ehlo_failure_does_not_fall_back() {
    let (stream, sent) = MockStream::new(concat!(
        "220 smtp.example.com ESMTP\r\n",
        "421 Too busy\r\n",
    ));

    let client = assert_ok!(Client::from_stream(stream, HOST).await);
    let err = assert_err!(client.hello("client.test").await);
    assert!(err.is_transient());
    assert!(!sent_text(&sent).contains("HELO"));
}

#[tokio::test]
async fn test_greeting_rejected() {
    let (stream, _sent) = MockStream::new("554 No SMTP service here\r\n");

    let err = assert_err!(Client::from_stream(stream, HOST).await);
    assert_eq!(err.reply_code(), Some(554));
}

#[tokio::test]
async fn test_auth_rejected() {
    let (stream, _sent) = MockStream::new(&format!(
        "{GREETING}{EHLO_REPLY}535 5.7.8 Authentication credentials invalid\r\n"
    ));

    let client = assert_ok!(Client::from_stream(stream, HOST).await);
    let client = assert_ok!(client.hello("client.test").await);
    let err = assert_err!(client.auth_plain(&credentials()).await);
    assert_eq!(err.reply_code(), Some(535));
}

#[tokio::test]
async fn test_credentials_for_other_host_not_sent() {
    let (stream, sent) = MockStream::new(&format!("{GREETING}{EHLO_REPLY}"));

    let client = assert_ok!(Client::from_stream(stream, HOST).await);
    let client = assert_ok!(client.hello("client.test").await);
    let other = PlainCredentials::new("user", "pass", "evil.example.net");
    let err = assert_err!(client.auth_plain(&other).await);

    assert!(matches!(err, Error::WrongHost { .. }));
    assert!(!sent_text(&sent).contains("AUTH"));
}

#[tokio::test]
async fn test_connection_closed_while_waiting() {
    let (client, _sent) = authenticated("250 OK\r\n").await;

    let client = assert_ok!(client.mail_from(Address::new("a@x.com").unwrap(), None).await);
    let err = assert_err!(client.rcpt_to(Address::new("b@x.com").unwrap()).await);
    assert!(matches!(err, Error::ConnectionClosed));
}

#[tokio::test]
async fn test_reset_returns_to_authenticated() {
    let (client, sent) = authenticated(concat!(
        "250 OK\r\n",
        "250 OK\r\n",
        "250 Reset\r\n",
        "250 OK\r\n",
    ))
    .await;

    let client = assert_ok!(client.mail_from(Address::new("a@x.com").unwrap(), None).await);
    let client = assert_ok!(client.rcpt_to(Address::new("b@x.com").unwrap()).await);
    let client = assert_ok!(client.reset().await);
    assert_ok!(client.mail_from(Address::new("c@x.com").unwrap(), None).await);

    assert!(sent_text(&sent).ends_with("RSET\r\nMAIL FROM:<c@x.com>\r\n"));
}
