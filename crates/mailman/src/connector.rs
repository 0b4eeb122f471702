//! Transport used to reach the SMTP server.

use std::future::Future;

use mailman_smtp::connection::{SmtpStream, connect_tls};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::config::ServerAddress;

/// Opens the byte stream a session speaks SMTP over.
///
/// The stream must already be secured: the session sends the credentials
/// right after the greeting.
pub trait Connector: Send + Sync {
    /// Stream produced by this connector.
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    /// Dials `address`.
    fn connect(
        &self,
        address: &ServerAddress,
    ) -> impl Future<Output = mailman_smtp::Result<Self::Stream>> + Send;
}

/// Implicit TLS over TCP, verifying the certificate against the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct TlsConnector;

impl Connector for TlsConnector {
    type Stream = SmtpStream;

    async fn connect(&self, address: &ServerAddress) -> mailman_smtp::Result<SmtpStream> {
        connect_tls(&address.host, address.port).await
    }
}
