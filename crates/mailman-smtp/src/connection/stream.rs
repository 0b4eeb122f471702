//! TLS transport for SMTP connections.

use crate::error::{Error, Result};
use rustls::pki_types::ServerName;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_rustls::{
    TlsConnector,
    client::TlsStream,
    rustls::{ClientConfig, RootCertStore},
};

/// Implicit-TLS SMTP stream.
pub type SmtpStream = TlsStream<TcpStream>;

/// Connects to an SMTP server over TLS (implicit TLS, e.g. port 465).
///
/// The certificate is verified against `hostname` using the webpki roots.
///
/// # Errors
///
/// Returns an error if the hostname is not a valid server name, or if the
/// TCP connection or TLS handshake fails.
pub async fn connect_tls(hostname: &str, port: u16) -> Result<SmtpStream> {
    let server_name = ServerName::try_from(hostname.to_string())
        .map_err(|_| Error::InvalidServerName(hostname.to_string()))?;

    let tcp_stream = TcpStream::connect((hostname, port)).await?;
    tracing::debug!(hostname, port, "TCP connected, starting TLS handshake");

    let connector = create_tls_connector();
    let tls_stream = connector.connect(server_name, tcp_stream).await?;
    Ok(tls_stream)
}

/// Creates a TLS connector with the webpki root certificates.
fn create_tls_connector() -> TlsConnector {
    let root_store = RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    };

    let config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    TlsConnector::from(Arc::new(config))
}
