//! One-shot TCP delivery to raw-printing endpoints.

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Instant;

use socket2::SockRef;
use tracing::{debug, info, warn};

use crate::{Delivery, PrinterEndpoint, Transport, TransportConfig, TransportError};

/// Cap on inline response bytes collected after a write. Fault reports
/// are tens of bytes; this guards against a misbehaving device streaming
/// at us inside the response window.
const MAX_RESPONSE_BYTES: usize = 4096;

/// Delivers each document over its own short-lived TCP connection.
///
/// `send_document` performs the full lifecycle per call: resolve and
/// connect (bounded), write the whole payload, half-close to tell the
/// printer the document is complete, drain any inline response until the
/// printer closes or the response window ends, then drop the stream.
/// Holding a `TcpTransport` holds no socket -- only the endpoint and the
/// timeout configuration.
pub struct TcpTransport {
    endpoint: PrinterEndpoint,
    config: TransportConfig,
}

impl TcpTransport {
    /// Transport for the given endpoint with the given timeouts.
    pub fn new(endpoint: PrinterEndpoint, config: TransportConfig) -> Self {
        Self { endpoint, config }
    }

    /// Transport for the given endpoint with default timeouts.
    pub fn with_defaults(endpoint: PrinterEndpoint) -> Self {
        Self::new(endpoint, TransportConfig::default())
    }

    /// The endpoint this transport delivers to.
    pub fn endpoint(&self) -> &PrinterEndpoint {
        &self.endpoint
    }

    /// Open and configure a fresh connection for one document.
    fn open_stream(&self) -> Result<TcpStream, TransportError> {
        let addr = self.endpoint.resolve()?;
        let stream = TcpStream::connect_timeout(&addr, self.config.connect_timeout).map_err(
            |e| match e.kind() {
                io::ErrorKind::ConnectionRefused => TransportError::ConnectRefused {
                    endpoint: self.endpoint.to_string(),
                    source: e,
                },
                io::ErrorKind::TimedOut => TransportError::ConnectTimeout {
                    endpoint: self.endpoint.to_string(),
                    timeout: self.config.connect_timeout,
                    source: e,
                },
                _ => TransportError::ConnectFailed {
                    endpoint: self.endpoint.to_string(),
                    source: e,
                },
            },
        )?;

        self.configure_stream(&stream, &addr)?;
        Ok(stream)
    }

    /// Set per-connection socket options: no Nagle delay for a payload we
    /// send in one piece, bounded write/read timeouts, and SO_LINGER so
    /// closing the transient connection does not discard queued bytes.
    fn configure_stream(
        &self,
        stream: &TcpStream,
        addr: &SocketAddr,
    ) -> Result<(), TransportError> {
        let failed = |e: io::Error| TransportError::ConnectFailed {
            endpoint: addr.to_string(),
            source: e,
        };

        stream.set_nodelay(true).map_err(failed)?;
        stream
            .set_write_timeout(Some(self.config.write_timeout))
            .map_err(failed)?;
        stream
            .set_read_timeout(Some(self.config.response_window))
            .map_err(failed)?;
        SockRef::from(stream)
            .set_linger(Some(self.config.write_timeout))
            .map_err(failed)?;

        Ok(())
    }
}

impl Transport for TcpTransport {
    fn send_document(&mut self, zpl: &str) -> Result<Delivery, TransportError> {
        debug!(endpoint = %self.endpoint, "connecting to printer");
        let mut stream = self.open_stream()?;

        // The stream is a local: every return path below drops it, which
        // closes the connection.
        stream.write_all(zpl.as_bytes()).map_err(map_write_err(
            self.config.write_timeout,
        ))?;
        stream
            .flush()
            .map_err(map_write_err(self.config.write_timeout))?;

        // Half-close: our side of the conversation is complete. The
        // printer sees EOF and will close once it has consumed the
        // format. Failure here means the peer already tore down, which
        // the drain below observes.
        let _ = stream.shutdown(Shutdown::Write);

        let response = drain_response(&mut stream, &self.config);
        info!(
            endpoint = %self.endpoint,
            bytes = zpl.len(),
            responded = response.is_some(),
            "label document delivered"
        );
        if let Some(payload) = &response {
            warn!(
                endpoint = %self.endpoint,
                payload = %String::from_utf8_lossy(payload),
                "printer sent inline response"
            );
        }

        Ok(Delivery { response })
    }
}

/// Map a write-path io error to the transport taxonomy.
fn map_write_err(
    timeout: std::time::Duration,
) -> impl Fn(io::Error) -> TransportError {
    move |e| match e.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TransportError::WriteTimeout {
            timeout,
            source: e,
        },
        _ => TransportError::WriteFailed(e),
    }
}

/// Collect whatever the printer pushes back between our half-close and
/// its close. Best effort: the document was already written, so a silent
/// printer, a timeout, or a reset all read as "no response".
fn drain_response(stream: &mut TcpStream, config: &TransportConfig) -> Option<Vec<u8>> {
    let deadline = Instant::now() + config.response_window;
    let mut collected = Vec::new();
    let mut buf = [0u8; 512];

    loop {
        match stream.read(&mut buf) {
            Ok(0) => break, // printer closed cleanly
            Ok(n) => {
                let room = MAX_RESPONSE_BYTES.saturating_sub(collected.len());
                collected.extend_from_slice(&buf[..n.min(room)]);
                if room <= n {
                    break;
                }
            }
            Err(ref e)
                if e.kind() == io::ErrorKind::WouldBlock
                    || e.kind() == io::ErrorKind::TimedOut =>
            {
                break;
            }
            // A reset after the printer consumed the document is common
            // on one-shot raw-port connections.
            Err(_) => break,
        }
        if Instant::now() >= deadline {
            break;
        }
    }

    if collected.is_empty() {
        None
    } else {
        Some(collected)
    }
}
