//! Label print transport -- deliver rendered documents to raw-printing
//! (port 9100 / JetDirect) endpoints.
//!
//! Unlike a long-lived printer session, delivery here is one short-lived
//! TCP connection per document: connect, write the whole payload, close.
//! That matches single-threaded thermal printers whose receive buffer is
//! easiest to reason about one format at a time, and it means a label's
//! connection is fully torn down before the next label in a batch starts.
//!
//! The API is synchronous (`std::net`), no async runtime required.

mod config;
mod endpoint;
mod error;
mod tcp;

pub use config::TransportConfig;
pub use endpoint::{DEFAULT_PORT, PrinterEndpoint};
pub use error::TransportError;
pub use tcp::TcpTransport;

/// Result of one completed delivery.
///
/// The raw port is write-mostly: most printers accept the document and
/// close without a word. When the device does push bytes back before
/// closing (fault reports, echo from misconfigured gear), they are
/// captured verbatim for the caller to interpret.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Bytes the printer sent back before the connection closed, if any.
    pub response: Option<Vec<u8>>,
}

impl Delivery {
    /// A delivery where the printer closed without sending anything.
    pub fn clean() -> Self {
        Self { response: None }
    }

    /// A delivery where the printer pushed back inline data.
    pub fn with_response(bytes: Vec<u8>) -> Self {
        Self {
            response: if bytes.is_empty() { None } else { Some(bytes) },
        }
    }
}

/// Deliver one rendered document to a printer. All transports implement
/// this; batch drivers and tests depend on the trait, not on TCP.
///
/// One call corresponds to exactly one connection: implementations must
/// tear the connection down on every exit path -- success, write failure,
/// or timeout -- before returning.
pub trait Transport: Send {
    /// Send one complete document and report how the far end behaved.
    ///
    /// No retries, no partial writes: anything short of the full payload
    /// reaching the OS send path is an error, and a connect or write that
    /// exceeds its configured timeout surfaces as the corresponding
    /// [`TransportError`] rather than blocking indefinitely.
    fn send_document(&mut self, zpl: &str) -> Result<Delivery, TransportError>;
}
