//! Typed transport errors.

use std::io;
use std::time::Duration;

/// Everything that can go wrong delivering one document.
///
/// Each variant carries enough context for a useful log line. Errors are
/// values, never panics: an unreachable printer is an expected outcome
/// for the caller to record, and retry policy (if any) lives above this
/// layer.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    // -- Addressing --
    /// The endpoint string could not be parsed.
    #[error("invalid printer endpoint: {0}")]
    InvalidEndpoint(String),

    /// DNS resolution produced no address for the endpoint.
    #[error("no address found for printer endpoint: {0}")]
    EndpointUnresolved(String),

    // -- Connect --
    /// The printer actively refused the connection (port not open).
    #[error("connection refused: {endpoint}")]
    ConnectRefused {
        /// The endpoint that was attempted.
        endpoint: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The connect did not complete within the configured timeout.
    #[error("connect timed out: {endpoint} ({timeout:?})")]
    ConnectTimeout {
        /// The endpoint that was attempted.
        endpoint: String,
        /// The timeout that elapsed.
        timeout: Duration,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Connection failed for a reason other than refusal or timeout.
    #[error("connection failed: {endpoint}")]
    ConnectFailed {
        /// The endpoint that was attempted.
        endpoint: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    // -- Write --
    /// The document write did not complete within the configured timeout.
    #[error("write timed out after {timeout:?}")]
    WriteTimeout {
        /// The timeout that elapsed.
        timeout: Duration,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Writing the document failed; the document must be treated as not
    /// delivered even if a prefix reached the printer.
    #[error("write failed: {0}")]
    WriteFailed(#[source] io::Error),
}

impl TransportError {
    /// `true` when the failure happened while writing the document (a
    /// connection had been established), as opposed to while addressing
    /// or connecting.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            TransportError::WriteFailed(_) | TransportError::WriteTimeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_errors_classified_as_write() {
        assert!(TransportError::WriteFailed(io::Error::other("x")).is_write());
        assert!(
            TransportError::WriteTimeout {
                timeout: Duration::from_secs(1),
                source: io::Error::new(io::ErrorKind::TimedOut, "x"),
            }
            .is_write()
        );
    }

    #[test]
    fn connect_errors_classified_as_connect() {
        let errs = [
            TransportError::InvalidEndpoint("x".into()),
            TransportError::EndpointUnresolved("x".into()),
            TransportError::ConnectRefused {
                endpoint: "x".into(),
                source: io::Error::new(io::ErrorKind::ConnectionRefused, "x"),
            },
            TransportError::ConnectTimeout {
                endpoint: "x".into(),
                timeout: Duration::from_secs(1),
                source: io::Error::new(io::ErrorKind::TimedOut, "x"),
            },
            TransportError::ConnectFailed {
                endpoint: "x".into(),
                source: io::Error::other("x"),
            },
        ];
        for e in errs {
            assert!(!e.is_write(), "{e:?} should not classify as write");
        }
    }
}
