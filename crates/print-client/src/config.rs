//! Transport configuration.

use std::time::Duration;

/// Timeout settings for one-shot label delivery.
///
/// Defaults are tuned for LAN-connected thermal printers:
/// - `connect`: 5s (generous for LAN, might be tight over VPN)
/// - `write`: 30s (a single label document is small, but a busy printer
///   can stall the TCP window while a previous format prints)
/// - `response_window`: 500ms -- how long to wait, after our half-close,
///   for any inline bytes the printer pushes back before it closes.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Maximum time to wait for the TCP connection to establish.
    pub connect_timeout: Duration,
    /// Maximum time to wait for the document write to complete.
    pub write_timeout: Duration,
    /// How long to listen for an inline printer response after writing.
    pub response_window: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            write_timeout: Duration::from_secs(30),
            response_window: Duration::from_millis(500),
        }
    }
}
