//! Printer endpoint addressing.
//!
//! Callers hand us `IP`, `IP:PORT`, `hostname`, or `hostname:PORT`; the
//! port defaults to 9100. The endpoint keeps the user's host string so
//! log lines and errors show what was configured, not what DNS resolved.

use std::fmt;
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::str::FromStr;

use crate::TransportError;

/// Default raw-printing port (JetDirect / RAW).
pub const DEFAULT_PORT: u16 = 9100;

/// Host of the plant label printer used when no endpoint is configured.
const DEFAULT_HOST: &str = "172.16.115.213";

/// A printer's network endpoint: host (name or IP) plus TCP port.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrinterEndpoint {
    host: String,
    port: u16,
}

impl PrinterEndpoint {
    /// Endpoint from explicit host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// The configured host (name or IP literal, as given).
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The configured TCP port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Resolve to a socket address, taking the first result for hosts
    /// that resolve to several (dual-stack printers).
    pub fn resolve(&self) -> Result<SocketAddr, TransportError> {
        let mut addrs = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|_| TransportError::EndpointUnresolved(self.to_string()))?;
        addrs
            .next()
            .ok_or_else(|| TransportError::EndpointUnresolved(self.to_string()))
    }
}

impl Default for PrinterEndpoint {
    /// The fixed plant printer this deployment ships with. Every API
    /// accepts an injected endpoint; nothing below this type consults
    /// the default.
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl fmt::Display for PrinterEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            // IPv6 literal
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl FromStr for PrinterEndpoint {
    type Err = TransportError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        if input.is_empty() {
            return Err(TransportError::InvalidEndpoint(input.to_string()));
        }

        // `[::1]:9100` and `192.168.1.55:9100` both parse as SocketAddr.
        if let Ok(addr) = input.parse::<SocketAddr>() {
            return Ok(Self::new(addr.ip().to_string(), addr.port()));
        }

        // Bare IP (including bare IPv6, which contains colons).
        if let Ok(ip) = input.parse::<IpAddr>() {
            return Ok(Self::new(ip.to_string(), DEFAULT_PORT));
        }

        // hostname:port
        if let Some((host, port)) = input.rsplit_once(':') {
            let port = port
                .parse::<u16>()
                .map_err(|_| TransportError::InvalidEndpoint(input.to_string()))?;
            if host.is_empty() {
                return Err(TransportError::InvalidEndpoint(input.to_string()));
            }
            return Ok(Self::new(host, port));
        }

        // Bare hostname.
        Ok(Self::new(input, DEFAULT_PORT))
    }
}
