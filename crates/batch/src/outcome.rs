//! Per-label delivery outcomes.

use serde::{Deserialize, Serialize};

use labelforge_print_client::{Delivery, TransportError};

/// What happened to one label's trip to the printer.
///
/// Transport failures become values here, scoped to their sequence
/// number: an unreachable printer never aborts outcome recording and
/// never panics the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// Connection opened, document written in full, printer closed
    /// cleanly without complaint.
    Delivered,
    /// No connection could be established (refused, timed out,
    /// unresolvable, or otherwise failed).
    ConnectFailed {
        /// Human-readable failure description.
        detail: String,
    },
    /// The connection was up but the document did not fully reach the
    /// printer.
    WriteFailed {
        /// Human-readable failure description.
        detail: String,
    },
    /// The printer pushed back inline data after the write -- surfaced
    /// verbatim (lossily UTF-8 decoded) for the caller to interpret.
    RemoteError {
        /// The printer's response payload.
        payload: String,
    },
}

impl DeliveryOutcome {
    /// `true` only for [`DeliveryOutcome::Delivered`].
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered)
    }

    /// Fold a transport result into an outcome value.
    pub(crate) fn from_transport(result: Result<Delivery, TransportError>) -> Self {
        match result {
            Ok(Delivery {
                response: Some(payload),
                ..
            }) => DeliveryOutcome::RemoteError {
                payload: String::from_utf8_lossy(&payload).into_owned(),
            },
            Ok(_) => DeliveryOutcome::Delivered,
            Err(e) if e.is_write() => DeliveryOutcome::WriteFailed {
                detail: e.to_string(),
            },
            Err(e) => DeliveryOutcome::ConnectFailed {
                detail: e.to_string(),
            },
        }
    }
}

/// One entry of the receipt's outcome list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelOutcome {
    /// 1-based sequence number the outcome belongs to.
    pub sequence: u32,
    /// How delivery went for that label.
    pub outcome: DeliveryOutcome,
}
