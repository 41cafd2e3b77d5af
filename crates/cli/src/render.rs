//! Terminal output for batch receipts.

use std::io::IsTerminal;

use labelforge_batch::{BatchReceipt, DeliveryOutcome};

/// Output mode for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Human-oriented terminal output.
    Pretty,
    /// Machine-readable JSON on stdout.
    Json,
}

impl Format {
    /// Resolve an explicit `--output` value, or detect from the
    /// environment: pretty when stdout is a TTY, JSON otherwise.
    pub(crate) fn resolve_or_detect(flag: Option<&str>) -> Self {
        match flag {
            Some("json") => Format::Json,
            Some(_) => Format::Pretty,
            None => {
                if std::io::stdout().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Json
                }
            }
        }
    }
}

/// One line per label plus a delivery summary.
pub(crate) fn print_receipt(receipt: &BatchReceipt, endpoint: &str) {
    for entry in &receipt.outcomes {
        let line = match &entry.outcome {
            DeliveryOutcome::Delivered => "delivered".to_string(),
            DeliveryOutcome::ConnectFailed { detail } => format!("connect failed: {detail}"),
            DeliveryOutcome::WriteFailed { detail } => format!("write failed: {detail}"),
            DeliveryOutcome::RemoteError { payload } => format!("printer error: {payload}"),
        };
        println!("label {:03}  {line}", entry.sequence);
    }

    println!(
        "{}/{} label(s) delivered to {endpoint}",
        receipt.delivered(),
        receipt.total
    );
    if receipt.outcomes.len() < receipt.total as usize {
        println!(
            "{} label(s) not attempted",
            receipt.total as usize - receipt.outcomes.len()
        );
    }
}
