//! Batch sequencer -- drives label generation and delivery in strict
//! sequence order.
//!
//! For a request of `count` labels, builds the document for each sequence
//! number `1..=count` and hands it to the transport one at a time: label
//! `i + 1`'s connection is opened only after label `i`'s is fully closed,
//! so physical output order matches logical order and every failure is
//! attributable to one sequence number. Per-label transport failures are
//! recorded, not fatal (configurable via [`FailurePolicy`]); only input
//! validation aborts a batch, and it does so before any socket is opened.
//!
//! Concurrent batches aimed at the same printer are *not* coordinated
//! here -- this crate holds no locks and no shared state. A deployment
//! that lets several callers print to one device should serialize on the
//! endpoint in front of this layer.

#![warn(missing_docs)]

mod outcome;

pub use outcome::{DeliveryOutcome, LabelOutcome};

use std::ops::ControlFlow;

use serde::Serialize;
use tracing::{debug, info, warn};

use labelforge_core::{LabelDocument, LabelSpec, SpecError, build_document};
use labelforge_print_client::Transport;

/// Batch-level failures. Transport trouble is never one of these -- it is
/// recorded per label in the receipt.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// The label request failed validation; nothing was built or sent.
    #[error("invalid label request")]
    Spec(#[from] SpecError),
}

/// What to do when one label's delivery fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Keep attempting the remaining sequence numbers so the caller gets
    /// a complete per-label outcome list. Matches the behavior label
    /// operators expect: one jammed send should not strand the rest of
    /// the roll.
    #[default]
    ContinueOnFailure,
    /// Stop after the first failed delivery; remaining labels are
    /// neither built nor attempted.
    AbortOnFailure,
}

/// Options for one batch run.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Mid-batch failure policy.
    pub policy: FailurePolicy,
}

/// Progress report handed to the caller after every attempted label.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchProgress {
    /// Labels attempted so far (equals the last sequence number tried).
    pub attempted: usize,
    /// Total labels in the batch.
    pub total: usize,
    /// Labels delivered cleanly so far.
    pub delivered: usize,
}

/// The caller-facing result of one batch: every generated document plus
/// the per-label delivery record, reported separately so "labels exist in
/// the response" is never conflated with "labels reached the printer".
#[non_exhaustive]
#[derive(Debug, Clone, Serialize)]
pub struct BatchReceipt {
    /// Labels requested.
    pub total: u32,
    /// Every document generated, in sequence order -- returned even when
    /// delivery failed, so the caller can reprint without rebuilding.
    pub documents: Vec<LabelDocument>,
    /// One outcome per attempted label, in sequence order.
    pub outcomes: Vec<LabelOutcome>,
}

impl BatchReceipt {
    /// Number of labels delivered cleanly.
    pub fn delivered(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.outcome.is_delivered())
            .count()
    }

    /// `true` when every requested label was attempted and delivered.
    pub fn fully_delivered(&self) -> bool {
        self.outcomes.len() == self.total as usize && self.delivered() == self.total as usize
    }
}

/// Print one batch: validate, then build and deliver sequence numbers
/// `1..=spec.count` strictly in order.
///
/// The `on_progress` callback runs after each label's connection has
/// closed and can return `ControlFlow::Break(())` to cancel the batch
/// between labels; a label in flight is always carried to its outcome
/// first.
pub fn print_batch<T, F>(
    transport: &mut T,
    spec: &LabelSpec,
    opts: &BatchOptions,
    mut on_progress: F,
) -> Result<BatchReceipt, BatchError>
where
    T: Transport,
    F: FnMut(BatchProgress) -> ControlFlow<(), ()>,
{
    spec.validate()?;

    let total = spec.count;
    info!(sku = %spec.sku, count = total, "starting label batch");

    let mut documents: Vec<LabelDocument> = Vec::with_capacity(total as usize);
    let mut outcomes: Vec<LabelOutcome> = Vec::with_capacity(total as usize);
    let mut delivered = 0usize;

    for sequence in 1..=total {
        let doc = build_document(spec, sequence);
        debug!(sequence, code = %doc.sequenced_code, "sending label");

        let outcome = DeliveryOutcome::from_transport(transport.send_document(&doc.zpl));
        match &outcome {
            DeliveryOutcome::Delivered => delivered += 1,
            other => warn!(sequence, outcome = ?other, "label delivery failed"),
        }
        let failed = !outcome.is_delivered();

        documents.push(doc);
        outcomes.push(LabelOutcome { sequence, outcome });

        let progress = BatchProgress {
            attempted: sequence as usize,
            total: total as usize,
            delivered,
        };
        if let ControlFlow::Break(()) = on_progress(progress) {
            info!(attempted = sequence, total, "batch cancelled by caller");
            break;
        }
        if failed && opts.policy == FailurePolicy::AbortOnFailure {
            info!(attempted = sequence, total, "batch aborted on first failure");
            break;
        }
    }

    info!(
        total,
        attempted = outcomes.len(),
        delivered,
        "label batch finished"
    );

    Ok(BatchReceipt {
        total,
        documents,
        outcomes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io;

    use labelforge_print_client::{Delivery, TransportError};

    // ── Mock transport ──────────────────────────────────────────────

    /// Records every document it is asked to send and replays a scripted
    /// result per call (defaulting to a clean delivery once the script
    /// runs out).
    struct MockTransport {
        sent: Vec<String>,
        script: Vec<Result<Delivery, TransportError>>,
    }

    impl MockTransport {
        fn ok() -> Self {
            Self {
                sent: Vec::new(),
                script: Vec::new(),
            }
        }

        fn scripted(script: Vec<Result<Delivery, TransportError>>) -> Self {
            Self {
                sent: Vec::new(),
                script,
            }
        }
    }

    impl Transport for MockTransport {
        fn send_document(&mut self, zpl: &str) -> Result<Delivery, TransportError> {
            self.sent.push(zpl.to_string());
            if self.script.is_empty() {
                Ok(Delivery::clean())
            } else {
                self.script.remove(0)
            }
        }
    }

    fn connect_refused() -> TransportError {
        TransportError::ConnectRefused {
            endpoint: "127.0.0.1:9100".into(),
            source: io::Error::new(io::ErrorKind::ConnectionRefused, "refused"),
        }
    }

    fn spec(count: u32) -> LabelSpec {
        LabelSpec {
            sku: "ABC123".into(),
            description: "Crew neck tee".into(),
            color: "Navy".into(),
            size: "M".into(),
            qty: "5".into(),
            count,
            date: NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
        }
    }

    fn run(
        transport: &mut MockTransport,
        spec: &LabelSpec,
        opts: &BatchOptions,
    ) -> Result<BatchReceipt, BatchError> {
        print_batch(transport, spec, opts, |_| ControlFlow::Continue(()))
    }

    // ── Tests ───────────────────────────────────────────────────────

    #[test]
    fn happy_path_emits_every_sequence_in_order() {
        let mut transport = MockTransport::ok();
        let receipt = run(&mut transport, &spec(4), &BatchOptions::default()).unwrap();

        assert_eq!(receipt.total, 4);
        assert_eq!(receipt.documents.len(), 4);
        assert_eq!(receipt.outcomes.len(), 4);
        assert!(receipt.fully_delivered());

        let sequences: Vec<u32> = receipt.documents.iter().map(|d| d.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3, 4]);

        // Transport saw exactly the rendered documents, in order.
        assert_eq!(transport.sent.len(), 4);
        for (doc, sent) in receipt.documents.iter().zip(&transport.sent) {
            assert_eq!(&doc.zpl, sent);
        }
        assert!(transport.sent[0].contains("$001"));
        assert!(transport.sent[3].contains("$004"));
    }

    #[test]
    fn mid_batch_failure_continues_by_default() {
        // Sequence 3 of 5 fails; 4 and 5 must still be attempted.
        let mut transport = MockTransport::scripted(vec![
            Ok(Delivery::clean()),
            Ok(Delivery::clean()),
            Err(connect_refused()),
            Ok(Delivery::clean()),
            Ok(Delivery::clean()),
        ]);
        let receipt = run(&mut transport, &spec(5), &BatchOptions::default()).unwrap();

        assert_eq!(receipt.outcomes.len(), 5);
        assert_eq!(receipt.delivered(), 4);
        assert!(!receipt.fully_delivered());

        let failures: Vec<u32> = receipt
            .outcomes
            .iter()
            .filter(|o| !o.outcome.is_delivered())
            .map(|o| o.sequence)
            .collect();
        assert_eq!(failures, vec![3]);
        assert_eq!(transport.sent.len(), 5);
    }

    #[test]
    fn abort_policy_stops_after_first_failure() {
        let mut transport = MockTransport::scripted(vec![
            Ok(Delivery::clean()),
            Err(connect_refused()),
            Ok(Delivery::clean()),
        ]);
        let opts = BatchOptions {
            policy: FailurePolicy::AbortOnFailure,
            ..BatchOptions::default()
        };
        let receipt = run(&mut transport, &spec(5), &opts).unwrap();

        assert_eq!(transport.sent.len(), 2);
        assert_eq!(receipt.outcomes.len(), 2);
        assert_eq!(receipt.documents.len(), 2);
        assert!(!receipt.fully_delivered());
    }

    #[test]
    fn zero_count_is_an_input_error_with_no_sends() {
        let mut transport = MockTransport::ok();
        let err = run(&mut transport, &spec(0), &BatchOptions::default()).unwrap_err();
        assert!(matches!(err, BatchError::Spec(SpecError::InvalidCount)));
        assert!(transport.sent.is_empty());
    }

    #[test]
    fn empty_field_is_an_input_error_with_no_sends() {
        let mut transport = MockTransport::ok();
        let mut s = spec(3);
        s.qty.clear();
        let err = run(&mut transport, &s, &BatchOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            BatchError::Spec(SpecError::MissingField { field: "qty" })
        ));
        assert!(transport.sent.is_empty());
    }

    #[test]
    fn printer_response_recorded_as_remote_error() {
        let mut transport =
            MockTransport::scripted(vec![Ok(Delivery::with_response(b"RIBBON OUT".to_vec()))]);
        let receipt = run(&mut transport, &spec(1), &BatchOptions::default()).unwrap();

        assert_eq!(
            receipt.outcomes[0].outcome,
            DeliveryOutcome::RemoteError {
                payload: "RIBBON OUT".into()
            }
        );
        // The document still exists for reprint.
        assert_eq!(receipt.documents.len(), 1);
    }

    #[test]
    fn cancellation_stops_between_labels() {
        let mut transport = MockTransport::ok();
        let receipt = print_batch(
            &mut transport,
            &spec(5),
            &BatchOptions::default(),
            |progress| {
                if progress.attempted >= 2 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            },
        )
        .unwrap();

        // Label 2 was carried to its outcome; 3..5 never started.
        assert_eq!(transport.sent.len(), 2);
        assert_eq!(receipt.outcomes.len(), 2);
        assert_eq!(receipt.delivered(), 2);
    }

    #[test]
    fn progress_reports_running_counts() {
        let mut transport = MockTransport::scripted(vec![
            Ok(Delivery::clean()),
            Err(connect_refused()),
            Ok(Delivery::clean()),
        ]);
        let mut seen = Vec::new();
        print_batch(
            &mut transport,
            &spec(3),
            &BatchOptions::default(),
            |progress| {
                seen.push((progress.attempted, progress.delivered));
                ControlFlow::Continue(())
            },
        )
        .unwrap();

        assert_eq!(seen, vec![(1, 1), (2, 1), (3, 2)]);
    }

    #[test]
    fn consecutive_batches_share_code_but_not_sequenced_codes() {
        let s = spec(2);
        let mut transport = MockTransport::ok();
        let first = run(&mut transport, &s, &BatchOptions::default()).unwrap();
        let second = run(&mut transport, &s, &BatchOptions::default()).unwrap();

        for (a, b) in first.documents.iter().zip(&second.documents) {
            assert_eq!(a.code, b.code);
            assert_eq!(a.sequenced_code, b.sequenced_code);
        }
        // Within a batch every sequenced code is unique.
        assert_ne!(
            first.documents[0].sequenced_code,
            first.documents[1].sequenced_code
        );
    }

    #[test]
    fn receipt_serializes_documents_and_outcomes_separately() {
        let mut transport = MockTransport::scripted(vec![Err(connect_refused())]);
        let receipt = run(&mut transport, &spec(1), &BatchOptions::default()).unwrap();

        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["total"], 1);
        assert_eq!(json["documents"].as_array().unwrap().len(), 1);
        assert_eq!(json["outcomes"][0]["sequence"], 1);
        assert_eq!(json["outcomes"][0]["outcome"]["status"], "connect_failed");
    }
}
