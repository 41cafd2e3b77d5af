//! Label document builder for the labelforge project.
//!
//! Turns a validated [`LabelSpec`] plus a 1-based sequence number into a
//! [`LabelDocument`]: the human-readable article fields, the scannable
//! payload shared by a batch, and the rendered ZPL wire text. Everything
//! here is pure -- no sockets, no disk, no state between calls -- so
//! document generation can be exercised without a printer.

#![warn(missing_docs)]

/// Scan-code payload construction.
pub mod code;
/// Document assembly and ZPL rendering.
pub mod document;
/// Label request model and input validation.
pub mod spec;

// ── Convenience re-exports ──────────────────────────────────────────────
// Flat imports for the common entry points; full module paths remain
// available.

pub use code::{CODE_DELIMITER, scan_code, sequenced_scan_code};
pub use document::{LabelDocument, build_document, build_document_at};
pub use spec::{LabelSpec, SpecError};
