//! Scan-code payload construction.
//!
//! Every label in a batch encodes `DDMMYY$SKU$QTY$NNN` in its 2-D code:
//! the batch-wide portion (date, SKU, per-unit quantity) plus the
//! zero-padded sequence number that makes each physical label unique.

use chrono::NaiveDate;

/// Delimiter joining the scan-payload fields.
///
/// Downstream scanners split the payload positionally on this character,
/// which is why [`LabelSpec::validate`](crate::LabelSpec::validate)
/// rejects it inside `sku` and `qty`.
pub const CODE_DELIMITER: char = '$';

/// Build the batch-wide portion of the scan payload: `DDMMYY$SKU$QTY`.
///
/// The date is rendered day, month, two-digit year -- `2024-03-07`
/// becomes `070324`.
pub fn scan_code(date: NaiveDate, sku: &str, qty: &str) -> String {
    format!(
        "{}{CODE_DELIMITER}{sku}{CODE_DELIMITER}{qty}",
        date.format("%d%m%y")
    )
}

/// Build the full per-label payload: [`scan_code`] plus the sequence
/// number zero-padded to at least three digits.
pub fn sequenced_scan_code(date: NaiveDate, sku: &str, qty: &str, sequence: u32) -> String {
    format!(
        "{}{CODE_DELIMITER}{sequence:03}",
        scan_code(date, sku, qty)
    )
}
