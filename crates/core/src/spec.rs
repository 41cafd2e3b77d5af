//! Label request model and input validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::code::CODE_DELIMITER;

/// A request to print one batch of identical, sequentially numbered labels.
///
/// All string fields are opaque article attributes; `qty` is the per-unit
/// quantity printed on the label, not the number of labels. `count` is the
/// number of physical labels to emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSpec {
    /// Article SKU.
    pub sku: String,
    /// Article description.
    pub description: String,
    /// Article color.
    pub color: String,
    /// Article size.
    pub size: String,
    /// Per-unit quantity display value.
    pub qty: String,
    /// Number of physical labels to emit (1-based sequence numbers).
    pub count: u32,
    /// Calendar date embedded in the scan payload.
    pub date: NaiveDate,
}

/// Input errors detected before any document is built.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecError {
    /// A required label field is empty or whitespace-only.
    #[error("required label field is empty: {field}")]
    MissingField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// The requested label count is zero.
    #[error("label count must be at least 1")]
    InvalidCount,

    /// A field contains the scan-code delimiter and would corrupt the
    /// scanned payload.
    #[error("field {field} must not contain the delimiter {CODE_DELIMITER:?}")]
    DelimiterInField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A date string could not be parsed as `YYYY-MM-DD`.
    #[error("invalid date (expected YYYY-MM-DD): {value}")]
    InvalidDate {
        /// The rejected input.
        value: String,
    },
}

impl LabelSpec {
    /// Parse a `YYYY-MM-DD` date string as used by callers of this crate.
    pub fn parse_date(value: &str) -> Result<NaiveDate, SpecError> {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| SpecError::InvalidDate {
            value: value.to_string(),
        })
    }

    /// Check the structural preconditions for building documents.
    ///
    /// Every required field must be non-empty, `count` must be at least 1,
    /// and the fields that end up inside the scan payload (`sku`, `qty`)
    /// must not contain the payload delimiter.
    pub fn validate(&self) -> Result<(), SpecError> {
        let required: [(&'static str, &str); 5] = [
            ("sku", &self.sku),
            ("description", &self.description),
            ("color", &self.color),
            ("size", &self.size),
            ("qty", &self.qty),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(SpecError::MissingField { field });
            }
        }

        if self.count == 0 {
            return Err(SpecError::InvalidCount);
        }

        for (field, value) in [("sku", &self.sku), ("qty", &self.qty)] {
            if value.contains(CODE_DELIMITER) {
                return Err(SpecError::DelimiterInField { field });
            }
        }

        Ok(())
    }
}
