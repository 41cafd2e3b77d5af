//! Document assembly and ZPL rendering.

use std::fmt::Write as _;

use chrono::{Local, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::code::{scan_code, sequenced_scan_code};
use crate::spec::LabelSpec;

// Layout parameters for the rendered format. Offsets are dots at the
// printer's native resolution; field order and content are the contract,
// the coordinates are not.
const FIELD_X: u32 = 50;
const FIELD_Y0: u32 = 50;
const FIELD_Y_STEP: u32 = 50;
const FIELD_FONT: &str = "^A0N,30,30";
const QR_POS: (u32, u32) = (350, 130);
const QR_MAGNIFICATION: u32 = 5;
const CODE_TEXT_POS: (u32, u32) = (250, 270);
const CODE_TEXT_FONT: &str = "^A0N,20,20";
const RULE_POS: (u32, u32) = (50, 370);
const RULE_WIDTH: u32 = 500;

/// One fully rendered label, ready for transmission and for returning to
/// the caller as part of the batch receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelDocument {
    /// 1-based position of this label within its batch.
    pub sequence: u32,
    /// Batch-wide scan payload (`DDMMYY$SKU$QTY`).
    pub code: String,
    /// Per-label scan payload (`code` + zero-padded sequence). The only
    /// field that differs between labels of one batch.
    pub sequenced_code: String,
    /// Human-readable date and generation time (`DD-MM-YYYY HH:MM:SS`).
    pub display_stamp: String,
    /// Rendered ZPL wire text.
    pub zpl: String,
}

/// Build the document for one sequence number, stamping the current
/// local wall-clock time.
pub fn build_document(spec: &LabelSpec, sequence: u32) -> LabelDocument {
    build_document_at(spec, sequence, Local::now().time())
}

/// Build the document for one sequence number with an injected clock.
///
/// Deterministic: identical inputs produce byte-identical output. The
/// non-test entry point is [`build_document`], which supplies the real
/// time of day.
pub fn build_document_at(spec: &LabelSpec, sequence: u32, time_of_day: NaiveTime) -> LabelDocument {
    let code = scan_code(spec.date, &spec.sku, &spec.qty);
    let sequenced_code = sequenced_scan_code(spec.date, &spec.sku, &spec.qty, sequence);
    let display_stamp = format!(
        "{} {}",
        spec.date.format("%d-%m-%Y"),
        time_of_day.format("%H:%M:%S")
    );
    let zpl = render_zpl(spec, &display_stamp, &sequenced_code);

    LabelDocument {
        sequence,
        code,
        sequenced_code,
        display_stamp,
        zpl,
    }
}

/// Render the wire payload: start-of-format marker, article text fields
/// in fixed order, the date/time stamp, the QR code carrying the
/// sequenced payload, its human-readable duplicate, a separator rule,
/// end-of-format marker. Flat, one command chain per line.
fn render_zpl(spec: &LabelSpec, display_stamp: &str, sequenced_code: &str) -> String {
    let mut out = String::with_capacity(512);
    out.push_str("^XA\n");

    let text_fields = [
        format!("SKU: {}", spec.sku),
        format!("Descrip: {}", spec.description),
        format!("Color: {}", spec.color),
        format!("Size: {}", spec.size),
        format!("Qty: {}", spec.qty),
        display_stamp.to_string(),
    ];
    for (row, data) in text_fields.iter().enumerate() {
        let y = FIELD_Y0 + FIELD_Y_STEP * row as u32;
        let _ = writeln!(out, "^FO{FIELD_X},{y}{FIELD_FONT}^FD{data}^FS");
    }

    let (qx, qy) = QR_POS;
    let _ = writeln!(
        out,
        "^FO{qx},{qy}^BQN,2,{QR_MAGNIFICATION}^FDQA,{sequenced_code}^FS"
    );
    let (tx, ty) = CODE_TEXT_POS;
    let _ = writeln!(out, "^FO{tx},{ty}{CODE_TEXT_FONT}^FD{sequenced_code}^FS");
    let (rx, ry) = RULE_POS;
    let _ = writeln!(out, "^FO{rx},{ry}^GB{RULE_WIDTH},0,8^FS");

    out.push_str("^XZ\n");
    out
}
