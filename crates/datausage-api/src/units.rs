//! Byte-count unit derivation with floor truncation.
//!
//! Each stage truncates at a fixed decimal precision and the next stage
//! derives from the *already truncated* value, so the error compounds:
//! `gb` is a precise function of the truncated `mb`, not of the raw byte
//! count. Display code relies on these exact values, so the chain is
//! kept as-is rather than "fixed" to a single-stage conversion.

use serde::Serialize;

/// Kibibytes, truncated to two decimal places: `floor(b / 1024 * 100) / 100`.
pub fn kilobytes(bytes: u64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let b = bytes as f64;
    (b / 1024.0 * 100.0).floor() / 100.0
}

/// Mebibytes from an already-truncated kibibyte value, truncated to three
/// decimal places.
pub fn megabytes(kb: f64) -> f64 {
    (kb / 1024.0 * 1000.0).floor() / 1000.0
}

/// Gibibytes from an already-truncated mebibyte value, truncated to three
/// decimal places.
pub fn gigabytes(mb: f64) -> f64 {
    (mb / 1024.0 * 1000.0).floor() / 1000.0
}

// ── UsageBreakdown ───────────────────────────────────────────────────

/// A byte total together with its derived KB/MB/GB values.
///
/// The derived fields are always consistent functions of `bytes`; they
/// are computed once here and never stored independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UsageBreakdown {
    pub bytes: u64,
    pub kb: f64,
    pub mb: f64,
    pub gb: f64,
}

impl From<u64> for UsageBreakdown {
    fn from(bytes: u64) -> Self {
        let kb = kilobytes(bytes);
        let mb = megabytes(kb);
        let gb = gigabytes(mb);
        Self { bytes, kb, mb, gb }
    }
}
