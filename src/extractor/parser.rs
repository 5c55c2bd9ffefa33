//! Parsing of extraction engine output
//!
//! The CLI engine is invoked with a machine-readable progress template and a
//! JSON metadata mode; this module turns both kinds of output into typed
//! values. Pure functions, no I/O.

use super::traits::{RawProgress, StreamVariant};
use crate::error::{Error, Result};

/// Marker the progress template prepends to every progress line, so they can
/// be told apart from the engine's other stdout output.
pub(crate) const PROGRESS_MARKER: &str = "media-dl:";

/// Parse one stdout line as a progress event.
///
/// Expected shape: `media-dl:<downloaded>:<total>:<total_estimate>` where
/// absent fields are the literal `NA`. Byte counts may be reported as floats.
/// Returns `None` for any line that is not a progress line.
pub(crate) fn parse_progress_line(line: &str) -> Option<RawProgress> {
    let rest = line.trim().strip_prefix(PROGRESS_MARKER)?;
    let mut fields = rest.split(':');

    let downloaded_bytes = parse_byte_field(fields.next()?)?;
    let total = fields.next().and_then(parse_byte_field);
    let estimate = fields.next().and_then(parse_byte_field);

    Some(RawProgress::Downloading {
        downloaded_bytes,
        // The exact total wins over the engine's estimate
        total_bytes: total.or(estimate),
    })
}

fn parse_byte_field(field: &str) -> Option<u64> {
    let field = field.trim();
    if field.is_empty() || field == "NA" || field == "null" {
        return None;
    }
    field.parse::<f64>().ok().map(|bytes| bytes.max(0.0) as u64)
}

/// Parse the engine's JSON metadata output into stream variants.
///
/// Variants without a `formats` array (e.g. single-format pages) yield an
/// empty list rather than an error.
pub(crate) fn parse_probe_output(stdout: &[u8]) -> Result<Vec<StreamVariant>> {
    let metadata: serde_json::Value = serde_json::from_slice(stdout)
        .map_err(|e| Error::Discovery(format!("engine metadata is not valid JSON: {e}")))?;

    let Some(formats) = metadata.get("formats").and_then(|f| f.as_array()) else {
        return Ok(Vec::new());
    };

    Ok(formats
        .iter()
        .map(|format| StreamVariant {
            format_id: format
                .get("format_id")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            height: format
                .get("height")
                .and_then(|v| v.as_u64())
                .map(|h| h as u32),
            ext: format
                .get("ext")
                .and_then(|v| v.as_str())
                .map(str::to_string),
        })
        .collect())
}

/// Last portion of the engine's stderr, for error messages.
pub(crate) fn stderr_tail(stderr: &str) -> String {
    let trimmed = stderr.trim();
    trimmed
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("no error output")
        .to_string()
}
