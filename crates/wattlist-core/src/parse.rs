//! Low-level numeric extraction from currency-formatted text.
//!
//! Manual byte scanning rather than `regex`; the only pattern matching in
//! this workspace that warrants a compiled regex is the retailer-URL
//! identifier extraction in `wattlist-ingest`.

/// Returns the first numeric run in `s` as an `f64`.
///
/// A run is a sequence of ASCII digits with optional thousands separators
/// (`,`) and at most one decimal point: `"$1,299.99 list"` → `1299.99`.
/// Returns `None` when `s` contains no digit or the run fails to parse.
pub(crate) fn first_numeric_run(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let len = bytes.len();

    let mut i = 0;
    while i < len && !bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == len {
        return None;
    }

    let mut run = String::new();
    let mut seen_dot = false;
    while i < len {
        let b = bytes[i];
        if b.is_ascii_digit() {
            run.push(char::from(b));
        } else if b == b',' && i + 1 < len && bytes[i + 1].is_ascii_digit() {
            // Thousands separator; dropped from the parsed value.
        } else if b == b'.' && !seen_dot && i + 1 < len && bytes[i + 1].is_ascii_digit() {
            seen_dot = true;
            run.push('.');
        } else {
            break;
        }
        i += 1;
    }

    run.parse::<f64>().ok().filter(|v| v.is_finite())
}
