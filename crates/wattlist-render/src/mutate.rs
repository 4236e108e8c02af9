//! Idempotent host-document mutation.
//!
//! Exactly four zones change between generations: the row container, the
//! timestamp, the product count, and the removal of a previously-injected
//! dynamic-fetch script. Everything else survives byte-for-byte because the
//! edit is a range splice on the raw text, not a parse/re-serialize pass.

use chrono::{DateTime, Utc};

use crate::error::RenderError;
use crate::locate::find_element_by_id;

/// Row container anchor: the `<tbody>` whose contents are replaced.
pub const ROWS_ANCHOR_ID: &str = "product-rows";
/// Timestamp anchor: the element whose text becomes the generation time.
pub const TIMESTAMP_ANCHOR_ID: &str = "update-timestamp";
/// Count anchor: the element whose text becomes the rendered product count.
pub const COUNT_ANCHOR_ID: &str = "product-count";
/// Sentinel id carried by any injected dynamic-fetch script. Removal keys on
/// this exact id; earlier generations guessed at script signatures with
/// regexes, which misfired across versions.
pub const DYNAMIC_FETCH_SCRIPT_ID: &str = "wattlist-dynamic-fetch";

/// One generation's worth of replacement content. The timestamp is injected
/// by the caller so the mutation itself is a pure function of its inputs.
#[derive(Debug, Clone)]
pub struct Mutation {
    pub rows_html: String,
    pub product_count: usize,
    pub generated_at: DateTime<Utc>,
}

/// Applies a mutation to the host document.
///
/// Re-entrant: applying the same mutation to its own output is a no-op, and
/// applying a different one touches only the four mutable zones.
///
/// # Errors
///
/// Returns [`RenderError::AnchorNotFound`] when any required anchor is
/// missing: an incompatible template must fail loudly rather than produce a
/// document that looks complete but dropped data.
pub fn apply(document: &str, mutation: &Mutation) -> Result<String, RenderError> {
    let mut output = strip_injected_script(document);

    let rows = locate(&output, ROWS_ANCHOR_ID)?;
    let timestamp = locate(&output, TIMESTAMP_ANCHOR_ID)?;
    let count = locate(&output, COUNT_ANCHOR_ID)?;

    let mut edits = [
        (
            rows.content_start..rows.content_end,
            format!("\n{}\n", mutation.rows_html),
        ),
        (
            timestamp.content_start..timestamp.content_end,
            mutation
                .generated_at
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
        ),
        (
            count.content_start..count.content_end,
            mutation.product_count.to_string(),
        ),
    ];

    // Splice back-to-front so earlier ranges stay valid.
    edits.sort_by(|a, b| b.0.start.cmp(&a.0.start));
    for (range, replacement) in edits {
        output.replace_range(range, &replacement);
    }

    Ok(output)
}

/// Removes a previously-injected dynamic-fetch script, if present.
///
/// At most one script carries the sentinel id; a document that was never
/// injected passes through unchanged.
fn strip_injected_script(document: &str) -> String {
    match find_element_by_id(document, DYNAMIC_FETCH_SCRIPT_ID) {
        Some(span) => {
            tracing::debug!("removed injected dynamic-fetch script from previous generation");
            let mut stripped = String::with_capacity(document.len());
            stripped.push_str(&document[..span.element_start]);
            stripped.push_str(&document[span.element_end..]);
            stripped
        }
        None => document.to_string(),
    }
}

fn locate(
    document: &str,
    anchor: &str,
) -> Result<crate::locate::ElementSpan, RenderError> {
    find_element_by_id(document, anchor).ok_or_else(|| RenderError::AnchorNotFound {
        anchor: anchor.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn template() -> String {
        "<html><body>\n\
         <p>Updated: <span id=\"update-timestamp\">never</span>\n\
         (<span id=\"product-count\">0</span> products)</p>\n\
         <table><tbody id=\"product-rows\">\n\
         <tr><td>placeholder</td></tr>\n\
         </tbody></table>\n\
         <footer>untouched footer</footer>\n\
         </body></html>"
            .to_string()
    }

    fn make_mutation(rows: &str, count: usize) -> Mutation {
        Mutation {
            rows_html: rows.to_string(),
            product_count: count,
            generated_at: Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn replaces_all_three_zones() {
        let out = apply(&template(), &make_mutation("<tr><td>gen</td></tr>", 7))
            .expect("mutation should apply");

        assert!(out.contains("<tbody id=\"product-rows\">\n<tr><td>gen</td></tr>\n</tbody>"));
        assert!(out.contains("<span id=\"update-timestamp\">2025-08-01 12:00:00 UTC</span>"));
        assert!(out.contains("<span id=\"product-count\">7</span>"));
        assert!(!out.contains("placeholder"));
    }

    #[test]
    fn reapplying_same_mutation_is_identity() {
        let mutation = make_mutation("<tr><td>gen</td></tr>", 7);
        let once = apply(&template(), &mutation).expect("first application");
        let twice = apply(&once, &mutation).expect("second application");

        assert_eq!(once, twice);
    }

    #[test]
    fn regions_outside_zones_survive_byte_for_byte() {
        let out = apply(&template(), &make_mutation("<tr><td>gen</td></tr>", 7))
            .expect("mutation should apply");

        assert!(out.starts_with("<html><body>\n"));
        assert!(out.contains("<footer>untouched footer</footer>"));
        assert!(out.ends_with("</body></html>"));
    }

    #[test]
    fn missing_rows_anchor_fails_loudly() {
        let doc = "<html><span id=\"update-timestamp\"></span><span id=\"product-count\"></span></html>";
        let err = apply(doc, &make_mutation("", 0)).unwrap_err();

        assert!(matches!(
            err,
            RenderError::AnchorNotFound { anchor } if anchor == ROWS_ANCHOR_ID
        ));
    }

    #[test]
    fn missing_count_anchor_fails_loudly() {
        let doc = template().replace("id=\"product-count\"", "id=\"other\"");
        let err = apply(&doc, &make_mutation("", 0)).unwrap_err();

        assert!(matches!(
            err,
            RenderError::AnchorNotFound { anchor } if anchor == COUNT_ANCHOR_ID
        ));
    }

    #[test]
    fn injected_script_removed_exactly_once() {
        let doc = template().replace(
            "<footer>",
            "<script id=\"wattlist-dynamic-fetch\">fetchPrices();</script><footer>",
        );
        let mutation = make_mutation("<tr><td>gen</td></tr>", 1);

        let once = apply(&doc, &mutation).expect("first application");
        assert!(!once.contains("wattlist-dynamic-fetch"));
        assert!(!once.contains("fetchPrices"));

        let twice = apply(&once, &mutation).expect("second application");
        assert_eq!(once, twice);
    }

    #[test]
    fn unrelated_scripts_are_kept() {
        let doc = template().replace(
            "<footer>",
            "<script id=\"table-sort\">sortTable();</script><footer>",
        );
        let out = apply(&doc, &make_mutation("", 0)).expect("mutation should apply");

        assert!(out.contains("<script id=\"table-sort\">sortTable();</script>"));
    }

    #[test]
    fn empty_record_set_renders_empty_container() {
        let out = apply(&template(), &make_mutation("", 0)).expect("mutation should apply");

        assert!(out.contains("<tbody id=\"product-rows\">\n\n</tbody>"));
        assert!(out.contains("<span id=\"product-count\">0</span>"));
    }
}
