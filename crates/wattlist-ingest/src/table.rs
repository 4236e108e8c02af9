//! Minimal delimited-text parsing for the catalog export.
//!
//! The source spreadsheet export uses minimal quoting, not full RFC 4180:
//! a field is quoted iff it opens with `"`, a quote toggles in-quotes mode,
//! and a delimiter inside quotes is literal. There is no quote-doubling
//! escape. Quoted fields do not span lines.

use crate::error::IngestError;

/// One parsed tabular block: a header row plus zero or more data rows.
///
/// Rows are stored as cleaned field values and may be shorter than the
/// header; consumers zip positionally and treat missing trailing fields as
/// empty strings.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Parses a comma-delimited block with a header row.
///
/// Entirely blank lines are skipped silently. Zero data rows is valid and
/// yields an empty `rows`.
///
/// # Errors
///
/// Returns [`IngestError::MalformedInput`] only when the header row is
/// absent or all of its fields are empty.
pub fn parse_table(text: &str) -> Result<RawTable, IngestError> {
    let mut lines = text.lines();

    let header_line = lines.next().ok_or_else(|| IngestError::MalformedInput {
        reason: "catalog is empty; expected a header row".to_string(),
    })?;

    let headers = split_fields(header_line, ',');
    if headers.iter().all(String::is_empty) {
        return Err(IngestError::MalformedInput {
            reason: "catalog header row is empty".to_string(),
        });
    }

    let rows = lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| split_fields(line, ','))
        .collect();

    Ok(RawTable { headers, rows })
}

/// Splits one line on `delimiter`, honoring the minimal quoting rules, and
/// cleans each field.
fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        if c == '"' {
            in_quotes = !in_quotes;
            current.push(c);
        } else if c == delimiter && !in_quotes {
            fields.push(clean_field(&current));
            current.clear();
        } else {
            current.push(c);
        }
    }
    fields.push(clean_field(&current));

    fields
}

/// Trims a raw field and strips one layer of surrounding double quotes if
/// present. The strip is independent of the quote-mode split so that
/// already-quoted values reaching this stage come out clean too.
fn clean_field(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };
    unquoted.trim().to_string()
}
