//! Anchor location by element id.
//!
//! The mutator splices ranges out of the raw document text rather than
//! parsing and re-serializing it, so every byte outside the mutated zones
//! survives exactly. This module finds those ranges: the element owning an
//! `id="..."` attribute and its content span, tracking nesting of the same
//! tag name so container elements close at the right depth.

/// Byte ranges of one located element: the whole element and its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ElementSpan {
    pub element_start: usize,
    pub content_start: usize,
    pub content_end: usize,
    pub element_end: usize,
}

/// Finds the element carrying `id="<id>"` (double-quoted, preceded by
/// whitespace, so `data-id` and friends never match). Returns `None` when
/// the id is absent or the element never closes.
pub(crate) fn find_element_by_id(document: &str, id: &str) -> Option<ElementSpan> {
    let needle = format!("id=\"{id}\"");
    let mut search_from = 0;

    while let Some(rel) = document[search_from..].find(&needle) {
        let attr_pos = search_from + rel;
        search_from = attr_pos + needle.len();

        let preceded_by_space = document[..attr_pos]
            .chars()
            .last()
            .is_some_and(char::is_whitespace);
        if !preceded_by_space {
            continue;
        }

        let Some(element_start) = document[..attr_pos].rfind('<') else {
            continue;
        };
        // The attribute must sit inside this opening tag, not in text after
        // some earlier element.
        if document[element_start..attr_pos].contains('>') {
            continue;
        }

        let tag: String = document[element_start + 1..]
            .chars()
            .take_while(char::is_ascii_alphanumeric)
            .collect();
        if tag.is_empty() {
            continue;
        }

        let Some(open_end) = document[attr_pos..].find('>') else {
            continue;
        };
        let content_start = attr_pos + open_end + 1;

        if let Some((content_end, element_end)) =
            find_matching_close(document, content_start, &tag)
        {
            return Some(ElementSpan {
                element_start,
                content_start,
                content_end,
                element_end,
            });
        }
    }

    None
}

/// Scans forward from `from` for the close tag matching an already-open
/// `<tag>`, counting same-name nested openings.
fn find_matching_close(document: &str, from: usize, tag: &str) -> Option<(usize, usize)> {
    let open_token = format!("<{tag}");
    let close_token = format!("</{tag}>");

    let mut depth = 1usize;
    let mut pos = from;

    loop {
        let next_close = document[pos..].find(&close_token)?;

        // Count same-tag openings before that close.
        let mut scan = pos;
        let mut opens = 0usize;
        while let Some(rel) = document[scan..pos + next_close].find(&open_token) {
            let token_end = scan + rel + open_token.len();
            let boundary = document[token_end..]
                .chars()
                .next()
                .is_some_and(|c| c.is_whitespace() || c == '>' || c == '/');
            if boundary {
                opens += 1;
            }
            scan = token_end;
        }

        depth += opens;
        depth -= 1;
        if depth == 0 {
            let content_end = pos + next_close;
            return Some((content_end, content_end + close_token.len()));
        }
        pos = pos + next_close + close_token.len();
    }
}
