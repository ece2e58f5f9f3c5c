//! BibTeX scanner.
//!
//! Works on bytes: every delimiter BibTeX cares about is ASCII, so slicing at
//! delimiter positions always lands on UTF-8 boundaries.

use tracing::{debug, warn};
use vitae_shared::{Result, VitaeError};

use crate::BibEntry;

/// Entry types that carry no bibliographic record.
const SKIPPED_TYPES: [&str; 3] = ["comment", "preamble", "string"];

/// Parse BibTeX source into entries, in file order.
///
/// `%` starts a comment only outside entries or between the fields of an
/// entry; inside a braced or quoted value it is an ordinary character.
pub fn parse_bibtex(text: &str) -> Result<Vec<BibEntry>> {
    let bytes = text.as_bytes();
    let mut entries = Vec::new();
    let mut pos = 0;

    while let Some(at) = next_entry_start(bytes, pos) {
        let type_start = at + 1;
        let type_end = type_start
            + text[type_start..]
                .bytes()
                .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
                .count();
        let entry_type = text[type_start..type_end].to_ascii_lowercase();

        let open = type_end + text[type_end..].bytes().take_while(u8::is_ascii_whitespace).count();
        let delimiter = bytes.get(open).copied();
        if entry_type.is_empty() || !matches!(delimiter, Some(b'{') | Some(b'(')) {
            // A stray `@` (an email address in free text, say); keep scanning.
            pos = type_start;
            continue;
        }

        let close = find_closing(bytes, open).ok_or_else(|| {
            VitaeError::parse(format!(
                "unterminated @{entry_type} entry starting on line {}",
                line_of(text, at)
            ))
        })?;
        pos = close + 1;

        if SKIPPED_TYPES.contains(&entry_type.as_str()) {
            debug!(entry_type = %entry_type, "skipping non-record block");
            continue;
        }

        let entry = parse_body(&entry_type, &text[open + 1..close]);
        if entry.key.is_empty() {
            warn!(line = line_of(text, at), entry_type = %entry_type, "entry has no citation key");
        }
        entries.push(entry);
    }

    debug!(count = entries.len(), "parsed bibliography");
    Ok(entries)
}

/// Position of the next `@` outside a top-level `%` comment.
fn next_entry_start(bytes: &[u8], from: usize) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'@' => return Some(i),
            b'%' if !is_escaped(bytes, i) => {
                i = end_of_line(bytes, i);
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Index of the delimiter closing the one at `open`.
///
/// `{` closes on its balancing `}`; `(` closes on the first `)` outside braces
/// and quotes. Comments between fields are skipped.
fn find_closing(bytes: &[u8], open: usize) -> Option<usize> {
    let paren = bytes[open] == b'(';
    let field_level = if paren { 0 } else { 1 };
    let mut depth: usize = 0;
    let mut in_quotes = false;
    let mut i = open;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if !paren && depth == 0 {
                    return Some(i);
                }
            }
            b'"' if depth == field_level => in_quotes = !in_quotes,
            b')' if paren && depth == 0 && !in_quotes => return Some(i),
            b'%' if depth == field_level && !in_quotes && !is_escaped(bytes, i) => {
                i = end_of_line(bytes, i);
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Drop `%` comments that sit between fields of an entry body.
fn strip_field_comments(body: &str) -> String {
    let bytes = body.as_bytes();
    let mut out = String::with_capacity(body.len());
    let mut depth: usize = 0;
    let mut in_quotes = false;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b'"' if depth == 0 => in_quotes = !in_quotes,
            b'%' if depth == 0 && !in_quotes && !is_escaped(bytes, i) => {
                out.push_str(&body[start..i]);
                i = end_of_line(bytes, i);
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    out.push_str(&body[start..]);
    out
}

fn is_escaped(bytes: &[u8], i: usize) -> bool {
    i > 0 && bytes[i - 1] == b'\\'
}

/// Index of the `\n` ending the line that contains `i`, or the end of input.
fn end_of_line(bytes: &[u8], i: usize) -> usize {
    bytes[i..]
        .iter()
        .position(|b| *b == b'\n')
        .map_or(bytes.len(), |offset| i + offset)
}

/// Parse `key, name = value, ...` into an entry.
fn parse_body(entry_type: &str, body: &str) -> BibEntry {
    let body = strip_field_comments(body);
    let parts = split_top_level(&body);
    let mut parts = parts.into_iter();
    let key = parts.next().map(str::trim).unwrap_or_default();
    let mut entry = BibEntry::new(entry_type, key);

    for part in parts {
        let Some((name, value)) = part.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        entry.set(name, clean_value(value));
    }

    entry
}

/// Split on commas that sit outside braces and outside `"` strings.
fn split_top_level(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth: usize = 0;
    let mut in_quotes = false;
    let mut start = 0;

    for (i, b) in body.bytes().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b'"' if depth == 0 => in_quotes = !in_quotes,
            b',' if depth == 0 && !in_quotes => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < body.len() {
        parts.push(&body[start..]);
    }
    parts
}

/// Strip one layer of enclosing `{}` or `""` and collapse whitespace runs.
fn clean_value(raw: &str) -> String {
    let value = raw.trim();
    let inner = if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else if value.starts_with('{') && outer_braces_match(value) {
        &value[1..value.len() - 1]
    } else {
        value
    };
    inner.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether the `{` opening `value` is balanced by its final `}`.
fn outer_braces_match(value: &str) -> bool {
    let mut depth: usize = 0;
    for (i, b) in value.bytes().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i == value.len() - 1;
                }
            }
            _ => {}
        }
    }
    false
}

/// 1-based line number of a byte offset.
fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].bytes().filter(|b| *b == b'\n').count() + 1
}
