//! Entry normalization.
//!
//! Reduces raw feed entries to the identifier, title, link, and abstract
//! the announcer works with. Entries without a usable identifier are
//! dropped here: they cannot be deduplicated across runs.

use crate::feed::types::{NormalizedItem, RawEntry};

/// Longest character reference body worth buffering.
const MAX_ENTITY_LENGTH: usize = 10;

/// Normalize a raw entry, or return `None` when no identifier is available.
///
/// The identifier is the first non-empty trimmed candidate among the
/// explicit id, the guid, and the link, in that order.
pub fn normalize(entry: &RawEntry) -> Option<NormalizedItem> {
    let id = entry_id(entry)?;
    let title = escape_label(&sanitize_text(entry.title.as_deref().unwrap_or("")));
    let link = entry.link.as_deref().unwrap_or("").trim().to_string();
    let abstract_text = sanitize_text(entry_abstract(entry));
    Some(NormalizedItem {
        id,
        title,
        link,
        abstract_text,
    })
}

/// Normalize a batch of entries, dropping those without identifiers and
/// keeping the input order.
pub fn normalize_entries(entries: &[RawEntry]) -> Vec<NormalizedItem> {
    entries.iter().filter_map(normalize).collect()
}

/// Pick the first usable identifier candidate.
fn entry_id(entry: &RawEntry) -> Option<String> {
    [
        entry.id.as_deref(),
        entry.guid.as_deref(),
        entry.link.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .find(|s| !s.is_empty())
    .map(str::to_string)
}

/// Abstract source text: summary first, description as fallback.
fn entry_abstract(entry: &RawEntry) -> &str {
    let summary = entry.summary.as_deref().unwrap_or("").trim();
    if !summary.is_empty() {
        return summary;
    }
    entry.description.as_deref().unwrap_or("").trim()
}

/// Sanitize feed text for plain-text display.
///
/// Decodes HTML character references, turns `<br>` variants and closing
/// `</p>` tags into newlines, strips all remaining markup, normalizes line
/// endings to `\n`, collapses runs of three or more newlines to a blank
/// line, collapses runs of spaces and tabs to a single space, and trims.
pub fn sanitize_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    normalize_whitespace(&strip_markup(text))
}

/// Replace characters that are structurally significant in the webhook's
/// link-label syntax with visually similar substitutes.
///
/// Applied to titles after sanitization so a title can never break out of
/// the `<url|label>` form it is embedded in.
pub fn escape_label(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    text.replace('|', "¦").replace('>', "›").replace('<', "‹")
}

/// Strip markup tags and decode character references.
///
/// `<br>` variants and closing `</p>` tags become newlines so paragraph
/// structure survives the tag strip. Unknown references are kept verbatim.
fn strip_markup(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut tag = String::new();
    let mut entity = String::new();
    let mut in_tag = false;
    let mut in_entity = false;

    for ch in html.chars() {
        if in_tag {
            if ch == '>' {
                in_tag = false;
                if tag_breaks_line(&tag) {
                    result.push('\n');
                }
            } else {
                tag.push(ch);
            }
            continue;
        }

        if in_entity {
            match ch {
                ';' => {
                    in_entity = false;
                    decode_entity(&entity, &mut result);
                }
                '&' => {
                    // Stray ampersand; what was buffered is plain text and a
                    // new reference may start here.
                    result.push('&');
                    result.push_str(&entity);
                    entity.clear();
                }
                _ if ch.is_whitespace() || entity.len() >= MAX_ENTITY_LENGTH => {
                    in_entity = false;
                    result.push('&');
                    result.push_str(&entity);
                    result.push(ch);
                }
                _ => entity.push(ch),
            }
            continue;
        }

        match ch {
            '<' => {
                in_tag = true;
                tag.clear();
            }
            '&' => {
                in_entity = true;
                entity.clear();
            }
            _ => result.push(ch),
        }
    }

    if in_entity {
        result.push('&');
        result.push_str(&entity);
    }

    result
}

/// Whether a tag body (the text between `<` and `>`) forces a line break.
///
/// Matches `<br>`, `<br/>`, `<br />` and closing `</p>` in any case.
fn tag_breaks_line(tag: &str) -> bool {
    let body = tag.trim();
    let (closing, name_part) = match body.strip_prefix('/') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, body),
    };
    let name: String = name_part
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    name == "br" || (closing && name == "p")
}

/// Decode one HTML character reference body (without `&` and `;`) into `out`.
fn decode_entity(entity: &str, out: &mut String) {
    match entity {
        "amp" => out.push('&'),
        "lt" => out.push('<'),
        "gt" => out.push('>'),
        "quot" => out.push('"'),
        "apos" => out.push('\''),
        "nbsp" => out.push(' '),
        "ndash" => out.push('\u{2013}'),
        "mdash" => out.push('\u{2014}'),
        "hellip" => out.push('\u{2026}'),
        "lsquo" => out.push('\u{2018}'),
        "rsquo" => out.push('\u{2019}'),
        "ldquo" => out.push('\u{201C}'),
        "rdquo" => out.push('\u{201D}'),
        _ if entity.starts_with('#') => match parse_numeric_entity(entity).and_then(char::from_u32)
        {
            Some(c) => out.push(c),
            None => {
                out.push('&');
                out.push_str(entity);
                out.push(';');
            }
        },
        _ => {
            out.push('&');
            out.push_str(entity);
            out.push(';');
        }
    }
}

/// Parse a numeric character reference body (e.g., "#123" or "#x7B").
fn parse_numeric_entity(entity: &str) -> Option<u32> {
    if let Some(hex) = entity
        .strip_prefix("#x")
        .or_else(|| entity.strip_prefix("#X"))
    {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse().ok()
    } else {
        None
    }
}

/// Normalize line endings and collapse whitespace runs.
fn normalize_whitespace(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = collapse_newline_runs(&text);
    let text = collapse_horizontal_runs(&text);
    text.trim().to_string()
}

/// Collapse runs of three or more newlines down to a blank line.
fn collapse_newline_runs(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut run = 0usize;
    for ch in text.chars() {
        if ch == '\n' {
            run += 1;
        } else {
            for _ in 0..run.min(2) {
                result.push('\n');
            }
            run = 0;
            result.push(ch);
        }
    }
    for _ in 0..run.min(2) {
        result.push('\n');
    }
    result
}

/// Collapse runs of spaces and tabs to a single space.
fn collapse_horizontal_runs(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_run = false;
    for ch in text.chars() {
        if ch == ' ' || ch == '\t' {
            if !in_run {
                result.push(' ');
                in_run = true;
            }
        } else {
            in_run = false;
            result.push(ch);
        }
    }
    result
}
