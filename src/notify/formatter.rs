//! Message formatting for webhook delivery.

use crate::feed::types::NormalizedItem;

/// Ellipsis appended to truncated abstracts.
const ELLIPSIS: char = '\u{2026}';

/// Render an item as a single webhook message.
///
/// Layout: optional label line, then the title line, then the abstract.
/// The title line is a `<link|title>` rich link when both parts are
/// present, otherwise whichever part exists, and is wrapped in `*...*`
/// emphasis when non-empty. Absent parts are omitted entirely; the parts
/// that remain are joined by single newlines.
pub fn format_message(item: &NormalizedItem, label: &str, max_abstract_chars: usize) -> String {
    let title_line = title_line(item);
    let abstract_text = truncate_abstract(&item.abstract_text, max_abstract_chars);

    let mut parts: Vec<&str> = Vec::new();
    let label = label.trim();
    if !label.is_empty() {
        parts.push(label);
    }
    if !title_line.is_empty() {
        parts.push(&title_line);
    }
    if !abstract_text.is_empty() {
        parts.push(&abstract_text);
    }
    parts.join("\n").trim().to_string()
}

/// Build the emphasized title line, or an empty string when the item has
/// neither title nor link.
fn title_line(item: &NormalizedItem) -> String {
    let line = if !item.link.is_empty() && !item.title.is_empty() {
        format!("<{}|{}>", item.link, item.title)
    } else if !item.title.is_empty() {
        item.title.clone()
    } else {
        item.link.clone()
    };
    if line.is_empty() {
        line
    } else {
        format!("*{}*", line)
    }
}

/// Cut the abstract at the character limit, dropping trailing whitespace
/// from the cut and appending an ellipsis. A limit of zero disables
/// truncation.
fn truncate_abstract(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if max_chars == 0 || text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    let mut cut = cut.trim_end().to_string();
    cut.push(ELLIPSIS);
    cut
}
