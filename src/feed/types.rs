//! Feed entry types for herald.

/// Maximum feed size in bytes (5MB).
pub const MAX_FEED_SIZE: u64 = 5 * 1024 * 1024;

/// A raw feed entry as handed over by the feed parser.
///
/// Field contents are whatever the upstream feed provided; nothing is
/// trimmed or sanitized yet. The entry order of a fetched feed is the
/// feed's own order, typically newest first.
#[derive(Debug, Clone, Default)]
pub struct RawEntry {
    /// Explicit entry id (Atom `<id>`; feed parsers surface RSS `<guid>` here too).
    pub id: Option<String>,
    /// RSS guid, when known separately from the id.
    pub guid: Option<String>,
    /// Link to the entry.
    pub link: Option<String>,
    /// Entry title.
    pub title: Option<String>,
    /// Primary summary text.
    pub summary: Option<String>,
    /// Secondary description text, used when the summary is empty.
    pub description: Option<String>,
}

impl RawEntry {
    /// Create an empty entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the explicit id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the guid.
    pub fn with_guid(mut self, guid: impl Into<String>) -> Self {
        self.guid = Some(guid.into());
        self
    }

    /// Set the link.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A feed entry reduced to the fields the announcer works with.
///
/// Invariant: `id` is non-empty and trimmed. Entries without a usable
/// identifier never become a `NormalizedItem`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedItem {
    /// Stable identifier used for deduplication across runs.
    pub id: String,
    /// Sanitized, label-escaped title (possibly empty).
    pub title: String,
    /// Entry link (possibly empty).
    pub link: String,
    /// Sanitized abstract text (possibly empty).
    pub abstract_text: String,
}
