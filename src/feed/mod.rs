//! Feed fetching and normalization for herald.
//!
//! This module turns a remote syndication feed into the normalized items
//! the announcer deduplicates and delivers.

pub mod fetcher;
pub mod normalizer;
pub mod types;

pub use fetcher::{validate_url, FeedFetcher};
pub use normalizer::{escape_label, normalize, normalize_entries, sanitize_text};
pub use types::{NormalizedItem, RawEntry, MAX_FEED_SIZE};
