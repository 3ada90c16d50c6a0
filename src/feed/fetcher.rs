//! Feed fetching and parsing.
//!
//! Fetches the configured feed over HTTP and parses it into raw entries,
//! preserving the feed's natural entry order.

use std::time::Duration;

use feed_rs::parser;
use reqwest::Client;

use crate::error::{HeraldError, Result};
use crate::feed::types::{RawEntry, MAX_FEED_SIZE};

/// Connect timeout in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 5;

/// User agent string for feed fetching.
const USER_AGENT: &str = "herald/0.1 (feed announcer)";

/// Feed fetcher with timeouts and a response size cap.
pub struct FeedFetcher {
    client: Client,
}

impl FeedFetcher {
    /// Create a fetcher with the given total request timeout.
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS.min(timeout_secs)))
            .timeout(Duration::from_secs(timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| HeraldError::Feed(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Fetch and parse the feed at the given URL.
    ///
    /// Entries come back in the feed's own order (typically newest first).
    /// Any transport or parse failure is fatal for the run.
    pub async fn fetch(&self, url: &str) -> Result<Vec<RawEntry>> {
        validate_url(url)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HeraldError::Feed(format!("failed to fetch feed: {}", e)))?;

        if !response.status().is_success() {
            return Err(HeraldError::Feed(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        if let Some(content_length) = response.content_length() {
            if content_length > MAX_FEED_SIZE {
                return Err(HeraldError::Feed(format!(
                    "feed too large: {} bytes (max {} bytes)",
                    content_length, MAX_FEED_SIZE
                )));
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| HeraldError::Feed(format!("failed to read response: {}", e)))?;

        if bytes.len() as u64 > MAX_FEED_SIZE {
            return Err(HeraldError::Feed(format!(
                "feed too large: {} bytes (max {} bytes)",
                bytes.len(),
                MAX_FEED_SIZE
            )));
        }

        parse_entries(&bytes)
    }
}

/// Validate that a feed URL is plain http(s) with a host.
pub fn validate_url(url: &str) -> Result<()> {
    let parsed =
        url::Url::parse(url).map_err(|e| HeraldError::Feed(format!("invalid URL: {}", e)))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(HeraldError::Feed(format!(
                "unsupported URL scheme: {}",
                scheme
            )));
        }
    }

    if parsed.host().is_none() {
        return Err(HeraldError::Feed("URL has no host".to_string()));
    }

    Ok(())
}

/// Parse feed bytes into raw entries, keeping feed order.
fn parse_entries(bytes: &[u8]) -> Result<Vec<RawEntry>> {
    let feed = parser::parse(bytes)
        .map_err(|e| HeraldError::Feed(format!("failed to parse feed: {}", e)))?;

    let entries = feed
        .entries
        .into_iter()
        .map(|entry| {
            // feed-rs folds the RSS <guid> into the entry id, so the id
            // doubles as the guid candidate.
            let id = if entry.id.trim().is_empty() {
                None
            } else {
                Some(entry.id)
            };
            RawEntry {
                guid: id.clone(),
                id,
                link: entry.links.first().map(|l| l.href.clone()),
                title: entry.title.map(|t| t.content),
                summary: entry.summary.map(|t| t.content),
                description: entry.content.and_then(|c| c.body),
            }
        })
        .collect();

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_valid_https() {
        assert!(validate_url("https://example.com/feed.xml").is_ok());
    }

    #[test]
    fn test_validate_url_valid_http() {
        assert!(validate_url("http://example.com/feed.xml").is_ok());
    }

    #[test]
    fn test_validate_url_invalid_scheme() {
        let result = validate_url("ftp://example.com/feed.xml");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("unsupported URL scheme"));
    }

    #[test]
    fn test_validate_url_not_a_url() {
        assert!(validate_url("not a url").is_err());
    }

    #[test]
    fn test_parse_entries_rss() {
        let rss = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Feed</title>
    <link>https://example.com</link>
    <item>
      <title>First Article</title>
      <link>https://example.com/1</link>
      <guid>guid-1</guid>
      <description>&lt;p&gt;Description&lt;/p&gt;</description>
    </item>
    <item>
      <title>Second Article</title>
      <link>https://example.com/2</link>
      <guid>guid-2</guid>
    </item>
  </channel>
</rss>"#;

        let entries = parse_entries(rss.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, Some("guid-1".to_string()));
        assert_eq!(entries[0].guid, Some("guid-1".to_string()));
        assert_eq!(entries[0].title, Some("First Article".to_string()));
        assert_eq!(entries[0].link, Some("https://example.com/1".to_string()));
        assert_eq!(entries[1].id, Some("guid-2".to_string()));
    }

    #[test]
    fn test_parse_entries_keeps_feed_order() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <item><guid>newest</guid></item>
    <item><guid>middle</guid></item>
    <item><guid>oldest</guid></item>
  </channel>
</rss>"#;

        let entries = parse_entries(rss.as_bytes()).unwrap();
        let ids: Vec<_> = entries.iter().filter_map(|e| e.id.as_deref()).collect();
        assert_eq!(ids, vec!["newest", "middle", "oldest"]);
    }

    #[test]
    fn test_parse_entries_atom() {
        let atom = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Feed</title>
  <entry>
    <id>urn:uuid:1</id>
    <title>Atom Entry</title>
    <link href="https://example.com/entry"/>
    <summary>Entry summary</summary>
    <updated>2025-01-01T00:00:00Z</updated>
  </entry>
</feed>"#;

        let entries = parse_entries(atom.as_bytes()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, Some("urn:uuid:1".to_string()));
        assert_eq!(entries[0].title, Some("Atom Entry".to_string()));
        assert_eq!(
            entries[0].link,
            Some("https://example.com/entry".to_string())
        );
        assert_eq!(entries[0].summary, Some("Entry summary".to_string()));
    }

    #[test]
    fn test_parse_entries_invalid() {
        assert!(parse_entries(b"This is not XML").is_err());
    }
}
