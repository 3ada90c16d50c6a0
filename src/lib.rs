//! herald - feed announcer
//!
//! Polls a syndication feed and announces entries that have not been
//! announced before to a chat webhook, keeping a durable record of what
//! was already sent so repeated runs never duplicate a notification.

pub mod announcer;
pub mod config;
pub mod error;
pub mod feed;
pub mod logging;
pub mod notify;
pub mod state;

pub use announcer::{Announcer, RunOutcome, DEFAULT_DELIVERY_PAUSE_MS};
pub use config::Config;
pub use error::{HeraldError, Result};
pub use feed::{
    normalize, normalize_entries, sanitize_text, validate_url, FeedFetcher, NormalizedItem,
    RawEntry,
};
pub use notify::{format_message, Transport, WebhookClient};
pub use state::{StateSink, StateStore};
