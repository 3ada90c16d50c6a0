//! The announcement engine.
//!
//! Decides which feed entries are new, delivers them oldest first, and
//! records every successful delivery durably before moving on. On the very
//! first run (empty prior state) the engine primes the state with
//! everything currently in the feed and sends nothing, so deploying against
//! an established feed does not flood the channel with history.

use std::collections::BTreeSet;

use tokio::time::{sleep, Duration};
use tracing::{debug, info};

use crate::error::Result;
use crate::feed::types::NormalizedItem;
use crate::notify::formatter::format_message;
use crate::notify::webhook::Transport;
use crate::state::StateSink;

/// Default pause between deliveries in milliseconds.
pub const DEFAULT_DELIVERY_PAUSE_MS: u64 = 500;

/// Outcome of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// First run: the state was primed with this many identifiers and
    /// nothing was sent.
    Primed(usize),
    /// Steady state: this many new entries were delivered.
    Delivered(usize),
}

/// The announcement engine.
///
/// Holds only message settings; the announced-identifier set is passed into
/// [`Announcer::run`] and mutated in place, so callers and tests control
/// exactly what prior state a run sees.
pub struct Announcer {
    label: String,
    max_abstract_chars: usize,
    delivery_pause: Duration,
}

impl Announcer {
    /// Create an announcer with the given message settings.
    pub fn new(label: impl Into<String>, max_abstract_chars: usize) -> Self {
        Self {
            label: label.into(),
            max_abstract_chars,
            delivery_pause: Duration::from_millis(DEFAULT_DELIVERY_PAUSE_MS),
        }
    }

    /// Override the pause between deliveries.
    pub fn with_delivery_pause(mut self, pause: Duration) -> Self {
        self.delivery_pause = pause;
        self
    }

    /// Run one reconciliation pass.
    ///
    /// `items` is the normalized feed content in feed order (typically
    /// newest first); `posted` is the previously announced set. Every
    /// successful delivery is persisted through `sink` before the next
    /// delivery starts, so an aborted run never loses committed progress;
    /// the failing item and everything after it stay unannounced and are
    /// picked up again by the next run.
    pub async fn run<T: Transport, S: StateSink>(
        &self,
        items: &[NormalizedItem],
        posted: &mut BTreeSet<String>,
        transport: &T,
        sink: &mut S,
    ) -> Result<RunOutcome> {
        // An empty prior set means this is the first run against this
        // feed: mark everything as seen and send nothing.
        if posted.is_empty() {
            for item in items {
                posted.insert(item.id.clone());
            }
            sink.persist(posted)?;
            info!(
                "Primed state with {} existing feed item(s); no messages sent",
                items.len()
            );
            return Ok(RunOutcome::Primed(items.len()));
        }

        // Feed order is typically newest first; deliver oldest first so
        // the channel reads chronologically.
        let new_items: Vec<&NormalizedItem> = items
            .iter()
            .rev()
            .filter(|item| !posted.contains(&item.id))
            .collect();

        debug!("{} of {} feed item(s) are new", new_items.len(), items.len());

        let mut delivered = 0usize;
        for item in new_items {
            let message = format_message(item, &self.label, self.max_abstract_chars);
            transport.deliver(&message).await?;
            posted.insert(item.id.clone());
            // Commit point: a failure later in the run must not forget
            // this delivery, or the next run would repeat it.
            sink.persist(posted)?;
            delivered += 1;
            debug!("Delivered {}", item.id);
            if self.delivery_pause > Duration::ZERO {
                sleep(self.delivery_pause).await;
            }
        }

        sink.persist(posted)?;
        info!("Delivered {} new item(s)", delivered);
        Ok(RunOutcome::Delivered(delivered))
    }
}
