//! Error types for herald.

use thiserror::Error;

/// Common error type for herald.
#[derive(Error, Debug)]
pub enum HeraldError {
    /// Feed fetch or parse error.
    ///
    /// Fatal for the run: nothing is delivered and no state is written.
    #[error("feed error: {0}")]
    Feed(String),

    /// State file error.
    ///
    /// Raised for a state file that exists but cannot be read or parsed,
    /// and for failed saves. A missing file is not an error.
    #[error("state error: {0}")]
    State(String),

    /// Webhook delivery error.
    ///
    /// Aborts the remainder of the run; deliveries committed before the
    /// failure stay recorded.
    #[error("delivery error: {0}")]
    Delivery(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for herald operations.
pub type Result<T> = std::result::Result<T, HeraldError>;
