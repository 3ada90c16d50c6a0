//! Webhook delivery client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::error::{HeraldError, Result};

/// Total timeout for one delivery in seconds.
const DELIVERY_TIMEOUT_SECS: u64 = 30;

/// Delivery seam for the announcer.
///
/// One message per call; a non-success response is an error and the caller
/// stops processing further items for the run.
#[async_trait]
pub trait Transport {
    /// Deliver one message to the destination.
    async fn deliver(&self, message: &str) -> Result<()>;
}

/// Chat webhook client posting `{"text": ...}` payloads.
pub struct WebhookClient {
    client: Client,
    url: String,
}

impl WebhookClient {
    /// Create a client for the given webhook URL.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DELIVERY_TIMEOUT_SECS))
            .build()
            .map_err(|e| HeraldError::Delivery(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// The configured webhook URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Transport for WebhookClient {
    async fn deliver(&self, message: &str) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(&json!({ "text": message }))
            .send()
            .await
            .map_err(|e| HeraldError::Delivery(format!("failed to post message: {}", e)))?;

        if !response.status().is_success() {
            return Err(HeraldError::Delivery(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        Ok(())
    }
}
