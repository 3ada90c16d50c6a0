use std::process::ExitCode;
use std::time::Duration;

use tracing::{error, info};

use herald::announcer::{Announcer, RunOutcome};
use herald::feed::fetcher::FeedFetcher;
use herald::feed::normalizer::normalize_entries;
use herald::notify::webhook::WebhookClient;
use herald::state::StateStore;
use herald::{Config, Result};

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration; the file is optional when the environment
    // provides the required settings.
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let mut config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };
    if let Err(e) = config.apply_env_overrides() {
        eprintln!("Invalid environment override: {e}");
        return ExitCode::FAILURE;
    }

    // Initialize logging
    if let Err(e) = herald::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        herald::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&config).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Run failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// One full poll-and-announce pass.
async fn run(config: &Config) -> Result<RunOutcome> {
    let mut store = StateStore::new(config.state.path.as_str());
    let mut posted = store.load()?;

    let fetcher = FeedFetcher::new(config.feed.fetch_timeout_secs)?;
    let entries = fetcher.fetch(&config.feed.url).await?;
    let items = normalize_entries(&entries);
    info!(
        "Fetched {} feed entries ({} with usable identifiers)",
        entries.len(),
        items.len()
    );

    let transport = WebhookClient::new(config.webhook.url.as_str())?;
    let announcer = Announcer::new(
        config.message.label.as_str(),
        config.message.max_abstract_chars,
    )
    .with_delivery_pause(Duration::from_millis(config.message.delivery_pause_ms));

    announcer
        .run(&items, &mut posted, &transport, &mut store)
        .await
}
