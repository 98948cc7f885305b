//! # News Relay
//!
//! Polls the Naver News search API for a keyword and forwards every article
//! published since the previous run to a Telegram chat, oldest first.
//!
//! ## Usage
//!
//! ```sh
//! export NAVER_CLIENT_ID=... NAVER_CLIENT_SECRET=...
//! export TELEGRAM_BOT_TOKEN=... TELEGRAM_CHAT_ID=...
//! news_relay --keyword 무역협회
//! ```
//!
//! Meant to be run periodically by an external scheduler (cron, CI
//! schedule). Runs must not overlap: the watermark file is not locked.
//!
//! ## Architecture
//!
//! 1. **Config**: CLI/env values validated before anything touches the network
//! 2. **Watermark**: last delivered `pubDate` loaded from `.state/state.json`
//! 3. **Fetch**: one page of results, newest first
//! 4. **Deliver**: new articles sent oldest first, one at a time
//! 5. **Persist**: watermark advanced only after every send succeeded

use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod engine;
mod error;
mod models;
mod notifier;
mod pubdate;
mod source;
mod state;
#[cfg(test)]
mod test_utils;
mod utils;

use cli::Cli;
use config::Config;
use engine::{DeliveryEngine, RunOutcome};
use error::RunError;
use notifier::TelegramNotifier;
use source::NaverNewsClient;
use state::JsonFileStore;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    // .env is optional
    if let Ok(path) = dotenvy::dotenv() {
        debug!(path = %path.display(), "Loaded .env");
    }

    let start_time = std::time::Instant::now();
    info!("news_relay starting up");

    let args = Cli::parse();
    debug!(keyword = %args.keyword, display = args.display, state_file = %args.state_file, "Parsed CLI arguments");

    let result = relay(&args).await;

    let elapsed = start_time.elapsed();
    match result {
        Ok(outcome) => {
            info!(
                delivered = outcome.delivered(),
                elapsed_ms = elapsed.as_millis() as u64,
                "Run complete"
            );
            match outcome {
                RunOutcome::NoNewItems => println!("No new items."),
                RunOutcome::Delivered { count, last_pubdate } => {
                    println!("Sent {} items. Updated last_pubdate={}", count, last_pubdate)
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, elapsed_ms = elapsed.as_millis() as u64, "Run failed; watermark unchanged");
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

/// Validate configuration, wire the collaborators and run once.
async fn relay(args: &Cli) -> Result<RunOutcome, RunError> {
    let config = Config::from_cli(args)?;
    info!(
        keyword = %config.relay.keyword,
        timeout_secs = config.timeout.as_secs(),
        "Configuration loaded"
    );

    let source = NaverNewsClient::new(&config.naver_api_base, config.naver.clone(), config.timeout)?;
    let notifier =
        TelegramNotifier::new(&config.telegram_api_base, config.telegram.clone(), config.timeout)?;
    let store = JsonFileStore::new(config.state_file.clone());
    info!(path = %store.path().display(), "Using watermark file");

    let engine = DeliveryEngine::new(config.relay.clone(), source, notifier, store);
    engine.run().await
}
