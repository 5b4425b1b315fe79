//! Bulletin board notifier
//!
//! Checks the board once and announces new postings. Meant to be invoked by
//! an external scheduler (cron, systemd timer). Takes no arguments; all
//! settings come from the environment (see `Config::apply_env`).

use board_notifier::{
    error::Result,
    models::Config,
    pipeline::{Notifier, RunOutcome},
    services::{DiscordWebhook, HttpFetcher},
    storage::FileWatermarkStore,
    utils::date::SystemClock,
};

/// Initialize logging, honoring `RUST_LOG`.
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the notifier.
#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();
    init_logging();

    log::info!("Board notifier starting...");

    let config = Config::from_env()?;
    let fetcher = HttpFetcher::new(&config.http)?;
    let sink = DiscordWebhook::new(&config.webhook, &config.http)?;
    let store = FileWatermarkStore::new(&config.storage.watermark_path);
    let clock = SystemClock;

    let notifier = Notifier::new(&config, &fetcher, &sink, &store, &clock)?;
    match notifier.run().await? {
        RunOutcome::UpToDate => log::info!("Up to date"),
        RunOutcome::Delivered {
            count,
            fallback_used,
            watermark,
        } => {
            if fallback_used {
                log::warn!("Watermark was stale; earlier postings may have been skipped");
            }
            log::info!("Announced {} postings (watermark {})", count, watermark);
        }
        RunOutcome::Failed { .. } => log::warn!("Run failed; failure was reported to the chat"),
    }

    log::info!("Done!");

    Ok(())
}
