// src/pipeline/notify.rs

//! Notification pipeline.
//!
//! One run: fetch listing → diff against watermark → for each new posting
//! (oldest first) fetch, extract, format, deliver → persist the new
//! watermark. Any failure is reported to the chat and leaves the watermark
//! untouched, so the same postings are retried on the next run.

use url::Url;

use crate::error::{Result, error_report};
use crate::models::Config;
use crate::pipeline::diff::diff_listing;
use crate::services::{ChatSink, FieldExtractor, MessageFormatter, PageFetcher, posting_links};
use crate::storage::WatermarkStore;
use crate::utils::date::{Clock, academic_year};
use crate::utils::resolve_url;

/// Sent when the stored watermark is no longer on the listing page.
pub const FALLBACK_NOTICE: &str = "The last announced posting is no longer listed, \
     so only the newest posting will be announced. Earlier postings may have been missed.";

/// Terminal state of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Nothing new; watermark untouched
    UpToDate,
    /// Postings announced and watermark advanced
    Delivered {
        count: usize,
        fallback_used: bool,
        watermark: String,
    },
    /// A failure was reported to the chat; watermark untouched
    Failed { report: String },
}

/// Drives a notification run over injected collaborators.
pub struct Notifier<'a> {
    config: &'a Config,
    fetcher: &'a dyn PageFetcher,
    sink: &'a dyn ChatSink,
    store: &'a dyn WatermarkStore,
    clock: &'a dyn Clock,
    extractor: FieldExtractor,
    formatter: MessageFormatter,
}

impl<'a> Notifier<'a> {
    pub fn new(
        config: &'a Config,
        fetcher: &'a dyn PageFetcher,
        sink: &'a dyn ChatSink,
        store: &'a dyn WatermarkStore,
        clock: &'a dyn Clock,
    ) -> Result<Self> {
        Ok(Self {
            config,
            fetcher,
            sink,
            store,
            clock,
            extractor: FieldExtractor::new()?,
            formatter: MessageFormatter::from_config(&config.webhook),
        })
    }

    /// Run once, reporting any failure to the chat.
    ///
    /// Only an error while delivering the failure report itself is returned
    /// as `Err`.
    pub async fn run(&self) -> Result<RunOutcome> {
        match self.process().await {
            Ok(outcome) => Ok(outcome),
            Err(error) => {
                let report = error_report(&error);
                log::error!("Run failed: {}", report);
                self.sink.send_text(&report).await?;
                Ok(RunOutcome::Failed { report })
            }
        }
    }

    /// Listing URL for the current academic year.
    pub fn listing_url(&self) -> Result<Url> {
        let board = &self.config.board;
        let year = academic_year(self.clock.today(), board.fiscal_year_start_month);
        Ok(Url::parse(&board.listing_url(year))?)
    }

    async fn process(&self) -> Result<RunOutcome> {
        let listing_url = self.listing_url()?;
        log::info!("Checking listing {}", listing_url);

        let listing_html = self.fetcher.fetch(listing_url.as_str()).await?;
        let all_postings = posting_links(&listing_html)?;
        log::info!("Listing has {} postings", all_postings.len());

        let watermark = self.store.load().await?;
        match &watermark {
            Some(mark) => log::debug!("Stored watermark: {}", mark),
            None => log::info!("No watermark stored"),
        }

        let diff = diff_listing(&all_postings, watermark.as_deref());
        if diff.fallback_used {
            log::warn!("Watermark not found in listing; announcing newest posting only");
            self.sink.send_text(FALLBACK_NOTICE).await?;
        }

        let Some(newest) = diff.newest() else {
            log::info!("No new postings");
            return Ok(RunOutcome::UpToDate);
        };

        if let Some(mention) = &self.config.webhook.mention {
            self.sink.send_text(mention).await?;
        }

        for link in &diff.new_postings {
            let posting_url = resolve_url(&listing_url, link)?;
            let html = self.fetcher.fetch(posting_url.as_str()).await?;
            let record = self.extractor.extract(&html)?;
            let message = self.formatter.format(&record, &posting_url)?;
            self.sink.send_message(&message).await?;
            log::info!("Announced {}", posting_url);
        }

        self.store.save(newest).await?;
        log::info!(
            "Delivered {} postings, watermark is now {}",
            diff.new_postings.len(),
            newest
        );

        Ok(RunOutcome::Delivered {
            count: diff.new_postings.len(),
            fallback_used: diff.fallback_used,
            watermark: newest.to_string(),
        })
    }
}
