//! Service layer for the notifier.
//!
//! This module contains the business logic for:
//! - Page fetching (`PageFetcher`, `HttpFetcher`)
//! - Posting field extraction (`FieldExtractor`)
//! - Listing link scanning (`posting_links`)
//! - Chat message formatting (`MessageFormatter`)
//! - Chat delivery (`ChatSink`, `DiscordWebhook`)

mod extractor;
mod fetcher;
mod formatter;
mod listing;
mod webhook;

pub use extractor::{FieldExtractor, MAX_BODY_CHARS, TRUNCATION_NOTICE, truncate_body};
pub use fetcher::{Credentials, HttpFetcher, PageFetcher, decode_body};
pub use formatter::MessageFormatter;
pub use listing::posting_links;
pub use webhook::{ChatSink, DiscordWebhook, MAX_CONTENT_CHARS};
