// src/services/listing.rs

//! Posting link scan for the board's index page.

use regex::Regex;

use crate::error::{AppError, Result};

const LINK_PATTERN: &str = r#"<A HREF="(.+?)""#;

/// Collect posting links from the listing page in document order.
///
/// The board lists postings newest first, so the returned order is newest
/// first as well. Duplicates are kept.
pub fn posting_links(listing_html: &str) -> Result<Vec<String>> {
    let pattern = Regex::new(LINK_PATTERN).map_err(|e| AppError::pattern(LINK_PATTERN, e))?;
    Ok(pattern
        .captures_iter(listing_html)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect())
}
