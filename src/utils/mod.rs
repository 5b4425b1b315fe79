//! Utility functions and helpers.

pub mod date;

use url::Url;

use crate::error::Result;

/// Resolve a potentially relative link against the page it was found on.
pub fn resolve_url(base: &Url, href: &str) -> Result<Url> {
    Ok(base.join(href)?)
}
