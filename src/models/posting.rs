//! Posting data structure.

use serde::{Deserialize, Serialize};

/// An anchor found in a posting header: relative target plus its text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    /// Link target as written in the page (usually relative)
    pub href: String,

    /// Anchor text
    pub label: String,
}

impl Link {
    pub fn new(href: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            label: label.into(),
        }
    }
}

/// Structured fields extracted from one bulletin board posting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostingRecord {
    /// Tag-stripped body text, already length-capped
    pub body: String,

    /// `Subject` header
    pub title: Option<String>,

    /// `From` header, display name only
    pub author: Option<String>,

    /// `Date` header, verbatim
    pub date: Option<String>,

    /// `Reference` header
    pub reference: Option<Link>,

    /// `Attach1`, `Attach2`, ... in index order
    pub attachments: Vec<Link>,
}
