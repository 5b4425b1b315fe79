// src/services/formatter.rs

//! Chat message formatting for extracted postings.

use url::Url;

use crate::error::Result;
use crate::models::{ChatMessage, Link, MessageTitle, PostingRecord, WebhookConfig};

const TITLE_PREFIX: &str = "📰 ";
const REFERENCE_FIELD: &str = "📖 Reference";
const ATTACH_FIELD_PREFIX: &str = "📁 Attach";

/// Converts posting records into chat messages.
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    color: u32,
    author_icon_url: Option<String>,
}

impl MessageFormatter {
    pub fn new(color: u32, author_icon_url: Option<String>) -> Self {
        Self {
            color,
            author_icon_url,
        }
    }

    /// Create a formatter from webhook settings.
    pub fn from_config(config: &WebhookConfig) -> Self {
        Self::new(config.color, config.author_icon_url.clone())
    }

    /// Build the message for `record`, which was fetched from `source_url`.
    ///
    /// Relative reference and attachment links are resolved against
    /// `source_url`.
    pub fn format(&self, record: &PostingRecord, source_url: &Url) -> Result<ChatMessage> {
        let mut message = ChatMessage::new(record.body.clone(), self.color);

        message.title = record.title.as_ref().map(|title| MessageTitle {
            text: format!("{TITLE_PREFIX}{title}"),
            url: source_url.to_string(),
        });
        if let Some(author) = &record.author {
            message.author_name = Some(author.clone());
            message.author_icon = self.author_icon_url.clone();
        }
        message.footer = record.date.clone();

        if let Some(reference) = &record.reference {
            message.push_field(REFERENCE_FIELD, markdown_link(source_url, reference)?);
        }
        for (index, attachment) in record.attachments.iter().enumerate() {
            message.push_field(
                format!("{ATTACH_FIELD_PREFIX}{}", index + 1),
                markdown_link(source_url, attachment)?,
            );
        }

        Ok(message)
    }
}

/// Render `[label](absolute-url)`.
fn markdown_link(base: &Url, link: &Link) -> Result<String> {
    let resolved = base.join(&link.href)?;
    Ok(format!("[{}]({})", link.label, resolved))
}
