// src/services/webhook.rs

//! Chat delivery through a Discord-compatible webhook.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{ChatMessage, HttpConfig, WebhookConfig};

/// Longest plain-text message the webhook accepts.
pub const MAX_CONTENT_CHARS: usize = 2000;

/// Destination for chat messages.
#[async_trait]
pub trait ChatSink: Send + Sync {
    /// Deliver a rich message.
    async fn send_message(&self, message: &ChatMessage) -> Result<()>;

    /// Deliver a plain text message.
    async fn send_text(&self, text: &str) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    embeds: Vec<Embed<'a>>,
}

#[derive(Debug, Serialize)]
struct Embed<'a> {
    description: &'a str,
    color: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<EmbedAuthor<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    footer: Option<EmbedFooter<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<EmbedField<'a>>,
}

#[derive(Debug, Serialize)]
struct EmbedAuthor<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon_url: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct EmbedFooter<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct EmbedField<'a> {
    name: &'a str,
    value: &'a str,
    inline: bool,
}

impl<'a> From<&'a ChatMessage> for Embed<'a> {
    fn from(message: &'a ChatMessage) -> Self {
        Self {
            description: &message.description,
            color: message.color,
            title: message.title.as_ref().map(|t| t.text.as_str()),
            url: message.title.as_ref().map(|t| t.url.as_str()),
            author: message.author_name.as_deref().map(|name| EmbedAuthor {
                name,
                icon_url: message.author_icon.as_deref(),
            }),
            footer: message.footer.as_deref().map(|text| EmbedFooter { text }),
            fields: message
                .fields
                .iter()
                .map(|f| EmbedField {
                    name: &f.name,
                    value: &f.value,
                    inline: true,
                })
                .collect(),
        }
    }
}

/// `ChatSink` posting JSON to a webhook URL.
pub struct DiscordWebhook {
    client: Client,
    url: String,
}

impl DiscordWebhook {
    /// Create a webhook sink.
    pub fn new(webhook: &WebhookConfig, http: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&http.user_agent)
            .timeout(Duration::from_secs(http.timeout_secs))
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: webhook.url.clone(),
        })
    }

    async fn post(&self, payload: &WebhookPayload<'_>) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(AppError::delivery)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::delivery(format!(
                "webhook returned {status}: {body}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ChatSink for DiscordWebhook {
    async fn send_message(&self, message: &ChatMessage) -> Result<()> {
        let payload = WebhookPayload {
            content: None,
            embeds: vec![Embed::from(message)],
        };
        self.post(&payload).await
    }

    async fn send_text(&self, text: &str) -> Result<()> {
        let payload = WebhookPayload {
            content: Some(clip_content(text)),
            embeds: Vec::new(),
        };
        self.post(&payload).await
    }
}

/// Fit text into [`MAX_CONTENT_CHARS`], marking the cut with `…`.
fn clip_content(text: &str) -> String {
    if text.chars().count() <= MAX_CONTENT_CHARS {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(MAX_CONTENT_CHARS - 1).collect();
    clipped.push('…');
    clipped
}
