// src/services/fetcher.rs

//! Authenticated page fetching with a fixed post-fetch pause.

use std::time::Duration;

use async_trait::async_trait;
use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;

use crate::error::{AppError, Result};
use crate::models::HttpConfig;

/// Source of decoded page text.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return its body as text.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Basic auth credentials for the board.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// `PageFetcher` backed by reqwest.
///
/// Every successful fetch is followed by `delay`, so a loop of fetches never
/// hits the board faster than one page per delay. Requests are attempted once.
pub struct HttpFetcher {
    client: Client,
    credentials: Option<Credentials>,
    delay: Duration,
}

impl HttpFetcher {
    /// Create a fetcher from HTTP settings.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;

        let credentials = config.username.as_ref().map(|username| Credentials {
            username: username.clone(),
            password: config.password.clone().unwrap_or_default(),
        });

        Ok(Self {
            client,
            credentials,
            delay: Duration::from_millis(config.request_delay_ms),
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let mut request = self.client.get(url);
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }

        let response = request.send().await.map_err(|e| AppError::fetch(url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::fetch(url, format!("HTTP status {status}")));
        }

        let charset = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(charset_from_content_type);
        let bytes = response.bytes().await.map_err(|e| AppError::fetch(url, e))?;
        let text = decode_body(&bytes, charset.as_deref());

        log::debug!("Fetched {} ({} bytes)", url, bytes.len());
        tokio::time::sleep(self.delay).await;
        Ok(text)
    }
}

/// Extract the `charset` parameter from a `Content-Type` value.
fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"').to_string())
    })
}

/// Decode a response body.
///
/// A byte-order mark wins, then the declared charset, then detection on the
/// bytes themselves. A server-declared charset is trusted over detection, so
/// a page that declares the wrong charset decodes as declared.
pub fn decode_body(bytes: &[u8], declared: Option<&str>) -> String {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| declared.and_then(|label| Encoding::for_label(label.as_bytes())))
        .unwrap_or_else(|| {
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            detector.guess(None, true)
        });

    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        log::warn!("Body contained bytes invalid for {}", encoding.name());
    }
    text.into_owned()
}
