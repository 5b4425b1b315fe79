//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Bulletin board location
    #[serde(default)]
    pub board: BoardConfig,

    /// HTTP client behavior
    #[serde(default)]
    pub http: HttpConfig,

    /// Chat webhook settings
    #[serde(default)]
    pub webhook: WebhookConfig,

    /// Watermark persistence
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Build configuration from the process environment.
    ///
    /// `BOARD_CONFIG` optionally names a TOML file used as the base layer.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var("BOARD_CONFIG") {
            Ok(path) => Self::load_or_default(path),
            Err(_) => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using the given lookup.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(username) = lookup("BOARD_ID") {
            self.http.username = Some(username);
        }
        if let Some(password) = lookup("BOARD_PASS") {
            self.http.password = Some(password);
        }
        if let Some(base_url) = lookup("BOARD_URL") {
            self.board.base_url = base_url;
        }
        if let Some(url) = lookup("WEBHOOK_URL") {
            self.webhook.url = url;
        }
        if let Some(icon) = lookup("AUTHOR_ICON_URL") {
            self.webhook.author_icon_url = Some(icon);
        }
        if let Some(mention) = lookup("NOTIFY_MENTION") {
            self.webhook.mention = Some(mention);
        }
        if let Some(path) = lookup("WATERMARK_PATH") {
            self.storage.watermark_path = PathBuf::from(path);
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.board.base_url.trim().is_empty() {
            return Err(AppError::validation("board.base_url is empty"));
        }
        Url::parse(&self.board.base_url)
            .map_err(|e| AppError::validation(format!("board.base_url is invalid: {e}")))?;
        if !(1..=12).contains(&self.board.fiscal_year_start_month) {
            return Err(AppError::validation(
                "board.fiscal_year_start_month must be within 1..=12",
            ));
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.webhook.url.trim().is_empty() {
            return Err(AppError::validation("webhook.url is empty"));
        }
        Url::parse(&self.webhook.url)
            .map_err(|e| AppError::validation(format!("webhook.url is invalid: {e}")))?;
        Ok(())
    }
}

/// Bulletin board location settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Board root; the academic year is appended to it
    #[serde(default)]
    pub base_url: String,

    /// Listing page path below the year directory
    #[serde(default = "defaults::listing_path")]
    pub listing_path: String,

    /// Month (1-12) in which the academic year starts
    #[serde(default = "defaults::fiscal_year_start_month")]
    pub fiscal_year_start_month: u32,
}

impl BoardConfig {
    /// Listing page URL for the given academic year.
    pub fn listing_url(&self, year: i32) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = self.listing_path.trim_start_matches('/');
        format!("{base}/{year}/{path}")
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            listing_path: defaults::listing_path(),
            fiscal_year_start_month: defaults::fiscal_year_start_month(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Pause after every fetch in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Basic auth user name
    #[serde(default, skip_serializing)]
    pub username: Option<String>,

    /// Basic auth password
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            username: None,
            password: None,
        }
    }
}

/// Chat webhook settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Webhook endpoint
    #[serde(default, skip_serializing)]
    pub url: String,

    /// Embed accent color
    #[serde(default = "defaults::color")]
    pub color: u32,

    /// Icon shown next to the posting author
    #[serde(default)]
    pub author_icon_url: Option<String>,

    /// Plain text sent before each batch (e.g. `@everyone`)
    #[serde(default)]
    pub mention: Option<String>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            color: defaults::color(),
            author_icon_url: None,
            mention: None,
        }
    }
}

/// Watermark storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "defaults::watermark_path")]
    pub watermark_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            watermark_path: defaults::watermark_path(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Board defaults
    pub fn listing_path() -> String {
        "boards/new.html".into()
    }
    pub fn fiscal_year_start_month() -> u32 {
        4
    }

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; board-notifier/0.1)".into()
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn request_delay() -> u64 {
        1000
    }

    // Webhook defaults
    pub fn color() -> u32 {
        0x7E6CA8
    }

    // Storage defaults
    pub fn watermark_path() -> PathBuf {
        PathBuf::from("latest")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.board.base_url = "https://board.example.ac.jp/".to_string();
        config.webhook.url = "https://discord.com/api/webhooks/1/token".to_string();
        config
    }

    #[test]
    fn validate_valid_config_ok() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_base_url() {
        let mut config = valid_config();
        config.board.base_url = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_start_month() {
        let mut config = valid_config();
        config.board.fiscal_year_start_month = 13;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = valid_config();
        config.http.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn defaults_match_board_conventions() {
        let config = Config::default();
        assert_eq!(config.http.timeout_secs, 10);
        assert_eq!(config.http.request_delay_ms, 1000);
        assert_eq!(config.board.fiscal_year_start_month, 4);
        assert_eq!(config.webhook.color, 0x7E6CA8);
        assert_eq!(config.storage.watermark_path, PathBuf::from("latest"));
    }

    #[test]
    fn listing_url_joins_year_and_path() {
        let mut board = BoardConfig::default();
        board.base_url = "https://board.example.ac.jp/bbs/".to_string();
        assert_eq!(
            board.listing_url(2024),
            "https://board.example.ac.jp/bbs/2024/boards/new.html"
        );

        board.base_url = "https://board.example.ac.jp/bbs".to_string();
        assert_eq!(
            board.listing_url(2023),
            "https://board.example.ac.jp/bbs/2023/boards/new.html"
        );
    }

    #[test]
    fn apply_env_overrides_fields() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("BOARD_ID", "student"),
            ("BOARD_PASS", "secret"),
            ("BOARD_URL", "https://board.example.ac.jp/"),
            ("WEBHOOK_URL", "https://discord.com/api/webhooks/1/token"),
            ("NOTIFY_MENTION", "@everyone"),
            ("WATERMARK_PATH", "/var/lib/board/latest"),
        ]);
        let mut config = Config::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.http.username.as_deref(), Some("student"));
        assert_eq!(config.http.password.as_deref(), Some("secret"));
        assert_eq!(config.board.base_url, "https://board.example.ac.jp/");
        assert_eq!(config.webhook.mention.as_deref(), Some("@everyone"));
        assert_eq!(config.webhook.author_icon_url, None);
        assert_eq!(
            config.storage.watermark_path,
            PathBuf::from("/var/lib/board/latest")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn toml_sections_use_defaults() {
        let config: Config = toml::from_str(
            r#"
            [board]
            base_url = "https://board.example.ac.jp/"
            fiscal_year_start_month = 9

            [http]
            request_delay_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.board.fiscal_year_start_month, 9);
        assert_eq!(config.board.listing_path, "boards/new.html");
        assert_eq!(config.http.request_delay_ms, 250);
        assert_eq!(config.http.timeout_secs, 10);
    }
}
