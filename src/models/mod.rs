// src/models/mod.rs

//! Domain models for the notifier.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod message;
mod posting;

// Re-export all public types
pub use config::{BoardConfig, Config, HttpConfig, StorageConfig, WebhookConfig};
pub use message::{ChatMessage, MessageField, MessageTitle};
pub use posting::{Link, PostingRecord};
