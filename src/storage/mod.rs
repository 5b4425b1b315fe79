//! Watermark persistence.
//!
//! The watermark is the link of the most recently announced posting. It is
//! read once at the start of a run and written once after a fully successful
//! run.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;

// Re-export for convenience
pub use local::FileWatermarkStore;

/// Trait for watermark storage backends.
#[async_trait]
pub trait WatermarkStore: Send + Sync {
    /// Load the stored watermark. `None` when nothing has been stored yet.
    async fn load(&self) -> Result<Option<String>>;

    /// Replace the stored watermark.
    async fn save(&self, watermark: &str) -> Result<()>;
}
