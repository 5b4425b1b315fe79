//! Pipeline entry points for notifier operations.
//!
//! - `diff_listing`: Decide which listed postings are new
//! - `Notifier`: Run fetch → diff → announce → persist once

pub mod diff;
pub mod notify;

pub use diff::{ListingDiff, diff_listing};
pub use notify::{FALLBACK_NOTICE, Notifier, RunOutcome};
