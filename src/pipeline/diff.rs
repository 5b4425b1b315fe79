//! Listing diff against the stored watermark.
//!
//! The board lists postings newest first. Everything above the watermark is
//! new; the watermark itself and everything below it has been announced.
//! When the watermark is missing from the listing (the board's retention
//! window moved past it, or this is the first run) there is no way to tell
//! what was missed, so only the newest posting is announced and the caller is
//! told that a fallback happened.

/// Postings to announce for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingDiff {
    /// New posting links, oldest first
    pub new_postings: Vec<String>,
    /// Watermark was absent or not listed
    pub fallback_used: bool,
}

impl ListingDiff {
    /// The newest posting in this diff, which becomes the next watermark.
    pub fn newest(&self) -> Option<&str> {
        self.new_postings.last().map(String::as_str)
    }
}

/// Compute the postings newer than `watermark`.
///
/// `all_postings` is in listing order (newest first). The result is oldest
/// first so delivery happens chronologically.
pub fn diff_listing(all_postings: &[String], watermark: Option<&str>) -> ListingDiff {
    let Some(newest) = all_postings.first() else {
        return ListingDiff::default();
    };

    let position = watermark.and_then(|mark| all_postings.iter().position(|p| p == mark));

    match position {
        Some(index) => ListingDiff {
            new_postings: all_postings[..index].iter().rev().cloned().collect(),
            fallback_used: false,
        },
        None => ListingDiff {
            new_postings: vec![newest.clone()],
            fallback_used: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_postings_oldest_first() {
        let all = listing(&["P5", "P4", "P3", "P2", "P1"]);
        let result = diff_listing(&all, Some("P2"));

        assert_eq!(result.new_postings, vec!["P3", "P4", "P5"]);
        assert!(!result.fallback_used);
        assert_eq!(result.newest(), Some("P5"));
    }

    #[test]
    fn test_watermark_is_newest() {
        let all = listing(&["P3", "P2", "P1"]);
        let result = diff_listing(&all, Some("P3"));

        assert!(result.new_postings.is_empty());
        assert!(!result.fallback_used);
        assert_eq!(result.newest(), None);
    }

    #[test]
    fn test_watermark_never_included() {
        let all = listing(&["P3", "P2", "P1"]);
        for mark in ["P3", "P2", "P1"] {
            let result = diff_listing(&all, Some(mark));
            assert!(!result.new_postings.iter().any(|p| p == mark));
            assert!(!result.fallback_used);
        }
    }

    #[test]
    fn test_watermark_oldest_returns_all_newer() {
        let all = listing(&["P3", "P2", "P1"]);
        let result = diff_listing(&all, Some("P1"));
        assert_eq!(result.new_postings, vec!["P2", "P3"]);
    }

    #[test]
    fn test_stale_watermark_falls_back_to_newest() {
        let all = listing(&["P9", "P8", "P7"]);
        let result = diff_listing(&all, Some("P1"));

        assert_eq!(result.new_postings, vec!["P9"]);
        assert!(result.fallback_used);
    }

    #[test]
    fn test_absent_watermark_falls_back_to_newest() {
        let all = listing(&["P9", "P8"]);
        let result = diff_listing(&all, None);

        assert_eq!(result.new_postings, vec!["P9"]);
        assert!(result.fallback_used);
    }

    #[test]
    fn test_empty_listing() {
        assert_eq!(diff_listing(&[], Some("P1")), ListingDiff::default());
        assert_eq!(diff_listing(&[], None), ListingDiff::default());
    }

    #[test]
    fn test_duplicate_links_use_first_position() {
        let all = listing(&["P3", "P2", "P3", "P1"]);
        let result = diff_listing(&all, Some("P3"));
        assert!(result.new_postings.is_empty());
    }
}
