//! Recency classification for discovered URLs

use crate::timestamp::parse_timestamp;
use chrono::{Duration, NaiveDateTime};

/// Outcome of comparing a page's publish date with the current time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecencyVerdict {
    /// Published within the window
    Fresh(NaiveDateTime),
    /// Published before the window
    Stale(NaiveDateTime),
    /// Dated in the future
    Future(NaiveDateTime),
    /// No usable publish date
    Unknown,
}

impl RecencyVerdict {
    /// Whether the URL should enter the frontier
    pub fn admits(&self) -> bool {
        matches!(self, RecencyVerdict::Fresh(_))
    }

    /// Publish date, when one was found
    pub fn published_at(&self) -> Option<NaiveDateTime> {
        match self {
            RecencyVerdict::Fresh(dt) | RecencyVerdict::Stale(dt) | RecencyVerdict::Future(dt) => {
                Some(*dt)
            }
            RecencyVerdict::Unknown => None,
        }
    }

    /// Short label for logs and CLI output
    pub fn label(&self) -> &'static str {
        match self {
            RecencyVerdict::Fresh(_) => "fresh",
            RecencyVerdict::Stale(_) => "stale",
            RecencyVerdict::Future(_) => "future",
            RecencyVerdict::Unknown => "unknown",
        }
    }
}

/// Classify a raw publish-date string against `now` and a look-back window
///
/// The window is inclusive: a page published exactly `window` ago is fresh.
/// A window reaching past the earliest representable time admits every past date.
pub fn classify_recency(raw: Option<&str>, now: NaiveDateTime, window: Duration) -> RecencyVerdict {
    let Some(dt) = raw.and_then(|r| parse_timestamp(r).ok()) else {
        return RecencyVerdict::Unknown;
    };

    let earliest = now.checked_sub_signed(window);
    if dt > now {
        RecencyVerdict::Future(dt)
    } else if earliest.map_or(true, |earliest| dt >= earliest) {
        RecencyVerdict::Fresh(dt)
    } else {
        RecencyVerdict::Stale(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    #[test]
    fn test_verdicts() {
        let now = at("2025-02-24T12:00");
        let window = Duration::days(3);

        assert_eq!(
            classify_recency(Some("2025-02-23T08:00"), now, window),
            RecencyVerdict::Fresh(at("2025-02-23T08:00"))
        );
        assert_eq!(
            classify_recency(Some("2025-02-21T12:00"), now, window),
            RecencyVerdict::Fresh(at("2025-02-21T12:00"))
        );
        assert!(matches!(
            classify_recency(Some("2025-02-21T11:59"), now, window),
            RecencyVerdict::Stale(_)
        ));
        assert!(matches!(
            classify_recency(Some("2025-02-25T00:00"), now, window),
            RecencyVerdict::Future(_)
        ));
        assert_eq!(classify_recency(Some("soon"), now, window), RecencyVerdict::Unknown);
        assert_eq!(classify_recency(None, now, window), RecencyVerdict::Unknown);
    }

    #[test]
    fn test_oversized_window_admits_every_past_date() {
        let now = at("2025-02-24T12:00");
        let window = Duration::days(200_000_000);

        assert_eq!(
            classify_recency(Some("1990-01-01T00:00"), now, window),
            RecencyVerdict::Fresh(at("1990-01-01T00:00"))
        );
        assert!(matches!(
            classify_recency(Some("2025-02-25T00:00"), now, Duration::MAX),
            RecencyVerdict::Future(_)
        ));
    }

    #[test]
    fn test_only_fresh_admits() {
        let dt = at("2025-02-24T09:30");
        assert!(RecencyVerdict::Fresh(dt).admits());
        assert!(!RecencyVerdict::Stale(dt).admits());
        assert!(!RecencyVerdict::Future(dt).admits());
        assert!(!RecencyVerdict::Unknown.admits());
        assert_eq!(RecencyVerdict::Unknown.published_at(), None);
    }
}
