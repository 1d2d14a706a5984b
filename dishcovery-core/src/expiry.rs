//! Expiry classification for inventory items.
//!
//! The same classification drives the inventory view (status + label per
//! item) and the recipe suggestion flow (partitioning into expired /
//! expiring-soon / fresh at request time).

use chrono::NaiveDate;

/// Items expiring within this many days of today count as "expiring soon".
/// The window is inclusive on both ends: an item expiring today or exactly
/// seven days out is ExpiringSoon.
pub const EXPIRING_SOON_WINDOW_DAYS: i64 = 7;

/// Where an expiry date falls relative to a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryStatus {
    /// The date string could not be parsed. Only produced by
    /// [`classify_raw`]; classification itself never fails.
    Invalid,
    Expired,
    ExpiringSoon { days_remaining: i64 },
    Fresh,
}

impl ExpiryStatus {
    /// Machine-readable tag, used by the inventory list filter.
    pub fn tag(&self) -> &'static str {
        match self {
            ExpiryStatus::Invalid => "invalid",
            ExpiryStatus::Expired => "expired",
            ExpiryStatus::ExpiringSoon { .. } => "expiring_soon",
            ExpiryStatus::Fresh => "fresh",
        }
    }
}

/// Classify an expiry date against a reference "today".
pub fn classify(expiry: NaiveDate, today: NaiveDate) -> ExpiryStatus {
    if expiry < today {
        return ExpiryStatus::Expired;
    }
    let days_remaining = (expiry - today).num_days();
    if days_remaining <= EXPIRING_SOON_WINDOW_DAYS {
        ExpiryStatus::ExpiringSoon { days_remaining }
    } else {
        ExpiryStatus::Fresh
    }
}

/// Classify a raw date string (ISO `YYYY-MM-DD`). Unparseable input yields
/// [`ExpiryStatus::Invalid`] rather than an error.
pub fn classify_raw(raw: &str, today: NaiveDate) -> ExpiryStatus {
    match parse_expiry_date(raw) {
        Some(date) => classify(date, today),
        None => ExpiryStatus::Invalid,
    }
}

/// Parse an ISO `YYYY-MM-DD` expiry date.
pub fn parse_expiry_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Human-readable label for an item's expiry: "Expired", "Expires in N
/// days", or the formatted date for items that are comfortably fresh.
pub fn expiry_label(expiry: NaiveDate, today: NaiveDate) -> String {
    match classify(expiry, today) {
        ExpiryStatus::Invalid => "Invalid date".to_string(),
        ExpiryStatus::Expired => "Expired".to_string(),
        ExpiryStatus::ExpiringSoon { days_remaining } => {
            format!("Expires in {} days", days_remaining)
        }
        ExpiryStatus::Fresh => expiry.format("%b %d, %Y").to_string(),
    }
}

/// Label for a raw date string; unparseable input labels as "Invalid date".
pub fn expiry_label_raw(raw: &str, today: NaiveDate) -> String {
    match parse_expiry_date(raw) {
        Some(date) => expiry_label(date, today),
        None => "Invalid date".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn test_expired_before_today() {
        let yesterday = today().pred_opt().unwrap();
        assert_eq!(classify(yesterday, today()), ExpiryStatus::Expired);
    }

    #[test]
    fn test_today_is_expiring_soon() {
        assert_eq!(
            classify(today(), today()),
            ExpiryStatus::ExpiringSoon { days_remaining: 0 }
        );
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let day_seven = today().checked_add_days(Days::new(7)).unwrap();
        assert_eq!(
            classify(day_seven, today()),
            ExpiryStatus::ExpiringSoon { days_remaining: 7 }
        );

        let day_eight = today().checked_add_days(Days::new(8)).unwrap();
        assert_eq!(classify(day_eight, today()), ExpiryStatus::Fresh);
    }

    #[test]
    fn test_classify_raw_valid() {
        assert_eq!(classify_raw("2025-03-09", today()), ExpiryStatus::Expired);
        assert_eq!(
            classify_raw("2025-03-13", today()),
            ExpiryStatus::ExpiringSoon { days_remaining: 3 }
        );
        assert_eq!(classify_raw("2025-04-01", today()), ExpiryStatus::Fresh);
    }

    #[test]
    fn test_classify_raw_invalid_never_panics() {
        for raw in ["", "not-a-date", "2025-13-40", "03/10/2025", "tomorrow"] {
            assert_eq!(classify_raw(raw, today()), ExpiryStatus::Invalid, "input: {:?}", raw);
        }
    }

    #[test]
    fn test_classify_raw_trims_whitespace() {
        assert_eq!(
            classify_raw("  2025-03-10 \n", today()),
            ExpiryStatus::ExpiringSoon { days_remaining: 0 }
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(expiry_label(today().pred_opt().unwrap(), today()), "Expired");
        assert_eq!(
            expiry_label(today().checked_add_days(Days::new(3)).unwrap(), today()),
            "Expires in 3 days"
        );
        assert_eq!(
            expiry_label(NaiveDate::from_ymd_opt(2025, 4, 2).unwrap(), today()),
            "Apr 02, 2025"
        );
        assert_eq!(expiry_label_raw("garbage", today()), "Invalid date");
    }

    #[test]
    fn test_status_tags() {
        assert_eq!(ExpiryStatus::Expired.tag(), "expired");
        assert_eq!(ExpiryStatus::ExpiringSoon { days_remaining: 2 }.tag(), "expiring_soon");
        assert_eq!(ExpiryStatus::Fresh.tag(), "fresh");
        assert_eq!(ExpiryStatus::Invalid.tag(), "invalid");
    }
}
