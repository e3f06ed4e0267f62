//! The Monday–Sunday week preceding the current week.

use chrono::{Datelike as _, Days, NaiveDate};

/// Date range for a statistics query: the prior completed calendar week.
///
/// `start` is always a Monday and `end` the following Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Computes the window for the week before the one containing `today`.
    #[must_use]
    pub fn prior_week(today: NaiveDate) -> Self {
        let since_monday = u64::from(today.weekday().num_days_from_monday());
        let start = today - Days::new(since_monday + 7);
        let end = start + Days::new(6);
        Self { start, end }
    }

    /// Formats both ends with `format` (a `chrono` strftime pattern).
    #[must_use]
    pub fn format(&self, format: &str) -> (String, String) {
        (
            self.start.format(format).to_string(),
            self.end.format(format).to_string(),
        )
    }
}

impl std::fmt::Display for DateWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
