use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Extra day added on top of every window.
///
/// Source dates and collection time disagree by up to a day (time zones,
/// date-only `lastmod` values rounded to midnight).
pub const WINDOW_SLACK_DAYS: i64 = 1;

/// A trailing window of `days` days ending at wall-clock now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub days: i64,
}

impl DateWindow {
    pub fn new(days: i64) -> Self {
        Self { days }
    }

    /// True while `date + (days + WINDOW_SLACK_DAYS)` is still in the future.
    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        self.contains_at(date, Utc::now())
    }

    pub fn contains_at(&self, date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let span = self.days.saturating_add(WINDOW_SLACK_DAYS);
        match Duration::try_days(span).and_then(|d| date.checked_add_signed(d)) {
            Some(cutoff) => cutoff > now,
            // Cutoff lies beyond what chrono can represent
            None => span > 0,
        }
    }

    pub fn contains_timestamp(&self, timestamp: i64) -> bool {
        DateTime::from_timestamp(timestamp, 0).is_some_and(|date| self.contains(date))
    }

    /// Date-only values (sitemap `lastmod`) are taken at midnight UTC.
    pub fn contains_day(&self, day: NaiveDate) -> bool {
        self.contains(midnight_utc(day))
    }
}

/// Whether `timestamp` (seconds since epoch) falls inside a `window_days` trailing window.
pub fn in_window(timestamp: i64, window_days: i64) -> bool {
    DateWindow::new(window_days).contains_timestamp(timestamp)
}

pub fn midnight_utc(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(chrono::NaiveTime::MIN).and_utc()
}
