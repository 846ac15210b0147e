//! Retention window for board posts.
//!
//! Posts are kept from the start of the previous calendar week onward.
//! Weeks start on Sunday and the boundary is always midnight UTC.

use chrono::{DateTime, Datelike, Days, NaiveTime, Utc};

/// Number of whole weeks kept before the current one.
pub const WEEKS_KEPT: u64 = 1;

/// Start of the week before the week containing `now`.
///
/// A post is purged when `created_at < start_of_last_week(now)`.
pub fn start_of_last_week(now: DateTime<Utc>) -> DateTime<Utc> {
    let today = now.date_naive();
    let since_sunday = u64::from(today.weekday().num_days_from_sunday());
    let start = today
        .checked_sub_days(Days::new(since_sunday + 7 * WEEKS_KEPT))
        .unwrap_or(today);
    start.and_time(NaiveTime::MIN).and_utc()
}

/// Whether a post created at `created_at` has fallen out of the window.
pub fn is_expired(created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    created_at < start_of_last_week(now)
}
