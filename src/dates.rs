//! Deadline and elapsed-time helpers.
//!
//! Everything here is pure: the current instant is passed in, and calendar
//! dates are interpreted in the time zone of that instant.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde::Serialize;

use crate::entity::Project;

const MS_PER_SECOND: i64 = 1000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Time left until (or past) a deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemainingTime {
    pub is_overdue: bool,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
}

/// Resolve a wall-clock time in `tz`. Falls back to reading the wall clock as
/// UTC when the local time does not exist (DST gap).
fn local_instant<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    tz.from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default())
}

/// Remaining time until the end of `end_date` (23:59:59.999 local).
///
/// Once the deadline has passed the result is overdue with at least one day,
/// even when only seconds late; hours and minutes are zero in that case.
pub fn remaining_time<Tz: TimeZone>(end_date: NaiveDate, now: &DateTime<Tz>) -> RemainingTime {
    let end_of_day = midnight(end_date) + Duration::milliseconds(MS_PER_DAY - 1);
    let deadline = local_instant(&now.timezone(), end_of_day);
    let diff = deadline.timestamp_millis() - now.timestamp_millis();

    if diff < 0 {
        let days = diff.abs() / MS_PER_DAY;
        return RemainingTime {
            is_overdue: true,
            days: days.max(1),
            hours: 0,
            minutes: 0,
        };
    }

    RemainingTime {
        is_overdue: false,
        days: diff / MS_PER_DAY,
        hours: (diff / MS_PER_HOUR) % 24,
        minutes: (diff / MS_PER_MINUTE) % 60,
    }
}

/// Whole days until midnight at the start of `end_date`, rounded up.
/// Negative means overdue. Used by the overdue filter only.
///
/// Midnight is read in the zone of `now`, not as UTC midnight, so west of UTC
/// a date turns overdue up to a day later than a UTC reading would give.
pub fn remaining_days<Tz: TimeZone>(end_date: NaiveDate, now: &DateTime<Tz>) -> i64 {
    let start = local_instant(&now.timezone(), midnight(end_date));
    let diff = start.timestamp_millis() - now.timestamp_millis();
    (diff as f64 / MS_PER_DAY as f64).ceil() as i64
}

/// Coarse "time ago" label: `Just now`, `5m ago`, `3h ago`, `2d ago`,
/// `4mo ago`, `1y ago`. Months are 30 days, years 12 such months.
pub fn relative_time<Tz1: TimeZone, Tz2: TimeZone>(
    timestamp: &DateTime<Tz1>,
    now: &DateTime<Tz2>,
) -> String {
    let seconds = (now.timestamp_millis() - timestamp.timestamp_millis()).div_euclid(MS_PER_SECOND);

    if seconds < 60 {
        return "Just now".to_string();
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h ago", hours);
    }
    let days = hours / 24;
    if days < 30 {
        return format!("{}d ago", days);
    }
    let months = days / 30;
    if months < 12 {
        return format!("{}mo ago", months);
    }
    format!("{}y ago", months / 12)
}

/// Days a delivered project went past the start of its end date, rounded up.
/// `None` when the project is not delivered or was delivered in time.
pub fn delivery_overdue_days<Tz: TimeZone>(project: &Project, tz: &Tz) -> Option<i64> {
    if !project.is_delivered() {
        return None;
    }
    let delivered_at = project.delivered_at?;
    let end = local_instant(tz, midnight(project.end_date));
    let diff = delivered_at.timestamp_millis() - end.timestamp_millis();
    if diff <= 0 {
        return None;
    }
    Some((diff as f64 / MS_PER_DAY as f64).ceil() as i64)
}

/// Parse a price field. Blank, malformed, non-finite and negative input all
/// become 0.
pub fn parse_price(input: &str) -> f64 {
    match input.trim().parse::<f64>() {
        Ok(price) if price.is_finite() && price > 0.0 => price,
        _ => 0.0,
    }
}
