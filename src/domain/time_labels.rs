//! Human-readable labels for message and roster timestamps.

use chrono::{DateTime, Datelike, Local, Utc};

const SECONDS_PER_YEAR: i64 = 31_536_000;
const SECONDS_PER_MONTH: i64 = 2_592_000;
const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_MINUTE: i64 = 60;

const RELATIVE_UNITS: [(i64, &str); 5] = [
    (SECONDS_PER_YEAR, "years"),
    (SECONDS_PER_MONTH, "months"),
    (SECONDS_PER_DAY, "days"),
    (SECONDS_PER_HOUR, "hours"),
    (SECONDS_PER_MINUTE, "minutes"),
];

/// Server zero values (`0001-01-01T00:00:00Z`) and the unix epoch mean "no message yet".
pub fn is_unset(timestamp: &DateTime<Utc>) -> bool {
    timestamp.year() <= 1 || timestamp.timestamp() <= 0
}

/// Formats `timestamp` as "N <unit> ago", picking the largest unit that fits more
/// than once. Unset timestamps produce an empty label.
pub fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if is_unset(&timestamp) {
        return String::new();
    }

    let seconds = (now - timestamp).num_seconds().max(0);

    for (unit_seconds, unit) in RELATIVE_UNITS {
        if seconds > unit_seconds {
            return format!("{} {unit} ago", seconds / unit_seconds);
        }
    }

    format!("{seconds} seconds ago")
}

/// Wall-clock label shown under a message in the thread.
pub fn format_message_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if is_unset(&timestamp) {
        return String::new();
    }

    let local = timestamp.with_timezone(&Local);
    let today = now.with_timezone(&Local).date_naive();

    if local.date_naive() == today {
        local.format("%H:%M").to_string()
    } else {
        local.format("%d %b %H:%M").to_string()
    }
}
