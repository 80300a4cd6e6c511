//! Shared display formatting -- relative time, minute durations, clock time.
//!
//! Pure and stateless: every function takes all its inputs explicitly
//! (including "now"), so presentation code derives text like "45 min ago"
//! from timestamps alone, never from server-supplied strings.

use chrono::{DateTime, Local, Utc};

/// Render how long ago `ts` was, relative to `now`.
///
/// `"just now"` under a minute, then `"45 min ago"`, `"3 h ago"`,
/// `"2 d ago"`. Timestamps from the future (clock skew) render as
/// `"just now"` rather than something nonsensical.
pub fn relative_time(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - ts).num_seconds();
    if secs < 60 {
        return "just now".to_owned();
    }
    let mins = secs / 60;
    if mins < 60 {
        return format!("{mins} min ago");
    }
    let hours = mins / 60;
    if hours < 24 {
        return format!("{hours} h ago");
    }
    format!("{} d ago", hours / 24)
}

/// [`relative_time`] against the current wall clock.
pub fn relative_time_now(ts: DateTime<Utc>) -> String {
    relative_time(ts, Utc::now())
}

/// Render a minute count as `"1h 20m"`, or `"45m"` under an hour.
pub fn fmt_minutes(minutes: f64) -> String {
    let total = minutes.max(0.0).round() as i64;
    let hours = total / 60;
    let mins = total % 60;
    if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}

/// Render a timestamp as local clock time, `"14:05"`.
pub fn fmt_clock(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M").to_string()
}

/// Render a bottle volume, `"120 ml"`, or a dash when unknown.
pub fn fmt_amount_ml(amount: Option<f64>) -> String {
    match amount {
        Some(ml) => format!("{} ml", ml.round() as i64),
        None => "--".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s)
            .expect("test timestamp")
            .with_timezone(&Utc)
    }

    #[test]
    fn relative_time_buckets() {
        let now = at("2024-01-01T10:45:00Z");
        assert_eq!(relative_time(at("2024-01-01T10:44:30Z"), now), "just now");
        assert_eq!(relative_time(at("2024-01-01T10:00:00Z"), now), "45 min ago");
        assert_eq!(relative_time(at("2024-01-01T07:45:00Z"), now), "3 h ago");
        assert_eq!(relative_time(at("2023-12-30T09:00:00Z"), now), "2 d ago");
    }

    #[test]
    fn relative_time_future_is_just_now() {
        let now = at("2024-01-01T10:00:00Z");
        assert_eq!(relative_time(at("2024-01-01T10:05:00Z"), now), "just now");
    }

    #[test]
    fn minutes_formatting() {
        assert_eq!(fmt_minutes(0.0), "0m");
        assert_eq!(fmt_minutes(45.4), "45m");
        assert_eq!(fmt_minutes(80.0), "1h 20m");
        assert_eq!(fmt_minutes(540.0), "9h 0m");
        assert_eq!(fmt_minutes(-3.0), "0m");
    }

    #[test]
    fn amount_formatting() {
        assert_eq!(fmt_amount_ml(Some(120.0)), "120 ml");
        assert_eq!(fmt_amount_ml(None), "--");
    }
}
