use chrono::DateTime;

use crate::error::{Error, Result};

/// Inclusive time window on the millisecond epoch, immutable once resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    /// First millisecond kept.
    pub start_millis: i64,
    /// Last millisecond kept.
    pub end_millis: i64,
}

// "Common Log Format" date, e.g. `17/Sep/2020:13:03:23 +0200`.
const ACCESS_LOG_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Window for one slow request found in an access log.
///
/// The log line carries the time the response was written and how long the
/// request took; the window covers the request's execution, padded by one
/// second on each side for clock skew between the log and the recording.
pub fn from_access_log(end_date: &str, duration_millis: &str) -> Result<TimeWindow> {
    let parsed = DateTime::parse_from_str(end_date.trim(), ACCESS_LOG_FORMAT).map_err(|source| {
        Error::Timestamp {
            input: end_date.to_owned(),
            source,
        }
    })?;
    let duration: i64 = duration_millis
        .trim()
        .parse()
        .map_err(|source| Error::Duration {
            input: duration_millis.to_owned(),
            source,
        })?;
    let end_millis = parsed.timestamp_millis() + 1_000;
    Ok(TimeWindow {
        start_millis: end_millis - 1_000 - duration,
        end_millis,
    })
}

/// Window left after trimming `warm_up` seconds from the start and
/// `cool_down` seconds from the end of the observed event range.
pub fn trimmed(min_millis: i64, max_millis: i64, warm_up: u64, cool_down: u64) -> TimeWindow {
    TimeWindow {
        start_millis: min_millis + warm_up as i64 * 1_000,
        end_millis: max_millis - cool_down as i64 * 1_000,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn derives_the_window_from_an_access_log_entry() {
        let window = from_access_log("17/Sep/2020:13:03:23 +0200", "23513").unwrap();
        // 2020-09-17T13:03:23+02:00 is 1600340603000 ms; end is padded by 1s,
        // start reaches back over the padding plus the request duration.
        assert_eq!(window.end_millis, 1_600_340_604_000);
        assert_eq!(window.start_millis, 1_600_340_604_000 - 1_000 - 23_513);
    }

    #[test]
    fn rejects_garbage_dates() {
        assert!(from_access_log("yesterday-ish", "1000").is_err());
        assert!(from_access_log("17/Sep/2020:13:03:23", "1000").is_err());
    }

    #[test]
    fn rejects_garbage_durations() {
        assert!(from_access_log("17/Sep/2020:13:03:23 +0200", "fast").is_err());
    }

    #[test]
    fn trims_warm_up_and_cool_down_seconds() {
        let window = trimmed(0, 3_000, 1, 1);
        assert_eq!(
            window,
            TimeWindow {
                start_millis: 1_000,
                end_millis: 2_000,
            }
        );
    }

    #[test]
    fn zero_trim_keeps_the_full_range() {
        let window = trimmed(500, 9_500, 0, 0);
        assert_eq!(window.start_millis, 500);
        assert_eq!(window.end_millis, 9_500);
    }
}
