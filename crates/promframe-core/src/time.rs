//! Timestamp conversions for Prometheus and Loki payloads

use chrono::{DateTime, Utc};

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Convert Prometheus float seconds to a timestamp with millisecond precision
pub fn from_float_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis((seconds * 1000.0) as i64)
}

/// Convert a Loki nanosecond timestamp string.
///
/// Values below `2^63` ns (dates before 2262) parse as a single i64. For the
/// common 19-digit case only strings starting with `1` are guaranteed to fit,
/// which covers every date before 2033; longer strings are split into ten
/// digits of seconds and the remaining nanoseconds.
pub fn from_loki_nanos(text: &str) -> Option<DateTime<Utc>> {
    let len = text.len();
    if len < 19 || (len == 19 && text.starts_with('1')) {
        if let Ok(ns) = text.parse::<i64>() {
            return Some(DateTime::from_timestamp_nanos(ns));
        }
    }

    if len <= 10 || !text.is_char_boundary(10) {
        return None;
    }
    let (secs, nanos) = text.split_at(10);
    let secs = secs.parse::<i64>().ok()?;
    let nanos = nanos.parse::<u64>().ok()?;
    // overflowing nanoseconds carry into seconds
    let secs = secs.checked_add(i64::try_from(nanos / NANOS_PER_SEC).ok()?)?;
    DateTime::from_timestamp(secs, (nanos % NANOS_PER_SEC) as u32)
}

/// Nanoseconds since the epoch, saturating outside the i64 range
pub fn unix_nanos(ts: &DateTime<Utc>) -> i64 {
    ts.timestamp_nanos_opt()
        .unwrap_or_else(|| ts.timestamp_millis().saturating_mul(1_000_000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_seconds() {
        let ts = from_float_seconds(1000.0).unwrap();
        assert_eq!(ts.to_rfc3339(), "1970-01-01T00:16:40+00:00");

        let ts = from_float_seconds(1435781451.781).unwrap();
        assert_eq!(ts.timestamp_millis(), 1_435_781_451_781);
    }

    #[test]
    fn test_float_seconds_rejects_non_finite() {
        assert!(from_float_seconds(f64::NAN).is_none());
        assert!(from_float_seconds(f64::INFINITY).is_none());
    }

    #[test]
    fn test_loki_fast_path() {
        let ts = from_loki_nanos("1000000000").unwrap();
        assert_eq!(ts.to_rfc3339(), "1970-01-01T00:00:01+00:00");

        let ts = from_loki_nanos("1645030246277587968").unwrap();
        assert_eq!(ts.timestamp_nanos_opt(), Some(1_645_030_246_277_587_968));
    }

    #[test]
    fn test_loki_split_path() {
        // 19 digits not starting with 1 take the seconds/nanos split
        let ts = from_loki_nanos("2645030246277587968").unwrap();
        assert_eq!(ts.timestamp(), 2_645_030_246);
        assert_eq!(ts.timestamp_subsec_nanos(), 277_587_968);
    }

    #[test]
    fn test_loki_nanos_overflow_carries_into_seconds() {
        let ts = from_loki_nanos("16450302461999999999").unwrap();
        assert_eq!(ts.timestamp(), 1_645_030_247);
        assert_eq!(ts.timestamp_subsec_nanos(), 999_999_999);
    }

    #[test]
    fn test_loki_garbage() {
        assert!(from_loki_nanos("not-a-time").is_none());
        assert!(from_loki_nanos("").is_none());
    }

    #[test]
    fn test_unix_nanos() {
        let ts = from_float_seconds(1.5).unwrap();
        assert_eq!(unix_nanos(&ts), 1_500_000_000);
    }
}
