use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::path::PathBuf;

const CONFIG_DIR_NAME: &str = "waterspy";
const CONFIG_FILE_NAME: &str = "config.json";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Parses an API timestamp as UTC.
///
/// Accepts RFC 3339 (any offset, converted to UTC), naive datetimes with a `T` or a
/// space separator (taken as UTC), and bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // "2020-01-01 00:00:00+00:00" is common in pandas exports.
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Rounds a timestamp to the nearest midnight UTC.
///
/// Exact noon is resolved half-to-even on the day number since the epoch, so
/// `1970-01-01T12:00` stays on day 0 and `1970-01-02T12:00` moves to day 2.
pub fn round_to_day(ts: DateTime<Utc>) -> DateTime<Utc> {
    const DAY_MS: i64 = 86_400_000;
    let millis = ts.timestamp_millis();
    let days = millis.div_euclid(DAY_MS);
    let remainder = millis.rem_euclid(DAY_MS);
    let half = DAY_MS / 2;

    let rounded = if remainder > half || (remainder == half && days.rem_euclid(2) == 1) {
        days + 1
    } else {
        days
    };

    DateTime::<Utc>::UNIX_EPOCH + Duration::days(rounded)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = utc(2020, 1, 1, 6, 30);
        assert_eq!(parse_timestamp("2020-01-01T06:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2020-01-01T08:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2020-01-01 06:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2020-01-01T06:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2020-01-01 06:30:00+00:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2020-01-01"),
            Some(utc(2020, 1, 1, 0, 0))
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_round_to_day() {
        assert_eq!(round_to_day(utc(2023, 5, 4, 9, 15)), utc(2023, 5, 4, 0, 0));
        assert_eq!(round_to_day(utc(2023, 5, 4, 13, 0)), utc(2023, 5, 5, 0, 0));
        assert_eq!(round_to_day(utc(2023, 5, 4, 0, 0)), utc(2023, 5, 4, 0, 0));
    }

    #[test]
    fn test_round_to_day_noon_is_half_to_even() {
        assert_eq!(round_to_day(utc(1970, 1, 1, 12, 0)), utc(1970, 1, 1, 0, 0));
        assert_eq!(round_to_day(utc(1970, 1, 2, 12, 0)), utc(1970, 1, 3, 0, 0));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(12.3456), 12.35);
        assert_eq!(round2(-0.004), -0.0);
    }
}
