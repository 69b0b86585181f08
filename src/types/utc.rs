//! Conversions of the date and time types callers tend to have at hand into
//! the UTC instants the models work with.

use crate::utils::parse_timestamp;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// A value that denotes an instant, interpreted in UTC when it carries no
/// offset of its own.
pub trait IntoUtcDateTime {
    /// `None` when the value does not denote a valid instant.
    fn into_utc(self) -> Option<DateTime<Utc>>;
}

impl<Tz: TimeZone> IntoUtcDateTime for DateTime<Tz> {
    fn into_utc(self) -> Option<DateTime<Utc>> {
        Some(self.with_timezone(&Utc))
    }
}

impl IntoUtcDateTime for NaiveDateTime {
    fn into_utc(self) -> Option<DateTime<Utc>> {
        Some(self.and_utc())
    }
}

/// The start of the day.
impl IntoUtcDateTime for NaiveDate {
    fn into_utc(self) -> Option<DateTime<Utc>> {
        Some(self.and_time(NaiveTime::MIN).and_utc())
    }
}

/// Any format accepted by [`parse_timestamp`].
impl IntoUtcDateTime for &str {
    fn into_utc(self) -> Option<DateTime<Utc>> {
        parse_timestamp(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_conversions_agree() {
        let expected = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
        let date = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        let offset = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2023, 6, 1, 2, 0, 0)
            .unwrap();

        assert_eq!(date.into_utc(), Some(expected));
        assert_eq!(date.and_time(NaiveTime::MIN).into_utc(), Some(expected));
        assert_eq!(offset.into_utc(), Some(expected));
        assert_eq!("2023-06-01".into_utc(), Some(expected));
        assert_eq!("June".into_utc(), None);
    }
}
