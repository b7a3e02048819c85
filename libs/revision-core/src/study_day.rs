//! Calendar date a review counts towards.

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};

/// Study day for `now` given the hour (0-23, UTC) when a new day begins.
///
/// Before the reset hour the study day is still yesterday, so late-night
/// sessions count towards the day they started on.
pub fn study_day(now: DateTime<Utc>, daily_reset_hour: u32) -> NaiveDate {
    if now.hour() < daily_reset_hour {
        (now - Duration::days(1)).date_naive()
    } else {
        now.date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 2, hour, 30, 0).unwrap()
    }

    #[test]
    fn midnight_reset_uses_calendar_date() {
        assert_eq!(study_day(at(0), 0), NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        assert_eq!(study_day(at(23), 0), NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
    }

    #[test]
    fn before_reset_hour_counts_as_previous_day() {
        assert_eq!(study_day(at(3), 4), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(study_day(at(4), 4), NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
    }
}
