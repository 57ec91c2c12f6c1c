//! Calendar decomposition of event timestamps.

use crate::warehouse::TimeRow;
use chrono::{DateTime, Datelike, Timelike};

/// Split epoch milliseconds (UTC) into the time dimension attributes.
///
/// Week numbers follow ISO-8601 and weekdays count from Monday = 0.
/// Returns `None` for timestamps chrono cannot represent.
pub fn decompose(start_time: i64) -> Option<TimeRow> {
    let datetime = DateTime::from_timestamp_millis(start_time)?;
    Some(TimeRow {
        start_time,
        hour: datetime.hour(),
        day: datetime.day(),
        week: datetime.iso_week().week(),
        month: datetime.month(),
        year: datetime.year(),
        weekday: datetime.weekday().num_days_from_monday(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompose_event_timestamp() {
        // 2018-11-02T01:25:34.796Z, a Friday
        let time = decompose(1541121934796).unwrap();
        assert_eq!(
            time,
            TimeRow {
                start_time: 1541121934796,
                hour: 1,
                day: 2,
                week: 44,
                month: 11,
                year: 2018,
                weekday: 4,
            }
        );
    }

    #[test]
    fn test_decompose_epoch() {
        // 1970-01-01 was a Thursday in ISO week 1
        let time = decompose(0).unwrap();
        assert_eq!(time.hour, 0);
        assert_eq!(time.day, 1);
        assert_eq!(time.week, 1);
        assert_eq!(time.month, 1);
        assert_eq!(time.year, 1970);
        assert_eq!(time.weekday, 3);
    }

    #[test]
    fn test_iso_week_wraps_to_previous_year() {
        // 2021-01-03T12:00:00Z is a Sunday in ISO week 53 of 2020
        let time = decompose(1609675200000).unwrap();
        assert_eq!(time.week, 53);
        assert_eq!(time.year, 2021);
        assert_eq!(time.weekday, 6);
        assert_eq!(time.hour, 12);
    }

    #[test]
    fn test_decompose_before_epoch() {
        // 1969-12-31T23:59:59.999Z
        let time = decompose(-1).unwrap();
        assert_eq!(time.year, 1969);
        assert_eq!(time.month, 12);
        assert_eq!(time.day, 31);
        assert_eq!(time.hour, 23);
    }

    #[test]
    fn test_decompose_out_of_range() {
        assert_eq!(decompose(i64::MAX), None);
    }
}
