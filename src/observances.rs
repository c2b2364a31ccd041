//! Danish folk observances: fixed dates, Easter-anchored days, signed
//! Nth-weekday rules and the daylight-saving transitions.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Offset, TimeZone, Weekday};
use chrono_tz::Europe::Copenhagen;

use crate::ephem;
use crate::holidays::easter_sunday;

/// Nth occurrence of a weekday in a month. Negative `n` counts backwards
/// from the end of the month (-1 is the last). Returns `None` when the
/// month has no such occurrence.
pub fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, n: i32) -> Option<NaiveDate> {
    if n == 0 {
        return None;
    }
    let date = if n > 0 {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let offset = (7 + weekday.num_days_from_monday() as i64
            - first.weekday().num_days_from_monday() as i64)
            % 7;
        first + Duration::days(offset + 7 * (i64::from(n) - 1))
    } else {
        let last = last_day_of_month(year, month)?;
        let offset = (7 + last.weekday().num_days_from_monday() as i64
            - weekday.num_days_from_monday() as i64)
            % 7;
        last - Duration::days(offset + 7 * (i64::from(-n) - 1))
    };
    (date.month() == month).then_some(date)
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next - Duration::days(1))
}

/// The extended table of Danish observances for a year, unordered.
pub fn observances(year: i32) -> Vec<(NaiveDate, &'static str)> {
    let easter = easter_sunday(year);
    let ymd = |month, day| {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
    };

    let mut days = vec![
        (ymd(2, 14), "Valentinsdag"),
        (ymd(5, 1), "Arbejdernes kampdag"),
        (ymd(6, 5), "Fars dag"),
        (ymd(6, 5), "Grundlovsdag"),
        (ymd(6, 23), "Sankthansaften"),
        (ymd(11, 10), "Mortensaften"),
        (ymd(12, 13), "Luciadag"),
        (ymd(12, 24), "Juleaftensdag"),
        (ymd(12, 31), "Nytårsaftensdag"),
        (easter - Duration::days(49), "Fastelavn"),
        (easter - Duration::days(7), "Palmesøndag"),
    ];
    if let Some(mothers_day) = nth_weekday_of_month(year, 5, Weekday::Sun, 2) {
        days.push((mothers_day, "Mors dag"));
    }
    if let Some(all_saints) = nth_weekday_of_month(year, 11, Weekday::Sun, 1) {
        days.push((all_saints, "Allehelgensdag"));
    }
    days
}

/// Daylight-saving transitions for Europe/Copenhagen, read from the tz
/// database. Years before Denmark observed summer time yield nothing.
pub fn dst_transitions(year: i32) -> Vec<(NaiveDate, &'static str)> {
    let mut transitions = Vec::new();
    let mut previous: Option<i32> = None;
    for date in ephem::days_of_year(year) {
        let offset = offset_seconds_at(date);
        match previous {
            Some(p) if offset > p => transitions.push((date, "Sommertid begynder")),
            Some(p) if offset < p => transitions.push((date, "Sommertid slutter")),
            _ => {}
        }
        previous = Some(offset);
    }
    transitions
}

/// UTC offset of Copenhagen at noon UTC on the given date. The EU
/// transitions happen at 01:00 UTC, so the noon sample already carries
/// the new offset on the transition date itself.
fn offset_seconds_at(date: NaiveDate) -> i32 {
    let noon = date.and_time(NaiveTime::from_hms_opt(12, 0, 0).expect("valid time"));
    Copenhagen
        .from_utc_datetime(&noon)
        .offset()
        .fix()
        .local_minus_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn find(year: i32, name: &str) -> NaiveDate {
        observances(year)
            .into_iter()
            .find(|(_, n)| *n == name)
            .map(|(d, _)| d)
            .unwrap()
    }

    #[test]
    fn nth_weekday_forward() {
        // May 2026: Sundays on 3, 10, 17, 24, 31
        assert_eq!(
            nth_weekday_of_month(2026, 5, Weekday::Sun, 1),
            Some(date(2026, 5, 3))
        );
        assert_eq!(
            nth_weekday_of_month(2026, 5, Weekday::Sun, 5),
            Some(date(2026, 5, 31))
        );
        assert_eq!(nth_weekday_of_month(2026, 5, Weekday::Sun, 6), None);
    }

    #[test]
    fn nth_weekday_backward() {
        assert_eq!(
            nth_weekday_of_month(2026, 10, Weekday::Sun, -1),
            Some(date(2026, 10, 25))
        );
        assert_eq!(
            nth_weekday_of_month(2026, 3, Weekday::Sun, -1),
            Some(date(2026, 3, 29))
        );
        assert_eq!(nth_weekday_of_month(2026, 2, Weekday::Sun, -5), None);
    }

    #[test]
    fn mothers_day_is_second_sunday_of_may() {
        assert_eq!(find(2026, "Mors dag"), date(2026, 5, 10));
        assert_eq!(find(2025, "Mors dag"), date(2025, 5, 11));
    }

    #[test]
    fn all_saints_is_first_sunday_of_november() {
        let day = find(2026, "Allehelgensdag");
        assert_eq!(day.weekday(), Weekday::Sun);
        assert_eq!(day.month(), 11);
        assert!(day.day() <= 7);
    }

    #[test]
    fn shrovetide_is_seven_weeks_before_easter() {
        // Easter 2026 is April 5, so Fastelavn is February 15
        assert_eq!(find(2026, "Fastelavn"), date(2026, 2, 15));
        assert_eq!(find(2026, "Palmesøndag"), date(2026, 3, 29));
    }

    #[test]
    fn dst_transitions_2026() {
        assert_eq!(
            dst_transitions(2026),
            vec![
                (date(2026, 3, 29), "Sommertid begynder"),
                (date(2026, 10, 25), "Sommertid slutter"),
            ]
        );
    }

    #[test]
    fn no_dst_before_1980_in_denmark() {
        // Denmark reintroduced summer time in 1980 (wartime years aside)
        assert!(dst_transitions(1975).is_empty());
        assert_eq!(dst_transitions(1980).len(), 2);
    }
}
