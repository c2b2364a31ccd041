//! The merged Danish calendar: one date-keyed map collecting holidays,
//! observances and astronomical events, printed in ascending order.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Weekday};
use chrono_tz::Europe::Copenhagen;
use chrono_tz::Tz;

use crate::error::{Error, Result};
use crate::moon::MoonPhase;
use crate::sun::Observer;
use crate::{ephem, holidays, moon, observances, seasons, sun};

/// A calendar entry key: a whole day, or a zoned instant. Ordered by
/// date, all-day entries before timed entries of the same date.
#[derive(Debug, Clone)]
pub enum Moment {
    AllDay(NaiveDate),
    Timed(DateTime<Tz>),
}

impl Moment {
    pub fn date(&self) -> NaiveDate {
        match self {
            Moment::AllDay(date) => *date,
            Moment::Timed(instant) => instant.date_naive(),
        }
    }

    fn time(&self) -> Option<NaiveTime> {
        match self {
            Moment::AllDay(_) => None,
            Moment::Timed(instant) => Some(instant.time()),
        }
    }
}

impl Ord for Moment {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date()
            .cmp(&other.date())
            .then_with(|| self.time().cmp(&other.time()))
    }
}

impl PartialOrd for Moment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Moment {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Moment {}

#[derive(Debug, Clone)]
pub struct CalendarOptions {
    pub moon: bool,
    pub sun: bool,
    pub daily_sun: bool,
    pub weeks: bool,
}

impl Default for CalendarOptions {
    fn default() -> Self {
        CalendarOptions {
            moon: true,
            sun: true,
            daily_sun: false,
            weeks: false,
        }
    }
}

/// The merged calendar. Later inserts overwrite earlier ones for the same
/// exact moment, dictionary style, so on June 5 "Grundlovsdag" wins over
/// "Fars dag".
#[derive(Debug, Default)]
pub struct DenmarkCalendar {
    entries: BTreeMap<Moment, String>,
}

pub fn validate_year(year: i32) -> Result<()> {
    if (1..=9999).contains(&year) {
        Ok(())
    } else {
        Err(Error::YearOutOfRange(year))
    }
}

/// Parse a year specification: a single year, an inclusive range
/// ("2024-2026"), a comma-separated list, or a mix of the two.
pub fn parse_year_spec(spec: &str) -> Result<Vec<i32>> {
    let invalid = || Error::YearSpec(spec.to_string());
    let mut years = Vec::new();
    for token in spec.split(',') {
        let token = token.trim();
        if let Some((start, end)) = token.split_once('-') {
            let start: i32 = start.trim().parse().map_err(|_| invalid())?;
            let end: i32 = end.trim().parse().map_err(|_| invalid())?;
            if start > end {
                return Err(invalid());
            }
            validate_year(start)?;
            validate_year(end)?;
            years.extend(start..=end);
        } else {
            let year: i32 = token.parse().map_err(|_| invalid())?;
            validate_year(year)?;
            years.push(year);
        }
    }
    Ok(years)
}

impl DenmarkCalendar {
    pub fn for_year(year: i32, observer: &Observer, options: &CalendarOptions) -> Result<Self> {
        validate_year(year)?;
        let mut calendar = DenmarkCalendar::default();

        // Background entries go in first; anything more notable landing on
        // the same day overwrites them, dictionary style.
        if options.sun {
            for (date, rise, set) in sun::sun_times(year, observer, options.daily_sun) {
                let rise = rise.with_timezone(&Copenhagen).format("%H:%M");
                let set = set.with_timezone(&Copenhagen).format("%H:%M");
                let label = if options.weeks && date.weekday() == Weekday::Mon {
                    format!(
                        "Uge {}, solen står op {rise}, går ned {set}",
                        date.iso_week().week()
                    )
                } else {
                    format!("Solen står op {rise}, går ned {set}")
                };
                calendar.insert(Moment::AllDay(date), label);
            }
        } else if options.weeks {
            for date in ephem::days_of_year(year).filter(|d| d.weekday() == Weekday::Mon) {
                calendar.insert(Moment::AllDay(date), format!("Uge {}", date.iso_week().week()));
            }
        }

        for (date, name) in holidays::statutory_holidays(year) {
            calendar.insert(Moment::AllDay(date), name);
        }
        for (date, name) in observances::observances(year) {
            calendar.insert(Moment::AllDay(date), name);
        }
        for (date, name) in observances::dst_transitions(year) {
            calendar.insert(Moment::AllDay(date), name);
        }
        for (instant, name) in seasons::seasons_of_year(year) {
            calendar.insert(Moment::Timed(instant.with_timezone(&Copenhagen)), name);
        }
        for (date, edge) in sun::bright_night_edges(year, observer) {
            calendar.insert(Moment::AllDay(date), edge.danish_name());
        }
        if options.moon {
            let phases = moon::phases_in_year(year);
            tracing::debug!(year, phases = phases.len(), "moon phases computed");
            for (instant, phase) in phases {
                calendar.insert(
                    Moment::Timed(instant.with_timezone(&Copenhagen)),
                    phase.danish_name(),
                );
            }
        }

        tracing::debug!(year, entries = calendar.len(), "calendar year generated");
        Ok(calendar)
    }

    /// Concatenation of per-year calendars; the years do not overlap, so
    /// this equals generating each year alone.
    pub fn for_years(years: &[i32], observer: &Observer, options: &CalendarOptions) -> Result<Self> {
        let mut merged = DenmarkCalendar::default();
        for &year in years {
            let calendar = DenmarkCalendar::for_year(year, observer, options)?;
            merged.entries.extend(calendar.entries);
        }
        Ok(merged)
    }

    fn insert(&mut self, moment: Moment, label: impl Into<String>) {
        self.entries.insert(moment, label.into());
    }

    pub fn entries(&self) -> impl Iterator<Item = (&Moment, &str)> {
        self.entries.iter().map(|(moment, label)| (moment, label.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Printable lines, ascending. Timed entries show their clock time
    /// only when `show_times` is set; `symbols` puts a glyph in front of
    /// the moon phases.
    pub fn lines(&self, show_times: bool, symbols: bool) -> Vec<String> {
        self.entries
            .iter()
            .map(|(moment, label)| {
                let label = if symbols { decorate(label) } else { label.clone() };
                match moment {
                    Moment::AllDay(date) => format!("{} {label}", date.format("%Y-%m-%d")),
                    Moment::Timed(instant) if show_times => {
                        format!("{} {label}", instant.format("%Y-%m-%d %H:%M"))
                    }
                    Moment::Timed(instant) => {
                        format!("{} {label}", instant.format("%Y-%m-%d"))
                    }
                }
            })
            .collect()
    }
}

fn decorate(label: &str) -> String {
    for phase in MoonPhase::ALL {
        if label == phase.danish_name() {
            return format!("{} {label}", phase.symbol());
        }
    }
    label.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn calendar_2026() -> DenmarkCalendar {
        DenmarkCalendar::for_year(2026, &Observer::COPENHAGEN, &CalendarOptions::default())
            .unwrap()
    }

    #[test]
    fn rejects_out_of_range_years() {
        let options = CalendarOptions::default();
        assert!(matches!(
            DenmarkCalendar::for_year(0, &Observer::COPENHAGEN, &options),
            Err(Error::YearOutOfRange(0))
        ));
        assert!(matches!(
            DenmarkCalendar::for_year(10_000, &Observer::COPENHAGEN, &options),
            Err(Error::YearOutOfRange(10_000))
        ));
    }

    #[test]
    fn parse_single_year_and_list() {
        assert_eq!(parse_year_spec("2026").unwrap(), vec![2026]);
        assert_eq!(parse_year_spec("2019, 2021").unwrap(), vec![2019, 2021]);
        assert_eq!(
            parse_year_spec("2024-2026").unwrap(),
            vec![2024, 2025, 2026]
        );
        assert_eq!(
            parse_year_spec("2019,2024-2025").unwrap(),
            vec![2019, 2024, 2025]
        );
    }

    #[test]
    fn parse_rejects_garbage_and_bad_ranges() {
        assert!(parse_year_spec("").is_err());
        assert!(parse_year_spec("abc").is_err());
        assert!(parse_year_spec("2026-2024").is_err());
        assert!(matches!(
            parse_year_spec("2024-10000"),
            Err(Error::YearOutOfRange(10_000))
        ));
    }

    #[test]
    fn grundlovsdag_overwrites_fars_dag() {
        let calendar = calendar_2026();
        let june_5: Vec<&str> = calendar
            .entries()
            .filter(|(moment, _)| moment.date() == date(2026, 6, 5))
            .map(|(_, label)| label)
            .collect();
        assert_eq!(june_5, vec!["Grundlovsdag"]);
    }

    #[test]
    fn lines_are_strictly_ascending() {
        let calendar = calendar_2026();
        let moments: Vec<&Moment> = calendar.entries().map(|(moment, _)| moment).collect();
        for pair in moments.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        let lines = calendar.lines(false, false);
        for pair in lines.windows(2) {
            let (a, b) = (&pair[0][..10], &pair[1][..10]);
            assert!(a <= b, "{a} then {b}");
        }
    }

    #[test]
    fn range_generation_equals_concatenation() {
        let options = CalendarOptions::default();
        let observer = Observer::COPENHAGEN;
        let merged = DenmarkCalendar::for_years(&[2024, 2025], &observer, &options).unwrap();
        let a = DenmarkCalendar::for_year(2024, &observer, &options).unwrap();
        let b = DenmarkCalendar::for_year(2025, &observer, &options).unwrap();
        assert_eq!(merged.len(), a.len() + b.len());
        let merged_lines = merged.lines(true, false);
        let mut expected = a.lines(true, false);
        expected.extend(b.lines(true, false));
        assert_eq!(merged_lines, expected);
    }

    #[test]
    fn all_day_sorts_before_timed_on_same_date() {
        let timed = Moment::Timed(
            Copenhagen
                .with_ymd_and_hms(2026, 4, 5, 0, 0, 0)
                .unwrap(),
        );
        let all_day = Moment::AllDay(date(2026, 4, 5));
        assert!(all_day < timed);
        assert!(Moment::AllDay(date(2026, 4, 4)) < all_day);
    }

    #[test]
    fn moon_toggle_removes_phase_entries() {
        let observer = Observer::COPENHAGEN;
        let without = DenmarkCalendar::for_year(
            2026,
            &observer,
            &CalendarOptions {
                moon: false,
                ..CalendarOptions::default()
            },
        )
        .unwrap();
        assert!(without.entries().all(|(_, label)| label != "Fuldmåne"));
        let with = calendar_2026();
        assert!(with.len() > without.len() + 40);
    }

    #[test]
    fn week_numbers_without_sun_times() {
        let calendar = DenmarkCalendar::for_year(
            2026,
            &Observer::COPENHAGEN,
            &CalendarOptions {
                sun: false,
                weeks: true,
                ..CalendarOptions::default()
            },
        )
        .unwrap();
        let first_monday = calendar
            .entries()
            .find(|(moment, _)| moment.date() == date(2026, 1, 5))
            .map(|(_, label)| label.to_string())
            .unwrap();
        assert_eq!(first_monday, "Uge 2");
    }

    #[test]
    fn week_numbers_fold_into_sun_times() {
        let calendar = DenmarkCalendar::for_year(
            2026,
            &Observer::COPENHAGEN,
            &CalendarOptions {
                weeks: true,
                ..CalendarOptions::default()
            },
        )
        .unwrap();
        let first_monday = calendar
            .entries()
            .find(|(moment, _)| moment.date() == date(2026, 1, 5))
            .map(|(_, label)| label.to_string())
            .unwrap();
        assert!(first_monday.starts_with("Uge 2, solen står op"), "{first_monday}");
    }

    #[test]
    fn symbols_decorate_moon_phases_only() {
        assert_eq!(decorate("Fuldmåne"), "🌕 Fuldmåne");
        assert_eq!(decorate("Juledag"), "Juledag");
    }

    #[test]
    fn times_shown_only_on_request() {
        let calendar = calendar_2026();
        let plain = calendar.lines(false, false);
        assert!(plain.iter().all(|line| line.as_bytes()[10] == b' '
            && !line[11..12].chars().all(|c| c.is_ascii_digit())));
        let timed = calendar.lines(true, false);
        assert!(timed.iter().any(|line| line.contains("Fuldmåne") && line.len() > 16
            && line.as_bytes()[13] == b':'));
    }

    #[test]
    fn extreme_years_generate_without_panicking() {
        let options = CalendarOptions::default();
        for year in [1, 9999] {
            let calendar =
                DenmarkCalendar::for_year(year, &Observer::COPENHAGEN, &options).unwrap();
            assert!(!calendar.is_empty());
        }
    }
}
