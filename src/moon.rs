//! Moon phase instants.
//!
//! Meeus chapter 49: mean phase time from the lunation number k, plus
//! periodic and planetary corrections. Accurate to a couple of minutes,
//! which comfortably survives rounding to the printed minute.
//!
//! Phases are scanned from the previous September through the following
//! March so that phases straddling the year boundary are bracketed; only
//! events whose Copenhagen-local year matches the target year are kept.

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Europe::Copenhagen;

use crate::ephem;

/// Mean lunations per year.
const LUNATIONS_PER_YEAR: f64 = 12.3685;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoonPhase {
    New,
    FirstQuarter,
    Full,
    LastQuarter,
}

impl MoonPhase {
    pub const ALL: [MoonPhase; 4] = [
        MoonPhase::New,
        MoonPhase::FirstQuarter,
        MoonPhase::Full,
        MoonPhase::LastQuarter,
    ];

    pub fn danish_name(self) -> &'static str {
        match self {
            MoonPhase::New => "Nymåne",
            MoonPhase::FirstQuarter => "Første kvarter",
            MoonPhase::Full => "Fuldmåne",
            MoonPhase::LastQuarter => "Sidste kvarter",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            MoonPhase::New => "🌑",
            MoonPhase::FirstQuarter => "🌓",
            MoonPhase::Full => "🌕",
            MoonPhase::LastQuarter => "🌗",
        }
    }

    /// Offset into the lunation: k + fraction is the argument of the
    /// phase-time series.
    fn fraction(self) -> f64 {
        match self {
            MoonPhase::New => 0.0,
            MoonPhase::FirstQuarter => 0.25,
            MoonPhase::Full => 0.5,
            MoonPhase::LastQuarter => 0.75,
        }
    }
}

/// Approximate lunation number for a fractional year (k = 0 is the new
/// moon of 2000 January 6).
fn approximate_k(year_fraction: f64) -> f64 {
    (year_fraction - 2000.0) * LUNATIONS_PER_YEAR
}

/// All moon phases whose Copenhagen-local date falls in `year`, ascending.
pub fn phases_in_year(year: i32) -> Vec<(DateTime<Utc>, MoonPhase)> {
    let k_start = approximate_k(f64::from(year) - 1.0 + 8.0 / 12.0).floor();
    let k_end = approximate_k(f64::from(year) + 1.0 + 2.0 / 12.0).ceil();

    let mut phases = Vec::new();
    let mut k = k_start;
    while k <= k_end {
        for phase in MoonPhase::ALL {
            let instant = phase_instant(k, phase);
            if instant.with_timezone(&Copenhagen).year() == year {
                phases.push((instant, phase));
            }
        }
        k += 1.0;
    }
    phases.sort_by_key(|(instant, _)| *instant);
    phases
}

/// Instant of the given phase of lunation `k` (an integer-valued f64),
/// on the UTC timescale.
fn phase_instant(k: f64, phase: MoonPhase) -> DateTime<Utc> {
    let k = k + phase.fraction();
    let t = k / 1236.85;
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    let mut jde = 2_451_550.097_66 + 29.530_588_861 * k + 0.000_154_37 * t2
        - 0.000_000_150 * t3
        + 0.000_000_000_73 * t4;

    // Eccentricity damping factor and the four fundamental arguments
    let e = 1.0 - 0.002_516 * t - 0.000_007_4 * t2;
    let m = (2.5534 + 29.105_356_70 * k - 0.000_001_4 * t2 - 0.000_000_11 * t3).to_radians();
    let mp = (201.5643 + 385.816_935_28 * k + 0.010_758_2 * t2 + 0.000_012_38 * t3
        - 0.000_000_058 * t4)
        .to_radians();
    let f = (160.7108 + 390.670_502_84 * k - 0.001_611_8 * t2 - 0.000_002_27 * t3
        + 0.000_000_011 * t4)
        .to_radians();
    let omega = (124.7746 - 1.563_755_88 * k + 0.002_067_2 * t2 + 0.000_002_15 * t3).to_radians();

    jde += match phase {
        MoonPhase::New => new_moon_corrections(e, m, mp, f, omega),
        MoonPhase::Full => full_moon_corrections(e, m, mp, f, omega),
        MoonPhase::FirstQuarter => {
            quarter_corrections(e, m, mp, f, omega) + quarter_w(e, m, mp, f)
        }
        MoonPhase::LastQuarter => {
            quarter_corrections(e, m, mp, f, omega) - quarter_w(e, m, mp, f)
        }
    };
    jde += planetary_corrections(k, t2);

    // The series yields TT; pull back to UTC
    let year = 2000.0 + k / LUNATIONS_PER_YEAR;
    let delta_t = ephem::delta_t_seconds(year.floor() as i32);
    ephem::datetime_from_jd(jde - delta_t / 86_400.0)
}

fn new_moon_corrections(e: f64, m: f64, mp: f64, f: f64, omega: f64) -> f64 {
    -0.40720 * mp.sin() + 0.17241 * e * m.sin() + 0.01608 * (2.0 * mp).sin()
        + 0.01039 * (2.0 * f).sin()
        + 0.00739 * e * (mp - m).sin()
        - 0.00514 * e * (mp + m).sin()
        + 0.00208 * e * e * (2.0 * m).sin()
        - 0.00111 * (mp - 2.0 * f).sin()
        - 0.00057 * (mp + 2.0 * f).sin()
        + 0.00056 * e * (2.0 * mp + m).sin()
        - 0.00042 * (3.0 * mp).sin()
        + 0.00042 * e * (m + 2.0 * f).sin()
        + 0.00038 * e * (m - 2.0 * f).sin()
        - 0.00024 * e * (2.0 * mp - m).sin()
        - 0.00017 * omega.sin()
        - 0.00007 * (mp + 2.0 * m).sin()
        + 0.00004 * (2.0 * mp - 2.0 * f).sin()
        + 0.00004 * (3.0 * m).sin()
        + 0.00003 * (mp + m - 2.0 * f).sin()
        + 0.00003 * (2.0 * mp + 2.0 * f).sin()
        - 0.00003 * (mp + m + 2.0 * f).sin()
        + 0.00003 * (mp - m + 2.0 * f).sin()
        - 0.00002 * (mp - m - 2.0 * f).sin()
        - 0.00002 * (3.0 * mp + m).sin()
        + 0.00002 * (4.0 * mp).sin()
}

fn full_moon_corrections(e: f64, m: f64, mp: f64, f: f64, omega: f64) -> f64 {
    -0.40614 * mp.sin() + 0.17302 * e * m.sin() + 0.01614 * (2.0 * mp).sin()
        + 0.01043 * (2.0 * f).sin()
        + 0.00734 * e * (mp - m).sin()
        - 0.00515 * e * (mp + m).sin()
        + 0.00209 * e * e * (2.0 * m).sin()
        - 0.00111 * (mp - 2.0 * f).sin()
        - 0.00057 * (mp + 2.0 * f).sin()
        + 0.00056 * e * (2.0 * mp + m).sin()
        - 0.00042 * (3.0 * mp).sin()
        + 0.00042 * e * (m + 2.0 * f).sin()
        + 0.00038 * e * (m - 2.0 * f).sin()
        - 0.00024 * e * (2.0 * mp - m).sin()
        - 0.00017 * omega.sin()
        - 0.00007 * (mp + 2.0 * m).sin()
        + 0.00004 * (2.0 * mp - 2.0 * f).sin()
        + 0.00004 * (3.0 * m).sin()
        + 0.00003 * (mp + m - 2.0 * f).sin()
        + 0.00003 * (2.0 * mp + 2.0 * f).sin()
        - 0.00003 * (mp + m + 2.0 * f).sin()
        + 0.00003 * (mp - m + 2.0 * f).sin()
        - 0.00002 * (mp - m - 2.0 * f).sin()
        - 0.00002 * (3.0 * mp + m).sin()
        + 0.00002 * (4.0 * mp).sin()
}

fn quarter_corrections(e: f64, m: f64, mp: f64, f: f64, omega: f64) -> f64 {
    -0.62801 * mp.sin() + 0.17172 * e * m.sin() - 0.01183 * e * (mp + m).sin()
        + 0.00862 * (2.0 * mp).sin()
        + 0.00804 * (2.0 * f).sin()
        + 0.00454 * e * (mp - m).sin()
        + 0.00204 * e * e * (2.0 * m).sin()
        - 0.00180 * (mp - 2.0 * f).sin()
        - 0.00070 * (mp + 2.0 * f).sin()
        - 0.00040 * (3.0 * mp).sin()
        - 0.00034 * e * (2.0 * mp - m).sin()
        + 0.00032 * e * (m + 2.0 * f).sin()
        + 0.00032 * e * (m - 2.0 * f).sin()
        - 0.00028 * e * e * (mp + 2.0 * m).sin()
        + 0.00027 * e * (2.0 * mp + m).sin()
        - 0.00017 * omega.sin()
        - 0.00005 * (mp - m - 2.0 * f).sin()
        + 0.00004 * (2.0 * mp + 2.0 * f).sin()
        - 0.00004 * (mp + m + 2.0 * f).sin()
        + 0.00004 * (mp - 2.0 * m).sin()
        + 0.00003 * (mp + m - 2.0 * f).sin()
        + 0.00003 * (3.0 * m).sin()
        + 0.00002 * (2.0 * mp - 2.0 * f).sin()
        + 0.00002 * (mp - m + 2.0 * f).sin()
        - 0.00002 * (3.0 * mp + m).sin()
}

/// Quarter-phase asymmetry term, added for the first quarter and
/// subtracted for the last.
fn quarter_w(e: f64, m: f64, mp: f64, f: f64) -> f64 {
    0.00306 - 0.00038 * e * m.cos() + 0.00026 * mp.cos() - 0.00002 * (mp - m).cos()
        + 0.00002 * (mp + m).cos()
        + 0.00002 * (2.0 * f).cos()
}

/// The fourteen small planetary perturbation terms.
fn planetary_corrections(k: f64, t2: f64) -> f64 {
    let a = [
        (0.000_325, 299.77 + 0.107_408 * k - 0.009_173 * t2),
        (0.000_165, 251.88 + 0.016_321 * k),
        (0.000_164, 251.83 + 26.651_886 * k),
        (0.000_126, 349.42 + 36.412_478 * k),
        (0.000_110, 84.66 + 18.206_239 * k),
        (0.000_062, 141.74 + 53.303_771 * k),
        (0.000_060, 207.14 + 2.453_732 * k),
        (0.000_056, 154.84 + 7.306_860 * k),
        (0.000_047, 34.52 + 27.261_239 * k),
        (0.000_042, 207.19 + 0.121_824 * k),
        (0.000_040, 291.34 + 1.844_379 * k),
        (0.000_037, 161.72 + 24.198_154 * k),
        (0.000_035, 239.56 + 25.513_099 * k),
        (0.000_023, 331.55 + 3.592_518 * k),
    ];
    a.iter()
        .map(|(coefficient, argument)| coefficient * argument.to_radians().sin())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn meeus_example_new_moon_1977() {
        // Meeus example 49.a: new moon of 1977 February 18, 03:37 TD
        let instant = phase_instant(-283.0, MoonPhase::New);
        assert_eq!(
            instant.date_naive(),
            NaiveDate::from_ymd_opt(1977, 2, 18).unwrap()
        );
        assert_eq!(instant.hour(), 3);
    }

    #[test]
    fn meeus_example_last_quarter_2044() {
        // Meeus example 49.b: last quarter of 2044 January 21, 23:48 TD
        let instant = phase_instant(544.0, MoonPhase::LastQuarter);
        assert_eq!(
            instant.date_naive(),
            NaiveDate::from_ymd_opt(2044, 1, 21).unwrap()
        );
        assert_eq!(instant.hour(), 23);
    }

    #[test]
    fn first_new_moon_of_2000() {
        let phases = phases_in_year(2000);
        let (instant, _) = phases
            .iter()
            .find(|(_, phase)| *phase == MoonPhase::New)
            .unwrap();
        assert_eq!(
            instant.date_naive(),
            NaiveDate::from_ymd_opt(2000, 1, 6).unwrap()
        );
    }

    #[test]
    fn year_has_roughly_fifty_phase_events() {
        for year in [1986, 2000, 2026] {
            let count = phases_in_year(year).len();
            assert!((48..=51).contains(&count), "{year}: {count} events");
        }
    }

    #[test]
    fn all_events_fall_in_requested_local_year() {
        for (instant, _) in phases_in_year(2026) {
            assert_eq!(instant.with_timezone(&Copenhagen).year(), 2026);
        }
    }

    #[test]
    fn phases_are_sorted_and_never_duplicated() {
        let phases = phases_in_year(2026);
        for pair in phases.windows(2) {
            assert!(pair[0].0 < pair[1].0);
            // consecutive events are a quarter lunation (~7.4 days) apart
            let gap = pair[1].0 - pair[0].0;
            assert!(gap > chrono::Duration::days(6), "gap {gap}");
            assert!(gap < chrono::Duration::days(9), "gap {gap}");
        }
    }

    #[test]
    fn phases_cycle_in_order() {
        let phases = phases_in_year(2026);
        for pair in phases.windows(2) {
            let expected = match pair[0].1 {
                MoonPhase::New => MoonPhase::FirstQuarter,
                MoonPhase::FirstQuarter => MoonPhase::Full,
                MoonPhase::Full => MoonPhase::LastQuarter,
                MoonPhase::LastQuarter => MoonPhase::New,
            };
            assert_eq!(pair[1].1, expected);
        }
    }

    #[test]
    fn every_phase_occurs_at_least_twelve_times() {
        let phases = phases_in_year(2026);
        for phase in MoonPhase::ALL {
            let count = phases.iter().filter(|(_, p)| *p == phase).count();
            assert!(count >= 12, "{:?} occurred {count} times", phase);
        }
    }
}
