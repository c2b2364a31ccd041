//! Low-accuracy solar ephemeris.
//!
//! Julian-day bookkeeping, a ΔT (TT − UT) estimate and the Meeus
//! low-accuracy series for the Sun: apparent ecliptic longitude,
//! declination and the equation of time. Good to ±0.01°, which is minutes
//! of time for event searches, more than enough for a printed calendar.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};

/// Julian day of the Unix epoch, 1970-01-01T00:00:00Z.
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Julian day of the J2000.0 epoch.
pub const J2000: f64 = 2_451_545.0;

pub fn julian_day(t: DateTime<Utc>) -> f64 {
    t.timestamp_micros() as f64 / 86_400e6 + UNIX_EPOCH_JD
}

/// Convert a Julian day back to UTC, rounded to the millisecond. An f64
/// Julian day only resolves ~50 µs near the present, and every consumer
/// prints minutes anyway.
pub fn datetime_from_jd(jd: f64) -> DateTime<Utc> {
    let millis = ((jd - UNIX_EPOCH_JD) * 86_400e3).round() as i64;
    Utc.timestamp_millis_opt(millis)
        .single()
        .expect("julian day within chrono range")
}

/// Estimate of ΔT = TT − UT in seconds, Espenak & Meeus polynomial fits
/// by era. A few seconds of error for modern years, growing towards the
/// edges of the supported 1–9999 range.
pub fn delta_t_seconds(year: i32) -> f64 {
    let y = f64::from(year);
    match year {
        2005..=2049 => {
            let t = y - 2000.0;
            62.92 + 0.32217 * t + 0.005589 * t * t
        }
        1986..=2004 => {
            let t = y - 2000.0;
            63.86 + 0.3345 * t - 0.060374 * t.powi(2)
                + 0.0017275 * t.powi(3)
                + 0.000651814 * t.powi(4)
                + 0.00002373599 * t.powi(5)
        }
        1961..=1985 => {
            let t = y - 1975.0;
            45.45 + 1.067 * t - t.powi(2) / 260.0 - t.powi(3) / 718.0
        }
        1941..=1960 => {
            let t = y - 1950.0;
            29.07 + 0.407 * t - t.powi(2) / 233.0 + t.powi(3) / 2547.0
        }
        1920..=1940 => {
            let t = y - 1920.0;
            21.20 + 0.84493 * t - 0.076100 * t.powi(2) + 0.0020936 * t.powi(3)
        }
        1900..=1919 => {
            let t = y - 1900.0;
            -2.79 + 1.494119 * t - 0.0598939 * t.powi(2) + 0.0061966 * t.powi(3)
                - 0.000197 * t.powi(4)
        }
        2050..=2149 => {
            let u = (y - 1820.0) / 100.0;
            -20.0 + 32.0 * u * u - 0.5628 * (2150.0 - y)
        }
        _ => {
            let u = (y - 1820.0) / 100.0;
            -20.0 + 32.0 * u * u
        }
    }
}

/// Julian day on the TT timescale for a UTC instant.
pub fn jd_tt(t: DateTime<Utc>) -> f64 {
    julian_day(t) + delta_t_seconds(t.year()) / 86_400.0
}

/// Julian centuries since J2000.0.
fn centuries(jd: f64) -> f64 {
    (jd - J2000) / 36_525.0
}

/// Apparent ecliptic longitude of the Sun in degrees [0, 360).
pub fn solar_apparent_longitude(jd_tt: f64) -> f64 {
    let t = centuries(jd_tt);
    let l0 = 280.46646 + 36_000.76983 * t + 0.000_3032 * t * t;
    let m = (357.52911 + 35_999.05029 * t - 0.000_1537 * t * t).to_radians();
    let c = (1.914602 - 0.004817 * t - 0.000014 * t * t) * m.sin()
        + (0.019993 - 0.000101 * t) * (2.0 * m).sin()
        + 0.000289 * (3.0 * m).sin();
    let omega = (125.04 - 1934.136 * t).to_radians();
    (l0 + c - 0.00569 - 0.00478 * omega.sin()).rem_euclid(360.0)
}

/// Mean obliquity of the ecliptic, corrected for nutation, in degrees.
fn corrected_obliquity(t: f64) -> f64 {
    let seconds = 21.448 - t * (46.8150 + t * (0.00059 - t * 0.001813));
    let mean = 23.0 + (26.0 + seconds / 60.0) / 60.0;
    let omega = (125.04 - 1934.136 * t).to_radians();
    mean + 0.00256 * omega.cos()
}

/// Declination of the Sun in degrees.
pub fn solar_declination(jd_tt: f64) -> f64 {
    let t = centuries(jd_tt);
    let lambda = solar_apparent_longitude(jd_tt).to_radians();
    let eps = corrected_obliquity(t).to_radians();
    (eps.sin() * lambda.sin()).asin().to_degrees()
}

/// Equation of time in minutes: true solar time minus mean solar time.
pub fn equation_of_time_minutes(jd_tt: f64) -> f64 {
    let t = centuries(jd_tt);
    let eps = corrected_obliquity(t).to_radians();
    let l0 = (280.46646 + 36_000.76983 * t + 0.000_3032 * t * t).to_radians();
    let m = (357.52911 + 35_999.05029 * t - 0.000_1537 * t * t).to_radians();
    let e = 0.016708634 - 0.000042037 * t - 0.000_000_1267 * t * t;
    let y = (eps / 2.0).tan().powi(2);

    let etime = y * (2.0 * l0).sin() - 2.0 * e * m.sin()
        + 4.0 * e * y * m.sin() * (2.0 * l0).cos()
        - 0.5 * y * y * (4.0 * l0).sin()
        - 1.25 * e * e * (2.0 * m).sin();
    etime.to_degrees() * 4.0
}

pub fn utc_midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Every day of the given calendar year, ascending.
pub fn days_of_year(year: i32) -> impl Iterator<Item = NaiveDate> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1).expect("valid calendar date");
    let end = NaiveDate::from_ymd_opt(year, 12, 31).expect("valid calendar date");
    start.iter_days().take_while(move |d| *d <= end)
}
