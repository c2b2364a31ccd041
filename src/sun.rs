//! Observer-dependent solar events: sunrise/sunset, bright nights and the
//! weekly sun-times sampling.

use chrono::{DateTime, Duration, NaiveDate, Utc, Weekday};
use chrono::Datelike;

use crate::ephem;

/// Sun's upper limb at the horizon: apparent radius plus standard
/// refraction, -50 arcminutes.
const SUN_HORIZON_DEG: f64 = -50.0 / 60.0;

/// Below this altitude astronomical twilight has ended.
const ASTRONOMICAL_TWILIGHT_DEG: f64 = -18.0;

#[derive(Debug, Clone, Copy)]
pub struct Observer {
    pub latitude: f64,
    pub longitude: f64,
}

impl Observer {
    pub const COPENHAGEN: Observer = Observer {
        latitude: 55.6761,
        longitude: 12.5683,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrightNightEdge {
    Begins,
    Ends,
}

impl BrightNightEdge {
    pub fn danish_name(self) -> &'static str {
        match self {
            BrightNightEdge::Begins => "De lyse nætter begynder",
            BrightNightEdge::Ends => "De lyse nætter slutter",
        }
    }
}

/// Sunrise and sunset on the given date, or `None` when the sun does not
/// cross the horizon (midnight sun or polar night).
pub fn sunrise_sunset(date: NaiveDate, observer: &Observer) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let rise = horizon_crossing(date, observer, true)?;
    let set = horizon_crossing(date, observer, false)?;
    Some((rise, set))
}

/// NOAA hour-angle method: solve for the hour angle at which the sun's
/// center reaches the -50' horizon, then refine once with the declination
/// and equation of time at the first estimate.
fn horizon_crossing(date: NaiveDate, observer: &Observer, rising: bool) -> Option<DateTime<Utc>> {
    let mut minutes = 720.0 - 4.0 * observer.longitude;
    for _ in 0..2 {
        let jd = ephem::jd_tt(utc_at(date, minutes));
        let declination = ephem::solar_declination(jd).to_radians();
        let eot = ephem::equation_of_time_minutes(jd);
        let latitude = observer.latitude.to_radians();

        let cos_hour_angle = (SUN_HORIZON_DEG.to_radians().sin()
            - latitude.sin() * declination.sin())
            / (latitude.cos() * declination.cos());
        if cos_hour_angle.abs() > 1.0 {
            return None;
        }
        let hour_angle = cos_hour_angle.acos().to_degrees();

        let noon = 720.0 - 4.0 * observer.longitude - eot;
        minutes = if rising {
            noon - 4.0 * hour_angle
        } else {
            noon + 4.0 * hour_angle
        };
    }
    Some(utc_at(date, minutes))
}

fn utc_at(date: NaiveDate, minutes: f64) -> DateTime<Utc> {
    ephem::utc_midnight(date) + Duration::seconds((minutes * 60.0).round() as i64)
}

/// Altitude of the sun at its lower culmination on the night of `date`,
/// in degrees: |φ + δ| − 90.
pub fn lower_culmination_altitude(date: NaiveDate, observer: &Observer) -> f64 {
    // declination around local solar midnight
    let midnight = utc_at(date, 1440.0 - 4.0 * observer.longitude);
    let declination = ephem::solar_declination(ephem::jd_tt(midnight));
    (observer.latitude + declination).abs() - 90.0
}

/// A night is bright when the sun never reaches -18°, i.e. astronomical
/// twilight never ends. Scans every day of the year and records the edges
/// into and out of the bright state.
pub fn bright_night_edges(year: i32, observer: &Observer) -> Vec<(NaiveDate, BrightNightEdge)> {
    let mut edges = Vec::new();
    let mut previous: Option<bool> = None;
    for date in ephem::days_of_year(year) {
        let bright = lower_culmination_altitude(date, observer) > ASTRONOMICAL_TWILIGHT_DEG;
        match previous {
            Some(false) if bright => edges.push((date, BrightNightEdge::Begins)),
            Some(true) if !bright => edges.push((date, BrightNightEdge::Ends)),
            _ => {}
        }
        previous = Some(bright);
    }
    edges
}

/// Sunrise/sunset for every Monday of the year, or for every day when
/// `daily` is set. Days without a sunrise or sunset are skipped.
pub fn sun_times(
    year: i32,
    observer: &Observer,
    daily: bool,
) -> Vec<(NaiveDate, DateTime<Utc>, DateTime<Utc>)> {
    ephem::days_of_year(year)
        .filter(|date| daily || date.weekday() == Weekday::Mon)
        .filter_map(|date| sunrise_sunset(date, observer).map(|(rise, set)| (date, rise, set)))
        .collect()
}
