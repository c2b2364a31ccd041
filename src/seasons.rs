//! Equinoxes and solstices, found as "next event" queries.
//!
//! An equinox or solstice is the instant the Sun's apparent ecliptic
//! longitude crosses a multiple of 90°. The search walks forward a day at
//! a time until the crossing is bracketed, then bisects the bracket down
//! to a fraction of a second.

use std::cmp;

use chrono::{DateTime, TimeZone, Utc};

use crate::ephem;

pub const SEASON_NAMES: [&str; 4] = [
    "Forårsjævndøgn",
    "Sommersolhverv",
    "Efterårsjævndøgn",
    "Vintersolhverv",
];

/// First equinox strictly after the given instant.
pub fn next_equinox(after: DateTime<Utc>) -> DateTime<Utc> {
    cmp::min(
        next_longitude_crossing(after, 0.0),
        next_longitude_crossing(after, 180.0),
    )
}

/// First solstice strictly after the given instant.
pub fn next_solstice(after: DateTime<Utc>) -> DateTime<Utc> {
    cmp::min(
        next_longitude_crossing(after, 90.0),
        next_longitude_crossing(after, 270.0),
    )
}

/// The four seasonal events of a year, chained the way the original
/// queries ran: spring equinox from January 1, then each event from the
/// previous one.
pub fn seasons_of_year(year: i32) -> [(DateTime<Utc>, &'static str); 4] {
    let jan1 = Utc
        .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .expect("valid calendar date");

    let spring = next_equinox(jan1);
    let summer = next_solstice(spring);
    let fall = next_equinox(summer);
    let winter = next_solstice(fall);

    [
        (spring, SEASON_NAMES[0]),
        (summer, SEASON_NAMES[1]),
        (fall, SEASON_NAMES[2]),
        (winter, SEASON_NAMES[3]),
    ]
}

/// Signed distance from `target` in degrees, folded into (-180, 180].
fn wrap180(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

fn offset_at(t: DateTime<Utc>, target: f64) -> f64 {
    wrap180(ephem::solar_apparent_longitude(ephem::jd_tt(t)) - target)
}

/// Next instant after `after` at which the Sun's apparent longitude
/// equals `target` degrees.
fn next_longitude_crossing(after: DateTime<Utc>, target: f64) -> DateTime<Utc> {
    // The Sun advances just under 1°/day, so a daily scan brackets the
    // crossing within 400 steps. The crossing itself is a negative to
    // non-negative sign change; the jump at the antipode goes the other
    // way and is excluded by the step-size guard.
    let mut t0 = after;
    let mut f0 = offset_at(t0, target);
    for _ in 0..400 {
        let t1 = t0 + chrono::Duration::days(1);
        let f1 = offset_at(t1, target);
        if f0 < 0.0 && f1 >= 0.0 && f1 - f0 < 45.0 {
            return bisect(t0, t1, target);
        }
        t0 = t1;
        f0 = f1;
    }
    // The Sun completes a full circuit in ~365 days, so a 400-day scan
    // always brackets the crossing
    unreachable!("no longitude crossing within 400 days of {after}");
}

fn bisect(mut lo: DateTime<Utc>, mut hi: DateTime<Utc>, target: f64) -> DateTime<Utc> {
    while hi - lo > chrono::Duration::seconds(1) {
        let mid = ephem::datetime_from_jd((ephem::julian_day(lo) + ephem::julian_day(hi)) / 2.0);
        if offset_at(mid, target) < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    hi
}
