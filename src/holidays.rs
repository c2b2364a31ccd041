//! Statutory Danish public holidays.
//!
//! All floating holidays hang off Easter Sunday, computed with the
//! anonymous Gregorian computus, applied proleptically over the whole
//! supported year range.

use chrono::{Duration, NaiveDate};

pub fn easter_sunday(year: i32) -> NaiveDate {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32).expect("computus yields a valid date")
}

pub fn statutory_holidays(year: i32) -> Vec<(NaiveDate, &'static str)> {
    let easter = easter_sunday(year);
    let ymd = |month, day| {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
    };

    let mut holidays = vec![
        (ymd(1, 1), "Nytårsdag"),
        (easter - Duration::days(3), "Skærtorsdag"),
        (easter - Duration::days(2), "Langfredag"),
        (easter, "Påskedag"),
        (easter + Duration::days(1), "Anden påskedag"),
    ];
    // Abolished as a public holiday from 2024
    if year <= 2023 {
        holidays.push((easter + Duration::days(26), "Store bededag"));
    }
    holidays.extend([
        (easter + Duration::days(39), "Kristi himmelfartsdag"),
        (easter + Duration::days(49), "Pinsedag"),
        (easter + Duration::days(50), "Anden pinsedag"),
        (ymd(12, 25), "Juledag"),
        (ymd(12, 26), "Anden juledag"),
    ]);
    holidays
}
