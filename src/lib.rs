pub mod calendar;
pub mod config;
pub mod ephem;
pub mod error;
pub mod holidays;
pub mod ical;
pub mod moon;
pub mod observances;
pub mod seasons;
pub mod sun;
