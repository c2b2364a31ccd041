//! iCalendar export: one all-day VEVENT per calendar entry.

use std::fs;
use std::path::Path;

use chrono::Duration;
use icalendar::{Calendar, Component, Event, EventLike};

use crate::calendar::DenmarkCalendar;
use crate::error::Result;

pub fn to_ical(calendar: &DenmarkCalendar, name: &str) -> Calendar {
    let mut ical = Calendar::new();
    ical.name(name);
    for (moment, label) in calendar.entries() {
        // Timed entries are flattened to all-day events on their local date
        let date = moment.date();
        let mut event = Event::new();
        event.summary(label);
        event.uid(&format!("{date}-{}@dancalendar", slug(label)));
        event.starts(date);
        event.ends(date + Duration::days(1));
        ical.push(event.done());
    }
    ical
}

pub fn write_ical(calendar: &DenmarkCalendar, name: &str, path: &Path) -> Result<()> {
    fs::write(path, to_ical(calendar, name).to_string())?;
    Ok(())
}

fn slug(label: &str) -> String {
    label
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                '-'
            }
        })
        .collect()
}
