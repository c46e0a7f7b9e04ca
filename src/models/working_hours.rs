use std::str::FromStr;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Working hours as the server sends them: weekday name plus "HH:MM" strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawWorkingHours {
    pub day: String,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkingHours {
    pub day: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// A tenant's weekly working-hours table, at most one entry per weekday.
#[derive(Debug, Clone, Default)]
pub struct WeekSchedule {
    entries: Vec<WorkingHours>,
}

impl WeekSchedule {
    /// Builds the schedule from raw server entries. Entries with an
    /// unrecognized weekday or time are dropped with a warning, as is any
    /// duplicate weekday after the first.
    pub fn from_raw(raw: &[RawWorkingHours]) -> Self {
        let mut entries: Vec<WorkingHours> = Vec::new();
        for item in raw {
            let day = match Weekday::from_str(&item.day) {
                Ok(d) => d,
                Err(_) => {
                    tracing::warn!("dropping working hours with unknown weekday: {}", item.day);
                    continue;
                }
            };
            let (start, end) = match (parse_time(&item.start), parse_time(&item.end)) {
                (Some(s), Some(e)) => (s, e),
                _ => {
                    tracing::warn!(
                        "dropping working hours for {} with unparseable times {}-{}",
                        item.day,
                        item.start,
                        item.end
                    );
                    continue;
                }
            };
            if entries.iter().any(|e| e.day == day) {
                tracing::warn!("dropping duplicate working hours entry for {}", item.day);
                continue;
            }
            entries.push(WorkingHours { day, start, end });
        }
        Self { entries }
    }

    pub fn hours_for(&self, day: Weekday) -> Option<&WorkingHours> {
        self.entries.iter().find(|e| e.day == day)
    }

    pub fn is_open(&self, day: Weekday) -> bool {
        self.hours_for(day).is_some()
    }

    pub fn entries(&self) -> &[WorkingHours] {
        &self.entries
    }
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").ok()
}
