use chrono::{NaiveTime, Timelike, Weekday};

use crate::models::{WeekSchedule, WorkingHours};

pub const SLOT_INTERVAL_MINUTES: u32 = 15;

/// Lazy, finite iterator over bookable slot labels at 15-minute granularity
/// in `[start, end)`. Cloning restarts nothing; call `slots_for` again for a
/// fresh sequence.
#[derive(Debug, Clone)]
pub struct SlotIter {
    // minutes since midnight
    current: u32,
    end: u32,
}

impl Iterator for SlotIter {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.current >= self.end {
            return None;
        }
        let label = format_label(self.current);
        self.current += SLOT_INTERVAL_MINUTES;
        Some(label)
    }
}

pub fn slots_for(hours: &WorkingHours) -> SlotIter {
    SlotIter {
        current: minutes_of_day(hours.start),
        end: minutes_of_day(hours.end),
    }
}

/// Slots for one weekday; empty when the schedule has no entry for it.
pub fn slots_for_day(schedule: &WeekSchedule, day: Weekday) -> SlotIter {
    match schedule.hours_for(day) {
        Some(hours) => slots_for(hours),
        None => SlotIter { current: 0, end: 0 },
    }
}

fn minutes_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

fn format_label(minutes: u32) -> String {
    let hour = minutes / 60;
    let minute = minutes % 60;
    let meridiem = if hour < 12 { "AM" } else { "PM" };
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{hour12}:{minute:02} {meridiem}")
}

/// Parses a slot label ("9:15 AM") back into wall-clock time.
pub fn parse_label(label: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(label, "%I:%M %p").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawWorkingHours;

    fn schedule(day: &str, start: &str, end: &str) -> WeekSchedule {
        WeekSchedule::from_raw(&[RawWorkingHours {
            day: day.to_string(),
            start: start.to_string(),
            end: end.to_string(),
        }])
    }

    #[test]
    fn test_monday_nine_to_ten() {
        let schedule = schedule("Monday", "09:00", "10:00");
        let slots: Vec<String> = slots_for_day(&schedule, Weekday::Mon).collect();
        assert_eq!(slots, vec!["9:00 AM", "9:15 AM", "9:30 AM", "9:45 AM"]);
    }

    #[test]
    fn test_slots_span_noon_and_midnight_labels() {
        let noon = schedule("Friday", "11:30", "12:30");
        let slots: Vec<String> = slots_for_day(&noon, Weekday::Fri).collect();
        assert_eq!(slots, vec!["11:30 AM", "11:45 AM", "12:00 PM", "12:15 PM"]);

        let midnight = schedule("Friday", "00:00", "00:30");
        let slots: Vec<String> = slots_for_day(&midnight, Weekday::Fri).collect();
        assert_eq!(slots, vec!["12:00 AM", "12:15 AM"]);
    }

    #[test]
    fn test_end_is_exclusive() {
        let schedule = schedule("Tuesday", "09:00", "09:15");
        let slots: Vec<String> = slots_for_day(&schedule, Weekday::Tue).collect();
        assert_eq!(slots, vec!["9:00 AM"]);
    }

    #[test]
    fn test_empty_when_start_equals_end() {
        let schedule = schedule("Wednesday", "09:00", "09:00");
        assert_eq!(slots_for_day(&schedule, Weekday::Wed).count(), 0);
    }

    #[test]
    fn test_empty_when_day_absent() {
        let schedule = schedule("Monday", "09:00", "17:00");
        assert_eq!(slots_for_day(&schedule, Weekday::Sun).count(), 0);
    }

    #[test]
    fn test_slots_are_strictly_increasing_fifteen_apart() {
        let schedule = schedule("Thursday", "08:00", "18:00");
        let times: Vec<NaiveTime> = slots_for_day(&schedule, Weekday::Thu)
            .map(|label| parse_label(&label).unwrap())
            .collect();
        assert!(!times.is_empty());
        for pair in times.windows(2) {
            let gap = pair[1] - pair[0];
            assert_eq!(gap.num_minutes(), SLOT_INTERVAL_MINUTES as i64);
        }
        let start = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        let end = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
        assert!(times.iter().all(|t| *t >= start && *t < end));
    }

    #[test]
    fn test_sequence_is_restartable() {
        let schedule = schedule("Monday", "09:00", "10:00");
        let first: Vec<String> = slots_for_day(&schedule, Weekday::Mon).collect();
        let second: Vec<String> = slots_for_day(&schedule, Weekday::Mon).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_label_roundtrip() {
        assert_eq!(
            parse_label("9:45 AM"),
            NaiveTime::from_hms_opt(9, 45, 0),
        );
        assert_eq!(
            parse_label("12:15 PM"),
            NaiveTime::from_hms_opt(12, 15, 0),
        );
        assert_eq!(parse_label("25:00"), None);
    }
}
