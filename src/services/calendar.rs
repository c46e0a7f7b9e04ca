use chrono::{Datelike, NaiveDate, Weekday};

use crate::errors::AppError;
use crate::models::WeekSchedule;
use crate::services::slots;

/// The chosen appointment day and slot label.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotSelection {
    pub date: NaiveDate,
    pub time: String,
}

/// One browsable month of the booking calendar, offset from today's month.
#[derive(Debug, Clone)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub month_offset: u32,
    first_selectable_day: u32,
    days_in_month: u32,
}

impl CalendarMonth {
    pub fn browse(today: NaiveDate, month_offset: u32) -> Self {
        let month0 = today.month0() + month_offset;
        let year = today.year() + (month0 / 12) as i32;
        let month = month0 % 12 + 1;
        Self {
            year,
            month,
            month_offset,
            // Days before today are never selectable in the current month;
            // future months open up entirely.
            first_selectable_day: if month_offset == 0 { today.day() } else { 1 },
            days_in_month: days_in_month(year, month),
        }
    }

    pub fn days_in_month(&self) -> u32 {
        self.days_in_month
    }

    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    pub fn weekday_of(&self, day: u32) -> Option<Weekday> {
        self.date(day).map(|d| d.weekday())
    }

    /// A day can be picked when it is not in the past and its weekday has a
    /// working-hours entry.
    pub fn is_selectable(&self, day: u32, schedule: &WeekSchedule) -> bool {
        if day < self.first_selectable_day || day > self.days_in_month {
            return false;
        }
        match self.weekday_of(day) {
            Some(weekday) => schedule.is_open(weekday),
            None => false,
        }
    }
}

/// Day/slot picking state for the slot-selection step. Selecting the already
/// selected day toggles it off, clearing its slots and any chosen slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DaySelection {
    selected: Option<(NaiveDate, Vec<String>)>,
    chosen_slot: Option<String>,
}

impl DaySelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected.as_ref().map(|(date, _)| *date)
    }

    pub fn slots(&self) -> &[String] {
        self.selected
            .as_ref()
            .map(|(_, slots)| slots.as_slice())
            .unwrap_or(&[])
    }

    pub fn chosen_slot(&self) -> Option<&str> {
        self.chosen_slot.as_deref()
    }

    /// Toggles a calendar day. Days before `today` and days without working
    /// hours are rejected, matching what the calendar renders as selectable.
    pub fn toggle_day(
        &mut self,
        date: NaiveDate,
        today: NaiveDate,
        schedule: &WeekSchedule,
    ) -> Result<(), AppError> {
        if self.selected_date() == Some(date) {
            self.clear();
            return Ok(());
        }
        if date < today {
            return Err(AppError::Validation(format!(
                "{date} is in the past and cannot be booked"
            )));
        }
        match schedule.hours_for(date.weekday()) {
            Some(hours) => {
                let slots: Vec<String> = slots::slots_for(hours).collect();
                self.selected = Some((date, slots));
                self.chosen_slot = None;
                Ok(())
            }
            None => Err(AppError::Validation(format!(
                "no working hours on {}",
                date.weekday()
            ))),
        }
    }

    pub fn choose_slot(&mut self, label: &str) -> Result<(), AppError> {
        if !self.slots().iter().any(|s| s == label) {
            return Err(AppError::Validation(format!(
                "time slot {label} is not available on the selected day"
            )));
        }
        self.chosen_slot = Some(label.to_string());
        Ok(())
    }

    /// Month navigation drops the day and slot.
    pub fn clear(&mut self) {
        self.selected = None;
        self.chosen_slot = None;
    }

    /// The completed selection, once both a day and a slot are chosen.
    pub fn selection(&self) -> Option<SlotSelection> {
        match (&self.selected, &self.chosen_slot) {
            (Some((date, _)), Some(slot)) => Some(SlotSelection {
                date: *date,
                time: slot.clone(),
            }),
            _ => None,
        }
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(30)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawWorkingHours;

    fn monday_schedule() -> WeekSchedule {
        WeekSchedule::from_raw(&[RawWorkingHours {
            day: "Monday".to_string(),
            start: "09:00".to_string(),
            end: "10:00".to_string(),
        }])
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_current_month_hides_past_days() {
        // 2025-06-16 is a Monday.
        let month = CalendarMonth::browse(date("2025-06-16"), 0);
        let schedule = monday_schedule();
        assert!(!month.is_selectable(9, &schedule)); // Monday before today
        assert!(month.is_selectable(16, &schedule)); // today
        assert!(month.is_selectable(23, &schedule)); // next Monday
        assert!(!month.is_selectable(24, &schedule)); // Tuesday, closed
    }

    #[test]
    fn test_future_month_opens_all_days() {
        let month = CalendarMonth::browse(date("2025-06-16"), 1);
        assert_eq!((month.year, month.month), (2025, 7));
        let schedule = monday_schedule();
        assert!(month.is_selectable(7, &schedule)); // first Monday of July
    }

    #[test]
    fn test_month_offset_rolls_over_year() {
        let month = CalendarMonth::browse(date("2025-11-20"), 2);
        assert_eq!((month.year, month.month), (2026, 1));
        assert_eq!(month.days_in_month(), 31);
    }

    #[test]
    fn test_toggle_day_generates_slots_then_clears() {
        let schedule = monday_schedule();
        let mut selection = DaySelection::new();
        let monday = date("2025-06-16");

        selection.toggle_day(monday, monday, &schedule).unwrap();
        assert_eq!(selection.selected_date(), Some(monday));
        assert_eq!(
            selection.slots(),
            &["9:00 AM", "9:15 AM", "9:30 AM", "9:45 AM"]
        );

        // Second toggle of the same day deselects it.
        selection.toggle_day(monday, monday, &schedule).unwrap();
        assert_eq!(selection, DaySelection::new());
    }

    #[test]
    fn test_toggle_closed_day_is_rejected() {
        let schedule = monday_schedule();
        let mut selection = DaySelection::new();
        let err = selection
            .toggle_day(date("2025-06-17"), date("2025-06-16"), &schedule)
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(selection.selected_date(), None);
    }

    #[test]
    fn test_toggle_past_day_is_rejected() {
        let schedule = monday_schedule();
        let mut selection = DaySelection::new();

        // The previous Monday is open but already behind today.
        let err = selection
            .toggle_day(date("2025-06-09"), date("2025-06-16"), &schedule)
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(selection.selected_date(), None);

        // Today itself stays bookable.
        selection
            .toggle_day(date("2025-06-16"), date("2025-06-16"), &schedule)
            .unwrap();
        assert_eq!(selection.selected_date(), Some(date("2025-06-16")));
    }

    #[test]
    fn test_choose_slot_must_come_from_generated_set() {
        let schedule = monday_schedule();
        let mut selection = DaySelection::new();
        let monday = date("2025-06-16");
        selection.toggle_day(monday, monday, &schedule).unwrap();

        assert!(selection.choose_slot("9:30 AM").is_ok());
        assert!(selection.choose_slot("4:00 PM").is_err());
        assert_eq!(selection.chosen_slot(), Some("9:30 AM"));
    }

    #[test]
    fn test_selection_requires_day_and_slot() {
        let schedule = monday_schedule();
        let mut selection = DaySelection::new();
        assert_eq!(selection.selection(), None);

        let monday = date("2025-06-16");
        selection.toggle_day(monday, monday, &schedule).unwrap();
        assert_eq!(selection.selection(), None);

        selection.choose_slot("9:00 AM").unwrap();
        let slot = selection.selection().unwrap();
        assert_eq!(slot.date, monday);
        assert_eq!(slot.time, "9:00 AM");
    }

    #[test]
    fn test_switching_days_resets_chosen_slot() {
        let schedule = monday_schedule();
        let mut selection = DaySelection::new();
        let monday = date("2025-06-16");
        selection.toggle_day(monday, monday, &schedule).unwrap();
        selection.choose_slot("9:00 AM").unwrap();

        selection
            .toggle_day(date("2025-06-23"), monday, &schedule)
            .unwrap();
        assert_eq!(selection.chosen_slot(), None);
    }
}
