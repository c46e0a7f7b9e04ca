use crate::errors::AppError;
use crate::models::{Staff, StaffChoice, ANY_STAFF_ID};

/// The tenant's staff list with the synthetic "any staff" entry appended at
/// the end. Exactly one entry is selected at a time.
#[derive(Debug, Clone)]
pub struct StaffSelector {
    staff: Vec<Staff>,
    choice: StaffChoice,
}

impl StaffSelector {
    /// `previous_id` restores a persisted choice; unknown or absent ids fall
    /// back to "any staff".
    pub fn new(staff: Vec<Staff>, previous_id: Option<&str>) -> Self {
        let choice = previous_id
            .filter(|id| *id != ANY_STAFF_ID)
            .and_then(|id| staff.iter().find(|s| s.id == id))
            .cloned()
            .map(StaffChoice::Member)
            .unwrap_or(StaffChoice::Any);
        Self { staff, choice }
    }

    /// All selectable entries, "any staff" last.
    pub fn entries(&self) -> Vec<StaffChoice> {
        self.staff
            .iter()
            .cloned()
            .map(StaffChoice::Member)
            .chain(std::iter::once(StaffChoice::Any))
            .collect()
    }

    pub fn choice(&self) -> &StaffChoice {
        &self.choice
    }

    /// Selects a staff member by id (or "any"). Re-selecting the current
    /// choice is a no-op.
    pub fn select(&mut self, id: &str) -> Result<(), AppError> {
        if id == ANY_STAFF_ID {
            self.choice = StaffChoice::Any;
            return Ok(());
        }
        match self.staff.iter().find(|s| s.id == id) {
            Some(staff) => {
                if self.choice.id() != Some(id) {
                    self.choice = StaffChoice::Member(staff.clone());
                }
                Ok(())
            }
            None => Err(AppError::Validation(format!("unknown staff member: {id}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff(id: &str, name: &str) -> Staff {
        Staff {
            id: id.to_string(),
            name: name.to_string(),
            email: None,
            image: None,
        }
    }

    #[test]
    fn test_any_staff_is_appended_last() {
        let selector = StaffSelector::new(vec![staff("1", "Mia"), staff("2", "Leo")], None);
        let entries = selector.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].display_name(), "Mia");
        assert_eq!(entries[2], StaffChoice::Any);
    }

    #[test]
    fn test_defaults_to_any_staff() {
        let selector = StaffSelector::new(vec![staff("1", "Mia")], None);
        assert_eq!(*selector.choice(), StaffChoice::Any);
        assert_eq!(selector.choice().display_name(), "Any staff");
    }

    #[test]
    fn test_restores_persisted_choice() {
        let selector = StaffSelector::new(vec![staff("1", "Mia"), staff("2", "Leo")], Some("2"));
        assert_eq!(selector.choice().id(), Some("2"));

        // Unknown persisted id falls back to the sentinel.
        let selector = StaffSelector::new(vec![staff("1", "Mia")], Some("9"));
        assert_eq!(*selector.choice(), StaffChoice::Any);
    }

    #[test]
    fn test_select_is_idempotent() {
        let mut selector = StaffSelector::new(vec![staff("1", "Mia")], None);
        selector.select("1").unwrap();
        let first = selector.choice().clone();
        selector.select("1").unwrap();
        assert_eq!(*selector.choice(), first);
    }

    #[test]
    fn test_select_unknown_id_is_rejected() {
        let mut selector = StaffSelector::new(vec![staff("1", "Mia")], None);
        assert!(selector.select("9").is_err());
        assert_eq!(*selector.choice(), StaffChoice::Any);
    }

    #[test]
    fn test_select_any() {
        let mut selector = StaffSelector::new(vec![staff("1", "Mia")], Some("1"));
        selector.select(ANY_STAFF_ID).unwrap();
        assert_eq!(*selector.choice(), StaffChoice::Any);
        assert_eq!(selector.choice().id(), None);
    }
}
