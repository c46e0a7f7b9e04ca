use serde::{Deserialize, Serialize};

/// Sentinel id for the synthetic "any staff" entry.
pub const ANY_STAFF_ID: &str = "any";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// The customer's staff choice: a concrete member or "any staff", which
/// carries no calendar constraint.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum StaffChoice {
    Member(Staff),
    #[default]
    Any,
}

impl StaffChoice {
    /// Staff id to submit with a booking; `None` for "any staff".
    pub fn id(&self) -> Option<&str> {
        match self {
            StaffChoice::Member(staff) => Some(&staff.id),
            StaffChoice::Any => None,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            StaffChoice::Member(staff) => &staff.name,
            StaffChoice::Any => "Any staff",
        }
    }
}
