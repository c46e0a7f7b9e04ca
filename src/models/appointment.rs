use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentService {
    pub id: String,
    pub name: String,
    pub price: f64,
}

/// An appointment as the server reports it. Immutable on the client: the only
/// state transition (cancellation) is performed by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: String,
    pub datetime: NaiveDateTime,
    pub tenant_id: String,
    pub staff_id: Option<String>,
    pub staff_name: Option<String>,
    pub services: Vec<AppointmentService>,
    pub is_canceled: bool,
}

impl Appointment {
    pub fn is_upcoming(&self, now: NaiveDateTime) -> bool {
        self.datetime > now
    }

    pub fn date(&self) -> NaiveDate {
        self.datetime.date()
    }

    /// Full-precision sum of the service prices.
    pub fn total_price(&self) -> f64 {
        self.services.iter().map(|s| s.price).sum()
    }

    /// Two-decimal display form; the underlying value keeps full precision.
    pub fn display_total(&self) -> String {
        format!("${:.2}", self.total_price())
    }
}
