use chrono::NaiveDate;

use crate::api::BookingApi;
use crate::errors::AppError;
use crate::models::Appointment;

/// The four disjoint buckets of a customer's appointment history. Canceled
/// wins regardless of date; the rest split on the calendar day against
/// `today`. Input order is preserved within each bucket.
#[derive(Debug, Clone, Default)]
pub struct CategorizedAppointments {
    pub canceled: Vec<Appointment>,
    pub past: Vec<Appointment>,
    pub today: Vec<Appointment>,
    pub future: Vec<Appointment>,
}

impl CategorizedAppointments {
    pub fn total(&self) -> usize {
        self.canceled.len() + self.past.len() + self.today.len() + self.future.len()
    }
}

pub fn categorize(appointments: Vec<Appointment>, today: NaiveDate) -> CategorizedAppointments {
    let mut buckets = CategorizedAppointments::default();
    for appointment in appointments {
        if appointment.is_canceled {
            buckets.canceled.push(appointment);
        } else if appointment.date() < today {
            buckets.past.push(appointment);
        } else if appointment.date() == today {
            buckets.today.push(appointment);
        } else {
            buckets.future.push(appointment);
        }
    }
    buckets
}

/// Ascending chronological order; applied before rendering any bucket.
pub fn sort_by_datetime(appointments: &mut [Appointment]) {
    appointments.sort_by_key(|a| a.datetime);
}

pub async fn fetch(api: &dyn BookingApi, token: &str) -> Result<Vec<Appointment>, AppError> {
    let mut appointments = api.fetch_appointments(token).await?;
    sort_by_datetime(&mut appointments);
    Ok(appointments)
}

/// Cancels one appointment and re-fetches the whole ledger: no local
/// optimistic mutation, categorization is always derived from server truth.
pub async fn cancel_and_refresh(
    api: &dyn BookingApi,
    token: &str,
    appointment_id: &str,
) -> Result<Vec<Appointment>, AppError> {
    api.cancel_appointment(token, appointment_id).await?;
    tracing::info!("canceled appointment {appointment_id}, refreshing ledger");
    fetch(api, token).await
}
