pub mod rest;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::working_hours::RawWorkingHours;
use crate::models::{Appointment, Staff};

// ── Wire types ──

#[derive(Debug, Clone, Deserialize)]
pub struct TenantSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCategory {
    pub id: String,
    pub name: String,
}

/// A service as the server sends it: duration and price are textual and get
/// parsed into numbers when the catalog is built.
#[derive(Debug, Clone, Deserialize)]
pub struct RawService {
    pub id: String,
    pub name: String,
    pub duration: String,
    pub price: String,
    pub category_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BusinessSummary {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HomePage {
    #[serde(default)]
    pub business: Option<BusinessSummary>,
    #[serde(default)]
    pub tenants: Vec<TenantSummary>,
    #[serde(default)]
    pub categories: Vec<RawCategory>,
    #[serde(default)]
    pub services: Vec<RawService>,
}

/// Per-tenant business info blob: working hours plus contact details. Cached
/// locally keyed by tenant id, so it round-trips through serde.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BusinessInfo {
    #[serde(default)]
    pub working_hours: Vec<RawWorkingHours>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Terms {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
}

/// The assembled booking submission. Guest fields ride along only for
/// unauthenticated bookings.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    pub datetime: String,
    pub tenant_id: String,
    pub staff_id: Option<String>,
    pub services: Vec<String>,
    pub guest: Option<GuestFields>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GuestFields {
    pub name: String,
    pub phone: String,
}

// ── The external collaborator ──

/// Everything the booking workflow needs from the server. One REST
/// implementation in `rest`; tests substitute their own.
#[async_trait]
pub trait BookingApi: Send + Sync {
    async fn fetch_home(&self) -> Result<HomePage, AppError>;
    async fn fetch_tenant_categories(&self, tenant_id: &str) -> Result<Vec<RawCategory>, AppError>;
    async fn fetch_business_info(&self, tenant_id: &str) -> Result<BusinessInfo, AppError>;
    async fn send_code(&self, phone: &str) -> Result<(), AppError>;
    /// Returns the access token granted for a valid code.
    async fn validate_code(&self, phone: &str, code: &str) -> Result<String, AppError>;
    async fn fetch_profile(&self, token: &str) -> Result<Profile, AppError>;
    async fn update_profile(&self, token: &str, profile: &Profile) -> Result<Profile, AppError>;
    async fn fetch_staff(&self, token: &str, tenant_id: &str) -> Result<Vec<Staff>, AppError>;
    /// Returns the created appointment id.
    async fn book_appointment(
        &self,
        token: Option<&str>,
        request: &BookingRequest,
    ) -> Result<String, AppError>;
    async fn fetch_appointments(&self, token: &str) -> Result<Vec<Appointment>, AppError>;
    async fn cancel_appointment(&self, token: &str, appointment_id: &str) -> Result<(), AppError>;
    async fn fetch_terms(&self) -> Result<Terms, AppError>;
}
