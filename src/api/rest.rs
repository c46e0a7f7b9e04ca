use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;

use super::{
    BookingApi, BookingRequest, BusinessInfo, HomePage, Profile, RawCategory, Terms,
};
use crate::errors::{AppError, FieldError};
use crate::models::{Appointment, AppointmentService, Staff};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Every response is wrapped in `{ success, message, data }`; validation
/// failures carry `errors` as a field → messages map. The explicit bound
/// keeps serde from requiring `T: Default` for the defaulted fields.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    errors: Option<HashMap<String, Vec<String>>>,
}

#[derive(Debug, Deserialize)]
struct AuthData {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct CreatedAppointment {
    id: String,
}

#[derive(Debug, Serialize)]
struct BookingPayload<'a> {
    datetime: &'a str,
    tenant_id: &'a str,
    staff_id: Option<&'a str>,
    services: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_guest: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct RawAppointment {
    id: String,
    datetime: String,
    tenant_id: String,
    #[serde(default)]
    staff_id: Option<String>,
    #[serde(default)]
    staff_name: Option<String>,
    #[serde(default)]
    services: Vec<AppointmentService>,
    #[serde(default, deserialize_with = "flexible_bool")]
    is_canceled: bool,
}

// The backend reports booleans as 0/1 in some payloads.
fn flexible_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flexible {
        Bool(bool),
        Int(i64),
    }
    Ok(match Flexible::deserialize(deserializer)? {
        Flexible::Bool(b) => b,
        Flexible::Int(i) => i != 0,
    })
}

pub struct RestBookingApi {
    base_url: String,
    site_domain: String,
    client: reqwest::Client,
}

impl RestBookingApi {
    pub fn new(base_url: String, site_domain: String) -> Self {
        Self {
            base_url,
            site_domain,
            client: reqwest::Client::new(),
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<T, AppError> {
        let mut req = self
            .client
            .get(format!("{}{path}", self.base_url))
            .header("source", "web");
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        unwrap_data(req.send().await?).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<T, AppError> {
        let mut req = self
            .client
            .post(format!("{}{path}", self.base_url))
            .header("source", "web")
            .json(body);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        unwrap_data(req.send().await?).await
    }

    /// POST where only the success acknowledgement matters.
    async fn post_ack<B: Serialize>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<(), AppError> {
        let mut req = self
            .client
            .post(format!("{}{path}", self.base_url))
            .header("source", "web")
            .json(body);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let envelope = unwrap_envelope::<serde_json::Value>(req.send().await?).await?;
        if envelope.success {
            Ok(())
        } else {
            Err(rejection(envelope.message))
        }
    }
}

fn rejection(message: Option<String>) -> AppError {
    AppError::ServerRejection(vec![FieldError::general(
        message.unwrap_or_else(|| "unexpected server response".to_string()),
    )])
}

async fn unwrap_envelope<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<Envelope<T>, AppError> {
    if resp.status() == StatusCode::UNAUTHORIZED {
        return Err(AppError::AuthRequired);
    }
    let envelope: Envelope<T> = resp.json().await?;
    if let Some(errors) = &envelope.errors {
        if !errors.is_empty() {
            let mut fields: Vec<FieldError> = errors
                .iter()
                .flat_map(|(field, messages)| {
                    messages.iter().map(move |message| FieldError {
                        field: field.clone(),
                        message: message.clone(),
                    })
                })
                .collect();
            fields.sort_by(|a, b| a.field.cmp(&b.field));
            return Err(AppError::ServerRejection(fields));
        }
    }
    Ok(envelope)
}

async fn unwrap_data<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, AppError> {
    let envelope = unwrap_envelope::<T>(resp).await?;
    if envelope.success {
        if let Some(data) = envelope.data {
            return Ok(data);
        }
    }
    Err(rejection(envelope.message))
}

#[async_trait]
impl BookingApi for RestBookingApi {
    async fn fetch_home(&self) -> Result<HomePage, AppError> {
        self.get(&format!("/home-page/{}", self.site_domain), None)
            .await
    }

    async fn fetch_tenant_categories(&self, tenant_id: &str) -> Result<Vec<RawCategory>, AppError> {
        self.get(&format!("/tenant-categories/{tenant_id}"), None)
            .await
    }

    async fn fetch_business_info(&self, tenant_id: &str) -> Result<BusinessInfo, AppError> {
        self.get(
            &format!("/footer/{}?tenant_id={tenant_id}", self.site_domain),
            None,
        )
        .await
    }

    async fn send_code(&self, phone: &str) -> Result<(), AppError> {
        self.post_ack("/otp", None, &json!({ "phone": phone })).await
    }

    async fn validate_code(&self, phone: &str, code: &str) -> Result<String, AppError> {
        let data: AuthData = self
            .post("/validate-otp", None, &json!({ "phone": phone, "otp": code }))
            .await?;
        Ok(data.access_token)
    }

    async fn fetch_profile(&self, token: &str) -> Result<Profile, AppError> {
        self.get("/profile", Some(token)).await
    }

    async fn update_profile(&self, token: &str, profile: &Profile) -> Result<Profile, AppError> {
        self.post("/update-profile", Some(token), profile).await
    }

    async fn fetch_staff(&self, token: &str, tenant_id: &str) -> Result<Vec<Staff>, AppError> {
        self.get(&format!("/tenant-staffs/{tenant_id}"), Some(token))
            .await
    }

    async fn book_appointment(
        &self,
        token: Option<&str>,
        request: &BookingRequest,
    ) -> Result<String, AppError> {
        let guest = request.guest.as_ref();
        let payload = BookingPayload {
            datetime: &request.datetime,
            tenant_id: &request.tenant_id,
            staff_id: request.staff_id.as_deref(),
            services: &request.services,
            name: guest.map(|g| g.name.as_str()),
            phone: guest.map(|g| g.phone.as_str()),
            is_guest: guest.map(|_| 1),
        };
        let created: CreatedAppointment = self
            .post("/book-appointment", token, &payload)
            .await?;
        Ok(created.id)
    }

    async fn fetch_appointments(&self, token: &str) -> Result<Vec<Appointment>, AppError> {
        let raw: Vec<RawAppointment> = self.get("/user-appointments", Some(token)).await?;
        let mut appointments = Vec::with_capacity(raw.len());
        for item in raw {
            match NaiveDateTime::parse_from_str(&item.datetime, DATETIME_FORMAT) {
                Ok(datetime) => appointments.push(Appointment {
                    id: item.id,
                    datetime,
                    tenant_id: item.tenant_id,
                    staff_id: item.staff_id,
                    staff_name: item.staff_name,
                    services: item.services,
                    is_canceled: item.is_canceled,
                }),
                Err(_) => {
                    tracing::warn!(
                        "skipping appointment {} with unparseable datetime {}",
                        item.id,
                        item.datetime
                    );
                }
            }
        }
        Ok(appointments)
    }

    async fn cancel_appointment(&self, token: &str, appointment_id: &str) -> Result<(), AppError> {
        self.post_ack(
            &format!("/cancel-appointment/{appointment_id}"),
            Some(token),
            &json!({}),
        )
        .await
    }

    async fn fetch_terms(&self) -> Result<Terms, AppError> {
        self.get("/terms-conditions", None).await
    }
}
