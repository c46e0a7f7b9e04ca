use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Guest details captured during the unauthenticated sign-in flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestIdentity {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl GuestIdentity {
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.phone.trim().is_empty()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name is required".to_string()));
        }
        validate_phone(&self.phone)?;
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }
}

/// Who is submitting the booking. Constructed once at the start of the flow
/// and threaded through, never re-derived at submission time.
#[derive(Debug, Clone, PartialEq)]
pub enum Identity {
    Guest(GuestIdentity),
    Authenticated { token: String },
}

pub fn validate_phone(phone: &str) -> Result<(), AppError> {
    let cleaned: String = phone
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    if digits.len() < 7 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(format!("invalid phone number: {phone}")));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), AppError> {
    let trimmed = email.trim();
    let valid = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(AppError::Validation(format!("invalid email address: {email}")));
    }
    Ok(())
}
