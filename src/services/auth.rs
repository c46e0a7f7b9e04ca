use rusqlite::Connection;

use crate::api::BookingApi;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::identity::validate_phone;
use crate::models::GuestIdentity;

pub const RESEND_COOLDOWN_SECS: u32 = 60;

/// Countdown gating the "resend code" action. Pure: the caller drives it with
/// one `tick()` per second, so it tests without timers.
#[derive(Debug, Clone, PartialEq)]
pub struct ResendCooldown {
    remaining_secs: u32,
}

impl ResendCooldown {
    pub fn start() -> Self {
        Self {
            remaining_secs: RESEND_COOLDOWN_SECS,
        }
    }

    pub fn tick(&mut self) {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
    }

    pub fn is_ready(&self) -> bool {
        self.remaining_secs == 0
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }
}

/// Requests a one-time code. The phone is validated locally first; nothing is
/// sent for a malformed number.
pub async fn send_code(api: &dyn BookingApi, phone: &str) -> Result<(), AppError> {
    validate_phone(phone)?;
    api.send_code(phone).await
}

/// Validates the code, persists the granted session token, and drops any
/// stored guest identity now that a real session exists.
pub async fn validate_code(
    api: &dyn BookingApi,
    conn: &Connection,
    phone: &str,
    code: &str,
) -> Result<String, AppError> {
    if code.trim().is_empty() {
        return Err(AppError::Validation("enter the code you received".to_string()));
    }
    let token = api.validate_code(phone, code).await?;
    queries::set_session_token(conn, &token)?;
    queries::clear_guest_identity(conn)?;
    tracing::info!("session established for {phone}");
    Ok(token)
}

/// Stores guest details for later guest bookings.
pub fn capture_guest(conn: &Connection, guest: &GuestIdentity) -> Result<(), AppError> {
    guest.validate()?;
    queries::save_guest_identity(conn, guest)?;
    Ok(())
}

/// The identity the booking flow should run under: an existing session wins,
/// otherwise previously captured guest details, otherwise an empty guest that
/// will fail the pre-submission check.
pub fn current_identity(conn: &Connection) -> Result<crate::models::Identity, AppError> {
    use crate::models::Identity;
    if let Some(token) = queries::get_session_token(conn)? {
        return Ok(Identity::Authenticated { token });
    }
    let guest = queries::get_guest_identity(conn)?.unwrap_or(GuestIdentity {
        name: String::new(),
        phone: String::new(),
        email: None,
    });
    Ok(Identity::Guest(guest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_counts_down_to_ready() {
        let mut cooldown = ResendCooldown::start();
        assert!(!cooldown.is_ready());
        assert_eq!(cooldown.remaining_secs(), 60);

        for _ in 0..59 {
            cooldown.tick();
        }
        assert!(!cooldown.is_ready());
        assert_eq!(cooldown.remaining_secs(), 1);

        cooldown.tick();
        assert!(cooldown.is_ready());

        // Further ticks stay at zero.
        cooldown.tick();
        assert_eq!(cooldown.remaining_secs(), 0);
    }

    #[test]
    fn test_capture_guest_validates_before_saving() {
        let conn = crate::db::init_db(":memory:").unwrap();
        let bad = GuestIdentity {
            name: "Ana".to_string(),
            phone: "not a phone".to_string(),
            email: None,
        };
        assert!(capture_guest(&conn, &bad).is_err());
        assert_eq!(queries::get_guest_identity(&conn).unwrap(), None);

        let good = GuestIdentity {
            name: "Ana".to_string(),
            phone: "+15551234567".to_string(),
            email: None,
        };
        capture_guest(&conn, &good).unwrap();
        assert_eq!(queries::get_guest_identity(&conn).unwrap(), Some(good));
    }

    #[test]
    fn test_current_identity_prefers_session() {
        use crate::models::Identity;

        let conn = crate::db::init_db(":memory:").unwrap();
        let guest = GuestIdentity {
            name: "Ana".to_string(),
            phone: "+15551234567".to_string(),
            email: None,
        };
        capture_guest(&conn, &guest).unwrap();
        assert_eq!(
            current_identity(&conn).unwrap(),
            Identity::Guest(guest)
        );

        queries::set_session_token(&conn, "tok").unwrap();
        assert_eq!(
            current_identity(&conn).unwrap(),
            Identity::Authenticated {
                token: "tok".to_string()
            }
        );
    }
}
