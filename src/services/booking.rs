use crate::api::{BookingApi, BookingRequest, GuestFields};
use crate::errors::AppError;
use crate::models::{Identity, StaffChoice};
use crate::services::calendar::SlotSelection;
use crate::services::cart::SelectionCart;
use crate::services::slots;
use crate::services::tenant::TenantContext;

/// What the confirmation view shows once the server accepts a booking. The
/// selection cart is cleared only after this is acknowledged.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    pub appointment_id: String,
    pub datetime: String,
    pub services: Vec<String>,
    pub staff_name: String,
}

/// Assembles the booking request from the workflow state. Fails fast, before
/// any network call: empty selection, missing day/slot, and incomplete guest
/// identity are all rejected here.
pub fn build_request(
    tenant: &TenantContext,
    cart: &SelectionCart,
    staff: &StaffChoice,
    slot: Option<&SlotSelection>,
    identity: &Identity,
) -> Result<BookingRequest, AppError> {
    if cart.is_empty() {
        return Err(AppError::Validation(
            "select at least one service".to_string(),
        ));
    }
    let slot = slot.ok_or_else(|| {
        AppError::Validation("please select a date and time slot".to_string())
    })?;
    let time = slots::parse_label(&slot.time).ok_or_else(|| {
        AppError::Validation(format!("unrecognized time slot: {}", slot.time))
    })?;
    let datetime = slot.date.and_time(time).format("%Y-%m-%d %H:%M:%S").to_string();

    let guest = match identity {
        Identity::Authenticated { .. } => None,
        Identity::Guest(guest) => {
            if !guest.is_complete() {
                return Err(AppError::MissingGuestIdentity);
            }
            Some(GuestFields {
                name: guest.name.clone(),
                phone: guest.phone.clone(),
            })
        }
    };

    Ok(BookingRequest {
        datetime,
        tenant_id: tenant.tenant_id().to_string(),
        staff_id: staff.id().map(str::to_string),
        services: cart.service_ids().to_vec(),
        guest,
    })
}

/// Builds and submits the booking through the dual-identity protocol, then
/// shapes the confirmation view. On any failure no workflow state is cleared;
/// the error carries enough detail to render field-level messages.
pub async fn submit(
    api: &dyn BookingApi,
    tenant: &TenantContext,
    cart: &SelectionCart,
    staff: &StaffChoice,
    slot: Option<&SlotSelection>,
    identity: &Identity,
) -> Result<Confirmation, AppError> {
    let request = build_request(tenant, cart, staff, slot, identity)?;
    let token = match identity {
        Identity::Authenticated { token } => Some(token.as_str()),
        Identity::Guest(_) => None,
    };

    let appointment_id = api.book_appointment(token, &request).await?;
    tracing::info!("booked appointment {appointment_id} at {}", request.datetime);

    let services = cart
        .service_ids()
        .iter()
        .filter_map(|id| tenant.catalog().service(id))
        .map(|s| s.name.clone())
        .collect();

    Ok(Confirmation {
        appointment_id,
        datetime: request.datetime,
        services,
        staff_name: staff.display_name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::api::{RawCategory, RawService};
    use crate::models::{GuestIdentity, Staff};
    use crate::services::tenant::build_catalog;

    fn tenant_with_catalog() -> TenantContext {
        let mut ctx = TenantContext::new("t1", "Salon One");
        let catalog = build_catalog(
            &[RawCategory {
                id: "c1".to_string(),
                name: "Hair".to_string(),
            }],
            &[RawService {
                id: "s1".to_string(),
                name: "Cut".to_string(),
                duration: "30 minutes".to_string(),
                price: "$20.00".to_string(),
                category_id: "c1".to_string(),
            }],
        );
        ctx.apply_catalog("t1", catalog);
        ctx
    }

    fn slot() -> SlotSelection {
        SlotSelection {
            date: NaiveDate::from_ymd_opt(2025, 6, 16).unwrap(),
            time: "9:15 AM".to_string(),
        }
    }

    fn guest() -> Identity {
        Identity::Guest(GuestIdentity {
            name: "Ana".to_string(),
            phone: "+15551234567".to_string(),
            email: None,
        })
    }

    #[test]
    fn test_request_assembly_for_guest() {
        let tenant = tenant_with_catalog();
        let mut cart = SelectionCart::new();
        cart.add("s1", tenant.catalog());
        let slot = slot();

        let request =
            build_request(&tenant, &cart, &StaffChoice::Any, Some(&slot), &guest()).unwrap();
        assert_eq!(request.datetime, "2025-06-16 09:15:00");
        assert_eq!(request.tenant_id, "t1");
        assert_eq!(request.staff_id, None);
        assert_eq!(request.services, vec!["s1".to_string()]);
        assert_eq!(request.guest.as_ref().unwrap().name, "Ana");
    }

    #[test]
    fn test_authenticated_request_omits_guest_fields() {
        let tenant = tenant_with_catalog();
        let mut cart = SelectionCart::new();
        cart.add("s1", tenant.catalog());
        let staff = StaffChoice::Member(Staff {
            id: "st9".to_string(),
            name: "Mia".to_string(),
            email: None,
            image: None,
        });
        let identity = Identity::Authenticated {
            token: "tok".to_string(),
        };

        let slot = slot();
        let request = build_request(&tenant, &cart, &staff, Some(&slot), &identity).unwrap();
        assert_eq!(request.staff_id.as_deref(), Some("st9"));
        assert!(request.guest.is_none());
    }

    #[test]
    fn test_empty_cart_fails_fast() {
        let tenant = tenant_with_catalog();
        let cart = SelectionCart::new();
        let slot = slot();
        let err =
            build_request(&tenant, &cart, &StaffChoice::Any, Some(&slot), &guest()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_missing_slot_fails_fast() {
        let tenant = tenant_with_catalog();
        let mut cart = SelectionCart::new();
        cart.add("s1", tenant.catalog());
        let err = build_request(&tenant, &cart, &StaffChoice::Any, None, &guest()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_incomplete_guest_identity_fails_before_submission() {
        let tenant = tenant_with_catalog();
        let mut cart = SelectionCart::new();
        cart.add("s1", tenant.catalog());
        let slot = slot();
        let identity = Identity::Guest(GuestIdentity {
            name: String::new(),
            phone: "+15551234567".to_string(),
            email: None,
        });

        let err =
            build_request(&tenant, &cart, &StaffChoice::Any, Some(&slot), &identity).unwrap_err();
        assert!(matches!(err, AppError::MissingGuestIdentity));
    }

    #[test]
    fn test_afternoon_slot_converts_to_24h_datetime() {
        let tenant = tenant_with_catalog();
        let mut cart = SelectionCart::new();
        cart.add("s1", tenant.catalog());
        let slot = SlotSelection {
            date: NaiveDate::from_ymd_opt(2025, 6, 16).unwrap(),
            time: "2:45 PM".to_string(),
        };

        let request =
            build_request(&tenant, &cart, &StaffChoice::Any, Some(&slot), &guest()).unwrap();
        assert_eq!(request.datetime, "2025-06-16 14:45:00");
    }
}
