use chrono::NaiveDate;

use crate::api::BookingApi;
use crate::errors::AppError;
use crate::models::{Catalog, Identity, Staff, StaffChoice};
use crate::services::booking::{self, Confirmation};
use crate::services::calendar::DaySelection;
use crate::services::cart::SelectionCart;
use crate::services::staff_select::StaffSelector;
use crate::services::tenant::TenantContext;

/// The named steps of the booking path. Each step owns only the state it
/// needs and hands it to the next step explicitly.
#[derive(Debug, Clone)]
pub enum WorkflowStep {
    CatalogBrowsing,
    ServiceSelection {
        cart: SelectionCart,
    },
    StaffSelection {
        cart: SelectionCart,
        selector: StaffSelector,
    },
    SlotSelection {
        cart: SelectionCart,
        staff: StaffChoice,
        days: DaySelection,
    },
    /// The cart survives here until the confirmation is acknowledged; a
    /// failed submission never reaches this step.
    Confirmed {
        cart: SelectionCart,
        confirmation: Confirmation,
    },
}

impl WorkflowStep {
    fn name(&self) -> &'static str {
        match self {
            WorkflowStep::CatalogBrowsing => "catalog browsing",
            WorkflowStep::ServiceSelection { .. } => "service selection",
            WorkflowStep::StaffSelection { .. } => "staff selection",
            WorkflowStep::SlotSelection { .. } => "slot selection",
            WorkflowStep::Confirmed { .. } => "confirmation",
        }
    }
}

/// One customer's pass through the booking flow for one tenant. The identity
/// is fixed when the flow starts and threaded through to submission.
#[derive(Debug, Clone)]
pub struct BookingWorkflow {
    tenant: TenantContext,
    identity: Identity,
    step: WorkflowStep,
    last_staff_id: Option<String>,
}

impl BookingWorkflow {
    pub fn new(tenant: TenantContext, identity: Identity) -> Self {
        Self {
            tenant,
            identity,
            step: WorkflowStep::CatalogBrowsing,
            last_staff_id: None,
        }
    }

    pub fn step(&self) -> &WorkflowStep {
        &self.step
    }

    pub fn tenant(&self) -> &TenantContext {
        &self.tenant
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn cart(&self) -> Option<&SelectionCart> {
        match &self.step {
            WorkflowStep::CatalogBrowsing => None,
            WorkflowStep::ServiceSelection { cart }
            | WorkflowStep::StaffSelection { cart, .. }
            | WorkflowStep::SlotSelection { cart, .. }
            | WorkflowStep::Confirmed { cart, .. } => Some(cart),
        }
    }

    /// Applies a freshly fetched catalog. A result for a stale tenant is
    /// dropped; on success the cart (if any) is recomputed against the new
    /// catalog so its totals never trail behind.
    pub fn catalog_updated(&mut self, fetched_for: &str, catalog: Catalog) -> bool {
        if !self.tenant.apply_catalog(fetched_for, catalog) {
            return false;
        }
        let catalog = self.tenant.catalog().clone();
        match &mut self.step {
            WorkflowStep::ServiceSelection { cart }
            | WorkflowStep::StaffSelection { cart, .. }
            | WorkflowStep::SlotSelection { cart, .. } => cart.recompute(&catalog),
            WorkflowStep::CatalogBrowsing | WorkflowStep::Confirmed { .. } => {}
        }
        true
    }

    /// Enters the booking path by picking the first service.
    pub fn begin_selection(&mut self, service_id: &str) -> Result<(), AppError> {
        match &self.step {
            WorkflowStep::CatalogBrowsing => {
                let mut cart = SelectionCart::new();
                cart.add(service_id, self.tenant.catalog());
                if cart.is_empty() {
                    return Err(AppError::Validation(format!(
                        "unknown service: {service_id}"
                    )));
                }
                self.step = WorkflowStep::ServiceSelection { cart };
                Ok(())
            }
            other => Err(wrong_step(other, "catalog browsing")),
        }
    }

    pub fn add_service(&mut self, service_id: &str) -> Result<(), AppError> {
        let catalog = self.tenant.catalog().clone();
        match &mut self.step {
            WorkflowStep::ServiceSelection { cart } => {
                cart.add(service_id, &catalog);
                Ok(())
            }
            other => Err(wrong_step(other, "service selection")),
        }
    }

    /// Removing services stays available through the staff step, mirroring
    /// the cart summary shown there. The one-service floor applies.
    pub fn remove_service(&mut self, service_id: &str) -> Result<(), AppError> {
        let catalog = self.tenant.catalog().clone();
        match &mut self.step {
            WorkflowStep::ServiceSelection { cart }
            | WorkflowStep::StaffSelection { cart, .. } => cart.remove(service_id, &catalog),
            other => Err(wrong_step(other, "service or staff selection")),
        }
    }

    pub fn to_staff_selection(&mut self, staff: Vec<Staff>) -> Result<(), AppError> {
        match std::mem::replace(&mut self.step, WorkflowStep::CatalogBrowsing) {
            WorkflowStep::ServiceSelection { cart } => {
                if cart.is_empty() {
                    self.step = WorkflowStep::ServiceSelection { cart };
                    return Err(AppError::Validation(
                        "select at least one service".to_string(),
                    ));
                }
                let selector = StaffSelector::new(staff, self.last_staff_id.as_deref());
                self.step = WorkflowStep::StaffSelection { cart, selector };
                Ok(())
            }
            other => {
                let err = wrong_step(&other, "service selection");
                self.step = other;
                Err(err)
            }
        }
    }

    pub fn select_staff(&mut self, id: &str) -> Result<(), AppError> {
        match &mut self.step {
            WorkflowStep::StaffSelection { selector, .. } => selector.select(id),
            other => Err(wrong_step(other, "staff selection")),
        }
    }

    /// Returns from staff selection to service selection, keeping the cart.
    pub fn back_to_services(&mut self) -> Result<(), AppError> {
        match std::mem::replace(&mut self.step, WorkflowStep::CatalogBrowsing) {
            WorkflowStep::StaffSelection { cart, selector } => {
                self.last_staff_id = selector.choice().id().map(str::to_string);
                self.step = WorkflowStep::ServiceSelection { cart };
                Ok(())
            }
            other => {
                let err = wrong_step(&other, "staff selection");
                self.step = other;
                Err(err)
            }
        }
    }

    pub fn to_slot_selection(&mut self) -> Result<(), AppError> {
        match std::mem::replace(&mut self.step, WorkflowStep::CatalogBrowsing) {
            WorkflowStep::StaffSelection { cart, selector } => {
                let staff = selector.choice().clone();
                self.last_staff_id = staff.id().map(str::to_string);
                self.step = WorkflowStep::SlotSelection {
                    cart,
                    staff,
                    days: DaySelection::new(),
                };
                Ok(())
            }
            other => {
                let err = wrong_step(&other, "staff selection");
                self.step = other;
                Err(err)
            }
        }
    }

    pub fn toggle_day(&mut self, date: NaiveDate, today: NaiveDate) -> Result<(), AppError> {
        let schedule = self.tenant.schedule().clone();
        match &mut self.step {
            WorkflowStep::SlotSelection { days, .. } => days.toggle_day(date, today, &schedule),
            other => Err(wrong_step(other, "slot selection")),
        }
    }

    pub fn choose_slot(&mut self, label: &str) -> Result<(), AppError> {
        match &mut self.step {
            WorkflowStep::SlotSelection { days, .. } => days.choose_slot(label),
            other => Err(wrong_step(other, "slot selection")),
        }
    }

    pub fn day_selection(&self) -> Option<&DaySelection> {
        match &self.step {
            WorkflowStep::SlotSelection { days, .. } => Some(days),
            _ => None,
        }
    }

    /// Submits the booking. On success the flow moves to the confirmation
    /// step; on any error every piece of entered state stays where it was.
    pub async fn submit(&mut self, api: &dyn BookingApi) -> Result<&Confirmation, AppError> {
        let (cart, staff, days) = match &self.step {
            WorkflowStep::SlotSelection { cart, staff, days } => (cart, staff, days),
            other => return Err(wrong_step(other, "slot selection")),
        };

        let slot = days.selection();
        let confirmation = booking::submit(
            api,
            &self.tenant,
            cart,
            staff,
            slot.as_ref(),
            &self.identity,
        )
        .await?;

        let cart = cart.clone();
        self.step = WorkflowStep::Confirmed { cart, confirmation };
        match &self.step {
            WorkflowStep::Confirmed { confirmation, .. } => Ok(confirmation),
            _ => unreachable!(),
        }
    }

    /// Acknowledging the confirmation destroys the selection state and
    /// returns to the catalog.
    pub fn acknowledge_confirmation(&mut self) -> Result<(), AppError> {
        match &self.step {
            WorkflowStep::Confirmed { .. } => {
                self.step = WorkflowStep::CatalogBrowsing;
                Ok(())
            }
            other => Err(wrong_step(other, "confirmation")),
        }
    }

    /// Navigating back to the catalog abandons the flow and resets the
    /// selection.
    pub fn abandon(&mut self) {
        self.step = WorkflowStep::CatalogBrowsing;
    }
}

fn wrong_step(current: &WorkflowStep, expected: &str) -> AppError {
    AppError::Validation(format!(
        "not available during {} (expected {expected})",
        current.name()
    ))
}
