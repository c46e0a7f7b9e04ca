pub mod appointment;
pub mod identity;
pub mod service;
pub mod staff;
pub mod working_hours;

pub use appointment::{Appointment, AppointmentService};
pub use identity::{GuestIdentity, Identity};
pub use service::{Catalog, Category, Service, ALL_CATEGORIES};
pub use staff::{Staff, StaffChoice, ANY_STAFF_ID};
pub use working_hours::{RawWorkingHours, WeekSchedule, WorkingHours};
