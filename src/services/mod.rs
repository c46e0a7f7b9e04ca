pub mod auth;
pub mod booking;
pub mod calendar;
pub mod cart;
pub mod ledger;
pub mod slots;
pub mod staff_select;
pub mod tenant;
pub mod workflow;
