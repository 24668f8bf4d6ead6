//! Clearance: assigning receipts, payments, and notes against the
//! transactions they settle.

pub mod assignment;
pub mod error;
pub mod service;

#[cfg(test)]
mod service_props;

pub use assignment::{Assignment, ForexAdjustment};
pub use error::ClearanceError;
pub use service::{AssignmentLog, ClearingService};
