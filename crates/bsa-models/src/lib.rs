//! # bsa-models
//!
//! Domain models for the bus staff assignment service.

pub mod assignment;
pub mod details;
pub mod input;

pub use assignment::{
    Assignment, AssignmentRole, AssignmentStatus, AssignmentWithDetails, UnknownVariant,
};
pub use details::{BusDetails, StaffDetails};
pub use input::{AssignmentFields, AssignmentInput, InputError, DATE_FORMAT};
