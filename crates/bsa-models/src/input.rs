//! Assignment request body
//!
//! Create and update accept the same body. Presence is checked with
//! `validator`; dates and role are parsed afterwards so each failure gets its
//! own message.

use bsa_core::{Id, ValidationErrors};
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use validator::Validate;

use crate::assignment::AssignmentRole;

/// Accepted calendar date layout
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw assignment body as submitted by clients
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AssignmentInput {
    // `range` needs the integer type spelled out, not the `Id` alias
    #[validate(required, range(min = 1))]
    pub bus_id: Option<i32>,

    #[validate(required, range(min = 1))]
    pub staff_id: Option<i32>,

    #[validate(required, length(min = 1))]
    pub role: Option<String>,

    /// YYYY-MM-DD
    #[validate(required, length(min = 1))]
    pub start_date: Option<String>,

    /// YYYY-MM-DD; empty or missing means open-ended
    pub end_date: Option<String>,
}

/// Checked assignment attributes, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentFields {
    pub bus_id: Id,
    pub staff_id: Id,
    pub role: AssignmentRole,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("{}", .0.full_messages().join(", "))]
    Missing(ValidationErrors),

    #[error("Invalid start_date format. Use YYYY-MM-DD")]
    StartDate,

    #[error("Invalid end_date format. Use YYYY-MM-DD")]
    EndDate,

    #[error("Role must be 'driver' or 'conductor'")]
    Role,
}

impl AssignmentInput {
    /// Check the body and convert it into typed fields
    pub fn into_fields(self) -> Result<AssignmentFields, InputError> {
        self.validate()
            .map_err(|e| InputError::Missing(ValidationErrors::from(e)))?;

        let (Some(bus_id), Some(staff_id), Some(role), Some(start_date)) =
            (self.bus_id, self.staff_id, self.role, self.start_date)
        else {
            let mut errors = ValidationErrors::new();
            errors.add_base("bus_id, staff_id, role and start_date are required");
            return Err(InputError::Missing(errors));
        };

        let start_date = parse_date(&start_date).ok_or(InputError::StartDate)?;

        let end_date = match self.end_date.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(parse_date(raw).ok_or(InputError::EndDate)?),
        };

        let role = role.parse::<AssignmentRole>().map_err(|_| InputError::Role)?;

        Ok(AssignmentFields {
            bus_id,
            staff_id,
            role,
            start_date,
            end_date,
        })
    }
}

/// Parse a date written exactly as `YYYY-MM-DD`, zero padded, no sign or spaces
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let canonical = raw.len() == 10
        && raw.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !canonical {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}
