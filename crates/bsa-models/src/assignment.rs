//! Assignment model
//!
//! Table: assignments
//!
//! Links one staff member to one bus, for a role and a date range. Bus and
//! staff ids reference records owned by other services and are not checked
//! for existence here.

use bsa_core::Id;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::details::{BusDetails, StaffDetails};

/// Raised when a stored or submitted string names no known variant
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// What the staff member does on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentRole {
    Driver,
    Conductor,
}

impl AssignmentRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentRole::Driver => "driver",
            AssignmentRole::Conductor => "conductor",
        }
    }
}

impl FromStr for AssignmentRole {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "driver" => Ok(AssignmentRole::Driver),
            "conductor" => Ok(AssignmentRole::Conductor),
            other => Err(UnknownVariant {
                kind: "role",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for AssignmentRole {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for AssignmentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of an assignment
///
/// New assignments are always `Active`; nothing in the API moves them to
/// `Completed` or `Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Active => "active",
            AssignmentStatus::Completed => "completed",
            AssignmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, AssignmentStatus::Active)
    }
}

impl FromStr for AssignmentStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AssignmentStatus::Active),
            "completed" => Ok(AssignmentStatus::Completed),
            "cancelled" => Ok(AssignmentStatus::Cancelled),
            other => Err(UnknownVariant {
                kind: "status",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for AssignmentStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored bus/staff assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Assignment {
    pub id: Id,
    pub bus_id: Id,
    pub staff_id: Id,
    #[sqlx(try_from = "String")]
    pub role: AssignmentRole,
    /// Serialized as `YYYY-MM-DD`
    pub start_date: NaiveDate,
    /// Open-ended when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[sqlx(try_from = "String")]
    pub status: AssignmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Read-only projection of an assignment decorated with bus and staff
/// attributes. Attributes that could not be looked up are left out of the
/// JSON entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentWithDetails {
    #[serde(flatten)]
    pub assignment: Assignment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bus_plate_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bus_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_position: Option<String>,
}

impl AssignmentWithDetails {
    pub fn new(assignment: Assignment) -> Self {
        Self {
            assignment,
            bus_plate_number: None,
            bus_model: None,
            staff_name: None,
            staff_position: None,
        }
    }

    /// Fill in the bus attributes, if the lookup found any
    pub fn with_bus(mut self, bus: Option<BusDetails>) -> Self {
        if let Some(bus) = bus {
            self.bus_plate_number = Some(bus.plate_number);
            self.bus_model = Some(bus.model);
        }
        self
    }

    /// Fill in the staff attributes, if the lookup found any
    pub fn with_staff(mut self, staff: Option<StaffDetails>) -> Self {
        if let Some(staff) = staff {
            self.staff_name = Some(staff.name);
            self.staff_position = Some(staff.position);
        }
        self
    }
}

impl From<Assignment> for AssignmentWithDetails {
    fn from(assignment: Assignment) -> Self {
        Self::new(assignment)
    }
}
