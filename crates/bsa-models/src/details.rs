//! Attributes owned by the bus and staff services

use serde::{Deserialize, Serialize};

/// Bus attributes shown next to an assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusDetails {
    pub plate_number: String,
    pub model: String,
}

impl BusDetails {
    pub fn new(plate_number: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            plate_number: plate_number.into(),
            model: model.into(),
        }
    }
}

/// Staff attributes shown next to an assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffDetails {
    pub name: String,
    pub position: String,
}

impl StaffDetails {
    pub fn new(name: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: position.into(),
        }
    }
}
