//! # bsa-directory
//!
//! Lookups into the bus and staff services.
//!
//! Handlers only see the [`BusDirectory`] and [`StaffDirectory`] traits. The
//! static implementations serve a fixed table; a client for the real
//! services implements the same traits.

use std::collections::HashMap;

use async_trait::async_trait;
use bsa_core::Id;
use bsa_models::{BusDetails, StaffDetails};

/// Source of bus attributes
#[async_trait]
pub trait BusDirectory: Send + Sync {
    /// Attributes of a bus, or `None` when the id is unknown
    async fn find_bus(&self, bus_id: Id) -> Option<BusDetails>;
}

/// Source of staff attributes
#[async_trait]
pub trait StaffDirectory: Send + Sync {
    /// Attributes of a staff member, or `None` when the id is unknown
    async fn find_staff(&self, staff_id: Id) -> Option<StaffDetails>;
}

/// Bus directory backed by a fixed table
#[derive(Debug, Clone, Default)]
pub struct StaticBusDirectory {
    buses: HashMap<Id, BusDetails>,
}

impl StaticBusDirectory {
    pub fn new(buses: HashMap<Id, BusDetails>) -> Self {
        Self { buses }
    }

    /// The buses known to the service until the bus service is wired in
    pub fn seeded() -> Self {
        Self::new(HashMap::from([
            (1, BusDetails::new("ABC-1234", "Toyota Coaster")),
            (2, BusDetails::new("XYZ-5678", "Isuzu NPR")),
        ]))
    }

    pub fn with_bus(mut self, bus_id: Id, details: BusDetails) -> Self {
        self.buses.insert(bus_id, details);
        self
    }
}

#[async_trait]
impl BusDirectory for StaticBusDirectory {
    async fn find_bus(&self, bus_id: Id) -> Option<BusDetails> {
        let found = self.buses.get(&bus_id).cloned();
        if found.is_none() {
            tracing::trace!(bus_id, "Bus not in directory");
        }
        found
    }
}

/// Staff directory backed by a fixed table
#[derive(Debug, Clone, Default)]
pub struct StaticStaffDirectory {
    staff: HashMap<Id, StaffDetails>,
}

impl StaticStaffDirectory {
    pub fn new(staff: HashMap<Id, StaffDetails>) -> Self {
        Self { staff }
    }

    /// The staff known to the service until the staff service is wired in
    pub fn seeded() -> Self {
        Self::new(HashMap::from([
            (1, StaffDetails::new("John Driver", "driver")),
            (2, StaffDetails::new("Jane Conductor", "conductor")),
        ]))
    }

    pub fn with_staff(mut self, staff_id: Id, details: StaffDetails) -> Self {
        self.staff.insert(staff_id, details);
        self
    }
}

#[async_trait]
impl StaffDirectory for StaticStaffDirectory {
    async fn find_staff(&self, staff_id: Id) -> Option<StaffDetails> {
        let found = self.staff.get(&staff_id).cloned();
        if found.is_none() {
            tracing::trace!(staff_id, "Staff member not in directory");
        }
        found
    }
}
