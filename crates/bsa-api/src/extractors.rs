//! Application state and request extractors

use std::sync::Arc;

use axum::extract::FromRequest;
use bsa_core::{parse_id, Id};
use bsa_db::AssignmentStore;
use bsa_directory::{BusDirectory, StaffDirectory, StaticBusDirectory, StaticStaffDirectory};

use crate::error::ApiError;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AssignmentStore>,
    pub buses: Arc<dyn BusDirectory>,
    pub staff: Arc<dyn StaffDirectory>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn AssignmentStore>,
        buses: Arc<dyn BusDirectory>,
        staff: Arc<dyn StaffDirectory>,
    ) -> Self {
        Self { store, buses, staff }
    }

    /// State backed by the fixed bus and staff tables
    pub fn with_static_directories(store: Arc<dyn AssignmentStore>) -> Self {
        Self::new(
            store,
            Arc::new(StaticBusDirectory::seeded()),
            Arc::new(StaticStaffDirectory::seeded()),
        )
    }
}

/// JSON body extractor whose rejections render as 400 `{"error": ...}`
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Parse an integer path segment, failing with `message` as a bad request
pub fn path_id(raw: &str, message: &'static str) -> Result<Id, ApiError> {
    parse_id(raw).ok_or_else(|| ApiError::bad_request(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_id() {
        assert_eq!(path_id("12", "Invalid bus ID").unwrap(), 12);

        let err = path_id("twelve", "Invalid bus ID").unwrap_err();
        assert_eq!(err.message(), "Invalid bus ID");
    }
}
