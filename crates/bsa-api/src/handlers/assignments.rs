//! Assignment API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bsa_core::Id;
use bsa_models::{Assignment, AssignmentInput, AssignmentWithDetails};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::extractors::{path_id, ApiJson, AppState};

const INVALID_ASSIGNMENT_ID: &str = "Invalid assignment ID";
const NOT_FOUND: &str = "Assignment not found";

/// POST /api/assignments
pub async fn create_assignment(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<AssignmentInput>,
) -> ApiResult<impl IntoResponse> {
    let fields = input.into_fields()?;

    let assignment = state.store.create(fields).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to create assignment");
        ApiError::internal("Failed to create assignment")
    })?;

    tracing::info!(
        id = assignment.id,
        bus_id = assignment.bus_id,
        staff_id = assignment.staff_id,
        role = %assignment.role,
        "Assignment created"
    );
    Ok((StatusCode::CREATED, Json(assignment)))
}

/// GET /api/assignments
pub async fn list_assignments(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let rows = state.store.find_all().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to list assignments");
        ApiError::internal("Failed to retrieve assignments")
    })?;

    let mut assignments = Vec::with_capacity(rows.len());
    for row in rows {
        let bus = state.buses.find_bus(row.bus_id).await;
        let staff = state.staff.find_staff(row.staff_id).await;
        assignments.push(AssignmentWithDetails::new(row).with_bus(bus).with_staff(staff));
    }

    Ok(Json(AssignmentCollection::new(assignments)))
}

/// GET /api/assignments/:id
pub async fn get_assignment(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Assignment>> {
    let id = path_id(&raw_id, INVALID_ASSIGNMENT_ID)?;
    let assignment = find_existing(&state, id).await?;
    Ok(Json(assignment))
}

/// PUT /api/assignments/:id
///
/// Overwrites bus, staff, role and dates. The status is kept as stored.
pub async fn update_assignment(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<ApiJson<AssignmentInput>, ApiError>,
) -> ApiResult<Json<Assignment>> {
    let id = path_id(&raw_id, INVALID_ASSIGNMENT_ID)?;
    find_existing(&state, id).await?;

    let ApiJson(input) = body?;
    let fields = input.into_fields()?;

    // A concurrent delete between the lookup and the write leaves no row to update
    let assignment = state
        .store
        .update(id, fields)
        .await
        .map_err(|e| {
            tracing::error!(id, error = %e, "Failed to update assignment");
            ApiError::internal("Failed to update assignment")
        })?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    tracing::info!(id, "Assignment updated");
    Ok(Json(assignment))
}

/// DELETE /api/assignments/:id
pub async fn delete_assignment(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = path_id(&raw_id, INVALID_ASSIGNMENT_ID)?;
    find_existing(&state, id).await?;

    let deleted = state.store.delete(id).await.map_err(|e| {
        tracing::error!(id, error = %e, "Failed to delete assignment");
        ApiError::internal("Failed to delete assignment")
    })?;
    if !deleted {
        return Err(ApiError::not_found(NOT_FOUND));
    }

    tracing::info!(id, "Assignment deleted");
    Ok(Json(MessageResponse {
        message: "Assignment deleted successfully".into(),
    }))
}

/// GET /api/assignments/bus/:bus_id
///
/// Active assignments only, decorated with staff attributes.
pub async fn list_bus_assignments(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<BusAssignments>> {
    let bus_id = path_id(&raw_id, "Invalid bus ID")?;

    let rows = state.store.find_by_bus(bus_id).await.map_err(|e| {
        tracing::error!(bus_id, error = %e, "Failed to list bus assignments");
        ApiError::internal("Failed to retrieve assignments")
    })?;

    let mut assignments = Vec::new();
    for row in rows.into_iter().filter(|a| a.status.is_active()) {
        let staff = state.staff.find_staff(row.staff_id).await;
        assignments.push(AssignmentWithDetails::new(row).with_staff(staff));
    }

    Ok(Json(BusAssignments {
        bus_id,
        count: assignments.len(),
        assignments,
    }))
}

/// GET /api/assignments/staff/:staff_id
///
/// Every assignment of the staff member regardless of status, decorated with
/// bus attributes.
pub async fn list_staff_assignments(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<StaffAssignments>> {
    let staff_id = path_id(&raw_id, "Invalid staff ID")?;

    let rows = state.store.find_by_staff(staff_id).await.map_err(|e| {
        tracing::error!(staff_id, error = %e, "Failed to list staff assignments");
        ApiError::internal("Failed to retrieve assignments")
    })?;

    let mut assignments = Vec::with_capacity(rows.len());
    for row in rows {
        let bus = state.buses.find_bus(row.bus_id).await;
        assignments.push(AssignmentWithDetails::new(row).with_bus(bus));
    }

    Ok(Json(StaffAssignments {
        staff_id,
        count: assignments.len(),
        assignments,
    }))
}

async fn find_existing(state: &AppState, id: Id) -> ApiResult<Assignment> {
    state
        .store
        .find_by_id(id)
        .await
        .map_err(|e| {
            tracing::error!(id, error = %e, "Failed to load assignment");
            ApiError::internal("Database error")
        })?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

// Response types
#[derive(Debug, Serialize, Deserialize)]
pub struct AssignmentCollection {
    pub assignments: Vec<AssignmentWithDetails>,
    pub count: usize,
}

impl AssignmentCollection {
    pub fn new(assignments: Vec<AssignmentWithDetails>) -> Self {
        Self {
            count: assignments.len(),
            assignments,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BusAssignments {
    pub bus_id: Id,
    pub assignments: Vec<AssignmentWithDetails>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StaffAssignments {
    pub staff_id: Id,
    pub assignments: Vec<AssignmentWithDetails>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
