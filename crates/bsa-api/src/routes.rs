//! API routes

use axum::{
    routing::{get, post},
    Router,
};

use crate::extractors::AppState;
use crate::handlers::assignments;

/// Create the `/api` router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api", assignments_router())
}

fn assignments_router() -> Router<AppState> {
    Router::new()
        .route(
            "/assignments",
            post(assignments::create_assignment).get(assignments::list_assignments),
        )
        .route(
            "/assignments/:id",
            get(assignments::get_assignment)
                .put(assignments::update_assignment)
                .delete(assignments::delete_assignment),
        )
        .route(
            "/assignments/bus/:bus_id",
            get(assignments::list_bus_assignments),
        )
        .route(
            "/assignments/staff/:staff_id",
            get(assignments::list_staff_assignments),
        )
}
