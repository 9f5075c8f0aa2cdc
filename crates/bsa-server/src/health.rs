//! Health checks
//!
//! `/health` only reports that the process is serving; `/health/ready` also
//! checks that the assignment store answers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use bsa_api::AppState;
use serde::{Deserialize, Serialize};

pub const SERVICE_NAME: &str = "bus-staff-assignment";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Up,
    Down,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Liveness {
    pub status: HealthStatus,
    pub service: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Readiness {
    pub status: HealthStatus,
    pub database: ComponentStatus,
}

impl Readiness {
    pub fn http_status(&self) -> StatusCode {
        match self.status {
            HealthStatus::Ok => StatusCode::OK,
            HealthStatus::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Liveness check
pub async fn liveness() -> Json<Liveness> {
    Json(Liveness {
        status: HealthStatus::Ok,
        service: SERVICE_NAME.to_string(),
    })
}

/// Readiness check
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<Readiness>) {
    let report = match state.store.ping().await {
        Ok(()) => Readiness {
            status: HealthStatus::Ok,
            database: ComponentStatus::Up,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            Readiness {
                status: HealthStatus::Unavailable,
                database: ComponentStatus::Down,
            }
        }
    };

    (report.http_status(), Json(report))
}
