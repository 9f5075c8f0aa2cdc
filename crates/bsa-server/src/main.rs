//! Bus Staff Assignment Server
//!
//! HTTP server recording which driver or conductor works on which bus.

use std::sync::Arc;

use anyhow::Context;
use axum::{http::Method, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bsa_api::AppState;
use bsa_core::{AppConfig, ServiceMode};
use bsa_db::{AssignmentRepository, Database};

mod health;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    let config = AppConfig::load().context("Failed to load configuration")?;

    init_tracing(config.mode);
    if dotenv.is_err() {
        info!("No .env file found");
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        mode = ?config.mode,
        bus_service_url = %config.upstream.bus_service_url,
        staff_service_url = %config.upstream.staff_service_url,
        "Starting bus staff assignment service"
    );

    // No degraded mode: the service does not start without its database
    let db = Database::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    db.ping().await.context("Database is not reachable")?;
    db.ensure_schema()
        .await
        .context("Failed to create assignments table")?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database, assignments schema ready"
    );

    let store = Arc::new(AssignmentRepository::new(db.pool().clone()));
    let app = build_router(AppState::with_static_directories(store));

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let stats = db.stats();
    info!(size = stats.size, idle = stats.idle, "Closing database pool");
    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(mode: ServiceMode) {
    let default_filter = match mode {
        ServiceMode::Debug => "debug,tower_http=debug,sqlx=warn",
        ServiceMode::Release => "info,sqlx=warn",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());
    let registry = tracing_subscriber::registry().with(filter);

    match mode {
        ServiceMode::Debug => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init(),
        ServiceMode::Release => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init(),
    }
}

/// Build the application router
fn build_router(state: AppState) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    Router::new()
        .merge(health_routes)
        .merge(bsa_api::router())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer()),
        )
}

/// Any origin may call the API; preflight requests are answered here
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use bsa_core::Id;
    use bsa_db::{
        AssignmentStore, InMemoryAssignmentStore, Repository, RepositoryError, RepositoryResult,
    };
    use bsa_models::{Assignment, AssignmentFields};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_app() -> Router {
        build_router(AppState::with_static_directories(Arc::new(
            InMemoryAssignmentStore::new(),
        )))
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "status": "ok", "service": "bus-staff-assignment" })
        );
    }

    #[tokio::test]
    async fn test_ready_endpoint() {
        let response = test_app()
            .oneshot(Request::builder().uri("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "status": "ok", "database": "up" })
        );
    }

    struct DownStore;

    #[async_trait]
    impl Repository<Assignment, AssignmentFields, AssignmentFields> for DownStore {
        async fn find_by_id(&self, _id: Id) -> RepositoryResult<Option<Assignment>> {
            Err(down())
        }

        async fn find_all(&self) -> RepositoryResult<Vec<Assignment>> {
            Err(down())
        }

        async fn create(&self, _dto: AssignmentFields) -> RepositoryResult<Assignment> {
            Err(down())
        }

        async fn update(
            &self,
            _id: Id,
            _dto: AssignmentFields,
        ) -> RepositoryResult<Option<Assignment>> {
            Err(down())
        }

        async fn delete(&self, _id: Id) -> RepositoryResult<bool> {
            Err(down())
        }
    }

    #[async_trait]
    impl AssignmentStore for DownStore {
        async fn find_by_bus(&self, _bus_id: Id) -> RepositoryResult<Vec<Assignment>> {
            Err(down())
        }

        async fn find_by_staff(&self, _staff_id: Id) -> RepositoryResult<Vec<Assignment>> {
            Err(down())
        }

        async fn ping(&self) -> RepositoryResult<()> {
            Err(down())
        }
    }

    fn down() -> RepositoryError {
        RepositoryError::Database(sqlx::Error::PoolClosed)
    }

    #[tokio::test]
    async fn test_ready_endpoint_reports_store_down() {
        let app = build_router(AppState::with_static_directories(Arc::new(DownStore)));
        let response = app
            .oneshot(Request::builder().uri("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            json_body(response).await,
            json!({ "status": "unavailable", "database": "down" })
        );
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_any_origin() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/assignments")
                    .header(header::ORIGIN, "http://dashboard.example.com")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_success());
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let methods = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap();
        assert!(methods.contains("PUT"));
        assert!(methods.contains("DELETE"));
    }

    #[tokio::test]
    async fn test_api_routes_are_mounted() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/assignments")
                    .header(header::ORIGIN, "http://dashboard.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            json_body(response).await,
            json!({ "assignments": [], "count": 0 })
        );
    }
}
