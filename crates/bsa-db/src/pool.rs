//! Database connection pool management
//!
//! Provides PostgreSQL connection pooling using SQLx and creates the
//! assignments table on startup.

use bsa_core::config::DatabaseConfig;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Statements run by [`Database::ensure_schema`], in order. Each one is
/// idempotent.
pub const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS assignments (
        id SERIAL PRIMARY KEY,
        bus_id INTEGER NOT NULL,
        staff_id INTEGER NOT NULL,
        role VARCHAR(20) NOT NULL CHECK (role IN ('driver', 'conductor')),
        start_date DATE NOT NULL,
        end_date DATE,
        status VARCHAR(20) NOT NULL DEFAULT 'active'
            CHECK (status IN ('active', 'completed', 'cancelled')),
        created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        UNIQUE (bus_id, staff_id, role, start_date)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_assignments_bus_id ON assignments(bus_id)",
    "CREATE INDEX IF NOT EXISTS idx_assignments_staff_id ON assignments(staff_id)",
    "CREATE INDEX IF NOT EXISTS idx_assignments_status ON assignments(status)",
    "CREATE INDEX IF NOT EXISTS idx_assignments_start_date ON assignments(start_date)",
];

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .max_lifetime(Duration::from_secs(config.max_lifetime_seconds))
            .connect(&config.url)
            .await?;

        tracing::info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check if the database is reachable
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Create the assignments table and its indexes if they are missing
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        for statement in SCHEMA {
            sqlx::query(*statement).execute(&self.pool).await?;
        }

        tracing::info!("Assignments table ready");
        Ok(())
    }

    /// Close the connection pool
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }

    /// Get pool statistics
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            size: self.pool.size(),
            idle: self.pool.num_idle(),
        }
    }
}

/// Pool statistics
#[derive(Debug, Clone)]
pub struct PoolStats {
    pub size: u32,
    pub idle: usize,
}
