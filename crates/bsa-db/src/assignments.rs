//! Assignments repository
//!
//! Table: assignments

use async_trait::async_trait;
use bsa_core::Id;
use bsa_models::{Assignment, AssignmentFields, AssignmentStatus};
use sqlx::PgPool;

use crate::{AssignmentStore, Repository, RepositoryError, RepositoryResult};

/// Assignment repository
pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Assignment, AssignmentFields, AssignmentFields> for AssignmentRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Assignment>> {
        let row = sqlx::query_as::<_, Assignment>(
            r#"
            SELECT id, bus_id, staff_id, role, start_date, end_date, status, created_at, updated_at
            FROM assignments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Assignment>> {
        let rows = sqlx::query_as::<_, Assignment>(
            r#"
            SELECT id, bus_id, staff_id, role, start_date, end_date, status, created_at, updated_at
            FROM assignments
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn create(&self, dto: AssignmentFields) -> RepositoryResult<Assignment> {
        let row = sqlx::query_as::<_, Assignment>(
            r#"
            INSERT INTO assignments (bus_id, staff_id, role, start_date, end_date, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, bus_id, staff_id, role, start_date, end_date, status, created_at, updated_at
            "#,
        )
        .bind(dto.bus_id)
        .bind(dto.staff_id)
        .bind(dto.role.as_str())
        .bind(dto.start_date)
        .bind(dto.end_date)
        .bind(AssignmentStatus::Active.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        tracing::debug!(id = row.id, bus_id = row.bus_id, staff_id = row.staff_id, "Assignment created");
        Ok(row)
    }

    async fn update(&self, id: Id, dto: AssignmentFields) -> RepositoryResult<Option<Assignment>> {
        // status is left as stored
        let row = sqlx::query_as::<_, Assignment>(
            r#"
            UPDATE assignments
            SET bus_id = $2, staff_id = $3, role = $4, start_date = $5, end_date = $6,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING id, bus_id, staff_id, role, start_date, end_date, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(dto.bus_id)
        .bind(dto.staff_id)
        .bind(dto.role.as_str())
        .bind(dto.start_date)
        .bind(dto.end_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(row)
    }

    async fn delete(&self, id: Id) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM assignments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl AssignmentStore for AssignmentRepository {
    async fn find_by_bus(&self, bus_id: Id) -> RepositoryResult<Vec<Assignment>> {
        let rows = sqlx::query_as::<_, Assignment>(
            r#"
            SELECT id, bus_id, staff_id, role, start_date, end_date, status, created_at, updated_at
            FROM assignments
            WHERE bus_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(bus_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_by_staff(&self, staff_id: Id) -> RepositoryResult<Vec<Assignment>> {
        let rows = sqlx::query_as::<_, Assignment>(
            r#"
            SELECT id, bus_id, staff_id, role, start_date, end_date, status, created_at, updated_at
            FROM assignments
            WHERE staff_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(staff_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
