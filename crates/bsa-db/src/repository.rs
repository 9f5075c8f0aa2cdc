//! Repository traits
//!
//! Storage contracts for assignments. Handlers hold an
//! `Arc<dyn AssignmentStore>` so the backing store can be PostgreSQL or the
//! in-memory implementation.

use async_trait::async_trait;
use bsa_core::Id;
use bsa_models::{Assignment, AssignmentFields};

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Classify an error raised by a write, surfacing unique-key violations
    pub fn from_write(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepositoryError::Conflict(db_err.message().to_string())
            }
            _ => RepositoryError::Database(err),
        }
    }
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Base repository trait for CRUD operations
#[async_trait]
pub trait Repository<T, CreateDto, UpdateDto>: Send + Sync {
    /// Find an entity by ID; `None` when no row matches
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<T>>;

    /// All entities, newest first
    async fn find_all(&self) -> RepositoryResult<Vec<T>>;

    /// Create a new entity and return it as stored
    async fn create(&self, dto: CreateDto) -> RepositoryResult<T>;

    /// Overwrite an existing entity; `None` when the id matched no row
    async fn update(&self, id: Id, dto: UpdateDto) -> RepositoryResult<Option<T>>;

    /// Delete an entity by ID; `false` when there was nothing to delete
    async fn delete(&self, id: Id) -> RepositoryResult<bool>;
}

/// Assignment storage, with the per-bus and per-staff lookups
#[async_trait]
pub trait AssignmentStore: Repository<Assignment, AssignmentFields, AssignmentFields> {
    /// Assignments of one bus, any status, newest first
    async fn find_by_bus(&self, bus_id: Id) -> RepositoryResult<Vec<Assignment>>;

    /// Assignments of one staff member, any status, newest first
    async fn find_by_staff(&self, staff_id: Id) -> RepositoryResult<Vec<Assignment>>;

    /// Check that the store can serve queries
    async fn ping(&self) -> RepositoryResult<()>;
}
