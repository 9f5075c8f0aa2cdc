//! # bsa-db
//!
//! Database layer for the bus staff assignment service.
//!
//! - Connection pool management and schema bootstrap
//! - Repository traits for assignment storage
//! - PostgreSQL repository backed by SQLx
//! - In-memory store with the same semantics, for tests and local runs
//!
//! ## Example
//!
//! ```ignore
//! use bsa_db::{AssignmentRepository, Database, Repository};
//!
//! let db = Database::connect(&config.database).await?;
//! db.ensure_schema().await?;
//!
//! let repo = AssignmentRepository::new(db.pool().clone());
//! let assignment = repo.find_by_id(1).await?;
//! ```

pub mod assignments;
pub mod memory;
pub mod pool;
pub mod repository;

// Re-exports
pub use assignments::AssignmentRepository;
pub use memory::InMemoryAssignmentStore;
pub use pool::{Database, PoolStats};
pub use repository::{AssignmentStore, Repository, RepositoryError, RepositoryResult};
