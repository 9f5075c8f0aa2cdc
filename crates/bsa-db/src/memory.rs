//! In-memory assignment store
//!
//! Same ordering and uniqueness rules as the PostgreSQL table. Used by the
//! HTTP tests and for running the service without a database.

use async_trait::async_trait;
use bsa_core::Id;
use bsa_models::{Assignment, AssignmentFields, AssignmentStatus};
use chrono::Utc;
use parking_lot::RwLock;
use std::cmp::Reverse;

use crate::{AssignmentStore, Repository, RepositoryError, RepositoryResult};

#[derive(Default)]
struct State {
    last_id: Id,
    rows: Vec<Assignment>,
}

impl State {
    fn conflicts(&self, fields: &AssignmentFields, exclude_id: Option<Id>) -> bool {
        self.rows.iter().any(|row| {
            Some(row.id) != exclude_id
                && row.bus_id == fields.bus_id
                && row.staff_id == fields.staff_id
                && row.role == fields.role
                && row.start_date == fields.start_date
        })
    }

    fn newest_first<F>(&self, filter: F) -> Vec<Assignment>
    where
        F: Fn(&Assignment) -> bool,
    {
        let mut rows: Vec<Assignment> = self.rows.iter().filter(|r| filter(r)).cloned().collect();
        rows.sort_by_key(|r| Reverse((r.created_at, r.id)));
        rows
    }
}

/// Assignment store kept in process memory
#[derive(Default)]
pub struct InMemoryAssignmentStore {
    state: RwLock<State>,
}

impl InMemoryAssignmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored assignments
    pub fn len(&self) -> usize {
        self.state.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Change the status of a stored assignment, as the out-of-band
    /// completion/cancellation process would. Returns `false` for unknown ids.
    pub fn set_status(&self, id: Id, status: AssignmentStatus) -> bool {
        let mut state = self.state.write();
        match state.rows.iter_mut().find(|r| r.id == id) {
            Some(row) => {
                row.status = status;
                row.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }
}

fn duplicate(fields: &AssignmentFields) -> RepositoryError {
    RepositoryError::Conflict(format!(
        "assignment of staff {} as {} on bus {} starting {} already exists",
        fields.staff_id, fields.role, fields.bus_id, fields.start_date
    ))
}

#[async_trait]
impl Repository<Assignment, AssignmentFields, AssignmentFields> for InMemoryAssignmentStore {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Assignment>> {
        Ok(self.state.read().rows.iter().find(|r| r.id == id).cloned())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Assignment>> {
        Ok(self.state.read().newest_first(|_| true))
    }

    async fn create(&self, dto: AssignmentFields) -> RepositoryResult<Assignment> {
        let mut state = self.state.write();
        if state.conflicts(&dto, None) {
            return Err(duplicate(&dto));
        }

        state.last_id += 1;
        let now = Utc::now();
        let row = Assignment {
            id: state.last_id,
            bus_id: dto.bus_id,
            staff_id: dto.staff_id,
            role: dto.role,
            start_date: dto.start_date,
            end_date: dto.end_date,
            status: AssignmentStatus::Active,
            created_at: now,
            updated_at: now,
        };
        state.rows.push(row.clone());

        Ok(row)
    }

    async fn update(&self, id: Id, dto: AssignmentFields) -> RepositoryResult<Option<Assignment>> {
        let mut state = self.state.write();
        if !state.rows.iter().any(|r| r.id == id) {
            return Ok(None);
        }
        if state.conflicts(&dto, Some(id)) {
            return Err(duplicate(&dto));
        }

        let Some(row) = state.rows.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        row.bus_id = dto.bus_id;
        row.staff_id = dto.staff_id;
        row.role = dto.role;
        row.start_date = dto.start_date;
        row.end_date = dto.end_date;
        row.updated_at = Utc::now();

        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: Id) -> RepositoryResult<bool> {
        let mut state = self.state.write();
        let before = state.rows.len();
        state.rows.retain(|r| r.id != id);
        Ok(state.rows.len() < before)
    }
}

#[async_trait]
impl AssignmentStore for InMemoryAssignmentStore {
    async fn find_by_bus(&self, bus_id: Id) -> RepositoryResult<Vec<Assignment>> {
        Ok(self.state.read().newest_first(|r| r.bus_id == bus_id))
    }

    async fn find_by_staff(&self, staff_id: Id) -> RepositoryResult<Vec<Assignment>> {
        Ok(self.state.read().newest_first(|r| r.staff_id == staff_id))
    }

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }
}
