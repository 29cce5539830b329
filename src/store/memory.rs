use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Branch, ScheduleAssignment, ShiftSettings, Therapist, UpdateTherapistInput};

use super::ScheduleStore;

#[derive(Default)]
struct Inner {
    branches: HashMap<String, Branch>,
    therapists: HashMap<Uuid, Therapist>,
    assignments: HashMap<(Uuid, NaiveDate), ScheduleAssignment>,
    settings: HashMap<String, ShiftSettings>,
}

/// HashMap-backed store with the same contract as `PgStore`. The engine
/// test suite runs against this implementation.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store mutex poisoned")
    }
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn list_branches(&self) -> AppResult<Vec<Branch>> {
        let mut branches: Vec<Branch> = self.inner().branches.values().cloned().collect();
        branches.sort_by(|a, b| a.branch_code.cmp(&b.branch_code));
        Ok(branches)
    }

    async fn find_branch(&self, branch_code: &str) -> AppResult<Option<Branch>> {
        Ok(self.inner().branches.get(branch_code).cloned())
    }

    async fn create_branch(&self, branch: &Branch) -> AppResult<bool> {
        let mut inner = self.inner();
        if inner.branches.contains_key(&branch.branch_code) {
            return Ok(false);
        }
        inner
            .branches
            .insert(branch.branch_code.clone(), branch.clone());
        Ok(true)
    }

    async fn load_roster(&self, branch_code: &str) -> AppResult<Vec<Therapist>> {
        let mut roster: Vec<Therapist> = self
            .inner()
            .therapists
            .values()
            .filter(|t| t.branch_code == branch_code)
            .cloned()
            .collect();
        roster.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roster)
    }

    async fn find_therapist(&self, id: Uuid) -> AppResult<Option<Therapist>> {
        Ok(self.inner().therapists.get(&id).cloned())
    }

    async fn create_therapist(&self, therapist: &Therapist) -> AppResult<()> {
        self.inner()
            .therapists
            .insert(therapist.id, therapist.clone());
        Ok(())
    }

    async fn update_therapist(
        &self,
        id: Uuid,
        input: &UpdateTherapistInput,
    ) -> AppResult<Option<Therapist>> {
        if input.name.is_none() && input.is_active.is_none() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }
        let mut inner = self.inner();
        let Some(therapist) = inner.therapists.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            therapist.name = name.clone();
        }
        if let Some(is_active) = input.is_active {
            therapist.is_active = is_active;
        }
        Ok(Some(therapist.clone()))
    }

    async fn load_assignments(
        &self,
        branch_code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<ScheduleAssignment>> {
        let mut assignments: Vec<ScheduleAssignment> = self
            .inner()
            .assignments
            .values()
            .filter(|a| a.branch_code == branch_code && a.date >= start && a.date <= end)
            .cloned()
            .collect();
        assignments.sort_by_key(|a| (a.date, a.therapist_id));
        Ok(assignments)
    }

    async fn upsert_assignment(&self, assignment: &ScheduleAssignment) -> AppResult<()> {
        self.inner().assignments.insert(
            (assignment.therapist_id, assignment.date),
            assignment.clone(),
        );
        Ok(())
    }

    async fn delete_assignment(&self, therapist_id: Uuid, date: NaiveDate) -> AppResult<bool> {
        Ok(self
            .inner()
            .assignments
            .remove(&(therapist_id, date))
            .is_some())
    }

    async fn clear_day(&self, branch_code: &str, date: NaiveDate) -> AppResult<u64> {
        self.clear_range(branch_code, date, date).await
    }

    async fn clear_range(
        &self,
        branch_code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<u64> {
        let mut inner = self.inner();
        let before = inner.assignments.len();
        inner
            .assignments
            .retain(|_, a| !(a.branch_code == branch_code && a.date >= start && a.date <= end));
        Ok((before - inner.assignments.len()) as u64)
    }

    async fn load_settings(&self, branch_code: &str) -> AppResult<Option<ShiftSettings>> {
        Ok(self.inner().settings.get(branch_code).cloned())
    }

    async fn insert_settings(&self, branch_code: &str, settings: &ShiftSettings) -> AppResult<bool> {
        let mut inner = self.inner();
        if inner.settings.contains_key(branch_code) {
            return Ok(false);
        }
        inner
            .settings
            .insert(branch_code.to_string(), settings.clone());
        Ok(true)
    }

    async fn update_settings(&self, branch_code: &str, settings: &ShiftSettings) -> AppResult<bool> {
        let mut inner = self.inner();
        if !inner.settings.contains_key(branch_code) {
            return Ok(false);
        }
        inner
            .settings
            .insert(branch_code.to_string(), settings.clone());
        Ok(true)
    }

    async fn delete_settings(&self, branch_code: &str) -> AppResult<bool> {
        Ok(self.inner().settings.remove(branch_code).is_some())
    }
}
