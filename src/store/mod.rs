mod memory;
mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Branch, ScheduleAssignment, ShiftSettings, Therapist, UpdateTherapistInput};

/// Persistence collaborator for the scheduling core. The engine only ever
/// sees this key/range-query surface; `PgStore` backs the running service
/// and `MemoryStore` backs the test suite.
#[async_trait]
pub trait ScheduleStore: Send + Sync + 'static {
    async fn list_branches(&self) -> AppResult<Vec<Branch>>;
    async fn find_branch(&self, branch_code: &str) -> AppResult<Option<Branch>>;
    /// Returns false when the branch code is already taken.
    async fn create_branch(&self, branch: &Branch) -> AppResult<bool>;

    /// Every therapist of the branch, active or not.
    async fn load_roster(&self, branch_code: &str) -> AppResult<Vec<Therapist>>;
    async fn find_therapist(&self, id: Uuid) -> AppResult<Option<Therapist>>;
    async fn create_therapist(&self, therapist: &Therapist) -> AppResult<()>;
    async fn update_therapist(
        &self,
        id: Uuid,
        input: &UpdateTherapistInput,
    ) -> AppResult<Option<Therapist>>;

    async fn load_assignments(
        &self,
        branch_code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<ScheduleAssignment>>;
    /// Last write wins on the `(therapist_id, date)` key.
    async fn upsert_assignment(&self, assignment: &ScheduleAssignment) -> AppResult<()>;
    /// Returns false when there was nothing to delete.
    async fn delete_assignment(&self, therapist_id: Uuid, date: NaiveDate) -> AppResult<bool>;
    async fn clear_day(&self, branch_code: &str, date: NaiveDate) -> AppResult<u64>;
    async fn clear_range(
        &self,
        branch_code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<u64>;

    async fn load_settings(&self, branch_code: &str) -> AppResult<Option<ShiftSettings>>;
    /// Returns false when settings already exist for the branch.
    async fn insert_settings(&self, branch_code: &str, settings: &ShiftSettings) -> AppResult<bool>;
    /// Returns false when there are no settings to replace.
    async fn update_settings(&self, branch_code: &str, settings: &ShiftSettings) -> AppResult<bool>;
    async fn delete_settings(&self, branch_code: &str) -> AppResult<bool>;
}
