use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::shift::ShiftKind;

/// One schedule cell: at most one assignment exists per
/// `(therapist_id, date)` pair; writes on the same key overwrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleAssignment {
    pub therapist_id: Uuid,
    pub branch_code: String,
    pub date: NaiveDate,
    pub shift: ShiftKind,
}
