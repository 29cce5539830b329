use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::assignment::ScheduleAssignment;
use super::violation::ViolationReport;

/// Input DTO for a single-cell assignment. Dates travel as ISO
/// `YYYY-MM-DD` strings and shifts as the single-character codes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignShiftInput {
    pub branch_code: String,
    pub therapist_id: Uuid,
    pub date: String,
    pub shift: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnassignShiftInput {
    pub branch_code: String,
    pub therapist_id: Uuid,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClearDayInput {
    pub branch_code: String,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClearRangeInput {
    pub branch_code: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CopyWeekInput {
    pub branch_code: String,
    /// First day of the week being filled; sources are read from the
    /// seven days immediately before it.
    pub target_week_start: String,
}

/// Result of a successful `assign`: the written cell plus the refreshed
/// report for the surrounding week. Violations are advisory and never
/// blocked the write.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignOutcome {
    pub assignment: ScheduleAssignment,
    pub violations: ViolationReport,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnassignOutcome {
    /// False when there was nothing to remove; that is a no-op, not an error.
    pub removed: bool,
    pub violations: ViolationReport,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClearOutcome {
    pub removed: u64,
    pub violations: ViolationReport,
}

/// One source cell the week-copy left alone, with the reason.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkippedCopy {
    pub therapist_id: Uuid,
    pub date: chrono::NaiveDate,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CopyWeekOutcome {
    pub created: Vec<ScheduleAssignment>,
    pub skipped: Vec<SkippedCopy>,
    pub violations: ViolationReport,
}
