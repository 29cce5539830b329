use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

use crate::{
    models::{
        AssignOutcome, AssignShiftInput, ClearDayInput, ClearOutcome, ClearRangeInput,
        CopyWeekInput, CopyWeekOutcome, OccupancyReport, ScheduleAssignment, ShiftKind,
        UnassignOutcome, UnassignShiftInput, ViolationReport,
    },
    store::ScheduleStore,
    AppError, AppResult, AppState,
};

fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        AppError::BadRequest(format!("Invalid date: {}. Expected YYYY-MM-DD", value))
    })
}

fn parse_shift(code: &str) -> AppResult<ShiftKind> {
    ShiftKind::from_code(code)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown shift code: {}", code)))
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ScheduleRangeQuery {
    pub branch_code: String,
    /// Inclusive, `YYYY-MM-DD`.
    pub start_date: String,
    /// Inclusive, `YYYY-MM-DD`.
    pub end_date: String,
}

/// GET /api/schedules - Raw assignments for a branch and date range
#[utoipa::path(
    get,
    path = "/api/schedules",
    params(ScheduleRangeQuery),
    responses(
        (status = 200, description = "Assignments in the range", body = Vec<ScheduleAssignment>),
        (status = 400, description = "Malformed date"),
        (status = 404, description = "Branch not found")
    ),
    tag = "schedules"
)]
pub async fn get_schedules(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ScheduleRangeQuery>,
) -> AppResult<Json<Vec<ScheduleAssignment>>> {
    let start = parse_date(&query.start_date)?;
    let end = parse_date(&query.end_date)?;
    state
        .store
        .find_branch(&query.branch_code)
        .await?
        .ok_or_else(|| AppError::NotFound("Branch not found".to_string()))?;

    let assignments = state
        .store
        .load_assignments(&query.branch_code, start, end)
        .await?;
    Ok(Json(assignments))
}

/// POST /api/schedules/assign - Write one schedule cell
///
/// Assigning Leave also pins the surrounding days: Morning the day
/// before, Evening the day after. The response carries the refreshed
/// violation report for the affected week.
#[utoipa::path(
    post,
    path = "/api/schedules/assign",
    request_body = AssignShiftInput,
    responses(
        (status = 200, description = "Cell written; violations are advisory", body = AssignOutcome),
        (status = 400, description = "Malformed date or unknown shift code"),
        (status = 404, description = "Branch or therapist not found"),
        (status = 409, description = "A hard check rejected the write"),
        (status = 422, description = "Therapist is not active")
    ),
    tag = "schedules"
)]
pub async fn assign_shift(
    State(state): State<Arc<AppState>>,
    Json(input): Json<AssignShiftInput>,
) -> AppResult<Json<AssignOutcome>> {
    let date = parse_date(&input.date)?;
    let shift = parse_shift(&input.shift)?;
    state
        .store
        .find_branch(&input.branch_code)
        .await?
        .ok_or_else(|| AppError::NotFound("Branch not found".to_string()))?;

    tracing::debug!(
        "Assigning therapist {} to {} on {} in branch {}",
        input.therapist_id,
        shift.label(),
        date,
        input.branch_code
    );
    let outcome = state
        .engine
        .assign(&input.branch_code, input.therapist_id, date, shift)
        .await?;
    Ok(Json(outcome))
}

/// POST /api/schedules/unassign - Empty one schedule cell
#[utoipa::path(
    post,
    path = "/api/schedules/unassign",
    request_body = UnassignShiftInput,
    responses(
        (status = 200, description = "Cell emptied (or already empty)", body = UnassignOutcome),
        (status = 400, description = "Malformed date"),
        (status = 404, description = "Branch or therapist not found"),
        (status = 409, description = "Removing the only male from a staffed shift"),
        (status = 422, description = "Therapist is not active")
    ),
    tag = "schedules"
)]
pub async fn unassign_shift(
    State(state): State<Arc<AppState>>,
    Json(input): Json<UnassignShiftInput>,
) -> AppResult<Json<UnassignOutcome>> {
    let date = parse_date(&input.date)?;
    state
        .store
        .find_branch(&input.branch_code)
        .await?
        .ok_or_else(|| AppError::NotFound("Branch not found".to_string()))?;

    let outcome = state
        .engine
        .unassign(&input.branch_code, input.therapist_id, date)
        .await?;
    Ok(Json(outcome))
}

/// GET /api/schedules/validate - Score a date range against the rules
#[utoipa::path(
    get,
    path = "/api/schedules/validate",
    params(ScheduleRangeQuery),
    responses(
        (status = 200, description = "Violation report; empty object when clean", body = ViolationReport),
        (status = 400, description = "Malformed date or inverted range"),
        (status = 404, description = "Branch not found")
    ),
    tag = "schedules"
)]
pub async fn validate_schedule(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ScheduleRangeQuery>,
) -> AppResult<Json<ViolationReport>> {
    let start = parse_date(&query.start_date)?;
    let end = parse_date(&query.end_date)?;
    let report = state
        .engine
        .validate_range(&query.branch_code, start, end)
        .await?;
    Ok(Json(report))
}

/// GET /api/schedules/occupancy - Per-day slot usage for a date range
#[utoipa::path(
    get,
    path = "/api/schedules/occupancy",
    params(ScheduleRangeQuery),
    responses(
        (status = 200, description = "Per-day headcounts against the thresholds", body = OccupancyReport),
        (status = 400, description = "Malformed date or inverted range"),
        (status = 404, description = "Branch not found")
    ),
    tag = "schedules"
)]
pub async fn get_occupancy(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ScheduleRangeQuery>,
) -> AppResult<Json<OccupancyReport>> {
    let start = parse_date(&query.start_date)?;
    let end = parse_date(&query.end_date)?;
    let report = state
        .engine
        .occupancy_range(&query.branch_code, start, end)
        .await?;
    Ok(Json(report))
}

/// POST /api/schedules/clear-day - Wipe one day of a branch schedule
#[utoipa::path(
    post,
    path = "/api/schedules/clear-day",
    request_body = ClearDayInput,
    responses(
        (status = 200, description = "Day cleared", body = ClearOutcome),
        (status = 400, description = "Malformed date"),
        (status = 404, description = "Branch not found")
    ),
    tag = "schedules"
)]
pub async fn clear_day(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ClearDayInput>,
) -> AppResult<Json<ClearOutcome>> {
    let date = parse_date(&input.date)?;
    let outcome = state.engine.clear_day(&input.branch_code, date).await?;
    tracing::info!(
        "Cleared {} assignments on {} in branch {}",
        outcome.removed,
        date,
        input.branch_code
    );
    Ok(Json(outcome))
}

/// POST /api/schedules/clear-range - Wipe an inclusive date range
#[utoipa::path(
    post,
    path = "/api/schedules/clear-range",
    request_body = ClearRangeInput,
    responses(
        (status = 200, description = "Range cleared", body = ClearOutcome),
        (status = 400, description = "Malformed date or inverted range"),
        (status = 404, description = "Branch not found")
    ),
    tag = "schedules"
)]
pub async fn clear_range(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ClearRangeInput>,
) -> AppResult<Json<ClearOutcome>> {
    let start = parse_date(&input.start_date)?;
    let end = parse_date(&input.end_date)?;
    let outcome = state
        .engine
        .clear_range(&input.branch_code, start, end)
        .await?;
    tracing::info!(
        "Cleared {} assignments between {} and {} in branch {}",
        outcome.removed,
        start,
        end,
        input.branch_code
    );
    Ok(Json(outcome))
}

/// POST /api/schedules/copy-previous-week - Seed a week from the one before
#[utoipa::path(
    post,
    path = "/api/schedules/copy-previous-week",
    request_body = CopyWeekInput,
    responses(
        (status = 200, description = "Copy performed; skipped cells are itemised", body = CopyWeekOutcome),
        (status = 400, description = "Malformed date"),
        (status = 404, description = "Branch not found")
    ),
    tag = "schedules"
)]
pub async fn copy_previous_week(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CopyWeekInput>,
) -> AppResult<Json<CopyWeekOutcome>> {
    let target_week_start = parse_date(&input.target_week_start)?;
    let outcome = state
        .engine
        .copy_previous_week(&input.branch_code, target_week_start)
        .await?;
    tracing::info!(
        "Copied {} assignments ({} skipped) into week of {} in branch {}",
        outcome.created.len(),
        outcome.skipped.len(),
        target_week_start,
        input.branch_code
    );
    Ok(Json(outcome))
}
