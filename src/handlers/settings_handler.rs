use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{models::ShiftSettings, AppResult, AppState};

/// GET /api/branches/{branchCode}/shift-settings
///
/// Branches that were never configured answer with the documented
/// default thresholds rather than 404.
#[utoipa::path(
    get,
    path = "/api/branches/{branchCode}/shift-settings",
    params(
        ("branchCode" = String, Path, description = "Branch code")
    ),
    responses(
        (status = 200, description = "Effective shift settings", body = ShiftSettings),
        (status = 404, description = "Branch not found")
    ),
    tag = "shift-settings"
)]
pub async fn get_shift_settings(
    State(state): State<Arc<AppState>>,
    Path(branch_code): Path<String>,
) -> AppResult<Json<ShiftSettings>> {
    let settings = state.engine.get_settings(&branch_code).await?;
    Ok(Json(settings))
}

/// POST /api/branches/{branchCode}/shift-settings - Create settings
#[utoipa::path(
    post,
    path = "/api/branches/{branchCode}/shift-settings",
    params(
        ("branchCode" = String, Path, description = "Branch code")
    ),
    request_body = ShiftSettings,
    responses(
        (status = 200, description = "Shift settings created", body = ShiftSettings),
        (status = 404, description = "Branch not found"),
        (status = 409, description = "Settings already exist for this branch"),
        (status = 422, description = "Thresholds fail validation")
    ),
    tag = "shift-settings"
)]
pub async fn create_shift_settings(
    State(state): State<Arc<AppState>>,
    Path(branch_code): Path<String>,
    Json(input): Json<ShiftSettings>,
) -> AppResult<Json<ShiftSettings>> {
    let settings = state.engine.create_settings(&branch_code, input).await?;
    tracing::info!("Created shift settings for branch {}", branch_code);
    Ok(Json(settings))
}

/// PUT /api/branches/{branchCode}/shift-settings - Replace settings
#[utoipa::path(
    put,
    path = "/api/branches/{branchCode}/shift-settings",
    params(
        ("branchCode" = String, Path, description = "Branch code")
    ),
    request_body = ShiftSettings,
    responses(
        (status = 200, description = "Shift settings replaced", body = ShiftSettings),
        (status = 404, description = "Branch or settings not found"),
        (status = 422, description = "Thresholds fail validation")
    ),
    tag = "shift-settings"
)]
pub async fn update_shift_settings(
    State(state): State<Arc<AppState>>,
    Path(branch_code): Path<String>,
    Json(input): Json<ShiftSettings>,
) -> AppResult<Json<ShiftSettings>> {
    let settings = state.engine.replace_settings(&branch_code, input).await?;
    tracing::info!("Replaced shift settings for branch {}", branch_code);
    Ok(Json(settings))
}

/// DELETE /api/branches/{branchCode}/shift-settings - Revert to defaults
#[utoipa::path(
    delete,
    path = "/api/branches/{branchCode}/shift-settings",
    params(
        ("branchCode" = String, Path, description = "Branch code")
    ),
    responses(
        (status = 200, description = "Shift settings deleted; defaults apply again"),
        (status = 404, description = "Branch or settings not found")
    ),
    tag = "shift-settings"
)]
pub async fn delete_shift_settings(
    State(state): State<Arc<AppState>>,
    Path(branch_code): Path<String>,
) -> AppResult<Json<Value>> {
    state.engine.delete_settings(&branch_code).await?;
    tracing::info!("Deleted shift settings for branch {}", branch_code);
    Ok(Json(json!({
        "success": true,
        "message": "Shift settings deleted"
    })))
}
