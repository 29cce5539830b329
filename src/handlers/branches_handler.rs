use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::{
    models::{Branch, CreateBranchInput},
    store::ScheduleStore,
    AppError, AppResult, AppState,
};

/// GET /api/branches
#[utoipa::path(
    get,
    path = "/api/branches",
    responses(
        (status = 200, description = "List of branches", body = Vec<Branch>)
    ),
    tag = "branches"
)]
pub async fn get_branches(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Branch>>> {
    let branches = state.store.list_branches().await?;
    Ok(Json(branches))
}

/// GET /api/branches/{branchCode}
#[utoipa::path(
    get,
    path = "/api/branches/{branchCode}",
    params(
        ("branchCode" = String, Path, description = "Branch code")
    ),
    responses(
        (status = 200, description = "Branch", body = Branch),
        (status = 404, description = "Branch not found")
    ),
    tag = "branches"
)]
pub async fn get_branch(
    State(state): State<Arc<AppState>>,
    Path(branch_code): Path<String>,
) -> AppResult<Json<Branch>> {
    let branch = state
        .store
        .find_branch(&branch_code)
        .await?
        .ok_or_else(|| AppError::NotFound("Branch not found".to_string()))?;
    Ok(Json(branch))
}

/// POST /api/branches - Create a new branch
#[utoipa::path(
    post,
    path = "/api/branches",
    request_body = CreateBranchInput,
    responses(
        (status = 200, description = "Branch created successfully", body = Branch),
        (status = 409, description = "Branch code already in use")
    ),
    tag = "branches"
)]
pub async fn create_branch(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CreateBranchInput>,
) -> AppResult<Json<Branch>> {
    if input.branch_code.trim().is_empty() || input.name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "branchCode and name must not be empty".to_string(),
        ));
    }

    let branch = Branch {
        branch_code: input.branch_code,
        name: input.name,
    };
    if !state.store.create_branch(&branch).await? {
        return Err(AppError::Conflict(format!(
            "Branch {} already exists",
            branch.branch_code
        )));
    }

    tracing::info!("Created branch {}", branch.branch_code);
    Ok(Json(branch))
}
