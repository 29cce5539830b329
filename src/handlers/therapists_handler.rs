use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    models::{CreateTherapistInput, Therapist, UpdateTherapistInput},
    store::ScheduleStore,
    AppError, AppResult, AppState,
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RosterQuery {
    pub branch_code: String,
}

/// GET /api/therapists?branchCode=X - Full roster of a branch
#[utoipa::path(
    get,
    path = "/api/therapists",
    params(RosterQuery),
    responses(
        (status = 200, description = "Therapists of the branch, active and inactive", body = Vec<Therapist>),
        (status = 404, description = "Branch not found")
    ),
    tag = "therapists"
)]
pub async fn get_therapists(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RosterQuery>,
) -> AppResult<Json<Vec<Therapist>>> {
    state
        .store
        .find_branch(&query.branch_code)
        .await?
        .ok_or_else(|| AppError::NotFound("Branch not found".to_string()))?;

    let roster = state.store.load_roster(&query.branch_code).await?;
    Ok(Json(roster))
}

/// POST /api/therapists - Register a therapist with a branch
#[utoipa::path(
    post,
    path = "/api/therapists",
    request_body = CreateTherapistInput,
    responses(
        (status = 200, description = "Therapist created successfully", body = Therapist),
        (status = 404, description = "Branch not found")
    ),
    tag = "therapists"
)]
pub async fn create_therapist(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CreateTherapistInput>,
) -> AppResult<Json<Therapist>> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".to_string()));
    }
    state
        .store
        .find_branch(&input.branch_code)
        .await?
        .ok_or_else(|| AppError::NotFound("Branch not found".to_string()))?;

    let therapist = Therapist {
        id: Uuid::new_v4(),
        name: input.name,
        gender: input.gender,
        branch_code: input.branch_code,
        is_active: true,
    };
    state.store.create_therapist(&therapist).await?;

    tracing::info!(
        "Created therapist {} in branch {}",
        therapist.id,
        therapist.branch_code
    );
    Ok(Json(therapist))
}

/// PUT /api/therapists/{id} - Rename or (de)activate a therapist
#[utoipa::path(
    put,
    path = "/api/therapists/{id}",
    params(
        ("id" = Uuid, Path, description = "Therapist ID")
    ),
    request_body = UpdateTherapistInput,
    responses(
        (status = 200, description = "Therapist updated successfully", body = Therapist),
        (status = 400, description = "No fields to update"),
        (status = 404, description = "Therapist not found")
    ),
    tag = "therapists"
)]
pub async fn update_therapist(
    State(state): State<Arc<AppState>>,
    Path(therapist_id): Path<Uuid>,
    Json(input): Json<UpdateTherapistInput>,
) -> AppResult<Json<Therapist>> {
    let therapist = state
        .store
        .update_therapist(therapist_id, &input)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Therapist {} not found", therapist_id)))?;
    Ok(Json(therapist))
}
