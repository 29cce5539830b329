use axum::Json;

use crate::models::{ShiftKind, ShiftKindInfo};

/// GET /api/references/shift-kinds - The shift catalog
#[utoipa::path(
    get,
    path = "/api/references/shift-kinds",
    responses(
        (status = 200, description = "Shift kinds with codes, labels and display time ranges", body = Vec<ShiftKindInfo>)
    ),
    tag = "references"
)]
pub async fn get_shift_kinds() -> Json<Vec<ShiftKindInfo>> {
    Json(ShiftKind::catalog())
}
