use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::therapist::Gender;

/// Input DTO for registering a therapist with a branch.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTherapistInput {
    pub name: String,
    pub gender: Gender,
    pub branch_code: String,
}

/// Partial update; gender and branch are immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTherapistInput {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}
