use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

/// How full one working shift is on one date. `remaining` may go
/// negative when the shift is over its maximum.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct SlotUsage {
    pub current: u32,
    pub min: u32,
    pub max: u32,
    pub remaining: i64,
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct LeaveUsage {
    pub current: u32,
    pub max: u32,
    pub remaining: i64,
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayOccupancy {
    pub shift1: SlotUsage,
    pub shift_m: SlotUsage,
    pub shift2: SlotUsage,
    pub leave: LeaveUsage,
}

/// Per-date occupancy over a requested range, keyed by ISO date.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct OccupancyReport {
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub days: BTreeMap<NaiveDate, DayOccupancy>,
}
