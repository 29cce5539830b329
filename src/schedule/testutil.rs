use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{
    Branch, DayRules, Gender, LeaveRules, ShiftBounds, ShiftSettings, Therapist,
};
use crate::store::{MemoryStore, ScheduleStore};

use super::engine::ScheduleEngine;

/// March 2025 fixture dates; the 17th is a Monday.
pub(crate) fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
}

/// Settings with uniform `{min, max}` bounds across every shift and day
/// type, plus a leave cap of `leave_per_day`.
pub(crate) fn cfg(min: u32, max: u32, leave_per_day: u32) -> ShiftSettings {
    let rules = DayRules {
        shift1: ShiftBounds { min, max },
        shift_middle: ShiftBounds { min, max },
        shift2: ShiftBounds { min, max },
    };
    ShiftSettings {
        weekday: rules.clone(),
        weekend: rules,
        off: LeaveRules {
            max_per_day: leave_per_day,
            max_consecutive: 1,
            max_per_week: 2,
        },
    }
}

pub(crate) async fn engine_with_branch(
    branch_code: &str,
) -> (ScheduleEngine<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    store
        .create_branch(&Branch {
            branch_code: branch_code.to_string(),
            name: format!("{branch_code} branch"),
        })
        .await
        .unwrap();
    (ScheduleEngine::new(Arc::clone(&store)), store)
}

pub(crate) async fn hire(
    store: &MemoryStore,
    branch_code: &str,
    name: &str,
    gender: Gender,
    is_active: bool,
) -> Uuid {
    let therapist = Therapist {
        id: Uuid::new_v4(),
        name: name.to_string(),
        gender,
        branch_code: branch_code.to_string(),
        is_active,
    };
    store.create_therapist(&therapist).await.unwrap();
    therapist.id
}
