use chrono::{Datelike, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::shift::ShiftKind;

/// Selects which threshold block of the settings applies to a date.
/// Saturday and Sunday count as weekend; no holiday calendar is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayType {
    Weekday,
    Weekend,
}

impl DayType {
    pub fn of(date: NaiveDate) -> DayType {
        match date.weekday() {
            Weekday::Sat | Weekday::Sun => DayType::Weekend,
            _ => DayType::Weekday,
        }
    }
}

/// `{min, max}` headcount bounds for one working shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ShiftBounds {
    pub min: u32,
    pub max: u32,
}

/// Per-day-type staffing thresholds, one block per working shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayRules {
    pub shift1: ShiftBounds,
    pub shift_middle: ShiftBounds,
    pub shift2: ShiftBounds,
}

impl DayRules {
    pub fn bounds(&self, shift: ShiftKind) -> Option<ShiftBounds> {
        match shift {
            ShiftKind::Morning => Some(self.shift1),
            ShiftKind::Middle => Some(self.shift_middle),
            ShiftKind::Evening => Some(self.shift2),
            ShiftKind::Leave => None,
        }
    }
}

/// Leave-request caps for a branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRules {
    /// Cap on simultaneous Leave assignments on one date.
    pub max_per_day: u32,
    /// Cap on consecutive Leave days for one therapist.
    pub max_consecutive: u32,
    /// Cap on total Leave days per therapist within the validated range.
    pub max_per_week: u32,
}

/// Per-branch staffing configuration, replaced wholesale on update and
/// never partially patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShiftSettings {
    pub weekday: DayRules,
    pub weekend: DayRules,
    pub off: LeaveRules,
}

/// Documented fallback for branches that were never configured.
static DEFAULT_SETTINGS: Lazy<ShiftSettings> = Lazy::new(|| ShiftSettings {
    weekday: DayRules {
        shift1: ShiftBounds { min: 2, max: 3 },
        shift_middle: ShiftBounds { min: 2, max: 3 },
        shift2: ShiftBounds { min: 2, max: 3 },
    },
    weekend: DayRules {
        shift1: ShiftBounds { min: 4, max: 5 },
        shift_middle: ShiftBounds { min: 4, max: 5 },
        shift2: ShiftBounds { min: 4, max: 5 },
    },
    off: LeaveRules {
        max_per_day: 2,
        max_consecutive: 2,
        max_per_week: 1,
    },
});

impl ShiftSettings {
    pub fn branch_default() -> ShiftSettings {
        DEFAULT_SETTINGS.clone()
    }

    pub fn rules_for(&self, day_type: DayType) -> &DayRules {
        match day_type {
            DayType::Weekday => &self.weekday,
            DayType::Weekend => &self.weekend,
        }
    }

    /// Invariants enforced at the settings-write boundary: `min <= max`
    /// for every shift block, and `maxConsecutive <= maxPerWeek`.
    pub fn validate(&self) -> Result<(), String> {
        for (label, rules) in [("weekday", &self.weekday), ("weekend", &self.weekend)] {
            for shift in ShiftKind::WORKING {
                let Some(bounds) = rules.bounds(shift) else {
                    continue;
                };
                if bounds.min > bounds.max {
                    return Err(format!(
                        "{} {} bounds are inverted: min {} exceeds max {}",
                        label,
                        shift.label(),
                        bounds.min,
                        bounds.max
                    ));
                }
            }
        }
        if self.off.max_consecutive > self.off.max_per_week {
            return Err(format!(
                "off.maxConsecutive {} exceeds off.maxPerWeek {}",
                self.off.max_consecutive, self.off.max_per_week
            ));
        }
        Ok(())
    }
}
