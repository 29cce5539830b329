use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::shift::ShiftKind;

/// Identifies one rule breach. Rendered as the flat string keys existing
/// callers consume, e.g. `2025-03-19-shift1-min` or
/// `<therapistId>-consecutive-leave`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKey {
    ShiftMin { date: NaiveDate, shift: ShiftKind },
    ShiftMax { date: NaiveDate, shift: ShiftKind },
    LeaveMax { date: NaiveDate },
    MaleRequired { date: NaiveDate, shift: ShiftKind },
    ConsecutiveLeave { therapist_id: Uuid },
    WeeklyLeave { therapist_id: Uuid },
}

impl fmt::Display for ViolationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKey::ShiftMin { date, shift } => {
                write!(f, "{}-{}-min", date, shift.slot_key())
            }
            ViolationKey::ShiftMax { date, shift } => {
                write!(f, "{}-{}-max", date, shift.slot_key())
            }
            ViolationKey::LeaveMax { date } => write!(f, "{}-leave-max", date),
            ViolationKey::MaleRequired { date, shift } => {
                write!(f, "{}-{}-male", date, shift.slot_key())
            }
            ViolationKey::ConsecutiveLeave { therapist_id } => {
                write!(f, "{}-consecutive-leave", therapist_id)
            }
            ViolationKey::WeeklyLeave { therapist_id } => {
                write!(f, "{}-total-leave", therapist_id)
            }
        }
    }
}

/// Full set of rule breaches for a validation pass. Rebuilt from scratch
/// on every run and never persisted; inserting under an existing key
/// overwrites, which is what collapses repeated per-day breaches (such as
/// a long consecutive-leave run) into a single entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ViolationReport {
    #[serde(flatten)]
    #[schema(value_type = Object)]
    entries: BTreeMap<String, String>,
}

impl ViolationReport {
    pub fn new() -> ViolationReport {
        ViolationReport::default()
    }

    pub fn insert(&mut self, key: ViolationKey, message: String) {
        self.entries.insert(key.to_string(), message);
    }

    pub fn get(&self, key: &ViolationKey) -> Option<&str> {
        self.entries.get(&key.to_string()).map(String::as_str)
    }

    pub fn contains(&self, key: &ViolationKey) -> bool {
        self.entries.contains_key(&key.to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_render_in_wire_format() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 19).unwrap();
        assert_eq!(
            ViolationKey::ShiftMin {
                date,
                shift: ShiftKind::Middle
            }
            .to_string(),
            "2025-03-19-shiftM-min"
        );
        assert_eq!(
            ViolationKey::LeaveMax { date }.to_string(),
            "2025-03-19-leave-max"
        );
    }

    #[test]
    fn inserting_same_key_overwrites() {
        let therapist_id = Uuid::new_v4();
        let key = ViolationKey::ConsecutiveLeave { therapist_id };
        let mut report = ViolationReport::new();
        report.insert(key, "first".into());
        report.insert(key, "second".into());
        assert_eq!(report.len(), 1);
        assert_eq!(report.get(&key), Some("second"));
    }
}
