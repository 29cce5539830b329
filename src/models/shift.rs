use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The four values a schedule cell can hold. Serialized as the
/// single-character codes existing callers exchange (`1`, `M`, `2`, `X`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ShiftKind {
    #[serde(rename = "1")]
    Morning,
    #[serde(rename = "M")]
    Middle,
    #[serde(rename = "2")]
    Evening,
    #[serde(rename = "X")]
    Leave,
}

impl ShiftKind {
    pub const ALL: [ShiftKind; 4] = [
        ShiftKind::Morning,
        ShiftKind::Middle,
        ShiftKind::Evening,
        ShiftKind::Leave,
    ];

    /// The staffed shifts, i.e. everything except Leave.
    pub const WORKING: [ShiftKind; 3] = [ShiftKind::Morning, ShiftKind::Middle, ShiftKind::Evening];

    pub fn code(&self) -> &'static str {
        match self {
            ShiftKind::Morning => "1",
            ShiftKind::Middle => "M",
            ShiftKind::Evening => "2",
            ShiftKind::Leave => "X",
        }
    }

    pub fn from_code(code: &str) -> Option<ShiftKind> {
        match code {
            "1" => Some(ShiftKind::Morning),
            "M" => Some(ShiftKind::Middle),
            "2" => Some(ShiftKind::Evening),
            "X" => Some(ShiftKind::Leave),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShiftKind::Morning => "Morning",
            ShiftKind::Middle => "Middle",
            ShiftKind::Evening => "Evening",
            ShiftKind::Leave => "Leave Request",
        }
    }

    /// Presentational only; the validator never looks at times.
    pub fn time_range(&self) -> Option<&'static str> {
        match self {
            ShiftKind::Morning => Some("09:00 - 18:00"),
            ShiftKind::Middle => Some("11:30 - 20:30"),
            ShiftKind::Evening => Some("13:00 - 22:00"),
            ShiftKind::Leave => None,
        }
    }

    /// Key fragment used in violation report and occupancy map keys.
    pub fn slot_key(&self) -> &'static str {
        match self {
            ShiftKind::Morning => "shift1",
            ShiftKind::Middle => "shiftM",
            ShiftKind::Evening => "shift2",
            ShiftKind::Leave => "leave",
        }
    }

    pub fn is_leave(&self) -> bool {
        matches!(self, ShiftKind::Leave)
    }

    /// Morning and Middle shifts must include at least one male therapist
    /// whenever they are staffed at all.
    pub fn requires_male(&self) -> bool {
        matches!(self, ShiftKind::Morning | ShiftKind::Middle)
    }
}

/// Reference-data row describing one shift kind.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShiftKindInfo {
    pub code: &'static str,
    pub label: &'static str,
    pub time_range: Option<&'static str>,
}

impl ShiftKind {
    pub fn catalog() -> Vec<ShiftKindInfo> {
        ShiftKind::ALL
            .into_iter()
            .map(|kind| ShiftKindInfo {
                code: kind.code(),
                label: kind.label(),
                time_range: kind.time_range(),
            })
            .collect()
    }
}

impl fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for kind in ShiftKind::ALL {
            assert_eq!(ShiftKind::from_code(kind.code()), Some(kind));
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert_eq!(ShiftKind::from_code("3"), None);
        assert_eq!(ShiftKind::from_code("m"), None);
        assert_eq!(ShiftKind::from_code(""), None);
    }

    #[test]
    fn serializes_as_wire_code() {
        assert_eq!(serde_json::to_string(&ShiftKind::Middle).unwrap(), "\"M\"");
        let parsed: ShiftKind = serde_json::from_str("\"X\"").unwrap();
        assert_eq!(parsed, ShiftKind::Leave);
    }

    #[test]
    fn only_morning_and_middle_require_a_male() {
        assert!(ShiftKind::Morning.requires_male());
        assert!(ShiftKind::Middle.requires_male());
        assert!(!ShiftKind::Evening.requires_male());
        assert!(!ShiftKind::Leave.requires_male());
    }
}
