pub mod assignment;
pub mod branch;
pub mod branch_input;
pub mod occupancy;
pub mod schedule_input;
pub mod settings;
pub mod shift;
pub mod therapist;
pub mod therapist_input;
pub mod violation;

pub use assignment::ScheduleAssignment;
pub use branch::Branch;
pub use branch_input::CreateBranchInput;
pub use occupancy::{DayOccupancy, LeaveUsage, OccupancyReport, SlotUsage};
pub use schedule_input::{
    AssignOutcome, AssignShiftInput, ClearDayInput, ClearOutcome, ClearRangeInput, CopyWeekInput,
    CopyWeekOutcome, SkippedCopy, UnassignOutcome, UnassignShiftInput,
};
pub use settings::{DayRules, DayType, LeaveRules, ShiftBounds, ShiftSettings};
pub use shift::{ShiftKind, ShiftKindInfo};
pub use therapist::{Gender, Therapist};
pub use therapist_input::{CreateTherapistInput, UpdateTherapistInput};
pub use violation::{ViolationKey, ViolationReport};
