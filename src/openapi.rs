use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ShiftGrid API",
        version = "1.0.0",
        description = "Backend API for therapist shift scheduling across branch locations"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        // Health
        crate::handlers::health::health_check,

        // Branches
        crate::handlers::branches_handler::get_branches,
        crate::handlers::branches_handler::get_branch,
        crate::handlers::branches_handler::create_branch,

        // References
        crate::handlers::references_handler::get_shift_kinds,

        // Therapists
        crate::handlers::therapists_handler::get_therapists,
        crate::handlers::therapists_handler::create_therapist,
        crate::handlers::therapists_handler::update_therapist,

        // Shift settings
        crate::handlers::settings_handler::get_shift_settings,
        crate::handlers::settings_handler::create_shift_settings,
        crate::handlers::settings_handler::update_shift_settings,
        crate::handlers::settings_handler::delete_shift_settings,

        // Schedules
        crate::handlers::schedule_handler::get_schedules,
        crate::handlers::schedule_handler::assign_shift,
        crate::handlers::schedule_handler::unassign_shift,
        crate::handlers::schedule_handler::validate_schedule,
        crate::handlers::schedule_handler::get_occupancy,
        crate::handlers::schedule_handler::clear_day,
        crate::handlers::schedule_handler::clear_range,
        crate::handlers::schedule_handler::copy_previous_week,
    ),
    components(
        schemas(
            // Core models
            crate::models::Branch,
            crate::models::Therapist,
            crate::models::Gender,
            crate::models::ShiftKind,
            crate::models::ShiftKindInfo,
            crate::models::ScheduleAssignment,
            crate::models::ShiftSettings,
            crate::models::DayRules,
            crate::models::ShiftBounds,
            crate::models::LeaveRules,
            crate::models::ViolationReport,
            crate::models::OccupancyReport,
            crate::models::DayOccupancy,
            crate::models::SlotUsage,
            crate::models::LeaveUsage,

            // Input and outcome models
            crate::models::CreateBranchInput,
            crate::models::CreateTherapistInput,
            crate::models::UpdateTherapistInput,
            crate::models::AssignShiftInput,
            crate::models::UnassignShiftInput,
            crate::models::ClearDayInput,
            crate::models::ClearRangeInput,
            crate::models::CopyWeekInput,
            crate::models::AssignOutcome,
            crate::models::UnassignOutcome,
            crate::models::ClearOutcome,
            crate::models::SkippedCopy,
            crate::models::CopyWeekOutcome,
        )
    ),
    tags(
        (name = "health", description = "Health check"),
        (name = "references", description = "Reference data"),
        (name = "branches", description = "Branch directory"),
        (name = "therapists", description = "Therapist roster management"),
        (name = "shift-settings", description = "Per-branch staffing thresholds"),
        (name = "schedules", description = "Schedule cells, validation and bulk operations"),
    )
)]
pub struct ApiDoc;
