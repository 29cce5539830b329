use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    AssignOutcome, Branch, DayType, Gender, OccupancyReport, ScheduleAssignment, ShiftKind,
    ShiftSettings, Therapist, UnassignOutcome, ViolationReport,
};
use crate::store::ScheduleStore;

use super::locks::BranchLocks;
use super::validator;

/// Orchestrates all schedule mutations for a branch: single-cell edits
/// with the leave cascade, the two hard-blocking checks, and the
/// post-mutation revalidation whose report is returned to the caller.
pub struct ScheduleEngine<S> {
    store: Arc<S>,
    locks: BranchLocks,
}

impl<S> Clone for ScheduleEngine<S> {
    fn clone(&self) -> Self {
        ScheduleEngine {
            store: Arc::clone(&self.store),
            locks: self.locks.clone(),
        }
    }
}

/// Sunday-started week containing `date`; the window the original UI
/// edits and the window every post-mutation validation runs over.
pub(crate) fn week_of(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = date.weekday().num_days_from_sunday() as i64;
    let start = date - Duration::days(offset);
    (start, start + Duration::days(6))
}

impl<S: ScheduleStore> ScheduleEngine<S> {
    pub fn new(store: Arc<S>) -> ScheduleEngine<S> {
        ScheduleEngine {
            store,
            locks: BranchLocks::new(),
        }
    }

    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn locks(&self) -> &BranchLocks {
        &self.locks
    }

    pub(crate) async fn require_branch(&self, branch_code: &str) -> AppResult<Branch> {
        self.store
            .find_branch(branch_code)
            .await?
            .ok_or_else(|| AppError::NotFound("Branch not found".to_string()))
    }

    pub(crate) async fn settings_or_default(&self, branch_code: &str) -> AppResult<ShiftSettings> {
        Ok(self
            .store
            .load_settings(branch_code)
            .await?
            .unwrap_or_else(ShiftSettings::branch_default))
    }

    // ---- settings ----

    pub async fn get_settings(&self, branch_code: &str) -> AppResult<ShiftSettings> {
        self.require_branch(branch_code).await?;
        self.settings_or_default(branch_code).await
    }

    pub async fn create_settings(
        &self,
        branch_code: &str,
        settings: ShiftSettings,
    ) -> AppResult<ShiftSettings> {
        self.require_branch(branch_code).await?;
        settings.validate().map_err(AppError::Validation)?;
        if !self.store.insert_settings(branch_code, &settings).await? {
            return Err(AppError::Conflict(
                "Shift settings already exist for this branch. Use PUT to update.".to_string(),
            ));
        }
        Ok(settings)
    }

    pub async fn replace_settings(
        &self,
        branch_code: &str,
        settings: ShiftSettings,
    ) -> AppResult<ShiftSettings> {
        self.require_branch(branch_code).await?;
        settings.validate().map_err(AppError::Validation)?;
        if !self.store.update_settings(branch_code, &settings).await? {
            return Err(AppError::NotFound(
                "Shift settings not found. Use POST to create.".to_string(),
            ));
        }
        Ok(settings)
    }

    pub async fn delete_settings(&self, branch_code: &str) -> AppResult<()> {
        self.require_branch(branch_code).await?;
        if !self.store.delete_settings(branch_code).await? {
            return Err(AppError::NotFound("Shift settings not found".to_string()));
        }
        Ok(())
    }

    // ---- single-cell mutations ----

    pub async fn assign(
        &self,
        branch_code: &str,
        therapist_id: Uuid,
        date: NaiveDate,
        shift: ShiftKind,
    ) -> AppResult<AssignOutcome> {
        let _guard = self.locks.acquire(branch_code).await;

        let roster = self.store.load_roster(branch_code).await?;
        let therapist = require_active(&roster, therapist_id, branch_code)?;
        let settings = self.settings_or_default(branch_code).await?;
        let day = self.store.load_assignments(branch_code, date, date).await?;

        // Hard check (a): a non-Leave shift already at its max rejects the
        // write. The therapist's own cell on that date does not count
        // against the cap, so moving within a full shift stays legal.
        if let Some(bounds) = settings.rules_for(DayType::of(date)).bounds(shift) {
            let occupied = day
                .iter()
                .filter(|a| a.shift == shift && a.therapist_id != therapist_id)
                .count() as u32;
            if occupied >= bounds.max {
                return Err(AppError::Constraint(format!(
                    "Maximum {} therapists allowed for {} shift on {}",
                    bounds.max,
                    shift.label(),
                    date
                )));
            }
        }

        // Hard check (b).
        guard_sole_male(&roster, &day, therapist, Some(shift))?;

        let assignment = ScheduleAssignment {
            therapist_id,
            branch_code: branch_code.to_string(),
            date,
            shift,
        };
        self.store.upsert_assignment(&assignment).await?;

        if shift.is_leave() {
            // Leave cascade: pin Morning the day before and Evening the day
            // after, overwriting whatever was there. Any breach this causes
            // shows up in the report below instead of blocking the write.
            let before = adjacent(date, -1)?;
            let after = adjacent(date, 1)?;
            self.store
                .upsert_assignment(&ScheduleAssignment {
                    therapist_id,
                    branch_code: branch_code.to_string(),
                    date: before,
                    shift: ShiftKind::Morning,
                })
                .await?;
            self.store
                .upsert_assignment(&ScheduleAssignment {
                    therapist_id,
                    branch_code: branch_code.to_string(),
                    date: after,
                    shift: ShiftKind::Evening,
                })
                .await?;
        }

        let violations = self
            .validate_window(branch_code, &roster, &settings, date)
            .await?;
        Ok(AssignOutcome {
            assignment,
            violations,
        })
    }

    pub async fn unassign(
        &self,
        branch_code: &str,
        therapist_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<UnassignOutcome> {
        let _guard = self.locks.acquire(branch_code).await;

        let roster = self.store.load_roster(branch_code).await?;
        let therapist = require_active(&roster, therapist_id, branch_code)?;
        let day = self.store.load_assignments(branch_code, date, date).await?;

        guard_sole_male(&roster, &day, therapist, None)?;

        let removed = self.store.delete_assignment(therapist_id, date).await?;

        let settings = self.settings_or_default(branch_code).await?;
        let violations = self
            .validate_window(branch_code, &roster, &settings, date)
            .await?;
        Ok(UnassignOutcome {
            removed,
            violations,
        })
    }

    // ---- read-only views ----

    pub async fn validate_range(
        &self,
        branch_code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<ViolationReport> {
        check_range(start, end)?;
        self.require_branch(branch_code).await?;
        // Lock for a consistent snapshot; validation itself is pure.
        let _guard = self.locks.acquire(branch_code).await;

        let roster = self.store.load_roster(branch_code).await?;
        let settings = self.settings_or_default(branch_code).await?;
        let assignments = self.store.load_assignments(branch_code, start, end).await?;
        Ok(validator::validate(
            &roster,
            &assignments,
            &settings,
            start,
            end,
        ))
    }

    pub async fn occupancy_range(
        &self,
        branch_code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<OccupancyReport> {
        check_range(start, end)?;
        self.require_branch(branch_code).await?;
        let _guard = self.locks.acquire(branch_code).await;

        let settings = self.settings_or_default(branch_code).await?;
        let assignments = self.store.load_assignments(branch_code, start, end).await?;
        Ok(validator::occupancy(&assignments, &settings, start, end))
    }

    pub(crate) async fn validate_window(
        &self,
        branch_code: &str,
        roster: &[Therapist],
        settings: &ShiftSettings,
        date: NaiveDate,
    ) -> AppResult<ViolationReport> {
        let (start, end) = week_of(date);
        let assignments = self.store.load_assignments(branch_code, start, end).await?;
        Ok(validator::validate(
            roster,
            &assignments,
            settings,
            start,
            end,
        ))
    }
}

pub(crate) fn check_range(start: NaiveDate, end: NaiveDate) -> AppResult<()> {
    if end < start {
        return Err(AppError::BadRequest(
            "endDate precedes startDate".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn adjacent(date: NaiveDate, days: i64) -> AppResult<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
        .ok_or_else(|| AppError::BadRequest(format!("Date {} leaves the calendar range", date)))
}

/// Hard precondition shared by every mutation: the therapist must exist
/// in this branch's roster and be active.
fn require_active<'a>(
    roster: &'a [Therapist],
    therapist_id: Uuid,
    branch_code: &str,
) -> AppResult<&'a Therapist> {
    let therapist = roster
        .iter()
        .find(|t| t.id == therapist_id)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Therapist {} not found in branch {}",
                therapist_id, branch_code
            ))
        })?;
    if !therapist.is_active {
        return Err(AppError::Validation(format!(
            "Therapist {} is not active",
            therapist.name
        )));
    }
    Ok(therapist)
}

/// Hard check (b): refuses to move or remove the last male out of a
/// Morning or Middle shift. Evaluated against the state immediately
/// prior to the mutation; bulk clears do not go through this guard.
fn guard_sole_male(
    roster: &[Therapist],
    day: &[ScheduleAssignment],
    therapist: &Therapist,
    new_shift: Option<ShiftKind>,
) -> AppResult<()> {
    if therapist.gender != Gender::Male {
        return Ok(());
    }
    let Some(current) = day.iter().find(|a| a.therapist_id == therapist.id) else {
        return Ok(());
    };
    if !current.shift.requires_male() || new_shift == Some(current.shift) {
        return Ok(());
    }

    let males: HashSet<Uuid> = roster
        .iter()
        .filter(|t| t.gender == Gender::Male)
        .map(|t| t.id)
        .collect();
    let male_remains = day
        .iter()
        .filter(|a| a.shift == current.shift && a.therapist_id != therapist.id)
        .any(|a| males.contains(&a.therapist_id));

    if !male_remains {
        return Err(AppError::Constraint(format!(
            "Cannot remove the only male therapist from {} shift",
            current.shift.label()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{cfg, day, engine_with_branch, hire};
    use super::*;
    use crate::models::ViolationKey;

    #[tokio::test]
    async fn assign_upserts_on_the_same_cell() {
        let (engine, store) = engine_with_branch("BKK01").await;
        let anya = hire(&store, "BKK01", "Anya", Gender::Female, true).await;

        engine
            .assign("BKK01", anya, day(17), ShiftKind::Morning)
            .await
            .unwrap();
        let outcome = engine
            .assign("BKK01", anya, day(17), ShiftKind::Evening)
            .await
            .unwrap();

        assert_eq!(outcome.assignment.shift, ShiftKind::Evening);
        let cells = store
            .load_assignments("BKK01", day(17), day(17))
            .await
            .unwrap();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].shift, ShiftKind::Evening);
    }

    #[tokio::test]
    async fn assigning_leave_cascades_to_adjacent_days() {
        let (engine, store) = engine_with_branch("BKK01").await;
        let anya = hire(&store, "BKK01", "Anya", Gender::Female, true).await;
        // Prior state at the neighbours gets overwritten.
        engine
            .assign("BKK01", anya, day(16), ShiftKind::Middle)
            .await
            .unwrap();

        engine
            .assign("BKK01", anya, day(17), ShiftKind::Leave)
            .await
            .unwrap();

        let cells = store
            .load_assignments("BKK01", day(16), day(18))
            .await
            .unwrap();
        let shift_on = |d: chrono::NaiveDate| cells.iter().find(|a| a.date == d).map(|a| a.shift);
        assert_eq!(shift_on(day(16)), Some(ShiftKind::Morning));
        assert_eq!(shift_on(day(17)), Some(ShiftKind::Leave));
        assert_eq!(shift_on(day(18)), Some(ShiftKind::Evening));
    }

    #[tokio::test]
    async fn full_shift_rejects_another_assignment() {
        let (engine, store) = engine_with_branch("BKK01").await;
        engine
            .create_settings("BKK01", cfg(2, 3, 2))
            .await
            .unwrap();
        let mut staff = Vec::new();
        for name in ["Arthit", "Boon", "Chai", "Krit"] {
            staff.push(hire(&store, "BKK01", name, Gender::Male, true).await);
        }
        for id in &staff[..3] {
            engine
                .assign("BKK01", *id, day(17), ShiftKind::Morning)
                .await
                .unwrap();
        }

        let err = engine
            .assign("BKK01", staff[3], day(17), ShiftKind::Morning)
            .await
            .unwrap_err();
        assert!(
            matches!(&err, AppError::Constraint(msg) if msg.contains("Maximum 3 therapists")),
            "unexpected error: {err:?}"
        );

        // Removing one frees the slot.
        engine.unassign("BKK01", staff[0], day(17)).await.unwrap();
        engine
            .assign("BKK01", staff[3], day(17), ShiftKind::Morning)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn moving_within_a_full_shift_is_allowed() {
        let (engine, store) = engine_with_branch("BKK01").await;
        engine
            .create_settings("BKK01", cfg(1, 1, 2))
            .await
            .unwrap();
        let boon = hire(&store, "BKK01", "Boon", Gender::Male, true).await;
        engine
            .assign("BKK01", boon, day(17), ShiftKind::Morning)
            .await
            .unwrap();

        // Morning is at max 1, but the only occupant is the therapist
        // being re-assigned to the same shift.
        engine
            .assign("BKK01", boon, day(17), ShiftKind::Morning)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn leave_cap_is_advisory_not_blocking() {
        let (engine, store) = engine_with_branch("BKK01").await;
        // off.maxPerDay is 2 under the branch default settings.
        let mut staff = Vec::new();
        for name in ["Anya", "Boon", "Chai"] {
            staff.push(hire(&store, "BKK01", name, Gender::Female, true).await);
        }
        for id in &staff[..2] {
            engine
                .assign("BKK01", *id, day(17), ShiftKind::Leave)
                .await
                .unwrap();
        }

        let outcome = engine
            .assign("BKK01", staff[2], day(17), ShiftKind::Leave)
            .await
            .unwrap();
        assert!(outcome
            .violations
            .contains(&ViolationKey::LeaveMax { date: day(17) }));
    }

    #[tokio::test]
    async fn sole_male_cannot_leave_a_staffed_morning_shift() {
        let (engine, store) = engine_with_branch("BKK01").await;
        let boon = hire(&store, "BKK01", "Boon", Gender::Male, true).await;
        let anya = hire(&store, "BKK01", "Anya", Gender::Female, true).await;
        engine
            .assign("BKK01", boon, day(17), ShiftKind::Morning)
            .await
            .unwrap();
        engine
            .assign("BKK01", anya, day(17), ShiftKind::Morning)
            .await
            .unwrap();

        let err = engine.unassign("BKK01", boon, day(17)).await.unwrap_err();
        assert!(
            matches!(&err, AppError::Constraint(msg) if msg.contains("only male therapist from Morning")),
            "unexpected error: {err:?}"
        );

        let err = engine
            .assign("BKK01", boon, day(17), ShiftKind::Evening)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Constraint(_)));
    }

    #[tokio::test]
    async fn male_removal_is_fine_with_a_second_male_on_the_shift() {
        let (engine, store) = engine_with_branch("BKK01").await;
        let boon = hire(&store, "BKK01", "Boon", Gender::Male, true).await;
        let chai = hire(&store, "BKK01", "Chai", Gender::Male, true).await;
        let anya = hire(&store, "BKK01", "Anya", Gender::Female, true).await;
        for id in [boon, chai, anya] {
            engine
                .assign("BKK01", id, day(17), ShiftKind::Morning)
                .await
                .unwrap();
        }

        let outcome = engine.unassign("BKK01", boon, day(17)).await.unwrap();
        assert!(outcome.removed);
    }

    #[tokio::test]
    async fn sole_male_is_guarded_even_as_the_only_assignee() {
        let (engine, store) = engine_with_branch("BKK01").await;
        let boon = hire(&store, "BKK01", "Boon", Gender::Male, true).await;
        engine
            .assign("BKK01", boon, day(17), ShiftKind::Morning)
            .await
            .unwrap();

        let err = engine.unassign("BKK01", boon, day(17)).await.unwrap_err();
        assert!(matches!(err, AppError::Constraint(_)));

        // Clears bypass the guard and remain the way to empty the shift.
        let outcome = engine.clear_day("BKK01", day(17)).await.unwrap();
        assert_eq!(outcome.removed, 1);
    }

    #[tokio::test]
    async fn unassign_of_an_empty_cell_is_a_noop() {
        let (engine, store) = engine_with_branch("BKK01").await;
        let anya = hire(&store, "BKK01", "Anya", Gender::Female, true).await;

        let outcome = engine.unassign("BKK01", anya, day(17)).await.unwrap();
        assert!(!outcome.removed);
    }

    #[tokio::test]
    async fn unknown_and_inactive_therapists_are_rejected_up_front() {
        let (engine, store) = engine_with_branch("BKK01").await;
        let ghost = Uuid::new_v4();
        let err = engine
            .assign("BKK01", ghost, day(17), ShiftKind::Morning)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let dao = hire(&store, "BKK01", "Dao", Gender::Female, false).await;
        let err = engine
            .assign("BKK01", dao, day(17), ShiftKind::Morning)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // Nothing was written.
        let cells = store
            .load_assignments("BKK01", day(17), day(17))
            .await
            .unwrap();
        assert!(cells.is_empty());
    }

    #[tokio::test]
    async fn settings_lifecycle_and_validation() {
        let (engine, _store) = engine_with_branch("BKK01").await;

        // Unconfigured branches fall back to the documented default.
        let settings = engine.get_settings("BKK01").await.unwrap();
        assert_eq!(settings, ShiftSettings::branch_default());

        let custom = cfg(1, 2, 3);
        engine.create_settings("BKK01", custom.clone()).await.unwrap();
        let err = engine
            .create_settings("BKK01", custom.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let mut broken = custom.clone();
        broken.weekday.shift1.min = 9;
        let err = engine.replace_settings("BKK01", broken).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        engine.replace_settings("BKK01", custom).await.unwrap();
        engine.delete_settings("BKK01").await.unwrap();
        let err = engine.delete_settings("BKK01").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = engine.get_settings("NOPE").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn replace_without_existing_settings_is_not_found() {
        let (engine, _store) = engine_with_branch("BKK01").await;
        let err = engine
            .replace_settings("BKK01", cfg(1, 2, 3))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn week_windows_start_on_sunday() {
        // 2025-03-19 is a Wednesday; its week runs Sun 16th to Sat 22nd.
        let (start, end) = week_of(NaiveDate::from_ymd_opt(2025, 3, 19).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 3, 16).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 3, 22).unwrap());

        let sunday = NaiveDate::from_ymd_opt(2025, 3, 16).unwrap();
        assert_eq!(week_of(sunday).0, sunday);
    }
}
