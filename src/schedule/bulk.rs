use std::collections::{HashMap, HashSet};

use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{ClearOutcome, CopyWeekOutcome, ScheduleAssignment, SkippedCopy};
use crate::store::ScheduleStore;

use super::engine::{adjacent, check_range, ScheduleEngine};

impl<S: ScheduleStore> ScheduleEngine<S> {
    /// Wipes every assignment a branch has on one date. Clears skip the
    /// hard checks entirely; whatever the wipe breaks is reported back.
    pub async fn clear_day(&self, branch_code: &str, date: NaiveDate) -> AppResult<ClearOutcome> {
        self.require_branch(branch_code).await?;
        let _guard = self.locks().acquire(branch_code).await;

        let removed = self.store().clear_day(branch_code, date).await?;

        let roster = self.store().load_roster(branch_code).await?;
        let settings = self.settings_or_default(branch_code).await?;
        let violations = self
            .validate_window(branch_code, &roster, &settings, date)
            .await?;
        Ok(ClearOutcome {
            removed,
            violations,
        })
    }

    /// Wipes every assignment in an inclusive date range and revalidates
    /// the full span.
    pub async fn clear_range(
        &self,
        branch_code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<ClearOutcome> {
        check_range(start, end)?;
        self.require_branch(branch_code).await?;
        let _guard = self.locks().acquire(branch_code).await;

        let removed = self.store().clear_range(branch_code, start, end).await?;

        let roster = self.store().load_roster(branch_code).await?;
        let settings = self.settings_or_default(branch_code).await?;
        let assignments = self
            .store()
            .load_assignments(branch_code, start, end)
            .await?;
        let violations = super::validator::validate(&roster, &assignments, &settings, start, end);
        Ok(ClearOutcome {
            removed,
            violations,
        })
    }

    /// Copies the seven days before `target_week_start` onto the week it
    /// opens, shifted forward by one week. Occupied destination cells and
    /// therapists who have left or gone inactive are skipped, not
    /// overwritten; skips are itemised in the outcome. Copied Leave cells
    /// do not re-trigger the adjacent-day cascade.
    pub async fn copy_previous_week(
        &self,
        branch_code: &str,
        target_week_start: NaiveDate,
    ) -> AppResult<CopyWeekOutcome> {
        self.require_branch(branch_code).await?;
        let _guard = self.locks().acquire(branch_code).await;

        let source_start = adjacent(target_week_start, -7)?;
        let source_end = adjacent(target_week_start, -1)?;
        let target_end = adjacent(target_week_start, 6)?;

        let roster = self.store().load_roster(branch_code).await?;
        let active: HashMap<Uuid, bool> = roster.iter().map(|t| (t.id, t.is_active)).collect();

        let source = self
            .store()
            .load_assignments(branch_code, source_start, source_end)
            .await?;
        let occupied: HashSet<(Uuid, NaiveDate)> = self
            .store()
            .load_assignments(branch_code, target_week_start, target_end)
            .await?
            .iter()
            .map(|a| (a.therapist_id, a.date))
            .collect();

        let mut created = Vec::new();
        let mut skipped = Vec::new();
        for cell in &source {
            let dest_date = cell.date + Duration::days(7);
            match active.get(&cell.therapist_id) {
                None => {
                    skipped.push(SkippedCopy {
                        therapist_id: cell.therapist_id,
                        date: dest_date,
                        reason: "Therapist not found in branch".to_string(),
                    });
                    continue;
                }
                Some(false) => {
                    skipped.push(SkippedCopy {
                        therapist_id: cell.therapist_id,
                        date: dest_date,
                        reason: "Therapist is not active".to_string(),
                    });
                    continue;
                }
                Some(true) => {}
            }
            if occupied.contains(&(cell.therapist_id, dest_date)) {
                skipped.push(SkippedCopy {
                    therapist_id: cell.therapist_id,
                    date: dest_date,
                    reason: "Destination already assigned".to_string(),
                });
                continue;
            }
            let assignment = ScheduleAssignment {
                therapist_id: cell.therapist_id,
                branch_code: branch_code.to_string(),
                date: dest_date,
                shift: cell.shift,
            };
            self.store().upsert_assignment(&assignment).await?;
            created.push(assignment);
        }

        let settings = self.settings_or_default(branch_code).await?;
        let assignments = self
            .store()
            .load_assignments(branch_code, target_week_start, target_end)
            .await?;
        let violations = super::validator::validate(
            &roster,
            &assignments,
            &settings,
            target_week_start,
            target_end,
        );
        Ok(CopyWeekOutcome {
            created,
            skipped,
            violations,
        })
    }
}
