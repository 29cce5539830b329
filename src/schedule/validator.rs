use std::collections::HashMap;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{
    DayOccupancy, DayType, Gender, LeaveUsage, OccupancyReport, ScheduleAssignment, ShiftBounds,
    ShiftKind, ShiftSettings, SlotUsage, Therapist, ViolationKey, ViolationReport,
};

fn plural(n: u32) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Scores one snapshot of a branch schedule against the configured
/// constraints. Pure and side-effect free: identical inputs always yield
/// an identical report, and nothing here ever blocks a write.
///
/// Comparisons against the bounds are strict: a count exactly at `min`
/// or `max` is fine.
pub fn validate(
    roster: &[Therapist],
    assignments: &[ScheduleAssignment],
    settings: &ShiftSettings,
    start: NaiveDate,
    end: NaiveDate,
) -> ViolationReport {
    let mut report = ViolationReport::new();
    if end < start {
        return report;
    }

    let gender_of: HashMap<Uuid, Gender> = roster.iter().map(|t| (t.id, t.gender)).collect();
    let mut cells: HashMap<(Uuid, NaiveDate), ShiftKind> = HashMap::new();
    let mut by_date: HashMap<NaiveDate, Vec<&ScheduleAssignment>> = HashMap::new();
    for assignment in assignments
        .iter()
        .filter(|a| a.date >= start && a.date <= end)
    {
        cells.insert((assignment.therapist_id, assignment.date), assignment.shift);
        by_date.entry(assignment.date).or_default().push(assignment);
    }

    let dates: Vec<NaiveDate> = start.iter_days().take_while(|d| *d <= end).collect();
    let empty = Vec::new();

    for &date in &dates {
        let day = by_date.get(&date).unwrap_or(&empty);
        let rules = settings.rules_for(DayType::of(date));

        for shift in ShiftKind::WORKING {
            let Some(bounds) = rules.bounds(shift) else {
                continue;
            };
            let count = day.iter().filter(|a| a.shift == shift).count() as u32;

            if count < bounds.min {
                let shortfall = bounds.min - count;
                report.insert(
                    ViolationKey::ShiftMin { date, shift },
                    format!(
                        "Need {} more therapist{} for {} shift",
                        shortfall,
                        plural(shortfall),
                        shift.label()
                    ),
                );
            }
            if count > bounds.max {
                let excess = count - bounds.max;
                report.insert(
                    ViolationKey::ShiftMax { date, shift },
                    format!(
                        "{} too many therapist{} assigned to {} shift",
                        excess,
                        plural(excess),
                        shift.label()
                    ),
                );
            }
        }

        let leave_count = day.iter().filter(|a| a.shift.is_leave()).count() as u32;
        if leave_count > settings.off.max_per_day {
            let excess = leave_count - settings.off.max_per_day;
            report.insert(
                ViolationKey::LeaveMax { date },
                format!("{} too many therapist{} on leave", excess, plural(excess)),
            );
        }

        // A staffed Morning or Middle shift needs at least one male
        // therapist; an empty shift needs none.
        for shift in ShiftKind::WORKING.into_iter().filter(|s| s.requires_male()) {
            let assigned: Vec<&&ScheduleAssignment> =
                day.iter().filter(|a| a.shift == shift).collect();
            let has_male = assigned
                .iter()
                .any(|a| gender_of.get(&a.therapist_id) == Some(&Gender::Male));
            if !assigned.is_empty() && !has_male {
                report.insert(
                    ViolationKey::MaleRequired { date, shift },
                    format!(
                        "At least 1 male therapist required for {} shift",
                        shift.label()
                    ),
                );
            }
        }
    }

    // Leave-pattern scan, chronological per therapist. The consecutive
    // counter resets on any day without a Leave cell; the report key
    // collapses a long run into a single entry.
    for therapist in roster {
        let mut consecutive = 0u32;
        let mut total = 0u32;

        for &date in &dates {
            if cells.get(&(therapist.id, date)) == Some(&ShiftKind::Leave) {
                consecutive += 1;
                total += 1;
                if consecutive > settings.off.max_consecutive {
                    report.insert(
                        ViolationKey::ConsecutiveLeave {
                            therapist_id: therapist.id,
                        },
                        format!("{} has too many consecutive leave days", therapist.name),
                    );
                }
            } else {
                consecutive = 0;
            }
        }

        if total > settings.off.max_per_week {
            report.insert(
                ViolationKey::WeeklyLeave {
                    therapist_id: therapist.id,
                },
                format!("{} has too many leave days in this week", therapist.name),
            );
        }
    }

    report
}

/// Per-date `{current, min, max, remaining}` summary for the same
/// snapshot the validator consumes. Read-only helper for grid headers.
pub fn occupancy(
    assignments: &[ScheduleAssignment],
    settings: &ShiftSettings,
    start: NaiveDate,
    end: NaiveDate,
) -> OccupancyReport {
    let mut result = OccupancyReport::default();
    if end < start {
        return result;
    }

    for date in start.iter_days().take_while(|d| *d <= end) {
        let rules = settings.rules_for(DayType::of(date));
        let count = |shift: ShiftKind| {
            assignments
                .iter()
                .filter(|a| a.date == date && a.shift == shift)
                .count() as u32
        };

        let usage = |shift: ShiftKind, bounds: ShiftBounds| {
            let current = count(shift);
            SlotUsage {
                current,
                min: bounds.min,
                max: bounds.max,
                remaining: i64::from(bounds.max) - i64::from(current),
            }
        };

        let leave_current = count(ShiftKind::Leave);
        result.days.insert(
            date,
            DayOccupancy {
                shift1: usage(ShiftKind::Morning, rules.shift1),
                shift_m: usage(ShiftKind::Middle, rules.shift_middle),
                shift2: usage(ShiftKind::Evening, rules.shift2),
                leave: LeaveUsage {
                    current: leave_current,
                    max: settings.off.max_per_day,
                    remaining: i64::from(settings.off.max_per_day) - i64::from(leave_current),
                },
            },
        );
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayRules, LeaveRules, ShiftBounds};

    fn therapist(name: &str, gender: Gender) -> Therapist {
        Therapist {
            id: Uuid::new_v4(),
            name: name.to_string(),
            gender,
            branch_code: "BKK01".to_string(),
            is_active: true,
        }
    }

    fn cell(therapist: &Therapist, date: NaiveDate, shift: ShiftKind) -> ScheduleAssignment {
        ScheduleAssignment {
            therapist_id: therapist.id,
            branch_code: therapist.branch_code.clone(),
            date,
            shift,
        }
    }

    fn settings() -> ShiftSettings {
        ShiftSettings {
            weekday: DayRules {
                shift1: ShiftBounds { min: 1, max: 2 },
                shift_middle: ShiftBounds { min: 1, max: 2 },
                shift2: ShiftBounds { min: 1, max: 2 },
            },
            weekend: DayRules {
                shift1: ShiftBounds { min: 2, max: 3 },
                shift_middle: ShiftBounds { min: 2, max: 3 },
                shift2: ShiftBounds { min: 2, max: 3 },
            },
            off: LeaveRules {
                max_per_day: 2,
                max_consecutive: 2,
                max_per_week: 2,
            },
        }
    }

    // 2025-03-17 is a Monday.
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 17).unwrap()
    }

    fn week_end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 23).unwrap()
    }

    #[test]
    fn empty_day_reports_shortfall_for_every_working_shift() {
        let roster = vec![therapist("Anya", Gender::Female)];
        let report = validate(&roster, &[], &settings(), monday(), monday());

        let key = ViolationKey::ShiftMin {
            date: monday(),
            shift: ShiftKind::Morning,
        };
        assert_eq!(report.get(&key), Some("Need 1 more therapist for Morning shift"));
        assert_eq!(report.len(), 3);
    }

    #[test]
    fn counts_at_the_bounds_are_not_flagged() {
        let a = therapist("Arthit", Gender::Male);
        let b = therapist("Boon", Gender::Male);
        let c = therapist("Chai", Gender::Male);
        let roster = vec![a.clone(), b.clone(), c.clone()];
        // Exactly min for Morning and Middle, exactly max for Evening.
        let assignments = vec![
            cell(&a, monday(), ShiftKind::Morning),
            cell(&b, monday(), ShiftKind::Middle),
            cell(&c, monday(), ShiftKind::Evening),
        ];
        let report = validate(&roster, &assignments, &settings(), monday(), monday());
        assert!(report.is_empty(), "unexpected violations: {report:?}");
    }

    #[test]
    fn excess_over_max_reports_the_overflow_count() {
        let staff: Vec<Therapist> = (0..4).map(|i| therapist(&format!("M{i}"), Gender::Male)).collect();
        let assignments: Vec<ScheduleAssignment> = staff
            .iter()
            .map(|t| cell(t, monday(), ShiftKind::Evening))
            .collect();

        let report = validate(&staff, &assignments, &settings(), monday(), monday());
        let key = ViolationKey::ShiftMax {
            date: monday(),
            shift: ShiftKind::Evening,
        };
        assert_eq!(
            report.get(&key),
            Some("2 too many therapists assigned to Evening shift")
        );
    }

    #[test]
    fn weekend_dates_use_the_weekend_thresholds() {
        let a = therapist("Anya", Gender::Female);
        let b = therapist("Boon", Gender::Male);
        let roster = vec![a.clone(), b.clone()];
        let saturday = NaiveDate::from_ymd_opt(2025, 3, 22).unwrap();
        // Two on Morning meets the weekend min of 2.
        let assignments = vec![
            cell(&a, saturday, ShiftKind::Morning),
            cell(&b, saturday, ShiftKind::Morning),
        ];
        let report = validate(&roster, &assignments, &settings(), saturday, saturday);
        assert!(!report.contains(&ViolationKey::ShiftMin {
            date: saturday,
            shift: ShiftKind::Morning,
        }));
        // Middle and Evening are empty, so the weekend min of 2 is short by 2.
        let key = ViolationKey::ShiftMin {
            date: saturday,
            shift: ShiftKind::Middle,
        };
        assert_eq!(report.get(&key), Some("Need 2 more therapists for Middle shift"));
    }

    #[test]
    fn leave_over_the_daily_cap_is_reported() {
        let staff: Vec<Therapist> = (0..3).map(|i| therapist(&format!("T{i}"), Gender::Female)).collect();
        let assignments: Vec<ScheduleAssignment> = staff
            .iter()
            .map(|t| cell(t, monday(), ShiftKind::Leave))
            .collect();
        let report = validate(&staff, &assignments, &settings(), monday(), monday());
        assert_eq!(
            report.get(&ViolationKey::LeaveMax { date: monday() }),
            Some("1 too many therapist on leave")
        );
    }

    #[test]
    fn staffed_morning_and_middle_require_a_male() {
        let a = therapist("Anya", Gender::Female);
        let b = therapist("Busaba", Gender::Female);
        let c = therapist("Chai", Gender::Male);
        let roster = vec![a.clone(), b.clone(), c.clone()];
        let assignments = vec![
            cell(&a, monday(), ShiftKind::Morning),
            cell(&b, monday(), ShiftKind::Middle),
            // Evening never needs a male.
            cell(&c, monday(), ShiftKind::Evening),
        ];
        let report = validate(&roster, &assignments, &settings(), monday(), monday());
        assert_eq!(
            report.get(&ViolationKey::MaleRequired {
                date: monday(),
                shift: ShiftKind::Morning,
            }),
            Some("At least 1 male therapist required for Morning shift")
        );
        assert!(report.contains(&ViolationKey::MaleRequired {
            date: monday(),
            shift: ShiftKind::Middle,
        }));
        assert!(!report.contains(&ViolationKey::MaleRequired {
            date: monday(),
            shift: ShiftKind::Evening,
        }));
    }

    #[test]
    fn empty_shift_needs_no_male() {
        let a = therapist("Anya", Gender::Female);
        let roster = vec![a.clone()];
        let assignments = vec![cell(&a, monday(), ShiftKind::Evening)];
        let report = validate(&roster, &assignments, &settings(), monday(), monday());
        assert!(!report.contains(&ViolationKey::MaleRequired {
            date: monday(),
            shift: ShiftKind::Morning,
        }));
    }

    #[test]
    fn three_consecutive_leave_days_yield_one_entry() {
        let t = therapist("Dao", Gender::Female);
        let roster = vec![t.clone()];
        let d1 = monday();
        let d2 = d1.succ_opt().unwrap();
        let d3 = d2.succ_opt().unwrap();
        let assignments = vec![
            cell(&t, d1, ShiftKind::Leave),
            cell(&t, d2, ShiftKind::Leave),
            cell(&t, d3, ShiftKind::Leave),
        ];
        let report = validate(&roster, &assignments, &settings(), monday(), week_end());
        let consecutive_entries = report
            .iter()
            .filter(|(k, _)| k.ends_with("-consecutive-leave"))
            .count();
        assert_eq!(consecutive_entries, 1);
        assert_eq!(
            report.get(&ViolationKey::ConsecutiveLeave { therapist_id: t.id }),
            Some("Dao has too many consecutive leave days")
        );
        // Three leave days also bust the weekly cap of two.
        assert!(report.contains(&ViolationKey::WeeklyLeave { therapist_id: t.id }));
    }

    #[test]
    fn gap_in_leave_resets_the_consecutive_counter() {
        let t = therapist("Dao", Gender::Female);
        let roster = vec![t.clone()];
        let d1 = monday();
        let d2 = d1.succ_opt().unwrap();
        let d3 = d2.succ_opt().unwrap();
        let assignments = vec![
            cell(&t, d1, ShiftKind::Leave),
            cell(&t, d2, ShiftKind::Morning),
            cell(&t, d3, ShiftKind::Leave),
        ];
        let report = validate(&roster, &assignments, &settings(), monday(), week_end());
        assert!(!report.contains(&ViolationKey::ConsecutiveLeave { therapist_id: t.id }));
    }

    #[test]
    fn weekly_leave_total_counts_non_consecutive_days() {
        let t = therapist("Dao", Gender::Female);
        let roster = vec![t.clone()];
        let assignments = vec![
            cell(&t, monday(), ShiftKind::Leave),
            cell(&t, monday().succ_opt().unwrap().succ_opt().unwrap(), ShiftKind::Leave),
            cell(
                &t,
                NaiveDate::from_ymd_opt(2025, 3, 21).unwrap(),
                ShiftKind::Leave,
            ),
        ];
        let report = validate(&roster, &assignments, &settings(), monday(), week_end());
        assert_eq!(
            report.get(&ViolationKey::WeeklyLeave { therapist_id: t.id }),
            Some("Dao has too many leave days in this week")
        );
        assert!(!report.contains(&ViolationKey::ConsecutiveLeave { therapist_id: t.id }));
    }

    #[test]
    fn assignments_outside_the_range_are_ignored() {
        let t = therapist("Dao", Gender::Male);
        let roster = vec![t.clone()];
        let outside = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let assignments = vec![cell(&t, outside, ShiftKind::Leave)];
        let report = validate(&roster, &assignments, &settings(), monday(), monday());
        assert!(!report.contains(&ViolationKey::WeeklyLeave { therapist_id: t.id }));
    }

    #[test]
    fn validation_is_idempotent() {
        let a = therapist("Anya", Gender::Female);
        let b = therapist("Boon", Gender::Male);
        let roster = vec![a.clone(), b.clone()];
        let assignments = vec![
            cell(&a, monday(), ShiftKind::Morning),
            cell(&b, monday(), ShiftKind::Leave),
            cell(&b, monday().succ_opt().unwrap(), ShiftKind::Leave),
            cell(&b, week_end(), ShiftKind::Leave),
        ];
        let first = validate(&roster, &assignments, &settings(), monday(), week_end());
        let second = validate(&roster, &assignments, &settings(), monday(), week_end());
        assert_eq!(first, second);
    }

    #[test]
    fn occupancy_tracks_counts_and_remaining_capacity() {
        let a = therapist("Anya", Gender::Female);
        let b = therapist("Boon", Gender::Male);
        let assignments = vec![
            cell(&a, monday(), ShiftKind::Morning),
            cell(&b, monday(), ShiftKind::Morning),
            cell(&a, monday().succ_opt().unwrap(), ShiftKind::Leave),
        ];
        let report = occupancy(&assignments, &settings(), monday(), monday().succ_opt().unwrap());
        let day = report.days.get(&monday()).unwrap();
        assert_eq!(day.shift1.current, 2);
        assert_eq!(day.shift1.remaining, 0);
        assert_eq!(day.shift_m.current, 0);
        let next = report.days.get(&monday().succ_opt().unwrap()).unwrap();
        assert_eq!(next.leave.current, 1);
        assert_eq!(next.leave.remaining, 1);
    }
}
