use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    Branch, Gender, ScheduleAssignment, ShiftKind, ShiftSettings, Therapist, UpdateTherapistInput,
};

use super::ScheduleStore;

/// Postgres-backed store. Shift codes and genders are stored as the same
/// text values they travel as on the wire.
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> PgStore {
        PgStore { db }
    }
}

#[derive(sqlx::FromRow)]
struct TherapistRow {
    id: Uuid,
    name: String,
    gender: String,
    branch_code: String,
    is_active: bool,
}

impl TryFrom<TherapistRow> for Therapist {
    type Error = AppError;

    fn try_from(row: TherapistRow) -> Result<Therapist, AppError> {
        let gender = Gender::from_str(&row.gender)
            .ok_or_else(|| AppError::Internal(format!("Unexpected gender value: {}", row.gender)))?;
        Ok(Therapist {
            id: row.id,
            name: row.name,
            gender,
            branch_code: row.branch_code,
            is_active: row.is_active,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AssignmentRow {
    therapist_id: Uuid,
    branch_code: String,
    date: NaiveDate,
    shift: String,
}

impl TryFrom<AssignmentRow> for ScheduleAssignment {
    type Error = AppError;

    fn try_from(row: AssignmentRow) -> Result<ScheduleAssignment, AppError> {
        let shift = ShiftKind::from_code(&row.shift)
            .ok_or_else(|| AppError::Internal(format!("Unexpected shift code: {}", row.shift)))?;
        Ok(ScheduleAssignment {
            therapist_id: row.therapist_id,
            branch_code: row.branch_code,
            date: row.date,
            shift,
        })
    }
}

#[async_trait]
impl ScheduleStore for PgStore {
    async fn list_branches(&self) -> AppResult<Vec<Branch>> {
        let branches = sqlx::query_as::<_, Branch>(
            r#"SELECT branch_code, name FROM "Branches" ORDER BY branch_code"#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(branches)
    }

    async fn find_branch(&self, branch_code: &str) -> AppResult<Option<Branch>> {
        let branch = sqlx::query_as::<_, Branch>(
            r#"SELECT branch_code, name FROM "Branches" WHERE branch_code = $1"#,
        )
        .bind(branch_code)
        .fetch_optional(&self.db)
        .await?;

        Ok(branch)
    }

    async fn create_branch(&self, branch: &Branch) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO "Branches" (branch_code, name)
            VALUES ($1, $2)
            ON CONFLICT (branch_code) DO NOTHING
            "#,
        )
        .bind(&branch.branch_code)
        .bind(&branch.name)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn load_roster(&self, branch_code: &str) -> AppResult<Vec<Therapist>> {
        let rows = sqlx::query_as::<_, TherapistRow>(
            r#"
            SELECT id, name, gender, branch_code, is_active
            FROM "Therapists"
            WHERE branch_code = $1
            ORDER BY name
            "#,
        )
        .bind(branch_code)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Therapist::try_from).collect()
    }

    async fn find_therapist(&self, id: Uuid) -> AppResult<Option<Therapist>> {
        let row = sqlx::query_as::<_, TherapistRow>(
            r#"
            SELECT id, name, gender, branch_code, is_active
            FROM "Therapists"
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        row.map(Therapist::try_from).transpose()
    }

    async fn create_therapist(&self, therapist: &Therapist) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO "Therapists" (id, name, gender, branch_code, is_active)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(therapist.id)
        .bind(&therapist.name)
        .bind(therapist.gender.as_str())
        .bind(&therapist.branch_code)
        .bind(therapist.is_active)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn update_therapist(
        &self,
        id: Uuid,
        input: &UpdateTherapistInput,
    ) -> AppResult<Option<Therapist>> {
        // Build dynamic UPDATE query
        let mut updates = vec![];
        let mut bind_count = 1;

        if input.name.is_some() {
            updates.push(format!("name = ${}", bind_count));
            bind_count += 1;
        }
        if input.is_active.is_some() {
            updates.push(format!("is_active = ${}", bind_count));
            bind_count += 1;
        }

        if updates.is_empty() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }

        let sql = format!(
            r#"
            UPDATE "Therapists"
            SET {}
            WHERE id = ${}
            RETURNING id, name, gender, branch_code, is_active
            "#,
            updates.join(", "),
            bind_count
        );

        let mut query = sqlx::query_as::<_, TherapistRow>(&sql);

        if let Some(name) = &input.name {
            query = query.bind(name);
        }
        if let Some(is_active) = input.is_active {
            query = query.bind(is_active);
        }

        query = query.bind(id);

        let row = query.fetch_optional(&self.db).await?;
        row.map(Therapist::try_from).transpose()
    }

    async fn load_assignments(
        &self,
        branch_code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<ScheduleAssignment>> {
        let rows = sqlx::query_as::<_, AssignmentRow>(
            r#"
            SELECT therapist_id, branch_code, date, shift
            FROM "Schedules"
            WHERE branch_code = $1 AND date >= $2 AND date <= $3
            ORDER BY date, therapist_id
            "#,
        )
        .bind(branch_code)
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(ScheduleAssignment::try_from).collect()
    }

    async fn upsert_assignment(&self, assignment: &ScheduleAssignment) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO "Schedules" (therapist_id, branch_code, date, shift)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (therapist_id, date)
            DO UPDATE SET shift = EXCLUDED.shift, branch_code = EXCLUDED.branch_code
            "#,
        )
        .bind(assignment.therapist_id)
        .bind(&assignment.branch_code)
        .bind(assignment.date)
        .bind(assignment.shift.code())
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn delete_assignment(&self, therapist_id: Uuid, date: NaiveDate) -> AppResult<bool> {
        let result =
            sqlx::query(r#"DELETE FROM "Schedules" WHERE therapist_id = $1 AND date = $2"#)
                .bind(therapist_id)
                .bind(date)
                .execute(&self.db)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear_day(&self, branch_code: &str, date: NaiveDate) -> AppResult<u64> {
        let result = sqlx::query(r#"DELETE FROM "Schedules" WHERE branch_code = $1 AND date = $2"#)
            .bind(branch_code)
            .bind(date)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected())
    }

    async fn clear_range(
        &self,
        branch_code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            r#"DELETE FROM "Schedules" WHERE branch_code = $1 AND date >= $2 AND date <= $3"#,
        )
        .bind(branch_code)
        .bind(start)
        .bind(end)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected())
    }

    async fn load_settings(&self, branch_code: &str) -> AppResult<Option<ShiftSettings>> {
        let settings = sqlx::query_scalar::<_, sqlx::types::Json<ShiftSettings>>(
            r#"SELECT settings FROM "ShiftSettings" WHERE branch_code = $1"#,
        )
        .bind(branch_code)
        .fetch_optional(&self.db)
        .await?;

        Ok(settings.map(|json| json.0))
    }

    async fn insert_settings(&self, branch_code: &str, settings: &ShiftSettings) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO "ShiftSettings" (branch_code, settings)
            VALUES ($1, $2)
            ON CONFLICT (branch_code) DO NOTHING
            "#,
        )
        .bind(branch_code)
        .bind(sqlx::types::Json(settings))
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_settings(&self, branch_code: &str, settings: &ShiftSettings) -> AppResult<bool> {
        let result =
            sqlx::query(r#"UPDATE "ShiftSettings" SET settings = $2 WHERE branch_code = $1"#)
                .bind(branch_code)
                .bind(sqlx::types::Json(settings))
                .execute(&self.db)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_settings(&self, branch_code: &str) -> AppResult<bool> {
        let result = sqlx::query(r#"DELETE FROM "ShiftSettings" WHERE branch_code = $1"#)
            .bind(branch_code)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
