use async_trait::async_trait;
use sqlx::PgPool;
use time::{Date, OffsetDateTime};

use crate::domain::{NewTimeEntry, TimeEntry, TimeEntryStatus};

use super::repo_error::RepositoryError;

/// Filters for listing a user's entries. `limit`/`offset` are always set;
/// the routes clamp them before they get here.
#[derive(Debug, Clone, Default)]
pub struct TimeEntryFilter {
    pub project_id: Option<String>,
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub limit: i64,
    pub offset: i64,
}

#[async_trait]
pub trait TimeEntryRepository: Send + Sync {
    async fn create(&self, entry: &NewTimeEntry) -> Result<TimeEntry, RepositoryError>;
    /// Scoped get: with `scope` set, only that user's entry is returned.
    /// Absent and out-of-scope are indistinguishable.
    async fn get(&self, id: &str, scope: Option<&str>)
        -> Result<Option<TimeEntry>, RepositoryError>;
    async fn list(
        &self,
        user_id: &str,
        filter: &TimeEntryFilter,
    ) -> Result<Vec<TimeEntry>, RepositoryError>;
    async fn update(
        &self,
        entry: &TimeEntry,
        scope: Option<&str>,
    ) -> Result<Option<TimeEntry>, RepositoryError>;
    async fn delete(&self, id: &str, scope: Option<&str>) -> Result<bool, RepositoryError>;
    async fn active_timer(&self, user_id: &str) -> Result<Option<TimeEntry>, RepositoryError>;
    /// Insert a `running` entry. The partial unique index on
    /// `(user_id) WHERE status = 'running'` makes this atomic across server
    /// instances; a second running timer surfaces as `Conflict`.
    async fn start_timer(&self, entry: &NewTimeEntry) -> Result<TimeEntry, RepositoryError>;
    /// Conditional finalize: only a currently running entry is stopped, and
    /// the rounded duration is computed in the same statement. Returns
    /// `None` when the entry is no longer running.
    async fn stop_timer(
        &self,
        id: &str,
        user_id: &str,
        end_time: OffsetDateTime,
    ) -> Result<Option<TimeEntry>, RepositoryError>;
}

pub struct TimeEntryRepositoryImpl {
    pool: PgPool,
}

impl TimeEntryRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TimeEntryRow {
    id: String,
    user_id: String,
    project_id: Option<String>,
    task_id: Option<String>,
    date: Date,
    start_time: Option<OffsetDateTime>,
    end_time: Option<OffsetDateTime>,
    hours: f64,
    status: String,
    billable: bool,
    is_approved: bool,
    is_manual_entry: bool,
    is_timer_entry: bool,
    is_template: bool,
    description: Option<String>,
    project_name: String,
    project_color: Option<String>,
    task_name: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<TimeEntryRow> for TimeEntry {
    fn from(row: TimeEntryRow) -> Self {
        TimeEntry {
            id: row.id,
            user_id: row.user_id,
            project_id: row.project_id,
            task_id: row.task_id,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            hours: row.hours,
            status: row.status.parse::<TimeEntryStatus>().unwrap_or_default(),
            billable: row.billable,
            is_approved: row.is_approved,
            is_manual_entry: row.is_manual_entry,
            is_timer_entry: row.is_timer_entry,
            is_template: row.is_template,
            description: row.description,
            project_name: row.project_name,
            project_color: row.project_color,
            task_name: row.task_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Shared SELECT with the display-field joins. A missing project join falls
/// back to the "Unknown Project" sentinel rather than failing.
const ENTRY_SELECT: &str = r#"
    SELECT te.id, te.user_id, te.project_id, te.task_id, te.date,
           te.start_time, te.end_time, te.hours, te.status, te.billable,
           te.is_approved, te.is_manual_entry, te.is_timer_entry, te.is_template,
           te.description,
           COALESCE(p.name, 'Unknown Project') AS project_name,
           p.color AS project_color,
           t.name AS task_name,
           te.created_at, te.updated_at
    FROM time_entries te
    LEFT JOIN projects p ON p.id = te.project_id
    LEFT JOIN tasks t ON t.id = te.task_id
"#;

impl TimeEntryRepositoryImpl {
    async fn insert(&self, entry: &NewTimeEntry) -> Result<TimeEntry, RepositoryError> {
        let id: String = sqlx::query_scalar(
            r#"
            INSERT INTO time_entries
                (user_id, project_id, task_id, date, start_time, end_time,
                 hours, status, billable, is_manual_entry, is_timer_entry, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id
            "#,
        )
        .bind(&entry.user_id)
        .bind(&entry.project_id)
        .bind(&entry.task_id)
        .bind(entry.date)
        .bind(entry.start_time)
        .bind(entry.end_time)
        .bind(entry.hours)
        .bind(entry.status.to_string())
        .bind(entry.billable)
        .bind(entry.is_manual_entry)
        .bind(entry.is_timer_entry)
        .bind(&entry.description)
        .fetch_one(&self.pool)
        .await?;

        self.get(&id, None)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(id))
    }
}

#[async_trait]
impl TimeEntryRepository for TimeEntryRepositoryImpl {
    async fn create(&self, entry: &NewTimeEntry) -> Result<TimeEntry, RepositoryError> {
        self.insert(entry).await
    }

    async fn get(
        &self,
        id: &str,
        scope: Option<&str>,
    ) -> Result<Option<TimeEntry>, RepositoryError> {
        let query = format!(
            "{ENTRY_SELECT} WHERE te.id = $1 AND ($2::text IS NULL OR te.user_id = $2)"
        );
        let row = sqlx::query_as::<_, TimeEntryRow>(&query)
            .bind(id)
            .bind(scope)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(TimeEntry::from))
    }

    async fn list(
        &self,
        user_id: &str,
        filter: &TimeEntryFilter,
    ) -> Result<Vec<TimeEntry>, RepositoryError> {
        let query = format!(
            r#"{ENTRY_SELECT}
            WHERE te.user_id = $1
              AND ($2::text IS NULL OR te.project_id = $2)
              AND ($3::date IS NULL OR te.date >= $3)
              AND ($4::date IS NULL OR te.date <= $4)
            ORDER BY te.date DESC, te.created_at DESC
            LIMIT $5 OFFSET $6
            "#
        );
        let rows = sqlx::query_as::<_, TimeEntryRow>(&query)
            .bind(user_id)
            .bind(&filter.project_id)
            .bind(filter.from)
            .bind(filter.to)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(TimeEntry::from).collect())
    }

    async fn update(
        &self,
        entry: &TimeEntry,
        scope: Option<&str>,
    ) -> Result<Option<TimeEntry>, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE time_entries
            SET project_id = $3, task_id = $4, date = $5, start_time = $6,
                end_time = $7, hours = $8, status = $9, billable = $10,
                is_approved = $11, description = $12, updated_at = now()
            WHERE id = $1 AND ($2::text IS NULL OR user_id = $2)
            "#,
        )
        .bind(&entry.id)
        .bind(scope)
        .bind(&entry.project_id)
        .bind(&entry.task_id)
        .bind(entry.date)
        .bind(entry.start_time)
        .bind(entry.end_time)
        .bind(entry.hours)
        .bind(entry.status.to_string())
        .bind(entry.billable)
        .bind(entry.is_approved)
        .bind(&entry.description)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(&entry.id, None).await
    }

    async fn delete(&self, id: &str, scope: Option<&str>) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM time_entries WHERE id = $1 AND ($2::text IS NULL OR user_id = $2)",
        )
        .bind(id)
        .bind(scope)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn active_timer(&self, user_id: &str) -> Result<Option<TimeEntry>, RepositoryError> {
        let query = format!("{ENTRY_SELECT} WHERE te.user_id = $1 AND te.status = 'running'");
        let row = sqlx::query_as::<_, TimeEntryRow>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(TimeEntry::from))
    }

    async fn start_timer(&self, entry: &NewTimeEntry) -> Result<TimeEntry, RepositoryError> {
        self.insert(entry).await
    }

    async fn stop_timer(
        &self,
        id: &str,
        user_id: &str,
        end_time: OffsetDateTime,
    ) -> Result<Option<TimeEntry>, RepositoryError> {
        let stopped: Option<String> = sqlx::query_scalar(
            r#"
            UPDATE time_entries
            SET end_time = $3,
                hours = ROUND((EXTRACT(EPOCH FROM ($3 - start_time)) / 3600.0)::numeric, 2)::double precision,
                status = 'stopped',
                updated_at = now()
            WHERE id = $1 AND user_id = $2 AND status = 'running'
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(end_time)
        .fetch_optional(&self.pool)
        .await?;

        match stopped {
            Some(id) => self.get(&id, None).await,
            None => Ok(None),
        }
    }
}
