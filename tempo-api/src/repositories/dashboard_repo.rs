use async_trait::async_trait;
use sqlx::PgPool;
use time::{Date, OffsetDateTime};

use super::repo_error::RepositoryError;

/// Period sums for the stats endpoint. `COALESCE` in the query guarantees
/// zeros instead of NULLs when a user has no entries.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct HoursSummary {
    pub today_hours: f64,
    pub week_hours: f64,
    pub month_hours: f64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProjectHoursRow {
    pub project_id: Option<String>,
    pub project_name: String,
    pub project_color: Option<String>,
    pub total_hours: f64,
    pub entry_count: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActivityRow {
    pub id: String,
    pub project_name: String,
    pub project_color: Option<String>,
    pub description: Option<String>,
    pub date: Date,
    pub hours: f64,
    pub status: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DepartmentHoursRow {
    pub department_name: String,
    pub total_hours: f64,
    pub employee_count: i64,
    pub entry_count: i64,
}

#[async_trait]
pub trait DashboardRepository: Send + Sync {
    async fn hours_summary(
        &self,
        user_id: &str,
        today: (Date, Date),
        week: (Date, Date),
        month: (Date, Date),
    ) -> Result<HoursSummary, RepositoryError>;
    async fn active_project_count(&self, user_id: &str) -> Result<i64, RepositoryError>;
    async fn project_breakdown(
        &self,
        user_id: &str,
        from: Option<Date>,
        to: Option<Date>,
    ) -> Result<Vec<ProjectHoursRow>, RepositoryError>;
    async fn recent_activity(
        &self,
        user_id: &str,
        from: Option<Date>,
        to: Option<Date>,
        limit: i64,
    ) -> Result<Vec<ActivityRow>, RepositoryError>;
    async fn department_hours(
        &self,
        from: Option<Date>,
        to: Option<Date>,
    ) -> Result<Vec<DepartmentHoursRow>, RepositoryError>;
}

pub struct DashboardRepositoryImpl {
    pool: PgPool,
}

impl DashboardRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DashboardRepository for DashboardRepositoryImpl {
    async fn hours_summary(
        &self,
        user_id: &str,
        today: (Date, Date),
        week: (Date, Date),
        month: (Date, Date),
    ) -> Result<HoursSummary, RepositoryError> {
        let summary = sqlx::query_as::<_, HoursSummary>(
            r#"
            SELECT
                COALESCE(SUM(hours) FILTER (WHERE date BETWEEN $2 AND $3), 0) AS today_hours,
                COALESCE(SUM(hours) FILTER (WHERE date BETWEEN $4 AND $5), 0) AS week_hours,
                COALESCE(SUM(hours) FILTER (WHERE date BETWEEN $6 AND $7), 0) AS month_hours
            FROM time_entries
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(today.0)
        .bind(today.1)
        .bind(week.0)
        .bind(week.1)
        .bind(month.0)
        .bind(month.1)
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }

    async fn active_project_count(&self, user_id: &str) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(DISTINCT id)
            FROM projects
            WHERE status = 'active' AND (owner_id = $1 OR is_enterprise_wide)
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn project_breakdown(
        &self,
        user_id: &str,
        from: Option<Date>,
        to: Option<Date>,
    ) -> Result<Vec<ProjectHoursRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProjectHoursRow>(
            r#"
            SELECT p.id AS project_id,
                   COALESCE(p.name, 'Unknown Project') AS project_name,
                   p.color AS project_color,
                   SUM(te.hours) AS total_hours,
                   COUNT(te.id) AS entry_count
            FROM time_entries te
            LEFT JOIN projects p ON p.id = te.project_id
            WHERE te.user_id = $1
              AND ($2::date IS NULL OR te.date >= $2)
              AND ($3::date IS NULL OR te.date <= $3)
            GROUP BY p.id, p.name, p.color
            ORDER BY total_hours DESC
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn recent_activity(
        &self,
        user_id: &str,
        from: Option<Date>,
        to: Option<Date>,
        limit: i64,
    ) -> Result<Vec<ActivityRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, ActivityRow>(
            r#"
            SELECT te.id,
                   COALESCE(p.name, 'Unknown Project') AS project_name,
                   p.color AS project_color,
                   te.description, te.date, te.hours, te.status, te.created_at
            FROM time_entries te
            LEFT JOIN projects p ON p.id = te.project_id
            WHERE te.user_id = $1
              AND ($2::date IS NULL OR te.date >= $2)
              AND ($3::date IS NULL OR te.date <= $3)
            ORDER BY te.date DESC, te.created_at DESC
            LIMIT $4
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn department_hours(
        &self,
        from: Option<Date>,
        to: Option<Date>,
    ) -> Result<Vec<DepartmentHoursRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, DepartmentHoursRow>(
            r#"
            SELECT COALESCE(d.name, 'No Department') AS department_name,
                   COALESCE(SUM(te.hours), 0) AS total_hours,
                   COUNT(DISTINCT te.user_id) AS employee_count,
                   COUNT(te.id) AS entry_count
            FROM time_entries te
            LEFT JOIN users u ON u.id = te.user_id
            LEFT JOIN departments d ON d.id = u.department_id
            WHERE ($1::date IS NULL OR te.date >= $1)
              AND ($2::date IS NULL OR te.date <= $2)
            GROUP BY COALESCE(d.name, 'No Department')
            ORDER BY total_hours DESC
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
