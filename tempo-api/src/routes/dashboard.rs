use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use itertools::Itertools;
use serde::Deserialize;
use time::{Date, OffsetDateTime};
use tracing::instrument;

use crate::{
    app_state::AppState,
    auth::AuthUser,
    domain::{
        clamp, parse_iso_date, percentages, permissions_for, round2, this_month, this_week, today,
        ActivityItem, DashboardStats, DateRange, DepartmentHours, ProjectBreakdownItem,
    },
    routes::ApiError,
};

const DEFAULT_ACTIVITY_LIMIT: i64 = 10;
const MAX_ACTIVITY_LIMIT: i64 = 100;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/project-breakdown", get(project_breakdown))
        .route("/recent-activity", get(recent_activity))
        .route("/department-hours", get(department_hours))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeParams {
    start_date: Option<String>,
    end_date: Option<String>,
    limit: Option<i64>,
}

impl RangeParams {
    fn bounds(&self) -> Result<(Option<Date>, Option<Date>), ApiError> {
        let from = self
            .start_date
            .as_deref()
            .map(parse_iso_date)
            .transpose()?;
        let to = self.end_date.as_deref().map(parse_iso_date).transpose()?;
        if let (Some(from), Some(to)) = (from, to) {
            DateRange::new(from, to)?;
        }
        Ok((from, to))
    }
}

// ============================================================================
// Stats
// ============================================================================

#[instrument(name = "dashboard_stats", skip(app_state, user))]
pub async fn stats(
    State(app_state): State<AppState>,
    user: AuthUser,
    Query(params): Query<RangeParams>,
) -> Result<Json<DashboardStats>, ApiError> {
    let (from, to) = params.bounds()?;
    let anchor = OffsetDateTime::now_utc().date();

    // An explicit range narrows each period by intersection.
    let summary = app_state
        .dashboard
        .hours_summary(
            &user.id,
            clamp(today(anchor), from, to),
            clamp(this_week(anchor), from, to),
            clamp(this_month(anchor), from, to),
        )
        .await?;
    let active_project_count = app_state.dashboard.active_project_count(&user.id).await?;

    Ok(Json(DashboardStats {
        today_hours: round2(summary.today_hours),
        week_hours: round2(summary.week_hours),
        month_hours: round2(summary.month_hours),
        active_project_count,
    }))
}

// ============================================================================
// Project Breakdown
// ============================================================================

#[instrument(name = "dashboard_project_breakdown", skip(app_state, user))]
pub async fn project_breakdown(
    State(app_state): State<AppState>,
    user: AuthUser,
    Query(params): Query<RangeParams>,
) -> Result<Json<Vec<ProjectBreakdownItem>>, ApiError> {
    let (from, to) = params.bounds()?;
    let rows = app_state
        .dashboard
        .project_breakdown(&user.id, from, to)
        .await?;

    let shares = percentages(&rows.iter().map(|r| r.total_hours).collect_vec());
    let items = rows
        .into_iter()
        .zip(shares)
        .map(|(row, percentage)| ProjectBreakdownItem {
            project_id: row.project_id,
            project_name: row.project_name,
            project_color: row.project_color,
            total_hours: round2(row.total_hours),
            entry_count: row.entry_count,
            percentage,
        })
        .collect_vec();

    Ok(Json(items))
}

// ============================================================================
// Recent Activity
// ============================================================================

#[instrument(name = "dashboard_recent_activity", skip(app_state, user))]
pub async fn recent_activity(
    State(app_state): State<AppState>,
    user: AuthUser,
    Query(params): Query<RangeParams>,
) -> Result<Json<Vec<ActivityItem>>, ApiError> {
    let (from, to) = params.bounds()?;
    let limit = params
        .limit
        .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
        .clamp(1, MAX_ACTIVITY_LIMIT);

    let rows = app_state
        .dashboard
        .recent_activity(&user.id, from, to, limit)
        .await?;

    let items = rows
        .into_iter()
        .map(|row| ActivityItem {
            id: row.id,
            project_name: row.project_name,
            project_color: row.project_color,
            description: row.description,
            date: row.date,
            hours: row.hours,
            status: row.status.parse().unwrap_or_default(),
            created_at: row.created_at,
        })
        .collect_vec();

    Ok(Json(items))
}

// ============================================================================
// Department Hours
// ============================================================================

#[instrument(name = "dashboard_department_hours", skip(app_state, user))]
pub async fn department_hours(
    State(app_state): State<AppState>,
    user: AuthUser,
    Query(params): Query<RangeParams>,
) -> Result<Json<Vec<DepartmentHours>>, ApiError> {
    if !permissions_for(user.role).departments.view_all {
        return Err(ApiError::forbidden("insufficient permissions"));
    }

    let (from, to) = params.bounds()?;
    let rows = app_state.dashboard.department_hours(from, to).await?;

    let items = rows
        .into_iter()
        .map(|row| DepartmentHours {
            department_name: row.department_name,
            total_hours: round2(row.total_hours),
            employee_count: row.employee_count,
            entry_count: row.entry_count,
        })
        .collect_vec();

    Ok(Json(items))
}
