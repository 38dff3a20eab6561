use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::instrument;

use crate::{
    app_state::AppState,
    auth::AuthUser,
    domain::{NewTimeEntry, TimeEntry, TimeEntryError, TimeEntryStatus},
    repositories::RepositoryError,
    routes::ApiError,
};

// ============================================================================
// Start Timer
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTimerPayload {
    project_id: Option<String>,
    task_id: Option<String>,
    description: Option<String>,
}

#[instrument(name = "start_timer", skip(app_state, user, body))]
pub async fn start_timer(
    State(app_state): State<AppState>,
    user: AuthUser,
    Json(body): Json<StartTimerPayload>,
) -> Result<(StatusCode, Json<TimeEntry>), ApiError> {
    if app_state.time_entries.active_timer(&user.id).await?.is_some() {
        return Err(TimeEntryError::TimerAlreadyRunning.into());
    }

    let now = OffsetDateTime::now_utc();
    let new_entry = NewTimeEntry {
        user_id: user.id.clone(),
        project_id: body.project_id,
        task_id: body.task_id,
        date: now.date(),
        start_time: Some(now),
        end_time: None,
        hours: 0.0,
        status: TimeEntryStatus::Running,
        billable: false,
        is_manual_entry: false,
        is_timer_entry: true,
        description: body.description,
    };

    // The partial unique index catches a racing second start; the repository
    // reports it as Conflict, which maps to 409.
    match app_state.time_entries.start_timer(&new_entry).await {
        Ok(entry) => Ok((StatusCode::CREATED, Json(entry))),
        Err(RepositoryError::Conflict(_)) => Err(TimeEntryError::TimerAlreadyRunning.into()),
        Err(e) => Err(e.into()),
    }
}

// ============================================================================
// Stop Timer
// ============================================================================

#[instrument(name = "stop_timer", skip(app_state, user))]
pub async fn stop_timer(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<TimeEntry>, ApiError> {
    let entry = app_state
        .time_entries
        .get(&id, Some(&user.id))
        .await?
        .ok_or_else(|| ApiError::not_found("time entry not found"))?;

    if entry.status != TimeEntryStatus::Running {
        return Err(TimeEntryError::NotRunning.into());
    }

    let stopped = app_state
        .time_entries
        .stop_timer(&id, &user.id, OffsetDateTime::now_utc())
        .await?
        // Lost a race against another stop of the same entry.
        .ok_or_else(|| ApiError::from(TimeEntryError::NotRunning))?;

    Ok(Json(stopped))
}

// ============================================================================
// Active Timer
// ============================================================================

/// The single running entry, or `null`. Pollers compute elapsed time
/// client-side from `startTime`; nothing is persisted until stop.
#[instrument(name = "active_timer", skip(app_state, user))]
pub async fn active_timer(
    State(app_state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Option<TimeEntry>>, ApiError> {
    let timer = app_state.time_entries.active_timer(&user.id).await?;
    Ok(Json(timer))
}
