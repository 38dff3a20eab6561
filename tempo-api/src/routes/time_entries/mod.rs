mod timer;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::instrument;

use crate::{
    app_state::AppState,
    auth::AuthUser,
    domain::{
        parse_iso_date, permissions_for, resolve_times, DateRange, NewTimeEntry, TimeEntry,
        TimeEntryError, TimeEntryStatus,
    },
    repositories::TimeEntryFilter,
    routes::ApiError,
};

const MAX_PAGE_SIZE: i64 = 500;
const DEFAULT_PAGE_SIZE: i64 = 100;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_time_entries).post(create_time_entry))
        .route("/active", get(timer::active_timer))
        .route("/timer", post(timer::start_timer))
        .route(
            "/:id",
            get(get_time_entry)
                .put(update_time_entry)
                .delete(delete_time_entry),
        )
        .route("/:id/stop", post(timer::stop_timer))
}

fn parse_rfc3339(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<OffsetDateTime>, TimeEntryError> {
    value
        .filter(|v| !v.is_empty())
        .map(|v| {
            OffsetDateTime::parse(v, &Rfc3339).map_err(|e| {
                TimeEntryError::invalid_field(field, format!("expected RFC 3339 timestamp: {e}"))
            })
        })
        .transpose()
}

// ============================================================================
// List / Get
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTimeEntriesParams {
    project_id: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

#[instrument(name = "list_time_entries", skip(app_state, user))]
pub async fn list_time_entries(
    State(app_state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ListTimeEntriesParams>,
) -> Result<Json<Vec<TimeEntry>>, ApiError> {
    let from = params
        .start_date
        .as_deref()
        .map(parse_iso_date)
        .transpose()?;
    let to = params.end_date.as_deref().map(parse_iso_date).transpose()?;
    if let (Some(from), Some(to)) = (from, to) {
        DateRange::new(from, to)?;
    }

    let filter = TimeEntryFilter {
        project_id: params.project_id,
        from,
        to,
        limit: params
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE),
        offset: params.offset.unwrap_or(0).max(0),
    };

    let entries = app_state.time_entries.list(&user.id, &filter).await?;
    Ok(Json(entries))
}

#[instrument(name = "get_time_entry", skip(app_state, user))]
pub async fn get_time_entry(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<TimeEntry>, ApiError> {
    let perms = permissions_for(user.role);
    let scope = (!perms.time_entries.view_all).then_some(user.id.as_str());

    let entry = app_state
        .time_entries
        .get(&id, scope)
        .await?
        .ok_or_else(|| ApiError::not_found("time entry not found"))?;

    Ok(Json(entry))
}

// ============================================================================
// Create
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimeEntryPayload {
    project_id: Option<String>,
    task_id: Option<String>,
    description: Option<String>,
    date: String,
    start_time: Option<String>,
    end_time: Option<String>,
    #[serde(alias = "duration")]
    hours: Option<f64>,
    #[serde(alias = "isBillable")]
    billable: Option<bool>,
}

#[instrument(name = "create_time_entry", skip(app_state, user, body))]
pub async fn create_time_entry(
    State(app_state): State<AppState>,
    user: AuthUser,
    Json(body): Json<CreateTimeEntryPayload>,
) -> Result<(StatusCode, Json<TimeEntry>), ApiError> {
    let date = parse_iso_date(&body.date)?;
    let start_time = parse_rfc3339("startTime", body.start_time.as_deref())?;
    let end_time = parse_rfc3339("endTime", body.end_time.as_deref())?;
    let resolved = resolve_times(date, start_time, end_time, body.hours)?;

    let new_entry = NewTimeEntry {
        user_id: user.id.clone(),
        project_id: body.project_id,
        task_id: body.task_id,
        date,
        start_time: resolved.start_time,
        end_time: resolved.end_time,
        hours: resolved.hours,
        status: TimeEntryStatus::Draft,
        billable: body.billable.unwrap_or(false),
        is_manual_entry: true,
        is_timer_entry: false,
        description: body.description,
    };

    let entry = app_state.time_entries.create(&new_entry).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

// ============================================================================
// Update
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTimeEntryPayload {
    project_id: Option<String>,
    task_id: Option<String>,
    description: Option<String>,
    date: Option<String>,
    start_time: Option<String>,
    end_time: Option<String>,
    #[serde(alias = "duration")]
    hours: Option<f64>,
    #[serde(alias = "isBillable")]
    billable: Option<bool>,
    is_approved: Option<bool>,
    status: Option<TimeEntryStatus>,
}

#[instrument(name = "update_time_entry", skip(app_state, user, body))]
pub async fn update_time_entry(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateTimeEntryPayload>,
) -> Result<Json<TimeEntry>, ApiError> {
    let perms = permissions_for(user.role);
    let scope = (!(perms.time_entries.edit && perms.time_entries.view_all))
        .then_some(user.id.as_str());

    let mut entry = app_state
        .time_entries
        .get(&id, scope)
        .await?
        .ok_or_else(|| ApiError::not_found("time entry not found"))?;

    let start_time = parse_rfc3339("startTime", body.start_time.as_deref())?;
    let end_time = parse_rfc3339("endTime", body.end_time.as_deref())?;

    if let Some(project_id) = body.project_id {
        entry.project_id = Some(project_id);
    }
    if let Some(task_id) = body.task_id {
        entry.task_id = Some(task_id);
    }
    if let Some(description) = body.description {
        entry.description = Some(description);
    }
    if let Some(date) = body.date.as_deref() {
        entry.date = parse_iso_date(date)?;
    }
    if let Some(billable) = body.billable {
        entry.billable = billable;
    }
    if let Some(is_approved) = body.is_approved {
        entry.is_approved = is_approved;
    }
    if let Some(status) = body.status {
        // Entries enter the running state through the timer endpoint only.
        if status == TimeEntryStatus::Running && entry.status != TimeEntryStatus::Running {
            return Err(TimeEntryError::invalid_field(
                "status",
                "timers are started via the timer endpoint",
            )
            .into());
        }
        entry.status = status;
    }

    if entry.status == TimeEntryStatus::Running {
        // A running timer has no meaningful duration yet; only its start
        // may be adjusted. end_time and hours are finalized by stop.
        if let Some(start_time) = start_time {
            entry.start_time = Some(start_time);
        }
    } else if start_time.is_some() || end_time.is_some() || body.hours.is_some() {
        let resolved = resolve_times(
            entry.date,
            start_time.or(entry.start_time),
            end_time.or(entry.end_time),
            body.hours,
        )?;
        entry.start_time = resolved.start_time;
        entry.end_time = resolved.end_time;
        entry.hours = resolved.hours;
    }

    let updated = app_state
        .time_entries
        .update(&entry, scope)
        .await?
        .ok_or_else(|| ApiError::not_found("time entry not found"))?;

    Ok(Json(updated))
}

// ============================================================================
// Delete
// ============================================================================

#[instrument(name = "delete_time_entry", skip(app_state, user))]
pub async fn delete_time_entry(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    // Owners may always delete their own entries; elevated roles may delete
    // anyone's.
    let perms = permissions_for(user.role);
    let scope = (!(perms.time_entries.delete && perms.time_entries.view_all))
        .then_some(user.id.as_str());

    let deleted = app_state.time_entries.delete(&id, scope).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("time entry not found"))
    }
}
