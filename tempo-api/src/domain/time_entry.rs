use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use time::{macros::time, Date, Duration, OffsetDateTime};

use super::TimeEntryError;

/// Lifecycle state of a time entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TimeEntryStatus {
    #[default]
    Draft,
    Running,
    Paused,
    Stopped,
    Completed,
}

/// A record of hours worked, enriched with project/task display fields on
/// the read side. `hours` is the canonical duration; a missing project join
/// falls back to the "Unknown Project" sentinel instead of failing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: String,
    pub user_id: String,
    pub project_id: Option<String>,
    pub task_id: Option<String>,
    pub date: Date,
    #[serde(with = "time::serde::rfc3339::option")]
    pub start_time: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub end_time: Option<OffsetDateTime>,
    pub hours: f64,
    pub status: TimeEntryStatus,
    pub billable: bool,
    pub is_approved: bool,
    pub is_manual_entry: bool,
    pub is_timer_entry: bool,
    pub is_template: bool,
    pub description: Option<String>,
    pub project_name: String,
    pub project_color: Option<String>,
    pub task_name: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Data for inserting a new entry.
#[derive(Debug, Clone)]
pub struct NewTimeEntry {
    pub user_id: String,
    pub project_id: Option<String>,
    pub task_id: Option<String>,
    pub date: Date,
    pub start_time: Option<OffsetDateTime>,
    pub end_time: Option<OffsetDateTime>,
    pub hours: f64,
    pub status: TimeEntryStatus,
    pub billable: bool,
    pub is_manual_entry: bool,
    pub is_timer_entry: bool,
    pub description: Option<String>,
}

/// Start/end/hours triple after validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedTimes {
    pub start_time: Option<OffsetDateTime>,
    pub end_time: Option<OffsetDateTime>,
    pub hours: f64,
}

/// Reference hour for the synthesized display pair of duration-only entries.
const REFERENCE_START: time::Time = time!(9:00);

/// Upper bound for a single entry's duration.
const MAX_ENTRY_HOURS: f64 = 1000.0;

/// Round hours to the nearest 0.01 h. Applied uniformly to manual entries,
/// patches and timer-derived durations.
pub fn round2(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

/// Resolve the duration of an entry from whichever of `start_time`,
/// `end_time` and `hours` the caller supplied.
///
/// - both times given: `end` must be after `start`; hours derive from the
///   difference unless an explicit duration accompanies them, in which case
///   the duration is authoritative and the times are kept as display data;
/// - duration given with at most one time: the missing side of the display
///   pair is synthesized (anchored at 09:00 on `date` when neither time is
///   present);
/// - neither resolvable: rejected.
pub fn resolve_times(
    date: Date,
    start_time: Option<OffsetDateTime>,
    end_time: Option<OffsetDateTime>,
    hours: Option<f64>,
) -> Result<ResolvedTimes, TimeEntryError> {
    if let Some(h) = hours {
        if !h.is_finite() || h < 0.0 {
            return Err(TimeEntryError::invalid_field(
                "duration",
                "must be a non-negative number of hours",
            ));
        }
        if h > MAX_ENTRY_HOURS {
            return Err(TimeEntryError::invalid_field(
                "duration",
                format!("must not exceed {MAX_ENTRY_HOURS} hours"),
            ));
        }
    }

    match (start_time, end_time) {
        (Some(start), Some(end)) => {
            if end <= start {
                return Err(TimeEntryError::EndBeforeStart);
            }
            let derived = (end - start).as_seconds_f64() / 3600.0;
            Ok(ResolvedTimes {
                start_time: Some(start),
                end_time: Some(end),
                hours: round2(hours.unwrap_or(derived)),
            })
        }
        (start, end) => {
            let h = round2(hours.ok_or(TimeEntryError::MissingField("duration"))?);
            // A zero-duration entry keeps whatever times it was given; a
            // synthesized pair would collapse to start == end.
            if h == 0.0 {
                return Ok(ResolvedTimes {
                    start_time: start,
                    end_time: end,
                    hours: 0.0,
                });
            }
            let span = Duration::seconds_f64(h * 3600.0);
            let out_of_range =
                || TimeEntryError::invalid_field("date", "resolved times fall out of range");
            let (start, end) = match (start, end) {
                (Some(s), None) => (s, s.checked_add(span).ok_or_else(out_of_range)?),
                (None, Some(e)) => (e.checked_sub(span).ok_or_else(out_of_range)?, e),
                _ => {
                    let s = date.with_time(REFERENCE_START).assume_utc();
                    (s, s.checked_add(span).ok_or_else(out_of_range)?)
                }
            };
            Ok(ResolvedTimes {
                start_time: Some(start),
                end_time: Some(end),
                hours: h,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, date};

    #[test]
    fn duration_only_synthesizes_display_pair() {
        let resolved = resolve_times(date!(2024 - 01 - 15), None, None, Some(2.5)).unwrap();
        assert_eq!(resolved.hours, 2.5);
        assert_eq!(resolved.start_time, Some(datetime!(2024-01-15 9:00 UTC)));
        assert_eq!(resolved.end_time, Some(datetime!(2024-01-15 11:30 UTC)));
    }

    #[test]
    fn start_and_end_derive_hours() {
        let resolved = resolve_times(
            date!(2024 - 01 - 15),
            Some(datetime!(2024-01-15 13:00 UTC)),
            Some(datetime!(2024-01-15 14:30 UTC)),
            None,
        )
        .unwrap();
        assert_eq!(resolved.hours, 1.5);
    }

    #[test]
    fn explicit_duration_is_authoritative_over_times() {
        let resolved = resolve_times(
            date!(2024 - 01 - 15),
            Some(datetime!(2024-01-15 13:00 UTC)),
            Some(datetime!(2024-01-15 14:30 UTC)),
            Some(2.0),
        )
        .unwrap();
        assert_eq!(resolved.hours, 2.0);
        assert_eq!(resolved.start_time, Some(datetime!(2024-01-15 13:00 UTC)));
    }

    #[test]
    fn end_before_start_is_rejected() {
        let err = resolve_times(
            date!(2024 - 01 - 15),
            Some(datetime!(2024-01-15 14:00 UTC)),
            Some(datetime!(2024-01-15 13:00 UTC)),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, TimeEntryError::EndBeforeStart));

        let err = resolve_times(
            date!(2024 - 01 - 15),
            Some(datetime!(2024-01-15 14:00 UTC)),
            Some(datetime!(2024-01-15 14:00 UTC)),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, TimeEntryError::EndBeforeStart));
    }

    #[test]
    fn negative_duration_is_rejected() {
        let err = resolve_times(date!(2024 - 01 - 15), None, None, Some(-1.0)).unwrap_err();
        assert!(matches!(err, TimeEntryError::InvalidField { field: "duration", .. }));
    }

    #[test]
    fn zero_duration_keeps_times_as_given() {
        let resolved = resolve_times(date!(2024 - 01 - 15), None, None, Some(0.0)).unwrap();
        assert_eq!(resolved.hours, 0.0);
        assert_eq!(resolved.start_time, None);
        assert_eq!(resolved.end_time, None);
    }

    #[test]
    fn absurdly_long_duration_is_rejected() {
        let err = resolve_times(date!(2024 - 01 - 15), None, None, Some(5000.0)).unwrap_err();
        assert!(matches!(err, TimeEntryError::InvalidField { field: "duration", .. }));
    }

    #[test]
    fn nothing_resolvable_is_rejected() {
        let err = resolve_times(date!(2024 - 01 - 15), None, None, None).unwrap_err();
        assert!(matches!(err, TimeEntryError::MissingField("duration")));

        // A lone start time without a duration is not resolvable either.
        let err = resolve_times(
            date!(2024 - 01 - 15),
            Some(datetime!(2024-01-15 9:00 UTC)),
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, TimeEntryError::MissingField("duration")));
    }

    #[test]
    fn duration_with_start_extends_forward() {
        let resolved = resolve_times(
            date!(2024 - 01 - 15),
            Some(datetime!(2024-01-15 13:00 UTC)),
            None,
            Some(1.5),
        )
        .unwrap();
        assert_eq!(resolved.end_time, Some(datetime!(2024-01-15 14:30 UTC)));
    }

    #[test]
    fn ninety_minutes_rounds_to_one_and_a_half() {
        let start = datetime!(2024-01-15 10:00 UTC);
        let end = start + Duration::minutes(90);
        let resolved = resolve_times(date!(2024 - 01 - 15), Some(start), Some(end), None).unwrap();
        assert!((resolved.hours - 1.5).abs() < 0.01);
    }

    #[test]
    fn rounding_is_two_decimals() {
        assert_eq!(round2(1.005), 1.0);
        assert_eq!(round2(2.4999), 2.5);
        assert_eq!(round2(0.111), 0.11);
    }

    #[test]
    fn entries_serialize_with_camel_case_and_rfc3339() {
        let entry = TimeEntry {
            id: "te-1".to_string(),
            user_id: "u-1".to_string(),
            project_id: Some("p-1".to_string()),
            task_id: None,
            date: date!(2024 - 01 - 15),
            start_time: Some(datetime!(2024-01-15 9:00 UTC)),
            end_time: Some(datetime!(2024-01-15 11:30 UTC)),
            hours: 2.5,
            status: TimeEntryStatus::Draft,
            billable: false,
            is_approved: false,
            is_manual_entry: true,
            is_timer_entry: false,
            is_template: false,
            description: None,
            project_name: "Atlas".to_string(),
            project_color: Some("#2563eb".to_string()),
            task_name: None,
            created_at: datetime!(2024-01-15 12:00 UTC),
            updated_at: datetime!(2024-01-15 12:00 UTC),
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["userId"], "u-1");
        assert_eq!(json["hours"], 2.5);
        assert_eq!(json["status"], "draft");
        assert_eq!(json["date"], "2024-01-15");
        assert_eq!(json["startTime"], "2024-01-15T09:00:00Z");
        assert_eq!(json["projectName"], "Atlas");
        assert_eq!(json["isManualEntry"], true);
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            TimeEntryStatus::Draft,
            TimeEntryStatus::Running,
            TimeEntryStatus::Paused,
            TimeEntryStatus::Stopped,
            TimeEntryStatus::Completed,
        ] {
            assert_eq!(status.to_string().parse::<TimeEntryStatus>().unwrap(), status);
        }
    }
}
