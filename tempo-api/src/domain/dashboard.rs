use serde::Serialize;
use time::{Date, OffsetDateTime};

use super::TimeEntryStatus;

/// Headline figures for the dashboard. Always fully populated — a user with
/// zero entries gets zeros, never nulls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub today_hours: f64,
    pub week_hours: f64,
    pub month_hours: f64,
    pub active_project_count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBreakdownItem {
    pub project_id: Option<String>,
    pub project_name: String,
    pub project_color: Option<String>,
    pub total_hours: f64,
    pub entry_count: i64,
    pub percentage: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    pub id: String,
    pub project_name: String,
    pub project_color: Option<String>,
    pub description: Option<String>,
    pub date: Date,
    pub hours: f64,
    pub status: TimeEntryStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentHours {
    pub department_name: String,
    pub total_hours: f64,
    pub employee_count: i64,
    pub entry_count: i64,
}

/// Share of the grand total for each hour figure, rounded to whole percent.
/// Rounding may make the shares sum to slightly more or less than 100; that
/// drift is accepted, not corrected.
pub fn percentages(hours: &[f64]) -> Vec<i64> {
    let grand_total: f64 = hours.iter().sum();
    hours
        .iter()
        .map(|h| {
            if grand_total > 0.0 {
                (100.0 * h / grand_total).round() as i64
            } else {
                0
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_to_one_split_is_75_25() {
        assert_eq!(percentages(&[3.0, 1.0]), vec![75, 25]);
    }

    #[test]
    fn zero_total_yields_zero_percentages() {
        assert_eq!(percentages(&[0.0, 0.0]), vec![0, 0]);
        assert_eq!(percentages(&[]), Vec::<i64>::new());
    }

    #[test]
    fn percentages_are_non_negative_and_near_100() {
        let shares = percentages(&[1.0, 1.0, 1.0]);
        assert!(shares.iter().all(|&p| p >= 0));
        // 33 + 33 + 33 = 99 — rounding drift is expected.
        assert_eq!(shares.iter().sum::<i64>(), 99);
    }

    #[test]
    fn stats_serialize_as_camel_case() {
        let stats = DashboardStats {
            today_hours: 0.0,
            week_hours: 0.0,
            month_hours: 0.0,
            active_project_count: 0,
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["todayHours"], 0.0);
        assert_eq!(json["weekHours"], 0.0);
        assert_eq!(json["monthHours"], 0.0);
        assert_eq!(json["activeProjectCount"], 0);
    }
}
