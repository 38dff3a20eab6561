use time::{format_description::BorrowedFormatItem, macros::format_description, Date, Duration};

use super::TimeEntryError;

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` query parameter.
pub fn parse_iso_date(input: &str) -> Result<Date, TimeEntryError> {
    Date::parse(input, ISO_DATE).map_err(|_| TimeEntryError::InvalidDate(input.to_string()))
}

/// Inclusive calendar-day range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> Result<Self, TimeEntryError> {
        if start > end {
            return Err(TimeEntryError::InvalidDateRange);
        }
        Ok(Self { start, end })
    }
}

/// The single-day range containing `anchor`.
pub fn today(anchor: Date) -> DateRange {
    DateRange {
        start: anchor,
        end: anchor,
    }
}

/// Monday through Sunday of the week containing `anchor`.
pub fn this_week(anchor: Date) -> DateRange {
    let monday = anchor - Duration::days(i64::from(anchor.weekday().number_days_from_monday()));
    DateRange {
        start: monday,
        end: monday + Duration::days(6),
    }
}

/// First through last day of the month containing `anchor`.
pub fn this_month(anchor: Date) -> DateRange {
    let last_day = anchor.month().length(anchor.year());
    DateRange {
        start: anchor.replace_day(1).expect("day 1 exists in every month"),
        end: anchor
            .replace_day(last_day)
            .expect("month length is a valid day"),
    }
}

/// Narrow `period` by optional explicit bounds. A disjoint result comes back
/// as an inverted pair, which matches nothing in a `BETWEEN` filter.
pub fn clamp(period: DateRange, from: Option<Date>, to: Option<Date>) -> (Date, Date) {
    let start = from.map_or(period.start, |f| f.max(period.start));
    let end = to.map_or(period.end, |t| t.min(period.end));
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn parses_iso_dates() {
        assert_eq!(parse_iso_date("2024-01-15").unwrap(), date!(2024 - 01 - 15));
        assert!(parse_iso_date("15/01/2024").is_err());
        assert!(parse_iso_date("2024-13-01").is_err());
    }

    #[test]
    fn week_starts_on_monday() {
        // 2024-01-17 is a Wednesday.
        let week = this_week(date!(2024 - 01 - 17));
        assert_eq!(week.start, date!(2024 - 01 - 15));
        assert_eq!(week.end, date!(2024 - 01 - 21));

        // A Monday anchors its own week.
        let week = this_week(date!(2024 - 01 - 15));
        assert_eq!(week.start, date!(2024 - 01 - 15));

        // A Sunday belongs to the week that started six days earlier.
        let week = this_week(date!(2024 - 01 - 21));
        assert_eq!(week.start, date!(2024 - 01 - 15));
    }

    #[test]
    fn week_spans_month_boundaries() {
        // 2024-03-01 is a Friday; its week started in February.
        let week = this_week(date!(2024 - 03 - 01));
        assert_eq!(week.start, date!(2024 - 02 - 26));
        assert_eq!(week.end, date!(2024 - 03 - 03));
    }

    #[test]
    fn month_boundaries_including_leap_february() {
        let month = this_month(date!(2024 - 02 - 10));
        assert_eq!(month.start, date!(2024 - 02 - 01));
        assert_eq!(month.end, date!(2024 - 02 - 29));

        let month = this_month(date!(2023 - 02 - 10));
        assert_eq!(month.end, date!(2023 - 02 - 28));
    }

    #[test]
    fn today_is_a_single_day() {
        let range = today(date!(2024 - 01 - 15));
        assert_eq!(range.start, range.end);
    }

    #[test]
    fn inverted_explicit_range_is_rejected() {
        assert!(DateRange::new(date!(2024 - 01 - 20), date!(2024 - 01 - 10)).is_err());
    }

    #[test]
    fn clamp_narrows_and_empties() {
        let month = this_month(date!(2024 - 01 - 15));
        let (start, end) = clamp(month, Some(date!(2024 - 01 - 10)), Some(date!(2024 - 01 - 20)));
        assert_eq!((start, end), (date!(2024 - 01 - 10), date!(2024 - 01 - 20)));

        // Disjoint bounds invert the pair; BETWEEN then matches nothing.
        let (start, end) = clamp(month, Some(date!(2024 - 02 - 01)), None);
        assert!(start > end);
    }
}
