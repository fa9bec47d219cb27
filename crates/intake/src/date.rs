use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const CALENDAR_DATE_FORMAT: &str = "%Y-%m-%d";

/// Normalise a stored date value to `YYYY-MM-DD` for display.
///
/// Accepts RFC 3339 timestamps (converted to UTC first), plain calendar dates and naive
/// date-times as the backend emits them. Absent, blank or unparseable values display as `""`.
/// The stored value itself is never rewritten.
pub fn format_calendar_date(value: Option<&str>) -> String {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return String::new();
    };

    match parse_calendar_date(raw) {
        Some(date) => date.format(CALENDAR_DATE_FORMAT).to_string(),
        None => {
            tracing::debug!("unparseable date value left blank for display: {raw:?}");
            String::new()
        }
    }
}

fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc).date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, CALENDAR_DATE_FORMAT) {
        return Some(date);
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .into_iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|timestamp| timestamp.date())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_or_blank_is_empty() {
        assert_eq!(format_calendar_date(None), "");
        assert_eq!(format_calendar_date(Some("")), "");
        assert_eq!(format_calendar_date(Some("   ")), "");
    }

    #[test]
    fn utc_timestamp_keeps_its_date() {
        assert_eq!(
            format_calendar_date(Some("2020-05-03T00:00:00Z")),
            "2020-05-03"
        );
    }

    #[test]
    fn offset_timestamps_are_read_in_utc() {
        assert_eq!(
            format_calendar_date(Some("2020-05-03T22:30:00-06:00")),
            "2020-05-04"
        );
    }

    #[test]
    fn plain_and_naive_forms_are_accepted() {
        assert_eq!(format_calendar_date(Some("1990-01-15")), "1990-01-15");
        assert_eq!(
            format_calendar_date(Some("1990-01-15T08:00:00.000")),
            "1990-01-15"
        );
        assert_eq!(
            format_calendar_date(Some("1990-01-15 08:00:00")),
            "1990-01-15"
        );
    }

    #[test]
    fn garbage_displays_blank() {
        assert_eq!(format_calendar_date(Some("15/01/1990")), "");
    }
}
