use chrono::{DateTime, NaiveDate};

pub const BLANK: &str = "—";

/// Renders a server date as `Jan 2, 2024`. Accepts RFC 3339 timestamps and
/// bare `YYYY-MM-DD` dates; anything else shows as a dash.
pub fn display_date(value: &str) -> String {
    let value = value.trim();
    let date = DateTime::parse_from_rfc3339(value)
        .map(|stamp| stamp.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"));
    match date {
        Ok(date) => date.format("%b %-d, %Y").to_string(),
        Err(_) => BLANK.to_string(),
    }
}

pub fn display_optional_date(value: Option<&str>) -> String {
    value.map_or_else(|| BLANK.to_string(), display_date)
}

pub fn or_blank(value: &str) -> &str {
    if value.trim().is_empty() { BLANK } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_render_from_timestamps_and_plain_dates() {
        assert_eq!(display_date("2024-01-02T00:00:00.000Z"), "Jan 2, 2024");
        assert_eq!(display_date("2024-11-30"), "Nov 30, 2024");
    }

    #[test]
    fn unparsable_or_missing_dates_are_blank() {
        assert_eq!(display_date(""), BLANK);
        assert_eq!(display_date("yesterday"), BLANK);
        assert_eq!(display_optional_date(None), BLANK);
        assert_eq!(display_optional_date(Some("2024-02-29")), "Feb 29, 2024");
    }

    #[test]
    fn blank_text_becomes_dash() {
        assert_eq!(or_blank("  "), BLANK);
        assert_eq!(or_blank("INV-1"), "INV-1");
    }
}
