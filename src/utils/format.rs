use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse a backend timestamp. Rows written before the timezone fix are
/// naive ISO strings; those are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Format a backend timestamp for display as dd/mm/yyyy HH:MM
pub fn format_timestamp(raw: Option<&str>) -> String {
    match raw.and_then(parse_timestamp) {
        Some(dt) => dt.format("%d/%m/%Y %H:%M").to_string(),
        None => "-".to_string(),
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format an optional string, returning a default if None
pub fn format_optional(value: &Option<String>, default: &str) -> String {
    value.as_deref().unwrap_or(default).to_string()
}

/// Format a quantity with an explicit sign, for net-balance displays
pub fn format_signed(value: i64) -> String {
    if value > 0 {
        format!("+{}", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_timestamp_with_offset() {
        let dt = parse_timestamp("2025-01-07T14:25:30.123456-03:00").unwrap();
        assert_eq!(dt.hour(), 17);
    }

    #[test]
    fn test_parse_timestamp_naive() {
        let dt = parse_timestamp("2025-01-07T14:25:30").unwrap();
        assert_eq!(dt.hour(), 14);
        assert!(parse_timestamp("not a date").is_none());
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            format_timestamp(Some("2025-01-07T14:25:30+00:00")),
            "07/01/2025 14:25"
        );
        assert_eq!(format_timestamp(None), "-");
        assert_eq!(format_timestamp(Some("garbage")), "-");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
    }

    #[test]
    fn test_format_signed() {
        assert_eq!(format_signed(12), "+12");
        assert_eq!(format_signed(-3), "-3");
        assert_eq!(format_signed(0), "0");
    }
}
