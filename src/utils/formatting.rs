use chrono::DateTime;

/// Renders a 0..=1 confidence as a whole percentage, e.g. `92%`.
pub fn format_confidence(confidence: f64) -> String {
    format!("{}%", (confidence * 100.0).round() as i64)
}

/// Renders an ISO-8601 timestamp as `YYYY-MM-DD HH:MM`. Unparseable input is
/// shown as-is rather than hidden.
pub fn format_timestamp(iso: &str) -> String {
    match DateTime::parse_from_rfc3339(iso) {
        Ok(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => iso.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_rounds_to_whole_percent() {
        assert_eq!(format_confidence(0.924), "92%");
        assert_eq!(format_confidence(0.925), "93%");
        assert_eq!(format_confidence(1.0), "100%");
        assert_eq!(format_confidence(0.0), "0%");
    }

    #[test]
    fn timestamp_formats_rfc3339() {
        assert_eq!(
            format_timestamp("2024-03-05T14:30:00Z"),
            "2024-03-05 14:30"
        );
    }

    #[test]
    fn timestamp_passes_through_garbage() {
        assert_eq!(format_timestamp("yesterday"), "yesterday");
        assert_eq!(format_timestamp(""), "");
    }
}
