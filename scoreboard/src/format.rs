/// Renders a tick rate with one decimal, trailing zeros stripped
/// ("12.5", "6").
pub fn format_fps(fps: f64) -> String {
    let formatted = format!("{:.1}", fps);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Renders a duration in milliseconds as `m:ss.cc`.
pub fn format_duration(total_ms: u64) -> String {
    let minutes = total_ms / 60_000;
    let seconds = (total_ms % 60_000) / 1000;
    let centis = (total_ms % 1000) / 10;
    format!("{}:{:02}.{:02}", minutes, seconds, centis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_fps_strips_trailing_zero() {
        assert_eq!(format_fps(6.0), "6");
        assert_eq!(format_fps(12.5), "12.5");
        assert_eq!(format_fps(8.33), "8.3");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00.00");
        assert_eq!(format_duration(83_450), "1:23.45");
        assert_eq!(format_duration(59_999), "0:59.99");
        assert_eq!(format_duration(600_000), "10:00.00");
    }
}
