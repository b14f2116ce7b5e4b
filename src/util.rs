/// Formats a tick count as `mm:ss`.
pub fn format_time(seconds: u32) -> String {
    let minutes = seconds / 60;
    let remaining = seconds % 60;
    format!("{minutes:02}:{remaining:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(20), "00:20");
        assert_eq!(format_time(75), "01:15");
    }

    #[test]
    fn test_format_time_zero() {
        assert_eq!(format_time(0), "00:00");
    }

    #[test]
    fn test_format_time_long() {
        assert_eq!(format_time(3_600), "60:00");
        assert_eq!(format_time(6_001), "100:01");
    }
}
