use std::fmt::Write;

use chrono::{DateTime, Utc};

const UNITS: &[&str] = &["Bytes", "KB", "MB", "GB", "TB"];

/// Humanize a byte count with 1024 steps and at most two decimals,
/// trailing zeros dropped: `0 Bytes`, `1 KB`, `1.5 KB`, `2.25 MB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[unit])
}

/// Render an upload date with a chrono format string; `—` when unknown
/// or when `fmt` holds an invalid specifier.
pub fn format_date(date: Option<&DateTime<Utc>>, fmt: &str) -> String {
    let Some(d) = date else {
        return "—".to_string();
    };
    let mut out = String::new();
    match write!(out, "{}", d.format(fmt)) {
        Ok(()) => out,
        Err(_) => "—".to_string(),
    }
}

/// Shorten `text` to `max` characters, ending with `…` when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_file_size_zero() {
        assert_eq!(format_file_size(0), "0 Bytes");
    }

    #[test]
    fn test_file_size_exact_kb() {
        assert_eq!(format_file_size(1024), "1 KB");
    }

    #[test]
    fn test_file_size_fractional_kb() {
        assert_eq!(format_file_size(1536), "1.5 KB");
    }

    #[test]
    fn test_file_size_small_and_large() {
        assert_eq!(format_file_size(1), "1 Bytes");
        assert_eq!(format_file_size(1023), "1023 Bytes");
        assert_eq!(format_file_size(1_048_576), "1 MB");
        assert_eq!(format_file_size(2_359_296), "2.25 MB");
        assert_eq!(format_file_size(1_073_741_824), "1 GB");
    }

    #[test]
    fn test_file_size_two_decimals() {
        // 1234 / 1024 = 1.205...
        assert_eq!(format_file_size(1234), "1.21 KB");
    }

    #[test]
    fn test_format_date() {
        let d = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 6).unwrap();
        assert_eq!(format_date(Some(&d), "%d.%m.%Y"), "09.03.2024");
        assert_eq!(format_date(Some(&d), "%Y-%m-%d"), "2024-03-09");
        assert_eq!(format_date(None, "%Y-%m-%d"), "—");
    }

    #[test]
    fn test_format_date_invalid_specifier() {
        let d = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 6).unwrap();
        assert_eq!(format_date(Some(&d), "%Q"), "—");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long file name.pdf", 8), "a long …");
        assert_eq!(truncate("ünïcödé", 4), "ünï…");
    }
}
