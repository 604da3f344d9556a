/// Human readable throughput, scaled in steps of 1000.
/// e.g. 999.0 -> "999.0B/s", 1_500_000.0 -> "1.5MB/s"
pub fn format_speed(speed: f64) -> String {
    let mut speed = speed;
    for unit in ["", "K", "M", "G"] {
        if speed.abs() < 1000.0 {
            return format!("{:3.1}{}B/s", speed, unit);
        }
        speed /= 1000.0;
    }
    format!("{:.1}TB/s", speed)
}

/// First `max` characters of `s` (not bytes, so multi-byte text is safe)
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_speed_boundaries() {
        assert_eq!(format_speed(999.0), "999.0B/s");
        assert_eq!(format_speed(1000.0), "1.0KB/s");
        assert_eq!(format_speed(1_000_000.0), "1.0MB/s");
        assert_eq!(format_speed(2_500_000_000.0), "2.5GB/s");
        assert_eq!(format_speed(1e12), "1.0TB/s");
        assert_eq!(format_speed(4.2e15), "4200.0TB/s");
    }

    #[test]
    fn test_format_speed_small_values() {
        assert_eq!(format_speed(0.0), "0.0B/s");
        assert_eq!(format_speed(12.34), "12.3B/s");
        assert_eq!(format_speed(1536.0), "1.5KB/s");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("https://a.org/", 50), "https://a.org/");
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("ümläut", 2), "üm");
        assert_eq!(truncate_chars("", 5), "");
    }
}
