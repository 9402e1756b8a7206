//! Human-readable byte sizes for telemetry output.

/// Format a byte count as a human-readable size (`1.4 kB`, `312 B`).
///
/// Decimal units, two significant display forms: integers below 1 kB,
/// one decimal place above.
pub fn human(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "kB", "MB", "GB", "TB"];

    if bytes < 1000 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

/// Percentage saved between a before and after size.
///
/// Returns 0 when nothing was saved (or the file grew).
pub fn saved_percent(before: u64, after: u64) -> u64 {
    if before == 0 || after >= before {
        return 0;
    }
    ((before - after) * 100) / before
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_bytes() {
        assert_eq!(human(0), "0 B");
        assert_eq!(human(999), "999 B");
        assert_eq!(human(1000), "1.0 kB");
        assert_eq!(human(1436), "1.4 kB");
        assert_eq!(human(2_500_000), "2.5 MB");
    }

    #[test]
    fn test_saved_percent() {
        assert_eq!(saved_percent(100, 25), 75);
        assert_eq!(saved_percent(100, 100), 0);
        assert_eq!(saved_percent(0, 10), 0);
        assert_eq!(saved_percent(50, 80), 0);
    }
}
