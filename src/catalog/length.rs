use std::time::Duration;

/// Convert a `"M:SS"` length into a duration.
///
/// Minutes may exceed 59; seconds must be below 60. Anything else, including
/// a length too large to count in seconds, is `None`.
pub fn parse_length(text: &str) -> Option<Duration> {
    let (minutes, seconds) = text.trim().split_once(':')?;
    let minutes: u64 = minutes.trim().parse().ok()?;
    let seconds: u64 = seconds.trim().parse().ok()?;
    if seconds >= 60 {
        return None;
    }
    let total = minutes.checked_mul(60)?.checked_add(seconds)?;
    Some(Duration::from_secs(total))
}

/// Format a duration as `M:SS`, dropping partial seconds.
pub fn format_clock(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
