use std::time::Duration;


const MS_PER_SECOND: u128 = 1_000;
const MS_PER_MINUTE: u128 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u128 = 60 * MS_PER_MINUTE;

/// Below this the display shows tenths of a second.
const TENTHS_THRESHOLD: u128 = 5 * MS_PER_MINUTE;

/// Renders a remaining time for display.
///
/// * `H:MM:SS` from one hour upwards
/// * `M:SS` from five minutes up to an hour
/// * `M:SS.D` below five minutes
///
/// Parts smaller than the last displayed unit are truncated, so a clock
/// never shows more time than is actually left.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use kingly_clock_lib::format_time;
///
/// assert_eq!(format_time(Duration::from_millis(59_800)), "0:59.8");
/// assert_eq!(format_time(Duration::from_millis(300_000)), "5:00");
/// assert_eq!(format_time(Duration::from_millis(3_600_000)), "1:00:00");
/// ```
pub fn format_time(remaining: Duration) -> String {
    let ms = remaining.as_millis();
    let seconds = ms / MS_PER_SECOND % 60;

    if ms >= MS_PER_HOUR {
        let hours = ms / MS_PER_HOUR;
        let minutes = ms / MS_PER_MINUTE % 60;
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else if ms >= TENTHS_THRESHOLD {
        let minutes = ms / MS_PER_MINUTE;
        format!("{minutes}:{seconds:02}")
    } else {
        let minutes = ms / MS_PER_MINUTE;
        let tenths = ms / 100 % 10;
        format!("{minutes}:{seconds:02}.{tenths}")
    }
}

/// Same as [`format_time`] for a plain millisecond count.
pub fn format_ms(ms: u64) -> String {
    format_time(Duration::from_millis(ms))
}
