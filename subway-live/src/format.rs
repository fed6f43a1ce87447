//! Display formatting for countdowns and clock times.

use crate::domain::Timestamp;

/// Format the time remaining until `target` as `M:SS`.
///
/// Once the target has passed the countdown reads `"Departed"`; it
/// never shows negative time.
pub fn format_countdown(target: Timestamp, now: Timestamp) -> String {
    let remaining = target - now;
    if remaining < 0 {
        return "Departed".to_string();
    }
    format!("{}:{:02}", remaining / 60, remaining % 60)
}

/// Format a stop's wait in whole minutes, as departure boards show it.
///
/// Rounds down; a train 59 seconds out is "0 min".
pub fn format_wait_minutes(target: Timestamp, now: Timestamp) -> String {
    let remaining = (target - now).max(0);
    format!("{} min", remaining / 60)
}
