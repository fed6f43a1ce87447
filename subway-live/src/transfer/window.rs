//! Transfer window evaluation.
//!
//! Classifies the slack between an arrival and a connecting departure,
//! and detects status transitions for one-shot notifications. Evaluation
//! is a pure function of `(arrival, departure, now)` recomputed every
//! tick; the only state is the small [`TransferMonitor`] the caller owns
//! and threads across ticks.

use std::fmt;

use crate::domain::Timestamp;

/// Slack below this is effectively a missed connection (seconds).
const MISSED_BELOW_SECS: i64 = 60;

/// Slack below this is a tight connection (seconds).
const TIGHT_BELOW_SECS: i64 = 180;

/// How comfortable a connection is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStatus {
    /// At least three minutes of slack.
    Comfortable,
    /// Less than three minutes of slack.
    Tight,
    /// The connecting train has left, or under a minute of slack.
    Missed,
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransferStatus::Comfortable => "comfortable",
            TransferStatus::Tight => "tight",
            TransferStatus::Missed => "missed",
        };
        f.write_str(s)
    }
}

/// One evaluation of a transfer window. Derived fresh each tick, never
/// stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferWindow {
    /// Total scheduled slack in seconds, independent of the clock.
    pub delta: i64,

    /// Status at the evaluated instant.
    pub status: TransferStatus,

    /// Rider-facing slack, `M:SS`, or `"Missed"` for negative slack.
    pub display_text: String,
}

/// Evaluate the window between arriving at `arrival` and a connection
/// departing at `departure`, as of `now`.
pub fn evaluate(arrival: Timestamp, departure: Timestamp, now: Timestamp) -> TransferWindow {
    let delta = departure - arrival;
    let time_until_departure = departure - now;

    let status = if time_until_departure <= 0 || delta < MISSED_BELOW_SECS {
        TransferStatus::Missed
    } else if delta < TIGHT_BELOW_SECS {
        TransferStatus::Tight
    } else {
        TransferStatus::Comfortable
    };

    TransferWindow {
        delta,
        status,
        display_text: format_slack(delta),
    }
}

/// Format scheduled slack as `M:SS`, or `"Missed"` when negative.
fn format_slack(delta: i64) -> String {
    if delta < 0 {
        return "Missed".to_string();
    }
    format!("{}:{:02}", delta / 60, delta % 60)
}

/// A one-shot notification produced by a status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferAlert {
    /// The connection just went from comfortable to tight.
    TightConnection {
        /// Scheduled slack in seconds at the moment of the transition.
        slack_secs: i64,
    },

    /// The connection was just missed.
    Missed,
}

/// Edge detector for transfer status transitions.
///
/// The caller owns one monitor per watched connection and feeds it every
/// evaluation. The first observation seeds the previous status without
/// firing anything: a connection that is already tight or missed when
/// first displayed produces no spurious alert.
///
/// `TightConnection` fires only on the comfortable → tight edge; both
/// alerts are latched and fire at most once for the monitor's lifetime.
#[derive(Debug, Clone, Default)]
pub struct TransferMonitor {
    previous: Option<TransferStatus>,
    tight_notified: bool,
    missed_notified: bool,
}

impl TransferMonitor {
    /// A monitor that has observed nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe the latest evaluation; returns the alert to raise, if any.
    pub fn observe(&mut self, window: &TransferWindow) -> Option<TransferAlert> {
        let Some(previous) = self.previous.replace(window.status) else {
            // Seeding tick: the rider can see the status on screen.
            return None;
        };

        if window.status == TransferStatus::Missed && !self.missed_notified {
            self.missed_notified = true;
            return Some(TransferAlert::Missed);
        }

        if window.status == TransferStatus::Tight
            && previous == TransferStatus::Comfortable
            && !self.tight_notified
        {
            self.tight_notified = true;
            return Some(TransferAlert::TightConnection {
                slack_secs: window.delta,
            });
        }

        None
    }
}
