//! Schedule snapshot types.
//!
//! A snapshot is the provider's view of one trip or one station at one
//! fetch. Snapshots are immutable values: a refresh replaces the whole
//! snapshot, and derived computations (position, transfer windows,
//! candidates) only ever read them.

use super::ids::{StopId, TripId};
use super::line::Line;
use super::time::Timestamp;

/// One trip's scheduled/predicted call at one stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopTime {
    /// The platform this call is made at.
    pub stop_id: StopId,

    /// Rider-facing name of the stop.
    pub stop_name: String,

    /// The trip this call belongs to.
    pub trip_id: TripId,

    /// The line the trip runs on.
    pub line: Line,

    /// Predicted arrival time.
    pub arrival: Timestamp,

    /// Predicted departure time, when it differs from the arrival.
    pub departure: Option<Timestamp>,

    /// Whether the provider still considers this call upcoming.
    pub future: bool,

    /// Sequence number, unique and increasing within a trip.
    pub sequence: u32,

    /// Platform/track label, if announced.
    pub track: Option<String>,

    /// Rider-facing direction label for the trip.
    pub headsign: Option<String>,
}

impl StopTime {
    /// The departure time, defaulting to the arrival when absent.
    pub fn departure_or_arrival(&self) -> Timestamp {
        self.departure.unwrap_or(self.arrival)
    }

    /// The headsign, or `"Unknown"` when the feed omits one.
    pub fn headsign_or_unknown(&self) -> &str {
        self.headsign.as_deref().unwrap_or("Unknown")
    }
}

/// A trip's full stop-time schedule, refreshed wholesale per fetch.
#[derive(Debug, Clone)]
pub struct TripSnapshot {
    /// Opaque trip id.
    pub id: TripId,

    /// The line this trip runs on.
    pub line: Line,

    /// Display color from route metadata, hex RGB without `#`.
    pub color: Option<String>,

    /// Calls in sequence order, arrivals non-decreasing.
    pub stop_times: Vec<StopTime>,
}

impl TripSnapshot {
    /// The trip's destination name: the last stop on the schedule.
    pub fn destination(&self) -> Option<&str> {
        self.stop_times.last().map(|st| st.stop_name.as_str())
    }

    /// Find this trip's call at a stop with the given rider-facing name.
    pub fn call_at(&self, stop_name: &str) -> Option<&StopTime> {
        self.stop_times.iter().find(|st| st.stop_name == stop_name)
    }

    /// The display color, falling back to the line's trunk color.
    pub fn display_color(&self) -> &str {
        self.color.as_deref().unwrap_or_else(|| self.line.default_color())
    }
}

/// A station's upcoming departures plus its declared transfer links.
#[derive(Debug, Clone)]
pub struct StationSnapshot {
    /// The stop id this snapshot was fetched for.
    pub id: StopId,

    /// Rider-facing station name.
    pub name: String,

    /// Lines serving this station, from the provider's service maps.
    pub lines: Vec<Line>,

    /// Upcoming departures across all lines at this station.
    pub stop_times: Vec<StopTime>,

    /// Stop ids of declared transfer links to other platforms.
    pub transfers: Vec<StopId>,
}

/// Route metadata, refreshed on the slow cadence.
#[derive(Debug, Clone)]
pub struct Route {
    /// The line code.
    pub line: Line,

    /// Display color, hex RGB without `#`.
    pub color: String,

    /// Ids of service alerts currently active on this route.
    pub alert_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop_time(name: &str, arrival: i64, departure: Option<i64>) -> StopTime {
        StopTime {
            stop_id: StopId::new("127N"),
            stop_name: name.to_string(),
            trip_id: TripId::new("trip-1"),
            line: Line::parse("1").unwrap(),
            arrival: Timestamp::from_unix(arrival),
            departure: departure.map(Timestamp::from_unix),
            future: true,
            sequence: 1,
            track: None,
            headsign: None,
        }
    }

    #[test]
    fn departure_defaults_to_arrival() {
        assert_eq!(
            stop_time("Times Sq", 1000, None).departure_or_arrival(),
            Timestamp::from_unix(1000)
        );
        assert_eq!(
            stop_time("Times Sq", 1000, Some(1030)).departure_or_arrival(),
            Timestamp::from_unix(1030)
        );
    }

    #[test]
    fn destination_is_last_stop() {
        let trip = TripSnapshot {
            id: TripId::new("trip-1"),
            line: Line::parse("1").unwrap(),
            color: None,
            stop_times: vec![stop_time("Times Sq", 1000, None), stop_time("South Ferry", 1600, None)],
        };
        assert_eq!(trip.destination(), Some("South Ferry"));
        assert!(trip.call_at("Times Sq").is_some());
        assert!(trip.call_at("Nowhere").is_none());
    }

    #[test]
    fn display_color_falls_back_to_line() {
        let mut trip = TripSnapshot {
            id: TripId::new("trip-1"),
            line: Line::parse("1").unwrap(),
            color: Some("ABCDEF".to_string()),
            stop_times: vec![],
        };
        assert_eq!(trip.display_color(), "ABCDEF");
        trip.color = None;
        assert_eq!(trip.display_color(), "EE352E");
    }
}
