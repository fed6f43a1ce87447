//! Train position estimation.
//!
//! Given a trip's stop-time schedule and the current wall-clock reading,
//! estimates which segment the train is on and how far along it is. This
//! is a pure function recomputed every tick (about 1 Hz); it performs no
//! I/O and never fails.

use crate::domain::{StopTime, Timestamp};

/// Where a train currently is along its schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TripPosition {
    /// No stop has been departed yet.
    NotStarted,

    /// Between stops: departed `last_departed`, `progress` percent of the
    /// way (by scheduled time) to the next arrival.
    InTransit {
        /// Index into the stop-time slice of the last departed stop.
        last_departed: usize,
        /// Progress toward the next arrival, in `[0, 100]`.
        progress: f64,
    },

    /// Every arrival on the schedule is in the past.
    Completed {
        /// Index of the final stop.
        final_stop: usize,
    },
}

impl TripPosition {
    /// The current stop index, `-1` when the trip has not started.
    pub fn current_stop_index(&self) -> isize {
        match self {
            TripPosition::NotStarted => -1,
            TripPosition::InTransit { last_departed, .. } => *last_departed as isize,
            TripPosition::Completed { final_stop } => *final_stop as isize,
        }
    }

    /// Progress toward the next stop in `[0, 100]`.
    pub fn progress(&self) -> f64 {
        match self {
            TripPosition::NotStarted => 0.0,
            TripPosition::InTransit { progress, .. } => *progress,
            TripPosition::Completed { .. } => 100.0,
        }
    }
}

/// Estimate a train's position along its schedule at time `now`.
///
/// One pass over the stop times finds the last stop whose departure is at
/// or before `now` and, independently, the first stop whose arrival is
/// after `now`. Progress between them is linear in scheduled time.
///
/// An empty schedule yields [`TripPosition::NotStarted`].
///
/// Note: while the train dwells at a stop (arrived but not yet departed),
/// the estimate already interpolates toward the stop after it. Boarding
/// time reads as "approaching the next stop"; see the dwell test below.
pub fn estimate(stop_times: &[StopTime], now: Timestamp) -> TripPosition {
    let mut last_departed: Option<usize> = None;
    let mut next_arrival: Option<usize> = None;

    for (i, st) in stop_times.iter().enumerate() {
        if st.departure_or_arrival() <= now {
            last_departed = Some(i);
        }
        if st.arrival > now && next_arrival.is_none() {
            next_arrival = Some(i);
        }
    }

    let Some(last) = last_departed else {
        return TripPosition::NotStarted;
    };

    let Some(next) = next_arrival else {
        return TripPosition::Completed {
            final_stop: stop_times.len() - 1,
        };
    };

    if last < next {
        let departed_at = stop_times[last].departure_or_arrival();
        let segment_secs = stop_times[next].arrival - departed_at;
        // A zero-length segment cannot arise from the ordering invariant
        // (the next arrival is strictly after `now`, the departure at or
        // before it), but guard the division anyway.
        if segment_secs <= 0 {
            return TripPosition::InTransit {
                last_departed: last,
                progress: 0.0,
            };
        }
        let elapsed = now - departed_at;
        let progress = (elapsed as f64 / segment_secs as f64 * 100.0).clamp(0.0, 100.0);
        return TripPosition::InTransit {
            last_departed: last,
            progress,
        };
    }

    // Out-of-order schedule; report the departed stop with no progress.
    TripPosition::InTransit {
        last_departed: last,
        progress: 0.0,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{Line, StopId, TripId};
    use proptest::prelude::*;

    /// Strategy for schedules satisfying the ordering invariant:
    /// arrivals non-decreasing, departure >= arrival per stop.
    fn ordered_schedule() -> impl Strategy<Value = Vec<StopTime>> {
        prop::collection::vec((0i64..600, 0i64..120), 0..12).prop_map(|gaps| {
            let mut t = 1_000i64;
            gaps.into_iter()
                .enumerate()
                .map(|(i, (gap, dwell))| {
                    t += gap;
                    let arrival = t;
                    t += dwell;
                    StopTime {
                        stop_id: StopId::new(format!("{i}")),
                        stop_name: format!("Stop {i}"),
                        trip_id: TripId::new("trip-1"),
                        line: Line::parse("1").unwrap(),
                        arrival: Timestamp::from_unix(arrival),
                        departure: (dwell > 0).then(|| Timestamp::from_unix(arrival + dwell)),
                        future: true,
                        sequence: i as u32,
                        track: None,
                        headsign: None,
                    }
                })
                .collect()
        })
    }

    proptest! {
        /// estimate is total: index in [-1, n-1], progress in [0, 100].
        #[test]
        fn index_and_progress_bounded(stops in ordered_schedule(), now_secs in 0i64..20_000) {
            let pos = estimate(&stops, Timestamp::from_unix(now_secs));
            let n = stops.len() as isize;
            prop_assert!(pos.current_stop_index() >= -1);
            prop_assert!(pos.current_stop_index() < n.max(1));
            prop_assert!(pos.progress() >= 0.0);
            prop_assert!(pos.progress() <= 100.0);
        }

        /// Pure function: identical inputs give identical outputs.
        #[test]
        fn idempotent(stops in ordered_schedule(), now_secs in 0i64..20_000) {
            let now = Timestamp::from_unix(now_secs);
            prop_assert_eq!(estimate(&stops, now), estimate(&stops, now));
        }

        /// Before the first departure the trip has not started; after the
        /// last arrival it is complete.
        #[test]
        fn boundary_states(stops in ordered_schedule()) {
            prop_assume!(!stops.is_empty());
            let first_dep = stops[0].departure_or_arrival();
            let last_arr = stops.last().unwrap().arrival;

            let before = Timestamp::from_unix(first_dep.as_unix() - 1);
            prop_assert_eq!(estimate(&stops, before), TripPosition::NotStarted);

            let after = Timestamp::from_unix(last_arr.as_unix().max(
                stops.last().unwrap().departure_or_arrival().as_unix(),
            ));
            let pos = estimate(&stops, after);
            prop_assert_eq!(pos.current_stop_index(), stops.len() as isize - 1);
        }
    }
}
