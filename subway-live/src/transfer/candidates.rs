//! Transfer candidate discovery and ranking.
//!
//! Given the snapshots of every platform in a station complex, finds the
//! best connecting departure per (line, direction) pairing, and picks the
//! replacement train after a missed connection. Pure functions over
//! caller-supplied snapshots; the fan-out that fetches them lives in
//! [`crate::transfer::discovery`].

use std::collections::HashMap;

use crate::domain::{Line, StationSnapshot, StopId, StopTime, Timestamp, TripId};

/// Minimum cross-platform transfer time in seconds. A connecting
/// departure closer to the arrival than this does not qualify.
pub const MIN_TRANSFER_SECS: i64 = 15;

/// Parameters for one candidate search.
#[derive(Debug, Clone)]
pub struct CandidateQuery<'a> {
    /// The line the rider is arriving on; never offered as a transfer.
    pub exclude_line: &'a Line,

    /// The trip the rider is exiting; its own departures never qualify.
    pub exclude_trip: Option<&'a TripId>,

    /// When the rider's train arrives at the complex.
    pub arrival: Timestamp,
}

/// One ranked transfer option: a (line, direction) pairing with its
/// earliest qualifying departure.
#[derive(Debug, Clone)]
pub struct TransferCandidate {
    /// The connecting line.
    pub line: Line,

    /// Direction label of the connecting trips.
    pub headsign: String,

    /// The platform the departure leaves from.
    pub stop_id: StopId,

    /// Rider-facing name of that platform's station record.
    pub station_name: String,

    /// The earliest qualifying departure for this pairing.
    pub next_departure: StopTime,

    /// Seconds the rider will wait for it, never negative.
    pub wait_secs: i64,
}

/// Departures for one (line, direction) pairing observed at one platform.
struct DirectionGroup<'a> {
    stop_id: &'a StopId,
    station_name: &'a str,
    departures: Vec<&'a StopTime>,
}

/// Find and rank transfer candidates across a station complex.
///
/// For every line present at each platform (except the excluded one),
/// qualifying departures are grouped by headsign. When the same
/// (line, direction) pairing shows up at several platforms, the platform
/// with strictly more qualifying departures wins; a tie keeps the one
/// recorded first. That approximates "the platform actually used for
/// that direction" without needing track-level data.
///
/// Output is grouped by line in display order (numeric codes ascending,
/// then lettered codes lexicographically) with directions ordered by
/// headsign within each line.
pub fn find_candidates(
    platforms: &[StationSnapshot],
    query: &CandidateQuery<'_>,
) -> Vec<TransferCandidate> {
    let mut groups: HashMap<(Line, String), DirectionGroup<'_>> = HashMap::new();

    for platform in platforms {
        for line in &platform.lines {
            if line == query.exclude_line {
                continue;
            }

            let mut by_headsign: HashMap<&str, Vec<&StopTime>> = HashMap::new();
            for st in &platform.stop_times {
                if st.line == *line && qualifies(st, query) {
                    by_headsign.entry(st.headsign_or_unknown()).or_default().push(st);
                }
            }

            for (headsign, departures) in by_headsign {
                let key = (line.clone(), headsign.to_string());
                // Strictly more departures wins; a tie keeps the group
                // recorded first.
                let replace = groups
                    .get(&key)
                    .is_none_or(|existing| departures.len() > existing.departures.len());
                if replace {
                    groups.insert(
                        key,
                        DirectionGroup {
                            stop_id: &platform.id,
                            station_name: &platform.name,
                            departures,
                        },
                    );
                }
            }
        }
    }

    let mut candidates: Vec<TransferCandidate> = groups
        .into_iter()
        .filter_map(|((line, headsign), group)| {
            let next = earliest_by_arrival(&group.departures)?;
            let wait_secs = (next.departure_or_arrival() - query.arrival).max(0);
            Some(TransferCandidate {
                line,
                headsign,
                stop_id: group.stop_id.clone(),
                station_name: group.station_name.to_string(),
                next_departure: (*next).clone(),
                wait_secs,
            })
        })
        .collect();

    candidates.sort_by(|a, b| a.line.cmp(&b.line).then_with(|| a.headsign.cmp(&b.headsign)));
    candidates
}

/// The replacement train after a missed connection.
///
/// Searches one line's departures only, at or after the minimum transfer
/// time past `arrival`, excluding the just-missed trip. Returns the
/// earliest by arrival time, or `None` when the line has nothing left.
/// This never falls back to a different line.
pub fn next_train_on_line<'a>(
    stop_times: &'a [StopTime],
    line: &Line,
    arrival: Timestamp,
    exclude_trip: &TripId,
) -> Option<&'a StopTime> {
    let mut best: Option<&StopTime> = None;
    for st in stop_times {
        if st.line != *line || st.trip_id == *exclude_trip {
            continue;
        }
        if st.departure_or_arrival() < arrival.plus_seconds(MIN_TRANSFER_SECS) {
            continue;
        }
        // Strict comparison keeps the first of equal arrivals.
        if best.is_none_or(|b| st.arrival < b.arrival) {
            best = Some(st);
        }
    }
    best
}

fn qualifies(st: &StopTime, query: &CandidateQuery<'_>) -> bool {
    if query.exclude_trip.is_some_and(|t| st.trip_id == *t) {
        return false;
    }
    st.departure_or_arrival() >= query.arrival.plus_seconds(MIN_TRANSFER_SECS)
}

fn earliest_by_arrival<'a>(departures: &[&'a StopTime]) -> Option<&'a StopTime> {
    let mut best: Option<&StopTime> = None;
    for &st in departures {
        if best.is_none_or(|b| st.arrival < b.arrival) {
            best = Some(st);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(s: &str) -> Line {
        Line::parse(s).unwrap()
    }

    fn stop_time(
        platform: &str,
        l: &str,
        trip: &str,
        headsign: &str,
        departs: i64,
    ) -> StopTime {
        StopTime {
            stop_id: StopId::new(platform),
            stop_name: "Times Sq-42 St".to_string(),
            trip_id: TripId::new(trip),
            line: line(l),
            arrival: Timestamp::from_unix(departs),
            departure: None,
            future: true,
            sequence: 0,
            track: None,
            headsign: Some(headsign.to_string()),
        }
    }

    fn platform(id: &str, lines: &[&str], stop_times: Vec<StopTime>) -> StationSnapshot {
        StationSnapshot {
            id: StopId::new(id),
            name: "Times Sq-42 St".to_string(),
            lines: lines.iter().map(|l| line(l)).collect(),
            stop_times,
            transfers: vec![],
        }
    }

    fn query<'a>(exclude: &'a Line, arrival: i64) -> CandidateQuery<'a> {
        CandidateQuery {
            exclude_line: exclude,
            exclude_trip: None,
            arrival: Timestamp::from_unix(arrival),
        }
    }

    #[test]
    fn minimum_dwell_boundary() {
        let exclude = line("1");
        let platforms = vec![platform(
            "R16",
            &["N"],
            vec![
                stop_time("R16", "N", "too-soon", "Astoria", 1014),
                stop_time("R16", "N", "just-enough", "Astoria", 1015),
            ],
        )];

        let candidates = find_candidates(&platforms, &query(&exclude, 1000));
        assert_eq!(candidates.len(), 1);
        // The +14s departure is excluded, the +15s departure qualifies.
        assert_eq!(candidates[0].next_departure.trip_id, TripId::new("just-enough"));
        assert_eq!(candidates[0].wait_secs, 15);
    }

    #[test]
    fn excluded_line_is_never_offered() {
        let exclude = line("1");
        let platforms = vec![platform(
            "127",
            &["1", "2"],
            vec![
                stop_time("127", "1", "t1", "South Ferry", 1100),
                stop_time("127", "2", "t2", "Flatbush Av", 1100),
            ],
        )];

        let candidates = find_candidates(&platforms, &query(&exclude, 1000));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].line, line("2"));
    }

    #[test]
    fn exiting_trip_does_not_qualify() {
        let exclude_line = line("1");
        let exclude_trip = TripId::new("my-trip");
        let platforms = vec![platform(
            "127",
            &["2"],
            vec![
                stop_time("127", "2", "my-trip", "Flatbush Av", 1100),
                stop_time("127", "2", "other", "Flatbush Av", 1200),
            ],
        )];

        let q = CandidateQuery {
            exclude_line: &exclude_line,
            exclude_trip: Some(&exclude_trip),
            arrival: Timestamp::from_unix(1000),
        };
        let candidates = find_candidates(&platforms, &q);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].next_departure.trip_id, TripId::new("other"));
    }

    #[test]
    fn lines_rank_numeric_then_lettered() {
        let exclude = line("9");
        let platforms = vec![platform(
            "127",
            &["2", "A", "1"],
            vec![
                stop_time("127", "2", "t2", "Flatbush Av", 1100),
                stop_time("127", "A", "ta", "Far Rockaway", 1100),
                stop_time("127", "1", "t1", "South Ferry", 1100),
            ],
        )];

        let candidates = find_candidates(&platforms, &query(&exclude, 1000));
        let codes: Vec<&str> = candidates.iter().map(|c| c.line.as_str()).collect();
        assert_eq!(codes, vec!["1", "2", "A"]);
    }

    #[test]
    fn directions_sort_by_headsign_within_a_line() {
        let exclude = line("9");
        let platforms = vec![platform(
            "127",
            &["1"],
            vec![
                stop_time("127", "1", "south", "Van Cortlandt Park", 1100),
                stop_time("127", "1", "north", "South Ferry", 1100),
            ],
        )];

        let candidates = find_candidates(&platforms, &query(&exclude, 1000));
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].headsign, "South Ferry");
        assert_eq!(candidates[1].headsign, "Van Cortlandt Park");
    }

    #[test]
    fn busier_platform_wins_a_shared_direction() {
        let exclude = line("9");
        // Both platforms report N trains to Astoria; the second has more
        // qualifying departures and should represent the pairing.
        let platforms = vec![
            platform("R16", &["N"], vec![stop_time("R16", "N", "a", "Astoria", 1100)]),
            platform(
                "R17",
                &["N"],
                vec![
                    stop_time("R17", "N", "b", "Astoria", 1200),
                    stop_time("R17", "N", "c", "Astoria", 1300),
                ],
            ),
        ];

        let candidates = find_candidates(&platforms, &query(&exclude, 1000));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].stop_id, StopId::new("R17"));
        assert_eq!(candidates[0].next_departure.trip_id, TripId::new("b"));
    }

    #[test]
    fn tie_keeps_the_platform_recorded_first() {
        let exclude = line("9");
        let platforms = vec![
            platform("R16", &["N"], vec![stop_time("R16", "N", "a", "Astoria", 1100)]),
            platform("R17", &["N"], vec![stop_time("R17", "N", "b", "Astoria", 1050)]),
        ];

        let candidates = find_candidates(&platforms, &query(&exclude, 1000));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].stop_id, StopId::new("R16"));
    }

    #[test]
    fn earliest_departure_becomes_the_candidate() {
        let exclude = line("9");
        let platforms = vec![platform(
            "127",
            &["2"],
            vec![
                stop_time("127", "2", "later", "Flatbush Av", 1300),
                stop_time("127", "2", "sooner", "Flatbush Av", 1100),
            ],
        )];

        let candidates = find_candidates(&platforms, &query(&exclude, 1000));
        assert_eq!(candidates[0].next_departure.trip_id, TripId::new("sooner"));
        assert_eq!(candidates[0].wait_secs, 100);
    }

    #[test]
    fn line_absent_from_service_maps_is_ignored() {
        let exclude = line("9");
        // A stray stop time on a line the platform doesn't declare.
        let platforms = vec![platform(
            "127",
            &["1"],
            vec![stop_time("127", "7", "stray", "Flushing", 1100)],
        )];

        assert!(find_candidates(&platforms, &query(&exclude, 1000)).is_empty());
    }

    #[test]
    fn no_platforms_no_candidates() {
        let exclude = line("1");
        assert!(find_candidates(&[], &query(&exclude, 1000)).is_empty());
    }

    #[test]
    fn next_train_skips_missed_trip_and_other_lines() {
        let stops = vec![
            stop_time("127", "1", "missed", "South Ferry", 1100),
            stop_time("127", "2", "wrong-line", "Flatbush Av", 1100),
            stop_time("127", "1", "replacement", "South Ferry", 1200),
        ];

        let next = next_train_on_line(
            &stops,
            &line("1"),
            Timestamp::from_unix(1000),
            &TripId::new("missed"),
        );
        assert_eq!(next.unwrap().trip_id, TripId::new("replacement"));
    }

    #[test]
    fn next_train_honors_minimum_dwell() {
        let stops = vec![stop_time("127", "1", "t", "South Ferry", 1014)];
        assert!(
            next_train_on_line(
                &stops,
                &line("1"),
                Timestamp::from_unix(1000),
                &TripId::new("missed"),
            )
            .is_none()
        );

        let stops = vec![stop_time("127", "1", "t", "South Ferry", 1015)];
        assert!(
            next_train_on_line(
                &stops,
                &line("1"),
                Timestamp::from_unix(1000),
                &TripId::new("missed"),
            )
            .is_some()
        );
    }

    #[test]
    fn next_train_none_when_line_is_done_for_the_night() {
        let stops = vec![stop_time("127", "2", "t", "Flatbush Av", 2000)];
        assert!(
            next_train_on_line(
                &stops,
                &line("1"),
                Timestamp::from_unix(1000),
                &TripId::new("missed"),
            )
            .is_none()
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_stop_time() -> impl Strategy<Value = StopTime> {
        (
            0usize..3,              // line
            0usize..3,              // headsign
            0u32..50,               // trip discriminator
            900i64..2_000,          // departure time
        )
            .prop_map(|(l, h, t, departs)| {
                let lines = ["1", "2", "A"];
                let headsigns = ["Uptown", "Downtown", "Brooklyn"];
                StopTime {
                    stop_id: StopId::new("127"),
                    stop_name: "Times Sq-42 St".to_string(),
                    trip_id: TripId::new(format!("trip-{t}")),
                    line: Line::parse(lines[l]).unwrap(),
                    arrival: Timestamp::from_unix(departs),
                    departure: None,
                    future: true,
                    sequence: 0,
                    track: None,
                    headsign: Some(headsigns[h].to_string()),
                }
            })
    }

    fn arb_platforms() -> impl Strategy<Value = Vec<StationSnapshot>> {
        prop::collection::vec(prop::collection::vec(arb_stop_time(), 0..8), 0..4).prop_map(
            |platforms| {
                platforms
                    .into_iter()
                    .enumerate()
                    .map(|(i, stop_times)| StationSnapshot {
                        id: StopId::new(format!("P{i}")),
                        name: "Times Sq-42 St".to_string(),
                        lines: ["1", "2", "A"].iter().map(|l| Line::parse(l).unwrap()).collect(),
                        stop_times,
                        transfers: vec![],
                    })
                    .collect()
            },
        )
    }

    proptest! {
        /// Every candidate honors the dwell bound, excludes the rider's
        /// line, and carries a non-negative wait.
        #[test]
        fn candidates_are_well_formed(platforms in arb_platforms(), arrival in 900i64..2_000) {
            let exclude = Line::parse("1").unwrap();
            let query = CandidateQuery {
                exclude_line: &exclude,
                exclude_trip: None,
                arrival: Timestamp::from_unix(arrival),
            };
            let candidates = find_candidates(&platforms, &query);

            for c in &candidates {
                prop_assert!(c.line != exclude);
                prop_assert!(c.wait_secs >= 0);
                prop_assert!(
                    c.next_departure.departure_or_arrival().as_unix()
                        >= arrival + MIN_TRANSFER_SECS
                );
            }
        }

        /// Output ordering is by line display order, then headsign; at
        /// most one candidate per (line, direction) pairing.
        #[test]
        fn candidates_are_ranked_and_unique(platforms in arb_platforms(), arrival in 900i64..2_000) {
            let exclude = Line::parse("9").unwrap();
            let query = CandidateQuery {
                exclude_line: &exclude,
                exclude_trip: None,
                arrival: Timestamp::from_unix(arrival),
            };
            let candidates = find_candidates(&platforms, &query);

            for pair in candidates.windows(2) {
                let a = (&pair[0].line, &pair[0].headsign);
                let b = (&pair[1].line, &pair[1].headsign);
                prop_assert!(a < b);
            }
        }

        /// Recomputation from the same snapshots is identical: discovery
        /// is derived state, never an accumulation.
        #[test]
        fn recomputation_is_stable(platforms in arb_platforms(), arrival in 900i64..2_000) {
            let exclude = Line::parse("1").unwrap();
            let query = CandidateQuery {
                exclude_line: &exclude,
                exclude_trip: None,
                arrival: Timestamp::from_unix(arrival),
            };
            let a = find_candidates(&platforms, &query);
            let b = find_candidates(&platforms, &query);
            prop_assert_eq!(a.len(), b.len());
            for (x, y) in a.iter().zip(b.iter()) {
                prop_assert_eq!(&x.line, &y.line);
                prop_assert_eq!(&x.headsign, &y.headsign);
                prop_assert_eq!(&x.next_departure.trip_id, &y.next_departure.trip_id);
            }
        }
    }
}
