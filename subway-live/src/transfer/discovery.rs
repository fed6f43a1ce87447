//! Live transfer discovery across a station complex.
//!
//! The async half of candidate search: resolves the arrival stop to its
//! complex, fans out one fetch per co-located platform, and hands the
//! snapshots to the pure ranking in [`crate::transfer::candidates`].
//! A platform whose fetch fails contributes zero candidates; partial
//! results beat none while the rider is standing on the platform.

use std::sync::Arc;

use tracing::warn;

use crate::directory::StationDirectory;
use crate::domain::{Line, StationSnapshot, StopId, Timestamp, TripId};
use crate::transfer::candidates::{
    CandidateQuery, TransferCandidate, find_candidates, next_train_on_line,
};
use crate::transiter::{CachedTransiterClient, TransiterError};

/// Source of live station snapshots.
///
/// This abstraction allows discovery to be tested with mock data.
pub trait StationSource {
    /// Fetch the live snapshot of one stop.
    fn get_station(
        &self,
        stop: &StopId,
    ) -> impl Future<Output = Result<Arc<StationSnapshot>, TransiterError>> + Send;
}

impl StationSource for CachedTransiterClient {
    fn get_station(
        &self,
        stop: &StopId,
    ) -> impl Future<Output = Result<Arc<StationSnapshot>, TransiterError>> + Send {
        CachedTransiterClient::get_station(self, stop)
    }
}

/// Outcome of re-selecting a connection after a miss.
#[derive(Debug, Clone)]
pub enum TransferNotice {
    /// A later train on the same line was found.
    Updated {
        line: Line,
        trip_id: TripId,
        departs: Timestamp,
        headsign: Option<String>,
    },

    /// The line has no further qualifying departures.
    NoMoreTrains { line: Line },
}

/// Find ranked transfer candidates at the complex containing `at_stop`.
///
/// The raw stop id (directional suffix and all) is resolved through the
/// directory; an unresolvable id yields an empty list. Every co-located
/// platform is fetched concurrently, and failed fetches are logged and
/// skipped rather than failing the whole search.
pub async fn discover_candidates(
    source: &impl StationSource,
    directory: &StationDirectory,
    at_stop: &StopId,
    exclude_line: &Line,
    exclude_trip: Option<&TripId>,
    arrival: Timestamp,
) -> Vec<TransferCandidate> {
    let Some(entry) = directory.resolve(at_stop) else {
        return Vec::new();
    };
    let platforms = directory.platforms_sharing_name(&entry.name);

    let fetches = platforms.iter().map(|p| source.get_station(&p.id));
    let results = futures::future::join_all(fetches).await;

    let snapshots: Vec<StationSnapshot> = platforms
        .iter()
        .zip(results)
        .filter_map(|(platform, result)| match result {
            Ok(snapshot) => Some(Arc::unwrap_or_clone(snapshot)),
            Err(e) => {
                warn!(stop = %platform.id, error = %e, "platform fetch failed, skipping");
                None
            }
        })
        .collect();

    let query = CandidateQuery {
        exclude_line,
        exclude_trip,
        arrival,
    };
    find_candidates(&snapshots, &query)
}

/// Pick the replacement train after a missed connection.
///
/// Stays on the missed line: fetches the platform of `station_name` that
/// the line serves and takes the earliest qualifying departure that is
/// not the just-missed trip. `NoMoreTrains` when the directory has no
/// platform for the line or nothing qualifying is left.
pub async fn reselect_connection(
    source: &impl StationSource,
    directory: &StationDirectory,
    station_name: &str,
    line: &Line,
    missed_trip: &TripId,
    arrival: Timestamp,
) -> Result<TransferNotice, TransiterError> {
    let Some(platform) = directory.station_for_line(station_name, line) else {
        return Ok(TransferNotice::NoMoreTrains { line: line.clone() });
    };

    let snapshot = source.get_station(&platform.id).await?;

    match next_train_on_line(&snapshot.stop_times, line, arrival, missed_trip) {
        Some(next) => Ok(TransferNotice::Updated {
            line: line.clone(),
            trip_id: next.trip_id.clone(),
            departs: next.departure_or_arrival(),
            headsign: next.headsign.clone(),
        }),
        None => Ok(TransferNotice::NoMoreTrains { line: line.clone() }),
    }
}
