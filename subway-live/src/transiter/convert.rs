//! Conversion from Transiter DTOs to validated domain snapshots.
//!
//! The feed is messy: stop times can miss their trip reference, their
//! arrival estimate, or carry an unparseable route code. Conversion
//! skips such entries rather than failing the snapshot; only a response
//! that cannot identify its own subject is an error. The ordering
//! invariant (sequence order, departure >= arrival) is enforced here so
//! downstream code can rely on it.

use crate::domain::{Line, Route, StationSnapshot, StopId, StopTime, Timestamp, TripId, TripSnapshot};

use super::types::{EstimatedTimeDto, RouteDto, StopResponse, StopTimeDto, TripResponse};

/// Error converting a response to a domain snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed response: {reason}")]
pub struct ConversionError {
    reason: &'static str,
}

impl ConversionError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Convert a trip response into a trip snapshot.
///
/// The trip must carry a route with a valid line code; stop times
/// missing their stop reference or arrival estimate are dropped.
pub fn convert_trip(dto: &TripResponse) -> Result<TripSnapshot, ConversionError> {
    let route = dto
        .route
        .as_ref()
        .ok_or_else(|| ConversionError::new("trip has no route"))?;
    let line =
        Line::parse(&route.id).map_err(|_| ConversionError::new("trip route id is not a line"))?;
    let trip_id = TripId::new(dto.id.clone());

    let mut stop_times: Vec<StopTime> = dto
        .stop_times
        .iter()
        .flatten()
        .filter_map(|st| {
            let stop = st.stop.as_ref()?;
            convert_stop_time(
                st,
                StopId::new(stop.id.clone()),
                stop.name.clone().unwrap_or_default(),
                trip_id.clone(),
                line.clone(),
            )
        })
        .collect();
    sort_by_sequence(&mut stop_times);

    Ok(TripSnapshot {
        id: trip_id,
        line,
        color: route.color.clone(),
        stop_times,
    })
}

/// Convert a stop response into a station snapshot.
///
/// Lines come from the union of the stop's service maps. Stop times
/// missing their trip reference, a parseable route, or an arrival
/// estimate are dropped.
pub fn convert_station(dto: &StopResponse) -> Result<StationSnapshot, ConversionError> {
    let station_id = StopId::new(dto.id.clone());

    let mut lines: Vec<Line> = dto
        .service_maps
        .iter()
        .flatten()
        .flat_map(|map| map.routes.iter().flatten())
        .filter_map(|route| Line::parse(&route.id).ok())
        .collect();
    lines.sort();
    lines.dedup();

    let mut stop_times: Vec<StopTime> = dto
        .stop_times
        .iter()
        .flatten()
        .filter_map(|st| {
            let trip = st.trip.as_ref()?;
            let line = Line::parse(&trip.route.as_ref()?.id).ok()?;
            let (stop_id, stop_name) = match &st.stop {
                Some(stop) => (
                    StopId::new(stop.id.clone()),
                    stop.name.clone().unwrap_or_else(|| dto.name.clone()),
                ),
                None => (station_id.clone(), dto.name.clone()),
            };
            convert_stop_time(st, stop_id, stop_name, TripId::new(trip.id.clone()), line)
        })
        .collect();
    sort_by_sequence(&mut stop_times);

    let transfers = dto
        .transfers
        .iter()
        .flatten()
        .filter_map(|t| t.to_stop.as_ref())
        .map(|stop| StopId::new(stop.id.clone()))
        .collect();

    Ok(StationSnapshot {
        id: station_id,
        name: dto.name.clone(),
        lines,
        stop_times,
        transfers,
    })
}

/// Convert a route list entry. Routes with invalid line codes are not
/// representable and yield `None`.
pub fn convert_route(dto: &RouteDto) -> Option<Route> {
    let line = Line::parse(&dto.id).ok()?;
    let color = dto
        .color
        .clone()
        .unwrap_or_else(|| line.default_color().to_string());
    let alert_ids = dto
        .alerts
        .iter()
        .flatten()
        .map(|a| a.id.clone())
        .collect();
    Some(Route {
        line,
        color,
        alert_ids,
    })
}

fn convert_stop_time(
    st: &StopTimeDto,
    stop_id: StopId,
    stop_name: String,
    trip_id: TripId,
    line: Line,
) -> Option<StopTime> {
    let arrival = parse_epoch(st.arrival.as_ref())
        // Some feeds only publish a departure for origin stops.
        .or_else(|| parse_epoch(st.departure.as_ref()))?;
    let departure = parse_epoch(st.departure.as_ref())
        // Enforce departure >= arrival; equal collapses to "same as
        // arrival".
        .filter(|dep| *dep > arrival);

    Some(StopTime {
        stop_id,
        stop_name,
        trip_id,
        line,
        arrival,
        departure,
        future: st.future.unwrap_or(false),
        sequence: st.stop_sequence.unwrap_or(0),
        track: st.track.clone().filter(|t| !t.is_empty()),
        headsign: st.headsign.clone().filter(|h| !h.is_empty()),
    })
}

fn parse_epoch(dto: Option<&EstimatedTimeDto>) -> Option<Timestamp> {
    let time = dto?.time.as_deref()?;
    time.parse::<i64>().ok().map(Timestamp::from_unix)
}

fn sort_by_sequence(stop_times: &mut [StopTime]) {
    stop_times.sort_by_key(|st| st.sequence);
}
