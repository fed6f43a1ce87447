//! Transiter API response DTOs.
//!
//! These types map directly to the Transiter JSON API. Times arrive as
//! unix epoch seconds encoded as strings. `Option` is used liberally:
//! the API omits fields rather than sending nulls in many cases.

use serde::Deserialize;

/// Response from `GET /systems/{system}/stops/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopResponse {
    /// Raw stop id.
    pub id: String,

    /// Rider-facing name.
    pub name: String,

    /// Service maps; the "realtime" map lists lines currently serving
    /// this stop.
    pub service_maps: Option<Vec<ServiceMapDto>>,

    /// Upcoming stop times at this stop.
    pub stop_times: Option<Vec<StopTimeDto>>,

    /// Declared transfer links to other stops.
    pub transfers: Option<Vec<TransferDto>>,
}

/// One service map: a named configuration with its routes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceMapDto {
    pub config_id: Option<String>,
    pub routes: Option<Vec<RouteRefDto>>,
}

/// A route reference inside a service map or trip.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRefDto {
    pub id: String,
    pub color: Option<String>,
}

/// A declared transfer link.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferDto {
    pub to_stop: Option<StopRefDto>,
}

/// A stop reference inside a stop time or transfer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopRefDto {
    pub id: String,
    pub name: Option<String>,
}

/// A trip reference inside a stop time.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRefDto {
    pub id: String,
    pub route: Option<RouteRefDto>,
}

/// An estimated arrival or departure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedTimeDto {
    /// Unix epoch seconds as a decimal string.
    pub time: Option<String>,
}

/// One stop time, in a stop or trip response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopTimeDto {
    /// The stop being called at (present in trip responses).
    pub stop: Option<StopRefDto>,

    /// The trip making the call (present in stop responses).
    pub trip: Option<TripRefDto>,

    pub arrival: Option<EstimatedTimeDto>,
    pub departure: Option<EstimatedTimeDto>,

    /// Whether the call is still upcoming.
    pub future: Option<bool>,

    pub stop_sequence: Option<u32>,
    pub headsign: Option<String>,
    pub track: Option<String>,
}

/// Response from `GET /systems/{system}/trips/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripResponse {
    pub id: String,
    pub route: Option<RouteRefDto>,
    pub stop_times: Option<Vec<StopTimeDto>>,
}

/// An alert reference on a route.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRefDto {
    pub id: String,
}

/// One route in the route list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDto {
    pub id: String,
    pub color: Option<String>,
    pub alerts: Option<Vec<AlertRefDto>>,
}

/// Response from `GET /systems/{system}/routes`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRoutesResponse {
    pub routes: Option<Vec<RouteDto>>,
}
