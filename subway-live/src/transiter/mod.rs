//! Transiter live-feed client.
//!
//! This module provides an HTTP client for a Transiter instance, which
//! serves real-time transit state aggregated from GTFS feeds.
//!
//! Key characteristics of the feed:
//! - Times arrive as unix epoch seconds encoded as **strings**
//! - Stop ids may carry a directional suffix (`127N`, `127S`) naming a
//!   platform rather than the station
//! - Trip snapshots can shrink or reorder between polls as estimates
//!   are revised; no continuity is guaranteed
//! - A 404 is definitive: the trip or stop does not exist, and retrying
//!   will not help

mod cache;
mod client;
mod convert;
mod error;
mod types;

pub use cache::{CacheConfig, CachedTransiterClient};
pub use client::{TransiterClient, TransiterConfig};
pub use convert::ConversionError;
pub use error::TransiterError;
pub use types::{
    EstimatedTimeDto, ListRoutesResponse, RouteDto, StopResponse, StopTimeDto, TripResponse,
};
