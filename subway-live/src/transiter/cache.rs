//! Short-TTL caching layer over the Transiter client.
//!
//! Candidate discovery fans out to every platform of a station complex,
//! and several subscriptions can target overlapping stops. A short TTL
//! deduplicates those bursts without letting a snapshot go meaningfully
//! stale between poll cycles.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{StationSnapshot, StopId, TripId, TripSnapshot};

use super::client::TransiterClient;
use super::error::TransiterError;

/// Configuration for the snapshot cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached snapshots.
    pub ttl: Duration,

    /// Maximum number of cached snapshots per kind.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(2),
            max_capacity: 1000,
        }
    }
}

/// Transiter client with snapshot caching.
///
/// Wraps a `TransiterClient` and caches station and trip snapshots.
/// Errors are never cached; a failed fetch is retried on the next call.
pub struct CachedTransiterClient {
    client: TransiterClient,
    stations: MokaCache<StopId, Arc<StationSnapshot>>,
    trips: MokaCache<TripId, Arc<TripSnapshot>>,
}

impl CachedTransiterClient {
    /// Create a new cached client.
    pub fn new(client: TransiterClient, config: &CacheConfig) -> Self {
        let stations = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let trips = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            client,
            stations,
            trips,
        }
    }

    /// Get a station snapshot, using the cache if fresh.
    pub async fn get_station(&self, stop: &StopId) -> Result<Arc<StationSnapshot>, TransiterError> {
        if let Some(cached) = self.stations.get(stop).await {
            return Ok(cached);
        }

        let snapshot = Arc::new(self.client.get_station(stop).await?);
        self.stations.insert(stop.clone(), snapshot.clone()).await;

        Ok(snapshot)
    }

    /// Get a trip snapshot, using the cache if fresh.
    pub async fn get_trip(&self, trip: &TripId) -> Result<Arc<TripSnapshot>, TransiterError> {
        if let Some(cached) = self.trips.get(trip).await {
            return Ok(cached);
        }

        let snapshot = Arc::new(self.client.get_trip(trip).await?);
        self.trips.insert(trip.clone(), snapshot.clone()).await;

        Ok(snapshot)
    }

    /// Access the underlying client for operations that bypass cache.
    pub fn client(&self) -> &TransiterClient {
        &self.client
    }

    /// Number of cached snapshots across both kinds.
    pub fn entry_count(&self) -> u64 {
        self.stations.entry_count() + self.trips.entry_count()
    }

    /// Invalidate all cached snapshots.
    pub fn invalidate_all(&self) {
        self.stations.invalidate_all();
        self.trips.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transiter::client::TransiterConfig;

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(2));
        assert_eq!(config.max_capacity, 1000);
    }

    #[test]
    fn cache_creation() {
        let client = TransiterClient::new(TransiterConfig::default()).unwrap();
        let cached = CachedTransiterClient::new(client, &CacheConfig::default());
        assert_eq!(cached.entry_count(), 0);
    }
}
