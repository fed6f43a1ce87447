//! Transiter HTTP client.
//!
//! Provides async methods for querying a Transiter instance and
//! converting responses to domain snapshots. A semaphore bounds
//! concurrent requests so a candidate fan-out across a station complex
//! cannot stampede the backend.

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::domain::{Route, StationSnapshot, StopId, TripId, TripSnapshot};

use super::convert::{convert_route, convert_station, convert_trip};
use super::error::TransiterError;
use super::types::{ListRoutesResponse, StopResponse, TripResponse};

/// Default base URL for the public Transiter demo instance.
const DEFAULT_BASE_URL: &str = "https://demo.transiter.dev";

/// Default transit system id (NYC subway).
const DEFAULT_SYSTEM_ID: &str = "us-ny-subway";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Configuration for the Transiter client.
#[derive(Debug, Clone)]
pub struct TransiterConfig {
    /// Base URL of the Transiter instance
    pub base_url: String,
    /// Transit system id within the instance
    pub system_id: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for TransiterConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            system_id: DEFAULT_SYSTEM_ID.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }
}

impl TransiterConfig {
    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the transit system id.
    pub fn with_system_id(mut self, id: impl Into<String>) -> Self {
        self.system_id = id.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Transiter API client.
///
/// Provides methods for fetching stop, trip, and route state. Uses a
/// semaphore to limit concurrent requests.
#[derive(Debug, Clone)]
pub struct TransiterClient {
    http: reqwest::Client,
    base_url: String,
    system_id: String,
    semaphore: Arc<Semaphore>,
}

impl TransiterClient {
    /// Create a new client with the given configuration.
    pub fn new(config: TransiterConfig) -> Result<Self, TransiterError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            system_id: config.system_id,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Get the live snapshot of one stop: upcoming stop times, lines in
    /// service, declared transfers.
    pub async fn get_station(&self, stop: &StopId) -> Result<StationSnapshot, TransiterError> {
        let url = format!(
            "{}/systems/{}/stops/{}",
            self.base_url,
            self.system_id,
            stop.as_str()
        );
        let body = self.fetch(&url).await?;

        let response: StopResponse =
            serde_json::from_str(&body).map_err(|e| TransiterError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        convert_station(&response).map_err(|e| TransiterError::Json {
            message: e.to_string(),
            body: None,
        })
    }

    /// Get the live snapshot of one trip and its full call schedule.
    pub async fn get_trip(&self, trip: &TripId) -> Result<TripSnapshot, TransiterError> {
        let url = format!(
            "{}/systems/{}/trips/{}",
            self.base_url,
            self.system_id,
            trip.as_str()
        );
        let body = self.fetch(&url).await?;

        let response: TripResponse =
            serde_json::from_str(&body).map_err(|e| TransiterError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        convert_trip(&response).map_err(|e| TransiterError::Json {
            message: e.to_string(),
            body: None,
        })
    }

    /// List every route in the system with its color and alert ids.
    ///
    /// Routes whose ids are not valid line codes are skipped.
    pub async fn list_routes(&self) -> Result<Vec<Route>, TransiterError> {
        let url = format!("{}/systems/{}/routes", self.base_url, self.system_id);
        let body = self.fetch(&url).await?;

        let response: ListRoutesResponse =
            serde_json::from_str(&body).map_err(|e| TransiterError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        Ok(response
            .routes
            .iter()
            .flatten()
            .filter_map(convert_route)
            .collect())
    }

    async fn fetch(&self, url: &str) -> Result<String, TransiterError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| TransiterError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let response = self.http.get(url).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(TransiterError::NotFound);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransiterError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }
}
