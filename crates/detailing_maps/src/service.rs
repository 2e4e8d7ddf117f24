// --- File: crates/detailing_maps/src/service.rs ---
use detailing_common::services::{BoxFuture, TravelTimeEstimator};
use detailing_common::HTTP_CLIENT;
use detailing_config::MapsConfig;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::MapsError;
use crate::logic::{minutes_from_seconds, travel_seconds, DistanceMatrixResponse};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/distancematrix/json";

/// Driving-time estimates from the Google Distance Matrix API.
pub struct DistanceMatrixEstimator {
    api_key: String,
    base_url: String,
    request_timeout: Duration,
}

impl DistanceMatrixEstimator {
    pub fn new(config: &MapsConfig, request_timeout: Duration) -> Result<Self, MapsError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| MapsError::ConfigError("maps.api_key is required".to_string()))?;

        let base_url = config
            .base_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        info!("Distance Matrix estimator using {}", base_url);
        Ok(Self {
            api_key: api_key.to_string(),
            base_url,
            request_timeout,
        })
    }

    async fn fetch(&self, origin: &str, destination: &str) -> Result<i64, MapsError> {
        let response = HTTP_CLIENT
            .get(&self.base_url)
            .timeout(self.request_timeout)
            .query(&[
                ("origins", origin),
                ("destinations", destination),
                ("mode", "driving"),
                ("units", "metric"),
                ("departure_time", "now"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: DistanceMatrixResponse = serde_json::from_str(&response.text().await?)?;
        let seconds = travel_seconds(&body, origin, destination)?;
        let minutes = minutes_from_seconds(seconds);

        debug!(
            "Travel '{}' -> '{}': {}s ({} min)",
            origin, destination, seconds, minutes
        );
        Ok(minutes)
    }
}

impl TravelTimeEstimator for DistanceMatrixEstimator {
    type Error = MapsError;

    fn travel_minutes(&self, origin: &str, destination: &str) -> BoxFuture<'_, i64, Self::Error> {
        let origin = origin.to_string();
        let destination = destination.to_string();

        Box::pin(async move { self.fetch(&origin, &destination).await })
    }
}
