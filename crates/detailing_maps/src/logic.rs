// --- File: crates/detailing_maps/src/logic.rs ---
//! Distance Matrix response shapes and the seconds-to-minutes rule.

use serde::Deserialize;

use crate::error::MapsError;

#[derive(Deserialize, Debug, Clone)]
pub struct DistanceMatrixResponse {
    pub status: String,
    pub error_message: Option<String>,
    #[serde(default)]
    pub rows: Vec<DistanceMatrixRow>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct DistanceMatrixRow {
    #[serde(default)]
    pub elements: Vec<DistanceMatrixElement>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct DistanceMatrixElement {
    pub status: String,
    pub duration: Option<TextValue>,
    pub duration_in_traffic: Option<TextValue>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TextValue {
    /// Seconds for durations
    pub value: i64,
    pub text: Option<String>,
}

/// Whole minutes, rounded up. A 61 second drive blocks two minutes.
pub fn minutes_from_seconds(seconds: i64) -> i64 {
    if seconds <= 0 {
        0
    } else {
        (seconds + 59) / 60
    }
}

/// Extracts the drive time of the single origin/destination pair.
///
/// Traffic-aware duration wins over the static one when both are present.
pub fn travel_seconds(
    response: &DistanceMatrixResponse,
    origin: &str,
    destination: &str,
) -> Result<i64, MapsError> {
    if response.status != "OK" {
        return Err(MapsError::ApiError {
            status: response.status.clone(),
            message: response
                .error_message
                .clone()
                .unwrap_or_else(|| "no error message".to_string()),
        });
    }

    let no_route = |status: &str| MapsError::NoRoute {
        origin: origin.to_string(),
        destination: destination.to_string(),
        status: status.to_string(),
    };

    let element = response
        .rows
        .first()
        .and_then(|row| row.elements.first())
        .ok_or_else(|| no_route("EMPTY_RESPONSE"))?;

    if element.status != "OK" {
        return Err(no_route(&element.status));
    }

    element
        .duration_in_traffic
        .as_ref()
        .or(element.duration.as_ref())
        .map(|d| d.value)
        .ok_or_else(|| no_route("MISSING_DURATION"))
}
