// File: crates/detailing_availability/src/handlers.rs
use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use detailing_common::DetailingError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::AvailabilityError;
use crate::logic::CandidateSlot;
use crate::service::AvailabilityService;

// Shared state needed by the availability handlers
#[derive(Clone)]
pub struct AvailabilityState {
    pub service: Arc<AvailabilityService>,
}

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AvailabilityQuery {
    /// First day of the horizon, YYYY-MM-DD
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2025-05-06"))]
    pub date: Option<String>,
    /// Range start, RFC 3339 (used together with `end` instead of `date`)
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-06T08:00:00+02:00"))]
    pub start: Option<String>,
    /// Range end, RFC 3339
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-06T18:00:00+02:00"))]
    pub end: Option<String>,
    /// Customer address; enables the travel-time filter
    pub location: Option<String>,
    /// Only return bookable slots
    #[serde(default)]
    pub available_only: bool,
}

/// One slot as shown to the booking page.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
    /// Local start time, HH:MM
    #[cfg_attr(feature = "openapi", schema(example = "09:30"))]
    pub time: String,
    /// Local start as RFC 3339 with offset
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-06T09:30:00+02:00"))]
    pub date_time: String,
    pub is_available: bool,
}

impl SlotView {
    pub fn from_slot(slot: &CandidateSlot, time_zone: &Tz) -> Self {
        let local = slot.interval.start.with_timezone(time_zone);
        SlotView {
            time: local.format("%H:%M").to_string(),
            date_time: local.to_rfc3339(),
            is_available: slot.available,
        }
    }
}

fn parse_instant(field: &str, raw: &str) -> Result<DateTime<Utc>, DetailingError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DetailingError::ValidationError(format!("Invalid {field}, expected RFC 3339")))
}

/// Handler listing candidate slots for a date horizon or an explicit range.
///
/// A calendar timeout is answered with an empty list so the page shows "no slots".
#[axum::debug_handler]
pub async fn get_availability_handler(
    State(state): State<Arc<AvailabilityState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<SlotView>>, DetailingError> {
    let service = &state.service;
    let now = Utc::now();
    let location = query.location.as_deref();

    let result = match (&query.date, &query.start, &query.end) {
        (Some(date), _, _) => service.slots_for_date(date, location, now).await,
        (None, Some(start), Some(end)) => {
            let start = parse_instant("start", start)?;
            let end = parse_instant("end", end)?;
            service.slots_in_range(start, end, location, now).await
        }
        _ => {
            return Err(DetailingError::ValidationError(
                "Either date or start and end are required".to_string(),
            ))
        }
    };

    let slots = match result {
        Ok(slots) => slots,
        Err(AvailabilityError::Timeout(what)) => {
            warn!("{} timed out, answering with no slots", what);
            return Ok(Json(Vec::new()));
        }
        Err(e) => return Err(e.into()),
    };

    let time_zone = service.policy().time_zone;
    let views: Vec<SlotView> = slots
        .iter()
        .filter(|slot| slot.available || !query.available_only)
        .map(|slot| SlotView::from_slot(slot, &time_zone))
        .collect();

    info!(
        "availability query {:?}: {} of {} slots returned",
        query.date.as_deref().or(query.start.as_deref()),
        views.len(),
        slots.len()
    );
    Ok(Json(views))
}
