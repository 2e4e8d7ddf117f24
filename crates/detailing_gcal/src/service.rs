// --- File: crates/detailing_gcal/src/service.rs ---
//! Google Calendar implementation of [`CalendarService`].
//!
//! Listing expands recurring events into single instances, drops cancelled and
//! transparent ("free") entries, and maps all-day events to local midnights in
//! the business time zone. Writes need service-account credentials.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use detailing_common::services::{
    BoxFuture, CalendarEvent, CalendarEventResult, CalendarService, NewCalendarEvent, SlotTaken,
};
use detailing_common::DetailingError;
use google_calendar3::api::{Event, EventDateTime};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::auth::{CalendarAuthStrategy, HubType};

const PAGE_SIZE: i32 = 250;

/// Errors that can occur when interacting with Google Calendar.
#[derive(Error, Debug)]
pub enum GcalServiceError {
    #[error("Google API Error: {0}")]
    ApiError(#[from] google_calendar3::Error),
    #[error("Invalid event: {0}")]
    InvalidEvent(String),
    #[error("Booking conflict: {0}")]
    Conflict(#[source] SlotTaken),
    #[error("Calendar is read-only with API key authentication")]
    ReadOnly,
    #[error("Google Calendar configuration error: {0}")]
    Configuration(String),
}

impl From<GcalServiceError> for DetailingError {
    fn from(err: GcalServiceError) -> Self {
        match err {
            GcalServiceError::ApiError(e) => DetailingError::ExternalServiceError {
                service_name: "Google Calendar".to_string(),
                message: e.to_string(),
            },
            GcalServiceError::InvalidEvent(msg) => DetailingError::ValidationError(msg),
            GcalServiceError::Conflict(taken) => DetailingError::ConflictError(taken.to_string()),
            GcalServiceError::ReadOnly => DetailingError::ConfigError(
                "Calendar is read-only with API key authentication".to_string(),
            ),
            GcalServiceError::Configuration(msg) => DetailingError::ConfigError(msg),
        }
    }
}

/// Google Calendar service implementation.
pub struct GoogleCalendarService {
    calendar_hub: Arc<HubType>,
    api_key: Option<String>,
    time_zone: Tz,
}

impl GoogleCalendarService {
    /// `time_zone` is used to place all-day events.
    pub fn new(calendar_hub: Arc<HubType>, strategy: &CalendarAuthStrategy, time_zone: Tz) -> Self {
        Self {
            calendar_hub,
            api_key: strategy.api_key().map(str::to_string),
            time_zone,
        }
    }
}

/// Local midnight of `date`. Zones that skip midnight get the first instant after the gap.
fn start_of_day(date: NaiveDate, time_zone: &Tz) -> Option<DateTime<Utc>> {
    [NaiveTime::MIN, NaiveTime::from_hms_opt(1, 0, 0)?]
        .into_iter()
        .find_map(|time| time_zone.from_local_datetime(&date.and_time(time)).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}

fn resolve(point: &EventDateTime, time_zone: &Tz) -> Option<DateTime<Utc>> {
    match (point.date_time, point.date) {
        (Some(date_time), _) => Some(date_time),
        (None, Some(date)) => start_of_day(date, time_zone),
        (None, None) => None,
    }
}

/// Maps an API event onto a busy interval, or `None` when it does not block time.
pub(crate) fn to_calendar_event(event: &Event, time_zone: &Tz) -> Option<CalendarEvent> {
    if event.status.as_deref() == Some("cancelled") {
        return None;
    }
    if event.transparency.as_deref() == Some("transparent") {
        return None;
    }

    let start = event.start.as_ref().and_then(|p| resolve(p, time_zone));
    let end = event.end.as_ref().and_then(|p| resolve(p, time_zone));
    let (Some(start), Some(end)) = (start, end) else {
        warn!("Skipping event {:?} without usable start/end", event.id);
        return None;
    };

    Some(CalendarEvent {
        id: event.id.clone(),
        summary: event.summary.clone(),
        start,
        end,
        location: event
            .location
            .as_ref()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty()),
    })
}

pub(crate) fn to_api_event(event: &NewCalendarEvent) -> Result<Event, GcalServiceError> {
    if event.end <= event.start {
        return Err(GcalServiceError::InvalidEvent(
            "End time must be after start time".to_string(),
        ));
    }
    if event.summary.trim().is_empty() {
        return Err(GcalServiceError::InvalidEvent(
            "Summary must not be empty".to_string(),
        ));
    }

    Ok(Event {
        summary: Some(event.summary.clone()),
        description: event.description.clone(),
        location: event.location.clone(),
        start: Some(EventDateTime {
            date_time: Some(event.start),
            time_zone: Some("UTC".to_string()),
            ..Default::default()
        }),
        end: Some(EventDateTime {
            date_time: Some(event.end),
            time_zone: Some("UTC".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    })
}

async fn fetch_events(
    hub: &HubType,
    api_key: Option<&str>,
    time_zone: &Tz,
    calendar_id: &str,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> Result<Vec<CalendarEvent>, GcalServiceError> {
    let mut events = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let mut call = hub
            .events()
            .list(calendar_id)
            .time_min(start_time)
            .time_max(end_time)
            .single_events(true)
            .order_by("startTime")
            .max_results(PAGE_SIZE);
        if let Some(token) = page_token.as_deref() {
            call = call.page_token(token);
        }
        if let Some(key) = api_key {
            call = call.param("key", key);
        }

        let (_response, page) = call.doit().await?;
        events.extend(
            page.items
                .unwrap_or_default()
                .iter()
                .filter_map(|item| to_calendar_event(item, time_zone)),
        );

        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    events.sort_by_key(|e| e.start);
    debug!(
        "Fetched {} events from {} between {} and {}",
        events.len(),
        calendar_id,
        start_time,
        end_time
    );
    Ok(events)
}

impl CalendarService for GoogleCalendarService {
    type Error = GcalServiceError;

    fn list_events(
        &self,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<CalendarEvent>, Self::Error> {
        let calendar_id = calendar_id.to_string();

        Box::pin(async move {
            fetch_events(
                &self.calendar_hub,
                self.api_key.as_deref(),
                &self.time_zone,
                &calendar_id,
                start_time,
                end_time,
            )
            .await
        })
    }

    /// Creates the event after re-reading the calendar for overlapping entries.
    fn create_event(
        &self,
        calendar_id: &str,
        event: NewCalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        let calendar_id = calendar_id.to_string();

        Box::pin(async move {
            if self.api_key.is_some() {
                return Err(GcalServiceError::ReadOnly);
            }
            let new_event = to_api_event(&event)?;

            let existing = fetch_events(
                &self.calendar_hub,
                None,
                &self.time_zone,
                &calendar_id,
                event.start,
                event.end,
            )
            .await?;
            if let Some(clash) = existing
                .iter()
                .find(|e| e.start <= event.end && event.start <= e.end)
            {
                warn!(
                    "Refusing to book {} - {}: overlaps event {:?}",
                    event.start, event.end, clash.id
                );
                return Err(GcalServiceError::Conflict(SlotTaken));
            }

            let (_response, created_event) = self
                .calendar_hub
                .events()
                .insert(new_event, &calendar_id)
                .doit()
                .await?;

            info!("Created calendar event {:?}", created_event.id);
            Ok(CalendarEventResult {
                event_id: created_event.id,
                status: created_event
                    .status
                    .unwrap_or_else(|| "confirmed".to_string()),
            })
        })
    }

    /// Deletes an event. A missing or already removed event counts as deleted.
    fn delete_event(&self, calendar_id: &str, event_id: &str) -> BoxFuture<'_, (), Self::Error> {
        let calendar_id = calendar_id.to_string();
        let event_id = event_id.to_string();

        Box::pin(async move {
            if self.api_key.is_some() {
                return Err(GcalServiceError::ReadOnly);
            }

            let result = self
                .calendar_hub
                .events()
                .delete(&calendar_id, &event_id)
                .send_updates("none")
                .doit()
                .await;

            match result {
                Ok(_) => Ok(()),
                Err(e) if e.to_string().contains("404") || e.to_string().contains("410") => {
                    info!("Event {} already gone", event_id);
                    Ok(())
                }
                Err(e) => Err(GcalServiceError::ApiError(e)),
            }
        })
    }
}
