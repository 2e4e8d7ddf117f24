//! In-memory collaborators for the availability tests.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Europe::Zurich;
use detailing_common::services::{
    BoxFuture, BoxedError, CalendarEvent, CalendarEventResult, CalendarService,
    NewCalendarEvent, TravelTimeEstimator,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Local Zurich wall-clock time converted to UTC.
pub fn zurich(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Zurich
        .with_ymd_and_hms(y, mo, d, h, mi, 0)
        .unwrap()
        .with_timezone(&Utc)
}

pub fn event(start: DateTime<Utc>, end: DateTime<Utc>, location: Option<&str>) -> CalendarEvent {
    CalendarEvent {
        id: Some(format!("evt-{}", start.timestamp())),
        summary: Some("Detailing".to_string()),
        start,
        end,
        location: location.map(str::to_string),
    }
}

fn upstream_failure(message: &str) -> BoxedError {
    BoxedError::new(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        message.to_string(),
    ))
}

#[derive(Default)]
pub struct FakeCalendar {
    pub events: Mutex<Vec<CalendarEvent>>,
    pub list_calls: AtomicUsize,
    pub fail: bool,
    pub delay: Option<Duration>,
}

impl FakeCalendar {
    pub fn with_events(events: Vec<CalendarEvent>) -> Self {
        Self {
            events: Mutex::new(events),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

impl CalendarService for FakeCalendar {
    type Error = BoxedError;

    fn list_events(
        &self,
        _calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<CalendarEvent>, Self::Error> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(upstream_failure("calendar down"));
            }
            let events = self.events.lock().unwrap();
            Ok(events
                .iter()
                .filter(|e| e.start < end_time && e.end > start_time)
                .cloned()
                .collect())
        })
    }

    fn create_event(
        &self,
        _calendar_id: &str,
        event: NewCalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        Box::pin(async move {
            let mut events = self.events.lock().unwrap();
            let id = format!("created-{}", events.len());
            events.push(CalendarEvent {
                id: Some(id.clone()),
                summary: Some(event.summary),
                start: event.start,
                end: event.end,
                location: event.location,
            });
            Ok(CalendarEventResult {
                event_id: Some(id),
                status: "confirmed".to_string(),
            })
        })
    }

    fn delete_event(&self, _calendar_id: &str, event_id: &str) -> BoxFuture<'_, (), Self::Error> {
        let event_id = event_id.to_string();
        Box::pin(async move {
            self.events
                .lock()
                .unwrap()
                .retain(|e| e.id.as_deref() != Some(event_id.as_str()));
            Ok(())
        })
    }
}

/// Fixed travel times per (origin, destination); unknown pairs use `default_minutes`.
#[derive(Default)]
pub struct FakeEstimator {
    pub routes: HashMap<(String, String), i64>,
    pub default_minutes: i64,
    pub fail: bool,
    pub delay: Option<Duration>,
    pub calls: AtomicUsize,
}

impl FakeEstimator {
    pub fn fixed(minutes: i64) -> Self {
        Self {
            default_minutes: minutes,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TravelTimeEstimator for FakeEstimator {
    type Error = BoxedError;

    fn travel_minutes(&self, origin: &str, destination: &str) -> BoxFuture<'_, i64, Self::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = (origin.to_string(), destination.to_string());
        Box::pin(async move {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(upstream_failure("distance service down"));
            }
            Ok(*self.routes.get(&key).unwrap_or(&self.default_minutes))
        })
    }
}
