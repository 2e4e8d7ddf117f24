//! In-memory collaborators for the booking tests.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Europe::Zurich;
use detailing_availability::{AvailabilityService, AvailabilitySettings, BusinessHoursPolicy};
use detailing_availability::TravelFailurePolicy;
use detailing_common::cache::MemoryCache;
use detailing_common::services::{
    BoxFuture, BoxedError, CalendarEvent, CalendarEventResult, CalendarService, CheckoutRequest,
    CheckoutSession, NewCalendarEvent, PaymentService, SlotTaken,
};
use detailing_config::{AddOnOption, CatalogConfig, DetailingPackage, VehicleClass};
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn zurich(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Zurich
        .with_ymd_and_hms(y, mo, d, h, mi, 0)
        .unwrap()
        .with_timezone(&Utc)
}

#[derive(Default)]
pub struct FakeCalendar {
    pub events: Mutex<Vec<CalendarEvent>>,
    pub created: Mutex<Vec<NewCalendarEvent>>,
    pub list_calls: AtomicUsize,
    /// Simulates a booking that lands between the re-check and the write.
    pub reject_create: bool,
}

impl FakeCalendar {
    pub fn with_busy(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let calendar = FakeCalendar::default();
        calendar.events.lock().unwrap().push(CalendarEvent {
            id: Some("existing".to_string()),
            summary: Some("Exterior wash - Max".to_string()),
            start,
            end,
            location: None,
        });
        calendar
    }

    pub fn created(&self) -> Vec<NewCalendarEvent> {
        self.created.lock().unwrap().clone()
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
        let events: Vec<CalendarEvent> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.start < end_time && e.end > start_time)
            .cloned()
            .collect();
        Box::pin(async move { Ok(events) })
    }

    fn create_event(
        &self,
        _calendar_id: &str,
        event: NewCalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        Box::pin(async move {
            if self.reject_create {
                return Err(BoxedError::new(SlotTaken));
            }
            let mut created = self.created.lock().unwrap();
            created.push(event);
            Ok(CalendarEventResult {
                event_id: Some(format!("evt-{}", created.len())),
                status: "confirmed".to_string(),
            })
        })
    }

    fn delete_event(&self, _calendar_id: &str, _event_id: &str) -> BoxFuture<'_, (), Self::Error> {
        Box::pin(async move { Ok(()) })
    }
}

#[derive(Default)]
pub struct FakePayments {
    pub requests: Mutex<Vec<CheckoutRequest>>,
    pub fail: bool,
}

impl PaymentService for FakePayments {
    type Error = BoxedError;

    fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> BoxFuture<'_, CheckoutSession, Self::Error> {
        Box::pin(async move {
            if self.fail {
                return Err(BoxedError::new(io::Error::other("stripe down")));
            }
            let id = format!("cs_test_{}", request.client_reference_id.clone().unwrap_or_default());
            self.requests.lock().unwrap().push(request);
            Ok(CheckoutSession {
                url: format!("https://checkout.stripe.com/c/pay/{}", id),
                id,
            })
        })
    }
}

pub fn catalog() -> CatalogConfig {
    CatalogConfig {
        currency: "CHF".to_string(),
        vehicle_classes: vec![
            VehicleClass {
                id: "sedan".to_string(),
                name: "Sedan".to_string(),
            },
            VehicleClass {
                id: "suv".to_string(),
                name: "SUV".to_string(),
            },
        ],
        packages: vec![
            DetailingPackage {
                id: "exterior".to_string(),
                name: "Exterior wash".to_string(),
                description: None,
                prices: HashMap::from([("sedan".to_string(), 9_900), ("suv".to_string(), 12_900)]),
            },
            DetailingPackage {
                id: "interior".to_string(),
                name: "Interior detail".to_string(),
                description: Some("Vacuum, shampoo, leather care".to_string()),
                prices: HashMap::from([("sedan".to_string(), 14_900)]),
            },
        ],
        options: vec![
            AddOnOption {
                id: "pet_hair".to_string(),
                name: "Pet hair removal".to_string(),
                price: 3_000,
            },
            AddOnOption {
                id: "ceramic".to_string(),
                name: "Ceramic coating".to_string(),
                price: 15_000,
            },
        ],
    }
}

pub fn availability(calendar: Arc<FakeCalendar>) -> AvailabilityService {
    AvailabilityService::new(
        calendar,
        None,
        Arc::new(MemoryCache::new(100)),
        BusinessHoursPolicy::default(),
        AvailabilitySettings {
            calendar_id: "primary".to_string(),
            calendar_timeout: Duration::from_secs(2),
            events_cache_ttl: Duration::from_secs(60),
            travel_timeout: Duration::from_secs(1),
            travel_failure: TravelFailurePolicy::FailClosed,
        },
    )
}
