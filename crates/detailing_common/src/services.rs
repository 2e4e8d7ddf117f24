// --- File: crates/detailing_common/src/services.rs ---
//! Service abstractions for external collaborators.
//!
//! The availability engine and the booking handlers only ever see these traits.
//! Concrete implementations (Google Calendar, Distance Matrix, Stripe) live in
//! their own crates and are boxed behind `BoxedError` by the service factory so
//! they can be shared as trait objects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A wrapper error type that implements std::error::Error for Box<dyn std::error::Error + Send + Sync>
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl BoxedError {
    pub fn new<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        BoxedError(Box::new(err))
    }
}

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

impl BoxedError {
    /// True if a [`SlotTaken`] appears anywhere in the source chain.
    pub fn is_slot_taken(&self) -> bool {
        let root: &(dyn StdError + 'static) = self.0.as_ref();
        std::iter::successors(Some(root), |&err| err.source()).any(|err| err.is::<SlotTaken>())
    }
}

/// A calendar refused to create an event because the window is already booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotTaken;

impl fmt::Display for SlotTaken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "requested time slot is already booked")
    }
}

impl StdError for SlotTaken {}

/// An existing commitment read from the calendar. Never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: Option<String>,
    pub summary: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Free-form address, used by the travel-time filter.
    pub location: Option<String>,
}

/// Data needed to create a calendar event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCalendarEvent {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
}

/// Represents the result of a calendar event operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEventResult {
    /// The ID of the event.
    pub event_id: Option<String>,
    /// The status of the event.
    pub status: String,
}

/// A trait for calendar service operations.
pub trait CalendarService: Send + Sync {
    /// Error type returned by calendar service operations.
    type Error: StdError + Send + Sync + 'static;

    /// List events intersecting `[start_time, end_time)`, ordered by start.
    fn list_events(
        &self,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<CalendarEvent>, Self::Error>;

    /// Create a calendar event. Implementations report an occupied window with [`SlotTaken`].
    fn create_event(
        &self,
        calendar_id: &str,
        event: NewCalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error>;

    /// Delete a calendar event.
    fn delete_event(&self, calendar_id: &str, event_id: &str) -> BoxFuture<'_, (), Self::Error>;
}

/// Estimates driving time between two addresses.
pub trait TravelTimeEstimator: Send + Sync {
    type Error: StdError + Send + Sync + 'static;

    /// Travel duration in whole minutes from `origin` to `destination`.
    fn travel_minutes(&self, origin: &str, destination: &str) -> BoxFuture<'_, i64, Self::Error>;
}

/// Request for a hosted checkout page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Amount in the smallest currency unit.
    pub amount: i64,
    pub currency: String,
    pub product_name: String,
    pub description: Option<String>,
    pub customer_email: Option<String>,
    pub client_reference_id: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// A created checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

/// A trait for payment provider operations.
pub trait PaymentService: Send + Sync {
    type Error: StdError + Send + Sync + 'static;

    /// Create a hosted checkout session and return its redirect URL.
    fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> BoxFuture<'_, CheckoutSession, Self::Error>;
}

pub type DynCalendarService = Arc<dyn CalendarService<Error = BoxedError>>;
pub type DynTravelTimeEstimator = Arc<dyn TravelTimeEstimator<Error = BoxedError>>;
pub type DynPaymentService = Arc<dyn PaymentService<Error = BoxedError>>;

/// Adapter erasing a service's concrete error into `BoxedError`.
pub struct Boxed<S>(pub S);

impl<S: CalendarService> CalendarService for Boxed<S> {
    type Error = BoxedError;

    fn list_events(
        &self,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<CalendarEvent>, Self::Error> {
        let fut = self.0.list_events(calendar_id, start_time, end_time);
        Box::pin(async move { fut.await.map_err(BoxedError::new) })
    }

    fn create_event(
        &self,
        calendar_id: &str,
        event: NewCalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        let fut = self.0.create_event(calendar_id, event);
        Box::pin(async move { fut.await.map_err(BoxedError::new) })
    }

    fn delete_event(&self, calendar_id: &str, event_id: &str) -> BoxFuture<'_, (), Self::Error> {
        let fut = self.0.delete_event(calendar_id, event_id);
        Box::pin(async move { fut.await.map_err(BoxedError::new) })
    }
}

impl<S: TravelTimeEstimator> TravelTimeEstimator for Boxed<S> {
    type Error = BoxedError;

    fn travel_minutes(&self, origin: &str, destination: &str) -> BoxFuture<'_, i64, Self::Error> {
        let fut = self.0.travel_minutes(origin, destination);
        Box::pin(async move { fut.await.map_err(BoxedError::new) })
    }
}

impl<S: PaymentService> PaymentService for Boxed<S> {
    type Error = BoxedError;

    fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> BoxFuture<'_, CheckoutSession, Self::Error> {
        let fut = self.0.create_checkout_session(request);
        Box::pin(async move { fut.await.map_err(BoxedError::new) })
    }
}
