// --- File: crates/detailing_gcal/src/lib.rs ---
pub mod auth;
pub mod service;

pub use auth::{create_calendar_hub, CalendarAuthStrategy, HubType};
pub use service::{GcalServiceError, GoogleCalendarService};
