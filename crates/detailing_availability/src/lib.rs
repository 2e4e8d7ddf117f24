// --- File: crates/detailing_availability/src/lib.rs ---
pub mod doc;
pub mod error;
pub mod handlers;
pub mod interval;
#[cfg(test)]
mod interval_proptest;
pub mod logic;
#[cfg(test)]
mod logic_proptest;
pub mod policy;
pub mod routes;
pub mod service;
#[cfg(test)]
mod test_support;
pub mod travel;

pub use error::AvailabilityError;
pub use interval::{overlaps, overlaps_strict, TimeInterval};
pub use logic::{available_only, enumerate_range, enumerate_slots, enumerate_with, CandidateSlot};
pub use policy::BusinessHoursPolicy;
pub use service::{AvailabilityService, AvailabilitySettings};
pub use travel::{apply_travel_time, TravelFailurePolicy, TravelOptions};
