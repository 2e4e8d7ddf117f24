// --- File: crates/detailing_booking/src/lib.rs ---
pub mod doc;
pub mod error;
pub mod handlers;
#[cfg(test)]
mod handlers_test;
pub mod logic;
pub mod routes;
#[cfg(test)]
mod test_support;

pub use error::BookingError;
pub use handlers::BookingState;
pub use logic::{price_booking, BookingRequest, Customer, Quote};
pub use routes::routes;
