// --- File: crates/detailing_maps/src/lib.rs ---
pub mod error;
pub mod logic;
pub mod service;

pub use error::MapsError;
pub use logic::{minutes_from_seconds, travel_seconds, DistanceMatrixResponse};
pub use service::DistanceMatrixEstimator;
