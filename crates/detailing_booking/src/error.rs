// --- File: crates/detailing_booking/src/error.rs ---
use detailing_availability::AvailabilityError;
use detailing_common::{
    config_error, conflict, external_service_error, validation_error, DetailingError,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),

    #[error("Unknown vehicle class: {0}")]
    UnknownVehicleClass(String),

    #[error("Unknown package: {0}")]
    UnknownPackage(String),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Package {package} is not offered for vehicle class {vehicle_class}")]
    NotOffered {
        package: String,
        vehicle_class: String,
    },

    #[error("The requested time slot is no longer available")]
    SlotTaken,

    #[error("Online payment is not enabled")]
    PaymentsDisabled,

    #[error(transparent)]
    Availability(#[from] AvailabilityError),

    #[error("Calendar error: {0}")]
    Calendar(String),

    #[error("Payment provider error: {0}")]
    Payment(String),
}

impl From<BookingError> for DetailingError {
    fn from(err: BookingError) -> Self {
        let message = err.to_string();
        match err {
            BookingError::Validation(_)
            | BookingError::UnknownVehicleClass(_)
            | BookingError::UnknownPackage(_)
            | BookingError::UnknownOption(_)
            | BookingError::NotOffered { .. } => validation_error(message),
            BookingError::SlotTaken => conflict(message),
            BookingError::PaymentsDisabled => config_error(message),
            BookingError::Availability(e) => e.into(),
            BookingError::Calendar(msg) => external_service_error("Calendar", msg),
            BookingError::Payment(msg) => external_service_error("Payments", msg),
        }
    }
}
