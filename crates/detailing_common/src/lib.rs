// --- File: crates/detailing_common/src/lib.rs ---

pub mod cache; // TTL cache store and get-or-compute helper
#[cfg(test)]
mod cache_test;
pub mod error; // Error handling
pub mod http; // HTTP response mapping and shared client
pub mod logging; // Logging utilities
pub mod services; // Service abstractions

pub use error::{
    config_error, conflict, external_service_error, validation_error,
    DetailingError, HttpStatusCode,
};

pub use http::{
    client::HTTP_CLIENT,
    IntoHttpResponse,
};

pub use cache::{cached, CacheError, CacheStore, MemoryCache};
