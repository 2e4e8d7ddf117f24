// --- File: crates/services/detailing_backend/src/service_factory.rs ---
//! Builds the external services once at startup.
//!
//! Compile-time features decide which adapters exist; the `use_*` flags in the
//! config decide which of them are switched on. An enabled service that cannot
//! be built is a startup error, never a silently missing route.

use detailing_availability::AvailabilityError;
use detailing_common::services::{DynCalendarService, DynPaymentService, DynTravelTimeEstimator};
use detailing_common::{CacheStore, MemoryCache};
use detailing_config::AppConfig;
use std::sync::Arc;
use thiserror::Error;
#[allow(unused_imports)] // used only by certain features
use {
    detailing_common::services::Boxed,
    std::time::Duration,
    tracing::{info, warn},
};

#[cfg(feature = "gcal")]
use detailing_gcal::{create_calendar_hub, CalendarAuthStrategy, GoogleCalendarService};
#[cfg(feature = "maps")]
use detailing_maps::DistanceMatrixEstimator;
#[cfg(feature = "stripe")]
use detailing_stripe::StripeCheckoutService;

#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Availability(#[from] AvailabilityError),

    #[error("{service} is enabled but could not be initialized: {message}")]
    Service {
        service: &'static str,
        message: String,
    },
}

#[allow(dead_code)]
fn service_error(service: &'static str, err: impl std::fmt::Display) -> StartupError {
    StartupError::Service {
        service,
        message: err.to_string(),
    }
}

/// The external collaborators handed to the routers.
pub struct DetailingServiceFactory {
    pub calendar: Option<DynCalendarService>,
    pub estimator: Option<DynTravelTimeEstimator>,
    pub payments: Option<DynPaymentService>,
    pub cache: Arc<dyn CacheStore>,
}

impl DetailingServiceFactory {
    pub async fn new(config: &AppConfig) -> Result<Self, StartupError> {
        #[allow(unused_mut)]
        let mut factory = Self {
            calendar: None,
            estimator: None,
            payments: None,
            cache: Arc::new(MemoryCache::new(config.cache.max_capacity)),
        };

        #[cfg(feature = "gcal")]
        if config.use_gcal {
            factory.calendar = Some(calendar_service(config).await?);
        } else {
            info!("Google Calendar compiled in, but disabled via runtime config.");
        }

        #[cfg(feature = "maps")]
        if config.use_maps {
            let maps_config = config.maps.clone().unwrap_or_default();
            let timeout = Duration::from_secs(config.scheduling.travel_timeout_secs);
            let estimator = DistanceMatrixEstimator::new(&maps_config, timeout)
                .map_err(|e| service_error("Distance Matrix", e))?;
            factory.estimator = Some(Arc::new(Boxed(estimator)));
            info!("Distance Matrix estimator initialized.");
        } else {
            info!("Distance Matrix compiled in, but disabled; travel filter off.");
        }

        #[cfg(feature = "stripe")]
        if config.use_stripe {
            let stripe_config = config
                .stripe
                .clone()
                .ok_or_else(|| service_error("Stripe", "missing [stripe] section"))?;
            let service =
                StripeCheckoutService::new(stripe_config).map_err(|e| service_error("Stripe", e))?;
            factory.payments = Some(Arc::new(Boxed(service)));
            info!("Stripe checkout service initialized.");
        } else {
            info!("Stripe compiled in, but disabled; checkout route answers with an error.");
        }

        Ok(factory)
    }
}

#[cfg(feature = "gcal")]
async fn calendar_service(config: &AppConfig) -> Result<DynCalendarService, StartupError> {
    use detailing_availability::BusinessHoursPolicy;

    let gcal_config = config.gcal.clone().unwrap_or_default();
    let strategy = CalendarAuthStrategy::from_config(&gcal_config)
        .map_err(|e| service_error("Google Calendar", e))?;
    if strategy.is_read_only() {
        warn!("Google Calendar is read-only with an API key; direct bookings will fail.");
    }

    let hub = create_calendar_hub(&strategy)
        .await
        .map_err(|e| service_error("Google Calendar", e))?;
    let time_zone = BusinessHoursPolicy::from_config(&config.scheduling)?.time_zone;

    info!("Google Calendar service initialized.");
    Ok(Arc::new(Boxed(GoogleCalendarService::new(
        Arc::new(hub),
        &strategy,
        time_zone,
    ))))
}
