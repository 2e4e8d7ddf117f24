// File: crates/services/detailing_backend/src/app.rs
use axum::{routing::get, Router};
use detailing_availability::{
    handlers::AvailabilityState, routes as availability_routes, AvailabilityService,
    AvailabilitySettings, BusinessHoursPolicy,
};
use detailing_booking::{routes as booking_routes, BookingState};
use detailing_config::AppConfig;
use http::{header, Method};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::service_factory::{DetailingServiceFactory, StartupError};

async fn health() -> &'static str {
    "Detailing booking API is running"
}

/// Routes under `/api`. Availability and booking need a calendar; without one only health is served.
pub fn api_router(
    config: &AppConfig,
    services: &DetailingServiceFactory,
) -> Result<Router, StartupError> {
    #[allow(unused_mut)] // for the features it needs to be mutable
    let mut router = Router::new();

    match &services.calendar {
        Some(calendar) => {
            let policy = BusinessHoursPolicy::from_config(&config.scheduling)?;
            let settings = AvailabilitySettings::from_config(config)?;
            let availability = Arc::new(AvailabilityService::new(
                calendar.clone(),
                services.estimator.clone(),
                services.cache.clone(),
                policy,
                settings,
            ));

            router = router
                .merge(availability_routes::routes(Arc::new(AvailabilityState {
                    service: availability.clone(),
                })))
                .merge(booking_routes(Arc::new(BookingState {
                    availability,
                    calendar: calendar.clone(),
                    payments: services.payments.clone(),
                    catalog: Arc::new(config.catalog.clone()),
                })));
            info!(
                "Availability and booking routes mounted (travel filter {}, checkout {})",
                if services.estimator.is_some() { "on" } else { "off" },
                if services.payments.is_some() { "on" } else { "off" }
            );
        }
        None => {
            warn!("No calendar service configured; availability and booking routes disabled.");
        }
    }

    Ok(router)
}

/// The full application: `/api` routes, optional Swagger UI, CORS and request tracing.
pub fn build_app(
    config: &AppConfig,
    services: &DetailingServiceFactory,
) -> Result<Router, StartupError> {
    let mut app = Router::new()
        .route("/", get(health))
        .nest("/api", api_router(config, services)?);

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use detailing_availability::doc::AvailabilityApiDoc;
        use detailing_booking::doc::BookingApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Detailing Booking API",
                version = "0.1.0",
                description = "Availability, catalog and booking endpoints for mobile car detailing",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(AvailabilityApiDoc::openapi());
        openapi_doc.merge(BookingApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        app = app.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc));
    }

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(Any);

    Ok(app.layer(cors).layer(TraceLayer::new_for_http()))
}
