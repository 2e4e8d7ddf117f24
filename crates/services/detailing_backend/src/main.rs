// File: crates/services/detailing_backend/src/main.rs
use detailing_common::logging;
use detailing_config::load_config;
use std::process::ExitCode;
use tokio::net::TcpListener;
use tracing::{error, info};

mod app;
mod service_factory;

use service_factory::DetailingServiceFactory;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let services = match DetailingServiceFactory::new(&config).await {
        Ok(services) => services,
        Err(e) => {
            error!("Startup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let app = match app::build_app(&config, &services) {
        Ok(app) => app,
        Err(e) => {
            error!("Startup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Could not bind {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
