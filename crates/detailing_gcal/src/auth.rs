// File: crates/detailing_gcal/src/auth.rs
use detailing_config::GcalConfig;
use google_calendar3::{
    common::NoToken,
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator},
    CalendarHub,
};
use std::{
    error::Error,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

use crate::service::GcalServiceError;

// Type aliases for clarity
type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

pub type HubType = CalendarHub<Connector>;

/// How the backend talks to Google Calendar. Chosen once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarAuthStrategy {
    /// OAuth via a service-account key file. Read and write.
    ServiceAccount { key_path: PathBuf },
    /// Public API key. Read-only, works for public calendars.
    ApiKey { key: String },
}

impl CalendarAuthStrategy {
    /// Prefers a service account whose key file exists, then an API key.
    pub fn from_config(config: &GcalConfig) -> Result<Self, GcalServiceError> {
        let key_path = config
            .key_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty());

        if let Some(path) = key_path {
            if Path::new(path).exists() {
                info!("Google Calendar: using service account key {}", path);
                return Ok(CalendarAuthStrategy::ServiceAccount {
                    key_path: PathBuf::from(path),
                });
            }
            if api_key.is_none() {
                return Err(GcalServiceError::Configuration(format!(
                    "service account key file {} not found",
                    path
                )));
            }
            warn!(
                "Google Calendar: key file {} not found, falling back to API key",
                path
            );
        }

        match api_key {
            Some(key) => {
                info!("Google Calendar: using API key (read-only)");
                Ok(CalendarAuthStrategy::ApiKey {
                    key: key.to_string(),
                })
            }
            None => Err(GcalServiceError::Configuration(
                "either gcal.key_path or gcal.api_key is required".to_string(),
            )),
        }
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self, CalendarAuthStrategy::ApiKey { .. })
    }

    pub(crate) fn api_key(&self) -> Option<&str> {
        match self {
            CalendarAuthStrategy::ApiKey { key } => Some(key),
            CalendarAuthStrategy::ServiceAccount { .. } => None,
        }
    }
}

fn https_connector() -> Result<Connector, Box<dyn Error + Send + Sync>> {
    Ok(HttpsConnectorBuilder::new()
        .with_native_roots()?
        .https_or_http()
        .enable_http1()
        .build())
}

pub async fn create_calendar_hub(
    strategy: &CalendarAuthStrategy,
) -> Result<HubType, Box<dyn Error + Send + Sync>> {
    match strategy {
        CalendarAuthStrategy::ServiceAccount { key_path } => {
            let sa_key = read_service_account_key(key_path).await?;
            let auth = ServiceAccountAuthenticator::builder(sa_key).build().await?;
            let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https_connector()?);
            Ok(CalendarHub::new(client, auth))
        }
        // The key travels as a query parameter on every call
        CalendarAuthStrategy::ApiKey { .. } => {
            let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https_connector()?);
            Ok(CalendarHub::new(client, NoToken))
        }
    }
}
