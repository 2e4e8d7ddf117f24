// --- File: crates/detailing_config/src/models.rs ---

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Google Calendar Config ---
// Either a service-account key file or an API key must be present when `use_gcal` is set.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct GcalConfig {
    pub key_path: Option<String>,
    pub api_key: Option<String>, // usually "secret_from_env" -> GCAL_API_KEY
    pub calendar_id: Option<String>,
}

// --- Distance Matrix Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct MapsConfig {
    pub api_key: Option<String>, // usually "secret_from_env" -> MAPS_API_KEY
    pub base_url: Option<String>,
}

// --- Stripe Config ---
// Secret key falls back to the STRIPE_SECRET_KEY env var when absent.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StripeConfig {
    pub success_url: String, // Mandatory
    pub cancel_url: String,  // Mandatory
    pub default_currency: Option<String>,
    pub secret_key: Option<String>,
    pub api_base: Option<String>,
}

/// What the travel-time filter does when the estimator fails or times out.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TravelFailureConfig {
    /// Mark the slot unavailable.
    #[default]
    FailClosed,
    /// Assume a fixed travel duration and keep going.
    Fallback { minutes: i64 },
}

// --- Scheduling Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SchedulingConfig {
    /// IANA zone the business hours are expressed in.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    /// Opening time, `HH:MM`.
    #[serde(default = "default_business_start")]
    pub business_start: String,
    /// Closing time, `HH:MM`.
    #[serde(default = "default_business_end")]
    pub business_end: String,
    #[serde(default = "default_appointment_duration")]
    pub appointment_duration_minutes: i64,
    #[serde(default = "default_slot_interval")]
    pub slot_interval_minutes: i64,
    #[serde(default = "default_buffer")]
    pub buffer_minutes: i64,
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
    /// Three-letter weekday names ("Mon", "Tue", ...).
    #[serde(default = "default_working_days")]
    pub working_days: Vec<String>,
    #[serde(default = "default_calendar_timeout")]
    pub calendar_timeout_secs: u64,
    #[serde(default = "default_travel_timeout")]
    pub travel_timeout_secs: u64,
    #[serde(default = "default_events_cache_ttl")]
    pub events_cache_ttl_secs: u64,
    #[serde(default)]
    pub travel_failure: TravelFailureConfig,
}

fn default_time_zone() -> String {
    "Europe/Zurich".to_string()
}
fn default_business_start() -> String {
    "08:00".to_string()
}
fn default_business_end() -> String {
    "18:00".to_string()
}
fn default_appointment_duration() -> i64 {
    60
}
fn default_slot_interval() -> i64 {
    30
}
fn default_buffer() -> i64 {
    30
}
fn default_horizon_days() -> u32 {
    14
}
fn default_working_days() -> Vec<String> {
    ["Mon", "Tue", "Wed", "Thu", "Fri"]
        .iter()
        .map(|d| d.to_string())
        .collect()
}
fn default_calendar_timeout() -> u64 {
    10
}
fn default_travel_timeout() -> u64 {
    5
}
fn default_events_cache_ttl() -> u64 {
    60
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            time_zone: default_time_zone(),
            business_start: default_business_start(),
            business_end: default_business_end(),
            appointment_duration_minutes: default_appointment_duration(),
            slot_interval_minutes: default_slot_interval(),
            buffer_minutes: default_buffer(),
            horizon_days: default_horizon_days(),
            working_days: default_working_days(),
            calendar_timeout_secs: default_calendar_timeout(),
            travel_timeout_secs: default_travel_timeout(),
            events_cache_ttl_secs: default_events_cache_ttl(),
            travel_failure: TravelFailureConfig::default(),
        }
    }
}

// --- Cache Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_cache_capacity")]
    pub max_capacity: u64,
}

fn default_cache_capacity() -> u64 {
    10_000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_cache_capacity(),
        }
    }
}

// --- Catalog ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VehicleClass {
    pub id: String,
    pub name: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DetailingPackage {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Price in the smallest currency unit, keyed by vehicle class id.
    #[serde(default)]
    pub prices: HashMap<String, i64>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AddOnOption {
    pub id: String,
    pub name: String,
    /// Flat price in the smallest currency unit.
    pub price: i64,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CatalogConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub vehicle_classes: Vec<VehicleClass>,
    #[serde(default)]
    pub packages: Vec<DetailingPackage>,
    #[serde(default)]
    pub options: Vec<AddOnOption>,
}

fn default_currency() -> String {
    "chf".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            vehicle_classes: Vec::new(),
            packages: Vec::new(),
            options: Vec::new(),
        }
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_gcal: bool,
    #[serde(default)]
    pub use_maps: bool,
    #[serde(default)]
    pub use_stripe: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub gcal: Option<GcalConfig>,
    #[serde(default)]
    pub maps: Option<MapsConfig>,
    #[serde(default)]
    pub stripe: Option<StripeConfig>,

    #[serde(default)]
    pub scheduling: SchedulingConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}
