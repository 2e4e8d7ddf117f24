// --- File: crates/detailing_availability/src/policy.rs ---
use chrono::{Duration, NaiveTime, Weekday};
use chrono_tz::Tz;
use detailing_config::SchedulingConfig;
use std::str::FromStr;

use crate::error::AvailabilityError;

/// Static scheduling rules: when the shop is open and how slots are cut.
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessHoursPolicy {
    /// Zone the opening hours and day boundaries are expressed in.
    pub time_zone: Tz,
    pub business_start: NaiveTime,
    pub business_end: NaiveTime,
    pub appointment_duration: Duration,
    /// Spacing between candidate start times.
    pub slot_interval: Duration,
    /// Idle time required after an appointment before the next booked event.
    pub buffer: Duration,
    /// Number of days scanned, starting with the requested date.
    pub horizon_days: u32,
    pub working_days: Vec<Weekday>,
}

impl Default for BusinessHoursPolicy {
    fn default() -> Self {
        Self {
            time_zone: chrono_tz::Europe::Zurich,
            business_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            business_end: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN),
            appointment_duration: Duration::minutes(60),
            slot_interval: Duration::minutes(30),
            buffer: Duration::minutes(30),
            horizon_days: 14,
            working_days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
        }
    }
}

impl BusinessHoursPolicy {
    /// Builds the policy from the `[scheduling]` section, rejecting values the enumerator cannot use.
    pub fn from_config(config: &SchedulingConfig) -> Result<Self, AvailabilityError> {
        let time_zone = Tz::from_str(&config.time_zone).map_err(|_| {
            AvailabilityError::ConfigurationMissing(format!(
                "unknown time zone '{}'",
                config.time_zone
            ))
        })?;
        let business_start = parse_clock("business_start", &config.business_start)?;
        let business_end = parse_clock("business_end", &config.business_end)?;
        if business_start >= business_end {
            return Err(AvailabilityError::ConfigurationMissing(format!(
                "business_start {} must be before business_end {}",
                config.business_start, config.business_end
            )));
        }
        if config.appointment_duration_minutes <= 0 {
            return Err(AvailabilityError::ConfigurationMissing(
                "appointment_duration_minutes must be positive".to_string(),
            ));
        }
        if config.slot_interval_minutes <= 0 {
            return Err(AvailabilityError::ConfigurationMissing(
                "slot_interval_minutes must be positive".to_string(),
            ));
        }
        if config.buffer_minutes < 0 {
            return Err(AvailabilityError::ConfigurationMissing(
                "buffer_minutes must not be negative".to_string(),
            ));
        }

        let working_days = config
            .working_days
            .iter()
            .map(|day| {
                Weekday::from_str(day).map_err(|_| {
                    AvailabilityError::ConfigurationMissing(format!("unknown working day '{day}'"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            time_zone,
            business_start,
            business_end,
            appointment_duration: Duration::minutes(config.appointment_duration_minutes),
            slot_interval: Duration::minutes(config.slot_interval_minutes),
            buffer: Duration::minutes(config.buffer_minutes),
            horizon_days: config.horizon_days,
            working_days,
        })
    }

    pub fn is_working_day(&self, day: Weekday) -> bool {
        self.working_days.contains(&day)
    }
}

fn parse_clock(field: &str, value: &str) -> Result<NaiveTime, AvailabilityError> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| {
        AvailabilityError::ConfigurationMissing(format!("{field} '{value}' is not HH:MM"))
    })
}
