// --- File: crates/detailing_availability/src/service.rs ---
use chrono::{DateTime, NaiveDate, Utc};
use detailing_common::cache::{cached, CacheStore};
use detailing_common::services::{CalendarEvent, DynCalendarService, DynTravelTimeEstimator};
use detailing_config::AppConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::error::AvailabilityError;
use crate::interval::TimeInterval;
use crate::logic::{
    busy_intervals, day_window, enumerate_with, is_free, local_days_of, parse_start_date,
    CandidateSlot,
};
use crate::policy::BusinessHoursPolicy;
use crate::travel::{apply_travel_time, TravelFailurePolicy, TravelOptions};

/// Runtime knobs of [`AvailabilityService`] that are not part of the business-hours policy.
#[derive(Debug, Clone)]
pub struct AvailabilitySettings {
    pub calendar_id: String,
    pub calendar_timeout: Duration,
    pub events_cache_ttl: Duration,
    pub travel_timeout: Duration,
    pub travel_failure: TravelFailurePolicy,
}

impl AvailabilitySettings {
    pub fn from_config(config: &AppConfig) -> Result<Self, AvailabilityError> {
        let calendar_id = config
            .gcal
            .as_ref()
            .and_then(|gcal| gcal.calendar_id.clone())
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                AvailabilityError::ConfigurationMissing("gcal.calendar_id".to_string())
            })?;

        let scheduling = &config.scheduling;
        Ok(Self {
            calendar_id,
            calendar_timeout: Duration::from_secs(scheduling.calendar_timeout_secs),
            events_cache_ttl: Duration::from_secs(scheduling.events_cache_ttl_secs),
            travel_timeout: Duration::from_secs(scheduling.travel_timeout_secs),
            travel_failure: TravelFailurePolicy::from(&scheduling.travel_failure),
        })
    }
}

/// Answers availability questions against the live calendar.
///
/// Calendar reads go through the cache; every read is bounded by the calendar
/// timeout. The travel filter only runs when both a customer location and an
/// estimator are present.
pub struct AvailabilityService {
    calendar: DynCalendarService,
    estimator: Option<DynTravelTimeEstimator>,
    cache: Arc<dyn CacheStore>,
    policy: BusinessHoursPolicy,
    settings: AvailabilitySettings,
}

impl AvailabilityService {
    pub fn new(
        calendar: DynCalendarService,
        estimator: Option<DynTravelTimeEstimator>,
        cache: Arc<dyn CacheStore>,
        policy: BusinessHoursPolicy,
        settings: AvailabilitySettings,
    ) -> Self {
        Self {
            calendar,
            estimator,
            cache,
            policy,
            settings,
        }
    }

    pub fn policy(&self) -> &BusinessHoursPolicy {
        &self.policy
    }

    pub fn settings(&self) -> &AvailabilitySettings {
        &self.settings
    }

    /// All candidate slots of the horizon starting at `date` (`YYYY-MM-DD`).
    pub async fn slots_for_date(
        &self,
        date: &str,
        location: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Vec<CandidateSlot>, AvailabilityError> {
        let first_day = parse_start_date(date)?;
        self.evaluate(first_day, self.policy.horizon_days, location, now)
            .await
    }

    /// Candidate slots lying inside `[start, end]`.
    pub async fn slots_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        location: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Vec<CandidateSlot>, AvailabilityError> {
        let range = TimeInterval::new(start, end)?;
        let (first_day, days) = local_days_of(&range, &self.policy.time_zone)?;
        let mut slots = self.evaluate(first_day, days, location, now).await?;
        slots.retain(|slot| slot.interval.start >= range.start && slot.interval.end <= range.end);
        Ok(slots)
    }

    /// Whether `start` is an offered slot that is still free.
    ///
    /// Instants off the slot grid or outside business hours are never available.
    pub async fn is_slot_available(
        &self,
        start: DateTime<Utc>,
        location: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<bool, AvailabilityError> {
        let day = start.with_timezone(&self.policy.time_zone).date_naive();
        let slots = self.evaluate(day, 1, location, now).await?;
        Ok(slots
            .iter()
            .any(|slot| slot.interval.start == start && slot.available))
    }

    /// Drops cached calendar windows, e.g. after a booking was written.
    pub async fn forget_cached_events(&self) {
        if let Err(e) = self.cache.flush().await {
            warn!("could not flush cached calendar events: {}", e);
        }
    }

    /// Events of the calendar intersecting `window`, read through the cache.
    pub async fn fetch_events(
        &self,
        window: &TimeInterval,
    ) -> Result<Vec<CalendarEvent>, AvailabilityError> {
        let key = format!(
            "events:{}:{}:{}",
            self.settings.calendar_id,
            window.start.to_rfc3339(),
            window.end.to_rfc3339()
        );

        let label = key.as_str();
        cached(
            self.cache.as_ref(),
            label,
            self.settings.events_cache_ttl,
            move || async move {
                let read = self.calendar.list_events(
                    &self.settings.calendar_id,
                    window.start,
                    window.end,
                );
                match tokio::time::timeout(self.settings.calendar_timeout, read).await {
                    Ok(Ok(events)) => Ok(events),
                    Ok(Err(e)) => {
                        error!("calendar read for {} failed: {}", label, e);
                        Err(AvailabilityError::upstream("calendar", e))
                    }
                    Err(_) => {
                        warn!(
                            "calendar read for {} timed out after {:?}",
                            label, self.settings.calendar_timeout
                        );
                        Err(AvailabilityError::Timeout("calendar".to_string()))
                    }
                }
            },
        )
        .await
    }

    async fn evaluate(
        &self,
        first_day: NaiveDate,
        days: u32,
        location: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Vec<CandidateSlot>, AvailabilityError> {
        let window = day_window(first_day, days, &self.policy.time_zone)?;
        let events = self.fetch_events(&window).await?;
        let busy = busy_intervals(&events);

        let slots = enumerate_with(first_day, days, &self.policy, now, |slot| {
            is_free(slot, &busy, &self.policy)
        });

        let location = location.map(str::trim).filter(|l| !l.is_empty());
        match (location, &self.estimator) {
            (Some(location), Some(estimator)) => {
                info!(
                    "applying travel filter for {} slots from {}",
                    slots.len(),
                    first_day
                );
                let options = TravelOptions {
                    lookup_timeout: self.settings.travel_timeout,
                    on_failure: self.settings.travel_failure,
                    time_zone: self.policy.time_zone,
                };
                Ok(apply_travel_time(slots, &events, location, estimator.as_ref(), &options).await)
            }
            _ => Ok(slots),
        }
    }
}
