// --- File: crates/detailing_availability/src/travel.rs ---
//! Travel-time filter.
//!
//! A slot stays available only if the team can drive from the previous located
//! appointment of the day to the customer, and from the customer to the next
//! one, within the gaps around the slot.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use detailing_common::services::{CalendarEvent, TravelTimeEstimator};
use detailing_config::TravelFailureConfig;
use futures::future::join_all;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

use crate::logic::CandidateSlot;

/// What to assume when a travel lookup fails or times out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TravelFailurePolicy {
    /// Treat the slot as unavailable.
    #[default]
    FailClosed,
    /// Use a fixed duration instead. Every use is logged.
    Fallback { minutes: i64 },
}

impl From<&TravelFailureConfig> for TravelFailurePolicy {
    fn from(config: &TravelFailureConfig) -> Self {
        match config {
            TravelFailureConfig::FailClosed => TravelFailurePolicy::FailClosed,
            TravelFailureConfig::Fallback { minutes } => TravelFailurePolicy::Fallback {
                minutes: *minutes,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct TravelOptions {
    /// Bound on each individual lookup.
    pub lookup_timeout: Duration,
    pub on_failure: TravelFailurePolicy,
    /// Zone used to decide which events share the slot's day.
    pub time_zone: Tz,
}

impl Default for TravelOptions {
    fn default() -> Self {
        Self {
            lookup_timeout: Duration::from_secs(5),
            on_failure: TravelFailurePolicy::FailClosed,
            time_zone: chrono_tz::Europe::Zurich,
        }
    }
}

/// Downgrades every available slot the team cannot reach in time.
///
/// For each slot the nearest preceding event (latest end not after the slot start)
/// and the nearest following event (earliest start not before the slot end) on the
/// same local day are considered. Only events with a location take part: an
/// unlocated event between a located one and the slot is skipped, so the gap is
/// measured from the located event. Unlocated events still block their own window
/// through the overlap check.
///
/// Each distinct route is looked up once per call and all lookups run
/// concurrently, so slots sharing a neighbour share the estimate.
pub async fn apply_travel_time<E>(
    slots: Vec<CandidateSlot>,
    events: &[CalendarEvent],
    candidate_location: &str,
    estimator: &E,
    options: &TravelOptions,
) -> Vec<CandidateSlot>
where
    E: TravelTimeEstimator + ?Sized,
{
    let located: Vec<(&CalendarEvent, &str)> = events
        .iter()
        .filter_map(|event| {
            event
                .location
                .as_deref()
                .filter(|location| !location.trim().is_empty())
                .map(|location| (event, location))
        })
        .collect();
    if located.is_empty() {
        return slots;
    }

    let neighbours: Vec<Option<Neighbours<'_>>> = slots
        .iter()
        .map(|slot| {
            slot.available
                .then(|| neighbours_of(slot, &located, &options.time_zone))
        })
        .collect();

    let mut routes: Vec<(&str, &str)> = Vec::new();
    for found in neighbours.iter().flatten() {
        let legs = [
            found.previous.map(|(_, from)| (from, candidate_location)),
            found.next.map(|(_, to)| (candidate_location, to)),
        ];
        for route in legs.into_iter().flatten() {
            if !routes.contains(&route) {
                routes.push(route);
            }
        }
    }

    let estimates = join_all(
        routes
            .iter()
            .map(|(origin, destination)| lookup(estimator, origin, destination, options)),
    )
    .await;
    let travel: HashMap<(&str, &str), Option<i64>> = routes.into_iter().zip(estimates).collect();
    debug!(
        "{} distinct travel lookups for {} slots",
        travel.len(),
        slots.len()
    );

    slots
        .into_iter()
        .zip(neighbours)
        .map(|(mut slot, found)| {
            if let Some(found) = found {
                slot.available = reachable(&slot, &found, candidate_location, &travel);
            }
            slot
        })
        .collect()
}

/// Located events around one slot, with their locations.
struct Neighbours<'a> {
    previous: Option<(&'a CalendarEvent, &'a str)>,
    next: Option<(&'a CalendarEvent, &'a str)>,
}

fn neighbours_of<'a>(
    slot: &CandidateSlot,
    located: &[(&'a CalendarEvent, &'a str)],
    time_zone: &Tz,
) -> Neighbours<'a> {
    let day = slot.interval.start.with_timezone(time_zone).date_naive();
    let same_day = |(event, _): &&(&CalendarEvent, &str)| {
        event.start.with_timezone(time_zone).date_naive() == day
    };

    let previous = located
        .iter()
        .filter(same_day)
        .filter(|(event, _)| event.end <= slot.interval.start)
        .max_by_key(|(event, _)| event.end)
        .copied();
    let next = located
        .iter()
        .filter(same_day)
        .filter(|(event, _)| event.start >= slot.interval.end)
        .min_by_key(|(event, _)| event.start)
        .copied();

    Neighbours { previous, next }
}

fn reachable(
    slot: &CandidateSlot,
    found: &Neighbours<'_>,
    candidate_location: &str,
    travel: &HashMap<(&str, &str), Option<i64>>,
) -> bool {
    if let Some((event, from)) = found.previous {
        let Some(minutes) = travel.get(&(from, candidate_location)).copied().flatten() else {
            return false;
        };
        if gap_minutes(event.end, slot.interval.start) < minutes {
            debug!(
                "slot {} unreachable: {} min travel from previous appointment",
                slot.interval.start, minutes
            );
            return false;
        }
    }

    if let Some((event, to)) = found.next {
        let Some(minutes) = travel.get(&(candidate_location, to)).copied().flatten() else {
            return false;
        };
        if gap_minutes(slot.interval.end, event.start) < minutes {
            debug!(
                "slot {} unreachable: {} min travel to next appointment",
                slot.interval.start, minutes
            );
            return false;
        }
    }

    true
}

/// Travel minutes, or `None` when the slot must fail closed.
async fn lookup<E>(
    estimator: &E,
    origin: &str,
    destination: &str,
    options: &TravelOptions,
) -> Option<i64>
where
    E: TravelTimeEstimator + ?Sized,
{
    let failure = match tokio::time::timeout(
        options.lookup_timeout,
        estimator.travel_minutes(origin, destination),
    )
    .await
    {
        Ok(Ok(minutes)) => return Some(minutes.max(0)),
        Ok(Err(e)) => e.to_string(),
        Err(_) => format!("timed out after {:?}", options.lookup_timeout),
    };

    match options.on_failure {
        TravelFailurePolicy::FailClosed => {
            warn!(
                "travel lookup {} -> {} failed ({}), slot marked unavailable",
                origin, destination, failure
            );
            None
        }
        TravelFailurePolicy::Fallback { minutes } => {
            warn!(
                "travel lookup {} -> {} failed ({}), assuming {} minutes",
                origin, destination, failure, minutes
            );
            Some(minutes)
        }
    }
}

fn gap_minutes(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_minutes()
}
