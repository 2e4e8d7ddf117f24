// --- File: crates/detailing_availability/src/logic.rs ---
//! Slot enumeration.
//!
//! All variants share [`enumerate_with`]: it walks the working days of the
//! horizon, cuts each local business day into fixed-length candidates and asks a
//! predicate whether each one is free. Callers differ only in the predicate and
//! in how they pick the days.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use detailing_common::services::CalendarEvent;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::AvailabilityError;
use crate::interval::{intersects_inclusive, TimeInterval};
use crate::policy::BusinessHoursPolicy;

/// Longest `start`/`end` range the range variant will scan.
pub const MAX_RANGE_DAYS: i64 = 62;

/// A generated appointment window and whether it can be booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CandidateSlot {
    pub interval: TimeInterval,
    pub available: bool,
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_start_date(raw: &str) -> Result<NaiveDate, AvailabilityError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AvailabilityError::InvalidDate(raw.to_string()))
}

/// Walks `days` local days from `first_day` and tags every candidate with `accept`.
///
/// Non-working days are skipped. Starts step by `slot_interval` from
/// `business_start`; a candidate whose end passes `business_end` is not
/// generated. Local times in a DST gap are skipped, ambiguous ones take the
/// earlier instant. Candidates starting before `now` are dropped.
pub fn enumerate_with<F>(
    first_day: NaiveDate,
    days: u32,
    policy: &BusinessHoursPolicy,
    now: DateTime<Utc>,
    mut accept: F,
) -> Vec<CandidateSlot>
where
    F: FnMut(&TimeInterval) -> bool,
{
    let mut slots = Vec::new();
    if policy.slot_interval <= chrono::Duration::zero() {
        warn!("slot interval is not positive, no slots generated");
        return slots;
    }

    for offset in 0..days {
        let Some(day) = first_day.checked_add_days(Days::new(u64::from(offset))) else {
            break;
        };
        if !policy.is_working_day(day.weekday()) {
            continue;
        }

        let closing = day.and_time(policy.business_end);
        let mut local_start = day.and_time(policy.business_start);

        while local_start + policy.appointment_duration <= closing {
            if let Some(interval) =
                to_utc_interval(&policy.time_zone, local_start, policy.appointment_duration)
            {
                if interval.start >= now {
                    let available = accept(&interval);
                    slots.push(CandidateSlot {
                        interval,
                        available,
                    });
                }
            }
            local_start += policy.slot_interval;
        }
    }

    debug!(
        "enumerated {} slots over {} days from {}",
        slots.len(),
        days,
        first_day
    );
    slots
}

/// Candidate slots for the policy horizon starting at `start_date`, tagged against `booked`.
pub fn enumerate_slots(
    start_date: &str,
    policy: &BusinessHoursPolicy,
    booked: &[CalendarEvent],
    now: DateTime<Utc>,
) -> Result<Vec<CandidateSlot>, AvailabilityError> {
    let first_day = parse_start_date(start_date)?;
    let busy = busy_intervals(booked);
    Ok(enumerate_with(
        first_day,
        policy.horizon_days,
        policy,
        now,
        |slot| is_free(slot, &busy, policy),
    ))
}

/// Candidate slots lying entirely inside `[start, end]`.
///
/// Scans every local date the range touches, regardless of the policy horizon.
pub fn enumerate_range(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    policy: &BusinessHoursPolicy,
    booked: &[CalendarEvent],
    now: DateTime<Utc>,
) -> Result<Vec<CandidateSlot>, AvailabilityError> {
    let range = TimeInterval::new(start, end)?;
    let (first_day, days) = local_days_of(&range, &policy.time_zone)?;
    let busy = busy_intervals(booked);

    let mut slots = enumerate_with(first_day, days, policy, now, |slot| {
        is_free(slot, &busy, policy)
    });
    slots.retain(|slot| slot.interval.start >= range.start && slot.interval.end <= range.end);
    Ok(slots)
}

/// Keeps only the bookable slots.
pub fn available_only(slots: &[CandidateSlot]) -> Vec<CandidateSlot> {
    slots.iter().filter(|slot| slot.available).copied().collect()
}

/// True when `slot`, extended by the policy buffer, touches none of `busy`.
pub fn is_free(slot: &TimeInterval, busy: &[TimeInterval], policy: &BusinessHoursPolicy) -> bool {
    let padded = slot.with_trailing_buffer(policy.buffer);
    !busy.iter().any(|event| intersects_inclusive(&padded, event))
}

/// Converts calendar events into intervals, dropping zero-length or inverted ones.
pub fn busy_intervals(events: &[CalendarEvent]) -> Vec<TimeInterval> {
    events
        .iter()
        .filter_map(|event| match TimeInterval::new(event.start, event.end) {
            Ok(interval) => Some(interval),
            Err(e) => {
                warn!(
                    "ignoring calendar event {:?} with unusable bounds: {}",
                    event.id, e
                );
                None
            }
        })
        .collect()
}

/// First local date of `range` and the number of local dates it touches.
pub(crate) fn local_days_of(
    range: &TimeInterval,
    time_zone: &Tz,
) -> Result<(NaiveDate, u32), AvailabilityError> {
    let first = range.start.with_timezone(time_zone).date_naive();
    let last = range.end.with_timezone(time_zone).date_naive();
    let span = (last - first).num_days() + 1;
    if span > MAX_RANGE_DAYS {
        return Err(AvailabilityError::InvalidDate(format!(
            "range of {span} days exceeds {MAX_RANGE_DAYS} days"
        )));
    }
    Ok((first, span.max(1) as u32))
}

/// UTC window from local midnight of `first_day` to local midnight `days` later.
pub fn day_window(
    first_day: NaiveDate,
    days: u32,
    time_zone: &Tz,
) -> Result<TimeInterval, AvailabilityError> {
    let last_day = first_day
        .checked_add_days(Days::new(u64::from(days.max(1))))
        .ok_or_else(|| AvailabilityError::InvalidDate(first_day.to_string()))?;
    TimeInterval::new(
        local_midnight(first_day, time_zone),
        local_midnight(last_day, time_zone),
    )
}

fn local_midnight(day: NaiveDate, time_zone: &Tz) -> DateTime<Utc> {
    let naive = day.and_time(NaiveTime::MIN);
    time_zone
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

// The end is measured in absolute time so slots keep their length across DST changes.
fn to_utc_interval(
    time_zone: &Tz,
    local_start: NaiveDateTime,
    duration: chrono::Duration,
) -> Option<TimeInterval> {
    let start = time_zone
        .from_local_datetime(&local_start)
        .earliest()?
        .with_timezone(&Utc);
    TimeInterval::new(start, start + duration).ok()
}
