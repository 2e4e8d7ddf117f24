// --- File: crates/detailing_availability/src/interval.rs ---
//! Time intervals and the overlap rules used for conflict detection.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AvailabilityError;

/// A span of time in UTC. Local context comes from the policy's time zone.
///
/// `start < end` holds for every interval built through [`TimeInterval::new`];
/// the overlap functions re-check it because the fields are public.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, AvailabilityError> {
        let interval = TimeInterval { start, end };
        interval.validate()?;
        Ok(interval)
    }

    pub fn validate(&self) -> Result<(), AvailabilityError> {
        if self.start < self.end {
            Ok(())
        } else {
            Err(AvailabilityError::InvalidInterval {
                start: self.start,
                end: self.end,
            })
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Inclusive on both bounds.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// The same interval with `buffer` appended after its end. Negative buffers are ignored.
    pub fn with_trailing_buffer(&self, buffer: Duration) -> TimeInterval {
        TimeInterval {
            start: self.start,
            end: self.end + buffer.max(Duration::zero()),
        }
    }
}

/// Inclusive four-way containment: true if either interval has an endpoint inside the other.
///
/// Touching intervals (one ends exactly when the other starts) overlap. Scheduling
/// treats back-to-back bookings as conflicting unless the caller opts into
/// [`overlaps_strict`].
pub fn overlaps(a: &TimeInterval, b: &TimeInterval) -> Result<bool, AvailabilityError> {
    a.validate()?;
    b.validate()?;
    Ok(intersects_inclusive(a, b))
}

/// Half-open comparison: touching intervals do not overlap.
pub fn overlaps_strict(a: &TimeInterval, b: &TimeInterval) -> Result<bool, AvailabilityError> {
    a.validate()?;
    b.validate()?;
    Ok(a.start < b.end && b.start < a.end)
}

pub(crate) fn intersects_inclusive(a: &TimeInterval, b: &TimeInterval) -> bool {
    b.contains(a.start) || b.contains(a.end) || a.contains(b.start) || a.contains(b.end)
}
