#[cfg(test)]
mod tests {
    use crate::interval::{overlaps, TimeInterval};
    use crate::logic::enumerate_slots;
    use crate::policy::BusinessHoursPolicy;
    use crate::test_support::{event, zurich};
    use chrono::{Duration, NaiveTime, Weekday};
    use chrono_tz::Europe::Zurich;
    use detailing_common::services::CalendarEvent;
    use proptest::prelude::*;

    fn policy_strategy() -> impl Strategy<Value = BusinessHoursPolicy> {
        (
            5..10u32,          // opening hour
            14..20u32,         // closing hour
            1..5i64,           // appointment length in 30 min steps
            prop::sample::select(vec![15i64, 30, 60]),
            0..60i64,          // buffer minutes
            1..10u32,          // horizon
        )
            .prop_map(|(open, close, len, step, buffer, horizon)| BusinessHoursPolicy {
                business_start: NaiveTime::from_hms_opt(open, 0, 0).unwrap(),
                business_end: NaiveTime::from_hms_opt(close, 0, 0).unwrap(),
                appointment_duration: Duration::minutes(len * 30),
                slot_interval: Duration::minutes(step),
                buffer: Duration::minutes(buffer),
                horizon_days: horizon,
                working_days: vec![
                    Weekday::Mon,
                    Weekday::Tue,
                    Weekday::Wed,
                    Weekday::Thu,
                    Weekday::Fri,
                    Weekday::Sat,
                ],
                ..BusinessHoursPolicy::default()
            })
    }

    // Events scattered over the first ten days of June 2025, in 15 minute units.
    fn events_strategy() -> impl Strategy<Value = Vec<CalendarEvent>> {
        prop::collection::vec((0..960i64, 1..16i64), 0..12).prop_map(|raw| {
            let base = zurich(2025, 6, 2, 0, 0);
            raw.into_iter()
                .map(|(offset, len)| {
                    let start = base + Duration::minutes(offset * 15);
                    event(start, start + Duration::minutes(len * 15), None)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn test_available_slots_lie_within_business_hours(
            policy in policy_strategy(),
            events in events_strategy(),
        ) {
            let slots = enumerate_slots("2025-06-02", &policy, &events, zurich(2025, 1, 1, 0, 0)).unwrap();
            let latest_start = policy.business_end - policy.appointment_duration;

            for slot in slots.iter().filter(|s| s.available) {
                let local_start = slot.interval.start.with_timezone(&Zurich);
                let local_end = slot.interval.end.with_timezone(&Zurich);
                prop_assert!(local_start.time() >= policy.business_start);
                prop_assert!(local_start.time() <= latest_start);
                prop_assert_eq!(local_start.date_naive(), local_end.date_naive());
            }
        }

        #[test]
        fn test_no_available_slot_touches_a_buffered_event(
            policy in policy_strategy(),
            events in events_strategy(),
        ) {
            let slots = enumerate_slots("2025-06-02", &policy, &events, zurich(2025, 1, 1, 0, 0)).unwrap();

            for slot in slots.iter().filter(|s| s.available) {
                let padded = slot.interval.with_trailing_buffer(policy.buffer);
                for e in &events {
                    let busy = TimeInterval::new(e.start, e.end).unwrap();
                    prop_assert!(!overlaps(&padded, &busy).unwrap());
                }
            }
        }

        #[test]
        fn test_enumeration_is_idempotent_for_fixed_now(
            policy in policy_strategy(),
            events in events_strategy(),
            now_offset in 0..(10 * 24 * 60i64),
        ) {
            let now = zurich(2025, 6, 2, 0, 0) + Duration::minutes(now_offset);
            let first = enumerate_slots("2025-06-02", &policy, &events, now).unwrap();
            let second = enumerate_slots("2025-06-02", &policy, &events, now).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn test_slots_are_chronological_and_never_past(
            policy in policy_strategy(),
            now_offset in 0..(10 * 24 * 60i64),
        ) {
            let now = zurich(2025, 6, 2, 0, 0) + Duration::minutes(now_offset);
            let slots = enumerate_slots("2025-06-02", &policy, &[], now).unwrap();
            prop_assert!(slots.iter().all(|s| s.interval.start >= now));
            prop_assert!(slots.windows(2).all(|w| w[0].interval.start < w[1].interval.start));
        }
    }
}
