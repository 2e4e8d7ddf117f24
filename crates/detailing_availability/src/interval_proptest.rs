#[cfg(test)]
mod tests {
    use crate::interval::{overlaps, overlaps_strict, TimeInterval};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 5, 0, 0, 0).unwrap()
    }

    // Start offset and positive length, both in minutes from a fixed Monday.
    fn interval_strategy() -> impl Strategy<Value = TimeInterval> {
        (0..10_000i64, 1..600i64).prop_map(|(offset, len)| {
            let start = base() + Duration::minutes(offset);
            TimeInterval::new(start, start + Duration::minutes(len)).unwrap()
        })
    }

    proptest! {
        #[test]
        fn test_overlap_is_symmetric(a in interval_strategy(), b in interval_strategy()) {
            prop_assert_eq!(overlaps(&a, &b).unwrap(), overlaps(&b, &a).unwrap());
            prop_assert_eq!(overlaps_strict(&a, &b).unwrap(), overlaps_strict(&b, &a).unwrap());
        }

        #[test]
        fn test_overlap_is_reflexive(a in interval_strategy()) {
            prop_assert!(overlaps(&a, &a).unwrap());
            prop_assert!(overlaps_strict(&a, &a).unwrap());
        }

        #[test]
        fn test_separated_intervals_never_overlap(
            a in interval_strategy(),
            gap in 1..240i64,
            len in 1..240i64,
        ) {
            let start = a.end + Duration::minutes(gap);
            let b = TimeInterval::new(start, start + Duration::minutes(len)).unwrap();
            prop_assert!(!overlaps(&a, &b).unwrap());
            prop_assert!(!overlaps(&b, &a).unwrap());
        }

        #[test]
        fn test_strict_overlap_implies_inclusive(a in interval_strategy(), b in interval_strategy()) {
            if overlaps_strict(&a, &b).unwrap() {
                prop_assert!(overlaps(&a, &b).unwrap());
            }
        }
    }
}
