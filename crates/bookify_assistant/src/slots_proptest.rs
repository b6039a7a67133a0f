// --- File: crates/bookify_assistant/src/slots_proptest.rs ---
#[cfg(test)]
mod tests {
    use crate::slots::overlaps;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn minute(offset: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(offset)
    }

    proptest! {
        // Conflict checking must not depend on argument order.
        #[test]
        fn overlap_is_symmetric(
            a_start in 0i64..10_000,
            a_len in 1i64..500,
            b_start in 0i64..10_000,
            b_len in 1i64..500,
        ) {
            let a = (minute(a_start), minute(a_start + a_len));
            let b = (minute(b_start), minute(b_start + b_len));
            prop_assert_eq!(
                overlaps(a.0, a.1, b.0, b.1),
                overlaps(b.0, b.1, a.0, a.1)
            );
        }

        // Back-to-back intervals never conflict, whatever their lengths.
        #[test]
        fn touching_intervals_are_free(
            start in 0i64..10_000,
            first_len in 1i64..500,
            second_len in 1i64..500,
        ) {
            let boundary = start + first_len;
            prop_assert!(!overlaps(
                minute(start),
                minute(boundary),
                minute(boundary),
                minute(boundary + second_len)
            ));
        }

        // An interval with positive length always conflicts with itself.
        #[test]
        fn interval_conflicts_with_itself(start in 0i64..10_000, len in 1i64..500) {
            prop_assert!(overlaps(
                minute(start),
                minute(start + len),
                minute(start),
                minute(start + len)
            ));
        }
    }
}
