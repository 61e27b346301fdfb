// Rust guideline compliant 2026-10-12

//! Property-based tests for half-open interval overlap.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use slotwise_core::Interval;

fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2030, 3, 4)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Intervals within one week, at minute resolution.
fn arb_interval() -> impl Strategy<Value = Interval> {
    (0i64..10_080, 1i64..600).prop_map(|(offset, length)| {
        let start = base() + Duration::minutes(offset);
        Interval {
            start,
            end: start + Duration::minutes(length),
        }
    })
}

proptest! {
    /// Overlap is symmetric.
    #[test]
    fn prop_overlap_symmetric(a in arb_interval(), b in arb_interval()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    /// Overlap holds iff the intervals share at least one minute.
    #[test]
    fn prop_overlap_matches_shared_minute(a in arb_interval(), b in arb_interval()) {
        let shared = a.start.max(b.start) < a.end.min(b.end);
        prop_assert_eq!(a.overlaps(&b), shared);
    }

    /// An interval ending where another starts never conflicts with it.
    #[test]
    fn prop_adjacent_never_overlap(a in arb_interval(), length in 1i64..600) {
        let next = Interval { start: a.end, end: a.end + Duration::minutes(length) };
        prop_assert!(!a.overlaps(&next));
        prop_assert!(!next.overlaps(&a));
    }

    /// Every non-empty interval overlaps itself.
    #[test]
    fn prop_self_overlap(a in arb_interval()) {
        prop_assert!(a.overlaps(&a));
        prop_assert!(a.contains(&a));
    }
}
