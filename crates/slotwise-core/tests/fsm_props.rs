// Rust guideline compliant 2026-10-12

//! Property-based tests for the booking state machine.

use proptest::prelude::*;
use slotwise_core::{BookingStatus, Role};

fn arb_status() -> impl Strategy<Value = BookingStatus> {
    prop_oneof![
        Just(BookingStatus::Pending),
        Just(BookingStatus::Confirmed),
        Just(BookingStatus::InProgress),
        Just(BookingStatus::Completed),
        Just(BookingStatus::Cancelled),
    ]
}

fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::Customer), Just(Role::Provider)]
}

/// Position in the forward lifecycle; cancellation sits outside it.
fn rank(status: BookingStatus) -> Option<u8> {
    match status {
        BookingStatus::Pending => Some(0),
        BookingStatus::Confirmed => Some(1),
        BookingStatus::InProgress => Some(2),
        BookingStatus::Completed => Some(3),
        BookingStatus::Cancelled => None,
    }
}

proptest! {
    /// Terminal statuses reject every target for every role.
    #[test]
    fn prop_terminal_is_final(from in arb_status(), to in arb_status(), role in arb_role()) {
        if from.is_terminal() {
            prop_assert!(from.can_transition_to(to, role).is_err());
        }
    }

    /// `can_transition_to` agrees with `allowed_targets`.
    #[test]
    fn prop_check_matches_table(from in arb_status(), to in arb_status(), role in arb_role()) {
        let allowed = from.allowed_targets(role).contains(&to);
        prop_assert_eq!(from.can_transition_to(to, role).is_ok(), allowed);
    }

    /// Allowed transitions only move forward by one step or cancel.
    #[test]
    fn prop_transitions_monotonic(from in arb_status(), to in arb_status(), role in arb_role()) {
        if from.can_transition_to(to, role).is_ok() {
            match (rank(from), rank(to)) {
                (Some(a), Some(b)) => prop_assert_eq!(b, a + 1),
                (Some(_), None) => {}
                _ => prop_assert!(false, "unexpected transition {} -> {}", from, to),
            }
        }
    }

    /// Customers can only ever cancel.
    #[test]
    fn prop_customer_only_cancels(from in arb_status(), to in arb_status()) {
        if from.can_transition_to(to, Role::Customer).is_ok() {
            prop_assert_eq!(to, BookingStatus::Cancelled);
        }
    }
}
