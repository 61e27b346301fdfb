// Rust guideline compliant 2026-10-12

//! Unit tests for the booking state machine.

use chrono::{NaiveDate, NaiveDateTime};
use slotwise_core::fsm::authorize;
use slotwise_core::{
    apply_transition, Actor, Booking, BookingStatus, Error, Role, StatusChange,
};

fn at(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2030, 3, 4)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn booking(status: BookingStatus) -> Booking {
    Booking {
        id: "bkg-test1".to_string(),
        customer_id: "cust-7".to_string(),
        provider_id: "prv-test1".to_string(),
        service_id: "svc-test1".to_string(),
        slot_id: None,
        scheduled_at: at(10),
        estimated_end: at(11),
        actual_start: None,
        actual_end: None,
        status,
        total_price_cents: 4500,
        duration_minutes: 60,
        notes: None,
        customer_address: None,
        customer_location: None,
        cancellation: None,
        created_at: at(8),
        updated_at: at(8),
    }
}

fn provider() -> Actor {
    Actor::provider("prv-test1")
}

fn customer() -> Actor {
    Actor::customer("cust-7")
}

#[test]
fn test_provider_happy_path() {
    let mut b = booking(BookingStatus::Pending);
    apply_transition(&mut b, &provider(), StatusChange::to(BookingStatus::Confirmed), at(9)).unwrap();
    apply_transition(&mut b, &provider(), StatusChange::to(BookingStatus::InProgress), at(10)).unwrap();
    assert_eq!(b.actual_start, Some(at(10)));
    apply_transition(&mut b, &provider(), StatusChange::to(BookingStatus::Completed), at(11)).unwrap();
    assert_eq!(b.actual_end, Some(at(11)));
    assert_eq!(b.status, BookingStatus::Completed);
    assert_eq!(b.updated_at, at(11));
}

#[test]
fn test_customer_cannot_start_but_provider_can() {
    let mut b = booking(BookingStatus::Confirmed);
    let err = apply_transition(&mut b, &customer(), StatusChange::to(BookingStatus::InProgress), at(10))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidTransition {
            from: BookingStatus::Confirmed,
            to: BookingStatus::InProgress
        }
    ));
    assert_eq!(b.status, BookingStatus::Confirmed);
    assert!(b.actual_start.is_none());

    apply_transition(&mut b, &provider(), StatusChange::to(BookingStatus::InProgress), at(10)).unwrap();
    assert_eq!(b.status, BookingStatus::InProgress);
    assert_eq!(b.actual_start, Some(at(10)));
}

#[test]
fn test_explicit_actual_times_honored() {
    let mut b = booking(BookingStatus::Confirmed);
    let change = StatusChange {
        actual_start: Some(at(9)),
        ..StatusChange::to(BookingStatus::InProgress)
    };
    apply_transition(&mut b, &provider(), change, at(10)).unwrap();
    assert_eq!(b.actual_start, Some(at(9)));

    let change = StatusChange {
        actual_end: Some(at(8)),
        ..StatusChange::to(BookingStatus::Completed)
    };
    let err = apply_transition(&mut b, &provider(), change, at(12)).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(b.status, BookingStatus::InProgress);
}

#[test]
fn test_cancellation_requires_reason_and_stamps_metadata() {
    let mut b = booking(BookingStatus::Pending);
    let err = apply_transition(&mut b, &customer(), StatusChange::cancel("   "), at(9)).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(b.cancellation.is_none());

    apply_transition(&mut b, &customer(), StatusChange::cancel("plans changed"), at(9)).unwrap();
    let cancellation = b.cancellation.clone().unwrap();
    assert_eq!(cancellation.reason, "plans changed");
    assert_eq!(cancellation.cancelled_by, Role::Customer);
    assert_eq!(cancellation.cancelled_at, at(9));
    assert!(b.validate().is_ok());
}

#[test]
fn test_provider_may_cancel_in_progress_customer_may_not() {
    let mut b = booking(BookingStatus::InProgress);
    assert!(matches!(
        apply_transition(&mut b, &customer(), StatusChange::cancel("late"), at(10)),
        Err(Error::InvalidTransition { .. })
    ));
    apply_transition(&mut b, &provider(), StatusChange::cancel("emergency"), at(10)).unwrap();
    assert_eq!(b.cancellation.unwrap().cancelled_by, Role::Provider);
}

#[test]
fn test_terminal_states_reject_everything() {
    for status in [BookingStatus::Completed, BookingStatus::Cancelled] {
        for actor in [customer(), provider()] {
            for target in BookingStatus::ALL {
                let mut b = booking(status);
                if status == BookingStatus::Cancelled {
                    b.cancellation = Some(slotwise_core::Cancellation {
                        reason: "x".to_string(),
                        cancelled_by: Role::Customer,
                        cancelled_at: at(9),
                    });
                }
                let before = b.clone();
                let change = StatusChange {
                    reason: Some("again".to_string()),
                    ..StatusChange::to(target)
                };
                let err = apply_transition(&mut b, &actor, change, at(12)).unwrap_err();
                assert!(matches!(err, Error::InvalidTransition { .. }));
                assert_eq!(b, before);
            }
        }
    }
}

#[test]
fn test_identity_checked_not_just_role() {
    let mut b = booking(BookingStatus::Pending);
    let stranger = Actor::provider("prv-other");
    let err = apply_transition(&mut b, &stranger, StatusChange::to(BookingStatus::Confirmed), at(9))
        .unwrap_err();
    assert!(matches!(err, Error::Unauthorized { .. }));
    assert!(authorize(&b, &Actor::customer("cust-8")).is_err());
    assert!(authorize(&b, &customer()).is_ok());
}

#[test]
fn test_notes_replaced_on_transition() {
    let mut b = booking(BookingStatus::Pending);
    let change = StatusChange {
        notes: Some("gate code 1234".to_string()),
        ..StatusChange::to(BookingStatus::Confirmed)
    };
    apply_transition(&mut b, &provider(), change, at(9)).unwrap();
    assert_eq!(b.notes.as_deref(), Some("gate code 1234"));
}

#[test]
fn test_invalid_transition_message_names_states() {
    let err = BookingStatus::Pending
        .can_transition_to(BookingStatus::Completed, Role::Provider)
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid booking transition: pending -> completed");
}
