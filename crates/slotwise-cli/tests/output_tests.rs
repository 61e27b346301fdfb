// Rust guideline compliant 2026-10-12

//! Unit tests for output formatting module.

use chrono::{NaiveDate, NaiveDateTime};
use slotwise_app::AppError;
use slotwise_cli::create_formatter;
use slotwise_core::{
    Booking, BookingStatus, BulkOutcome, Conflict, ConflictKind, Distance, Error, Interval, Provider, Slot,
    SkipReason, SkippedSlot,
};

fn at(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2030, 3, 4)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn test_slot(id: &str, from: u32, to: u32) -> Slot {
    Slot {
        id: id.to_string(),
        provider_id: "prv-a1b2c3d4e5".to_string(),
        start: at(from),
        end: at(to),
        recurrence: None,
        is_booked: false,
        notes: None,
        created_at: at(1),
    }
}

fn test_booking() -> Booking {
    Booking {
        id: "bkg-0f1e2d3c4b".to_string(),
        customer_id: "cus-42".to_string(),
        provider_id: "prv-a1b2c3d4e5".to_string(),
        service_id: "svc-9f8e7d6c5b".to_string(),
        slot_id: None,
        scheduled_at: at(9),
        estimated_end: at(10),
        actual_start: None,
        actual_end: None,
        status: BookingStatus::Confirmed,
        total_price_cents: 4550,
        duration_minutes: 60,
        notes: Some("Ring twice".to_string()),
        customer_address: None,
        customer_location: None,
        cancellation: None,
        created_at: at(1),
        updated_at: at(2),
    }
}

#[test]
fn test_json_formatter_slot_list() {
    let formatter = create_formatter("json", false);
    let output = formatter.format_slots(&[test_slot("slt-1", 9, 10), test_slot("slt-2", 10, 11)]);

    assert!(output.contains("\"status\": \"ok\""));
    assert!(output.contains("slt-1"));
    assert!(output.contains("slt-2"));
    assert!(output.contains("\"total\": 2"));
}

#[test]
fn test_json_formatter_error_envelope() {
    let formatter = create_formatter("json", false);
    let error = AppError::Core(Error::not_found("booking", "bkg-missing"));
    let output = formatter.format_error(&error);

    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["status"], "error");
    assert_eq!(value["code"], "not_found");
    assert_eq!(value["details"]["id"], "bkg-missing");
}

#[test]
fn test_json_formatter_bulk_counts() {
    let formatter = create_formatter("json", false);
    let outcome = BulkOutcome {
        created: vec![test_slot("slt-1", 9, 10)],
        skipped: vec![SkippedSlot {
            interval: Interval::new(at(10), at(11)).unwrap(),
            reason: SkipReason::Overlap,
            conflicts: vec![Conflict {
                id: "slt-0".to_string(),
                kind: ConflictKind::Slot,
                start: at(10),
                end: at(12),
                booked: false,
            }],
        }],
    };
    let value: serde_json::Value = serde_json::from_str(&formatter.format_bulk(&outcome)).unwrap();
    assert_eq!(value["result"]["created_count"], 1);
    assert_eq!(value["result"]["skipped_count"], 1);
    assert_eq!(value["result"]["skipped"][0]["reason"], "overlap");
}

#[test]
fn test_table_formatter_booking_detail() {
    let formatter = create_formatter("table", false);
    let output = formatter.format_booking(&test_booking());

    assert!(output.contains("bkg-0f1e2d3c4b"));
    assert!(output.contains("confirmed"));
    assert!(output.contains("45.50"));
    assert!(output.contains("Ring twice"));
}

#[test]
fn test_table_formatter_slot_table() {
    let formatter = create_formatter("table", false);
    let output = formatter.format_slots(&[test_slot("slt-1", 9, 11)]);

    assert!(output.contains("slt-1"));
    assert!(output.contains("2030-03-04 09:00"));
    assert!(output.contains("120"));
}

#[test]
fn test_table_formatter_error_without_color() {
    let formatter = create_formatter("table", false);
    let error = AppError::InvalidInput("bad date".to_string());
    assert_eq!(formatter.format_error(&error), "Error: Invalid input: bad date");
}

#[test]
fn test_table_formatter_colored_error_has_escape_codes() {
    let formatter = create_formatter("table", true);
    let error = AppError::InvalidInput("bad date".to_string());
    let output = formatter.format_error(&error);
    assert!(output.contains('\u{1b}'));
    assert!(output.contains("bad date"));
}

#[test]
fn test_plain_formatter_one_line_per_record() {
    let formatter = create_formatter("plain", false);
    let output = formatter.format_slots(&[test_slot("slt-1", 9, 10), test_slot("slt-2", 10, 11)]);
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "slt-1 2030-03-04T09:00 2030-03-04T10:00 open");
}

#[test]
fn test_distance_rendering() {
    let distance = Distance {
        km: 5.432,
        miles: 3.375,
    };
    assert_eq!(
        create_formatter("table", false).format_distance(&distance),
        "5.432 km (3.375 mi)"
    );
    assert!(create_formatter("json", false)
        .format_distance(&distance)
        .contains("\"km\": 5.432"));
}

#[test]
fn test_empty_provider_list() {
    let providers: Vec<Provider> = Vec::new();
    assert_eq!(
        create_formatter("table", false).format_providers(&providers),
        "No providers found."
    );
    assert_eq!(create_formatter("plain", false).format_providers(&providers), "");
}
