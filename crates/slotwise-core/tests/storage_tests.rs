// Rust guideline compliant 2026-10-12

//! Unit tests for the storage module.
//!
//! These tests validate specific examples, edge cases, and error conditions.

use chrono::{NaiveDate, NaiveDateTime};
use slotwise_core::storage::with_file_lock;
use slotwise_core::{Error, Provider, Slot, Storage};
use std::fs;
use tempfile::TempDir;

fn created() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2030, 3, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

fn create_test_slot(id: &str, hour: u32) -> Slot {
    let day = NaiveDate::from_ymd_opt(2030, 3, 4).unwrap();
    Slot {
        id: id.to_string(),
        provider_id: "prv-abc123".to_string(),
        start: day.and_hms_opt(hour, 0, 0).unwrap(),
        end: day.and_hms_opt(hour + 1, 0, 0).unwrap(),
        recurrence: None,
        is_booked: false,
        notes: None,
        created_at: created(),
    }
}

#[test]
fn test_empty_file_handling() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let storage = Storage::new(temp_dir.path().join("slots.jsonl")).expect("Failed to create storage");

    let slots: Vec<Slot> = storage.load_all().expect("Failed to load slots");
    assert!(slots.is_empty(), "Missing file should be an empty collection");
}

#[test]
fn test_empty_path_rejected() {
    assert!(Storage::new(Default::default()).is_err());
}

#[test]
fn test_save_and_load_preserves_order() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let storage = Storage::new(temp_dir.path().join("slots.jsonl")).unwrap();
    let slots = vec![create_test_slot("slt-b", 12), create_test_slot("slt-a", 9)];

    storage.save_all(&slots).unwrap();
    let loaded: Vec<Slot> = storage.load_all().unwrap();
    assert_eq!(loaded, slots);

    let content = fs::read_to_string(storage.path()).unwrap();
    assert_eq!(content.lines().count(), 2);
    assert!(!temp_dir.path().join("slots.jsonl.tmp").exists());
}

#[test]
fn test_upsert_replaces_by_id() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let storage = Storage::new(temp_dir.path().join("slots.jsonl")).unwrap();

    storage.upsert(&create_test_slot("slt-a", 9)).unwrap();
    let mut updated = create_test_slot("slt-a", 9);
    updated.is_booked = true;
    storage.upsert(&updated).unwrap();
    storage.upsert(&create_test_slot("slt-b", 11)).unwrap();

    let loaded: Vec<Slot> = storage.load_all().unwrap();
    assert_eq!(loaded.len(), 2);
    assert!(loaded[0].is_booked);

    let found: Slot = storage.load_by_id("Slot", "slt-b").unwrap();
    assert_eq!(found.start.format("%H").to_string(), "11");
    assert!(matches!(
        storage.load_by_id::<Slot>("Slot", "slt-zzz"),
        Err(Error::NotFound { entity: "Slot", .. })
    ));
}

#[test]
fn test_malformed_lines_skipped() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("slots.jsonl");
    let good = serde_json::to_string(&create_test_slot("slt-a", 9)).unwrap();
    fs::write(&path, format!("{}\n{{\"id\": 42}}\n", good)).unwrap();

    let loaded: Vec<Slot> = Storage::new(path).unwrap().load_all().unwrap();
    assert_eq!(loaded.len(), 1);
}

#[test]
fn test_malformed_line_between_records_skips_only_itself() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("slots.jsonl");
    let first = serde_json::to_string(&create_test_slot("slt-a", 9)).unwrap();
    let second = serde_json::to_string(&create_test_slot("slt-b", 11)).unwrap();
    fs::write(&path, format!("{}\n{{\"id\": 42}}\n\n{}\n", first, second)).unwrap();

    let loaded: Vec<Slot> = Storage::new(path).unwrap().load_all().unwrap();
    let ids: Vec<&str> = loaded.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["slt-a", "slt-b"]);
}

#[test]
fn test_invalid_records_not_written() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let storage = Storage::new(temp_dir.path().join("slots.jsonl")).unwrap();
    let mut bad = create_test_slot("slt-a", 9);
    bad.end = bad.start;

    assert!(matches!(storage.save_all(&[bad]), Err(Error::Validation(_))));
    assert!(!storage.path().exists());
}

#[test]
fn test_path_like_ids_rejected() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let storage = Storage::new(temp_dir.path().join("providers.jsonl")).unwrap();
    let mut provider = Provider::new("Valid".to_string(), None, created());
    provider.id = "prv-../../x".to_string();
    assert!(storage.upsert(&provider).is_err());
}

#[test]
fn test_file_lock_runs_closure_and_propagates_errors() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let lock_path = temp_dir.path().join("locks").join("p.lock");

    let value = with_file_lock(&lock_path, || Ok(7)).unwrap();
    assert_eq!(value, 7);
    assert!(lock_path.exists());

    let err = with_file_lock::<_, ()>(&lock_path, || Err(Error::Validation("boom".to_string())))
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    // The lock was released after the failing closure.
    assert_eq!(with_file_lock(&lock_path, || Ok("again")).unwrap(), "again");
}
