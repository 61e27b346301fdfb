// Rust guideline compliant 2026-10-12

//! Unit tests for the booking service.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use slotwise_core::catalog::{register_provider, register_service, set_provider_available, NewProvider, NewService};
use slotwise_core::{
    Actor, Booking, BookingRequest, BookingService, BookingStatus, Error, FileRepository, Interval,
    MemoryRepository, NewSlot, Provider, Repository, Result, Service, Slot, SlotStore,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Barrier;
use tempfile::TempDir;

fn now() -> NaiveDateTime {
    at(1, 8, 0)
}

fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2030, 3, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

struct World {
    provider_id: String,
    service_id: String,
}

fn world<R: Repository>(repo: &R, duration_minutes: Option<u32>) -> World {
    let provider = register_provider(
        repo,
        NewProvider {
            business_name: "Bright Cleaners".to_string(),
            location: None,
            service_radius_km: None,
        },
        now(),
    )
    .unwrap();
    let service = register_service(
        repo,
        &provider.id,
        NewService {
            name: "Deep clean".to_string(),
            category: "cleaning".to_string(),
            price_cents: 4500,
            duration_minutes,
            location: None,
        },
    )
    .unwrap();
    World {
        provider_id: provider.id,
        service_id: service.id,
    }
}

fn request(service_id: &str, start: NaiveDateTime) -> BookingRequest {
    BookingRequest {
        service_id: service_id.to_string(),
        scheduled_at: Some(start),
        ..BookingRequest::default()
    }
}

#[test]
fn test_create_snapshots_price_and_duration() {
    let repo = MemoryRepository::new();
    let w = world(&repo, Some(90));
    let bookings = BookingService::new(&repo, 60);

    let booking = bookings
        .create(&Actor::customer("cust-1"), request(&w.service_id, at(4, 10, 0)), now())
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.total_price_cents, 4500);
    assert_eq!(booking.duration_minutes, 90);
    assert_eq!(booking.estimated_end, at(4, 11, 30));
    assert_eq!(booking.provider_id, w.provider_id);
}

#[test]
fn test_create_uses_default_duration() {
    let repo = MemoryRepository::new();
    let w = world(&repo, None);
    let booking = BookingService::new(&repo, 45)
        .create(&Actor::customer("cust-1"), request(&w.service_id, at(4, 10, 0)), now())
        .unwrap();
    assert_eq!(booking.duration_minutes, 45);
    assert_eq!(booking.estimated_end, at(4, 10, 45));
}

#[test]
fn test_create_rejects_bad_requests() {
    let repo = MemoryRepository::new();
    let w = world(&repo, Some(60));
    let bookings = BookingService::new(&repo, 60);
    let customer = Actor::customer("cust-1");

    assert!(matches!(
        bookings.create(&Actor::provider(&w.provider_id), request(&w.service_id, at(4, 10, 0)), now()),
        Err(Error::Unauthorized { .. })
    ));
    assert!(matches!(
        bookings.create(&customer, request(&w.service_id, at(1, 7, 0)), now()),
        Err(Error::Validation(_))
    ));
    assert!(matches!(
        bookings.create(&customer, request("svc-missing", at(4, 10, 0)), now()),
        Err(Error::NotFound { entity: "Service", .. })
    ));

    set_provider_available(&repo, &w.provider_id, false).unwrap();
    assert!(matches!(
        bookings.create(&customer, request(&w.service_id, at(4, 10, 0)), now()),
        Err(Error::Validation(_))
    ));
}

#[test]
fn test_overlapping_booking_rejected_adjacent_accepted() {
    let repo = MemoryRepository::new();
    let w = world(&repo, Some(120));
    let bookings = BookingService::new(&repo, 60);

    let first = bookings
        .create(&Actor::customer("cust-1"), request(&w.service_id, at(4, 10, 0)), now())
        .unwrap();

    let err = bookings
        .create(&Actor::customer("cust-2"), request(&w.service_id, at(4, 11, 0)), now())
        .unwrap_err();
    match err {
        Error::SchedulingConflict(conflicts) => {
            assert_eq!(conflicts.len(), 1);
            assert_eq!(conflicts[0].id, first.id);
            assert!(conflicts[0].booked);
        }
        other => panic!("expected conflict, got {:?}", other),
    }
    assert_eq!(repo.bookings_for(&w.provider_id).unwrap().len(), 1);

    bookings
        .create(&Actor::customer("cust-2"), request(&w.service_id, at(4, 12, 0)), now())
        .unwrap();
}

#[test]
fn test_cancelled_booking_frees_interval_completed_does_not() {
    let repo = MemoryRepository::new();
    let w = world(&repo, Some(60));
    let bookings = BookingService::new(&repo, 60);
    let customer = Actor::customer("cust-1");
    let provider = Actor::provider(&w.provider_id);

    let first = bookings
        .create(&customer, request(&w.service_id, at(4, 10, 0)), now())
        .unwrap();
    bookings.cancel(&first.id, &customer, "sick", now()).unwrap();
    let second = bookings
        .create(&customer, request(&w.service_id, at(4, 10, 0)), now())
        .unwrap();

    bookings.confirm(&second.id, &provider, now()).unwrap();
    bookings.start(&second.id, &provider, at(4, 10, 0)).unwrap();
    let done = bookings.complete(&second.id, &provider, at(4, 11, 0)).unwrap();
    assert_eq!(done.actual_start, Some(at(4, 10, 0)));
    assert_eq!(done.actual_end, Some(at(4, 11, 0)));

    assert!(matches!(
        bookings.create(&customer, request(&w.service_id, at(4, 10, 30)), now()),
        Err(Error::SchedulingConflict(_))
    ));
}

#[test]
fn test_booking_holds_and_releases_slot() {
    let repo = MemoryRepository::new();
    let w = world(&repo, Some(60));
    let store = SlotStore::new(&repo);
    let slot = store
        .create_slot(
            &w.provider_id,
            NewSlot::once(Interval::new(at(4, 9, 0), at(4, 12, 0)).unwrap()),
            now(),
        )
        .unwrap();
    let bookings = BookingService::new(&repo, 60);
    let customer = Actor::customer("cust-1");

    let booking = bookings
        .create(
            &customer,
            BookingRequest {
                slot_id: Some(slot.id.clone()),
                ..request(&w.service_id, at(4, 10, 0))
            },
            now(),
        )
        .unwrap();
    assert!(repo.locate_slot(&slot.id).unwrap().is_booked);

    // A second booking cannot take the same slot, even at a free time.
    let err = bookings
        .create(
            &Actor::customer("cust-2"),
            BookingRequest {
                slot_id: Some(slot.id.clone()),
                ..request(&w.service_id, at(4, 11, 0))
            },
            now(),
        )
        .unwrap_err();
    assert!(matches!(err, Error::AlreadyBooked(_)));

    bookings.cancel(&booking.id, &customer, "no longer needed", now()).unwrap();
    assert!(!repo.locate_slot(&slot.id).unwrap().is_booked);
}

#[test]
fn test_slot_must_cover_booking() {
    let repo = MemoryRepository::new();
    let w = world(&repo, Some(60));
    let slot = SlotStore::new(&repo)
        .create_slot(
            &w.provider_id,
            NewSlot::once(Interval::new(at(4, 9, 0), at(4, 10, 0)).unwrap()),
            now(),
        )
        .unwrap();
    let err = BookingService::new(&repo, 60)
        .create(
            &Actor::customer("cust-1"),
            BookingRequest {
                slot_id: Some(slot.id.clone()),
                ..request(&w.service_id, at(4, 9, 30))
            },
            now(),
        )
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(repo.bookings_for(&w.provider_id).unwrap().is_empty());
    assert!(!repo.locate_slot(&slot.id).unwrap().is_booked);
}

#[test]
fn test_reschedule() {
    let repo = MemoryRepository::new();
    let w = world(&repo, Some(60));
    let bookings = BookingService::new(&repo, 60);
    let customer = Actor::customer("cust-1");

    let a = bookings
        .create(&customer, request(&w.service_id, at(4, 10, 0)), now())
        .unwrap();
    let b = bookings
        .create(&Actor::customer("cust-2"), request(&w.service_id, at(4, 12, 0)), now())
        .unwrap();

    assert!(matches!(
        bookings.reschedule(&a.id, &customer, at(4, 12, 30), now()),
        Err(Error::SchedulingConflict(_))
    ));
    assert!(matches!(
        bookings.reschedule(&a.id, &Actor::provider(&w.provider_id), at(4, 15, 0), now()),
        Err(Error::Unauthorized { .. })
    ));

    // Moving within its own old interval does not conflict with itself.
    let moved = bookings.reschedule(&a.id, &customer, at(4, 10, 30), now()).unwrap();
    assert_eq!(moved.scheduled_at, at(4, 10, 30));
    assert_eq!(moved.estimated_end, at(4, 11, 30));
    assert_eq!(
        bookings.get(&a.id, &customer).unwrap().scheduled_at,
        at(4, 10, 30)
    );

    bookings.cancel(&b.id, &Actor::customer("cust-2"), "moved away", now()).unwrap();
    assert!(matches!(
        bookings.reschedule(&b.id, &Actor::customer("cust-2"), at(5, 9, 0), now()),
        Err(Error::Validation(_))
    ));
}

#[test]
fn test_queries_and_stats() {
    let repo = MemoryRepository::new();
    let w = world(&repo, Some(60));
    let bookings = BookingService::new(&repo, 60);
    let customer = Actor::customer("cust-1");
    let provider = Actor::provider(&w.provider_id);

    let early = bookings
        .create(&customer, request(&w.service_id, at(4, 9, 0)), now())
        .unwrap();
    let late = bookings
        .create(&customer, request(&w.service_id, at(6, 9, 0)), now())
        .unwrap();
    let other = bookings
        .create(&Actor::customer("cust-2"), request(&w.service_id, at(5, 9, 0)), now())
        .unwrap();

    let mine: Vec<String> = bookings
        .for_customer("cust-1", None)
        .unwrap()
        .into_iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(mine, vec![late.id.clone(), early.id.clone()]);

    assert!(matches!(
        bookings.get(&other.id, &customer),
        Err(Error::Unauthorized { .. })
    ));

    bookings.confirm(&early.id, &provider, now()).unwrap();
    bookings.start(&early.id, &provider, at(4, 9, 0)).unwrap();
    bookings.complete(&early.id, &provider, at(4, 10, 0)).unwrap();
    bookings.cancel(&other.id, &provider, "double booked elsewhere", now()).unwrap();

    let upcoming: Vec<String> = bookings
        .upcoming(&provider, at(4, 12, 0))
        .unwrap()
        .into_iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(upcoming, vec![late.id.clone()]);

    let confirmed = bookings
        .for_provider(&w.provider_id, Some(BookingStatus::Completed))
        .unwrap();
    assert_eq!(confirmed.len(), 1);

    let stats = bookings.provider_stats(&w.provider_id).unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.active, 1);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.cancelled, 1);

    let ratable = bookings.ratable("cust-1", &HashSet::new()).unwrap();
    assert_eq!(ratable.len(), 1);
    let rated: HashSet<String> = [early.id.clone()].into_iter().collect();
    assert!(bookings.ratable("cust-1", &rated).unwrap().is_empty());
}

fn race<R: Repository>(repo: &R, service_id: &str) -> usize {
    let threads = 8;
    let barrier = Barrier::new(threads);
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..threads)
            .map(|i| {
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    let start = at(4, 10, 0) + Duration::minutes(i as i64 * 7);
                    BookingService::new(repo, 60)
                        .create(
                            &Actor::customer(format!("cust-{}", i)),
                            request(service_id, start),
                            now(),
                        )
                        .is_ok()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count()
    })
}

#[test]
fn test_no_double_booking_in_memory() {
    let repo = MemoryRepository::new();
    let w = world(&repo, Some(60));
    assert_eq!(race(&repo, &w.service_id), 1);
    assert_eq!(repo.bookings_for(&w.provider_id).unwrap().len(), 1);
}

#[test]
fn test_no_double_booking_on_disk() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let repo = FileRepository::open(temp_dir.path()).unwrap();
    let w = world(&repo, Some(60));
    assert_eq!(race(&repo, &w.service_id), 1);
    assert_eq!(repo.bookings_for(&w.provider_id).unwrap().len(), 1);
}

/// Memory repository whose slot or booking writes can be made to fail.
#[derive(Default)]
struct FlakyRepository {
    inner: MemoryRepository,
    fail_slot_writes: AtomicBool,
    fail_booking_writes: AtomicBool,
}

fn disk_full() -> Error {
    Error::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
}

impl Repository for FlakyRepository {
    fn provider(&self, id: &str) -> Result<Provider> {
        self.inner.provider(id)
    }

    fn providers(&self) -> Result<Vec<Provider>> {
        self.inner.providers()
    }

    fn save_provider(&self, provider: &Provider) -> Result<()> {
        self.inner.save_provider(provider)
    }

    fn update_provider<F>(&self, id: &str, f: F) -> Result<Provider>
    where
        F: FnOnce(&mut Provider),
    {
        self.inner.update_provider(id, f)
    }

    fn services(&self) -> Result<Vec<Service>> {
        self.inner.services()
    }

    fn save_service(&self, service: &Service) -> Result<()> {
        self.inner.save_service(service)
    }

    fn slots_for(&self, provider_id: &str) -> Result<Vec<Slot>> {
        self.inner.slots_for(provider_id)
    }

    fn replace_slots(&self, provider_id: &str, slots: &[Slot]) -> Result<()> {
        if self.fail_slot_writes.load(Ordering::SeqCst) {
            return Err(disk_full());
        }
        self.inner.replace_slots(provider_id, slots)
    }

    fn bookings_for(&self, provider_id: &str) -> Result<Vec<Booking>> {
        self.inner.bookings_for(provider_id)
    }

    fn replace_bookings(&self, provider_id: &str, bookings: &[Booking]) -> Result<()> {
        if self.fail_booking_writes.load(Ordering::SeqCst) {
            return Err(disk_full());
        }
        self.inner.replace_bookings(provider_id, bookings)
    }

    fn with_provider_lock<T, F>(&self, provider_id: &str, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        self.inner.with_provider_lock(provider_id, f)
    }
}

fn flaky_with_slot() -> (FlakyRepository, World, Slot) {
    let repo = FlakyRepository::default();
    let w = world(&repo, Some(60));
    let slot = SlotStore::new(&repo)
        .create_slot(
            &w.provider_id,
            NewSlot::once(Interval::new(at(4, 9, 0), at(4, 12, 0)).unwrap()),
            now(),
        )
        .unwrap();
    (repo, w, slot)
}

fn slot_request(w: &World, slot: &Slot) -> BookingRequest {
    BookingRequest {
        slot_id: Some(slot.id.clone()),
        ..request(&w.service_id, at(4, 10, 0))
    }
}

#[test]
fn test_failed_booking_write_leaves_slot_free() {
    let (repo, w, slot) = flaky_with_slot();
    repo.fail_booking_writes.store(true, Ordering::SeqCst);

    let err = BookingService::new(&repo, 60)
        .create(&Actor::customer("cust-1"), slot_request(&w, &slot), now())
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(!repo.locate_slot(&slot.id).unwrap().is_booked);
    assert!(repo.bookings_for(&w.provider_id).unwrap().is_empty());
}

#[test]
fn test_failed_slot_write_rolls_back_new_booking() {
    let (repo, w, slot) = flaky_with_slot();
    repo.fail_slot_writes.store(true, Ordering::SeqCst);

    let err = BookingService::new(&repo, 60)
        .create(&Actor::customer("cust-1"), slot_request(&w, &slot), now())
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(!repo.locate_slot(&slot.id).unwrap().is_booked);
    assert!(repo.bookings_for(&w.provider_id).unwrap().is_empty());

    // The same request succeeds once writes work again.
    repo.fail_slot_writes.store(false, Ordering::SeqCst);
    BookingService::new(&repo, 60)
        .create(&Actor::customer("cust-1"), slot_request(&w, &slot), now())
        .unwrap();
    assert!(repo.locate_slot(&slot.id).unwrap().is_booked);
}

#[test]
fn test_failed_slot_release_keeps_booking_active() {
    let (repo, w, slot) = flaky_with_slot();
    let bookings = BookingService::new(&repo, 60);
    let customer = Actor::customer("cust-1");
    let booking = bookings.create(&customer, slot_request(&w, &slot), now()).unwrap();

    repo.fail_slot_writes.store(true, Ordering::SeqCst);
    let err = bookings
        .cancel(&booking.id, &customer, "plans changed", now())
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert_eq!(
        repo.locate_booking(&booking.id).unwrap().status,
        BookingStatus::Pending
    );
    assert!(repo.locate_slot(&slot.id).unwrap().is_booked);

    let err = bookings
        .reschedule(&booking.id, &customer, at(5, 10, 0), now())
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    let stored = repo.locate_booking(&booking.id).unwrap();
    assert_eq!(stored.scheduled_at, at(4, 10, 0));
    assert_eq!(stored.slot_id, Some(slot.id.clone()));
}
