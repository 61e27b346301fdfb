// Rust guideline compliant 2026-10-12

//! Repository abstraction over providers, services, slots and bookings.
//!
//! Slots and bookings are owned by their provider aggregate: they are read
//! and replaced per provider, and every check-then-write sequence runs inside
//! [`Repository::with_provider_lock`]. Two implementations are provided:
//! [`MemoryRepository`] for tests and embedding, and [`FileRepository`]
//! which persists JSONL files under a directory.

use crate::identity::validate_id_format;
use crate::models::{Booking, Provider, Service, Slot};
use crate::storage::{with_file_lock, Storage};
use crate::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

/// Persistence boundary for the scheduling core.
pub trait Repository: Send + Sync {
    /// Loads a provider by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the provider does not exist.
    fn provider(&self, id: &str) -> Result<Provider>;

    /// Loads every provider, in registration order.
    fn providers(&self) -> Result<Vec<Provider>>;

    /// Inserts or replaces a provider.
    fn save_provider(&self, provider: &Provider) -> Result<()>;

    /// Applies `f` to a stored provider and saves the result.
    ///
    /// The read and the write happen under the catalog lock, so concurrent
    /// catalog writes are not lost.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the provider does not exist, or a validation
    /// error if the updated record is invalid.
    fn update_provider<F>(&self, id: &str, f: F) -> Result<Provider>
    where
        F: FnOnce(&mut Provider);

    /// Loads every service.
    fn services(&self) -> Result<Vec<Service>>;

    /// Inserts or replaces a service.
    fn save_service(&self, service: &Service) -> Result<()>;

    /// Loads all slots of a provider.
    fn slots_for(&self, provider_id: &str) -> Result<Vec<Slot>>;

    /// Replaces the whole slot collection of a provider.
    fn replace_slots(&self, provider_id: &str, slots: &[Slot]) -> Result<()>;

    /// Loads all bookings of a provider.
    fn bookings_for(&self, provider_id: &str) -> Result<Vec<Booking>>;

    /// Replaces the whole booking collection of a provider.
    fn replace_bookings(&self, provider_id: &str, bookings: &[Booking]) -> Result<()>;

    /// Runs `f` while holding the provider's exclusive lock.
    ///
    /// This is the single serialization point for interval mutations: at
    /// most one closure runs per provider at a time. The lock is not
    /// reentrant.
    fn with_provider_lock<T, F>(&self, provider_id: &str, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>;

    /// Loads a service by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the service does not exist.
    fn service(&self, id: &str) -> Result<Service> {
        self.services()?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::not_found("Service", id))
    }

    /// Loads the services of one provider.
    fn services_for(&self, provider_id: &str) -> Result<Vec<Service>> {
        Ok(self
            .services()?
            .into_iter()
            .filter(|s| s.provider_id == provider_id)
            .collect())
    }

    /// Finds a slot by id across all providers.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no provider owns the slot.
    fn locate_slot(&self, slot_id: &str) -> Result<Slot> {
        for provider in self.providers()? {
            if let Some(slot) = self
                .slots_for(&provider.id)?
                .into_iter()
                .find(|s| s.id == slot_id)
            {
                return Ok(slot);
            }
        }
        Err(Error::not_found("Slot", slot_id))
    }

    /// Finds a booking by id across all providers.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no provider holds the booking.
    fn locate_booking(&self, booking_id: &str) -> Result<Booking> {
        for provider in self.providers()? {
            if let Some(booking) = self
                .bookings_for(&provider.id)?
                .into_iter()
                .find(|b| b.id == booking_id)
            {
                return Ok(booking);
            }
        }
        Err(Error::not_found("Booking", booking_id))
    }

    /// Loads every booking of every provider.
    fn all_bookings(&self) -> Result<Vec<Booking>> {
        let mut bookings = Vec::new();
        for provider in self.providers()? {
            bookings.extend(self.bookings_for(&provider.id)?);
        }
        Ok(bookings)
    }
}

fn poisoned<E>(_: E) -> Error {
    Error::Unavailable("repository lock poisoned".to_string())
}

/// In-memory repository guarded by `RwLock`s.
///
/// Provider locks are plain mutexes, one per provider, created on first use.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    providers: RwLock<Vec<Provider>>,
    services: RwLock<Vec<Service>>,
    slots: RwLock<HashMap<String, Vec<Slot>>>,
    bookings: RwLock<HashMap<String, Vec<Booking>>>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl MemoryRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, provider_id: &str) -> Result<Arc<Mutex<()>>> {
        let mut locks = self.locks.lock().map_err(poisoned)?;
        Ok(Arc::clone(
            locks
                .entry(provider_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        ))
    }
}

impl Repository for MemoryRepository {
    fn provider(&self, id: &str) -> Result<Provider> {
        self.providers
            .read()
            .map_err(poisoned)?
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found("Provider", id))
    }

    fn providers(&self) -> Result<Vec<Provider>> {
        Ok(self.providers.read().map_err(poisoned)?.clone())
    }

    fn save_provider(&self, provider: &Provider) -> Result<()> {
        provider.validate()?;
        let mut providers = self.providers.write().map_err(poisoned)?;
        match providers.iter_mut().find(|p| p.id == provider.id) {
            Some(existing) => *existing = provider.clone(),
            None => providers.push(provider.clone()),
        }
        Ok(())
    }

    fn update_provider<F>(&self, id: &str, f: F) -> Result<Provider>
    where
        F: FnOnce(&mut Provider),
    {
        let mut providers = self.providers.write().map_err(poisoned)?;
        let existing = providers
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::not_found("Provider", id))?;
        let mut updated = existing.clone();
        f(&mut updated);
        updated.validate()?;
        *existing = updated.clone();
        Ok(updated)
    }

    fn services(&self) -> Result<Vec<Service>> {
        Ok(self.services.read().map_err(poisoned)?.clone())
    }

    fn save_service(&self, service: &Service) -> Result<()> {
        service.validate()?;
        let mut services = self.services.write().map_err(poisoned)?;
        match services.iter_mut().find(|s| s.id == service.id) {
            Some(existing) => *existing = service.clone(),
            None => services.push(service.clone()),
        }
        Ok(())
    }

    fn slots_for(&self, provider_id: &str) -> Result<Vec<Slot>> {
        Ok(self
            .slots
            .read()
            .map_err(poisoned)?
            .get(provider_id)
            .cloned()
            .unwrap_or_default())
    }

    fn replace_slots(&self, provider_id: &str, slots: &[Slot]) -> Result<()> {
        for slot in slots {
            slot.validate()?;
        }
        self.slots
            .write()
            .map_err(poisoned)?
            .insert(provider_id.to_string(), slots.to_vec());
        Ok(())
    }

    fn bookings_for(&self, provider_id: &str) -> Result<Vec<Booking>> {
        Ok(self
            .bookings
            .read()
            .map_err(poisoned)?
            .get(provider_id)
            .cloned()
            .unwrap_or_default())
    }

    fn replace_bookings(&self, provider_id: &str, bookings: &[Booking]) -> Result<()> {
        for booking in bookings {
            booking.validate()?;
        }
        self.bookings
            .write()
            .map_err(poisoned)?
            .insert(provider_id.to_string(), bookings.to_vec());
        Ok(())
    }

    fn with_provider_lock<T, F>(&self, provider_id: &str, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock = self.lock_for(provider_id)?;
        let _guard = lock.lock().map_err(poisoned)?;
        f()
    }
}

/// File-backed repository.
///
/// Layout under the root directory:
///
/// ```text
/// providers.jsonl
/// services.jsonl
/// slots/<provider>.jsonl
/// bookings/<provider>.jsonl
/// locks/<provider>.lock
/// locks/catalog.lock
/// ```
#[derive(Debug, Clone)]
pub struct FileRepository {
    root: PathBuf,
    providers: Storage,
    services: Storage,
}

impl FileRepository {
    /// Opens a repository rooted at `root`, creating the directory tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        for dir in ["slots", "bookings", "locks"] {
            std::fs::create_dir_all(root.join(dir))?;
        }
        Ok(Self {
            providers: Storage::new(root.join("providers.jsonl"))?,
            services: Storage::new(root.join("services.jsonl"))?,
            root,
        })
    }

    /// Returns the repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn provider_file(&self, dir: &str, provider_id: &str) -> Result<Storage> {
        validate_id_format(provider_id)?;
        Storage::new(self.root.join(dir).join(format!("{}.jsonl", provider_id)))
    }

    fn catalog_lock(&self) -> PathBuf {
        self.root.join("locks").join("catalog.lock")
    }
}

impl Repository for FileRepository {
    fn provider(&self, id: &str) -> Result<Provider> {
        self.providers.load_by_id("Provider", id)
    }

    fn providers(&self) -> Result<Vec<Provider>> {
        self.providers.load_all()
    }

    fn save_provider(&self, provider: &Provider) -> Result<()> {
        with_file_lock(&self.catalog_lock(), || self.providers.upsert(provider))
    }

    fn update_provider<F>(&self, id: &str, f: F) -> Result<Provider>
    where
        F: FnOnce(&mut Provider),
    {
        with_file_lock(&self.catalog_lock(), || {
            let mut provider: Provider = self.providers.load_by_id("Provider", id)?;
            f(&mut provider);
            self.providers.upsert(&provider)?;
            Ok(provider)
        })
    }

    fn services(&self) -> Result<Vec<Service>> {
        self.services.load_all()
    }

    fn save_service(&self, service: &Service) -> Result<()> {
        with_file_lock(&self.catalog_lock(), || self.services.upsert(service))
    }

    fn slots_for(&self, provider_id: &str) -> Result<Vec<Slot>> {
        self.provider_file("slots", provider_id)?.load_all()
    }

    fn replace_slots(&self, provider_id: &str, slots: &[Slot]) -> Result<()> {
        self.provider_file("slots", provider_id)?.save_all(slots)
    }

    fn bookings_for(&self, provider_id: &str) -> Result<Vec<Booking>> {
        self.provider_file("bookings", provider_id)?.load_all()
    }

    fn replace_bookings(&self, provider_id: &str, bookings: &[Booking]) -> Result<()> {
        self.provider_file("bookings", provider_id)?
            .save_all(bookings)
    }

    fn with_provider_lock<T, F>(&self, provider_id: &str, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        validate_id_format(provider_id)?;
        let lock_path = self
            .root
            .join("locks")
            .join(format!("{}.lock", provider_id));
        with_file_lock(&lock_path, f)
    }
}
