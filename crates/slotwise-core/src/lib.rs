// Rust guideline compliant 2026-10-12

//! Slotwise Core Library
//!
//! This crate provides the scheduling core of the Slotwise marketplace:
//! - Data models (Provider, Service, Slot, Booking)
//! - Geographic distance and radius checks
//! - Half-open interval conflict detection
//! - Slot store with bulk generation
//! - Booking state machine and booking service
//! - Availability search
//! - JSONL storage, repositories and configuration

pub mod booking;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fsm;
pub mod geo;
pub mod identity;
pub mod interval;
pub mod models;
pub mod rating;
pub mod repository;
pub mod search;
pub mod slots;
pub mod storage;

pub use booking::{BookingRequest, BookingService, ProviderStats};
pub use catalog::{register_provider, register_service, NewProvider, NewService};
pub use config::{Config, OutputFormat};
pub use error::{Error, Result};
pub use fsm::{apply_transition, StatusChange};
pub use geo::{Distance, GeoPoint};
pub use interval::{Conflict, ConflictKind, Interval, TimeRange};
pub use models::{Actor, Booking, BookingStatus, Cancellation, Provider, Recurrence, Role, Service, Slot};
pub use repository::{FileRepository, MemoryRepository, Repository};
pub use search::{AvailabilitySearch, ProviderDistance, SearchCriteria, SlotMatch};
pub use slots::{BulkOutcome, BulkRequest, NewSlot, SkipReason, SkippedSlot, SlotStore, TimeTemplate};
pub use storage::Storage;
