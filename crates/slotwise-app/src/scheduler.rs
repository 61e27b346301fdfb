// Rust guideline compliant 2026-10-12

//! Actor-checked scheduling operations shared by the CLI and the MCP server.
//!
//! `Scheduler` owns a repository and the loaded configuration and hands out
//! the core components with configured defaults. Provider-side mutations
//! require the acting identity to be the owning provider.

use crate::error::{AppError, Result};
use crate::list::{list_bookings, BookingListOptions};
use chrono::{NaiveDateTime, Weekday};
use slotwise_core::catalog::set_provider_available;
use slotwise_core::{
    register_provider, register_service, Actor, AvailabilitySearch, Booking, BookingRequest,
    BookingService, BulkOutcome, BulkRequest, Config, GeoPoint, NewProvider, NewService, NewSlot,
    Provider, ProviderDistance, ProviderStats, Repository, Role, SearchCriteria, Service, Slot,
    SlotMatch, SlotStore, StatusChange, TimeRange,
};
use std::collections::HashSet;

/// Slot listing filters.
#[derive(Debug, Clone, Default)]
pub struct SlotQuery {
    /// Date range; open ends are unbounded.
    pub range: TimeRange,
    /// Hide booked slots.
    pub unbooked_only: bool,
    /// Only booked slots.
    pub booked_only: bool,
    /// Minimum slot length; implies unbooked only.
    pub min_duration_minutes: Option<i64>,
}

/// Application facade over a repository and its configuration.
pub struct Scheduler<R: Repository> {
    repo: R,
    config: Config,
}

impl<R: Repository> Scheduler<R> {
    /// Creates a scheduler.
    pub fn new(repo: R, config: Config) -> Self {
        Self { repo, config }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn slot_store(&self) -> SlotStore<'_, R> {
        SlotStore::new(&self.repo)
    }

    fn booking_service(&self) -> BookingService<'_, R> {
        BookingService::new(&self.repo, self.config.default_booking_duration_minutes)
    }

    fn search_engine(&self) -> AvailabilitySearch<'_, R> {
        AvailabilitySearch::new(
            &self.repo,
            self.config.default_search_radius_km,
            self.config.default_search_limit,
        )
    }

    // Catalog

    /// Registers a provider.
    pub fn add_provider(&self, input: NewProvider, now: NaiveDateTime) -> Result<Provider> {
        Ok(register_provider(&self.repo, input, now)?)
    }

    /// Registers a service under the acting provider.
    pub fn add_service(&self, actor: &Actor, input: NewService) -> Result<Service> {
        let provider_id = acting_provider(actor)?;
        Ok(register_service(&self.repo, provider_id, input)?)
    }

    /// Opens or closes the acting provider for new bookings.
    pub fn set_available(&self, actor: &Actor, available: bool) -> Result<Provider> {
        let provider_id = acting_provider(actor)?;
        Ok(set_provider_available(&self.repo, provider_id, available)?)
    }

    /// Lists every provider.
    pub fn providers(&self) -> Result<Vec<Provider>> {
        Ok(self.repo.providers()?)
    }

    /// Reads one provider.
    pub fn provider(&self, provider_id: &str) -> Result<Provider> {
        Ok(self.repo.provider(provider_id)?)
    }

    /// Lists services, optionally of one provider.
    pub fn services(&self, provider_id: Option<&str>) -> Result<Vec<Service>> {
        Ok(match provider_id {
            Some(id) => self.repo.services_for(id)?,
            None => self.repo.services()?,
        })
    }

    /// Booking counts for the acting provider.
    pub fn provider_stats(&self, actor: &Actor) -> Result<ProviderStats> {
        let provider_id = acting_provider(actor)?;
        Ok(self.booking_service().provider_stats(provider_id)?)
    }

    // Slots

    /// Creates one slot for the acting provider.
    pub fn create_slot(&self, actor: &Actor, new_slot: NewSlot, now: NaiveDateTime) -> Result<Slot> {
        let provider_id = acting_provider(actor)?;
        Ok(self.slot_store().create_slot(provider_id, new_slot, now)?)
    }

    /// Generates slots in bulk for the acting provider, bounded by
    /// `max_bulk_days`.
    pub fn create_bulk(&self, actor: &Actor, request: &BulkRequest, now: NaiveDateTime) -> Result<BulkOutcome> {
        let provider_id = acting_provider(actor)?;
        Ok(self
            .slot_store()
            .create_bulk(provider_id, request, self.config.max_bulk_days, now)?)
    }

    /// Deletes an unbooked slot owned by the acting provider.
    pub fn delete_slot(&self, actor: &Actor, slot_id: &str) -> Result<()> {
        let provider_id = acting_provider(actor)?;
        Ok(self.slot_store().delete(slot_id, provider_id)?)
    }

    /// Marks a slot of the acting provider booked.
    pub fn book_slot(&self, actor: &Actor, slot_id: &str) -> Result<Slot> {
        self.require_slot_owner(actor, slot_id)?;
        Ok(self.slot_store().mark_booked(slot_id)?)
    }

    /// Marks a slot of the acting provider available again.
    pub fn release_slot(&self, actor: &Actor, slot_id: &str) -> Result<Slot> {
        self.require_slot_owner(actor, slot_id)?;
        Ok(self.slot_store().mark_available(slot_id)?)
    }

    fn require_slot_owner(&self, actor: &Actor, slot_id: &str) -> Result<()> {
        let slot = self.repo.locate_slot(slot_id)?;
        actor.require_provider(&slot.provider_id)?;
        Ok(())
    }

    /// Lists a provider's slots.
    pub fn list_slots(&self, provider_id: &str, query: &SlotQuery) -> Result<Vec<Slot>> {
        self.repo.provider(provider_id)?;
        let store = self.slot_store();
        let slots = match query.min_duration_minutes {
            Some(min) => store.list_with_min_duration(provider_id, &query.range, min)?,
            None if query.booked_only => store
                .list_booked(provider_id)?
                .into_iter()
                .filter(|s| query.range.admits(&s.interval()))
                .collect(),
            None if query.unbooked_only => store.list_unbooked(provider_id, &query.range)?,
            None => store.list(provider_id, &query.range)?,
        };
        Ok(slots)
    }

    /// Unbooked slots starting within the configured upcoming window.
    pub fn upcoming_slots(&self, provider_id: &str, now: NaiveDateTime) -> Result<Vec<Slot>> {
        self.repo.provider(provider_id)?;
        Ok(self
            .slot_store()
            .upcoming(provider_id, now, self.config.upcoming_window_days)?)
    }

    /// Recurring slots that repeat on a weekday.
    pub fn recurring_slots(&self, provider_id: &str, weekday: Weekday) -> Result<Vec<Slot>> {
        Ok(self.slot_store().list_recurring(provider_id, weekday)?)
    }

    /// Returns true if the provider has an unbooked slot inside the range.
    pub fn has_availability(&self, provider_id: &str, range: &TimeRange) -> Result<bool> {
        Ok(self.slot_store().has_availability(provider_id, range)?)
    }

    // Search

    /// Finds bookable slots.
    pub fn search(&self, criteria: &SearchCriteria) -> Result<Vec<SlotMatch>> {
        Ok(self.search_engine().search(criteria)?)
    }

    /// Available providers near a point. Uses the configured radius when
    /// none is given.
    pub fn nearby_providers(&self, center: &GeoPoint, radius_km: Option<f64>) -> Result<Vec<ProviderDistance>> {
        let radius = radius_km.unwrap_or(self.config.default_search_radius_km);
        Ok(self.search_engine().nearby_providers(center, radius)?)
    }

    /// Available providers whose service radius covers a point.
    pub fn providers_serving(&self, point: &GeoPoint) -> Result<Vec<ProviderDistance>> {
        Ok(self.search_engine().providers_serving(point)?)
    }

    // Bookings

    /// Creates a pending booking for the acting customer.
    pub fn create_booking(&self, actor: &Actor, request: BookingRequest, now: NaiveDateTime) -> Result<Booking> {
        Ok(self.booking_service().create(actor, request, now)?)
    }

    /// Reads a booking the actor takes part in.
    pub fn show_booking(&self, booking_id: &str, actor: &Actor) -> Result<Booking> {
        Ok(self.booking_service().get(booking_id, actor)?)
    }

    /// Applies a status change.
    pub fn update_status(
        &self,
        booking_id: &str,
        actor: &Actor,
        change: StatusChange,
        now: NaiveDateTime,
    ) -> Result<Booking> {
        Ok(self.booking_service().transition(booking_id, actor, change, now)?)
    }

    /// Moves a booking to a new start.
    pub fn reschedule(
        &self,
        booking_id: &str,
        actor: &Actor,
        new_start: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Result<Booking> {
        Ok(self.booking_service().reschedule(booking_id, actor, new_start, now)?)
    }

    /// Lists the actor's bookings with filters applied.
    pub fn list_bookings(&self, actor: &Actor, options: &BookingListOptions) -> Result<Vec<Booking>> {
        let service = self.booking_service();
        let bookings = match actor.role {
            Role::Customer => service.for_customer(&actor.id, None)?,
            Role::Provider => service.for_provider(&actor.id, None)?,
        };
        Ok(list_bookings(bookings, options))
    }

    /// Open bookings of the actor scheduled after `now`, soonest first.
    pub fn upcoming_bookings(&self, actor: &Actor, now: NaiveDateTime) -> Result<Vec<Booking>> {
        Ok(self.booking_service().upcoming(actor, now)?)
    }

    /// Completed bookings of the acting customer not in `rated`.
    pub fn ratable(&self, actor: &Actor, rated: &HashSet<String>) -> Result<Vec<Booking>> {
        actor.require_customer()?;
        Ok(self.booking_service().ratable(&actor.id, rated)?)
    }
}

fn acting_provider(actor: &Actor) -> Result<&str> {
    if actor.role != Role::Provider {
        return Err(AppError::Core(slotwise_core::Error::Unauthorized {
            actor: actor.to_string(),
            resource: "provider operations".to_string(),
        }));
    }
    Ok(actor.id.as_str())
}
