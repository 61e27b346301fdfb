// Rust guideline compliant 2026-10-12

//! Core data models for Slotwise.
//!
//! Providers own their slots and bookings by id reference; nothing here holds
//! a pointer to another aggregate. Cross-aggregate reads go through
//! [`crate::repository::Repository`].

use crate::geo::GeoPoint;
use crate::interval::Interval;
use crate::{Error, Result};
use chrono::{NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role an actor plays relative to a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The customer who made the booking.
    Customer,
    /// The provider assigned to the booking.
    Provider,
}

impl Role {
    /// Returns the lowercase role name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Provider => "provider",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated principal resolved by the identity collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Customer id or provider id, depending on the role.
    pub id: String,
    /// Role the principal acts in.
    pub role: Role,
}

impl Actor {
    /// Creates a customer actor.
    pub fn customer(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::Customer,
        }
    }

    /// Creates a provider actor.
    pub fn provider(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::Provider,
        }
    }

    /// Requires this actor to be the given provider.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the actor is a customer or another provider.
    pub fn require_provider(&self, provider_id: &str) -> Result<()> {
        if self.role == Role::Provider && self.id == provider_id {
            return Ok(());
        }
        Err(Error::Unauthorized {
            actor: self.to_string(),
            resource: format!("provider {}", provider_id),
        })
    }

    /// Requires this actor to act as a customer.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for provider actors.
    pub fn require_customer(&self) -> Result<()> {
        if self.role == Role::Customer && !self.id.trim().is_empty() {
            return Ok(());
        }
        Err(Error::Unauthorized {
            actor: self.to_string(),
            resource: "customer bookings".to_string(),
        })
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.role, self.id)
    }
}

/// A service provider as seen by the scheduling core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    /// Unique identifier (format: prv-XXXXXXXXXX).
    pub id: String,
    /// Display name.
    pub business_name: String,
    /// Geographic anchor, if the provider shared one.
    #[serde(default)]
    pub location: Option<GeoPoint>,
    /// How far the provider is willing to travel.
    #[serde(default = "default_service_radius")]
    pub service_radius_km: f64,
    /// Soft-disable flag; providers are never hard-deleted.
    #[serde(default = "default_available")]
    pub available: bool,
    /// Registration time.
    pub created_at: NaiveDateTime,
}

fn default_service_radius() -> f64 {
    50.0
}

fn default_available() -> bool {
    true
}

impl Provider {
    /// Creates an available provider with the default service radius.
    pub fn new(business_name: String, location: Option<GeoPoint>, now: NaiveDateTime) -> Self {
        let id = crate::identity::generate_id(
            crate::identity::PROVIDER_PREFIX,
            &business_name,
            now.and_utc().timestamp(),
        );
        Self {
            id,
            business_name,
            location,
            service_radius_km: default_service_radius(),
            available: true,
            created_at: now,
        }
    }

    /// Validates the provider record.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, the radius is not positive,
    /// the location is out of range or the id is malformed.
    pub fn validate(&self) -> Result<()> {
        crate::identity::validate_id_format(&self.id)?;
        if self.business_name.trim().is_empty() {
            return Err(Error::Validation(
                "Business name cannot be empty".to_string(),
            ));
        }
        crate::geo::validate_radius(self.service_radius_km)?;
        if let Some(location) = &self.location {
            location.validate()?;
        }
        Ok(())
    }
}

/// A service-catalog offering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Unique identifier (format: svc-XXXXXXXXXX).
    pub id: String,
    /// Owning provider.
    pub provider_id: String,
    /// Display name.
    pub name: String,
    /// Category keyword used for search matching.
    pub category: String,
    /// Price in minor currency units.
    pub price_cents: u64,
    /// Declared duration, if any.
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    /// Inactive services are not bookable and not matched by search.
    #[serde(default = "default_available")]
    pub active: bool,
    /// Service-specific location, if it differs from the provider's.
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

impl Service {
    /// Creates an active service for a provider.
    pub fn new(provider_id: String, name: String, category: String, price_cents: u64) -> Self {
        let seed = format!("{}:{}:{}", provider_id, name, category);
        let id = crate::identity::generate_id(crate::identity::SERVICE_PREFIX, &seed, 0);
        Self {
            id,
            provider_id,
            name,
            category,
            price_cents,
            duration_minutes: None,
            active: true,
            location: None,
        }
    }

    /// Returns true if the keyword matches the category or name, ignoring case.
    #[must_use]
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let needle = keyword.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.category.to_lowercase().contains(&needle) || self.name.to_lowercase().contains(&needle)
    }

    /// Validates the service record.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or category is empty, the duration is
    /// zero or the location is out of range.
    pub fn validate(&self) -> Result<()> {
        crate::identity::validate_id_format(&self.id)?;
        crate::identity::validate_id_format(&self.provider_id)?;
        if self.name.trim().is_empty() {
            return Err(Error::Validation("Service name cannot be empty".to_string()));
        }
        if self.category.trim().is_empty() {
            return Err(Error::Validation(
                "Service category cannot be empty".to_string(),
            ));
        }
        if self.duration_minutes == Some(0) {
            return Err(Error::Validation(
                "Service duration must be greater than 0 minutes".to_string(),
            ));
        }
        if let Some(location) = &self.location {
            location.validate()?;
        }
        Ok(())
    }
}

/// Weekly recurrence descriptor attached to a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    /// Day of the week the slot repeats on.
    pub day_of_week: Weekday,
    /// Time of day the slot opens.
    pub start_time: NaiveTime,
    /// Time of day the slot closes.
    pub end_time: NaiveTime,
}

/// An availability interval `[start, end)` owned by one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Unique identifier (format: slt-XXXXXXXXXX).
    pub id: String,
    /// Owning provider.
    pub provider_id: String,
    /// Inclusive start.
    pub start: NaiveDateTime,
    /// Exclusive end.
    pub end: NaiveDateTime,
    /// Weekly recurrence, if the slot was declared recurring.
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
    /// Whether a booking holds this slot.
    #[serde(default)]
    pub is_booked: bool,
    /// Free-text note.
    #[serde(default)]
    pub notes: Option<String>,
    /// Creation time.
    pub created_at: NaiveDateTime,
}

impl Slot {
    /// Returns the slot interval.
    #[must_use]
    pub fn interval(&self) -> Interval {
        Interval {
            start: self.start,
            end: self.end,
        }
    }

    /// Returns true if the slot carries a weekly recurrence.
    #[must_use]
    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    /// Returns the slot length in whole minutes.
    #[must_use]
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Validates the slot record.
    ///
    /// # Errors
    ///
    /// Returns an error if `end <= start` or an id is malformed.
    pub fn validate(&self) -> Result<()> {
        crate::identity::validate_id_format(&self.id)?;
        crate::identity::validate_id_format(&self.provider_id)?;
        Interval::new(self.start, self.end)?;
        if let Some(recurrence) = &self.recurrence {
            if recurrence.end_time <= recurrence.start_time {
                return Err(Error::Validation(
                    "Recurring end time must be after start time".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Status of a booking in the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Requested by the customer, awaiting the provider.
    Pending,
    /// Accepted by the provider.
    Confirmed,
    /// Service is being delivered.
    InProgress,
    /// Service delivered. Terminal.
    Completed,
    /// Cancelled by either party. Terminal.
    Cancelled,
}

impl BookingStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [BookingStatus; 5] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::InProgress,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    /// Returns the snake_case status name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::InProgress => "in_progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cancellation metadata stamped when a booking is cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cancellation {
    /// Reason given by the cancelling party.
    pub reason: String,
    /// Which party cancelled.
    pub cancelled_by: Role,
    /// When the cancellation happened.
    pub cancelled_at: NaiveDateTime,
}

/// A customer's commitment to a provider for a service at an interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique identifier (format: bkg-XXXXXXXXXX).
    pub id: String,
    /// Customer back-reference, lookup only.
    pub customer_id: String,
    /// Assigned provider.
    pub provider_id: String,
    /// Booked service.
    pub service_id: String,
    /// Availability slot held by this booking, if any.
    #[serde(default)]
    pub slot_id: Option<String>,
    /// Scheduled start (inclusive).
    pub scheduled_at: NaiveDateTime,
    /// Estimated end (exclusive).
    pub estimated_end: NaiveDateTime,
    /// When the provider actually started.
    #[serde(default)]
    pub actual_start: Option<NaiveDateTime>,
    /// When the provider actually finished.
    #[serde(default)]
    pub actual_end: Option<NaiveDateTime>,
    /// Current status.
    pub status: BookingStatus,
    /// Service price snapshot at creation time.
    pub total_price_cents: u64,
    /// Service duration snapshot at creation time.
    pub duration_minutes: u32,
    /// Customer notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Where the service is delivered.
    #[serde(default)]
    pub customer_address: Option<String>,
    /// Customer location, if shared.
    #[serde(default)]
    pub customer_location: Option<GeoPoint>,
    /// Set once the booking is cancelled.
    #[serde(default)]
    pub cancellation: Option<Cancellation>,
    /// Creation time.
    pub created_at: NaiveDateTime,
    /// Last mutation time.
    pub updated_at: NaiveDateTime,
}

impl Booking {
    /// Returns the booked interval `[scheduled_at, estimated_end)`.
    #[must_use]
    pub fn interval(&self) -> Interval {
        Interval {
            start: self.scheduled_at,
            end: self.estimated_end,
        }
    }

    /// Returns true while the booking occupies its interval.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Returns true if the actor is the booking's customer or provider.
    #[must_use]
    pub fn involves(&self, actor: &Actor) -> bool {
        match actor.role {
            Role::Customer => self.customer_id == actor.id,
            Role::Provider => self.provider_id == actor.id,
        }
    }

    /// Validates the booking record.
    ///
    /// # Errors
    ///
    /// Returns an error if the interval is empty, an id is malformed or the
    /// cancellation metadata disagrees with the status.
    pub fn validate(&self) -> Result<()> {
        crate::identity::validate_id_format(&self.id)?;
        crate::identity::validate_id_format(&self.provider_id)?;
        crate::identity::validate_id_format(&self.service_id)?;
        if self.customer_id.trim().is_empty() {
            return Err(Error::Validation("Customer id cannot be empty".to_string()));
        }
        Interval::new(self.scheduled_at, self.estimated_end)?;
        if let Some(location) = &self.customer_location {
            location.validate()?;
        }
        match (&self.status, &self.cancellation) {
            (BookingStatus::Cancelled, None) => Err(Error::Validation(
                "Cancelled booking is missing cancellation metadata".to_string(),
            )),
            (status, Some(_)) if *status != BookingStatus::Cancelled => Err(Error::Validation(
                format!("Booking in status {} carries cancellation metadata", status),
            )),
            _ => Ok(()),
        }
    }
}
