// Rust guideline compliant 2026-10-12

//! MCP tool input and output types for Slotwise.
//!
//! Times are local wall-clock strings (`YYYY-MM-DDTHH:MM`), actors are
//! `role:id` strings and locations are separate latitude/longitude numbers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use slotwise_core::{Booking, Provider, Service, SkippedSlot, Slot, SlotMatch};

/// Input parameters for the `search_availability` tool.
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct SearchAvailabilityInput {
    /// Service keyword matched against category and name.
    pub keyword: Option<String>,
    /// Earliest slot start; defaults to now.
    pub from: Option<String>,
    /// Latest slot end; defaults to the end of the upcoming window.
    pub to: Option<String>,
    /// Minimum slot length in minutes.
    pub min_duration_minutes: Option<i64>,
    /// Customer latitude.
    pub latitude: Option<f64>,
    /// Customer longitude.
    pub longitude: Option<f64>,
    /// Search radius in km.
    pub radius_km: Option<f64>,
    /// Restrict to one provider.
    pub provider_id: Option<String>,
    /// Maximum number of results.
    pub limit: Option<usize>,
    /// Keep provider order instead of sorting by start.
    pub unsorted: Option<bool>,
}

/// Output payload for the `search_availability` tool.
#[derive(Debug, Clone, Serialize)]
pub struct SearchAvailabilityResult {
    /// Bookable slots.
    pub matches: Vec<SlotMatch>,
    /// Number of matches returned.
    pub total: usize,
}

/// Input parameters for the `list_slots` tool.
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct ListSlotsInput {
    /// Provider whose slots are listed.
    pub provider_id: String,
    /// Earliest start.
    pub from: Option<String>,
    /// Latest end.
    pub to: Option<String>,
    /// Hide booked slots.
    pub unbooked_only: Option<bool>,
    /// Only booked slots.
    pub booked_only: Option<bool>,
    /// Minimum slot length in minutes.
    pub min_duration_minutes: Option<i64>,
}

/// Output payload for the `list_slots` tool.
#[derive(Debug, Clone, Serialize)]
pub struct ListSlotsResult {
    /// Matching slots, ordered by start.
    pub slots: Vec<Slot>,
    /// Number of slots returned.
    pub total: usize,
}

/// Input parameters for the `create_slot` tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct CreateSlotInput {
    /// Acting provider as `provider:<id>`.
    pub actor: String,
    /// Slot start.
    pub start: String,
    /// Slot end.
    pub end: String,
    /// Weekday the slot repeats on, if recurring.
    pub repeat_weekday: Option<String>,
    /// Free-form note.
    pub notes: Option<String>,
}

/// Output payload for slot tools returning one slot.
#[derive(Debug, Clone, Serialize)]
pub struct SlotResult {
    /// The slot.
    pub slot: Slot,
}

/// A daily time window such as 09:00 to 12:00.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct TimeWindowInput {
    /// Start time (`HH:MM`).
    pub start: String,
    /// End time (`HH:MM`).
    pub end: String,
}

/// Input parameters for the `create_bulk_slots` tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct CreateBulkSlotsInput {
    /// Acting provider as `provider:<id>`.
    pub actor: String,
    /// First date (`YYYY-MM-DD`).
    pub date_from: String,
    /// Last date (`YYYY-MM-DD`), inclusive.
    pub date_to: String,
    /// Weekdays to fill, e.g. `["mon", "wed"]`.
    pub days: Vec<String>,
    /// Time windows created on each selected day.
    pub times: Vec<TimeWindowInput>,
    /// Note copied onto every slot.
    pub notes: Option<String>,
}

/// Output payload for the `create_bulk_slots` tool.
#[derive(Debug, Clone, Serialize)]
pub struct CreateBulkSlotsResult {
    /// Slots created.
    pub created: Vec<Slot>,
    /// Candidates skipped because they started too early or overlapped.
    pub skipped: Vec<SkippedSlot>,
    /// Number of slots created.
    pub created_count: usize,
    /// Number of candidates skipped.
    pub skipped_count: usize,
}

/// Input parameters for the `delete_slot` tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct DeleteSlotInput {
    /// Acting provider as `provider:<id>`.
    pub actor: String,
    /// Slot to delete.
    pub slot_id: String,
}

/// Output payload for the `delete_slot` tool.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteSlotResult {
    /// Deleted slot.
    pub slot_id: String,
}

/// Input parameters for the `create_booking` tool.
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct CreateBookingInput {
    /// Acting customer as `customer:<id>`.
    pub actor: String,
    /// Service to book.
    pub service_id: String,
    /// Requested start.
    pub scheduled_at: String,
    /// Slot to hold for the booking.
    pub slot_id: Option<String>,
    /// Notes for the provider.
    pub notes: Option<String>,
    /// Delivery address.
    pub customer_address: Option<String>,
    /// Customer latitude.
    pub latitude: Option<f64>,
    /// Customer longitude.
    pub longitude: Option<f64>,
}

/// Output payload for booking tools returning one booking.
#[derive(Debug, Clone, Serialize)]
pub struct BookingResult {
    /// The booking.
    pub booking: Booking,
}

/// Input parameters for the `show_booking` tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ShowBookingInput {
    /// Acting identity as `role:id`.
    pub actor: String,
    /// Booking to read.
    pub booking_id: String,
}

/// Input parameters for the `update_booking_status` tool.
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct UpdateBookingStatusInput {
    /// Acting identity as `role:id`.
    pub actor: String,
    /// Booking to change.
    pub booking_id: String,
    /// Target status: confirmed, in_progress, completed or cancelled.
    pub status: String,
    /// Cancellation reason; required when cancelling.
    pub reason: Option<String>,
    /// Explicit actual start.
    pub actual_start: Option<String>,
    /// Explicit actual end.
    pub actual_end: Option<String>,
    /// Replacement notes.
    pub notes: Option<String>,
}

/// Input parameters for the `distance` tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct DistanceInput {
    /// Latitude of the first point.
    pub from_latitude: f64,
    /// Longitude of the first point.
    pub from_longitude: f64,
    /// Latitude of the second point.
    pub to_latitude: f64,
    /// Longitude of the second point.
    pub to_longitude: f64,
}

/// Payload of the `slotwise://providers` resource.
#[derive(Debug, Clone, Serialize)]
pub struct ProvidersResource {
    /// Registered providers.
    pub providers: Vec<Provider>,
    /// Number of providers.
    pub total: usize,
}

/// Payload of a `slotwise://prv-{id}` resource.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderResource {
    /// The provider.
    pub provider: Provider,
    /// Its services.
    pub services: Vec<Service>,
}
