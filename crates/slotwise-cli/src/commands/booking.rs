// Rust guideline compliant 2026-10-12

//! Implementation of the `swt booking` commands.
//!
//! Every booking command needs `--as`: customers create, reschedule and
//! cancel; providers confirm, start, complete and cancel.

use crate::CommandContext;
use slotwise_app::{now, parse_datetime, parse_location, parse_status, BookingListOptions, Result};
use slotwise_core::{BookingRequest, BookingStatus, StatusChange};
use std::collections::HashSet;

/// Options for `swt booking create`.
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Service to book.
    pub service: String,
    /// Requested start.
    pub at: String,
    /// Slot to hold.
    pub slot: Option<String>,
    /// Customer notes.
    pub notes: Option<String>,
    /// Delivery address.
    pub address: Option<String>,
    /// Customer location as `lat,lon`.
    pub location: Option<String>,
}

/// Options for `swt booking list`.
#[derive(Debug, Clone, Default)]
pub struct ListArgs {
    /// Status filter.
    pub status: Option<String>,
    /// Service filter.
    pub service: Option<String>,
    /// Scheduled at or after.
    pub after: Option<String>,
    /// Scheduled at or before.
    pub before: Option<String>,
    /// Hide cancelled bookings.
    pub active: bool,
    /// Sort field.
    pub sort: Option<String>,
}

/// Optional payload of a provider status change.
#[derive(Debug, Clone, Default)]
pub struct ProgressArgs {
    /// Explicit actual start.
    pub started: Option<String>,
    /// Explicit actual end.
    pub ended: Option<String>,
    /// Replacement notes.
    pub notes: Option<String>,
}

/// Creates a pending booking for the acting customer.
///
/// # Errors
///
/// Returns an error if the actor is not a customer, the start is not in the
/// future, the service or provider cannot take bookings, or the interval
/// overlaps another booking of the provider.
pub fn create(ctx: &CommandContext<'_>, args: CreateArgs) -> Result<String> {
    let request = BookingRequest {
        service_id: args.service,
        scheduled_at: Some(parse_datetime(&args.at)?),
        slot_id: args.slot,
        notes: args.notes,
        customer_address: args.address,
        customer_location: args.location.as_deref().map(parse_location).transpose()?,
    };
    let booking = ctx
        .scheduler()?
        .create_booking(ctx.actor()?, request, now())?;
    Ok(ctx.formatter.format_booking(&booking))
}

/// Shows a booking the actor takes part in.
pub fn show(ctx: &CommandContext<'_>, id: String) -> Result<String> {
    let booking = ctx.scheduler()?.show_booking(&id, ctx.actor()?)?;
    Ok(ctx.formatter.format_booking(&booking))
}

/// Lists the actor's bookings.
pub fn list(ctx: &CommandContext<'_>, args: ListArgs) -> Result<String> {
    let options = BookingListOptions {
        status: args.status.as_deref().map(parse_status).transpose()?,
        service_id: args.service,
        scheduled_after: args.after.as_deref().map(parse_datetime).transpose()?,
        scheduled_before: args.before.as_deref().map(parse_datetime).transpose()?,
        active_only: args.active,
        sort: args.sort,
    };
    let bookings = ctx.scheduler()?.list_bookings(ctx.actor()?, &options)?;
    Ok(ctx.formatter.format_bookings(&bookings))
}

/// Lists the actor's open bookings that have not started yet.
pub fn upcoming(ctx: &CommandContext<'_>) -> Result<String> {
    let bookings = ctx.scheduler()?.upcoming_bookings(ctx.actor()?, now())?;
    Ok(ctx.formatter.format_bookings(&bookings))
}

fn change(ctx: &CommandContext<'_>, id: &str, change: StatusChange) -> Result<String> {
    let booking = ctx
        .scheduler()?
        .update_status(id, ctx.actor()?, change, now())?;
    Ok(ctx.formatter.format_booking(&booking))
}

fn progress(target: BookingStatus, args: ProgressArgs) -> Result<StatusChange> {
    Ok(StatusChange {
        actual_start: args.started.as_deref().map(parse_datetime).transpose()?,
        actual_end: args.ended.as_deref().map(parse_datetime).transpose()?,
        notes: args.notes,
        ..StatusChange::to(target)
    })
}

/// Provider confirms a pending booking.
pub fn confirm(ctx: &CommandContext<'_>, id: String, notes: Option<String>) -> Result<String> {
    let status = StatusChange {
        notes,
        ..StatusChange::to(BookingStatus::Confirmed)
    };
    change(ctx, &id, status)
}

/// Provider starts a confirmed booking.
pub fn start(ctx: &CommandContext<'_>, id: String, args: ProgressArgs) -> Result<String> {
    change(ctx, &id, progress(BookingStatus::InProgress, args)?)
}

/// Provider completes a booking in progress.
pub fn complete(ctx: &CommandContext<'_>, id: String, args: ProgressArgs) -> Result<String> {
    change(ctx, &id, progress(BookingStatus::Completed, args)?)
}

/// Either party cancels a booking.
pub fn cancel(ctx: &CommandContext<'_>, id: String, reason: String) -> Result<String> {
    change(ctx, &id, StatusChange::cancel(reason))
}

/// Customer moves a booking to a new start.
pub fn reschedule(ctx: &CommandContext<'_>, id: String, to: String) -> Result<String> {
    let new_start = parse_datetime(&to)?;
    let booking = ctx
        .scheduler()?
        .reschedule(&id, ctx.actor()?, new_start, now())?;
    Ok(ctx.formatter.format_booking(&booking))
}

/// Lists the acting customer's completed bookings that are not yet rated.
///
/// `rated` holds booking ids the rating system already has scores for.
pub fn ratable(ctx: &CommandContext<'_>, rated: Vec<String>) -> Result<String> {
    let rated: HashSet<String> = rated.into_iter().collect();
    let bookings = ctx.scheduler()?.ratable(ctx.actor()?, &rated)?;
    Ok(ctx.formatter.format_bookings(&bookings))
}
