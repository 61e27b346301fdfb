// Rust guideline compliant 2026-10-12

//! Implementation of the `swt slot` commands.
//!
//! Mutations act for the provider named by `--as provider:<id>`. Listing
//! commands take `--provider` or fall back to the acting provider.

use crate::CommandContext;
use slotwise_app::{
    now, parse_date, parse_datetime, parse_time, parse_weekday, parse_weekdays, AppError, Result,
    SlotQuery,
};
use slotwise_core::{BulkRequest, Interval, NewSlot, Recurrence, Role, TimeRange, TimeTemplate};

/// Options for `swt slot list`.
#[derive(Debug, Clone, Default)]
pub struct ListArgs {
    /// Provider whose slots are listed.
    pub provider: Option<String>,
    /// Earliest start.
    pub from: Option<String>,
    /// Latest end.
    pub to: Option<String>,
    /// Hide booked slots.
    pub unbooked: bool,
    /// Only booked slots.
    pub booked: bool,
    /// Minimum length in minutes.
    pub min_duration: Option<i64>,
}

fn provider_id(ctx: &CommandContext<'_>, explicit: Option<String>) -> Result<String> {
    if let Some(id) = explicit {
        return Ok(id);
    }
    match &ctx.actor {
        Some(actor) if actor.role == Role::Provider => Ok(actor.id.clone()),
        _ => Err(AppError::InvalidInput(
            "Name a provider with --provider or act as one with --as provider:<id>".to_string(),
        )),
    }
}

/// Parses a `HH:MM-HH:MM` time template.
///
/// # Errors
///
/// Returns `InvalidInput` if either side is not a time.
pub fn parse_template(value: &str) -> Result<TimeTemplate> {
    let (start, end) = value.split_once('-').ok_or_else(|| {
        AppError::InvalidInput(format!("Invalid time template '{}': expected HH:MM-HH:MM", value))
    })?;
    Ok(TimeTemplate {
        start: parse_time(start)?,
        end: parse_time(end)?,
    })
}

/// Creates one slot, optionally repeating weekly on a weekday.
///
/// # Errors
///
/// Returns an error if the times are invalid, the slot is not in the
/// future, or it overlaps an existing slot.
pub fn add(
    ctx: &CommandContext<'_>,
    start: String,
    end: String,
    repeat: Option<String>,
    notes: Option<String>,
) -> Result<String> {
    let interval = Interval::new(parse_datetime(&start)?, parse_datetime(&end)?)?;
    let recurrence = match repeat {
        Some(day) => Some(Recurrence {
            day_of_week: parse_weekday(&day)?,
            start_time: interval.start.time(),
            end_time: interval.end.time(),
        }),
        None => None,
    };
    let scheduler = ctx.scheduler()?;
    let slot = scheduler.create_slot(
        ctx.actor()?,
        NewSlot {
            interval,
            recurrence,
            notes,
        },
        now(),
    )?;
    Ok(ctx.formatter.format_slot(&slot))
}

/// Generates slots for every selected weekday between two dates.
///
/// Candidates overlapping existing slots are skipped and reported, never
/// failing the command.
///
/// # Errors
///
/// Returns an error for malformed dates, days or templates, or a date range
/// longer than the configured maximum.
pub fn bulk(
    ctx: &CommandContext<'_>,
    from: String,
    to: String,
    days: String,
    templates: Vec<String>,
    notes: Option<String>,
) -> Result<String> {
    let request = BulkRequest {
        date_from: parse_date(&from)?,
        date_to: parse_date(&to)?,
        days: parse_weekdays(&days)?,
        templates: templates
            .iter()
            .map(|t| parse_template(t))
            .collect::<Result<Vec<_>>>()?,
        notes,
    };
    let outcome = ctx.scheduler()?.create_bulk(ctx.actor()?, &request, now())?;
    Ok(ctx.formatter.format_bulk(&outcome))
}

/// Lists a provider's slots.
///
/// # Errors
///
/// Returns an error if no provider can be determined or a bound is malformed.
pub fn list(ctx: &CommandContext<'_>, args: ListArgs) -> Result<String> {
    let provider_id = provider_id(ctx, args.provider)?;
    let range = TimeRange {
        from: args.from.as_deref().map(parse_datetime).transpose()?,
        to: args.to.as_deref().map(parse_datetime).transpose()?,
    };
    if let (Some(from), Some(to)) = (range.from, range.to) {
        TimeRange::between(from, to)?;
    }
    let query = SlotQuery {
        range,
        unbooked_only: args.unbooked,
        booked_only: args.booked,
        min_duration_minutes: args.min_duration,
    };
    let slots = ctx.scheduler()?.list_slots(&provider_id, &query)?;
    Ok(ctx.formatter.format_slots(&slots))
}

/// Lists unbooked slots in the configured upcoming window.
pub fn upcoming(ctx: &CommandContext<'_>, provider: Option<String>) -> Result<String> {
    let provider_id = provider_id(ctx, provider)?;
    let slots = ctx.scheduler()?.upcoming_slots(&provider_id, now())?;
    Ok(ctx.formatter.format_slots(&slots))
}

/// Lists recurring slots repeating on a weekday.
pub fn recurring(ctx: &CommandContext<'_>, provider: Option<String>, day: String) -> Result<String> {
    let provider_id = provider_id(ctx, provider)?;
    let weekday = parse_weekday(&day)?;
    let slots = ctx.scheduler()?.recurring_slots(&provider_id, weekday)?;
    Ok(ctx.formatter.format_slots(&slots))
}

/// Marks a slot booked.
pub fn book(ctx: &CommandContext<'_>, slot_id: String) -> Result<String> {
    let slot = ctx.scheduler()?.book_slot(ctx.actor()?, &slot_id)?;
    Ok(ctx.formatter.format_slot(&slot))
}

/// Marks a slot available again.
pub fn release(ctx: &CommandContext<'_>, slot_id: String) -> Result<String> {
    let slot = ctx.scheduler()?.release_slot(ctx.actor()?, &slot_id)?;
    Ok(ctx.formatter.format_slot(&slot))
}

/// Deletes an unbooked slot.
pub fn delete(ctx: &CommandContext<'_>, slot_id: String) -> Result<String> {
    ctx.scheduler()?.delete_slot(ctx.actor()?, &slot_id)?;
    Ok(ctx
        .formatter
        .format_message(&format!("Deleted slot {}", slot_id)))
}
