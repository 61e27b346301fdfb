// Rust guideline compliant 2026-10-12

//! Implementation of the `swt service` commands.

use crate::CommandContext;
use slotwise_app::{parse_location, Result};
use slotwise_core::NewService;

/// Registers a service under the acting provider.
///
/// # Errors
///
/// Returns an error if:
/// - No provider identity was given
/// - Name or category is empty, or the duration is zero
/// - The location cannot be parsed
pub fn add(
    ctx: &CommandContext<'_>,
    name: String,
    category: String,
    price_cents: u64,
    duration_minutes: Option<u32>,
    location: Option<String>,
) -> Result<String> {
    let location = location.as_deref().map(parse_location).transpose()?;
    let scheduler = ctx.scheduler()?;
    let service = scheduler.add_service(
        ctx.actor()?,
        NewService {
            name,
            category,
            price_cents,
            duration_minutes,
            location,
        },
    )?;
    Ok(ctx.formatter.format_services(std::slice::from_ref(&service)))
}

/// Lists services, optionally of one provider.
pub fn list(ctx: &CommandContext<'_>, provider_id: Option<String>) -> Result<String> {
    let services = ctx.scheduler()?.services(provider_id.as_deref())?;
    Ok(ctx.formatter.format_services(&services))
}
