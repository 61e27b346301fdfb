// Rust guideline compliant 2026-10-12

//! Implementation of the `swt provider` commands.
//!
//! Seeds and inspects provider records, and answers proximity questions
//! ("who is near me", "who serves my address").

use crate::CommandContext;
use slotwise_app::{now, parse_location, Result};
use slotwise_core::NewProvider;

/// Registers a provider and prints it. The new id is what `--as
/// provider:<id>` expects afterwards.
///
/// # Arguments
///
/// * `name` - Business name
/// * `location` - Optional `lat,lon`
/// * `radius_km` - Optional service radius
///
/// # Errors
///
/// Returns an error if the input is invalid or the repository is missing.
pub fn add(
    ctx: &CommandContext<'_>,
    name: String,
    location: Option<String>,
    radius_km: Option<f64>,
) -> Result<String> {
    let location = location.as_deref().map(parse_location).transpose()?;
    let scheduler = ctx.scheduler()?;
    let provider = scheduler.add_provider(
        NewProvider {
            business_name: name,
            location,
            service_radius_km: radius_km,
        },
        now(),
    )?;
    Ok(ctx.formatter.format_provider(&provider))
}

/// Lists every provider.
pub fn list(ctx: &CommandContext<'_>) -> Result<String> {
    let providers = ctx.scheduler()?.providers()?;
    Ok(ctx.formatter.format_providers(&providers))
}

/// Shows one provider.
pub fn show(ctx: &CommandContext<'_>, id: String) -> Result<String> {
    let provider = ctx.scheduler()?.provider(&id)?;
    Ok(ctx.formatter.format_provider(&provider))
}

/// Shows booking counts of the acting provider.
pub fn stats(ctx: &CommandContext<'_>) -> Result<String> {
    let stats = ctx.scheduler()?.provider_stats(ctx.actor()?)?;
    Ok(ctx.formatter.format_stats(&stats))
}

/// Opens or closes the acting provider for new bookings.
pub fn set_available(ctx: &CommandContext<'_>, available: bool) -> Result<String> {
    let provider = ctx.scheduler()?.set_available(ctx.actor()?, available)?;
    Ok(ctx.formatter.format_provider(&provider))
}

/// Lists available providers within a radius of a point, nearest first.
pub fn nearby(ctx: &CommandContext<'_>, near: String, radius_km: Option<f64>) -> Result<String> {
    let center = parse_location(&near)?;
    let providers = ctx.scheduler()?.nearby_providers(&center, radius_km)?;
    Ok(ctx.formatter.format_nearby(&providers))
}

/// Lists available providers whose own service radius covers a point.
pub fn serving(ctx: &CommandContext<'_>, at: String) -> Result<String> {
    let point = parse_location(&at)?;
    let providers = ctx.scheduler()?.providers_serving(&point)?;
    Ok(ctx.formatter.format_nearby(&providers))
}
