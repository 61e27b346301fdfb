// Rust guideline compliant 2026-10-12

//! Implementation of the `swt search` command.

use crate::CommandContext;
use chrono::Duration;
use slotwise_app::{now, parse_datetime, parse_location, Result};
use slotwise_core::SearchCriteria;

/// Options for `swt search`.
#[derive(Debug, Clone, Default)]
pub struct SearchArgs {
    /// Service keyword.
    pub keyword: Option<String>,
    /// Earliest slot start; defaults to now.
    pub from: Option<String>,
    /// Latest slot end; defaults to the end of the upcoming window.
    pub to: Option<String>,
    /// Minimum slot length in minutes.
    pub min_duration: Option<i64>,
    /// Customer location as `lat,lon`.
    pub near: Option<String>,
    /// Search radius in km.
    pub radius: Option<f64>,
    /// Restrict to one provider.
    pub provider: Option<String>,
    /// Maximum number of results.
    pub limit: Option<usize>,
    /// Keep provider order instead of sorting by start.
    pub unsorted: bool,
}

/// Searches bookable slots.
///
/// # Errors
///
/// Returns an error if a bound or location is malformed, the radius is not
/// positive, or the named provider does not exist.
pub fn execute(ctx: &CommandContext<'_>, args: SearchArgs) -> Result<String> {
    let scheduler = ctx.scheduler()?;
    let from = match args.from.as_deref() {
        Some(value) => parse_datetime(value)?,
        None => now(),
    };
    let to = match args.to.as_deref() {
        Some(value) => parse_datetime(value)?,
        None => from + Duration::days(i64::from(scheduler.config().upcoming_window_days)),
    };
    let criteria = SearchCriteria {
        keyword: args.keyword,
        min_duration_minutes: args.min_duration,
        location: args.near.as_deref().map(parse_location).transpose()?,
        radius_km: args.radius,
        provider_id: args.provider,
        limit: args.limit,
        sort_by_start: !args.unsorted,
        ..SearchCriteria::between(from, to)
    };
    let matches = scheduler.search(&criteria)?;
    tracing::debug!(results = matches.len(), "search finished");
    Ok(ctx.formatter.format_matches(&matches))
}
