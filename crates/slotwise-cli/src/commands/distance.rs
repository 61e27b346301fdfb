// Rust guideline compliant 2026-10-12

//! Implementation of the `swt distance` command.

use crate::CommandContext;
use slotwise_app::Result;
use slotwise_core::geo::distance;
use slotwise_core::GeoPoint;

/// Computes the great-circle distance between two points.
///
/// Needs no repository.
///
/// # Errors
///
/// Returns a validation error if a coordinate is out of range.
pub fn execute(ctx: &CommandContext<'_>, from: (f64, f64), to: (f64, f64)) -> Result<String> {
    let a = GeoPoint::new(from.0, from.1)?;
    let b = GeoPoint::new(to.0, to.1)?;
    let result = distance(&a, &b)?;
    Ok(ctx.formatter.format_distance(&result))
}
