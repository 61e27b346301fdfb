// Rust guideline compliant 2026-10-12

//! Clock helpers for Slotwise.

use chrono::{Local, NaiveDateTime, Timelike};

/// Returns the current local wall-clock time, truncated to whole seconds.
///
/// Slot and booking times are naive local times, so "now" is taken in the
/// same frame.
#[must_use]
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}
