// Rust guideline compliant 2026-10-12

//! Half-open interval arithmetic and conflict detection.
//!
//! Two intervals `[s1, e1)` and `[s2, e2)` conflict iff `s1 < e2 && s2 < e1`.
//! Adjacent intervals (one ends exactly when the other starts) never conflict.

use crate::models::{Booking, Slot};
use crate::{Error, Result};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

const DISPLAY_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// A half-open time interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    /// Inclusive start.
    pub start: NaiveDateTime,
    /// Exclusive end.
    pub end: NaiveDateTime,
}

impl Interval {
    /// Creates a non-empty interval.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `end <= start`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if end <= start {
            return Err(Error::Validation(format!(
                "End time must be after start time ({} >= {})",
                start.format(DISPLAY_FORMAT),
                end.format(DISPLAY_FORMAT)
            )));
        }
        Ok(Self { start, end })
    }

    /// Creates an interval from a start and a length in minutes.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the length is not positive.
    pub fn starting_at(start: NaiveDateTime, minutes: i64) -> Result<Self> {
        Self::new(start, start + Duration::minutes(minutes))
    }

    /// Returns true if the two intervals share at least one instant.
    #[must_use]
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns true if `other` lies entirely within this interval.
    #[must_use]
    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns the interval length.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format(DISPLAY_FORMAT),
            self.end.format(DISPLAY_FORMAT)
        )
    }
}

/// Date-range filter used by slot queries and search.
///
/// Both bounds are optional. A record matches when it starts at or after
/// `from` and ends at or before `to`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Earliest allowed start.
    pub from: Option<NaiveDateTime>,
    /// Latest allowed end.
    pub to: Option<NaiveDateTime>,
}

impl TimeRange {
    /// Creates a bounded range.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `to` is before `from`.
    pub fn between(from: NaiveDateTime, to: NaiveDateTime) -> Result<Self> {
        if to < from {
            return Err(Error::Validation(
                "Range end must not be before range start".to_string(),
            ));
        }
        Ok(Self {
            from: Some(from),
            to: Some(to),
        })
    }

    /// Returns true if the interval falls inside the range.
    #[must_use]
    pub fn admits(&self, interval: &Interval) -> bool {
        self.from.map_or(true, |from| interval.start >= from)
            && self.to.map_or(true, |to| interval.end <= to)
    }
}

/// Kind of committed record a candidate collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// An existing availability slot.
    Slot,
    /// An existing active booking.
    Booking,
}

/// One colliding record, with enough detail to explain a rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// Identifier of the colliding slot or booking.
    pub id: String,
    /// What kind of record collided.
    pub kind: ConflictKind,
    /// Start of the colliding interval.
    pub start: NaiveDateTime,
    /// End of the colliding interval.
    pub end: NaiveDateTime,
    /// Whether the colliding record is booked.
    pub booked: bool,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} to {} ({})]",
            self.start.format(DISPLAY_FORMAT),
            self.end.format(DISPLAY_FORMAT),
            if self.booked { "BOOKED" } else { "AVAILABLE" }
        )
    }
}

/// Returns every slot overlapping the candidate interval.
///
/// # Arguments
///
/// * `slots` - Existing slots of one provider
/// * `candidate` - Interval to check
/// * `exclude` - Slot id to ignore, if any
#[must_use]
pub fn slot_conflicts(slots: &[Slot], candidate: &Interval, exclude: Option<&str>) -> Vec<Conflict> {
    slots
        .iter()
        .filter(|slot| exclude != Some(slot.id.as_str()))
        .filter(|slot| slot.interval().overlaps(candidate))
        .map(|slot| Conflict {
            id: slot.id.clone(),
            kind: ConflictKind::Slot,
            start: slot.start,
            end: slot.end,
            booked: slot.is_booked,
        })
        .collect()
}

/// Returns every active booking overlapping the candidate interval.
///
/// Cancelled bookings release their interval and are ignored.
#[must_use]
pub fn booking_conflicts(
    bookings: &[Booking],
    candidate: &Interval,
    exclude: Option<&str>,
) -> Vec<Conflict> {
    bookings
        .iter()
        .filter(|booking| booking.is_active())
        .filter(|booking| exclude != Some(booking.id.as_str()))
        .filter(|booking| booking.interval().overlaps(candidate))
        .map(|booking| Conflict {
            id: booking.id.clone(),
            kind: ConflictKind::Booking,
            start: booking.scheduled_at,
            end: booking.estimated_end,
            booked: true,
        })
        .collect()
}

/// Fails with `SchedulingConflict` when the conflict list is non-empty.
///
/// # Errors
///
/// Returns `Error::SchedulingConflict` carrying the conflicts.
pub fn ensure_free(conflicts: Vec<Conflict>) -> Result<()> {
    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(Error::SchedulingConflict(conflicts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_overlapping_intervals_conflict() {
        let a = Interval::new(at(10), at(12)).unwrap();
        let b = Interval::new(at(11), at(13)).unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_adjacent_intervals_do_not_conflict() {
        let a = Interval::new(at(10), at(12)).unwrap();
        let b = Interval::new(at(12), at(13)).unwrap();
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_empty_interval_rejected() {
        assert!(Interval::new(at(10), at(10)).is_err());
        assert!(Interval::new(at(11), at(10)).is_err());
    }

    #[test]
    fn test_conflict_display() {
        let conflict = Conflict {
            id: "slt-1".to_string(),
            kind: ConflictKind::Slot,
            start: at(10),
            end: at(11),
            booked: false,
        };
        assert_eq!(
            conflict.to_string(),
            "[2026-03-02T10:00 to 2026-03-02T11:00 (AVAILABLE)]"
        );
    }

    #[test]
    fn test_time_range_bounds_inclusive() {
        let range = TimeRange::between(at(9), at(12)).unwrap();
        assert!(range.admits(&Interval::new(at(9), at(12)).unwrap()));
        assert!(!range.admits(&Interval::new(at(8), at(10)).unwrap()));
        assert!(!range.admits(&Interval::new(at(11), at(13)).unwrap()));
        assert!(TimeRange::default().admits(&Interval::new(at(1), at(2)).unwrap()));
    }
}
