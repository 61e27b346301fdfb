// Rust guideline compliant 2026-10-12

//! Slot store: per-provider availability intervals.
//!
//! Slots of one provider never overlap. Every mutation re-reads the
//! provider's slots inside the provider lock, checks for conflicts and then
//! writes, so concurrent creators cannot both pass the check.

use crate::identity::{generate_id, SLOT_PREFIX};
use crate::interval::{ensure_free, slot_conflicts, Conflict, Interval, TimeRange};
use crate::models::{Recurrence, Slot};
use crate::repository::Repository;
use crate::{Error, Result};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Date ranges longer than this many days materialize candidates in parallel.
pub const BULK_PARALLEL_THRESHOLD: usize = 64;

/// Input for a single slot.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSlot {
    /// Interval the slot covers.
    pub interval: Interval,
    /// Weekly recurrence, if any.
    pub recurrence: Option<Recurrence>,
    /// Free-text note.
    pub notes: Option<String>,
}

impl NewSlot {
    /// A one-off slot without a note.
    #[must_use]
    pub fn once(interval: Interval) -> Self {
        Self {
            interval,
            recurrence: None,
            notes: None,
        }
    }
}

/// Time-of-day pair materialized on every selected date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeTemplate {
    /// Opening time.
    pub start: NaiveTime,
    /// Closing time, later than `start` on the same day.
    pub end: NaiveTime,
}

/// Input for bulk slot generation.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkRequest {
    /// First calendar date, inclusive.
    pub date_from: NaiveDate,
    /// Last calendar date, inclusive.
    pub date_to: NaiveDate,
    /// Weekdays to generate slots on.
    pub days: Vec<Weekday>,
    /// Time templates applied to every selected date.
    pub templates: Vec<TimeTemplate>,
    /// Note copied onto every created slot.
    pub notes: Option<String>,
}

/// Why a bulk candidate was not created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The candidate overlaps an existing slot.
    Overlap,
    /// The candidate does not start after the creation time.
    NotInFuture,
}

/// A bulk candidate that was not created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedSlot {
    /// The candidate interval.
    pub interval: Interval,
    /// Why it was skipped.
    pub reason: SkipReason,
    /// What it collided with; empty unless `reason` is `Overlap`.
    pub conflicts: Vec<Conflict>,
}

/// Result of bulk generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkOutcome {
    /// Slots actually created, in date then template order.
    pub created: Vec<Slot>,
    /// Candidates skipped because they started too early or overlapped.
    pub skipped: Vec<SkippedSlot>,
}

/// Availability store over a repository.
pub struct SlotStore<'a, R: Repository> {
    repo: &'a R,
}

impl<'a, R: Repository> SlotStore<'a, R> {
    /// Creates a store over the repository.
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Creates one slot.
    ///
    /// # Arguments
    ///
    /// * `provider_id` - Owning provider
    /// * `new_slot` - Interval, recurrence and note
    /// * `now` - Creation time
    ///
    /// # Returns
    ///
    /// The created slot.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The slot does not start after `now`
    /// - The provider does not exist
    /// - The recurrence times are inverted
    /// - The interval overlaps an existing slot (`SchedulingConflict` listing each one)
    pub fn create_slot(&self, provider_id: &str, new_slot: NewSlot, now: NaiveDateTime) -> Result<Slot> {
        if new_slot.interval.start <= now {
            return Err(Error::Validation(
                "Slot start must be in the future".to_string(),
            ));
        }
        self.repo.provider(provider_id)?;
        let slot = build_slot(provider_id, new_slot, now);
        slot.validate()?;

        self.repo.with_provider_lock(provider_id, || {
            let mut slots = self.repo.slots_for(provider_id)?;
            let conflicts = slot_conflicts(&slots, &slot.interval(), None);
            if !conflicts.is_empty() {
                tracing::info!(
                    provider_id,
                    interval = %slot.interval(),
                    conflicts = conflicts.len(),
                    "slot rejected: overlaps existing slots"
                );
            }
            ensure_free(conflicts)?;

            slots.push(slot.clone());
            self.repo.replace_slots(provider_id, &slots)?;
            tracing::debug!(provider_id, slot_id = %slot.id, "slot created");
            Ok(slot)
        })
    }

    /// Generates slots for every matching date and template.
    ///
    /// Candidates that do not start after `now`, or that overlap an existing
    /// slot or one created earlier in the same call, are skipped rather than
    /// failing the batch.
    ///
    /// # Arguments
    ///
    /// * `provider_id` - Owning provider
    /// * `request` - Date range, weekdays, templates and note
    /// * `max_days` - Upper bound on the date range length
    /// * `now` - Creation time
    ///
    /// # Errors
    ///
    /// Returns an error if the provider does not exist or the request is
    /// malformed (inverted range, range too long, no days, no templates or an
    /// inverted template). Collisions are never an error.
    pub fn create_bulk(
        &self,
        provider_id: &str,
        request: &BulkRequest,
        max_days: u32,
        now: NaiveDateTime,
    ) -> Result<BulkOutcome> {
        validate_bulk(request, max_days)?;
        self.repo.provider(provider_id)?;

        let dates: Vec<NaiveDate> = request
            .date_from
            .iter_days()
            .take_while(|d| *d <= request.date_to)
            .filter(|d| request.days.contains(&d.weekday()))
            .collect();

        let materialize = |date: &NaiveDate| -> Vec<Interval> {
            request
                .templates
                .iter()
                .map(|t| Interval {
                    start: date.and_time(t.start),
                    end: date.and_time(t.end),
                })
                .collect()
        };
        let candidates: Vec<Interval> = if dates.len() > BULK_PARALLEL_THRESHOLD {
            dates.par_iter().flat_map_iter(materialize).collect()
        } else {
            dates.iter().flat_map(materialize).collect()
        };

        self.repo.with_provider_lock(provider_id, || {
            let mut slots = self.repo.slots_for(provider_id)?;
            let mut outcome = BulkOutcome::default();

            for interval in candidates {
                if interval.start <= now {
                    tracing::debug!(provider_id, interval = %interval, "bulk candidate already started");
                    outcome.skipped.push(SkippedSlot {
                        interval,
                        reason: SkipReason::NotInFuture,
                        conflicts: Vec::new(),
                    });
                    continue;
                }
                let conflicts = slot_conflicts(&slots, &interval, None);
                if !conflicts.is_empty() {
                    tracing::debug!(provider_id, interval = %interval, "bulk candidate skipped");
                    outcome.skipped.push(SkippedSlot {
                        interval,
                        reason: SkipReason::Overlap,
                        conflicts,
                    });
                    continue;
                }
                let slot = build_slot(
                    provider_id,
                    NewSlot {
                        interval,
                        recurrence: None,
                        notes: request.notes.clone(),
                    },
                    now,
                );
                slots.push(slot.clone());
                outcome.created.push(slot);
            }

            if !outcome.created.is_empty() {
                self.repo.replace_slots(provider_id, &slots)?;
            }
            tracing::info!(
                provider_id,
                created = outcome.created.len(),
                skipped = outcome.skipped.len(),
                "bulk slot generation finished"
            );
            Ok(outcome)
        })
    }

    /// Marks a slot booked.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown slot and `AlreadyBooked` if the slot
    /// is already booked.
    pub fn mark_booked(&self, slot_id: &str) -> Result<Slot> {
        let provider_id = self.repo.locate_slot(slot_id)?.provider_id;
        self.repo.with_provider_lock(&provider_id, || {
            self.set_booked_locked(&provider_id, slot_id, true)
        })
    }

    /// Marks a slot available again. Succeeds on an unbooked slot.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown slot.
    pub fn mark_available(&self, slot_id: &str) -> Result<Slot> {
        let provider_id = self.repo.locate_slot(slot_id)?.provider_id;
        self.repo.with_provider_lock(&provider_id, || {
            self.set_booked_locked(&provider_id, slot_id, false)
        })
    }

    /// Toggles the booked flag. The caller must hold the provider lock.
    pub(crate) fn set_booked_locked(&self, provider_id: &str, slot_id: &str, booked: bool) -> Result<Slot> {
        let mut slots = self.repo.slots_for(provider_id)?;
        let slot = slots
            .iter_mut()
            .find(|s| s.id == slot_id)
            .ok_or_else(|| Error::not_found("Slot", slot_id))?;

        if booked && slot.is_booked {
            return Err(Error::AlreadyBooked(slot_id.to_string()));
        }
        if slot.is_booked == booked {
            return Ok(slot.clone());
        }
        slot.is_booked = booked;
        let updated = slot.clone();
        self.repo.replace_slots(provider_id, &slots)?;
        tracing::debug!(provider_id, slot_id, booked, "slot booked flag changed");
        Ok(updated)
    }

    /// Deletes an unbooked slot.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The slot does not exist
    /// - The slot belongs to another provider (`Unauthorized`)
    /// - The slot is booked (`SlotBooked`)
    pub fn delete(&self, slot_id: &str, requesting_provider_id: &str) -> Result<()> {
        let owner = self.repo.locate_slot(slot_id)?.provider_id;
        if owner != requesting_provider_id {
            return Err(Error::Unauthorized {
                actor: format!("provider:{}", requesting_provider_id),
                resource: format!("slot {}", slot_id),
            });
        }

        self.repo.with_provider_lock(&owner, || {
            let mut slots = self.repo.slots_for(&owner)?;
            let pos = slots
                .iter()
                .position(|s| s.id == slot_id)
                .ok_or_else(|| Error::not_found("Slot", slot_id))?;
            if slots[pos].is_booked {
                return Err(Error::SlotBooked(slot_id.to_string()));
            }
            slots.remove(pos);
            self.repo.replace_slots(&owner, &slots)?;
            tracing::debug!(provider_id = %owner, slot_id, "slot deleted");
            Ok(())
        })
    }

    /// Lists a provider's slots inside the range, ordered by start.
    pub fn list(&self, provider_id: &str, range: &TimeRange) -> Result<Vec<Slot>> {
        self.filtered(provider_id, |slot| range.admits(&slot.interval()))
    }

    /// Lists a provider's unbooked slots inside the range, ordered by start.
    pub fn list_unbooked(&self, provider_id: &str, range: &TimeRange) -> Result<Vec<Slot>> {
        self.filtered(provider_id, |slot| {
            !slot.is_booked && range.admits(&slot.interval())
        })
    }

    /// Lists unbooked slots inside the range lasting at least `min_minutes`.
    pub fn list_with_min_duration(
        &self,
        provider_id: &str,
        range: &TimeRange,
        min_minutes: i64,
    ) -> Result<Vec<Slot>> {
        self.filtered(provider_id, |slot| {
            !slot.is_booked
                && range.admits(&slot.interval())
                && slot.duration_minutes() >= min_minutes
        })
    }

    /// Lists recurring slots that repeat on the given weekday.
    pub fn list_recurring(&self, provider_id: &str, weekday: Weekday) -> Result<Vec<Slot>> {
        self.filtered(provider_id, |slot| {
            slot.recurrence
                .map_or(false, |r| r.day_of_week == weekday)
        })
    }

    /// Lists unbooked slots starting within `days` days of `now`.
    pub fn upcoming(&self, provider_id: &str, now: NaiveDateTime, days: u32) -> Result<Vec<Slot>> {
        let horizon = now + Duration::days(i64::from(days));
        self.filtered(provider_id, |slot| {
            !slot.is_booked && slot.start >= now && slot.start <= horizon
        })
    }

    /// Lists booked slots, ordered by start.
    pub fn list_booked(&self, provider_id: &str) -> Result<Vec<Slot>> {
        self.filtered(provider_id, |slot| slot.is_booked)
    }

    /// Returns true if the provider has at least one unbooked slot in the range.
    pub fn has_availability(&self, provider_id: &str, range: &TimeRange) -> Result<bool> {
        Ok(self
            .repo
            .slots_for(provider_id)?
            .iter()
            .any(|slot| !slot.is_booked && range.admits(&slot.interval())))
    }

    fn filtered<F>(&self, provider_id: &str, keep: F) -> Result<Vec<Slot>>
    where
        F: Fn(&Slot) -> bool,
    {
        let mut slots: Vec<Slot> = self
            .repo
            .slots_for(provider_id)?
            .into_iter()
            .filter(|slot| keep(slot))
            .collect();
        slots.sort_by_key(|slot| slot.start);
        Ok(slots)
    }
}

fn build_slot(provider_id: &str, new_slot: NewSlot, now: NaiveDateTime) -> Slot {
    let seed = format!("{}:{}", provider_id, new_slot.interval);
    Slot {
        id: generate_id(SLOT_PREFIX, &seed, now.and_utc().timestamp()),
        provider_id: provider_id.to_string(),
        start: new_slot.interval.start,
        end: new_slot.interval.end,
        recurrence: new_slot.recurrence,
        is_booked: false,
        notes: new_slot.notes,
        created_at: now,
    }
}

fn validate_bulk(request: &BulkRequest, max_days: u32) -> Result<()> {
    if request.date_to < request.date_from {
        return Err(Error::Validation(
            "Bulk end date must not be before start date".to_string(),
        ));
    }
    let span = (request.date_to - request.date_from).num_days() + 1;
    if span > i64::from(max_days) {
        return Err(Error::Validation(format!(
            "Bulk date range spans {} days, maximum is {}",
            span, max_days
        )));
    }
    if request.days.is_empty() {
        return Err(Error::Validation(
            "At least one day of the week is required".to_string(),
        ));
    }
    if request.templates.is_empty() {
        return Err(Error::Validation(
            "At least one time template is required".to_string(),
        ));
    }
    for template in &request.templates {
        if template.end <= template.start {
            return Err(Error::Validation(format!(
                "Template end time {} must be after start time {}",
                template.end, template.start
            )));
        }
    }
    Ok(())
}
