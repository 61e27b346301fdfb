// Rust guideline compliant 2026-10-12

//! Output formatting module for the Slotwise CLI.
//!
//! This module renders providers, slots, search results and bookings in
//! the three output formats (JSON, table, plain text). JSON output is
//! always wrapped in the shared success and error envelopes.

use crate::terminal::{fit_to_width, terminal_width};
use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::{json, Value};
use slotwise_app::{AppError, ErrorEnvelope, SuccessEnvelope};
use slotwise_core::{
    Booking, BulkOutcome, Distance, Provider, ProviderDistance, ProviderStats, Service, Slot,
    SkipReason, SlotMatch,
};
use std::io::Write;
use tabled::{builder::Builder, settings::Style};
use termcolor::{Buffer, Color, ColorSpec, WriteColor};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Output formatter trait.
///
/// Defines how each kind of command result is rendered.
pub trait OutputFormatter {
    /// Formats a single provider.
    fn format_provider(&self, provider: &Provider) -> String;

    /// Formats a list of providers.
    fn format_providers(&self, providers: &[Provider]) -> String;

    /// Formats providers with their distance from a point.
    fn format_nearby(&self, providers: &[ProviderDistance]) -> String;

    /// Formats a list of services.
    fn format_services(&self, services: &[Service]) -> String;

    /// Formats a single slot.
    fn format_slot(&self, slot: &Slot) -> String;

    /// Formats a list of slots.
    fn format_slots(&self, slots: &[Slot]) -> String;

    /// Formats the result of bulk slot generation.
    fn format_bulk(&self, outcome: &BulkOutcome) -> String;

    /// Formats availability search results.
    fn format_matches(&self, matches: &[SlotMatch]) -> String;

    /// Formats a single booking.
    fn format_booking(&self, booking: &Booking) -> String;

    /// Formats a list of bookings.
    fn format_bookings(&self, bookings: &[Booking]) -> String;

    /// Formats provider booking statistics.
    fn format_stats(&self, stats: &ProviderStats) -> String;

    /// Formats a distance between two points.
    fn format_distance(&self, distance: &Distance) -> String;

    /// Formats a short confirmation message.
    fn format_message(&self, message: &str) -> String;

    /// Formats an error for display.
    fn format_error(&self, error: &AppError) -> String;
}

fn time(value: NaiveDateTime) -> String {
    value.format(TIME_FORMAT).to_string()
}

fn price(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// JSON output formatter.
///
/// Every result is wrapped in a `SuccessEnvelope`; errors use `ErrorEnvelope`.
pub struct JsonFormatter;

impl JsonFormatter {
    fn ok<T: Serialize>(result: T) -> String {
        serde_json::to_string_pretty(&SuccessEnvelope::new(result)).unwrap_or_else(|err| {
            json!({ "status": "error", "code": "json_error", "message": err.to_string() })
                .to_string()
        })
    }

    fn list<T: Serialize>(key: &str, items: &[T]) -> String {
        let mut body = serde_json::Map::new();
        body.insert(key.to_string(), json!(items));
        body.insert("total".to_string(), json!(items.len()));
        Self::ok(Value::Object(body))
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_provider(&self, provider: &Provider) -> String {
        Self::ok(provider)
    }

    fn format_providers(&self, providers: &[Provider]) -> String {
        Self::list("providers", providers)
    }

    fn format_nearby(&self, providers: &[ProviderDistance]) -> String {
        Self::list("providers", providers)
    }

    fn format_services(&self, services: &[Service]) -> String {
        Self::list("services", services)
    }

    fn format_slot(&self, slot: &Slot) -> String {
        Self::ok(slot)
    }

    fn format_slots(&self, slots: &[Slot]) -> String {
        Self::list("slots", slots)
    }

    fn format_bulk(&self, outcome: &BulkOutcome) -> String {
        Self::ok(json!({
            "created": outcome.created,
            "skipped": outcome.skipped,
            "created_count": outcome.created.len(),
            "skipped_count": outcome.skipped.len(),
        }))
    }

    fn format_matches(&self, matches: &[SlotMatch]) -> String {
        Self::list("matches", matches)
    }

    fn format_booking(&self, booking: &Booking) -> String {
        Self::ok(booking)
    }

    fn format_bookings(&self, bookings: &[Booking]) -> String {
        Self::list("bookings", bookings)
    }

    fn format_stats(&self, stats: &ProviderStats) -> String {
        Self::ok(stats)
    }

    fn format_distance(&self, distance: &Distance) -> String {
        Self::ok(distance)
    }

    fn format_message(&self, message: &str) -> String {
        Self::ok(json!({ "message": message }))
    }

    fn format_error(&self, error: &AppError) -> String {
        serde_json::to_string_pretty(&ErrorEnvelope::from_error(error))
            .unwrap_or_else(|_| json!({ "status": "error", "message": error.to_string() }).to_string())
    }
}

/// Table output formatter.
///
/// Formats results as human-readable tables.
pub struct TableFormatter {
    use_color: bool,
}

impl TableFormatter {
    /// Creates a new table formatter.
    ///
    /// # Arguments
    /// * `use_color` - Whether to use colored output
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn table(header: &[&str], rows: Vec<Vec<String>>) -> String {
        let mut builder = Builder::default();
        builder.push_record(header.iter().map(|h| h.to_string()));
        for row in rows {
            builder.push_record(row);
        }
        let mut table = builder.build();
        table.with(Style::modern());
        table.to_string()
    }

    fn slot_rows(slots: &[Slot]) -> Vec<Vec<String>> {
        slots
            .iter()
            .map(|slot| {
                vec![
                    slot.id.clone(),
                    time(slot.start),
                    time(slot.end),
                    slot.duration_minutes().to_string(),
                    yes_no(slot.is_booked).to_string(),
                    optional(slot.recurrence.map(|r| r.day_of_week)),
                ]
            })
            .collect()
    }
}

impl OutputFormatter for TableFormatter {
    fn format_provider(&self, provider: &Provider) -> String {
        let mut output = String::new();
        output.push_str(&format!("ID:          {}\n", provider.id));
        output.push_str(&format!("Name:        {}\n", provider.business_name));
        if let Some(location) = provider.location {
            output.push_str(&format!(
                "Location:    {}, {}\n",
                location.latitude, location.longitude
            ));
        }
        output.push_str(&format!("Radius km:   {}\n", provider.service_radius_km));
        output.push_str(&format!("Available:   {}\n", yes_no(provider.available)));
        output.push_str(&format!("Created:     {}\n", time(provider.created_at)));
        output
    }

    fn format_providers(&self, providers: &[Provider]) -> String {
        if providers.is_empty() {
            return "No providers found.".to_string();
        }
        let rows = providers
            .iter()
            .map(|p| {
                vec![
                    p.id.clone(),
                    p.business_name.clone(),
                    p.service_radius_km.to_string(),
                    yes_no(p.available).to_string(),
                ]
            })
            .collect();
        Self::table(&["ID", "Name", "Radius km", "Available"], rows)
    }

    fn format_nearby(&self, providers: &[ProviderDistance]) -> String {
        if providers.is_empty() {
            return "No providers found.".to_string();
        }
        let rows = providers
            .iter()
            .map(|p| {
                vec![
                    p.provider.id.clone(),
                    p.provider.business_name.clone(),
                    format!("{:.3}", p.distance_km),
                ]
            })
            .collect();
        Self::table(&["ID", "Name", "Distance km"], rows)
    }

    fn format_services(&self, services: &[Service]) -> String {
        if services.is_empty() {
            return "No services found.".to_string();
        }
        let rows = services
            .iter()
            .map(|s| {
                vec![
                    s.id.clone(),
                    s.provider_id.clone(),
                    s.name.clone(),
                    s.category.clone(),
                    price(s.price_cents),
                    optional(s.duration_minutes),
                    yes_no(s.active).to_string(),
                ]
            })
            .collect();
        Self::table(
            &["ID", "Provider", "Name", "Category", "Price", "Minutes", "Active"],
            rows,
        )
    }

    fn format_slot(&self, slot: &Slot) -> String {
        let mut output = String::new();
        output.push_str(&format!("ID:          {}\n", slot.id));
        output.push_str(&format!("Provider:    {}\n", slot.provider_id));
        output.push_str(&format!("Start:       {}\n", time(slot.start)));
        output.push_str(&format!("End:         {}\n", time(slot.end)));
        output.push_str(&format!("Booked:      {}\n", yes_no(slot.is_booked)));
        if let Some(recurrence) = slot.recurrence {
            output.push_str(&format!(
                "Repeats:     {} {}-{}\n",
                recurrence.day_of_week,
                recurrence.start_time.format("%H:%M"),
                recurrence.end_time.format("%H:%M")
            ));
        }
        if let Some(notes) = &slot.notes {
            output.push_str(&format!("Notes:       {}\n", notes));
        }
        output
    }

    fn format_slots(&self, slots: &[Slot]) -> String {
        if slots.is_empty() {
            return "No slots found.".to_string();
        }
        Self::table(
            &["ID", "Start", "End", "Minutes", "Booked", "Repeats"],
            Self::slot_rows(slots),
        )
    }

    fn format_bulk(&self, outcome: &BulkOutcome) -> String {
        let mut output = format!(
            "Created {} slot(s), skipped {}.\n",
            outcome.created.len(),
            outcome.skipped.len()
        );
        if !outcome.created.is_empty() {
            output.push_str(&self.format_slots(&outcome.created));
            output.push('\n');
        }
        for skipped in &outcome.skipped {
            let line = match skipped.reason {
                SkipReason::Overlap => {
                    let reasons: Vec<String> =
                        skipped.conflicts.iter().map(ToString::to_string).collect();
                    format!("  skipped {} (overlaps {})", skipped.interval, reasons.join(", "))
                }
                SkipReason::NotInFuture => {
                    format!("  skipped {} (already started)", skipped.interval)
                }
            };
            output.push_str(&fit_to_width(&line, terminal_width()));
            output.push('\n');
        }
        output
    }

    fn format_matches(&self, matches: &[SlotMatch]) -> String {
        if matches.is_empty() {
            return "No available slots found.".to_string();
        }
        let rows = matches
            .iter()
            .map(|m| {
                vec![
                    m.slot.id.clone(),
                    m.business_name.clone(),
                    time(m.slot.start),
                    m.duration_minutes.to_string(),
                    m.distance_km
                        .map(|d| format!("{:.3}", d))
                        .unwrap_or_else(|| "-".to_string()),
                    m.services.join(", "),
                ]
            })
            .collect();
        Self::table(
            &["Slot", "Provider", "Start", "Minutes", "Distance km", "Services"],
            rows,
        )
    }

    fn format_booking(&self, booking: &Booking) -> String {
        let mut output = String::new();
        output.push_str(&format!("ID:          {}\n", booking.id));
        output.push_str(&format!("Status:      {}\n", booking.status));
        output.push_str(&format!("Customer:    {}\n", booking.customer_id));
        output.push_str(&format!("Provider:    {}\n", booking.provider_id));
        output.push_str(&format!("Service:     {}\n", booking.service_id));
        output.push_str(&format!("Scheduled:   {}\n", time(booking.scheduled_at)));
        output.push_str(&format!("Ends:        {}\n", time(booking.estimated_end)));
        output.push_str(&format!("Price:       {}\n", price(booking.total_price_cents)));
        if let Some(slot_id) = &booking.slot_id {
            output.push_str(&format!("Slot:        {}\n", slot_id));
        }
        if let Some(started) = booking.actual_start {
            output.push_str(&format!("Started:     {}\n", time(started)));
        }
        if let Some(ended) = booking.actual_end {
            output.push_str(&format!("Finished:    {}\n", time(ended)));
        }
        if let Some(notes) = &booking.notes {
            output.push_str(&format!("Notes:       {}\n", notes));
        }
        if let Some(cancellation) = &booking.cancellation {
            output.push_str(&format!(
                "Cancelled:   by {} at {}: {}\n",
                cancellation.cancelled_by,
                time(cancellation.cancelled_at),
                cancellation.reason
            ));
        }
        output
    }

    fn format_bookings(&self, bookings: &[Booking]) -> String {
        if bookings.is_empty() {
            return "No bookings found.".to_string();
        }
        let rows = bookings
            .iter()
            .map(|b| {
                vec![
                    b.id.clone(),
                    b.status.to_string(),
                    time(b.scheduled_at),
                    b.duration_minutes.to_string(),
                    b.customer_id.clone(),
                    b.provider_id.clone(),
                    price(b.total_price_cents),
                ]
            })
            .collect();
        Self::table(
            &["ID", "Status", "Scheduled", "Minutes", "Customer", "Provider", "Price"],
            rows,
        )
    }

    fn format_stats(&self, stats: &ProviderStats) -> String {
        Self::table(
            &["Total", "Active", "Completed", "Cancelled"],
            vec![vec![
                stats.total.to_string(),
                stats.active.to_string(),
                stats.completed.to_string(),
                stats.cancelled.to_string(),
            ]],
        )
    }

    fn format_distance(&self, distance: &Distance) -> String {
        format!("{:.3} km ({:.3} mi)", distance.km, distance.miles)
    }

    fn format_message(&self, message: &str) -> String {
        format!("✓ {}", message)
    }

    fn format_error(&self, error: &AppError) -> String {
        if !self.use_color {
            return format!("Error: {}", error);
        }
        let mut buffer = Buffer::ansi();
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
        let _ = write!(buffer, "Error: ");
        let _ = buffer.reset();
        let _ = write!(buffer, "{}", error);
        String::from_utf8_lossy(buffer.as_slice()).to_string()
    }
}

/// Plain text output formatter.
///
/// One record per line, space separated, for shell pipelines.
pub struct PlainFormatter;

impl OutputFormatter for PlainFormatter {
    fn format_provider(&self, provider: &Provider) -> String {
        format!(
            "{} {} {} {}",
            provider.id,
            provider.service_radius_km,
            yes_no(provider.available),
            provider.business_name
        )
    }

    fn format_providers(&self, providers: &[Provider]) -> String {
        providers
            .iter()
            .map(|p| self.format_provider(p))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_nearby(&self, providers: &[ProviderDistance]) -> String {
        providers
            .iter()
            .map(|p| format!("{} {:.3} {}", p.provider.id, p.distance_km, p.provider.business_name))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_services(&self, services: &[Service]) -> String {
        services
            .iter()
            .map(|s| format!("{} {} {} {}", s.id, s.provider_id, s.category, s.name))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_slot(&self, slot: &Slot) -> String {
        format!(
            "{} {} {} {}",
            slot.id,
            slot.start.format("%Y-%m-%dT%H:%M"),
            slot.end.format("%Y-%m-%dT%H:%M"),
            if slot.is_booked { "booked" } else { "open" }
        )
    }

    fn format_slots(&self, slots: &[Slot]) -> String {
        slots
            .iter()
            .map(|s| self.format_slot(s))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_bulk(&self, outcome: &BulkOutcome) -> String {
        let mut lines: Vec<String> = outcome.created.iter().map(|s| self.format_slot(s)).collect();
        lines.extend(
            outcome
                .skipped
                .iter()
                .map(|s| format!("skipped {}", s.interval)),
        );
        lines.join("\n")
    }

    fn format_matches(&self, matches: &[SlotMatch]) -> String {
        matches
            .iter()
            .map(|m| {
                format!(
                    "{} {} {} {}",
                    m.slot.id,
                    m.provider_id,
                    m.slot.start.format("%Y-%m-%dT%H:%M"),
                    optional(m.distance_km)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_booking(&self, booking: &Booking) -> String {
        format!(
            "{} {} {} {}",
            booking.id,
            booking.status,
            booking.scheduled_at.format("%Y-%m-%dT%H:%M"),
            booking.provider_id
        )
    }

    fn format_bookings(&self, bookings: &[Booking]) -> String {
        bookings
            .iter()
            .map(|b| self.format_booking(b))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_stats(&self, stats: &ProviderStats) -> String {
        format!(
            "total={} active={} completed={} cancelled={}",
            stats.total, stats.active, stats.completed, stats.cancelled
        )
    }

    fn format_distance(&self, distance: &Distance) -> String {
        format!("{} {}", distance.km, distance.miles)
    }

    fn format_message(&self, message: &str) -> String {
        message.to_string()
    }

    fn format_error(&self, error: &AppError) -> String {
        format!("Error: {}", error)
    }
}

/// Factory function to create an appropriate formatter.
///
/// # Arguments
/// * `format` - The desired output format ("json", "table", or "plain")
/// * `use_color` - Whether to use colored output (ignored for JSON)
pub fn create_formatter(format: &str, use_color: bool) -> Box<dyn OutputFormatter> {
    match format {
        "json" => Box::new(JsonFormatter),
        "plain" => Box::new(PlainFormatter),
        _ => Box::new(TableFormatter::new(use_color)),
    }
}
