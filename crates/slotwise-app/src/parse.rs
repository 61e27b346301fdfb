// Rust guideline compliant 2026-10-12

//! Parsing helpers for command-line and tool inputs.

use crate::error::{AppError, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use slotwise_core::{Actor, BookingStatus, GeoPoint};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses a booking status string into a `BookingStatus` value.
///
/// Accepts snake case, kebab case and upper case spellings.
///
/// # Errors
///
/// Returns an error if the status is invalid.
pub fn parse_status(value: &str) -> Result<BookingStatus> {
    match value.to_lowercase().replace('-', "_").as_str() {
        "pending" => Ok(BookingStatus::Pending),
        "confirmed" => Ok(BookingStatus::Confirmed),
        "in_progress" => Ok(BookingStatus::InProgress),
        "completed" => Ok(BookingStatus::Completed),
        "cancelled" | "canceled" => Ok(BookingStatus::Cancelled),
        _ => Err(AppError::InvalidInput(format!(
            "Invalid booking status: {}",
            value
        ))),
    }
}

/// Parses a weekday name (`mon`, `monday`, ...).
///
/// # Errors
///
/// Returns an error for anything chrono does not recognize as a weekday.
pub fn parse_weekday(value: &str) -> Result<Weekday> {
    value
        .trim()
        .parse::<Weekday>()
        .map_err(|_| AppError::InvalidInput(format!("Invalid weekday: {}", value)))
}

/// Parses a comma-separated weekday list such as `mon,wed,fri`.
///
/// Duplicates are dropped; order of first appearance is kept.
///
/// # Errors
///
/// Returns an error if the list is empty or holds an invalid weekday.
pub fn parse_weekdays(value: &str) -> Result<Vec<Weekday>> {
    let mut days = Vec::new();
    for part in value.split(',').filter(|p| !p.trim().is_empty()) {
        let day = parse_weekday(part)?;
        if !days.contains(&day) {
            days.push(day);
        }
    }
    if days.is_empty() {
        return Err(AppError::InvalidInput("At least one weekday is required".to_string()));
    }
    Ok(days)
}

/// Parses a local date-time such as `2030-03-04T09:30`.
///
/// # Errors
///
/// Returns an error if no supported format matches.
pub fn parse_datetime(value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Invalid date-time '{}': expected YYYY-MM-DDTHH:MM",
                value
            ))
        })
}

/// Parses a calendar date such as `2030-03-04`.
///
/// # Errors
///
/// Returns an error if the value is not `YYYY-MM-DD`.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::InvalidInput(format!("Invalid date '{}': expected YYYY-MM-DD", value))
    })
}

/// Parses a time of day such as `09:00`.
///
/// # Errors
///
/// Returns an error if the value is not `HH:MM` or `HH:MM:SS`.
pub fn parse_time(value: &str) -> Result<NaiveTime> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| AppError::InvalidInput(format!("Invalid time '{}': expected HH:MM", value)))
}

/// Parses an acting identity written as `role:id`.
///
/// # Examples
///
/// `customer:cus-42` or `provider:prv-1a2b3c4d5e`.
///
/// # Errors
///
/// Returns an error for an unknown role or an empty id.
pub fn parse_actor(value: &str) -> Result<Actor> {
    let (role, id) = value.split_once(':').ok_or_else(|| {
        AppError::InvalidInput(format!("Invalid actor '{}': expected role:id", value))
    })?;
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "Invalid actor '{}': id is empty",
            value
        )));
    }
    match role.trim().to_lowercase().as_str() {
        "customer" => Ok(Actor::customer(id)),
        "provider" => Ok(Actor::provider(id)),
        other => Err(AppError::InvalidInput(format!(
            "Invalid actor role '{}': expected customer or provider",
            other
        ))),
    }
}

/// Parses a `latitude,longitude` pair.
///
/// # Errors
///
/// Returns an error if either number is missing or out of range.
pub fn parse_location(value: &str) -> Result<GeoPoint> {
    let (lat, lon) = value.split_once(',').ok_or_else(|| {
        AppError::InvalidInput(format!("Invalid location '{}': expected lat,lon", value))
    })?;
    let parse = |part: &str| {
        part.trim()
            .parse::<f64>()
            .map_err(|_| AppError::InvalidInput(format!("Invalid coordinate: {}", part.trim())))
    };
    Ok(GeoPoint::new(parse(lat)?, parse(lon)?)?)
}
