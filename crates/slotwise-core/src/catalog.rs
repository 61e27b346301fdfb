// Rust guideline compliant 2026-10-12

//! Provider and service catalog records.
//!
//! Registration and profile management belong to other systems; these
//! helpers validate and store the records the scheduling core reads.

use crate::geo::GeoPoint;
use crate::models::{Provider, Service};
use crate::repository::Repository;
use crate::Result;
use chrono::NaiveDateTime;

/// Input for a new provider.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProvider {
    /// Display name.
    pub business_name: String,
    /// Geographic anchor.
    pub location: Option<GeoPoint>,
    /// Travel radius; the model default applies when unset.
    pub service_radius_km: Option<f64>,
}

/// Input for a new service.
#[derive(Debug, Clone, PartialEq)]
pub struct NewService {
    /// Display name.
    pub name: String,
    /// Category keyword.
    pub category: String,
    /// Price in minor currency units.
    pub price_cents: u64,
    /// Declared duration.
    pub duration_minutes: Option<u32>,
    /// Service-specific location.
    pub location: Option<GeoPoint>,
}

/// Registers a provider.
///
/// # Errors
///
/// Returns a validation error for an empty name, a bad location or a
/// non-positive radius.
pub fn register_provider<R: Repository>(repo: &R, input: NewProvider, now: NaiveDateTime) -> Result<Provider> {
    let mut provider = Provider::new(input.business_name.trim().to_string(), input.location, now);
    if let Some(radius) = input.service_radius_km {
        provider.service_radius_km = radius;
    }
    provider.validate()?;
    repo.save_provider(&provider)?;
    tracing::info!(provider_id = %provider.id, "provider registered");
    Ok(provider)
}

/// Registers a service for an existing provider.
///
/// # Errors
///
/// Returns `NotFound` for an unknown provider or a validation error for a
/// malformed service.
pub fn register_service<R: Repository>(repo: &R, provider_id: &str, input: NewService) -> Result<Service> {
    repo.provider(provider_id)?;
    let mut service = Service::new(
        provider_id.to_string(),
        input.name.trim().to_string(),
        input.category.trim().to_string(),
        input.price_cents,
    );
    service.duration_minutes = input.duration_minutes;
    service.location = input.location;
    service.validate()?;
    repo.save_service(&service)?;
    tracing::info!(provider_id, service_id = %service.id, "service registered");
    Ok(service)
}

/// Toggles whether a provider accepts bookings and appears in search.
///
/// # Errors
///
/// Returns `NotFound` for an unknown provider.
pub fn set_provider_available<R: Repository>(repo: &R, provider_id: &str, available: bool) -> Result<Provider> {
    let provider = repo.update_provider(provider_id, |provider| provider.available = available)?;
    tracing::info!(provider_id, available, "provider availability changed");
    Ok(provider)
}
