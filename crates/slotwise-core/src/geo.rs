// Rust guideline compliant 2026-10-12

//! Geographic helpers: great-circle distance, radius checks and bounding boxes.
//!
//! All functions are pure. Distances are rounded to three decimal places
//! (meter precision) so that comparisons are deterministic.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the Haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Approximate length of one degree of latitude.
pub const KM_PER_DEGREE: f64 = 111.32;

const MILES_PER_KM: f64 = 0.621_371;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude, -90 to 90.
    pub latitude: f64,
    /// Longitude, -180 to 180.
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a validated point.
    ///
    /// # Errors
    ///
    /// Returns a validation error if either coordinate is out of range or not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let point = Self {
            latitude,
            longitude,
        };
        point.validate()?;
        Ok(point)
    }

    /// Returns true if both coordinates are within range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Validates the coordinate ranges.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the offending point.
    pub fn validate(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(Error::Validation(format!(
                "Coordinates out of range: ({}, {})",
                self.latitude, self.longitude
            )))
        }
    }
}

/// Axis-aligned latitude/longitude rectangle around a search circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Southern edge.
    pub min_lat: f64,
    /// Northern edge.
    pub max_lat: f64,
    /// Western edge.
    pub min_lon: f64,
    /// Eastern edge.
    pub max_lon: f64,
}

impl BoundingBox {
    /// Returns true if the point lies inside the box (edges inclusive).
    #[must_use]
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.latitude >= self.min_lat
            && point.latitude <= self.max_lat
            && point.longitude >= self.min_lon
            && point.longitude <= self.max_lon
    }
}

/// Distance between two points in both units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    /// Kilometers, rounded to three decimals.
    pub km: f64,
    /// Miles, rounded to three decimals.
    pub miles: f64,
}

/// Computes the Haversine great-circle distance in kilometers.
///
/// # Arguments
///
/// * `a` - First point
/// * `b` - Second point
///
/// # Returns
///
/// The distance rounded to three decimal places.
///
/// # Errors
///
/// Returns a validation error if either point is out of range.
pub fn distance_km(a: &GeoPoint, b: &GeoPoint) -> Result<f64> {
    a.validate()?;
    b.validate()?;

    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = ((delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    Ok(round3(EARTH_RADIUS_KM * c))
}

/// Computes the distance in kilometers and miles.
///
/// # Errors
///
/// Returns a validation error if either point is out of range.
pub fn distance(a: &GeoPoint, b: &GeoPoint) -> Result<Distance> {
    let km = distance_km(a, b)?;
    Ok(Distance {
        km,
        miles: km_to_miles(km),
    })
}

/// Converts kilometers to miles, rounded to three decimals.
#[must_use]
pub fn km_to_miles(km: f64) -> f64 {
    round3(km * MILES_PER_KM)
}

/// Returns true iff `point` is within `radius_km` of `center` (inclusive).
///
/// # Errors
///
/// Returns a validation error if the radius is not positive or a point is out of range.
pub fn within_radius(center: &GeoPoint, point: &GeoPoint, radius_km: f64) -> Result<bool> {
    validate_radius(radius_km)?;
    Ok(distance_km(center, point)? <= radius_km)
}

/// Computes the approximate bounding box of a search circle.
///
/// One degree of latitude is taken as 111.32 km; the longitude span is scaled
/// by the cosine of the center latitude. Edges are clamped to valid ranges.
///
/// # Errors
///
/// Returns a validation error if the center is invalid or the radius is not positive.
pub fn bounding_box(center: &GeoPoint, radius_km: f64) -> Result<BoundingBox> {
    center.validate()?;
    validate_radius(radius_km)?;

    let lat_offset = radius_km / KM_PER_DEGREE;
    let lon_scale = KM_PER_DEGREE * center.latitude.to_radians().cos();
    // At the poles the longitude span covers everything.
    let lon_offset = if lon_scale.abs() < 1e-9 {
        360.0
    } else {
        radius_km / lon_scale
    };

    Ok(BoundingBox {
        min_lat: (center.latitude - lat_offset).max(-90.0),
        max_lat: (center.latitude + lat_offset).min(90.0),
        min_lon: (center.longitude - lon_offset).max(-180.0),
        max_lon: (center.longitude + lon_offset).min(180.0),
    })
}

/// Rejects zero, negative and non-finite radii.
///
/// # Errors
///
/// Returns a validation error for an unusable radius.
pub fn validate_radius(radius_km: f64) -> Result<()> {
    if radius_km.is_finite() && radius_km > 0.0 {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "Radius must be a positive number of kilometers, got {}",
            radius_km
        )))
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
