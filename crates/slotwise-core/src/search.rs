// Rust guideline compliant 2026-10-12

//! Availability search: the read path customers use before booking.
//!
//! Candidate providers are resolved first (explicit id, proximity or all
//! available providers), narrowed by service keyword, and then expanded into
//! their unbooked slots inside the requested range.

use crate::geo::{bounding_box, distance_km, validate_radius, GeoPoint};
use crate::interval::TimeRange;
use crate::models::{Provider, Service, Slot};
use crate::repository::Repository;
use crate::slots::SlotStore;
use crate::{Error, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The bounding box pre-filter is built on a slightly larger radius so the
/// flat-degree approximation never drops a point inside the exact radius.
const BBOX_PADDING: f64 = 1.01;

/// Search criteria.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    /// Case-insensitive substring matched against service category or name.
    pub keyword: Option<String>,
    /// Earliest slot start.
    pub from: NaiveDateTime,
    /// Latest slot end.
    pub to: NaiveDateTime,
    /// Minimum slot length in minutes.
    pub min_duration_minutes: Option<i64>,
    /// Customer location.
    pub location: Option<GeoPoint>,
    /// Search radius around `location`.
    pub radius_km: Option<f64>,
    /// Restrict to one provider.
    pub provider_id: Option<String>,
    /// Maximum number of results.
    pub limit: Option<usize>,
    /// Sort results by slot start.
    pub sort_by_start: bool,
}

impl SearchCriteria {
    /// Criteria for a date range with every other filter unset.
    #[must_use]
    pub fn between(from: NaiveDateTime, to: NaiveDateTime) -> Self {
        Self {
            keyword: None,
            from,
            to,
            min_duration_minutes: None,
            location: None,
            radius_km: None,
            provider_id: None,
            limit: None,
            sort_by_start: true,
        }
    }
}

/// One bookable slot in a search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotMatch {
    /// The unbooked slot.
    pub slot: Slot,
    /// Owning provider.
    pub provider_id: String,
    /// Provider display name.
    pub business_name: String,
    /// Distance from the customer, when a location was given.
    pub distance_km: Option<f64>,
    /// Slot length in minutes.
    pub duration_minutes: i64,
    /// Names of the provider's active services that matched.
    pub services: Vec<String>,
}

/// A provider with its distance from a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderDistance {
    /// The provider.
    pub provider: Provider,
    /// Minimum distance over the provider's own and its services' locations.
    pub distance_km: f64,
}

struct Candidate {
    provider: Provider,
    distance_km: Option<f64>,
}

/// Availability search over a repository.
pub struct AvailabilitySearch<'a, R: Repository> {
    repo: &'a R,
    default_radius_km: f64,
    default_limit: usize,
}

impl<'a, R: Repository> AvailabilitySearch<'a, R> {
    /// Creates a search with the radius and limit used when criteria omit them.
    pub fn new(repo: &'a R, default_radius_km: f64, default_limit: usize) -> Self {
        Self {
            repo,
            default_radius_km,
            default_limit,
        }
    }

    /// Finds bookable slots.
    ///
    /// No matching candidates or slots is an empty result, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The range is inverted, or the location, radius, limit or minimum duration is invalid
    /// - An explicit provider id does not exist
    pub fn search(&self, criteria: &SearchCriteria) -> Result<Vec<SlotMatch>> {
        let range = TimeRange::between(criteria.from, criteria.to)?;
        if let Some(location) = &criteria.location {
            location.validate()?;
        }
        let radius = criteria.radius_km.unwrap_or(self.default_radius_km);
        validate_radius(radius)?;
        let limit = criteria.limit.unwrap_or(self.default_limit);
        if limit == 0 {
            return Err(Error::Validation("Limit must be at least 1".to_string()));
        }
        if let Some(min) = criteria.min_duration_minutes {
            if min <= 0 {
                return Err(Error::Validation(
                    "Minimum duration must be positive".to_string(),
                ));
            }
        }

        let services = self.repo.services()?;
        let candidates = self.candidates(criteria, radius, &services)?;
        let keyword = criteria
            .keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty());

        let store = SlotStore::new(self.repo);
        let mut matches = Vec::new();
        for candidate in candidates {
            let offered: Vec<String> = services
                .iter()
                .filter(|s| s.provider_id == candidate.provider.id && s.active)
                .filter(|s| keyword.map_or(true, |k| s.matches_keyword(k)))
                .map(|s| s.name.clone())
                .collect();
            if keyword.is_some() && offered.is_empty() {
                continue;
            }

            let slots = match criteria.min_duration_minutes {
                Some(min) => store.list_with_min_duration(&candidate.provider.id, &range, min)?,
                None => store.list_unbooked(&candidate.provider.id, &range)?,
            };
            for slot in slots {
                matches.push(SlotMatch {
                    provider_id: candidate.provider.id.clone(),
                    business_name: candidate.provider.business_name.clone(),
                    distance_km: candidate.distance_km,
                    duration_minutes: slot.duration_minutes(),
                    services: offered.clone(),
                    slot,
                });
            }
        }

        matches.truncate(limit);
        if criteria.sort_by_start {
            matches.sort_by_key(|m| m.slot.start);
        }
        tracing::debug!(results = matches.len(), "availability search finished");
        Ok(matches)
    }

    /// Lists available providers within `radius_km` of `center`, nearest first.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid center or radius.
    pub fn nearby_providers(&self, center: &GeoPoint, radius_km: f64) -> Result<Vec<ProviderDistance>> {
        let services = self.repo.services()?;
        nearby(self.repo.providers()?, &services, center, radius_km)
    }

    /// Lists available providers whose own service radius covers `point`,
    /// nearest first.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid point.
    pub fn providers_serving(&self, point: &GeoPoint) -> Result<Vec<ProviderDistance>> {
        point.validate()?;
        let services = self.repo.services()?;
        let mut serving = Vec::new();
        for provider in self.repo.providers()? {
            if !provider.available {
                continue;
            }
            if let Some(distance_km) = min_distance(&provider, &services, point)? {
                if distance_km <= provider.service_radius_km {
                    serving.push(ProviderDistance {
                        provider,
                        distance_km,
                    });
                }
            }
        }
        sort_nearest(&mut serving);
        Ok(serving)
    }

    fn candidates(
        &self,
        criteria: &SearchCriteria,
        radius_km: f64,
        services: &[Service],
    ) -> Result<Vec<Candidate>> {
        if let Some(provider_id) = &criteria.provider_id {
            let provider = self.repo.provider(provider_id)?;
            let distance_km = match &criteria.location {
                Some(location) => min_distance(&provider, services, location)?,
                None => None,
            };
            return Ok(vec![Candidate {
                provider,
                distance_km,
            }]);
        }

        if let Some(location) = &criteria.location {
            let nearby = nearby(self.repo.providers()?, services, location, radius_km)?;
            return Ok(nearby
                .into_iter()
                .map(|pd| Candidate {
                    provider: pd.provider,
                    distance_km: Some(pd.distance_km),
                })
                .collect());
        }

        Ok(self
            .repo
            .providers()?
            .into_iter()
            .filter(|p| p.available)
            .map(|provider| Candidate {
                provider,
                distance_km: None,
            })
            .collect())
    }
}

fn nearby(
    providers: Vec<Provider>,
    services: &[Service],
    center: &GeoPoint,
    radius_km: f64,
) -> Result<Vec<ProviderDistance>> {
    let bbox = bounding_box(center, radius_km * BBOX_PADDING)?;
    let mut found = Vec::new();
    for provider in providers.into_iter().filter(|p| p.available) {
        let in_box = locations(&provider, services).any(|point| bbox.contains(point));
        if !in_box {
            continue;
        }
        if let Some(distance_km) = min_distance(&provider, services, center)? {
            if distance_km <= radius_km {
                found.push(ProviderDistance {
                    provider,
                    distance_km,
                });
            }
        }
    }
    sort_nearest(&mut found);
    Ok(found)
}

/// The provider's own location followed by those of its active services.
fn locations<'s>(provider: &'s Provider, services: &'s [Service]) -> impl Iterator<Item = &'s GeoPoint> {
    provider.location.iter().chain(
        services
            .iter()
            .filter(move |s| s.provider_id == provider.id && s.active)
            .filter_map(|s| s.location.as_ref()),
    )
}

fn min_distance(provider: &Provider, services: &[Service], point: &GeoPoint) -> Result<Option<f64>> {
    let mut best: Option<f64> = None;
    for location in locations(provider, services) {
        let d = distance_km(point, location)?;
        best = Some(best.map_or(d, |b| b.min(d)));
    }
    Ok(best)
}

fn sort_nearest(providers: &mut [ProviderDistance]) {
    providers.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
}
