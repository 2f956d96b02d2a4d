//! The proximity search: query, widen once if empty, normalize, evaluate,
//! filter, order.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use opennow_core::{Amenity, AppConfig, Coordinate, OpenStatus};
use opennow_overpass::{MirrorClient, OverpassResponse, QueryRequest};
use serde::Serialize;

use crate::error::SearchError;
use crate::normalize::{normalize_element, NormalizedPoi};
use crate::query::build_overpass_query;
use crate::timezone::TimezoneResolver;

/// One search call's inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchRequest {
    pub center: Coordinate,
    pub radius_m: u32,
    /// Keep only POIs whose status is [`OpenStatus::Open`].
    pub open_only: bool,
}

/// Tunables that stay fixed across searches.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    pub amenity: Amenity,
    /// Upper bound for the widened radius. A request at or above it is never
    /// widened.
    pub max_radius_m: u32,
    pub widen_step_m: u32,
    pub widen_factor: f64,
    /// Per-attempt HTTP timeout.
    pub request_timeout_secs: u64,
    /// Server-side `[timeout:N]` in the query text.
    pub query_timeout_secs: u64,
    pub default_timezone: Tz,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            amenity: Amenity::Pharmacy,
            max_radius_m: 3000,
            widen_step_m: 800,
            widen_factor: 1.6,
            request_timeout_secs: 45,
            query_timeout_secs: 25,
            default_timezone: chrono_tz::Asia::Seoul,
        }
    }
}

impl SearchSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig, amenity: Amenity) -> Self {
        Self {
            amenity,
            max_radius_m: config.search_max_radius_m,
            request_timeout_secs: config.overpass_request_timeout_secs,
            query_timeout_secs: config.overpass_query_timeout_secs,
            default_timezone: config.default_timezone,
            ..Self::default()
        }
    }
}

/// Result of a successful search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    /// Ordered open, unknown, closed; nearest first within each group.
    pub pois: Vec<NormalizedPoi>,
    /// Radius of the query that produced `pois`.
    pub radius_m: u32,
    pub widened: bool,
    /// Raw elements returned by the final query.
    pub fetched: usize,
    /// Elements skipped as undecodable or for lacking a usable coordinate.
    pub dropped: usize,
    /// POIs removed by `open_only`.
    pub filtered_out: usize,
}

/// Radius for the single widening pass, or `None` when `radius_m` is already
/// at or past `max_radius_m`.
///
/// The new radius is `min(max, max(radius + step, round(radius * factor)))`.
#[must_use]
pub fn widened_radius(radius_m: u32, max_radius_m: u32, step_m: u32, factor: f64) -> Option<u32> {
    if radius_m >= max_radius_m {
        return None;
    }
    let scaled = (f64::from(radius_m) * factor).round();
    // Clamped to the u32 range before the cast.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let scaled = scaled.clamp(0.0, f64::from(u32::MAX)) as u32;
    let grown = radius_m.saturating_add(step_m).max(scaled);
    Some(grown.min(max_radius_m))
}

/// Sorts open first, then unknown, then closed; ascending distance within a
/// group. Stable, so equal entries keep their input order.
pub fn sort_pois(pois: &mut [NormalizedPoi]) {
    pois.sort_by(|a, b| {
        a.status
            .display_rank()
            .cmp(&b.status.display_rank())
            .then_with(|| a.distance_m.total_cmp(&b.distance_m))
    });
}

/// Finds amenities around a point and annotates each with its open status.
///
/// Stateless between calls; share one instance across tasks.
#[derive(Debug)]
pub struct ProximitySearch<R> {
    client: MirrorClient,
    resolver: R,
    settings: SearchSettings,
}

impl<R: TimezoneResolver> ProximitySearch<R> {
    #[must_use]
    pub fn new(client: MirrorClient, resolver: R, settings: SearchSettings) -> Self {
        Self {
            client,
            resolver,
            settings,
        }
    }

    /// Runs one search at `now`.
    ///
    /// An empty first result below the maximum radius triggers exactly one
    /// re-query at [`widened_radius`]. Elements without coordinates are
    /// skipped; everything else gets a status before `open_only` filters.
    ///
    /// # Errors
    ///
    /// - [`SearchError::InvalidCenter`] / [`SearchError::ZeroRadius`] for bad
    ///   input, before any request is sent.
    /// - [`SearchError::Fetch`] when the Overpass client gives up. No partial
    ///   results are returned.
    pub async fn search(
        &self,
        request: &SearchRequest,
        now: DateTime<Utc>,
    ) -> Result<SearchOutcome, SearchError> {
        if !request.center.is_valid() {
            return Err(SearchError::InvalidCenter(request.center));
        }
        if request.radius_m == 0 {
            return Err(SearchError::ZeroRadius);
        }

        let mut radius_m = request.radius_m;
        let mut widened = false;
        let mut response = self.fetch(request.center, radius_m).await?;

        if response.elements.is_empty() && response.undecodable == 0 {
            if let Some(next) = widened_radius(
                radius_m,
                self.settings.max_radius_m,
                self.settings.widen_step_m,
                self.settings.widen_factor,
            ) {
                tracing::info!(
                    center = %request.center,
                    from_m = radius_m,
                    to_m = next,
                    "no results, widening search radius"
                );
                radius_m = next;
                widened = true;
                response = self.fetch(request.center, radius_m).await?;
            }
        }

        let fetched = response.elements.len() + response.undecodable;
        let mut dropped = response.undecodable;
        let mut pois = Vec::with_capacity(fetched);
        for element in &response.elements {
            match normalize_element(
                element,
                request.center,
                now,
                &self.resolver,
                self.settings.default_timezone,
            ) {
                Ok(poi) => pois.push(poi),
                Err(e) => {
                    dropped += 1;
                    tracing::debug!(error = %e, "skipping element");
                }
            }
        }

        let before_filter = pois.len();
        if request.open_only {
            pois.retain(|poi| poi.status == OpenStatus::Open);
        }
        let filtered_out = before_filter - pois.len();
        sort_pois(&mut pois);

        tracing::info!(
            center = %request.center,
            radius_m,
            widened,
            fetched,
            dropped,
            filtered_out,
            returned = pois.len(),
            "search complete"
        );

        Ok(SearchOutcome {
            pois,
            radius_m,
            widened,
            fetched,
            dropped,
            filtered_out,
        })
    }

    async fn fetch(
        &self,
        center: Coordinate,
        radius_m: u32,
    ) -> Result<OverpassResponse, SearchError> {
        let query = build_overpass_query(
            self.settings.amenity,
            center,
            radius_m,
            self.settings.query_timeout_secs,
        );
        let request = QueryRequest {
            center,
            radius_m,
            timeout_secs: self.settings.request_timeout_secs,
        };
        Ok(self.client.execute(&request, &query).await?)
    }
}
