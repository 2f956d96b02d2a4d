//! Conversion from raw Overpass elements to [`NormalizedPoi`]s.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use opennow_core::{Coordinate, OpenStatus};
use opennow_hours::evaluate_opening_hours;
use opennow_overpass::{ElementKind, ElementTags, RawElement};
use serde::Serialize;

use crate::error::MalformedRecord;
use crate::geo::haversine_m;
use crate::timezone::{resolve_or_default, TimezoneResolver};

/// Display name for elements without a `name` or `alt_name` tag.
pub const UNNAMED_PLACEHOLDER: &str = "(unnamed)";

/// One search hit, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedPoi {
    pub name: String,
    /// Great-circle distance from the search center.
    pub distance_m: f64,
    pub phone: Option<String>,
    pub opening_hours_raw: Option<String>,
    pub status: OpenStatus,
    pub position: Coordinate,
    /// IANA zone the opening hours were evaluated in.
    pub timezone: String,
    pub osm_kind: ElementKind,
    pub osm_id: i64,
}

/// Normalizes a raw element against the search `center`.
///
/// Status is evaluated at `now` converted to the element's own zone, or to
/// `default_tz` when the resolver cannot place it.
///
/// # Errors
///
/// Returns [`MalformedRecord::MissingCoordinate`] when neither the element
/// nor its centroid carries a valid position.
pub fn normalize_element<R: TimezoneResolver + ?Sized>(
    element: &RawElement,
    center: Coordinate,
    now: DateTime<Utc>,
    resolver: &R,
    default_tz: Tz,
) -> Result<NormalizedPoi, MalformedRecord> {
    let position = element_position(element).ok_or(MalformedRecord::MissingCoordinate {
        kind: element.kind,
        id: element.id,
    })?;

    let empty = ElementTags::default();
    let tags = element.tags.as_ref().unwrap_or(&empty);

    let name = first_present([tags.name.as_deref(), tags.alt_name.as_deref()])
        .unwrap_or(UNNAMED_PLACEHOLDER)
        .to_string();
    let phone = first_present([tags.phone.as_deref(), tags.contact_phone.as_deref()])
        .map(str::to_string);
    let opening_hours_raw = first_present([tags.opening_hours.as_deref()]).map(str::to_string);

    let tz = resolve_or_default(resolver, position, default_tz);
    let local_now = now.with_timezone(&tz);
    let status = evaluate_opening_hours(opening_hours_raw.as_deref(), &local_now);

    Ok(NormalizedPoi {
        name,
        distance_m: haversine_m(center, position),
        phone,
        opening_hours_raw,
        status,
        position,
        timezone: tz.name().to_string(),
        osm_kind: element.kind,
        osm_id: element.id,
    })
}

/// Nodes carry their own position; ways and relations use the server-side
/// centroid from `out center`.
fn element_position(element: &RawElement) -> Option<Coordinate> {
    let coord = match element.kind {
        ElementKind::Node => Coordinate::new(element.lat?, element.lon?),
        ElementKind::Way | ElementKind::Relation | ElementKind::Other => {
            let c = element.center?;
            Coordinate::new(c.lat, c.lon)
        }
    };
    coord.is_valid().then_some(coord)
}

/// First candidate that is present and not blank, trimmed.
fn first_present<'a, const N: usize>(candidates: [Option<&'a str>; N]) -> Option<&'a str> {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
}
