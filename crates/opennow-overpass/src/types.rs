//! Overpass API request and response shapes.
//!
//! Only the fields the proximity search reads are modelled. Tags are a typed
//! struct of optional values; every other tag in the payload is ignored.

use opennow_core::Coordinate;
use serde::{Deserialize, Serialize};

/// One spatial query, immutable across its retry attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryRequest {
    pub center: Coordinate,
    pub radius_m: u32,
    /// Per-attempt HTTP timeout.
    pub timeout_secs: u64,
}

/// Top-level `[out:json]` document.
///
/// Elements are decoded one by one. An element that does not fit
/// [`RawElement`] (a centroid without `lon`, a string coordinate) is counted
/// in `undecodable` and left out, so one bad record never fails the reply.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "WireResponse")]
pub struct OverpassResponse {
    pub elements: Vec<RawElement>,
    /// Set by the server when the query hit a runtime limit; the element list
    /// may then be incomplete.
    pub remark: Option<String>,
    /// Elements present in the body that could not be decoded.
    pub undecodable: usize,
}

#[derive(Deserialize)]
struct WireResponse {
    #[serde(default)]
    elements: Vec<serde_json::Value>,
    #[serde(default)]
    remark: Option<String>,
}

impl From<WireResponse> for OverpassResponse {
    fn from(wire: WireResponse) -> Self {
        let mut undecodable = 0;
        let mut elements = Vec::with_capacity(wire.elements.len());
        for value in wire.elements {
            match serde_json::from_value::<RawElement>(value) {
                Ok(element) => elements.push(element),
                Err(e) => {
                    undecodable += 1;
                    tracing::debug!(error = %e, "skipping undecodable Overpass element");
                }
            }
        }
        Self {
            elements,
            remark: wire.remark,
            undecodable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Node,
    Way,
    Relation,
    #[serde(other)]
    Other,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementKind::Node => write!(f, "node"),
            ElementKind::Way => write!(f, "way"),
            ElementKind::Relation => write!(f, "relation"),
            ElementKind::Other => write!(f, "other"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

/// A single OSM element as returned by `out center tags`.
///
/// Nodes carry `lat`/`lon`; ways and relations carry a precomputed `center`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawElement {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub center: Option<LatLon>,
    #[serde(default)]
    pub tags: Option<ElementTags>,
}

/// The subset of OSM tags the search reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ElementTags {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub alt_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, rename = "contact:phone")]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub opening_hours: Option<String>,
    #[serde(default)]
    pub amenity: Option<String>,
}
