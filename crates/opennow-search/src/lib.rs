//! Proximity search over Overpass with open-now annotation.
//!
//! [`ProximitySearch::search`] queries the configured mirrors around a
//! center, widens the radius once when nothing is found, normalizes each OSM
//! element and evaluates its opening hours in the element's own timezone.

pub mod cache;
pub mod error;
pub mod geo;
pub mod normalize;
pub mod query;
pub mod search;
pub mod timezone;

pub use cache::SearchCache;
pub use error::{MalformedRecord, SearchError};
pub use geo::haversine_m;
pub use normalize::{normalize_element, NormalizedPoi, UNNAMED_PLACEHOLDER};
pub use query::build_overpass_query;
pub use search::{
    sort_pois, widened_radius, ProximitySearch, SearchOutcome, SearchRequest, SearchSettings,
};
pub use timezone::{FixedTimezone, TimezoneResolver, TzfResolver};
