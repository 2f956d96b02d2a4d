use opennow_core::Coordinate;
use opennow_overpass::{ElementKind, FetchError};
use thiserror::Error;

/// Errors that abort a whole search. No partial results accompany them.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Overpass fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("invalid search center {0}")]
    InvalidCenter(Coordinate),

    #[error("search radius must be greater than zero")]
    ZeroRadius,
}

/// A raw element that cannot become a POI. Logged and skipped, never
/// returned to the caller of a search.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedRecord {
    #[error("{kind} {id} has no usable coordinate")]
    MissingCoordinate { kind: ElementKind, id: i64 },
}
