//! Coordinate to timezone lookup.
//!
//! The search only needs `timezone_for(coordinate) -> Option<Tz>`; callers
//! supply a default zone for when it returns `None`.

use chrono_tz::Tz;
use opennow_core::Coordinate;

pub trait TimezoneResolver: Send + Sync {
    fn timezone_for(&self, at: Coordinate) -> Option<Tz>;
}

impl<F> TimezoneResolver for F
where
    F: Fn(Coordinate) -> Option<Tz> + Send + Sync,
{
    fn timezone_for(&self, at: Coordinate) -> Option<Tz> {
        self(at)
    }
}

/// Resolves every coordinate to the same zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedTimezone(pub Tz);

impl TimezoneResolver for FixedTimezone {
    fn timezone_for(&self, _at: Coordinate) -> Option<Tz> {
        Some(self.0)
    }
}

/// Offline lookup against bundled timezone boundary polygons.
///
/// Building the finder decodes the polygon set, so create one and reuse it.
pub struct TzfResolver {
    finder: tzf_rs::DefaultFinder,
}

impl TzfResolver {
    #[must_use]
    pub fn new() -> Self {
        Self {
            finder: tzf_rs::DefaultFinder::new(),
        }
    }
}

impl Default for TzfResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TzfResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TzfResolver").finish_non_exhaustive()
    }
}

impl TimezoneResolver for TzfResolver {
    fn timezone_for(&self, at: Coordinate) -> Option<Tz> {
        if !at.is_valid() {
            return None;
        }
        let name = self.finder.get_tz_name(at.lon, at.lat);
        if name.is_empty() {
            return None;
        }
        name.parse::<Tz>().ok()
    }
}

/// Looks up the zone for `at`, falling back to `default` when the resolver
/// has no answer.
pub fn resolve_or_default<R: TimezoneResolver + ?Sized>(
    resolver: &R,
    at: Coordinate,
    default: Tz,
) -> Tz {
    resolver.timezone_for(at).unwrap_or_else(|| {
        tracing::debug!(
            %at,
            default = %default.name(),
            "timezone lookup failed, using default zone"
        );
        default
    })
}
