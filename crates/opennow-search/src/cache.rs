//! Caller-owned memo of recent search outcomes.
//!
//! Open status depends on the current time, so entries expire after a short
//! TTL. Centers are quantized so nearby repeat searches share an entry.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::search::{SearchOutcome, SearchRequest};

/// Degrees are bucketed to 1e-4 (about 11 m of latitude).
const COORD_SCALE: f64 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    lat_q: i64,
    lon_q: i64,
    radius_m: u32,
    open_only: bool,
}

impl CacheKey {
    fn from_request(request: &SearchRequest) -> Self {
        Self {
            lat_q: quantize(request.center.lat),
            lon_q: quantize(request.center.lon),
            radius_m: request.radius_m,
            open_only: request.open_only,
        }
    }
}

// Inputs are validated coordinates, well inside the i64 range once scaled.
#[allow(clippy::cast_possible_truncation)]
fn quantize(degrees: f64) -> i64 {
    (degrees * COORD_SCALE).round() as i64
}

#[derive(Debug, Clone)]
struct Entry {
    stored_at: Instant,
    outcome: SearchOutcome,
}

#[derive(Debug, Clone)]
pub struct SearchCache {
    ttl: Duration,
    entries: HashMap<CacheKey, Entry>,
}

impl SearchCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Returns the stored outcome for `request` if it is younger than the TTL
    /// at `now`. Expired entries are evicted on lookup.
    pub fn get(&mut self, request: &SearchRequest, now: Instant) -> Option<&SearchOutcome> {
        let key = CacheKey::from_request(request);
        let expired = self
            .entries
            .get(&key)
            .is_some_and(|entry| now.saturating_duration_since(entry.stored_at) >= self.ttl);
        if expired {
            self.entries.remove(&key);
            return None;
        }
        self.entries.get(&key).map(|entry| &entry.outcome)
    }

    pub fn insert(&mut self, request: &SearchRequest, outcome: SearchOutcome, now: Instant) {
        self.entries.insert(
            CacheKey::from_request(request),
            Entry {
                stored_at: now,
                outcome,
            },
        );
    }

    /// Drops every entry older than the TTL.
    pub fn purge_expired(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.stored_at) < ttl);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
