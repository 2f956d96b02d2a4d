use chrono_tz::Tz;

/// Mirrors tried in rotation when `OPENNOW_OVERPASS_ENDPOINTS` is unset.
pub const DEFAULT_OVERPASS_ENDPOINTS: &[&str] = &[
    "https://overpass-api.de/api/interpreter",
    "https://overpass.kumi.systems/api/interpreter",
    "https://overpass.openstreetmap.ru/api/interpreter",
];

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub overpass_endpoints: Vec<String>,
    pub overpass_user_agent: String,
    /// Per-attempt HTTP timeout.
    pub overpass_request_timeout_secs: u64,
    /// Server-side `[timeout:N]` placed in the query text.
    pub overpass_query_timeout_secs: u64,
    pub overpass_max_attempts: u32,
    pub overpass_backoff_base: f64,
    /// Optional ceiling on a single backoff sleep. `None` leaves it uncapped.
    pub overpass_max_backoff_secs: Option<u64>,
    pub search_default_radius_m: u32,
    pub search_max_radius_m: u32,
    /// Zone used when a POI's coordinate cannot be resolved to a timezone.
    pub default_timezone: Tz,
}
