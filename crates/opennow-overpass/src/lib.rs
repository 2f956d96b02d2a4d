pub mod client;
pub mod error;
pub mod retry;
pub mod types;

pub use client::MirrorClient;
pub use error::{AttemptError, FetchError};
pub use retry::RetryPolicy;
pub use types::{ElementKind, ElementTags, LatLon, OverpassResponse, QueryRequest, RawElement};
