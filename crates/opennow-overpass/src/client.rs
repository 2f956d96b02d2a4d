//! HTTP client for the Overpass API with mirror rotation.
//!
//! Every attempt, successful or not, moves to the next mirror in the list:
//! attempt `i` is sent to `endpoints[i % len]`. Retries and backoff follow
//! the client's [`RetryPolicy`].

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::{AttemptError, FetchError};
use crate::retry::{retry_rotating, RetryPolicy};
use crate::types::{OverpassResponse, QueryRequest};

/// Client for a rotating set of interchangeable Overpass mirrors.
///
/// Holds no per-query state; one instance can serve any number of searches.
#[derive(Debug, Clone)]
pub struct MirrorClient {
    client: Client,
    endpoints: Vec<Url>,
    policy: RetryPolicy,
}

impl MirrorClient {
    /// Creates a client for the given mirrors, in priority order.
    ///
    /// # Errors
    ///
    /// - [`FetchError::NoEndpoints`] if `endpoints` is empty.
    /// - [`FetchError::InvalidEndpoint`] if an entry is not an `http(s)` URL.
    /// - [`FetchError::Client`] if the `reqwest::Client` cannot be built.
    pub fn new<S: AsRef<str>>(
        endpoints: &[S],
        user_agent: &str,
        policy: RetryPolicy,
    ) -> Result<Self, FetchError> {
        if endpoints.is_empty() {
            return Err(FetchError::NoEndpoints);
        }
        let endpoints = endpoints
            .iter()
            .map(|raw| parse_endpoint(raw.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            endpoints,
            policy,
        })
    }

    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Same as [`MirrorClient::new`].
    pub fn from_app_config(config: &opennow_core::AppConfig) -> Result<Self, FetchError> {
        Self::new(
            config.overpass_endpoints.as_slice(),
            &config.overpass_user_agent,
            RetryPolicy::from_app_config(config),
        )
    }

    #[must_use]
    pub fn endpoints(&self) -> &[Url] {
        &self.endpoints
    }

    /// Mirror that attempt `attempt` (0-based) is sent to.
    #[must_use]
    pub fn endpoint_for_attempt(&self, attempt: u32) -> &Url {
        let idx = usize::try_from(attempt).unwrap_or(usize::MAX) % self.endpoints.len();
        &self.endpoints[idx]
    }

    /// POSTs `query` as the `data` form field and parses the JSON reply.
    ///
    /// `request.timeout_secs` bounds each attempt separately; a timed-out
    /// attempt counts as a transient failure.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Fatal`] on the first non-retriable HTTP status.
    /// - [`FetchError::Transient`] once the attempt budget is exhausted,
    ///   carrying the last failure.
    pub async fn execute(
        &self,
        request: &QueryRequest,
        query: &str,
    ) -> Result<OverpassResponse, FetchError> {
        let timeout = Duration::from_secs(request.timeout_secs);

        let response = retry_rotating(&self.policy, |attempt| {
            let endpoint = self.endpoint_for_attempt(attempt).clone();
            async move {
                tracing::debug!(attempt, endpoint = %endpoint, "sending Overpass query");
                self.send_once(endpoint, timeout, query).await
            }
        })
        .await?;

        if let Some(remark) = &response.remark {
            tracing::warn!(
                remark,
                center = %request.center,
                radius_m = request.radius_m,
                "Overpass returned a remark; results may be incomplete"
            );
        }
        Ok(response)
    }

    async fn send_once(
        &self,
        endpoint: Url,
        timeout: Duration,
        query: &str,
    ) -> Result<OverpassResponse, AttemptError> {
        let endpoint_str = endpoint.to_string();
        let network = |source: reqwest::Error| AttemptError::Network {
            endpoint: endpoint_str.clone(),
            source,
        };

        let response = self
            .client
            .post(endpoint)
            .timeout(timeout)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[("data", query)])
            .send()
            .await
            .map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError::Status {
                endpoint: endpoint_str,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(network)?;
        serde_json::from_str::<OverpassResponse>(&body).map_err(|source| AttemptError::Decode {
            endpoint: endpoint_str,
            source,
        })
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, FetchError> {
    let invalid = |reason: String| FetchError::InvalidEndpoint {
        endpoint: raw.to_owned(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme \"{other}\""))),
    }
}
