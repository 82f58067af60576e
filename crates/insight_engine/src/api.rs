use std::sync::Arc;

use client_logging::client_warn;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::retry::execute;
use crate::types::embedded_error;
use crate::{
    AnalysisPayload, CandidateEntry, DeliveryError, ReqwestTransport, RequestDescriptor,
    RetryPolicy, Transport, TransportError, TransportSettings,
};

const ANALYZE_PATH: &str = "/api/analyze";
const INSIGHTS_PATH: &str = "/api/insights";
const DISCOVER_PATH: &str = "/api/discover";
const SHARE_EMAIL_PATH: &str = "/api/share_email";

/// Failures surfaced by the typed API layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Delivery failed at the transport or status layer.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
    /// The service reported a failure inside a success response.
    #[error("{0}")]
    Service(String),
    /// A 2xx response whose body did not match the expected shape.
    #[error("malformed response body: {0}")]
    MalformedBody(String),
}

/// Typed client for the dashboard backend. Every call is delivered through
/// the retry executor and shares one retry policy.
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl ApiClient {
    /// Builds a client speaking to `base_url` over reqwest.
    pub fn new(base_url: url::Url, policy: RetryPolicy) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(base_url, TransportSettings::default())?;
        Ok(Self::with_transport(Arc::new(transport), policy))
    }

    /// Builds a client over an arbitrary transport.
    pub fn with_transport(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Submits one analysis run: the goal code plus the newline-joined
    /// effective target set.
    pub async fn submit_analysis(
        &self,
        goal: &str,
        sites: &str,
        cancel: &CancellationToken,
    ) -> Result<AnalysisPayload, ApiError> {
        let request = RequestDescriptor::post(
            ANALYZE_PATH,
            serde_json::json!({ "goal": goal, "sites": sites }),
        );
        let response = execute(self.transport.as_ref(), &request, &self.policy, cancel).await?;
        // The service reports some failures inside a 200 body; check before
        // deserializing, since every payload field is defaultable.
        if let Some(message) = embedded_error(&response.body) {
            return Err(ApiError::Service(message));
        }
        serde_json::from_str(&response.body).map_err(|err| ApiError::MalformedBody(err.to_string()))
    }

    /// Fetches the externally maintained candidate list.
    ///
    /// A failed fetch is degraded, not fatal: it is logged and an empty list
    /// is returned, leaving manual entry available.
    pub async fn fetch_candidates(&self, cancel: &CancellationToken) -> Vec<CandidateEntry> {
        let request = RequestDescriptor::get(INSIGHTS_PATH);
        match execute(self.transport.as_ref(), &request, &self.policy, cancel).await {
            Ok(response) => match serde_json::from_str::<Vec<CandidateEntry>>(&response.body) {
                Ok(entries) => entries,
                Err(err) => {
                    client_warn!("candidate list body malformed: {}", err);
                    Vec::new()
                }
            },
            Err(error) => {
                client_warn!("candidate list fetch failed: {}", error.message);
                Vec::new()
            }
        }
    }

    /// Discovers candidate urls for a free-text search query.
    pub async fn discover_urls(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, ApiError> {
        #[derive(Deserialize)]
        struct DiscoverBody {
            #[serde(default)]
            urls: Vec<String>,
        }

        let request =
            RequestDescriptor::post(DISCOVER_PATH, serde_json::json!({ "query": query }));
        let response = execute(self.transport.as_ref(), &request, &self.policy, cancel).await?;
        if let Some(message) = embedded_error(&response.body) {
            return Err(ApiError::Service(message));
        }
        serde_json::from_str::<DiscoverBody>(&response.body)
            .map(|body| body.urls)
            .map_err(|err| ApiError::MalformedBody(err.to_string()))
    }

    /// Mails a cleaned CSV export to `email`. A rejected request is terminal;
    /// only transport failures and 5xx are redelivered.
    pub async fn share_csv_by_email(
        &self,
        email: &str,
        csv_data: &str,
        cancel: &CancellationToken,
    ) -> Result<(), ApiError> {
        let request = RequestDescriptor::post(
            SHARE_EMAIL_PATH,
            serde_json::json!({ "email": email, "csv_data": csv_data }),
        );
        let response = execute(self.transport.as_ref(), &request, &self.policy, cancel).await?;
        if let Some(message) = embedded_error(&response.body) {
            return Err(ApiError::Service(message));
        }
        Ok(())
    }
}
