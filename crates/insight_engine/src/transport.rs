use std::time::Duration;

use crate::{Method, RequestDescriptor};

/// Connection-level settings for the reqwest transport.
#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// One attempt's response, with the body read fully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Failure to obtain a response at all (connect error, timeout, aborted
/// body read). Always classified as transient by the retry loop.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Seam between the retry loop and the network; one call is one attempt.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &RequestDescriptor)
        -> Result<TransportResponse, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    base_url: url::Url,
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(base_url: url::Url, settings: TransportSettings) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| TransportError::new(err.to_string()))?;
        Ok(Self { base_url, client })
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: &RequestDescriptor,
    ) -> Result<TransportResponse, TransportError> {
        let url = self
            .base_url
            .join(&request.path)
            .map_err(|err| TransportError::new(err.to_string()))?;

        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| TransportError::new(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| TransportError::new(err.to_string()))?;

        Ok(TransportResponse { status, body })
    }
}
