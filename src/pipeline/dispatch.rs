//! Screening dispatch: one JSON POST to the configured webhook.
//!
//! The request body is the serialized [`ScreeningRequest`]. A request only
//! exists once its three fields have been validated, so an invalid request
//! never reaches this module and never touches the network.
//!
//! The webhook is expected to send an email to the recipient as a side
//! effect. A 2xx reply means the workflow accepted the request; the
//! dispatcher does not verify delivery.

use crate::config::ScreeningConfig;
use crate::error::{Endpoint, ScreenError};
use crate::model::{ScreeningRequest, ScreeningResponse};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// HTTP client bound to a single webhook URL.
#[derive(Debug, Clone)]
pub struct WebhookDispatcher {
    client: Client,
    url: String,
    timeout: Duration,
}

impl WebhookDispatcher {
    /// Build a dispatcher from the config's webhook URL and timeout.
    pub fn from_config(config: &ScreeningConfig) -> Result<Self, ScreenError> {
        let url = config.require_webhook_url()?;
        Self::new(url, Duration::from_secs(config.webhook_timeout_secs))
    }

    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ScreenError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScreenError::Internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST `request` once. No retry on any failure.
    ///
    /// # Errors
    /// - [`ScreenError::Connectivity`] for timeouts, DNS failures, refused
    ///   connections, or a body that cannot be read.
    /// - [`ScreenError::Workflow`] for any non-2xx status, with the raw body.
    pub async fn dispatch(
        &self,
        request: &ScreeningRequest,
    ) -> Result<ScreeningResponse, ScreenError> {
        info!("Dispatching screening request to {}", self.url);
        debug!(
            "Payload: {} chars resume, {} chars job description",
            request.resume_text().len(),
            request.job_description().len()
        );
        let start = Instant::now();

        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.connectivity(e))?;

        let status = response.status();
        let raw = response.text().await.map_err(|e| self.connectivity(e))?;
        debug!("Webhook replied {} in {:?}", status, start.elapsed());

        if !status.is_success() {
            warn!("Webhook returned {}: {}", status, raw);
            return Err(ScreenError::Workflow {
                status: status.as_u16(),
                body: raw,
            });
        }

        Ok(ScreeningResponse::from_raw(status.as_u16(), raw))
    }

    fn connectivity(&self, e: reqwest::Error) -> ScreenError {
        let detail = if e.is_timeout() {
            format!("timed out after {}s: {e}", self.timeout.as_secs())
        } else {
            e.to_string()
        };
        warn!("Webhook unreachable: {detail}");
        ScreenError::Connectivity {
            endpoint: Endpoint::Webhook,
            detail,
        }
    }
}
