//! Home-automation hub REST client.
//!
//! [`HubClient`] wraps the two endpoints the relay needs: `GET /api/states` for the
//! device inventory and `POST /api/services/{domain}/{service}` to act on an entity.
//! Every request carries the bearer token and the configured timeout.

pub mod types;

use std::time::Duration;

use crate::config::HubConfig;
use crate::error::HubError;
use types::RawEntityState;

pub use types::{DeviceState, ServiceOutcome};

pub struct HubClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HubClient {
    pub fn new(config: &HubConfig) -> Result<Self, HubError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        if config.token.is_empty() {
            tracing::warn!(url = %config.url, "no hub token configured; requests will be unauthenticated");
        }

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch every entity the hub knows about.
    pub async fn try_fetch_devices(&self) -> Result<Vec<DeviceState>, HubError> {
        let response = self
            .client
            .get(format!("{}/api/states", self.base_url))
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HubError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw: Vec<RawEntityState> = response
            .json()
            .await
            .map_err(|e| HubError::Decode(e.to_string()))?;

        Ok(raw.into_iter().map(DeviceState::from).collect())
    }

    /// Fetch the device inventory, or an empty list if the hub cannot be reached.
    pub async fn fetch_devices(&self) -> Vec<DeviceState> {
        match self.try_fetch_devices().await {
            Ok(devices) => {
                tracing::debug!(count = devices.len(), "fetched hub devices");
                devices
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch devices");
                Vec::new()
            }
        }
    }

    /// Invoke `domain.service` on `entity_id`. Only transport failures are errors;
    /// any HTTP status the hub answers with is returned as an outcome.
    pub async fn try_call_service(
        &self,
        domain: &str,
        service: &str,
        entity_id: &str,
    ) -> Result<ServiceOutcome, HubError> {
        let response = self
            .client
            .post(format!("{}/api/services/{domain}/{service}", self.base_url))
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "entity_id": entity_id }))
            .send()
            .await?;

        let status = response.status().as_u16();
        // The hub already answered; a truncated body must not hide its status.
        let body = response.text().await.unwrap_or_default();
        Ok(ServiceOutcome { status, body })
    }

    /// Invoke `domain.service` on `entity_id`, mapping transport failures to a
    /// synthetic 500 outcome.
    pub async fn call_service(&self, domain: &str, service: &str, entity_id: &str) -> ServiceOutcome {
        tracing::info!(domain, service, entity_id, "calling hub service");
        match self.try_call_service(domain, service, entity_id).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, domain, service, entity_id, "service call failed");
                ServiceOutcome {
                    status: 500,
                    body: format!("Service call failed: {e}"),
                }
            }
        }
    }

    pub async fn toggle_boolean(&self, entity_id: &str) -> ServiceOutcome {
        self.call_service("input_boolean", "toggle", entity_id).await
    }

    /// Probe the states endpoint and return the HTTP status the hub answered with.
    pub async fn check(&self) -> Result<u16, HubError> {
        let response = self
            .client
            .get(format!("{}/api/states", self.base_url))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(response.status().as_u16())
    }
}
