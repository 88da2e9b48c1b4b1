//! HTTP implementation of [`AdBackend`].

use crate::config::ClientConfig;
use crate::protocol::{
    AdResponse, ClickRequest, PresenceDirection, PresenceRequest, ShowAdRequest, ViewerContext,
    ACCEPTED_CONTENT_TYPES, ACCEPTED_MIME_TYPES, LINK_CLICK_PATH, SCENE_OBSERVABLE_PATH,
    SHOW_AD_PATH,
};
use crate::{AdBackend, AdClientError};
use async_trait::async_trait;
use metaviu_core::BillboardId;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, trace};

const JSON: &str = "application/json";

/// Stateless JSON-over-HTTP client for the ad-serving backend.
#[derive(Debug, Clone)]
pub struct AdClient {
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl AdClient {
    /// Build a client for the configured backend.
    pub fn new(config: ClientConfig) -> Result<Self, AdClientError> {
        let mut builder = reqwest::Client::builder();
        if config.request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout_secs));
        }
        let http_client = builder.build().map_err(AdClientError::Build)?;
        Ok(Self {
            config,
            http_client,
        })
    }

    /// Settings this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        endpoint: &'static str,
        body: &T,
    ) -> Result<String, AdClientError> {
        let url = self.config.endpoint_url(endpoint);
        let payload = serde_json::to_vec(body)
            .map_err(|source| AdClientError::Encode { endpoint, source })?;

        trace!(%url, bytes = payload.len(), "posting to ad backend");

        let response = self
            .http_client
            .post(&url)
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, JSON)
            .body(payload)
            .send()
            .await
            .map_err(|source| AdClientError::Transport { endpoint, source })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| AdClientError::Transport { endpoint, source })?;

        if !status.is_success() {
            return Err(AdClientError::Status {
                endpoint,
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(text)
    }
}

#[async_trait]
impl AdBackend for AdClient {
    async fn fetch_ad(
        &self,
        billboard_id: BillboardId,
        billboard_type: &str,
        context: &ViewerContext,
    ) -> Result<AdResponse, AdClientError> {
        let request = ShowAdRequest {
            billboard_type,
            billboard_id,
            content_types: &ACCEPTED_CONTENT_TYPES,
            mime_type: &ACCEPTED_MIME_TYPES,
            context,
            vendor: &self.config.vendor,
            version: &self.config.protocol_version,
        };

        let text = self.post_json(SHOW_AD_PATH, &request).await?;
        debug!(billboard_id, response = %text, "ad backend answered");

        serde_json::from_str(&text).map_err(|source| AdClientError::Decode {
            endpoint: SHOW_AD_PATH,
            source,
        })
    }

    async fn report_presence(
        &self,
        billboard_id: &str,
        client_id: &str,
        direction: PresenceDirection,
    ) -> Result<(), AdClientError> {
        let request = PresenceRequest {
            billboard_id: billboard_id.to_string(),
            client_id: client_id.to_string(),
            direction,
        };
        self.post_json(SCENE_OBSERVABLE_PATH, &request).await?;
        Ok(())
    }

    async fn report_click(
        &self,
        billboard_id: BillboardId,
        client_id: &str,
    ) -> Result<(), AdClientError> {
        let request = ClickRequest {
            billboard_id,
            client_id: client_id.to_string(),
        };
        self.post_json(LINK_CLICK_PATH, &request).await?;
        Ok(())
    }
}
