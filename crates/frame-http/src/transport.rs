//! # HTTP Transport
//!
//! `MerchantTransport` over reqwest. In the browser reqwest rides on
//! `fetch`, so the same code serves the wasm pages and the CLI.

use crate::config::HttpConfig;
use async_trait::async_trait;
use frame_core::{CheckoutError, CheckoutResult, Endpoint, MerchantTransport, RawResponse};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// JSON-over-POST client for the merchant backend
pub struct HttpTransport {
    config: HttpConfig,
    client: Client,
}

impl HttpTransport {
    pub fn new(config: HttpConfig) -> CheckoutResult<Self> {
        let builder = Client::builder();

        #[cfg(not(target_arch = "wasm32"))]
        let builder = match config.request_timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        };

        let client = builder.build().map_err(|e| {
            CheckoutError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> CheckoutResult<Self> {
        Self::new(HttpConfig::from_env()?)
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }
}

#[async_trait(?Send)]
impl MerchantTransport for HttpTransport {
    #[instrument(skip(self, body), fields(endpoint = %endpoint))]
    async fn post_json(&self, endpoint: Endpoint, body: &Value) -> CheckoutResult<RawResponse> {
        let url = self.config.endpoint_url(endpoint)?;
        debug!(%url, "posting to merchant backend");

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "merchant backend returned an error status");
        }

        Ok(RawResponse::new(status.as_u16(), text))
    }
}
