//! # Checkout Configuration
//!
//! Everything a page needs to wire the card frame: store public key, widget
//! options, mount points, merchant endpoint paths and terminal destinations.
//! Loaded from `config/checkout.toml`; only `public_key` is required.

use crate::error::{CheckoutError, CheckoutResult};
use crate::model::PaymentOutcome;
use crate::transport::Endpoint;
use crate::widget::{InitOptions, RenderOptions, StyleOptions};
use serde::{Deserialize, Serialize};

/// Paths of the merchant backend endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointPaths {
    pub init_payment: String,
    pub check_payment_response: String,
    pub fetch_session_token: String,
    pub init_payment_with_token: String,
}

impl EndpointPaths {
    pub fn path(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::InitPayment => &self.init_payment,
            Endpoint::CheckPaymentResponse => &self.check_payment_response,
            Endpoint::FetchSessionToken => &self.fetch_session_token,
            Endpoint::InitPaymentWithToken => &self.init_payment_with_token,
        }
    }
}

impl Default for EndpointPaths {
    fn default() -> Self {
        Self {
            init_payment: "/corvuspay-init-payment".to_string(),
            check_payment_response: "/corvuspay-check-payment-response".to_string(),
            fetch_session_token: "/corvuspay-fetch-session-token".to_string(),
            init_payment_with_token: "/corvuspay-init-payment-with-token".to_string(),
        }
    }
}

/// Terminal pages reached after a payment attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Destinations {
    pub success: String,
    pub error: String,
}

impl Destinations {
    pub fn success_url(&self, outcome: &PaymentOutcome) -> String {
        with_query(&self.success, &outcome.to_query_string())
    }

    pub fn error_url(&self, outcome: &PaymentOutcome) -> String {
        with_query(&self.error, &outcome.to_query_string())
    }
}

impl Default for Destinations {
    fn default() -> Self {
        Self {
            success: "/success.html".to_string(),
            error: "/error.html".to_string(),
        }
    }
}

fn with_query(base: &str, query: &str) -> String {
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{}{}{}", base, sep, query)
}

/// Page configuration for all three flows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Store public key handed to the widget's `init`
    #[serde(default)]
    pub public_key: String,

    /// Installments on the card flows; the stored-card flow always disables them
    #[serde(default = "default_true")]
    pub installments_required: bool,

    #[serde(default)]
    pub render: RenderOptions,

    #[serde(default)]
    pub style: StyleOptions,

    #[serde(default = "default_card_mount_point")]
    pub card_mount_point: String,

    #[serde(default = "default_token_mount_point")]
    pub token_card_mount_point: String,

    #[serde(default)]
    pub endpoints: EndpointPaths,

    #[serde(default)]
    pub destinations: Destinations,
}

fn default_true() -> bool {
    true
}

fn default_card_mount_point() -> String {
    "corvuspay-card-element".to_string()
}

fn default_token_mount_point() -> String {
    "corvuspay-with-token-card-element".to_string()
}

impl CheckoutConfig {
    /// Defaults for everything but the public key
    pub fn new(public_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            installments_required: true,
            render: RenderOptions::default(),
            style: StyleOptions::default(),
            card_mount_point: default_card_mount_point(),
            token_card_mount_point: default_token_mount_point(),
            endpoints: EndpointPaths::default(),
            destinations: Destinations::default(),
        }
    }

    pub fn from_toml_str(content: &str) -> CheckoutResult<Self> {
        let config: CheckoutConfig = toml::from_str(content)
            .map_err(|e| CheckoutError::Configuration(format!("invalid checkout config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CheckoutResult<()> {
        if self.public_key.trim().is_empty() {
            return Err(CheckoutError::Configuration(
                "public_key must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Widget init options for the card and card-storage flows
    pub fn card_init_options(&self) -> InitOptions {
        InitOptions {
            installments_required: self.installments_required,
        }
    }

    /// Widget init options for the stored-card flow
    pub fn token_init_options(&self) -> InitOptions {
        InitOptions {
            installments_required: false,
        }
    }

    /// Builder: replace the public key (env override)
    pub fn with_public_key(mut self, public_key: impl Into<String>) -> Self {
        self.public_key = public_key.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_gets_defaults() {
        let config = CheckoutConfig::from_toml_str(r#"public_key = "pk_store_1""#).unwrap();

        assert_eq!(config.public_key, "pk_store_1");
        assert!(config.installments_required);
        assert!(config.render.show_cvv);
        assert_eq!(config.card_mount_point, "corvuspay-card-element");
        assert_eq!(
            config.endpoints.path(Endpoint::FetchSessionToken),
            "/corvuspay-fetch-session-token"
        );
        assert_eq!(config.destinations.success, "/success.html");
        assert!(!config.token_init_options().installments_required);
    }

    #[test]
    fn test_toml_overrides() {
        let config = CheckoutConfig::from_toml_str(
            r#"
            public_key = "pk_store_1"
            installments_required = false

            [render]
            hideCorvusPayLogo = true

            [style]
            fontSize = 13

            [endpoints]
            init_payment = "/api/init"

            [destinations]
            success = "/done?lang=hr"
            "#,
        )
        .unwrap();

        assert!(!config.card_init_options().installments_required);
        assert!(config.render.hide_corvus_pay_logo);
        assert!(config.render.show_cvv);
        assert_eq!(config.style.font_size, Some(13));
        assert_eq!(config.endpoints.path(Endpoint::InitPayment), "/api/init");
        assert_eq!(
            config.endpoints.path(Endpoint::CheckPaymentResponse),
            "/corvuspay-check-payment-response"
        );

        let outcome = PaymentOutcome::from_query("status=ok&paymentId=P1");
        assert!(config
            .destinations
            .success_url(&outcome)
            .starts_with("/done?lang=hr&displayMessage="));
    }

    #[test]
    fn test_empty_public_key_rejected() {
        assert!(CheckoutConfig::from_toml_str(r#"public_key = "  ""#).is_err());
        assert!(CheckoutConfig::from_toml_str("").is_err());
    }
}
