//! # Merchant Backend Configuration
//!
//! Base URL and request settings from the environment, page configuration
//! from `config/checkout.toml`.

use frame_core::{CheckoutConfig, CheckoutError, CheckoutResult, Endpoint, EndpointPaths};
use std::env;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Env var holding the merchant backend origin
pub const BASE_URL_VAR: &str = "MERCHANT_BASE_URL";

/// Env var holding the request timeout in whole seconds
pub const TIMEOUT_VAR: &str = "MERCHANT_REQUEST_TIMEOUT_SECS";

/// Env var overriding the store public key from the config file
pub const PUBLIC_KEY_VAR: &str = "CORVUSPAY_STORE_PUBLIC_KEY";

/// Where `load_checkout_config` looks, in order
pub const CONFIG_PATHS: [&str; 3] = [
    "config/checkout.toml",
    "../config/checkout.toml",
    "../../config/checkout.toml",
];

/// Merchant backend connection settings
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Origin the endpoint paths are resolved against
    pub base_url: Url,

    pub endpoints: EndpointPaths,

    /// Whole-request timeout; ignored in the browser
    pub request_timeout: Option<Duration>,
}

impl HttpConfig {
    pub fn new(base_url: &str) -> CheckoutResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            CheckoutError::Configuration(format!("invalid merchant base URL {:?}: {}", base_url, e))
        })?;
        Ok(Self {
            base_url,
            endpoints: EndpointPaths::default(),
            request_timeout: None,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `MERCHANT_BASE_URL`
    ///
    /// Optional:
    /// - `MERCHANT_REQUEST_TIMEOUT_SECS`
    pub fn from_env() -> CheckoutResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(env::var(BASE_URL_VAR).ok(), env::var(TIMEOUT_VAR).ok())
    }

    fn from_vars(base_url: Option<String>, timeout: Option<String>) -> CheckoutResult<Self> {
        let base_url = base_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| CheckoutError::Configuration(format!("{} not set", BASE_URL_VAR)))?;
        let mut config = Self::new(&base_url)?;

        if let Some(raw) = timeout {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                CheckoutError::Configuration(format!(
                    "{} must be a whole number of seconds, got {:?}",
                    TIMEOUT_VAR, raw
                ))
            })?;
            config = config.with_request_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Builder: endpoint paths from a loaded `CheckoutConfig`
    pub fn with_endpoints(mut self, endpoints: EndpointPaths) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Absolute URL of an endpoint
    pub fn endpoint_url(&self, endpoint: Endpoint) -> CheckoutResult<Url> {
        let path = self.endpoints.path(endpoint);
        self.base_url.join(path).map_err(|e| {
            CheckoutError::Configuration(format!("invalid path {:?} for {}: {}", path, endpoint, e))
        })
    }
}

/// Load the page configuration from the first `config/checkout.toml` found.
///
/// `CORVUSPAY_STORE_PUBLIC_KEY` overrides the file's key; without any file
/// the env key alone yields a default configuration.
pub fn load_checkout_config() -> CheckoutResult<CheckoutConfig> {
    dotenvy::dotenv().ok();
    let env_key = env::var(PUBLIC_KEY_VAR).ok();
    load_checkout_config_from(&CONFIG_PATHS, env_key)
}

pub fn load_checkout_config_from<P: AsRef<Path>>(
    paths: &[P],
    public_key: Option<String>,
) -> CheckoutResult<CheckoutConfig> {
    let public_key = public_key.filter(|key| !key.trim().is_empty());

    for path in paths {
        let path = path.as_ref();
        if let Ok(content) = std::fs::read_to_string(path) {
            let mut config: CheckoutConfig = toml::from_str(&content).map_err(|e| {
                CheckoutError::Configuration(format!("Failed to parse {}: {}", path.display(), e))
            })?;
            if let Some(key) = public_key {
                config = config.with_public_key(key);
            }
            config.validate()?;
            info!(path = %path.display(), "loaded checkout config");
            return Ok(config);
        }
    }

    match public_key {
        Some(key) => {
            warn!("No checkout config found, using defaults");
            Ok(CheckoutConfig::new(key))
        }
        None => Err(CheckoutError::Configuration(format!(
            "no checkout config found and {} not set",
            PUBLIC_KEY_VAR
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_file(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("checkout.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_endpoint_urls() {
        let config = HttpConfig::new("https://shop.example.com").unwrap();
        assert_eq!(
            config.endpoint_url(Endpoint::InitPayment).unwrap().as_str(),
            "https://shop.example.com/corvuspay-init-payment"
        );
        assert_eq!(
            config
                .endpoint_url(Endpoint::FetchSessionToken)
                .unwrap()
                .as_str(),
            "https://shop.example.com/corvuspay-fetch-session-token"
        );
    }

    #[test]
    fn test_from_vars() {
        assert!(HttpConfig::from_vars(None, None).is_err());
        assert!(HttpConfig::from_vars(Some("not a url".into()), None).is_err());
        assert!(HttpConfig::from_vars(Some("http://localhost:8000".into()), Some("soon".into())).is_err());

        let config =
            HttpConfig::from_vars(Some("http://localhost:8000".into()), Some("15".into())).unwrap();
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.base_url.as_str(), "http://localhost:8000/");
    }

    #[test]
    fn test_first_existing_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = scratch_file(
            &dir,
            "public_key = \"pk_file\"\n[destinations]\nsuccess = \"/thanks.html\"\n",
        );
        let paths = [PathBuf::from("/nonexistent/checkout.toml"), path];

        let config = load_checkout_config_from(&paths, None).unwrap();
        assert_eq!(config.public_key, "pk_file");
        assert_eq!(config.destinations.success, "/thanks.html");

        let config = load_checkout_config_from(&paths, Some("pk_env".into())).unwrap();
        assert_eq!(config.public_key, "pk_env");
    }

    #[test]
    fn test_missing_file_needs_env_key() {
        let paths = ["/nonexistent/checkout.toml"];
        assert!(load_checkout_config_from(&paths, None).is_err());
        assert!(load_checkout_config_from(&paths, Some(" ".into())).is_err());

        let config = load_checkout_config_from(&paths, Some("pk_env".into())).unwrap();
        assert_eq!(config.public_key, "pk_env");
        assert_eq!(config.destinations.error, "/error.html");
    }

    #[test]
    fn test_file_without_key_and_no_env_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = scratch_file(&dir, "installments_required = false\n");
        assert!(load_checkout_config_from(&[path], None).is_err());
    }
}
