//! # Probe State
//!
//! Transport and destinations resolved from flags, the environment and an
//! optional checkout config file.

use crate::cli::Cli;
use frame_core::{CheckoutResult, Destinations};
use frame_http::config::PUBLIC_KEY_VAR;
use frame_http::{load_checkout_config_from, HttpConfig, HttpTransport};
use std::time::Duration;
use tracing::info;

/// Everything a command needs to talk to the merchant backend
pub struct ProbeState {
    pub transport: HttpTransport,
    pub destinations: Destinations,
}

impl ProbeState {
    pub fn from_cli(cli: &Cli) -> CheckoutResult<Self> {
        dotenvy::dotenv().ok();

        let mut http = match &cli.base_url {
            Some(url) => HttpConfig::new(url)?,
            None => HttpConfig::from_env()?,
        };
        if let Some(secs) = cli.timeout {
            http = http.with_request_timeout(Duration::from_secs(secs));
        }

        let destinations = match &cli.config {
            Some(path) => {
                let checkout = load_checkout_config_from(
                    std::slice::from_ref(path),
                    std::env::var(PUBLIC_KEY_VAR).ok(),
                )?;
                http = http.with_endpoints(checkout.endpoints);
                checkout.destinations
            }
            None => Destinations::default(),
        };

        info!(base_url = %http.base_url, "probing merchant backend");
        Ok(Self {
            transport: HttpTransport::new(http)?,
            destinations,
        })
    }
}
