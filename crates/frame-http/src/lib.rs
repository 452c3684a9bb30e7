//! # frame-http
//!
//! Merchant backend plumbing for frame-core.
//!
//! 1. **HttpTransport** - `MerchantTransport` over reqwest
//!    - JSON POST to the four merchant endpoints
//!    - Status and body handed back untouched
//!    - Optional request timeout outside the browser
//!
//! 2. **Config loading**
//!    - `HttpConfig::from_env()` for the backend base URL
//!    - `load_checkout_config()` for `config/checkout.toml`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use frame_core::{PaymentInitiationClient, InitiationRequest};
//! use frame_http::HttpTransport;
//!
//! let transport = HttpTransport::from_env()?;
//! let init = PaymentInitiationClient::new(&transport)
//!     .initiate(&InitiationRequest::Card { customer: &customer, purchase: &purchase, storage: None })
//!     .await?;
//! ```

pub mod config;
pub mod transport;

// Re-exports
pub use config::{load_checkout_config, load_checkout_config_from, HttpConfig, CONFIG_PATHS};
pub use transport::HttpTransport;
