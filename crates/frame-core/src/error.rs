//! # Checkout Error Types
//!
//! Typed error handling for the card-frame checkout flows.
//! Every fallible operation returns `Result<T, CheckoutError>`; the page
//! context turns errors into a message in the single error slot.

use thiserror::Error;

/// Message shown when the signature check on a claimed success is rejected.
pub const VERIFICATION_FAILED_MESSAGE: &str = "Error while checking payment response";

/// Core error type for all checkout operations
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Configuration errors (missing public key, bad TOML)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid purchase or customer data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Request never produced a response (rejected fetch, DNS, TLS, connection reset)
    #[error("{0}")]
    Network(String),

    /// Merchant backend answered with a non-2xx status
    #[error("Backend returned HTTP {status}")]
    Backend {
        status: u16,
        /// The `error` field of the response body, when the body carried one
        message: Option<String>,
    },

    /// 2xx response whose body does not have the expected shape
    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),

    /// Session-token payload arrived without a `session_token` value
    #[error("Error while getting token from backend: {body}")]
    MissingSessionToken { body: String },

    /// The reuse flow needs both a profile id and a stored token in client state
    #[error("No stored card found: missing {missing}")]
    MissingStoredCard { missing: &'static str },

    /// Signature verification of an `ok` outcome was rejected
    #[error("Error while checking payment response")]
    VerificationFailed { status: u16 },

    /// The card frame could not be initialized, mounted or driven
    #[error("Card frame error: {0}")]
    Frame(String),

    /// Submit pressed while the card is not ready or a submission is in flight
    #[error("Card is not ready for submission")]
    NotReady,

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Failure classes as the page reports them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Transport failure or non-2xx status
    Transport,
    /// Well-formed answer that still means failure
    Application,
    /// Signature check rejected a claimed success
    Verification,
    /// Raised by the card frame itself
    Widget,
    /// Local programming or configuration mistake
    Local,
}

impl CheckoutError {
    /// Text for the page's error slot.
    ///
    /// A backend error body's `error` field wins over the generic status text.
    pub fn display_message(&self) -> String {
        match self {
            CheckoutError::Backend {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Maps the error onto the reporting taxonomy
    pub fn category(&self) -> ErrorCategory {
        match self {
            CheckoutError::Network(_) => ErrorCategory::Transport,
            CheckoutError::Backend { message: None, .. } => ErrorCategory::Transport,
            CheckoutError::Backend {
                message: Some(_), ..
            }
            | CheckoutError::MalformedResponse(_)
            | CheckoutError::MissingSessionToken { .. }
            | CheckoutError::MissingStoredCard { .. } => ErrorCategory::Application,
            CheckoutError::VerificationFailed { .. } => ErrorCategory::Verification,
            CheckoutError::Frame(_) => ErrorCategory::Widget,
            CheckoutError::Configuration(_)
            | CheckoutError::InvalidRequest(_)
            | CheckoutError::NotReady
            | CheckoutError::Serialization(_) => ErrorCategory::Local,
        }
    }
}

impl From<serde_json::Error> for CheckoutError {
    fn from(err: serde_json::Error) -> Self {
        CheckoutError::Serialization(err.to_string())
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;
