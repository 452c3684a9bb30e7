//! # Merchant Backend Transport
//!
//! The page talks to exactly four merchant endpoints, all JSON over POST.
//! Implementations only move bytes; status and body interpretation lives in
//! the clients so every transport behaves the same.

use crate::error::{CheckoutError, CheckoutResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;

/// Merchant backend endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    InitPayment,
    CheckPaymentResponse,
    FetchSessionToken,
    InitPaymentWithToken,
}

impl Endpoint {
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::InitPayment => "init-payment",
            Endpoint::CheckPaymentResponse => "check-payment-response",
            Endpoint::FetchSessionToken => "fetch-session-token",
            Endpoint::InitPaymentWithToken => "init-payment-with-token",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Status and body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<serde_json::Value>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `error` field of a JSON error body, if any
    pub fn error_message(&self) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_str(&self.body).ok()?;
        match parsed.error? {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Fails non-2xx responses, carrying the body's `error` message along
    pub fn error_for_status(self) -> CheckoutResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(CheckoutError::Backend {
                status: self.status,
                message: self.error_message(),
            })
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> CheckoutResult<T> {
        serde_json::from_str(&self.body).map_err(|e| CheckoutError::MalformedResponse(e.to_string()))
    }
}

/// Carries JSON requests to the merchant backend
#[async_trait(?Send)]
pub trait MerchantTransport {
    /// POST `body` to `endpoint`.
    ///
    /// Returns `Err(CheckoutError::Network)` only when no response arrived;
    /// any HTTP status, including errors, comes back as a `RawResponse`.
    async fn post_json(
        &self,
        endpoint: Endpoint,
        body: &serde_json::Value,
    ) -> CheckoutResult<RawResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_for_status_extracts_message() {
        let err = RawResponse::new(400, r#"{"error":"Invalid amount"}"#)
            .error_for_status()
            .unwrap_err();
        assert_eq!(err.display_message(), "Invalid amount");
    }

    #[test]
    fn test_error_for_status_without_json_body() {
        let err = RawResponse::new(500, "<html>oops</html>")
            .error_for_status()
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Backend { status: 500, message: None }));
    }

    #[test]
    fn test_non_string_error_field_is_stringified() {
        let resp = RawResponse::new(422, r#"{"error":{"code":7}}"#);
        assert_eq!(resp.error_message().as_deref(), Some(r#"{"code":7}"#));
    }

    #[test]
    fn test_malformed_success_body() {
        #[derive(Debug, Deserialize)]
        struct Body {
            #[allow(dead_code)]
            payment_id: String,
        }

        let resp = RawResponse::new(200, "not json");
        assert!(matches!(
            resp.json::<Body>(),
            Err(CheckoutError::MalformedResponse(_))
        ));
    }
}
