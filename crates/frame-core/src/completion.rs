//! # Payment Completion
//!
//! Terminal step of every flow. A claimed success is only trusted after the
//! merchant backend verified its signature; anything else goes straight to
//! the error page.
//!
//! ```text
//! outcome.status == "ok" ──► check-payment-response ──► 2xx ──► persist token? ──► success page
//!                                                    └─► non-2xx / no response ──► stay, show error
//! outcome.status != "ok" ──────────────────────────────────────────────────────► error page
//! ```

use crate::config::Destinations;
use crate::error::{CheckoutError, CheckoutResult};
use crate::model::{PaymentOutcome, VerificationReceipt};
use crate::page::Navigator;
use crate::store::{save_token, ClientStore};
use crate::transport::{Endpoint, MerchantTransport};
use tracing::{debug, info, instrument, warn};

/// Where a completed outcome sent the browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Verified success
    Succeeded { url: String },
    /// Non-ok status reported by the gateway
    Declined { url: String },
}

impl Completion {
    pub fn url(&self) -> &str {
        match self {
            Completion::Succeeded { url } | Completion::Declined { url } => url,
        }
    }
}

/// Verifies and routes the card frame's terminal result
pub struct CompletionHandler<'a> {
    transport: &'a dyn MerchantTransport,
    store: &'a dyn ClientStore,
    navigator: &'a dyn Navigator,
    destinations: &'a Destinations,
}

impl<'a> CompletionHandler<'a> {
    pub fn new(
        transport: &'a dyn MerchantTransport,
        store: &'a dyn ClientStore,
        navigator: &'a dyn Navigator,
        destinations: &'a Destinations,
    ) -> Self {
        Self {
            transport,
            store,
            navigator,
            destinations,
        }
    }

    /// Route one outcome. Navigates on `Ok`; on `Err` the page stays put.
    #[instrument(skip_all, fields(status = outcome.status.as_str(), payment_id = %outcome.payment_id))]
    pub async fn on_outcome(&self, outcome: &PaymentOutcome) -> CheckoutResult<Completion> {
        if !outcome.status.is_ok() {
            let url = self.destinations.error_url(outcome);
            info!(%url, "payment not approved");
            self.navigator.navigate(&url);
            return Ok(Completion::Declined { url });
        }

        let receipt = self.verify(outcome).await?;
        debug!("signature is valid");

        match &receipt.token_value {
            Some(token) if !token.as_str().is_empty() => {
                info!("persisting stored card token");
                save_token(self.store, token);
            }
            Some(_) => warn!("verification returned an empty card token, keeping the stored one"),
            None => {}
        }

        let url = self.destinations.success_url(outcome);
        info!(%url, "payment approved");
        self.navigator.navigate(&url);
        Ok(Completion::Succeeded { url })
    }

    async fn verify(&self, outcome: &PaymentOutcome) -> CheckoutResult<VerificationReceipt> {
        let body = serde_json::to_value(outcome)?;
        let response = self
            .transport
            .post_json(Endpoint::CheckPaymentResponse, &body)
            .await?;

        if !response.is_success() {
            warn!(status = response.status, "signature verification rejected");
            return Err(CheckoutError::VerificationFailed {
                status: response.status,
            });
        }

        // Plain-payment backends answer with an empty or non-JSON body
        if response.body.trim().is_empty() {
            return Ok(VerificationReceipt::default());
        }
        Ok(response.json().unwrap_or_else(|e| {
            warn!(error = %e, "verification body carried no readable receipt");
            VerificationReceipt::default()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OutcomeStatus;
    use crate::store::{MemoryStore, TOKEN_KEY};
    use crate::transport::RawResponse;
    use async_trait::async_trait;
    use std::cell::RefCell;

    struct Verifier {
        response: CheckoutResult<RawResponse>,
        calls: RefCell<Vec<Endpoint>>,
    }

    impl Verifier {
        fn answering(status: u16, body: &str) -> Self {
            Self {
                response: Ok(RawResponse::new(status, body)),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl MerchantTransport for Verifier {
        async fn post_json(&self, endpoint: Endpoint, _body: &serde_json::Value) -> CheckoutResult<RawResponse> {
            self.calls.borrow_mut().push(endpoint);
            match &self.response {
                Ok(response) => Ok(response.clone()),
                Err(err) => Err(CheckoutError::Network(err.to_string())),
            }
        }
    }

    #[derive(Default)]
    struct Urls(RefCell<Vec<String>>);

    impl Navigator for Urls {
        fn navigate(&self, url: &str) {
            self.0.borrow_mut().push(url.to_string());
        }
    }

    fn outcome(status: &str) -> PaymentOutcome {
        PaymentOutcome {
            status: OutcomeStatus::from(status.to_string()),
            display_message: "Approved".into(),
            payment_id: "PAY123".into(),
            signature: "sig".into(),
            approval_code: "00000".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_declined_skips_verification() {
        let transport = Verifier::answering(200, "");
        let store = MemoryStore::new();
        let nav = Urls::default();
        let destinations = Destinations::default();

        let done = CompletionHandler::new(&transport, &store, &nav, &destinations)
            .on_outcome(&outcome("failed"))
            .await
            .unwrap();

        assert!(matches!(done, Completion::Declined { .. }));
        assert!(done.url().starts_with("/error.html?displayMessage=Approved&status=failed"));
        assert!(transport.calls.borrow().is_empty());
        assert_eq!(*nav.0.borrow(), [done.url().to_string()]);
    }

    #[tokio::test]
    async fn test_verified_success_persists_token() {
        let transport = Verifier::answering(200, r#"{"token_value":"tok_9"}"#);
        let store = MemoryStore::new();
        let nav = Urls::default();
        let destinations = Destinations::default();

        let done = CompletionHandler::new(&transport, &store, &nav, &destinations)
            .on_outcome(&outcome("ok"))
            .await
            .unwrap();

        assert!(matches!(done, Completion::Succeeded { .. }));
        assert_eq!(*transport.calls.borrow(), [Endpoint::CheckPaymentResponse]);
        assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("tok_9"));
    }

    #[tokio::test]
    async fn test_empty_receipt_still_succeeds() {
        for body in ["", "OK", "{}"] {
            let transport = Verifier::answering(200, body);
            let store = MemoryStore::new();
            let nav = Urls::default();
            let destinations = Destinations::default();

            let done = CompletionHandler::new(&transport, &store, &nav, &destinations)
                .on_outcome(&outcome("ok"))
                .await
                .unwrap();

            assert!(done.url().starts_with("/success.html?"));
            assert_eq!(store.get(TOKEN_KEY), None);
        }
    }

    #[tokio::test]
    async fn test_empty_token_keeps_stored_card() {
        for body in [r#"{"token_value":""}"#, r#"{"token_value":42}"#] {
            let transport = Verifier::answering(200, body);
            let store = MemoryStore::new().with_entry(TOKEN_KEY, "tok_1");
            let nav = Urls::default();
            let destinations = Destinations::default();

            let done = CompletionHandler::new(&transport, &store, &nav, &destinations)
                .on_outcome(&outcome("ok"))
                .await
                .unwrap();

            assert!(matches!(done, Completion::Succeeded { .. }));
            assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("tok_1"));
        }
    }

    #[tokio::test]
    async fn test_rejected_signature_stays_on_page() {
        let transport = Verifier::answering(400, r#"{"error":"bad signature"}"#);
        let store = MemoryStore::new();
        let nav = Urls::default();
        let destinations = Destinations::default();

        let err = CompletionHandler::new(&transport, &store, &nav, &destinations)
            .on_outcome(&outcome("ok"))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::VerificationFailed { status: 400 }));
        assert_eq!(err.display_message(), crate::error::VERIFICATION_FAILED_MESSAGE);
        assert!(nav.0.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_verifier_stays_on_page() {
        let transport = Verifier {
            response: Err(CheckoutError::Network("Failed to fetch".into())),
            calls: RefCell::new(Vec::new()),
        };
        let store = MemoryStore::new();
        let nav = Urls::default();
        let destinations = Destinations::default();

        let err = CompletionHandler::new(&transport, &store, &nav, &destinations)
            .on_outcome(&outcome("ok"))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Network(_)));
        assert!(nav.0.borrow().is_empty());
    }
}
