//! # Payment Initiation
//!
//! Announces the payment to the merchant backend and hands the returned
//! payment identifier straight to the card frame.
//!
//! The init body nests independently JSON-encoded sub-objects under fixed
//! keys, e.g. `{"customer": "{\"cardholderCity\":\"Zagreb\"}", "purchase": "..."}`.

use crate::error::CheckoutResult;
use crate::model::{CardStorageIntent, Customer, PaymentInitResult, PaymentOutcome, Purchase, SessionToken};
use crate::page::{BusyGuard, PageView};
use crate::transport::{Endpoint, MerchantTransport};
use crate::widget::CardSession;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

/// Shape of one init call
#[derive(Debug, Clone, Copy)]
pub enum InitiationRequest<'a> {
    /// New card, optionally registered for reuse
    Card {
        customer: &'a Customer,
        purchase: &'a Purchase,
        storage: Option<&'a CardStorageIntent>,
    },
    /// Previously stored card unlocked by a session token
    Token {
        purchase: &'a Purchase,
        session_token: &'a SessionToken,
    },
}

impl InitiationRequest<'_> {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            InitiationRequest::Card { .. } => Endpoint::InitPayment,
            InitiationRequest::Token { .. } => Endpoint::InitPaymentWithToken,
        }
    }

    /// JSON body with each sub-object encoded as a string
    pub fn body(&self) -> CheckoutResult<Value> {
        let mut body = Map::new();
        match self {
            InitiationRequest::Card {
                customer,
                purchase,
                storage,
            } => {
                body.insert("customer".into(), Value::String(serde_json::to_string(customer)?));
                body.insert("purchase".into(), Value::String(serde_json::to_string(purchase)?));
                if let Some(intent) = storage {
                    body.insert("cardStorage".into(), Value::String(serde_json::to_string(intent)?));
                }
            }
            InitiationRequest::Token {
                purchase,
                session_token,
            } => {
                body.insert("purchase".into(), Value::String(serde_json::to_string(purchase)?));
                body.insert(
                    "sessionToken".into(),
                    Value::String(serde_json::to_string(session_token.value())?),
                );
            }
        }
        Ok(Value::Object(body))
    }
}

/// Calls init-payment (or init-payment-with-token) on the merchant backend
pub struct PaymentInitiationClient<'a> {
    transport: &'a dyn MerchantTransport,
}

impl<'a> PaymentInitiationClient<'a> {
    pub fn new(transport: &'a dyn MerchantTransport) -> Self {
        Self { transport }
    }

    /// Obtain a payment identifier; non-2xx and malformed bodies are errors.
    #[instrument(skip_all, fields(endpoint = %request.endpoint()))]
    pub async fn initiate(&self, request: &InitiationRequest<'_>) -> CheckoutResult<PaymentInitResult> {
        let body = request.body()?;
        debug!(keys = ?body.as_object().map(|o| o.keys().collect::<Vec<_>>()), "sending init request");

        let response = self
            .transport
            .post_json(request.endpoint(), &body)
            .await?
            .error_for_status()?;
        let result: PaymentInitResult = response.json()?;

        info!(payment_id = %result.payment_id, "transaction initialized");
        Ok(result)
    }

    /// Initiate under the busy indicator, then submit the payment to the card frame.
    ///
    /// The indicator covers exactly the init call. The card session sees the
    /// returned identifier once, and only after the init call resolved.
    pub async fn initiate_and_submit(
        &self,
        request: &InitiationRequest<'_>,
        session: &dyn CardSession,
        view: &dyn PageView,
    ) -> CheckoutResult<PaymentOutcome> {
        let init = {
            let _busy = BusyGuard::show(view);
            self.initiate(request).await?
        };

        let outcome = session.submit_payment(&init.payment_id).await?;
        debug!(status = outcome.status.as_str(), payment_id = %outcome.payment_id, "card payment finished");
        Ok(outcome)
    }
}
