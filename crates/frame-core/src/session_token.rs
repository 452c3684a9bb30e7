//! # Session Token Exchange
//!
//! The stored-card frame can only be rendered with a short-lived session
//! token, obtained by trading the stored profile id and token.

use crate::error::{CheckoutError, CheckoutResult};
use crate::model::SessionToken;
use crate::store::StoredCard;
use crate::transport::{Endpoint, MerchantTransport};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

/// Calls fetch-session-token on the merchant backend
pub struct SessionTokenClient<'a> {
    transport: &'a dyn MerchantTransport,
}

impl<'a> SessionTokenClient<'a> {
    pub fn new(transport: &'a dyn MerchantTransport) -> Self {
        Self { transport }
    }

    /// Exchange a stored card for a session token.
    ///
    /// A 2xx payload without `session_token` fails with
    /// [`CheckoutError::MissingSessionToken`] carrying the raw body; transport
    /// and status failures keep their own variants.
    #[instrument(skip_all, fields(profile_id = %card.profile_id))]
    pub async fn fetch_session_token(
        &self,
        card: &StoredCard,
        now: DateTime<Utc>,
    ) -> CheckoutResult<SessionToken> {
        let body = json!({
            "userCardProfileId": card.profile_id,
            "token": card.token.as_str(),
        });

        let response = self
            .transport
            .post_json(Endpoint::FetchSessionToken, &body)
            .await?
            .error_for_status()?;
        let parsed: Value = response.json()?;

        let value = match parsed
            .get("session_token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
        {
            Some(value) => value.to_string(),
            None => {
                warn!("session token payload carried no token");
                return Err(CheckoutError::MissingSessionToken {
                    body: response.body,
                });
            }
        };

        let validity = match parsed.get("session_token_validity") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };

        let token = SessionToken::new(value, validity, now);
        info!(validity = ?token.validity(), expires_at = ?token.expires_at(), "session token received");
        Ok(token)
    }
}
