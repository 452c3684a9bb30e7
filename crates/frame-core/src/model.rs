//! # Checkout Data Model
//!
//! Customer, purchase and the values that travel between the page, the
//! merchant backend and the card frame.

use crate::error::{CheckoutError, CheckoutResult};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Cardholder data forwarded to the merchant backend.
///
/// Every field is opaque; nothing here is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cardholder_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cardholder_surname: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cardholder_address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cardholder_city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cardholder_zip_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cardholder_country: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cardholder_email: Option<String>,
}

impl Customer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>, surname: impl Into<String>) -> Self {
        self.cardholder_name = Some(name.into());
        self.cardholder_surname = Some(surname.into());
        self
    }

    pub fn with_address(
        mut self,
        address: impl Into<String>,
        city: impl Into<String>,
        zip_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        self.cardholder_address = Some(address.into());
        self.cardholder_city = Some(city.into());
        self.cardholder_zip_code = Some(zip_code.into());
        self.cardholder_country = Some(country.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.cardholder_email = Some(email.into());
        self
    }
}

/// ISO 4217 alphabetic currency code ("EUR", "USD", ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> CheckoutResult<Self> {
        let code = code.into();
        if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(CheckoutError::InvalidRequest(format!(
                "currency must be a three-letter ISO 4217 code, got {:?}",
                code
            )));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = CheckoutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What is being paid for.
///
/// The amount is in the major currency unit (1.23 EUR, not 123 cents) and
/// goes over the wire as a JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    pub currency: CurrencyCode,

    /// Cart description
    pub cart: String,
}

impl Purchase {
    pub fn new(amount: Decimal, currency: CurrencyCode, cart: impl Into<String>) -> CheckoutResult<Self> {
        if amount <= Decimal::ZERO {
            return Err(CheckoutError::InvalidRequest(format!(
                "amount must be positive, got {}",
                amount
            )));
        }
        Ok(Self {
            amount,
            currency,
            cart: cart.into(),
        })
    }
}

/// Request to register the card for later reuse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardStorageIntent {
    /// Customer identifier in the merchant system
    pub user_card_profiles_id: String,
}

impl CardStorageIntent {
    pub fn new(profile_id: impl Into<String>) -> Self {
        Self {
            user_card_profiles_id: profile_id.into(),
        }
    }

    /// Fresh `SHOP_<unix millis>` profile id for a registration page load
    pub fn generate(now: DateTime<Utc>) -> Self {
        Self::new(format!("SHOP_{}", now.timestamp_millis()))
    }

    pub fn profile_id(&self) -> &str {
        &self.user_card_profiles_id
    }
}

/// Opaque payment identifier issued by the merchant backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(String);

impl PaymentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of a successful init-payment call
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentInitResult {
    pub payment_id: PaymentId,
}

/// Long-lived token representing a registered card
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredToken(String);

impl StoredToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StoredToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StoredToken({})", redact(&self.0))
    }
}

/// Short-lived credential that unlocks the stored-card frame
#[derive(Clone)]
pub struct SessionToken {
    value: String,
    validity: Option<String>,
    received_at: DateTime<Utc>,
}

impl SessionToken {
    pub fn new(value: impl Into<String>, validity: Option<String>, received_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            validity,
            received_at,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Validity exactly as the backend reported it
    pub fn validity(&self) -> Option<&str> {
        self.validity.as_deref()
    }

    /// Expiry derived from the validity: whole seconds after receipt, or an
    /// RFC 3339 timestamp. `None` when the validity is absent or unreadable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let validity = self.validity.as_deref()?.trim();
        if let Ok(secs) = validity.parse::<i64>() {
            return Some(self.received_at + Duration::seconds(secs));
        }
        DateTime::parse_from_rfc3339(validity)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().map(|exp| exp <= now).unwrap_or(false)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("value", &redact(&self.value))
            .field("validity", &self.validity)
            .field("received_at", &self.received_at)
            .finish()
    }
}

/// Status reported by the card frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OutcomeStatus {
    Ok,
    /// Anything else the gateway reports ("failed", "cancelled", ...)
    Other(String),
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OutcomeStatus::Ok => "ok",
            OutcomeStatus::Other(s) => s,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, OutcomeStatus::Ok)
    }
}

impl Default for OutcomeStatus {
    fn default() -> Self {
        OutcomeStatus::Other(String::new())
    }
}

impl From<String> for OutcomeStatus {
    fn from(s: String) -> Self {
        if s == "ok" {
            OutcomeStatus::Ok
        } else {
            OutcomeStatus::Other(s)
        }
    }
}

impl From<OutcomeStatus> for String {
    fn from(status: OutcomeStatus) -> Self {
        match status {
            OutcomeStatus::Ok => "ok".to_string(),
            OutcomeStatus::Other(s) => s,
        }
    }
}

/// Query parameter names carried to the terminal pages, in order
pub const OUTCOME_QUERY_FIELDS: [&str; 6] = [
    "displayMessage",
    "status",
    "errorCode",
    "paymentId",
    "signature",
    "approvalCode",
];

/// Terminal result delivered by the card frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOutcome {
    #[serde(default, deserialize_with = "loose_status")]
    pub status: OutcomeStatus,

    #[serde(default, deserialize_with = "loose_text")]
    pub display_message: String,

    #[serde(default, deserialize_with = "loose_text")]
    pub error_code: String,

    #[serde(default, deserialize_with = "loose_text")]
    pub payment_id: String,

    #[serde(default, deserialize_with = "loose_text")]
    pub approval_code: String,

    #[serde(default, deserialize_with = "loose_text")]
    pub signature: String,

    /// Further fields from the frame, forwarded untouched to verification
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PaymentOutcome {
    /// The six terminal-page fields as ordered name/value pairs
    pub fn query_pairs(&self) -> [(&'static str, &str); 6] {
        [
            (OUTCOME_QUERY_FIELDS[0], self.display_message.as_str()),
            (OUTCOME_QUERY_FIELDS[1], self.status.as_str()),
            (OUTCOME_QUERY_FIELDS[2], self.error_code.as_str()),
            (OUTCOME_QUERY_FIELDS[3], self.payment_id.as_str()),
            (OUTCOME_QUERY_FIELDS[4], self.signature.as_str()),
            (OUTCOME_QUERY_FIELDS[5], self.approval_code.as_str()),
        ]
    }

    /// `application/x-www-form-urlencoded` query for the terminal pages
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query_pairs())
            .finish()
    }

    /// Reads an outcome back from a terminal page query (leading `?` allowed).
    /// Missing fields stay empty; unknown parameters are ignored.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut outcome = PaymentOutcome::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let value = value.into_owned();
            match key.as_ref() {
                "displayMessage" => outcome.display_message = value,
                "status" => outcome.status = OutcomeStatus::from(value),
                "errorCode" => outcome.error_code = value,
                "paymentId" => outcome.payment_id = value,
                "signature" => outcome.signature = value,
                "approvalCode" => outcome.approval_code = value,
                _ => {}
            }
        }
        outcome
    }
}

/// Frame result fields may be `null` or numbers; they are read as text and
/// `null` becomes empty.
fn loose_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

fn loose_status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<OutcomeStatus, D::Error> {
    loose_text(deserializer).map(OutcomeStatus::from)
}

/// Body of a successful check-payment-response call
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerificationReceipt {
    #[serde(default)]
    pub token_value: Option<StoredToken>,
}

fn redact(secret: &str) -> String {
    let shown: String = secret.chars().take(4).collect();
    format!("{}…", shown)
}
