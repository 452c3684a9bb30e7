//! # Command Handlers
//!
//! One handler per subcommand. Results go to stdout as `key: value` lines;
//! failures come back as `CheckoutError` for `main` to report.

use crate::cli::InitArgs;
use crate::console::{ConsoleNavigator, ConsoleView};
use crate::state::ProbeState;
use chrono::Utc;
use frame_core::{
    BusyGuard, CardStorageIntent, CheckoutResult, ClientStore, CompletionHandler, CurrencyCode,
    Customer, InitiationRequest, MemoryStore, PaymentInitiationClient, PaymentOutcome, Purchase,
    SessionToken, SessionTokenClient, StoredCard, StoredToken, TOKEN_KEY,
};
use tracing::instrument;

// =============================================================================
// init
// =============================================================================

#[instrument(skip_all, fields(amount = %args.amount, currency = %args.currency))]
pub async fn init(state: &ProbeState, args: &InitArgs) -> CheckoutResult<()> {
    let purchase = Purchase::new(
        args.amount,
        CurrencyCode::new(args.currency.as_str())?,
        args.cart.as_str(),
    )?;

    let mut customer = Customer::new();
    if let Some([name, surname]) = args.cardholder.as_deref() {
        customer = customer.with_name(name.as_str(), surname.as_str());
    }
    if let Some(email) = &args.email {
        customer = customer.with_email(email.as_str());
    }

    let intent = args.profile_id.as_deref().map(|id| match id {
        "new" => CardStorageIntent::generate(Utc::now()),
        id => CardStorageIntent::new(id),
    });
    let session_token = args
        .session_token
        .as_deref()
        .map(|value| SessionToken::new(value, None, Utc::now()));

    let request = match &session_token {
        Some(token) => InitiationRequest::Token {
            purchase: &purchase,
            session_token: token,
        },
        None => InitiationRequest::Card {
            customer: &customer,
            purchase: &purchase,
            storage: intent.as_ref(),
        },
    };

    let view = ConsoleView::new();
    let init = {
        let _busy = BusyGuard::show(&view);
        PaymentInitiationClient::new(&state.transport)
            .initiate(&request)
            .await?
    };

    println!("endpoint: {}", request.endpoint());
    if let Some(intent) = &intent {
        println!("user_card_profiles_id: {}", intent.profile_id());
    }
    println!("payment_id: {}", init.payment_id);
    Ok(())
}

// =============================================================================
// session-token
// =============================================================================

#[instrument(skip(state, token))]
pub async fn session_token(state: &ProbeState, profile_id: &str, token: &str) -> CheckoutResult<()> {
    let card = StoredCard {
        profile_id: profile_id.to_string(),
        token: StoredToken::new(token),
    };
    let session = SessionTokenClient::new(&state.transport)
        .fetch_session_token(&card, Utc::now())
        .await?;

    println!("session_token: {}", session.value());
    if let Some(validity) = session.validity() {
        println!("session_token_validity: {}", validity);
    }
    if let Some(expires_at) = session.expires_at() {
        println!("expires_at: {}", expires_at.to_rfc3339());
    }
    Ok(())
}

// =============================================================================
// verify
// =============================================================================

#[instrument(skip_all)]
pub async fn verify(state: &ProbeState, query: &str) -> CheckoutResult<()> {
    let outcome = PaymentOutcome::from_query(query);
    let store = MemoryStore::new();
    let navigator = ConsoleNavigator::new();

    CompletionHandler::new(&state.transport, &store, &navigator, &state.destinations)
        .on_outcome(&outcome)
        .await?;

    if let Some(token) = store.get(TOKEN_KEY) {
        println!("token_value: {}", token);
    }
    Ok(())
}
