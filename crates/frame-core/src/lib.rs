//! # frame-core
//!
//! Client-side orchestration of a card-frame checkout.
//!
//! This crate provides:
//! - `CardFrame` / `CardSession` traits wrapping the hosted card widget
//! - `MerchantTransport` for the four merchant backend endpoints
//! - `PaymentInitiationClient`, `SessionTokenClient` and `CompletionHandler`
//! - `ReadinessProjector` for the submit control and the error slot
//! - `CheckoutPage` and the page bootstraps for the plain, card-storage and
//!   stored-card flows
//! - `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use frame_core::{mount_payment_page, PageSetup, PagePorts, SubmitOutcome};
//!
//! let mounted = mount_payment_page(&frame, setup, ports)?;
//! spawn_local(async move { page.pump_events(mounted.events).await });
//!
//! // On click of the submit control
//! match mounted.page.submit().await {
//!     SubmitOutcome::Completed(done) => tracing::info!(url = done.url(), "left the page"),
//!     SubmitOutcome::Failed(_) | SubmitOutcome::Rejected => {}
//! }
//! ```

pub mod completion;
pub mod config;
pub mod error;
pub mod flow;
pub mod initiation;
pub mod model;
pub mod page;
pub mod projector;
pub mod session_token;
pub mod store;
pub mod transport;
pub mod widget;

// Re-exports for convenience
pub use completion::{Completion, CompletionHandler};
pub use config::{CheckoutConfig, Destinations, EndpointPaths};
pub use error::{CheckoutError, CheckoutResult, ErrorCategory, VERIFICATION_FAILED_MESSAGE};
pub use flow::{
    mount_card_storage_page, mount_payment_page, mount_token_payment_page, CheckoutPage,
    FlowVariant, MountedPage, PagePorts, PageSetup, SubmitOutcome,
};
pub use initiation::{InitiationRequest, PaymentInitiationClient};
pub use model::{
    CardStorageIntent, CurrencyCode, Customer, OutcomeStatus, PaymentId, PaymentInitResult,
    PaymentOutcome, Purchase, SessionToken, StoredToken, VerificationReceipt,
};
pub use page::{BusyGuard, Navigator, PageView};
pub use projector::ReadinessProjector;
pub use session_token::SessionTokenClient;
pub use store::{ClientStore, MemoryStore, StoredCard, PROFILE_ID_KEY, TOKEN_KEY};
pub use transport::{Endpoint, MerchantTransport, RawResponse};
pub use widget::{
    frame_event_channel, CardFrame, CardSession, FrameEvent, FrameEventKind, FrameEventReceiver,
    FrameEventSender, InitOptions, MountedCard, RenderOptions, StyleOptions,
};
