//! # Checkout Flow
//!
//! One page, one [`CheckoutPage`]: the flow variant, the purchase data, the
//! mounted card session and the readiness projector live together here
//! instead of in page-level globals.
//!
//! | Variant | Init endpoint | Extra request part | Page load |
//! |---------|---------------|--------------------|-----------|
//! | `Plain` | init-payment | none | mount card |
//! | `WithStorage` | init-payment | `cardStorage` | reset stored card, new profile id, mount card |
//! | `WithToken` | init-payment-with-token | `sessionToken` | fetch session token, mount card with token |

use crate::completion::{Completion, CompletionHandler};
use crate::config::{CheckoutConfig, Destinations};
use crate::error::{CheckoutError, CheckoutResult};
use crate::initiation::{InitiationRequest, PaymentInitiationClient};
use crate::model::{CardStorageIntent, Customer, Purchase, SessionToken};
use crate::page::{Navigator, PageView};
use crate::projector::ReadinessProjector;
use crate::session_token::SessionTokenClient;
use crate::store::{load_stored_card, reset_card_state, save_profile_id, ClientStore};
use crate::transport::MerchantTransport;
use crate::widget::{CardFrame, CardSession, FrameEvent, FrameEventReceiver, MountedCard};
use chrono::{DateTime, Utc};
use futures::StreamExt;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info, instrument, warn};

/// Which of the three checkout flows a page runs
#[derive(Debug, Clone)]
pub enum FlowVariant {
    /// One-time card payment
    Plain,
    /// One-time payment that also registers the card
    WithStorage(CardStorageIntent),
    /// Payment with a stored card, unlocked by a session token
    WithToken(SessionToken),
}

impl FlowVariant {
    pub fn name(&self) -> &'static str {
        match self {
            FlowVariant::Plain => "plain",
            FlowVariant::WithStorage(_) => "with-storage",
            FlowVariant::WithToken(_) => "with-token",
        }
    }
}

/// Page-side collaborators shared by every flow
#[derive(Clone)]
pub struct PagePorts {
    pub transport: Rc<dyn MerchantTransport>,
    pub view: Rc<dyn PageView>,
    pub navigator: Rc<dyn Navigator>,
    pub store: Rc<dyn ClientStore>,
}

/// Result of one press of the submit control
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Card not ready or a submission already running; nothing was sent
    Rejected,
    /// The browser was sent to a terminal page
    Completed(Completion),
    /// The flow halted; the message is in the error slot
    Failed(CheckoutError),
}

/// Flow-scoped context of one checkout page
pub struct CheckoutPage {
    variant: FlowVariant,
    customer: Customer,
    purchase: Purchase,
    session: Box<dyn CardSession>,
    ports: PagePorts,
    destinations: Destinations,
    projector: RefCell<ReadinessProjector>,
}

impl CheckoutPage {
    pub fn new(
        variant: FlowVariant,
        customer: Customer,
        purchase: Purchase,
        session: Box<dyn CardSession>,
        ports: PagePorts,
        destinations: Destinations,
    ) -> Self {
        let projector = ReadinessProjector::new();
        projector.render(&*ports.view);
        Self {
            variant,
            customer,
            purchase,
            session,
            ports,
            destinations,
            projector: RefCell::new(projector),
        }
    }

    pub fn variant(&self) -> &FlowVariant {
        &self.variant
    }

    /// Snapshot of the submit/error state
    pub fn readiness(&self) -> ReadinessProjector {
        self.projector.borrow().clone()
    }

    pub fn on_frame_event(&self, event: FrameEvent) {
        self.projector
            .borrow_mut()
            .project(&event, &*self.ports.view);
    }

    /// Feed card-frame events into the page until the frame goes away
    pub async fn pump_events(&self, mut events: FrameEventReceiver) {
        while let Some(event) = events.next().await {
            self.on_frame_event(event);
        }
        debug!("card frame event stream closed");
    }

    /// Handle a press of the submit control.
    ///
    /// Errors never escape: they land in the error slot and submit returns to
    /// the card's readiness.
    #[instrument(skip(self), fields(flow = self.variant.name()))]
    pub async fn submit(&self) -> SubmitOutcome {
        {
            let mut projector = self.projector.borrow_mut();
            if !projector.begin_submission() {
                debug!("submit ignored, card not ready or submission in flight");
                return SubmitOutcome::Rejected;
            }
            self.ports.view.set_submit_enabled(false);
        }

        match self.run_submission().await {
            Ok(completion) => SubmitOutcome::Completed(completion),
            Err(err) => {
                warn!(error = %err, category = ?err.category(), "checkout halted");
                let mut projector = self.projector.borrow_mut();
                projector.report(err.display_message());
                projector.end_submission();
                projector.render(&*self.ports.view);
                SubmitOutcome::Failed(err)
            }
        }
    }

    async fn run_submission(&self) -> CheckoutResult<Completion> {
        let request = match &self.variant {
            FlowVariant::Plain => InitiationRequest::Card {
                customer: &self.customer,
                purchase: &self.purchase,
                storage: None,
            },
            FlowVariant::WithStorage(intent) => {
                save_profile_id(&*self.ports.store, intent);
                InitiationRequest::Card {
                    customer: &self.customer,
                    purchase: &self.purchase,
                    storage: Some(intent),
                }
            }
            FlowVariant::WithToken(token) => {
                if token.is_expired(Utc::now()) {
                    warn!(expires_at = ?token.expires_at(), "session token looks expired");
                }
                InitiationRequest::Token {
                    purchase: &self.purchase,
                    session_token: token,
                }
            }
        };

        let outcome = PaymentInitiationClient::new(&*self.ports.transport)
            .initiate_and_submit(&request, &*self.session, &*self.ports.view)
            .await?;

        CompletionHandler::new(
            &*self.ports.transport,
            &*self.ports.store,
            &*self.ports.navigator,
            &self.destinations,
        )
        .on_outcome(&outcome)
        .await
    }
}

/// Purchase data of a page
#[derive(Debug, Clone)]
pub struct PageSetup {
    pub config: CheckoutConfig,
    pub customer: Customer,
    pub purchase: Purchase,
}

/// A wired page and the card events it still has to consume
pub struct MountedPage {
    pub page: CheckoutPage,
    pub events: FrameEventReceiver,
}

fn assemble(variant: FlowVariant, setup: PageSetup, mounted: MountedCard, ports: PagePorts) -> MountedPage {
    let page = CheckoutPage::new(
        variant,
        setup.customer,
        setup.purchase,
        mounted.session,
        ports,
        setup.config.destinations,
    );
    MountedPage {
        page,
        events: mounted.events,
    }
}

fn reported<T>(view: &dyn PageView, result: CheckoutResult<T>) -> CheckoutResult<T> {
    if let Err(err) = &result {
        warn!(error = %err, "page setup failed");
        view.show_error(&err.display_message());
    }
    result
}

/// Page load of the plain payment page
pub fn mount_payment_page<F: CardFrame>(
    frame: &F,
    setup: PageSetup,
    ports: PagePorts,
) -> CheckoutResult<MountedPage> {
    let view = Rc::clone(&ports.view);
    reported(&*view, mount_plain(frame, setup, ports))
}

fn mount_plain<F: CardFrame>(frame: &F, setup: PageSetup, ports: PagePorts) -> CheckoutResult<MountedPage> {
    let config = &setup.config;
    let handle = frame.initialize(&config.public_key, &config.card_init_options())?;
    let mounted = frame.mount_card(&handle, &config.render, &config.style, &config.card_mount_point)?;
    Ok(assemble(FlowVariant::Plain, setup, mounted, ports))
}

/// Page load of the card-storage page: forgets any earlier card and assigns
/// a fresh profile id before the card is mounted.
pub fn mount_card_storage_page<F: CardFrame>(
    frame: &F,
    setup: PageSetup,
    ports: PagePorts,
    now: DateTime<Utc>,
) -> CheckoutResult<MountedPage> {
    let view = Rc::clone(&ports.view);
    reported(&*view, mount_storage(frame, setup, ports, now))
}

fn mount_storage<F: CardFrame>(
    frame: &F,
    setup: PageSetup,
    ports: PagePorts,
    now: DateTime<Utc>,
) -> CheckoutResult<MountedPage> {
    reset_card_state(&*ports.store);
    let intent = CardStorageIntent::generate(now);
    save_profile_id(&*ports.store, &intent);
    info!(profile_id = intent.profile_id(), "card storage page ready for registration");

    let config = &setup.config;
    let handle = frame.initialize(&config.public_key, &config.card_init_options())?;
    let mounted = frame.mount_card(&handle, &config.render, &config.style, &config.card_mount_point)?;
    Ok(assemble(FlowVariant::WithStorage(intent), setup, mounted, ports))
}

/// Page load of the stored-card page: the frame is mounted only once a
/// session token came back.
pub async fn mount_token_payment_page<F: CardFrame>(
    frame: &F,
    setup: PageSetup,
    ports: PagePorts,
    now: DateTime<Utc>,
) -> CheckoutResult<MountedPage> {
    let view = Rc::clone(&ports.view);
    let result = mount_with_token(frame, setup, ports, now).await;
    reported(&*view, result)
}

async fn mount_with_token<F: CardFrame>(
    frame: &F,
    setup: PageSetup,
    ports: PagePorts,
    now: DateTime<Utc>,
) -> CheckoutResult<MountedPage> {
    let card = load_stored_card(&*ports.store)?;
    let token = SessionTokenClient::new(&*ports.transport)
        .fetch_session_token(&card, now)
        .await?;

    let config = &setup.config;
    let handle = frame.initialize(&config.public_key, &config.token_init_options())?;
    let mounted = frame.mount_card_with_token(
        &handle,
        &token,
        &config.render,
        &config.style,
        &config.token_card_mount_point,
    )?;
    Ok(assemble(FlowVariant::WithToken(token), setup, mounted, ports))
}
