//! Scripted stand-ins for the widget, the merchant backend and the page.
#![allow(dead_code)]

use async_trait::async_trait;
use frame_core::{
    frame_event_channel, CardFrame, CardSession, CheckoutConfig, CheckoutError, CheckoutResult,
    CurrencyCode, Customer, Endpoint, FrameEvent, FrameEventSender, InitOptions, MemoryStore,
    MerchantTransport, MountedCard, Navigator, OutcomeStatus, PageView, PagePorts, PageSetup,
    PaymentId, PaymentOutcome, Purchase, RawResponse, RenderOptions, SessionToken, StyleOptions,
};
use rust_decimal_macros::dec;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// Ordered log of everything observable that happened across the fakes
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub fn record(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

// ============================================================================
// Merchant backend
// ============================================================================

pub struct ScriptedTransport {
    journal: Journal,
    responses: RefCell<VecDeque<CheckoutResult<RawResponse>>>,
    requests: RefCell<Vec<(Endpoint, Value)>>,
}

impl ScriptedTransport {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            responses: RefCell::new(VecDeque::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn respond(&self, status: u16, body: &str) {
        self.responses
            .borrow_mut()
            .push_back(Ok(RawResponse::new(status, body)));
    }

    pub fn fail(&self, message: &str) {
        self.responses
            .borrow_mut()
            .push_back(Err(CheckoutError::Network(message.to_string())));
    }

    pub fn requests(&self) -> Vec<(Endpoint, Value)> {
        self.requests.borrow().clone()
    }

    pub fn endpoints(&self) -> Vec<Endpoint> {
        self.requests.borrow().iter().map(|(e, _)| *e).collect()
    }
}

#[async_trait(?Send)]
impl MerchantTransport for ScriptedTransport {
    async fn post_json(&self, endpoint: Endpoint, body: &Value) -> CheckoutResult<RawResponse> {
        self.journal.record(format!("post:{}", endpoint));
        self.requests.borrow_mut().push((endpoint, body.clone()));
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(CheckoutError::Network("no scripted response".into())))
    }
}

// ============================================================================
// Page
// ============================================================================

pub struct RecordingView {
    journal: Journal,
    submit_enabled: Cell<bool>,
    error: RefCell<Option<String>>,
}

impl RecordingView {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            submit_enabled: Cell::new(false),
            error: RefCell::new(None),
        }
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled.get()
    }

    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }
}

impl PageView for RecordingView {
    fn set_submit_enabled(&self, enabled: bool) {
        self.submit_enabled.set(enabled);
    }

    fn show_error(&self, message: &str) {
        *self.error.borrow_mut() = Some(message.to_string());
    }

    fn clear_error(&self) {
        *self.error.borrow_mut() = None;
    }

    fn show_busy(&self) {
        self.journal.record("busy:show");
    }

    fn hide_busy(&self) {
        self.journal.record("busy:hide");
    }
}

pub struct RecordingNavigator {
    journal: Journal,
    urls: RefCell<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            urls: RefCell::new(Vec::new()),
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, url: &str) {
        self.journal.record(format!("navigate:{}", url));
        self.urls.borrow_mut().push(url.to_string());
    }
}

// ============================================================================
// Card frame
// ============================================================================

pub struct ScriptedCardSession {
    journal: Journal,
    outcome: PaymentOutcome,
}

#[async_trait(?Send)]
impl CardSession for ScriptedCardSession {
    async fn submit_payment(&self, payment_id: &PaymentId) -> CheckoutResult<PaymentOutcome> {
        self.journal.record(format!("submit:{}", payment_id));
        Ok(self.outcome.clone())
    }
}

pub struct FakeCardFrame {
    journal: Journal,
    outcome: PaymentOutcome,
    inits: RefCell<Vec<(String, InitOptions)>>,
    sender: RefCell<Option<FrameEventSender>>,
}

impl FakeCardFrame {
    pub fn new(journal: Journal, outcome: PaymentOutcome) -> Self {
        Self {
            journal,
            outcome,
            inits: RefCell::new(Vec::new()),
            sender: RefCell::new(None),
        }
    }

    pub fn inits(&self) -> Vec<(String, InitOptions)> {
        self.inits.borrow().clone()
    }

    /// Raise a widget event on the most recently mounted card
    pub fn emit(&self, event: FrameEvent) {
        if let Some(sender) = self.sender.borrow().as_ref() {
            sender.emit(event);
        }
    }

    /// Tear the mounted card down, ending its event stream
    pub fn close(&self) {
        self.sender.borrow_mut().take();
    }

    fn mount(&self) -> MountedCard {
        let (tx, rx) = frame_event_channel();
        *self.sender.borrow_mut() = Some(tx);
        let session = ScriptedCardSession {
            journal: self.journal.clone(),
            outcome: self.outcome.clone(),
        };
        MountedCard::new(Box::new(session), rx)
    }
}

impl CardFrame for FakeCardFrame {
    type Handle = String;

    fn initialize(&self, public_key: &str, options: &InitOptions) -> CheckoutResult<String> {
        self.inits
            .borrow_mut()
            .push((public_key.to_string(), *options));
        Ok(public_key.to_string())
    }

    fn mount_card(
        &self,
        _handle: &String,
        _render: &RenderOptions,
        _style: &StyleOptions,
        mount_point: &str,
    ) -> CheckoutResult<MountedCard> {
        self.journal.record(format!("mount:card:{}", mount_point));
        Ok(self.mount())
    }

    fn mount_card_with_token(
        &self,
        _handle: &String,
        session_token: &SessionToken,
        _render: &RenderOptions,
        _style: &StyleOptions,
        mount_point: &str,
    ) -> CheckoutResult<MountedCard> {
        self.journal
            .record(format!("mount:token:{}:{}", session_token.value(), mount_point));
        Ok(self.mount())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub struct Harness {
    pub journal: Journal,
    pub transport: Rc<ScriptedTransport>,
    pub view: Rc<RecordingView>,
    pub navigator: Rc<RecordingNavigator>,
    pub store: Rc<MemoryStore>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }

    pub fn with_store(store: MemoryStore) -> Self {
        let journal = Journal::default();
        Self {
            transport: Rc::new(ScriptedTransport::new(journal.clone())),
            view: Rc::new(RecordingView::new(journal.clone())),
            navigator: Rc::new(RecordingNavigator::new(journal.clone())),
            store: Rc::new(store),
            journal,
        }
    }

    pub fn ports(&self) -> PagePorts {
        PagePorts {
            transport: self.transport.clone(),
            view: self.view.clone(),
            navigator: self.navigator.clone(),
            store: self.store.clone(),
        }
    }

    pub fn frame(&self, outcome: PaymentOutcome) -> FakeCardFrame {
        FakeCardFrame::new(self.journal.clone(), outcome)
    }
}

pub fn setup() -> PageSetup {
    PageSetup {
        config: CheckoutConfig::new("pk_test_store"),
        customer: Customer::new()
            .with_name("Test", "Test")
            .with_address("Buzinski prilaz 10", "Zagreb", "10000", "Croatia")
            .with_email("test.test@corvuspay.com"),
        purchase: Purchase::new(
            dec!(1.23),
            CurrencyCode::new("EUR").expect("valid currency"),
            "Product 1",
        )
        .expect("valid purchase"),
    }
}

pub fn approved() -> PaymentOutcome {
    PaymentOutcome {
        status: OutcomeStatus::Ok,
        display_message: "Approved".into(),
        error_code: String::new(),
        payment_id: "PAY123".into(),
        approval_code: "00000".into(),
        signature: "sig".into(),
        extra: Default::default(),
    }
}

pub fn declined() -> PaymentOutcome {
    PaymentOutcome {
        status: OutcomeStatus::from("failed".to_string()),
        display_message: "Declined".into(),
        error_code: "05".into(),
        approval_code: String::new(),
        ..approved()
    }
}
