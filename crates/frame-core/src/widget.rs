//! # Card Frame Adapter
//!
//! Capability surface of the externally hosted card-entry widget.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     CardFrame (trait)                        │
//! │  ├── initialize(public_key, options)  -> Handle              │
//! │  ├── mount_card(handle, ...)          -> MountedCard         │
//! │  └── mount_card_with_token(handle, token, ...) -> MountedCard│
//! └──────────────────────────────────────────────────────────────┘
//!                 MountedCard = CardSession + event receiver
//! ```
//!
//! The adapter never retries; widget failures come back as [`FrameEvent`]s.

use crate::error::CheckoutResult;
use crate::model::{PaymentId, PaymentOutcome, SessionToken};
use async_trait::async_trait;
use futures::channel::mpsc;
use serde::{Deserialize, Serialize};

/// Options passed to the widget's `init`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitOptions {
    pub installments_required: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            installments_required: true,
        }
    }
}

/// What the card form shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    #[serde(default = "default_true")]
    pub show_cvv: bool,

    #[serde(default)]
    pub hide_corvus_pay_logo: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_cvv: true,
            hide_corvus_pay_logo: false,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Look of the card form; unset fields keep the widget's defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
}

/// Names of the widget events, exactly as the widget emits them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameEventKind {
    Ready,
    CardReady,
    ShowError,
    ClearError,
    Error,
}

impl FrameEventKind {
    pub const ALL: [FrameEventKind; 5] = [
        FrameEventKind::Ready,
        FrameEventKind::CardReady,
        FrameEventKind::ShowError,
        FrameEventKind::ClearError,
        FrameEventKind::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FrameEventKind::Ready => "ready",
            FrameEventKind::CardReady => "card-ready",
            FrameEventKind::ShowError => "show-error",
            FrameEventKind::ClearError => "clear-error",
            FrameEventKind::Error => "error",
        }
    }
}

/// Lifecycle and validation events of a mounted card
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameEvent {
    /// Form loaded; earliest point at which a submission is legal
    Ready,
    /// Card data complete and valid (`true`) or not (`false`)
    CardReady(bool),
    /// Field-level validation error
    ShowError(String),
    /// A previously shown validation error went away
    ClearError(String),
    /// Widget-level failure
    Error(String),
}

impl FrameEvent {
    pub fn kind(&self) -> FrameEventKind {
        match self {
            FrameEvent::Ready => FrameEventKind::Ready,
            FrameEvent::CardReady(_) => FrameEventKind::CardReady,
            FrameEvent::ShowError(_) => FrameEventKind::ShowError,
            FrameEvent::ClearError(_) => FrameEventKind::ClearError,
            FrameEvent::Error(_) => FrameEventKind::Error,
        }
    }
}

/// Receiving end of a mounted card's event stream
pub type FrameEventReceiver = mpsc::UnboundedReceiver<FrameEvent>;

/// Sending end handed to the widget listeners
#[derive(Debug, Clone)]
pub struct FrameEventSender(mpsc::UnboundedSender<FrameEvent>);

impl FrameEventSender {
    /// Forward an event; events after the page context is gone are dropped.
    pub fn emit(&self, event: FrameEvent) {
        if self.0.unbounded_send(event).is_err() {
            tracing::debug!("frame event dropped, receiver closed");
        }
    }
}

/// New event channel for one mounted card
pub fn frame_event_channel() -> (FrameEventSender, FrameEventReceiver) {
    let (tx, rx) = mpsc::unbounded();
    (FrameEventSender(tx), rx)
}

/// A rendered card form able to finish a payment
#[async_trait(?Send)]
pub trait CardSession {
    /// Hand the payment identifier to the widget and wait for its terminal result.
    ///
    /// Errors only when the widget can no longer deliver a result at all.
    async fn submit_payment(&self, payment_id: &PaymentId) -> CheckoutResult<PaymentOutcome>;
}

/// A card session together with its event stream
pub struct MountedCard {
    pub session: Box<dyn CardSession>,
    pub events: FrameEventReceiver,
}

impl MountedCard {
    pub fn new(session: Box<dyn CardSession>, events: FrameEventReceiver) -> Self {
        Self { session, events }
    }
}

/// Entry point into the hosted widget
pub trait CardFrame {
    /// Initialized widget instance
    type Handle;

    fn initialize(&self, public_key: &str, options: &InitOptions) -> CheckoutResult<Self::Handle>;

    /// Render the plain card form into `mount_point`
    fn mount_card(
        &self,
        handle: &Self::Handle,
        render: &RenderOptions,
        style: &StyleOptions,
        mount_point: &str,
    ) -> CheckoutResult<MountedCard>;

    /// Render the stored-card form unlocked by `session_token`
    fn mount_card_with_token(
        &self,
        handle: &Self::Handle,
        session_token: &SessionToken,
        render: &RenderOptions,
        style: &StyleOptions,
        mount_point: &str,
    ) -> CheckoutResult<MountedCard>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use serde_json::json;

    #[test]
    fn test_event_names() {
        let names: Vec<_> = FrameEventKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names, ["ready", "card-ready", "show-error", "clear-error", "error"]);
        assert_eq!(FrameEvent::CardReady(true).kind(), FrameEventKind::CardReady);
    }

    #[test]
    fn test_widget_option_names() {
        assert_eq!(
            serde_json::to_value(RenderOptions::default()).unwrap(),
            json!({"showCvv": true, "hideCorvusPayLogo": false})
        );
        assert_eq!(
            serde_json::to_value(InitOptions::default()).unwrap(),
            json!({"installmentsRequired": true})
        );
        assert_eq!(serde_json::to_value(StyleOptions::default()).unwrap(), json!({}));
    }

    #[tokio::test]
    async fn test_channel_delivers_in_order() {
        let (tx, mut rx) = frame_event_channel();
        tx.emit(FrameEvent::Ready);
        tx.emit(FrameEvent::CardReady(true));
        drop(tx);

        assert_eq!(rx.next().await, Some(FrameEvent::Ready));
        assert_eq!(rx.next().await, Some(FrameEvent::CardReady(true)));
        assert_eq!(rx.next().await, None);
    }

    #[test]
    fn test_emit_after_receiver_dropped_is_silent() {
        let (tx, rx) = frame_event_channel();
        drop(rx);
        tx.emit(FrameEvent::Error("gone".into()));
    }
}
