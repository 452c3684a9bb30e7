//! # CorvusPay Card Frame
//!
//! `CardFrame` over the hosted widget script. Widget callbacks become
//! [`FrameEvent`]s on the mounted card's channel; `finishCardPayment`'s
//! callback resolves a oneshot the card session awaits.

use crate::bindings::{self, JsCardElement, JsCorvusPay};
use async_trait::async_trait;
use frame_core::{
    frame_event_channel, CardFrame, CardSession, CheckoutError, CheckoutResult, FrameEvent,
    FrameEventKind, InitOptions, MountedCard, PaymentId, PaymentOutcome, RenderOptions,
    SessionToken, StyleOptions,
};
use futures::channel::oneshot;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RequiredParameters<'a> {
    public_key: &'a str,
}

/// The `CorvusPay` global loaded by the widget script
#[derive(Debug, Default, Clone, Copy)]
pub struct CorvusFrame;

impl CardFrame for CorvusFrame {
    type Handle = JsCorvusPay;

    fn initialize(&self, public_key: &str, options: &InitOptions) -> CheckoutResult<JsCorvusPay> {
        let required = to_js(&RequiredParameters { public_key })?;
        let optional = to_js(options)?;
        bindings::init_corvus_pay(&required, &optional).map_err(|e| frame_error("init", &e))
    }

    fn mount_card(
        &self,
        handle: &JsCorvusPay,
        render: &RenderOptions,
        style: &StyleOptions,
        mount_point: &str,
    ) -> CheckoutResult<MountedCard> {
        let element = handle
            .card(&to_js(render)?, &to_js(style)?, mount_point)
            .map_err(|e| frame_error("card", &e))?;
        attach(element)
    }

    fn mount_card_with_token(
        &self,
        handle: &JsCorvusPay,
        session_token: &SessionToken,
        render: &RenderOptions,
        style: &StyleOptions,
        mount_point: &str,
    ) -> CheckoutResult<MountedCard> {
        let element = handle
            .card_with_token(session_token.value(), &to_js(render)?, &to_js(style)?, mount_point)
            .map_err(|e| frame_error("cardWithToken", &e))?;
        attach(element)
    }
}

/// A mounted card form. Owns the widget listeners for as long as the page
/// keeps the session.
pub struct CorvusCardSession {
    element: JsCardElement,
    _listeners: Vec<Closure<dyn FnMut(JsValue)>>,
}

#[async_trait(?Send)]
impl CardSession for CorvusCardSession {
    async fn submit_payment(&self, payment_id: &PaymentId) -> CheckoutResult<PaymentOutcome> {
        let (tx, rx) = oneshot::channel::<JsValue>();
        let on_finish: Closure<dyn FnMut(JsValue)> = Closure::once(move |result: JsValue| {
            // The page may already be gone
            let _ = tx.send(result);
        });

        self.element
            .finish_card_payment(payment_id.as_str(), on_finish.as_ref().unchecked_ref())
            .map_err(|e| frame_error("finishCardPayment", &e))?;

        let result = rx.await.map_err(|_| {
            CheckoutError::Frame("card frame never delivered a payment result".to_string())
        })?;
        drop(on_finish);

        serde_wasm_bindgen::from_value(result)
            .map_err(|e| CheckoutError::Frame(format!("unreadable payment result: {}", e)))
    }
}

fn attach(element: JsCardElement) -> CheckoutResult<MountedCard> {
    let (tx, rx) = frame_event_channel();
    let mut listeners = Vec::with_capacity(FrameEventKind::ALL.len());

    for kind in FrameEventKind::ALL {
        let tx = tx.clone();
        let listener = Closure::<dyn FnMut(JsValue)>::new(move |arg: JsValue| {
            tx.emit(decode_event(kind, arg.is_truthy(), js_text(&arg)));
        });
        element
            .on(kind.as_str(), listener.as_ref().unchecked_ref())
            .map_err(|e| frame_error(kind.as_str(), &e))?;
        listeners.push(listener);
    }

    let session = CorvusCardSession {
        element,
        _listeners: listeners,
    };
    Ok(MountedCard::new(Box::new(session), rx))
}

/// Widget callback argument to event
fn decode_event(kind: FrameEventKind, flag: bool, text: String) -> FrameEvent {
    match kind {
        FrameEventKind::Ready => FrameEvent::Ready,
        FrameEventKind::CardReady => FrameEvent::CardReady(flag),
        FrameEventKind::ShowError => FrameEvent::ShowError(text),
        FrameEventKind::ClearError => FrameEvent::ClearError(text),
        FrameEventKind::Error => FrameEvent::Error(text),
    }
}

/// Message text of a callback argument
fn js_text(value: &JsValue) -> String {
    if value.is_undefined() || value.is_null() {
        return String::new();
    }
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(message) = value
        .dyn_ref::<js_sys::Error>()
        .and_then(|e| e.message().as_string())
    {
        return message;
    }
    js_sys::JSON::stringify(value)
        .ok()
        .and_then(|s| s.as_string())
        .unwrap_or_default()
}

fn frame_error(call: &str, err: &JsValue) -> CheckoutError {
    CheckoutError::Frame(format!("{} failed: {}", call, js_text(err)))
}

/// Plain JS object for a serde value
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> CheckoutResult<JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| CheckoutError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_event() {
        assert_eq!(
            decode_event(FrameEventKind::CardReady, true, String::new()),
            FrameEvent::CardReady(true)
        );
        assert_eq!(
            decode_event(FrameEventKind::ShowError, true, "Invalid CVV".into()),
            FrameEvent::ShowError("Invalid CVV".into())
        );
        assert_eq!(
            decode_event(FrameEventKind::Ready, false, String::new()),
            FrameEvent::Ready
        );
    }
}
