//! Low-level wasm-bindgen bindings to the CorvusPay card frame script.
//!
//! ```js
//! const corvuspay = CorvusPay.init({ publicKey }, { installmentsRequired });
//! const card = corvuspay.card(option, style, "corvuspay-card-element");
//! card.on("card-ready", (ready) => ...);
//! card.finishCardPayment(paymentId, (result) => ...);
//! ```

use js_sys::Function;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    //------------------------------------------------------------------------------
    // Core Types
    //------------------------------------------------------------------------------

    /// Initialized widget instance returned by `CorvusPay.init`
    #[derive(Debug, Clone)]
    pub type JsCorvusPay;

    /// Card form returned by `card` / `cardWithToken`
    #[derive(Debug, Clone)]
    pub type JsCardElement;

    //------------------------------------------------------------------------------
    // Constructors
    //------------------------------------------------------------------------------

    /// `CorvusPay.init(requiredParameters, optionalParameters)`
    #[wasm_bindgen(catch, js_namespace = CorvusPay, js_name = init)]
    pub fn init_corvus_pay(required: &JsValue, optional: &JsValue) -> Result<JsCorvusPay, JsValue>;

    //------------------------------------------------------------------------------
    // Instance Methods
    //------------------------------------------------------------------------------

    /// `corvuspay.card(option, style, mountPoint)`
    #[wasm_bindgen(method, catch, js_name = card)]
    pub fn card(
        this: &JsCorvusPay,
        option: &JsValue,
        style: &JsValue,
        mount_point: &str,
    ) -> Result<JsCardElement, JsValue>;

    /// `corvuspay.cardWithToken(sessionToken, option, style, mountPoint)`
    #[wasm_bindgen(method, catch, js_name = cardWithToken)]
    pub fn card_with_token(
        this: &JsCorvusPay,
        session_token: &str,
        option: &JsValue,
        style: &JsValue,
        mount_point: &str,
    ) -> Result<JsCardElement, JsValue>;

    /// `card.on(eventName, listener)`
    #[wasm_bindgen(method, catch, js_name = on)]
    pub fn on(this: &JsCardElement, event: &str, listener: &Function) -> Result<(), JsValue>;

    /// `card.finishCardPayment(paymentId, onFinish)`
    #[wasm_bindgen(method, catch, js_name = finishCardPayment)]
    pub fn finish_card_payment(
        this: &JsCardElement,
        payment_id: &str,
        on_finish: &Function,
    ) -> Result<(), JsValue>;
}
