//! # frame-wasm
//!
//! Browser entry points for the three checkout pages.
//!
//! This crate provides:
//! - Bindings to the CorvusPay card frame script
//! - `CorvusFrame`, the `CardFrame` over that script
//! - DOM-backed page view, `localStorage` store and `window.location` navigator
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { mount_payment_page } from 'frame-wasm';
//!
//! await init();
//!
//! mount_payment_page(
//!   { public_key: 'STORE_PUBLIC_KEY' },
//!   { cardholderEmail: 'test.test@corvuspay.com' },
//!   { amount: 1.23, currency: 'EUR', cart: 'Product 1' },
//! );
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

pub mod bindings;
pub mod dom;
pub mod frame;

use chrono::Utc;
use dom::{DomView, LocalStorageStore, LocationNavigator, PageIds};
use frame::CorvusFrame;
use frame_core::{
    CheckoutConfig, CheckoutPage, ClientStore, Customer, MountedPage, PagePorts, PageSetup,
    PaymentOutcome, Purchase, SubmitOutcome, PROFILE_ID_KEY, TOKEN_KEY,
};
use frame_http::{HttpConfig, HttpTransport};
use serde::de::DeserializeOwned;
use std::rc::Rc;
use tracing::{debug, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

/// Installs the panic hook and routes `tracing` output to the browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if tracing_wasm::try_set_as_global_default().is_err() {
        return;
    }
    debug!(version = env!("CARGO_PKG_VERSION"), "checkout module loaded");
}

/// Plain payment page
#[wasm_bindgen]
pub fn mount_payment_page(config: JsValue, customer: JsValue, purchase: JsValue) -> Result<(), JsValue> {
    let setup = page_setup(config, customer, purchase)?;
    let (ports, view) = browser_ports(&setup.config, PageIds::CARD)?;

    let mounted = frame_core::mount_payment_page(&CorvusFrame, setup, ports).map_err(to_js_error)?;
    run_page(mounted, &view)
}

/// Card-storage page: registers the card while paying
#[wasm_bindgen]
pub fn mount_card_storage_page(
    config: JsValue,
    customer: JsValue,
    purchase: JsValue,
) -> Result<(), JsValue> {
    let setup = page_setup(config, customer, purchase)?;
    let (ports, view) = browser_ports(&setup.config, PageIds::CARD)?;
    let store = Rc::clone(&ports.store);

    let mounted = frame_core::mount_card_storage_page(&CorvusFrame, setup, ports, Utc::now())
        .map_err(to_js_error)?;

    // Echo the fresh profile id into the page's read-only field, if it has one
    if let (Some(profile_id), Ok(document)) = (store.get(PROFILE_ID_KEY), dom::document()) {
        if let Some(input) = document
            .get_element_by_id("userCardProfilesId")
            .and_then(|el| el.dyn_into::<web_sys::HtmlInputElement>().ok())
        {
            input.set_value(&profile_id);
        }
    }

    run_page(mounted, &view)
}

/// Stored-card page: shows the previous result, then pays with the stored card
#[wasm_bindgen]
pub async fn mount_token_payment_page(config: JsValue, purchase: JsValue) -> Result<(), JsValue> {
    let setup = page_setup(config, JsValue::UNDEFINED, purchase)?;
    let (ports, view) = browser_ports(&setup.config, PageIds::WITH_TOKEN)?;
    show_previous_result(&*ports.store)?;

    let mounted = frame_core::mount_token_payment_page(&CorvusFrame, setup, ports, Utc::now())
        .await
        .map_err(to_js_error)?;
    view.reveal();
    run_page(mounted, &view)
}

/// Library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn page_setup(config: JsValue, customer: JsValue, purchase: JsValue) -> Result<PageSetup, JsValue> {
    let config: CheckoutConfig = from_js(config, "config")?;
    config.validate().map_err(to_js_error)?;

    let customer: Customer = if customer.is_undefined() || customer.is_null() {
        Customer::new()
    } else {
        from_js(customer, "customer")?
    };

    let purchase: Purchase = from_js(purchase, "purchase")?;
    let purchase =
        Purchase::new(purchase.amount, purchase.currency, purchase.cart).map_err(to_js_error)?;

    Ok(PageSetup {
        config,
        customer,
        purchase,
    })
}

fn browser_ports(config: &CheckoutConfig, ids: PageIds) -> Result<(PagePorts, Rc<DomView>), JsValue> {
    let document = dom::document()?;
    let view = Rc::new(DomView::attach(&document, ids)?);
    let navigator = LocationNavigator::current()?;

    let http = HttpConfig::new(&navigator.origin()?)
        .map_err(to_js_error)?
        .with_endpoints(config.endpoints.clone());
    let transport = HttpTransport::new(http).map_err(to_js_error)?;

    let ports = PagePorts {
        transport: Rc::new(transport),
        view: view.clone(),
        navigator: Rc::new(navigator),
        store: Rc::new(LocalStorageStore::open()?),
    };
    Ok((ports, view))
}

/// Start the event pump and wire the submit control
fn run_page(mounted: MountedPage, view: &DomView) -> Result<(), JsValue> {
    let MountedPage { page, events } = mounted;
    let page: Rc<CheckoutPage> = Rc::new(page);
    info!(flow = page.variant().name(), "checkout page mounted");

    let pump = Rc::clone(&page);
    spawn_local(async move { pump.pump_events(events).await });

    let on_click = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        event.prevent_default();
        let page = Rc::clone(&page);
        spawn_local(async move {
            match page.submit().await {
                SubmitOutcome::Completed(done) => debug!(url = done.url(), "leaving checkout page"),
                SubmitOutcome::Failed(err) => debug!(error = %err, "submission failed"),
                SubmitOutcome::Rejected => debug!("submission rejected"),
            }
        });
    });
    view.submit_control()
        .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    // The listener lives as long as the page
    on_click.forget();
    Ok(())
}

/// Fill the summary fields of the stored-card page
fn show_previous_result(store: &dyn ClientStore) -> Result<(), JsValue> {
    let document = dom::document()?;
    let outcome = PaymentOutcome::from_query(&LocationNavigator::current()?.search()?);

    let fields = [
        ("status", outcome.status.as_str().to_string()),
        ("approvalCode", outcome.approval_code.clone()),
        ("displayMessage", outcome.display_message.clone()),
        ("tokenValue", store.get(TOKEN_KEY).unwrap_or_default()),
        ("userCardProfileId", store.get(PROFILE_ID_KEY).unwrap_or_default()),
    ];
    for (id, text) in fields {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(&text));
        }
    }
    Ok(())
}

fn from_js<T: DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid {}: {}", what, e)))
}

fn to_js_error(err: frame_core::CheckoutError) -> JsValue {
    web_sys::console::error_1(&JsValue::from_str(&err.to_string()));
    JsValue::from_str(&err.display_message())
}
