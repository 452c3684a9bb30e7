//! # DOM Adapters
//!
//! Page view, client store and navigator backed by the browser.

use frame_core::{ClientStore, Navigator, PageView};
use tracing::warn;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, Location, Storage};

/// Busy indicator inserted in front of the submit control
pub const SPINNER_MARKUP: &str = r#"
    <div class="spinner-auto">
      <svg>
        <use href="/img/icons.svg#icon-loader"></use>
      </svg>
    </div>
"#;

const SPINNER_SELECTOR: &str = ".spinner-auto";

/// Element ids of one checkout page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageIds {
    pub form: &'static str,
    pub error_slot: &'static str,
}

impl PageIds {
    /// Plain and card-storage pages
    pub const CARD: PageIds = PageIds {
        form: "corvuspay-payment-form",
        error_slot: "corvuspay-error",
    };

    /// Stored-card page
    pub const WITH_TOKEN: PageIds = PageIds {
        form: "corvuspay-payment-with-token-form",
        error_slot: "corvuspay-with-token-error",
    };
}

pub(crate) fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document available"))
}

pub(crate) fn element_by_id(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("element #{} not found", id)))
}

/// Form controls the checkout flow drives
pub struct DomView {
    form: HtmlElement,
    submit: HtmlInputElement,
    error_slot: Element,
}

impl DomView {
    pub fn attach(document: &Document, ids: PageIds) -> Result<Self, JsValue> {
        let form: HtmlElement = element_by_id(document, ids.form)?.dyn_into()?;
        let submit: HtmlInputElement = form
            .query_selector(r#"input[type="submit"]"#)?
            .ok_or_else(|| JsValue::from_str("submit control not found"))?
            .dyn_into()?;
        let error_slot = element_by_id(document, ids.error_slot)?;
        Ok(Self {
            form,
            submit,
            error_slot,
        })
    }

    pub fn submit_control(&self) -> &HtmlInputElement {
        &self.submit
    }

    /// Unhide a form that starts out hidden
    pub fn reveal(&self) {
        if let Err(e) = self.form.style().set_property("display", "block") {
            warn!(error = ?e, "could not reveal checkout form");
        }
    }

    fn busy_host(&self) -> Option<Element> {
        self.submit.parent_element()
    }
}

impl PageView for DomView {
    fn set_submit_enabled(&self, enabled: bool) {
        self.submit.set_disabled(!enabled);
    }

    fn show_error(&self, message: &str) {
        self.error_slot.set_text_content(Some(message));
    }

    fn clear_error(&self) {
        self.error_slot.set_text_content(None);
    }

    fn show_busy(&self) {
        if let Some(host) = self.busy_host() {
            if let Err(e) = host.insert_adjacent_html("afterbegin", SPINNER_MARKUP) {
                warn!(error = ?e, "could not render busy indicator");
            }
        }
    }

    fn hide_busy(&self) {
        if let Some(spinner) = self
            .busy_host()
            .and_then(|host| host.query_selector(SPINNER_SELECTOR).ok().flatten())
        {
            spinner.remove();
        }
    }
}

/// `window.localStorage`
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    pub fn open() -> Result<Self, JsValue> {
        let storage = web_sys::window()
            .ok_or_else(|| JsValue::from_str("no window available"))?
            .local_storage()?
            .ok_or_else(|| JsValue::from_str("localStorage unavailable"))?;
        Ok(Self { storage })
    }
}

impl ClientStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set_item(key, value) {
            warn!(key, error = ?e, "localStorage write failed");
        }
    }

    fn remove(&self, key: &str) {
        if let Err(e) = self.storage.remove_item(key) {
            warn!(key, error = ?e, "localStorage remove failed");
        }
    }
}

/// `window.location`
pub struct LocationNavigator {
    location: Location,
}

impl LocationNavigator {
    pub fn current() -> Result<Self, JsValue> {
        let location = web_sys::window()
            .ok_or_else(|| JsValue::from_str("no window available"))?
            .location();
        Ok(Self { location })
    }

    pub fn origin(&self) -> Result<String, JsValue> {
        self.location.origin()
    }

    pub fn search(&self) -> Result<String, JsValue> {
        self.location.search()
    }
}

impl Navigator for LocationNavigator {
    fn navigate(&self, url: &str) {
        if let Err(e) = self.location.set_href(url) {
            warn!(url, error = ?e, "navigation failed");
        }
    }
}
