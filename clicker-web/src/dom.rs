use serde_json::Value;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Window};

/// Retrieve the global `window` object.
///
/// # Panics
/// Panics if executed outside of a browser context where `window` is unavailable.
#[must_use]
pub fn window() -> Window {
    web_sys::window().expect("`window` should be available in web context")
}

/// Retrieve the document object for DOM interactions.
///
/// # Panics
/// Panics when the document cannot be accessed from the current browser window.
#[must_use]
pub fn document() -> Document {
    window()
        .document()
        .expect("`document` should exist in browser context")
}

/// Whether the page is in the background (tab switched, app minimised).
#[must_use]
pub fn page_hidden() -> bool {
    web_sys::window()
        .and_then(|win| win.document())
        .is_some_and(|doc| doc.hidden())
}

/// User record injected by the Telegram WebApp host, if the app runs inside one.
///
/// Reads `window.Telegram.WebApp.initDataUnsafe.user`.
#[must_use]
pub fn telegram_user() -> Option<Value> {
    let mut value: JsValue = web_sys::window()?.into();
    for key in ["Telegram", "WebApp", "initDataUnsafe", "user"] {
        value = js_sys::Reflect::get(&value, &JsValue::from_str(key)).ok()?;
        if value.is_undefined() || value.is_null() {
            return None;
        }
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|err| log::warn!("Unreadable Telegram user: {err}"))
        .ok()
}
