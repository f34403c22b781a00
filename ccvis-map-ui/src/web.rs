//! Browser implementations of the capability traits.

use ccvis_data::{Fetch, LoadError};
use ccvis_viz::intro::{Dialog, FlagStore};
use dioxus::prelude::*;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

fn js_error(e: JsValue) -> LoadError {
    LoadError::Network(format!("{:?}", e))
}

/// `Fetch` over `window.fetch`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebFetcher;

impl Fetch for WebFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, LoadError> {
        let window = web_sys::window().ok_or_else(|| LoadError::Network("no window".to_string()))?;
        let value = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(js_error)?;
        let response: Response = value.dyn_into().map_err(js_error)?;
        if !response.ok() {
            return Err(LoadError::Status(response.status()));
        }
        let text = JsFuture::from(response.text().map_err(js_error)?)
            .await
            .map_err(js_error)?;
        text.as_string()
            .ok_or_else(|| LoadError::Network("response body is not text".to_string()))
    }
}

/// Flags persisted in `window.localStorage`. Storage errors read as "unset".
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageFlags;

impl LocalStorageFlags {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }
}

impl FlagStore for LocalStorageFlags {
    fn is_set(&self, key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.get_item(key).ok().flatten())
            .is_some_and(|v| v == "true")
    }

    fn set(&mut self, key: &str) {
        match Self::storage() {
            Some(storage) => {
                if let Err(e) = storage.set_item(key, "true") {
                    log::warn!("Could not persist {}: {:?}", key, e);
                }
            }
            None => log::warn!("localStorage unavailable, {} not persisted", key),
        }
    }
}

/// [`Dialog`] whose open state is a Dioxus signal the modal component reads.
#[derive(Clone, Copy)]
pub struct SignalDialog {
    pub open: Signal<bool>,
}

impl Dialog for SignalDialog {
    fn open(&mut self) {
        self.open.set(true);
    }

    fn close(&mut self) {
        self.open.set(false);
    }
}

/// `navigator.platform` and `devicePixelRatio`, with desktop defaults.
pub fn platform_and_pixel_ratio() -> (String, f64) {
    match web_sys::window() {
        Some(window) => (
            window.navigator().platform().unwrap_or_default(),
            window.device_pixel_ratio(),
        ),
        None => (String::new(), 1.0),
    }
}
