//! Typed wrappers around JS interop via `js_sys::eval()`.
//!
//! The deck.gl host lives in `assets/js/deck-map.js` and is evaluated once as
//! globals exposed via `window.*`. Payloads are serialized with serde_json and
//! spliced in as JS literals, so no string escaping is involved.

use ccvis_viz::host::{CameraState, Renderer, TooltipFormatter};
use ccvis_viz::layer::ScatterLayer;

static DECK_MAP_JS: &str = include_str!("../assets/js/deck-map.js");

/// Execute arbitrary JS, wrapping in try/catch to avoid panics.
pub fn call_js(code: &str) {
    let wrapped = format!(
        "try {{ {} }} catch(e) {{ console.warn('ccvis JS call failed:', e); }}",
        code
    );
    let _ = js_sys::eval(&wrapped);
}

/// Evaluate the map script at global scope. Safe to call more than once.
pub fn init_map_scripts() {
    let store_js = format!(
        "if (!window.__ccvisMapScripts && typeof window.ccvisInitMap === 'undefined') {{ window.__ccvisMapScripts = {}; }}",
        serde_json::to_string(DECK_MAP_JS).unwrap_or_default()
    );
    let _ = js_sys::eval(&store_js);
    call_js(
        "if (window.__ccvisMapScripts) { (0, eval)(window.__ccvisMapScripts); delete window.__ccvisMapScripts; console.log('ccvis map initialized'); }",
    );
}

fn js_literal<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::error!("Failed to serialize map payload: {}", e);
        "null".to_string()
    })
}

pub fn init_map(container_id: &str, map_style: &str, camera: &CameraState) {
    call_js(&format!(
        "window.ccvisInitMap({}, {}, {});",
        js_literal(container_id),
        js_literal(map_style),
        js_literal(camera)
    ));
}

pub fn set_layers(container_id: &str, layers: &[&ScatterLayer]) {
    call_js(&format!(
        "window.ccvisSetLayers({}, {});",
        js_literal(container_id),
        js_literal(layers)
    ));
}

pub fn set_tooltip(container_id: &str, enabled: bool) {
    call_js(&format!(
        "window.ccvisSetTooltip({}, {});",
        js_literal(container_id),
        enabled
    ));
}

/// Tear down the deck.gl instance and drop queued calls for the container.
pub fn destroy_map(container_id: &str) {
    call_js(&format!(
        "if (window.ccvisDestroyMap) window.ccvisDestroyMap({});",
        js_literal(container_id)
    ));
}

/// [`Renderer`] backed by the deck.gl host script.
pub struct DeckRenderer {
    container_id: String,
    map_style: String,
}

impl DeckRenderer {
    pub fn new(container_id: &str, map_style: &str) -> Self {
        init_map_scripts();
        Self {
            container_id: container_id.to_string(),
            map_style: map_style.to_string(),
        }
    }
}

impl Renderer for DeckRenderer {
    fn set_layers(&mut self, layers: &[&ScatterLayer]) {
        set_layers(&self.container_id, layers);
    }

    fn set_camera(&mut self, camera: &CameraState) {
        init_map(&self.container_id, &self.map_style, camera);
    }

    fn set_tooltip_formatter(&mut self, formatter: &TooltipFormatter) {
        // Tooltip text is precomputed per point; the host only toggles display.
        set_tooltip(&self.container_id, !formatter.is_empty());
    }
}

impl Drop for DeckRenderer {
    fn drop(&mut self) {
        destroy_map(&self.container_id);
    }
}
