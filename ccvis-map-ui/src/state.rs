//! Application state managed via Dioxus context.
//!
//! `AppState` bundles the reactive signals shared by a map app. The map host
//! itself lives in its own signal inside `MapView`; child components
//! retrieve this struct with `use_context::<AppState>()`.

use ccvis_viz::brush::DateInterval;
use dioxus::prelude::*;

#[derive(Clone, Copy)]
pub struct AppState {
    /// Number of dataset loads still in flight
    pub pending_loads: Signal<usize>,
    /// Whether the intro modal is showing
    pub intro_open: Signal<bool>,
    /// Last interval emitted by the time brush
    pub selection: Signal<Option<DateInterval>>,
}

impl AppState {
    /// Create a new AppState expecting `pending_loads` dataset loads.
    pub fn new(pending_loads: usize) -> Self {
        Self {
            pending_loads: Signal::new(pending_loads),
            intro_open: Signal::new(false),
            selection: Signal::new(None),
        }
    }

    pub fn is_loading(&self) -> bool {
        (self.pending_loads)() > 0
    }
}
