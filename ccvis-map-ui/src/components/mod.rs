//! Reusable Dioxus RSX components for ccvis map apps.

mod brush_temporal;
mod intro_modal;
mod layer_toggles;
mod loading_spinner;
mod map_container;
mod map_view;

pub use brush_temporal::BrushTemporal;
pub use intro_modal::IntroModal;
pub use layer_toggles::LayerToggles;
pub use loading_spinner::LoadingSpinner;
pub use map_container::MapContainer;
pub use map_view::MapView;
