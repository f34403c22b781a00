//! Map glue for ccvis visualizations.
//!
//! Everything here is independent of the browser. Rendering, dialogs and
//! persisted flags are reached through the capability traits in [`host`]
//! and [`intro`], so the glue runs against stubs in tests and against the
//! deck.gl bridge in `ccvis-map-ui`.
//!
//! - `layer`: rows to scatterplot points (position, colour, radius)
//! - `panel`: per-layer visibility toggles
//! - `brush`: time scale and the date-range brush state machine
//! - `host`: the `Renderer` capability and the `MapHost` that drives it
//! - `intro`: the dismissible introductory dialog
//! - `config`: serde map configuration and built-in presets

pub mod brush;
pub mod config;
pub mod host;
pub mod intro;
pub mod layer;
pub mod panel;
