//! Shared Dioxus components and deck.gl bridge for ccvis map apps.
//!
//! This crate provides:
//! - `js_bridge`: Rust wrappers for the deck.gl host script via `js_sys::eval()`
//! - `web`: browser implementations of the fetch, dialog and flag capabilities
//! - `state`: Reactive AppState with Dioxus Signals
//! - `components`: Reusable RSX components (toggles, brush, intro modal, map view)

pub mod components;
pub mod js_bridge;
pub mod state;
pub mod web;
