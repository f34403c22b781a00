//! Water concessions in Mexico.
//!
//! Each concession title is a point sized by the square root of its volume
//! and coloured by use. The use checkboxes hide or show one layer each, and
//! the time brush keeps only titles registered inside the selected range.
//! The host page must load the deck.gl and maplibre-gl bundles.

use ccvis_map_ui::components::MapView;
use ccvis_map_ui::state::AppState;
use ccvis_utils::dates::format_display;
use ccvis_viz::config::MapConfig;
use dioxus::prelude::*;

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("concesiones-root"))
        .launch(App);
}

#[component]
fn App() -> Element {
    let config = use_hook(MapConfig::concessions);
    log::info!("Rendering {}", config.title);

    rsx! {
        div {
            style: "max-width: 1200px; margin: 0 auto; padding: 8px;",
            MapView {
                config,
                height: 640,
                SelectionSummary {}
            }
        }
    }
}

/// Registration-date range currently applied to the map.
#[component]
fn SelectionSummary() -> Element {
    let state = use_context::<AppState>();
    let Some(interval) = (state.selection)() else {
        return rsx! {};
    };
    let start = format_display(&interval.start.date());
    let end = format_display(&interval.end.date());

    rsx! {
        p {
            style: "margin: 6px 0; font-size: 12px; color: #666;",
            "Títulos registrados entre {start} y {end}"
        }
    }
}
