//! Population points in Mexico coloured by gender.
//!
//! The SEXO column selects the colour (1 male, 2 female); each gender has
//! its own checkbox. The host page must load the deck.gl and maplibre-gl
//! bundles.

use ccvis_data::{FEMALE_COLOR, MALE_COLOR};
use ccvis_map_ui::components::MapView;
use ccvis_viz::config::MapConfig;
use dioxus::prelude::*;

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("poblacion-root"))
        .launch(App);
}

#[component]
fn App() -> Element {
    let config = use_hook(MapConfig::demographics);
    log::info!("Rendering {}", config.title);

    rsx! {
        div {
            style: "max-width: 1200px; margin: 0 auto; padding: 8px;",
            MapView {
                config,
                Legend {}
            }
        }
    }
}

#[component]
fn Legend() -> Element {
    let entries = [("Hombres", MALE_COLOR), ("Mujeres", FEMALE_COLOR)];

    rsx! {
        div {
            style: "display: flex; gap: 16px; margin: 6px 0; font-size: 12px; color: #444;",
            for (label, [r, g, b]) in entries {
                span {
                    key: "{label}",
                    span {
                        style: "display: inline-block; width: 10px; height: 10px; margin-right: 4px; border-radius: 50%; background: rgb({r},{g},{b});",
                    }
                    "{label}"
                }
            }
        }
    }
}
