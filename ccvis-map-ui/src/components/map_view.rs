//! Complete map view: deck.gl canvas, layer checkboxes, time brush and intro.
//!
//! Data flow:
//! 1. On first render the [`MapHost`] is created with an empty layer per
//!    dataset, which initializes the deck.gl map.
//! 2. One load task per dataset fetches its CSV; each result replaces that
//!    dataset's layers. A failed load only logs a warning and leaves the
//!    dataset empty. Loads are cancelled when the view unmounts.
//! 3. Checkbox clicks and brush selections go straight to the host, which
//!    re-renders the visible layers.

use ccvis_data::{load_points, CancellationToken};
use ccvis_viz::brush::DateInterval;
use ccvis_viz::config::MapConfig;
use ccvis_viz::host::MapHost;
use ccvis_viz::intro::{DismissAction, IntroDialog};
use ccvis_viz::layer::radius_scale_for;
use dioxus::prelude::*;

use crate::components::{BrushTemporal, IntroModal, LayerToggles, LoadingSpinner, MapContainer};
use crate::js_bridge::DeckRenderer;
use crate::state::AppState;
use crate::web::{platform_and_pixel_ratio, LocalStorageFlags, SignalDialog, WebFetcher};

#[derive(Props, Clone, PartialEq)]
pub struct MapViewProps {
    pub config: MapConfig,
    #[props(default = 600)]
    pub height: u32,
    /// Extra content rendered below the brush (legends, credits).
    #[props(default)]
    children: Element,
}

/// DOM id of the deck.gl container for an app.
pub fn map_container_id(app_id: &str) -> String {
    format!("{}-map", app_id)
}

/// Apply the platform's radius scale to every dataset.
fn adjust_for_display(config: &MapConfig) -> MapConfig {
    let (platform, pixel_ratio) = platform_and_pixel_ratio();
    let mut config = config.clone();
    for dataset in &mut config.datasets {
        dataset.style.radius_scale =
            radius_scale_for(dataset.style.radius_scale, &platform, pixel_ratio);
    }
    config
}

#[component]
pub fn MapView(props: MapViewProps) -> Element {
    let config = props.config.clone();
    let dataset_count = config.datasets.len();
    let mut state = use_context_provider(move || AppState::new(dataset_count));
    let container_id = map_container_id(&config.app_id);

    let mut host = use_signal({
        let config = config.clone();
        let container_id = container_id.clone();
        move || {
            let config = adjust_for_display(&config);
            MapHost::new(DeckRenderer::new(&container_id, &config.map_style), &config)
        }
    });

    let mut intro = use_signal({
        let app_id = config.app_id.clone();
        let always_show = config.intro.always_show;
        move || {
            IntroDialog::new(
                SignalDialog {
                    open: state.intro_open,
                },
                LocalStorageFlags,
                &app_id,
            )
            .always_show(always_show)
        }
    });

    let token = use_hook(CancellationToken::new);
    use_drop({
        let token = token.clone();
        move || token.cancel()
    });

    // ─── Effect: open the intro once on mount ───
    let intro_enabled = config.intro.enabled;
    use_effect(move || {
        if intro_enabled && intro.write().mount() {
            log::info!("Showing intro dialog");
        }
    });

    // ─── Effect: start one load per dataset ───
    let datasets = config.datasets.clone();
    use_effect(move || {
        for dataset in datasets.clone() {
            let token = token.clone();
            spawn(async move {
                log::info!("Loading dataset {} from {}", dataset.id, dataset.url);
                let Some(points) = load_points(&WebFetcher, &dataset.url, &token)
                    .await
                    .into_points()
                else {
                    return;
                };
                log::info!("Dataset {}: {} rows", dataset.id, points.len());
                host.write().set_points(&dataset.id, points);
                if let Some(report) = host.read().report(&dataset.id) {
                    if report.skipped > 0 {
                        log::warn!(
                            "Dataset {}: skipped {} rows without coordinates",
                            dataset.id,
                            report.skipped
                        );
                    }
                }

                let remaining = (state.pending_loads)().saturating_sub(1);
                state.pending_loads.set(remaining);
            });
        }
    });

    let on_toggle = move |layer_id: String| {
        if host.write().toggle(&layer_id).is_none() {
            log::warn!("Unknown layer toggle {}", layer_id);
        }
    };

    let on_selection = move |interval: DateInterval| {
        log::info!("Brush selection {:?}", interval);
        state.selection.set(Some(interval));
        host.write().set_selection(interval);
    };

    let on_dismiss = move |action: DismissAction| intro.write().dismiss(action);

    let toggles = host.read().panel().toggles().to_vec();
    let pending = (state.pending_loads)();

    rsx! {
        div {
            style: "font-family: system-ui, -apple-system, sans-serif;",
            if !config.title.is_empty() {
                h2 {
                    style: "margin: 0 0 8px 0; font-size: 18px;",
                    "{config.title}"
                }
            }
            MapContainer {
                id: container_id,
                height: props.height,
                LayerToggles { toggles, on_toggle }
                if pending > 0 {
                    LoadingSpinner { pending }
                }
            }
            if let Some(brush) = config.brush.clone() {
                BrushTemporal { config: brush, on_change: on_selection }
            }
            {props.children}
            if (state.intro_open)() {
                IntroModal {
                    title: config.intro.title.clone(),
                    body: config.intro.body.clone(),
                    on_dismiss,
                }
            }
        }
    }
}
