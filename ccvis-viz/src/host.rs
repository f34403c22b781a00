//! Render host: composes the active layers, camera and tooltip text and
//! hands them to a [`Renderer`].
//!
//! The host owns every piece of mutable map state (loaded datasets, built
//! layers, visibility flags and the current time selection). Each mutation
//! rebuilds what it invalidates and pushes the active layer set again.

use ccvis_data::{PointRecord, PointSet};
use serde::{Deserialize, Serialize};

use crate::brush::DateInterval;
use crate::config::{DatasetConfig, MapConfig};
use crate::layer::{build_category_layers, build_layer, BuildPass, BuildReport, ScatterLayer};
use crate::panel::VisibilityPanel;

/// Initial view of the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraState {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
    pub max_zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
}

impl Default for CameraState {
    /// Whole of Mexico.
    fn default() -> Self {
        Self {
            longitude: -102.0,
            latitude: 23.6,
            zoom: 4.5,
            max_zoom: 16.0,
            pitch: 0.0,
            bearing: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipField {
    pub label: String,
    pub field: String,
}

/// Hover text made of selected fields of a point, one `label: value` per line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TooltipFormatter {
    pub fields: Vec<TooltipField>,
}

impl TooltipFormatter {
    pub fn new(fields: &[(&str, &str)]) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|(label, field)| TooltipField {
                    label: label.to_string(),
                    field: field.to_string(),
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `None` when none of the fields are present on the row.
    pub fn format(&self, row: &PointRecord<'_>) -> Option<String> {
        let lines: Vec<String> = self
            .fields
            .iter()
            .filter_map(|f| {
                row.get(&f.field)
                    .filter(|v| !v.is_empty())
                    .map(|v| format!("{}: {}", f.label, v))
            })
            .collect();
        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }
}

/// The map rendering capability (deck.gl in the browser, stubs in tests).
pub trait Renderer {
    fn set_layers(&mut self, layers: &[&ScatterLayer]);
    fn set_camera(&mut self, camera: &CameraState);
    fn set_tooltip_formatter(&mut self, formatter: &TooltipFormatter);
}

struct DatasetSlot {
    config: DatasetConfig,
    points: PointSet,
    layers: Vec<ScatterLayer>,
    report: BuildReport,
}

pub struct MapHost<R: Renderer> {
    renderer: R,
    tooltip: TooltipFormatter,
    datasets: Vec<DatasetSlot>,
    panel: VisibilityPanel,
    selection: Option<DateInterval>,
}

impl<R: Renderer> MapHost<R> {
    /// Set up the renderer with the configured camera and tooltip, and an
    /// empty layer for every dataset until its data arrives.
    pub fn new(mut renderer: R, config: &MapConfig) -> Self {
        renderer.set_camera(&config.camera);
        renderer.set_tooltip_formatter(&config.tooltip);
        let mut host = Self {
            renderer,
            tooltip: config.tooltip.clone(),
            datasets: config
                .datasets
                .iter()
                .map(|c| DatasetSlot {
                    config: c.clone(),
                    points: PointSet::default(),
                    layers: Vec::new(),
                    report: BuildReport::default(),
                })
                .collect(),
            panel: config.panel(),
            selection: None,
        };
        for i in 0..host.datasets.len() {
            host.rebuild(i);
        }
        host.render();
        host
    }

    /// Install freshly loaded rows for a dataset. Unknown ids are ignored.
    pub fn set_points(&mut self, dataset_id: &str, points: PointSet) -> bool {
        let Some(i) = self.datasets.iter().position(|d| d.config.id == dataset_id) else {
            log::warn!("No dataset configured with id {}", dataset_id);
            return false;
        };
        self.datasets[i].points = points;
        self.rebuild(i);
        self.render();
        true
    }

    /// Apply a brush selection to every dataset that has a date column.
    pub fn set_selection(&mut self, selection: DateInterval) {
        self.selection = Some(selection);
        for i in 0..self.datasets.len() {
            if self.datasets[i].config.style.date_field.is_some() {
                self.rebuild(i);
            }
        }
        self.render();
    }

    /// Checkbox handler. Returns the new visibility, `None` for unknown ids.
    pub fn toggle(&mut self, layer_id: &str) -> Option<bool> {
        let visible = self.panel.toggle(layer_id)?;
        self.render();
        Some(visible)
    }

    pub fn set_visible(&mut self, layer_id: &str, visible: bool) {
        if self.panel.set(layer_id, visible) {
            self.render();
        }
    }

    fn rebuild(&mut self, i: usize) {
        let tooltip = &self.tooltip;
        let selection = self.selection.as_ref();
        let slot = &mut self.datasets[i];
        let mut pass = BuildPass::new(&slot.config.style).with_selection(selection);
        if !tooltip.is_empty() {
            pass = pass.with_tooltip(tooltip);
        }
        slot.layers = if slot.config.split_by_category {
            build_category_layers(&slot.config.id, &slot.points, &mut pass)
        } else {
            vec![build_layer(&slot.config.id, &slot.points, &mut pass)]
        };
        slot.report = pass.finish();
    }

    /// Push the currently visible layers to the renderer.
    pub fn render(&mut self) {
        let panel = &self.panel;
        let active: Vec<&ScatterLayer> = self
            .datasets
            .iter()
            .flat_map(|d| d.layers.iter())
            .filter(|l| panel.is_visible(&l.id))
            .collect();
        log::debug!("rendering {} active layers", active.len());
        self.renderer.set_layers(&active);
    }

    pub fn layers(&self) -> impl Iterator<Item = &ScatterLayer> {
        self.datasets.iter().flat_map(|d| d.layers.iter())
    }

    pub fn report(&self, dataset_id: &str) -> Option<&BuildReport> {
        self.datasets
            .iter()
            .find(|d| d.config.id == dataset_id)
            .map(|d| &d.report)
    }

    pub fn panel(&self) -> &VisibilityPanel {
        &self.panel
    }

    pub fn selection(&self) -> Option<DateInterval> {
        self.selection
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}
