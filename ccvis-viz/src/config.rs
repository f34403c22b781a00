//! Map configuration.
//!
//! A [`MapConfig`] describes one visualization: which CSVs to load, how to
//! style them, the initial camera, the brush domain and the intro dialog.
//! Configs deserialize from JSON with every field optional; the two maps
//! shipped in this workspace use the built-in presets.

use anyhow::{bail, Context};
use ccvis_data::CategoryPalette;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::brush::{DateInterval, TemporalBrush};
use crate::host::{CameraState, TooltipFormatter};
use crate::layer::{category_layer_id, ColorRule, LayerStyle, UNMAPPED_LAYER_SUFFIX};
use crate::panel::VisibilityPanel;

pub const DEFAULT_MAP_STYLE: &str =
    "https://basemaps.cartocdn.com/gl/positron-nolabels-gl-style/style.json";

/// Annex records of water concessions, sized by annual volume.
pub const ANEXOS_URL: &str = "https://tirandocodigo.mx/proyectos/ccvis/data/total_anexos_geo.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Prefix of the persisted intro flag, `"<app_id>_modal_shown"`.
    pub app_id: String,
    pub title: String,
    /// MapLibre style URL for the basemap.
    pub map_style: String,
    pub camera: CameraState,
    pub datasets: Vec<DatasetConfig>,
    pub tooltip: TooltipFormatter,
    pub brush: Option<BrushConfig>,
    pub intro: IntroConfig,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            app_id: "ccvis".to_string(),
            title: String::new(),
            map_style: DEFAULT_MAP_STYLE.to_string(),
            camera: CameraState::default(),
            datasets: Vec::new(),
            tooltip: TooltipFormatter::default(),
            brush: None,
            intro: IntroConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub id: String,
    pub label: String,
    /// CSV location; relative paths resolve against the page.
    pub url: String,
    pub style: LayerStyle,
    /// One layer (and one checkbox) per palette category.
    pub split_by_category: bool,
    /// Initial checkbox state.
    pub visible: bool,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            label: String::new(),
            url: String::new(),
            style: LayerStyle::default(),
            split_by_category: false,
            visible: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    pub domain_start: NaiveDate,
    pub domain_end: NaiveDate,
    pub default_start: NaiveDate,
    pub default_end: NaiveDate,
    pub tick_step_years: i32,
}

impl Default for BrushConfig {
    fn default() -> Self {
        let start = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap_or_default();
        let end = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default();
        Self {
            domain_start: start,
            domain_end: end,
            default_start: start,
            default_end: end,
            tick_step_years: 5,
        }
    }
}

impl BrushConfig {
    pub fn build(&self) -> TemporalBrush {
        TemporalBrush::new(
            self.domain_start,
            self.domain_end,
            DateInterval::from_dates(self.default_start, self.default_end),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroConfig {
    pub enabled: bool,
    /// Show the intro on every visit regardless of the persisted flag.
    pub always_show: bool,
    pub title: String,
    pub body: String,
}

impl MapConfig {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: MapConfig = serde_json::from_str(json).context("invalid map config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for (i, dataset) in self.datasets.iter().enumerate() {
            if dataset.id.is_empty() {
                bail!("dataset #{} has no id", i);
            }
            if self.datasets[..i].iter().any(|d| d.id == dataset.id) {
                bail!("duplicate dataset id {}", dataset.id);
            }
            if dataset.style.radius_divisor <= 0.0 {
                bail!("dataset {}: radius_divisor must be positive", dataset.id);
            }
        }
        if let Some(brush) = &self.brush {
            if brush.domain_start >= brush.domain_end {
                bail!("brush domain start must precede its end");
            }
            if brush.default_start > brush.default_end {
                bail!("brush default selection is reversed");
            }
            if brush.default_start < brush.domain_start || brush.default_end > brush.domain_end {
                bail!(
                    "brush default selection {}..{} lies outside the domain {}..{}",
                    brush.default_start,
                    brush.default_end,
                    brush.domain_start,
                    brush.domain_end
                );
            }
        }
        Ok(())
    }

    pub fn dataset(&self, id: &str) -> Option<&DatasetConfig> {
        self.datasets.iter().find(|d| d.id == id)
    }

    /// One checkbox per dataset, or per category for split datasets.
    pub fn panel(&self) -> VisibilityPanel {
        let mut panel = VisibilityPanel::new();
        for dataset in &self.datasets {
            match (&dataset.style.color, dataset.split_by_category) {
                (ColorRule::Category { palette, .. }, true) => {
                    for entry in &palette.entries {
                        panel.add(
                            category_layer_id(&dataset.id, &entry.category),
                            entry.category.clone(),
                            dataset.visible,
                            palette.lookup(&entry.category),
                        );
                    }
                    panel.add(
                        category_layer_id(&dataset.id, UNMAPPED_LAYER_SUFFIX),
                        "OTROS",
                        dataset.visible,
                        Some(palette.fallback()),
                    );
                }
                (ColorRule::Fixed { color }, _) => {
                    panel.add(dataset.id.clone(), dataset.label.clone(), dataset.visible, Some(*color));
                }
                (ColorRule::Category { .. }, false) => {
                    panel.add(dataset.id.clone(), dataset.label.clone(), dataset.visible, None);
                }
            }
        }
        panel
    }

    /// Water concessions coloured by use, with the time brush.
    pub fn concessions() -> Self {
        Self {
            app_id: "concesiones".to_string(),
            title: "Concesiones de agua en México".to_string(),
            datasets: vec![
                DatasetConfig {
                    id: "concesiones".to_string(),
                    label: "Concesiones por uso".to_string(),
                    url: "data/concesiones_geo.csv".to_string(),
                    style: LayerStyle {
                        radius_field: Some("VOL".to_string()),
                        color: ColorRule::Category {
                            field: "USO".to_string(),
                            palette: CategoryPalette::water_use(),
                        },
                        date_field: Some("FECHA_REGISTRO".to_string()),
                        ..LayerStyle::default()
                    },
                    split_by_category: true,
                    visible: true,
                },
                DatasetConfig {
                    id: "anexos".to_string(),
                    label: "Anexos (volumen anual)".to_string(),
                    url: ANEXOS_URL.to_string(),
                    style: LayerStyle {
                        radius_field: Some("VOLUMEN_ANUAL".to_string()),
                        radius_divisor: 1000.0,
                        ..LayerStyle::default()
                    },
                    split_by_category: false,
                    visible: false,
                },
            ],
            tooltip: TooltipFormatter::new(&[
                ("Titular", "TITULAR"),
                ("Uso", "USO"),
                ("Volumen (m³)", "VOL"),
                ("Volumen anual (m³)", "VOLUMEN_ANUAL"),
            ]),
            brush: Some(BrushConfig::default()),
            intro: IntroConfig {
                enabled: true,
                always_show: false,
                title: "Concesiones de agua".to_string(),
                body: "Cada punto es un título de concesión. El tamaño es proporcional a la raíz \
                       del volumen concesionado y el color indica el uso. Usa las casillas para \
                       mostrar u ocultar usos y arrastra sobre la línea de tiempo para filtrar \
                       por fecha de registro."
                    .to_string(),
            },
            ..Self::default()
        }
    }

    /// Demographic points coloured by gender code.
    pub fn demographics() -> Self {
        Self {
            app_id: "poblacion".to_string(),
            title: "Población por sexo".to_string(),
            datasets: vec![DatasetConfig {
                id: "poblacion".to_string(),
                label: "Población".to_string(),
                url: "data/poblacion_geo.csv".to_string(),
                style: LayerStyle {
                    radius_scale: 30.0,
                    color: ColorRule::Category {
                        field: "SEXO".to_string(),
                        palette: CategoryPalette::gender(),
                    },
                    ..LayerStyle::default()
                },
                split_by_category: true,
                visible: true,
            }],
            tooltip: TooltipFormatter::new(&[("Sexo", "SEXO"), ("Municipio", "MUNICIPIO")]),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        MapConfig::concessions().validate().unwrap();
        MapConfig::demographics().validate().unwrap();
    }

    #[test]
    fn empty_json_uses_defaults() {
        let config = MapConfig::from_json("{}").unwrap();
        assert_eq!(config, MapConfig::default());
        assert_eq!(config.map_style, DEFAULT_MAP_STYLE);
    }

    #[test]
    fn partial_dataset_json() {
        let json = r#"{
            "app_id": "demo",
            "datasets": [{
                "id": "pts",
                "url": "pts.csv",
                "style": { "radius_field": "VOL", "color": { "kind": "fixed", "color": [1, 2, 3, 4] } }
            }],
            "brush": { "default_start": "2000-01-01" }
        }"#;
        let config = MapConfig::from_json(json).unwrap();
        let dataset = config.dataset("pts").unwrap();
        assert!(dataset.visible);
        assert_eq!(dataset.style.radius_divisor, 50.0);
        assert_eq!(dataset.style.color, ColorRule::Fixed { color: [1, 2, 3, 4] });
        let brush = config.brush.unwrap();
        assert_eq!(brush.default_start, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        assert_eq!(brush.domain_start, NaiveDate::from_ymd_opt(1990, 1, 1).unwrap());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let json = r#"{ "datasets": [{ "id": "a" }, { "id": "a" }] }"#;
        let err = MapConfig::from_json(json).unwrap_err();
        assert!(err.to_string().contains("duplicate dataset id a"));
    }

    #[test]
    fn rejects_reversed_brush_domain() {
        let json = r#"{ "brush": { "domain_start": "2030-01-01" } }"#;
        assert!(MapConfig::from_json(json).is_err());
    }

    #[test]
    fn rejects_default_selection_outside_domain() {
        let json = r#"{ "brush": { "default_start": "1980-01-01", "default_end": "2030-06-01" } }"#;
        let err = MapConfig::from_json(json).unwrap_err();
        assert!(err.to_string().contains("outside the domain"));

        let late_end = r#"{ "brush": { "default_end": "2030-06-01" } }"#;
        assert!(MapConfig::from_json(late_end).is_err());

        let inside = r#"{ "brush": { "default_start": "2000-01-01", "default_end": "2010-01-01" } }"#;
        assert!(MapConfig::from_json(inside).is_ok());
    }

    #[test]
    fn split_dataset_gets_one_toggle_per_category() {
        let config = MapConfig::concessions();
        let panel = config.panel();
        let palette_len = CategoryPalette::water_use().entries.len();
        // categories + "otros" + the anexos layer
        assert_eq!(panel.toggles().len(), palette_len + 2);
        assert!(panel.is_visible("concesiones:AGRÍCOLA"));
        assert!(!panel.is_visible("anexos"));
        assert_eq!(
            panel.toggles()[0].swatch,
            Some([163, 229, 104, 200])
        );
    }

    #[test]
    fn default_brush_spans_1990_to_2025() {
        let brush = BrushConfig::default().build();
        assert_eq!(
            brush.labels(),
            ("01-01-1990".to_string(), "01-01-2025".to_string())
        );
    }
}
