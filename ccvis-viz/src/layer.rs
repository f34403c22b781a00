//! Rows to scatterplot render attributes.
//!
//! A build pass turns every row of a [`PointSet`] into a [`ScatterPoint`]
//! (position, fill colour, radius). Nothing in a pass is fatal: rows that
//! cannot be positioned are skipped and counted, and categories missing
//! from the palette fall back to a neutral gray with one warning per
//! distinct category.

use std::collections::{BTreeMap, BTreeSet};

use ccvis_data::record::parse_number;
use ccvis_data::{CategoryPalette, PointRecord, PointSet, Rgba};
use ccvis_utils::dates::parse_csv_date;
use serde::{Deserialize, Serialize};

use crate::brush::DateInterval;
use crate::host::TooltipFormatter;

/// Suffix of the layer holding points whose category has no palette entry.
pub const UNMAPPED_LAYER_SUFFIX: &str = "otros";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColorRule {
    Fixed { color: Rgba },
    Category { field: String, palette: CategoryPalette },
}

/// Per-layer styling, shared by every point in the layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerStyle {
    /// Column whose square root drives the radius. `None` sizes every point as volume 1.
    pub radius_field: Option<String>,
    pub radius_divisor: f64,
    pub radius_scale: f64,
    pub radius_min_pixels: f64,
    pub radius_max_pixels: f64,
    pub color: ColorRule,
    /// Column checked against the brush selection, if any.
    pub date_field: Option<String>,
    pub pickable: bool,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            radius_field: None,
            radius_divisor: 50.0,
            radius_scale: 10.0,
            radius_min_pixels: 1.0,
            radius_max_pixels: 30.0,
            color: ColorRule::Fixed {
                color: [255, 171, 100, 130],
            },
            date_field: None,
            pickable: true,
        }
    }
}

/// deck.gl radius scale for the host platform; Retina Macs get the pixel ratio applied.
pub fn radius_scale_for(base: f64, platform: &str, pixel_ratio: f64) -> f64 {
    if platform.to_uppercase().contains("MAC") {
        base * pixel_ratio
    } else {
        base
    }
}

/// Square-root radius of a volume cell. Missing, non-numeric and
/// non-positive volumes count as 1.
pub fn radius_for(volume: Option<&str>, divisor: f64) -> f64 {
    let v = volume
        .and_then(parse_number)
        .filter(|v| *v > 0.0)
        .unwrap_or(1.0);
    v.sqrt() / divisor
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterPoint {
    pub position: [f64; 2],
    pub fill_color: Rgba,
    pub radius: f64,
    /// Row index in the source set.
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

/// A scatterplot layer as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterLayer {
    pub id: String,
    pub data: Vec<ScatterPoint>,
    pub radius_scale: f64,
    pub radius_min_pixels: f64,
    pub radius_max_pixels: f64,
    pub pickable: bool,
}

impl ScatterLayer {
    pub fn empty(id: impl Into<String>, style: &LayerStyle) -> Self {
        Self {
            id: id.into(),
            data: Vec::new(),
            radius_scale: style.radius_scale,
            radius_min_pixels: style.radius_min_pixels,
            radius_max_pixels: style.radius_max_pixels,
            pickable: style.pickable,
        }
    }
}

/// What a build pass had to paper over.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    /// Distinct categories that fell back to the neutral colour.
    pub unmapped: BTreeSet<String>,
    /// Rows without usable coordinates.
    pub skipped: usize,
    /// Rows outside the temporal selection.
    pub filtered_out: usize,
    /// Points per category label (or per layer when colours are fixed).
    pub per_category: BTreeMap<String, usize>,
}

impl BuildReport {
    pub fn point_count(&self) -> usize {
        self.per_category.values().sum()
    }
}

/// Mutable state of one build pass over a dataset.
pub struct BuildPass<'a> {
    style: &'a LayerStyle,
    tooltip: Option<&'a TooltipFormatter>,
    selection: Option<&'a DateInterval>,
    report: BuildReport,
}

impl<'a> BuildPass<'a> {
    pub fn new(style: &'a LayerStyle) -> Self {
        Self {
            style,
            tooltip: None,
            selection: None,
            report: BuildReport::default(),
        }
    }

    pub fn with_tooltip(mut self, tooltip: &'a TooltipFormatter) -> Self {
        self.tooltip = Some(tooltip);
        self
    }

    pub fn with_selection(mut self, selection: Option<&'a DateInterval>) -> Self {
        self.selection = selection;
        self
    }

    /// Fill colour for a row, warning once per pass for each unknown category.
    pub fn color_for(&mut self, row: &PointRecord<'_>) -> Rgba {
        let style = self.style;
        match &style.color {
            ColorRule::Fixed { color } => *color,
            ColorRule::Category { field, palette } => {
                let category = row.get(field).unwrap_or("").trim();
                palette.lookup(category).unwrap_or_else(|| {
                    if self.report.unmapped.insert(category.to_string()) {
                        log::warn!(
                            "No colour for {} = {:?}, using neutral gray",
                            field,
                            category
                        );
                    }
                    palette.fallback()
                })
            }
        }
    }

    fn in_selection(&self, row: &PointRecord<'_>) -> bool {
        match (self.selection, &self.style.date_field) {
            (Some(selection), Some(field)) => row
                .get(field)
                .and_then(parse_csv_date)
                .map_or(true, |date| selection.contains_date(&date)),
            _ => true,
        }
    }

    /// Render attributes for one row, or `None` when it is skipped.
    pub fn point(&mut self, row: &PointRecord<'_>) -> Option<ScatterPoint> {
        let (Some(lon), Some(lat)) = (row.longitude(), row.latitude()) else {
            self.report.skipped += 1;
            return None;
        };
        if !self.in_selection(row) {
            self.report.filtered_out += 1;
            return None;
        }
        let volume = self.style.radius_field.as_deref().and_then(|f| row.get(f));
        Some(ScatterPoint {
            position: [lon, lat],
            fill_color: self.color_for(row),
            radius: radius_for(volume, self.style.radius_divisor),
            index: row.index(),
            tooltip: self.tooltip.and_then(|t| t.format(row)),
        })
    }

    /// Palette key a row belongs to when layers are split by category.
    fn category_key(&self, row: &PointRecord<'_>) -> Option<String> {
        match &self.style.color {
            ColorRule::Fixed { .. } => None,
            ColorRule::Category { field, palette } => {
                let category = row.get(field).unwrap_or("").trim();
                Some(if palette.lookup(category).is_some() {
                    category.to_string()
                } else {
                    UNMAPPED_LAYER_SUFFIX.to_string()
                })
            }
        }
    }

    pub fn finish(self) -> BuildReport {
        self.report
    }
}

/// Build a single layer from every row of `points`.
pub fn build_layer(id: &str, points: &PointSet, pass: &mut BuildPass<'_>) -> ScatterLayer {
    let mut layer = ScatterLayer::empty(id, pass.style);
    for row in points.iter() {
        if let Some(point) = pass.point(&row) {
            let key = pass.category_key(&row).unwrap_or_else(|| id.to_string());
            *pass.report.per_category.entry(key).or_default() += 1;
            layer.data.push(point);
        }
    }
    layer
}

/// Layer id for one category of a split dataset.
pub fn category_layer_id(dataset_id: &str, category: &str) -> String {
    format!("{}:{}", dataset_id, category)
}

/// Build one layer per palette category, plus a trailing layer for
/// unmapped categories. Fixed-colour styles produce a single layer.
pub fn build_category_layers(
    dataset_id: &str,
    points: &PointSet,
    pass: &mut BuildPass<'_>,
) -> Vec<ScatterLayer> {
    let style = pass.style;
    let ColorRule::Category { palette, .. } = &style.color else {
        return vec![build_layer(dataset_id, points, pass)];
    };

    let mut layers: Vec<ScatterLayer> = palette
        .categories()
        .chain(std::iter::once(UNMAPPED_LAYER_SUFFIX))
        .map(|c| ScatterLayer::empty(category_layer_id(dataset_id, c), style))
        .collect();
    let keys: Vec<String> = palette
        .categories()
        .map(str::to_string)
        .chain(std::iter::once(UNMAPPED_LAYER_SUFFIX.to_string()))
        .collect();

    for row in points.iter() {
        let Some(point) = pass.point(&row) else {
            continue;
        };
        let key = pass
            .category_key(&row)
            .unwrap_or_else(|| UNMAPPED_LAYER_SUFFIX.to_string());
        let slot = keys.iter().position(|k| *k == key).unwrap_or(keys.len() - 1);
        *pass.report.per_category.entry(key).or_default() += 1;
        layers[slot].data.push(point);
    }
    layers
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccvis_data::parse_points;
    use chrono::NaiveDate;

    fn concession_style() -> LayerStyle {
        LayerStyle {
            radius_field: Some("VOL".to_string()),
            color: ColorRule::Category {
                field: "USO".to_string(),
                palette: CategoryPalette::water_use(),
            },
            ..LayerStyle::default()
        }
    }

    #[test]
    fn agricultural_concession_end_to_end() {
        let points = parse_points("LON,LAT,VOL,USO\n-100,20,100,AGRÍCOLA\n").unwrap();
        let style = concession_style();
        let mut pass = BuildPass::new(&style);
        let layer = build_layer("concesiones", &points, &mut pass);

        assert_eq!(layer.data.len(), 1);
        let point = &layer.data[0];
        assert_eq!(point.position, [-100.0, 20.0]);
        assert_eq!(point.fill_color, [163, 229, 104, 200]);
        assert!((point.radius - 0.2).abs() < 1e-12);
        assert_eq!(layer.radius_scale, 10.0);
        assert!(pass.finish().unmapped.is_empty());
    }

    #[test]
    fn bad_volume_gets_radius_of_one() {
        let unit = radius_for(Some("1"), 50.0);
        for cell in [None, Some(""), Some("n/a"), Some("0"), Some("-4"), Some("NaN")] {
            assert_eq!(radius_for(cell, 50.0), unit, "cell {:?}", cell);
        }
        assert_eq!(radius_for(Some("2500"), 1000.0), 0.05);
    }

    #[test]
    fn unmapped_categories_warn_once_per_distinct_value() {
        let csv = "LON,LAT,VOL,USO\n\
                   -100,20,1,MINERO\n\
                   -101,21,1,MINERO\n\
                   -102,22,1,TURÍSTICO\n\
                   -103,23,1,AGRÍCOLA\n";
        let points = parse_points(csv).unwrap();
        let style = concession_style();
        let mut pass = BuildPass::new(&style);
        let layer = build_layer("c", &points, &mut pass);
        let report = pass.finish();

        assert_eq!(layer.data[0].fill_color, [128, 128, 128, 200]);
        assert_eq!(layer.data[1].fill_color, [128, 128, 128, 200]);
        assert_eq!(layer.data[2].fill_color, [128, 128, 128, 200]);
        let expected: BTreeSet<String> = ["MINERO", "TURÍSTICO"].iter().map(|s| s.to_string()).collect();
        assert_eq!(report.unmapped, expected);
        assert_eq!(report.per_category.get(UNMAPPED_LAYER_SUFFIX), Some(&3));
    }

    #[test]
    fn rows_without_coordinates_are_skipped() {
        let points = parse_points("LON,LAT\n-100,20\n,21\nabc,22\n").unwrap();
        let style = LayerStyle::default();
        let mut pass = BuildPass::new(&style);
        let layer = build_layer("p", &points, &mut pass);
        assert_eq!(layer.data.len(), 1);
        assert_eq!(layer.data[0].index, 0);
        let report = pass.finish();
        assert_eq!(report.skipped, 2);
        assert_eq!(report.point_count(), 1);
    }

    #[test]
    fn selection_filters_dated_rows_only() {
        let csv = "LON,LAT,FECHA\n1,1,1995-05-01\n2,2,2010-01-01\n3,3,\n";
        let points = parse_points(csv).unwrap();
        let style = LayerStyle {
            date_field: Some("FECHA".to_string()),
            ..LayerStyle::default()
        };
        let selection = DateInterval::from_dates(
            NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
        );
        let mut pass = BuildPass::new(&style).with_selection(Some(&selection));
        let layer = build_layer("p", &points, &mut pass);
        let indexes: Vec<usize> = layer.data.iter().map(|p| p.index).collect();
        assert_eq!(indexes, vec![0, 2]);
        assert_eq!(pass.finish().filtered_out, 1);
    }

    #[test]
    fn split_layers_follow_palette_order() {
        let csv = "LON,LAT,VOL,USO\n1,1,1,INDUSTRIAL\n2,2,1,AGRÍCOLA\n3,3,1,MINERO\n";
        let points = parse_points(csv).unwrap();
        let style = concession_style();
        let mut pass = BuildPass::new(&style);
        let layers = build_category_layers("c", &points, &mut pass);

        let palette_len = CategoryPalette::water_use().entries.len();
        assert_eq!(layers.len(), palette_len + 1);
        assert_eq!(layers[0].id, "c:AGRÍCOLA");
        assert_eq!(layers[0].data.len(), 1);
        assert_eq!(layers[2].id, "c:INDUSTRIAL");
        assert_eq!(layers[2].data[0].index, 0);
        let last = layers.last().unwrap();
        assert_eq!(last.id, "c:otros");
        assert_eq!(last.data[0].fill_color, [128, 128, 128, 200]);
    }

    #[test]
    fn fixed_colour_style_builds_one_layer() {
        let points = parse_points("LON,LAT\n1,1\n").unwrap();
        let style = LayerStyle::default();
        let mut pass = BuildPass::new(&style);
        let layers = build_category_layers("anexos", &points, &mut pass);
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].id, "anexos");
        assert_eq!(layers[0].data[0].fill_color, [255, 171, 100, 130]);
    }

    #[test]
    fn radius_scale_applies_pixel_ratio_on_mac() {
        assert_eq!(radius_scale_for(10.0, "MacIntel", 2.0), 20.0);
        assert_eq!(radius_scale_for(10.0, "Linux x86_64", 2.0), 10.0);
    }

    #[test]
    fn layer_serializes_for_deck_gl() {
        let points = parse_points("LON,LAT\n1,2\n").unwrap();
        let style = LayerStyle::default();
        let layer = build_layer("p", &points, &mut BuildPass::new(&style));
        let json = serde_json::to_value(&layer).unwrap();
        assert_eq!(json["radiusMinPixels"], 1.0);
        assert_eq!(json["data"][0]["fillColor"], serde_json::json!([255, 171, 100, 130]));
        assert!(json["data"][0].get("tooltip").is_none());
    }
}
