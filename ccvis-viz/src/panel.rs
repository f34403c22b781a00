//! Checkbox panel state: one independent visibility flag per layer.

use ccvis_data::Rgba;
use serde::Serialize;

use crate::layer::ScatterLayer;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toggle {
    /// Id of the layer this checkbox controls.
    pub id: String,
    pub label: String,
    pub visible: bool,
    /// Legend swatch shown next to the checkbox.
    pub swatch: Option<Rgba>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibilityPanel {
    toggles: Vec<Toggle>,
}

impl VisibilityPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a toggle. Ids already present are left as they are.
    pub fn add(&mut self, id: impl Into<String>, label: impl Into<String>, visible: bool, swatch: Option<Rgba>) {
        let id = id.into();
        if self.toggles.iter().any(|t| t.id == id) {
            return;
        }
        self.toggles.push(Toggle {
            id,
            label: label.into(),
            visible,
            swatch,
        });
    }

    pub fn toggles(&self) -> &[Toggle] {
        &self.toggles
    }

    /// Set one flag. Returns `true` if it changed; unknown ids are ignored.
    pub fn set(&mut self, id: &str, visible: bool) -> bool {
        match self.toggles.iter_mut().find(|t| t.id == id) {
            Some(t) if t.visible != visible => {
                t.visible = visible;
                true
            }
            _ => false,
        }
    }

    /// Flip one flag and return its new value.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        self.toggles.iter_mut().find(|t| t.id == id).map(|t| {
            t.visible = !t.visible;
            t.visible
        })
    }

    /// Layers without a checkbox are always shown.
    pub fn is_visible(&self, id: &str) -> bool {
        self.toggles
            .iter()
            .find(|t| t.id == id)
            .map_or(true, |t| t.visible)
    }

    /// The layers to hand to the renderer, in their original order.
    pub fn active<'a>(&self, layers: &'a [ScatterLayer]) -> Vec<&'a ScatterLayer> {
        layers.iter().filter(|l| self.is_visible(&l.id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::LayerStyle;

    fn layers(ids: &[&str]) -> Vec<ScatterLayer> {
        let style = LayerStyle::default();
        ids.iter().map(|id| ScatterLayer::empty(*id, &style)).collect()
    }

    fn active_ids(panel: &VisibilityPanel, layers: &[ScatterLayer]) -> Vec<String> {
        panel.active(layers).iter().map(|l| l.id.clone()).collect()
    }

    #[test]
    fn checking_a_box_adds_exactly_that_layer() {
        let all = layers(&["a", "b", "c"]);
        let mut panel = VisibilityPanel::new();
        panel.add("a", "A", true, None);
        panel.add("b", "B", false, None);
        panel.add("c", "C", false, None);
        assert_eq!(active_ids(&panel, &all), vec!["a"]);

        assert!(panel.set("b", true));
        assert_eq!(active_ids(&panel, &all), vec!["a", "b"]);
        assert!(!panel.is_visible("c"));
    }

    #[test]
    fn toggle_flips_only_its_flag() {
        let mut panel = VisibilityPanel::new();
        panel.add("a", "A", true, None);
        panel.add("b", "B", true, None);
        assert_eq!(panel.toggle("a"), Some(false));
        assert!(panel.is_visible("b"));
        assert_eq!(panel.toggle("a"), Some(true));
        assert_eq!(panel.toggle("missing"), None);
    }

    #[test]
    fn set_reports_changes_only() {
        let mut panel = VisibilityPanel::new();
        panel.add("a", "A", true, None);
        assert!(!panel.set("a", true));
        assert!(panel.set("a", false));
        assert!(!panel.set("nope", false));
    }

    #[test]
    fn duplicate_ids_keep_first_registration() {
        let mut panel = VisibilityPanel::new();
        panel.add("a", "first", false, None);
        panel.add("a", "second", true, None);
        assert_eq!(panel.toggles().len(), 1);
        assert_eq!(panel.toggles()[0].label, "first");
        assert!(!panel.is_visible("a"));
    }

    #[test]
    fn layers_without_toggle_stay_visible() {
        let all = layers(&["basemap-points"]);
        let panel = VisibilityPanel::new();
        assert_eq!(active_ids(&panel, &all), vec!["basemap-points"]);
    }
}
