//! Checkbox panel for layer visibility.

use ccvis_viz::panel::Toggle;
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct LayerTogglesProps {
    pub toggles: Vec<Toggle>,
    /// Called with the layer id of the checkbox the user clicked.
    pub on_toggle: EventHandler<String>,
    #[props(default = String::from("Capas"))]
    pub title: String,
}

/// One checkbox per layer, with a colour swatch when the layer has one.
#[component]
pub fn LayerToggles(props: LayerTogglesProps) -> Element {
    let on_toggle = props.on_toggle;

    rsx! {
        div {
            style: "position: absolute; top: 12px; left: 12px; z-index: 2; max-height: 70%; overflow-y: auto; padding: 8px 12px; background: rgba(20,20,20,0.85); color: #fff; border-radius: 4px; font-size: 12px;",
            strong { "{props.title}" }
            for toggle in props.toggles.iter().cloned() {
                label {
                    key: "{toggle.id}",
                    style: "display: flex; align-items: center; gap: 6px; margin-top: 4px; cursor: pointer;",
                    input {
                        r#type: "checkbox",
                        checked: toggle.visible,
                        onchange: {
                            let id = toggle.id.clone();
                            move |_| on_toggle.call(id.clone())
                        },
                    }
                    if let Some([r, g, b, _]) = toggle.swatch {
                        span {
                            style: "display: inline-block; width: 10px; height: 10px; border-radius: 50%; background: rgb({r},{g},{b});",
                        }
                    }
                    "{toggle.label}"
                }
            }
        }
    }
}
